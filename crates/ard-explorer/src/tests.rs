use std::{cell::RefCell, sync::Arc};

use ard_inspect::{
    classify::Classifier,
    error::InspectError,
    tree::Disclosure,
    value::{Reflect, Reflected, Value},
    Inspect,
};
use rustc_hash::FxHashMap;

use crate::{
    component::{fetch_component, root_label, FetchState},
    fuzzy::{fuzzy_matches, levenshtein, FuzzyMatchStrategy},
    host::{
        ComponentKind, ComponentType, EcsHost, Entity, EntityLabel, EntityQuery, SystemInfo,
    },
    panel::{ObjectPanel, PanelEntry},
    query::{Presence, QueryBuilder},
    settings::ExplorerSettings,
    systems::{
        filter_color, SystemId, SystemTree, SystemsPanel, FILTER_COLORS, MAX_FILTER_COUNT,
    },
    watch::{EntityWatch, WatchStatus},
    ExplorerSession,
};

#[derive(Inspect, Debug, Clone)]
struct CPosition {
    x: f32,
    y: f32,
}

fn position() -> ComponentType {
    ComponentType::new("game::CPosition", "CPosition", ComponentKind::Data)
}

fn kitchen() -> ComponentType {
    ComponentType::new("game::SKitchen", "SKitchen", ComponentKind::SharedData)
}

fn orders() -> ComponentType {
    ComponentType::new("game::COrders", "COrders", ComponentKind::Buffer)
}

fn broken() -> ComponentType {
    ComponentType::new("game::CBroken", "CBroken", ComponentKind::Data)
}

struct FakeHost {
    entities: RefCell<FxHashMap<Entity, Vec<ComponentType>>>,
    orders: Vec<u32>,
}

const PLAYER: Entity = Entity::new(1, 0);
const KITCHEN: Entity = Entity::new(4, 0);
const CUSTOMER: Entity = Entity::new(7, 2);

impl FakeHost {
    fn new() -> Self {
        let mut entities = FxHashMap::default();
        entities.insert(PLAYER, vec![position(), orders(), broken()]);
        entities.insert(KITCHEN, vec![position(), kitchen()]);
        entities.insert(CUSTOMER, vec![position()]);

        Self {
            entities: RefCell::new(entities),
            orders: vec![10, 20, 30],
        }
    }

    fn destroy(&self, entity: Entity) {
        self.entities.borrow_mut().remove(&entity);
    }

    fn remove_component(&self, entity: Entity, key: &str) {
        if let Some(components) = self.entities.borrow_mut().get_mut(&entity) {
            components.retain(|component| component.key != key);
        }
    }
}

impl EcsHost for FakeHost {
    fn component_types(&self) -> Vec<ComponentType> {
        vec![position(), kitchen(), orders(), broken(), position()]
    }

    fn query(&self, query: &EntityQuery) -> Vec<Entity> {
        let has = |components: &[ComponentType], key: &String| {
            components.iter().any(|component| &component.key == key)
        };

        let mut entities: Vec<Entity> = self
            .entities
            .borrow()
            .iter()
            .filter(|(_, components)| {
                query.all.iter().all(|key| has(components, key))
                    && (query.any.is_empty() || query.any.iter().any(|key| has(components, key)))
                    && !query.none.iter().any(|key| has(components, key))
            })
            .map(|(entity, _)| *entity)
            .collect();
        entities.sort();
        entities
    }

    fn is_alive(&self, entity: Entity) -> bool {
        self.entities.borrow().contains_key(&entity)
    }

    fn components_of(&self, entity: Entity) -> Vec<ComponentType> {
        self.entities
            .borrow()
            .get(&entity)
            .cloned()
            .unwrap_or_default()
    }

    fn read_component(&self, _: Entity, component: &ComponentType) -> Reflected {
        match component.name.as_str() {
            "CPosition" => CPosition { x: 1.0, y: 2.0 }.reflect(),
            "SKitchen" => String::from("Kitchen").reflect(),
            _ => Err(InspectError::access(component.name.clone(), "not readable")),
        }
    }

    fn buffer_len(&self, _: Entity, _: &ComponentType) -> usize {
        self.orders.len()
    }

    fn read_buffer_element(&self, _: Entity, _: &ComponentType, index: usize) -> Reflected {
        match self.orders.get(index) {
            Some(order) => Ok(Some(Value::new(*order))),
            None => Err(InspectError::NoSuchItem(index)),
        }
    }

    fn systems(&self) -> Vec<SystemInfo> {
        let leaf = |name| SystemInfo::new(name, Vec::new());
        vec![
            SystemInfo::new("InitializationSystemGroup", vec![leaf("BeginInitBuffer")]),
            SystemInfo::new(
                "SimulationSystemGroup",
                vec![
                    SystemInfo::new(
                        "CookingGroup",
                        vec![leaf("ChopIngredients"), leaf("CookBurger")],
                    ),
                    leaf("MoveCustomers"),
                ],
            ),
            SystemInfo::new("PresentationSystemGroup", vec![leaf("DrawPlates")]),
        ]
    }
}

///////////
// Fuzzy //
///////////

#[test]
fn levenshtein_distance() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("same", "same"), 0);
}

#[test]
fn fuzzy_ranking() {
    let names = ["SKitchen", "CItemHolder", "CPlayer", "CPosition"];
    let matches = fuzzy_matches(
        &names,
        "CPos",
        |name| *name,
        FuzzyMatchStrategy::IgnoreCaseAndLength,
        3,
    );
    assert_eq!(matches[..2], [&"CPosition", &"CPlayer"]);
}

#[test]
fn fuzzy_rejects_much_shorter_candidates() {
    let names = ["Pos"];
    let matches = fuzzy_matches(
        &names,
        "Position",
        |name| *name,
        FuzzyMatchStrategy::IgnoreCaseAndLength,
        3,
    );
    assert!(matches.is_empty());
}

//////////////////////
// Component access //
//////////////////////

#[test]
fn fetch_data_component() {
    let host = FakeHost::new();
    let fetch = fetch_component(&host, PLAYER, &position(), 0);
    assert_eq!(fetch.state, FetchState::Success);
    assert_eq!(fetch.buffer_index, None);
    assert!(matches!(fetch.value, Ok(Some(_))));
    assert_eq!(root_label(&position()), "CPosition (Data)");
}

#[test]
fn fetch_clamps_buffer_index() {
    let host = FakeHost::new();
    let fetch = fetch_component(&host, PLAYER, &orders(), 10);
    assert_eq!(fetch.state, FetchState::Success);
    assert_eq!(fetch.buffer_len, 3);
    assert_eq!(fetch.buffer_index, Some(2));

    let value = fetch.value.unwrap().unwrap();
    assert_eq!(value.display().unwrap(), "30");
}

#[test]
fn fetch_empty_buffer() {
    let mut host = FakeHost::new();
    host.orders.clear();
    let fetch = fetch_component(&host, PLAYER, &orders(), 0);
    assert_eq!(fetch.state, FetchState::BufferEmpty);
    assert_eq!(fetch.buffer_index, None);
}

#[test]
fn fetch_failure() {
    let host = FakeHost::new();
    let fetch = fetch_component(&host, PLAYER, &broken(), 0);
    assert_eq!(fetch.state, FetchState::Error);
    assert!(fetch.value.is_err());
}

#[test]
fn entity_labels() {
    let host = FakeHost::new();

    let label = EntityLabel::new(&host, KITCHEN);
    assert_eq!(label.text, "Entity 4 (SKitchen)");
    assert_eq!(label.text_with_count, "Entity 4 - 2 (SKitchen)");

    let label = EntityLabel::new(&host, CUSTOMER);
    assert_eq!(label.text, "Entity 7 (CPosition)");

    let label = EntityLabel::new(&host, PLAYER);
    assert_eq!(label.text, "Entity 1");
    assert_eq!(label.text_with_count, "Entity 1 - 3");
}

///////////
// Query //
///////////

#[test]
fn query_builder_lists() {
    let host = FakeHost::new();
    let mut builder = QueryBuilder::new(&host);
    assert_eq!(builder.components().len(), 4);

    builder.add("game::CPosition", Presence::All);
    builder.add("game::CPosition", Presence::All);
    builder.add("game::Unknown", Presence::All);
    builder.add("game::SKitchen", Presence::None);
    assert_eq!(builder.query().all, ["game::CPosition"]);
    assert_eq!(builder.query().none, ["game::SKitchen"]);

    builder.perform(&host);
    let entities: Vec<Entity> = builder.results().iter().map(|r| r.entity).collect();
    assert_eq!(entities, [PLAYER, CUSTOMER]);

    builder.remove("game::SKitchen", Presence::None);
    builder.clear(Presence::All);
    builder.perform(&host);
    assert!(builder.results().is_empty());
}

#[test]
fn fuzzy_component_filter() {
    let host = FakeHost::new();
    let builder = QueryBuilder::new(&host);
    let settings = ExplorerSettings::default();

    assert_eq!(builder.matching("", &settings).len(), 4);
    let matching = builder.matching("CPos", &settings);
    assert_eq!(matching[0].name, "CPosition");
}

#[test]
fn favourite_queries() {
    let host = FakeHost::new();
    let mut builder = QueryBuilder::new(&host);
    builder.add("game::COrders", Presence::Any);

    assert!(!builder.add_favourite("   "));
    assert!(builder.add_favourite(" orders "));
    assert_eq!(builder.favourites()[0].name, "orders");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favourites.ron");
    builder.save_favourites(&path).unwrap();

    let mut other = QueryBuilder::new(&host);
    other.add("game::CPosition", Presence::All);
    other.load_favourites(&path).unwrap();
    other.load_favourite(0);
    assert!(other.query().all.is_empty());
    assert_eq!(other.query().any, ["game::COrders"]);
}

#[test]
fn favourite_with_unknown_components() {
    let host = FakeHost::new();
    let mut builder = QueryBuilder::new(&host);
    builder.add("game::CPosition", Presence::All);
    builder.add_favourite("positions");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favourites.ron");
    builder.save_favourites(&path).unwrap();

    let text = std::fs::read_to_string(&path)
        .unwrap()
        .replace("game::CPosition", "game::Removed");
    std::fs::write(&path, text).unwrap();

    let mut other = QueryBuilder::new(&host);
    other.load_favourites(&path).unwrap();
    other.load_favourite(0);
    assert!(other.query().is_empty());
}

///////////
// Watch //
///////////

fn watch(entity: Entity, host: &FakeHost) -> EntityWatch {
    EntityWatch::new(
        entity,
        EntityLabel::new(host, entity),
        Arc::new(Classifier::default()),
    )
}

#[test]
fn watch_builds_tree_for_selection() {
    let host = FakeHost::new();
    let mut watch = watch(PLAYER, &host);
    assert_eq!(watch.refresh(&host), WatchStatus::NoSelection);

    watch.select(position());
    assert_eq!(watch.refresh(&host), WatchStatus::Ready);

    let tree = watch.tree_mut().unwrap();
    let root = tree.root();
    assert_eq!(tree.node(root).name(), "CPosition (Data)");
    tree.set_expanded(root, true);
    assert_eq!(tree.children(root).len(), 2);

    // Reselecting keeps the tree and its expansion state.
    watch.select(position());
    assert_eq!(watch.refresh(&host), WatchStatus::Ready);
    let tree = watch.tree().unwrap();
    assert_eq!(tree.disclosure(tree.root()), Disclosure::Expanded);
}

#[test]
fn watch_buffer_navigation() {
    let host = FakeHost::new();
    let mut watch = watch(PLAYER, &host);
    watch.select(orders());
    assert_eq!(watch.refresh(&host), WatchStatus::Ready);
    assert_eq!(watch.buffer_len(), 3);

    let value_of = |watch: &EntityWatch| {
        let tree = watch.tree().unwrap();
        tree.value_string(tree.root())
    };
    assert_eq!(value_of(&watch), "10");

    watch.next_element();
    assert!(watch.tree().is_none());
    watch.refresh(&host);
    assert_eq!(value_of(&watch), "20");

    watch.set_buffer_index(99);
    watch.refresh(&host);
    assert_eq!(watch.buffer_index(), 2);
    assert_eq!(value_of(&watch), "30");

    watch.previous_element();
    watch.refresh(&host);
    assert_eq!(value_of(&watch), "20");
}

#[test]
fn watch_reports_failures() {
    let host = FakeHost::new();
    let mut watch = watch(PLAYER, &host);

    watch.select(broken());
    assert!(matches!(
        watch.refresh(&host),
        WatchStatus::Error(InspectError::Access { .. })
    ));

    watch.select(position());
    assert_eq!(watch.refresh(&host), WatchStatus::Ready);
    host.remove_component(PLAYER, "game::CPosition");
    assert_eq!(watch.refresh(&host), WatchStatus::ComponentRemoved);
    assert!(watch.tree().is_none());

    host.destroy(PLAYER);
    assert_eq!(watch.refresh(&host), WatchStatus::Destroyed);
}

////////////
// Panels //
////////////

#[test]
fn object_panel_selection() {
    let entries = vec![
        PanelEntry::new("Burger", Value::new(CPosition { x: 0.0, y: 0.0 })),
        PanelEntry::new("Burger Bun", Value::new(String::from("bun"))),
        PanelEntry::new("Tomato", Value::new(3_u32)),
    ];
    let mut panel = ObjectPanel::new("Game Data", entries, Arc::new(Classifier::default()));
    assert!(panel.tree().is_none());

    panel.select(0);
    let tree = panel.tree().unwrap();
    assert_eq!(tree.node(tree.root()).name(), "Burger");
    assert_eq!(tree.disclosure(tree.root()), Disclosure::Expanded);
    assert_eq!(tree.children(tree.root()).len(), 2);

    panel.select(5);
    assert_eq!(panel.selected(), Some(0));

    let settings = ExplorerSettings::default();
    panel.set_filter("Burg");
    let matching = panel.matching(&settings);
    assert_eq!(matching, [0, 1]);

    panel.set_filter("");
    assert_eq!(panel.matching(&settings).len(), 3);
}

/////////////
// Systems //
/////////////

fn system_names(tree: &SystemTree, ids: impl IntoIterator<Item = SystemId>) -> Vec<String> {
    ids.into_iter()
        .map(|id| tree.node(id).name().to_owned())
        .collect()
}

fn expand_all(tree: &mut SystemTree) {
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        tree.set_expanded(id, true);
        stack.extend_from_slice(tree.node(id).children());
    }
}

fn filtered(panel: &SystemsPanel) -> Vec<(String, Option<usize>)> {
    panel
        .visible_rows()
        .into_iter()
        .map(|row| (panel.tree().node(row.id).name().to_owned(), row.highlight))
        .collect()
}

#[test]
fn systems_keep_execution_order() {
    let host = FakeHost::new();
    let mut panel = SystemsPanel::new(&host);
    let tree = panel.tree_mut();
    let root = tree.root();

    assert_eq!(tree.len(), 10);
    assert_eq!(tree.label(root), "▶ World");
    assert_eq!(
        system_names(tree, tree.node(root).children().to_vec()),
        [
            "InitializationSystemGroup",
            "SimulationSystemGroup",
            "PresentationSystemGroup"
        ]
    );

    let simulation = tree.node(root).children()[1];
    let cooking = tree.node(simulation).children()[0];
    assert_eq!(
        system_names(tree, tree.node(cooking).children().to_vec()),
        ["ChopIngredients", "CookBurger"]
    );
    assert_eq!(tree.node(cooking).parent(), Some(simulation));

    let chop = tree.node(cooking).children()[0];
    assert_eq!(tree.label(chop), "    ChopIngredients");

    // Only the root row until something is expanded.
    assert_eq!(tree.visible_rows(&[]).len(), 1);

    expand_all(tree);
    assert_eq!(tree.label(root), "▼ World");
    let rows = tree.visible_rows(&[]);
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[5].id, chop);
    assert_eq!(rows[5].depth, 3);

    tree.collapse(simulation);
    assert!(!tree.node(cooking).is_expanded());
    assert!(tree.node(root).is_expanded());
    assert_eq!(tree.visible_rows(&[]).len(), 6);
}

#[test]
fn system_filters_hide_and_highlight() {
    let host = FakeHost::new();
    let mut panel = SystemsPanel::new(&host);
    expand_all(panel.tree_mut());

    assert!(panel.add_filter());
    panel.set_filter(0, "COOK");
    assert_eq!(
        filtered(&panel),
        [
            ("World".to_owned(), None),
            ("SimulationSystemGroup".to_owned(), None),
            ("CookingGroup".to_owned(), Some(0)),
            ("ChopIngredients".to_owned(), None),
            ("CookBurger".to_owned(), Some(0)),
        ]
    );

    assert!(panel.add_filter());
    panel.set_filter(1, "move");
    let rows = filtered(&panel);
    assert!(rows.contains(&("MoveCustomers".to_owned(), Some(1))));
    assert!(!rows.iter().any(|(name, _)| name == "DrawPlates"));

    // Empty filters are ignored.
    panel.set_filter(0, "");
    panel.set_filter(1, "draw");
    assert_eq!(
        filtered(&panel),
        [
            ("World".to_owned(), None),
            ("PresentationSystemGroup".to_owned(), None),
            ("DrawPlates".to_owned(), Some(1)),
        ]
    );

    panel.remove_filter(1);
    assert_eq!(panel.filters(), [""]);
    assert_eq!(filtered(&panel).len(), 10);
}

#[test]
fn system_filter_limit() {
    let host = FakeHost::new();
    let mut panel = SystemsPanel::new(&host);
    for _ in 0..MAX_FILTER_COUNT {
        assert!(panel.add_filter());
    }
    assert!(!panel.add_filter());
    assert_eq!(panel.filters().len(), MAX_FILTER_COUNT);

    assert_eq!(filter_color(2), FILTER_COLORS[2]);
    assert_eq!(filter_color(MAX_FILTER_COUNT), egui::Color32::WHITE);
}

#[test]
fn world_without_systems() {
    let tree = SystemTree::new(Vec::new());
    assert!(tree.is_empty());
    assert_eq!(tree.label(tree.root()), "    World");
}

//////////////
// Settings //
//////////////

#[test]
fn logging_uses_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ExplorerSettings {
        log_dir: dir.path().join("logs"),
        log_level: ard_log::LevelFilter::Debug,
        ..Default::default()
    };

    settings.init_logging().unwrap();
    ard_log::info!("explorer started");

    let files = std::fs::read_dir(&settings.log_dir).unwrap().count();
    assert_eq!(files, 1);
    assert!(matches!(
        settings.init_logging(),
        Err(ard_log::InitError::AlreadyInitialized(_))
    ));
}

#[test]
fn settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("explorer.ron");

    let mut settings = ExplorerSettings::default();
    settings.indent = 12.0;
    settings.fuzzy_max_length_difference = 5;
    settings.save(&path).unwrap();

    let loaded = ExplorerSettings::load(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.tree_style().indent, 12.0);
}

#[test]
fn settings_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let missing = ExplorerSettings::load_or_default(dir.path().join("missing.ron"));
    assert_eq!(missing, ExplorerSettings::default());

    let path = dir.path().join("broken.ron");
    std::fs::write(&path, "(indent: \"wide\")").unwrap();
    assert!(ExplorerSettings::load(&path).is_err());
    assert_eq!(
        ExplorerSettings::load_or_default(&path),
        ExplorerSettings::default()
    );

    let path = dir.path().join("partial.ron");
    std::fs::write(&path, "(thumbnail_size: 64)").unwrap();
    let partial = ExplorerSettings::load(&path).unwrap();
    assert_eq!(partial.thumbnail_size, 64);
    assert_eq!(partial.indent, ExplorerSettings::default().indent);
}

/////////////
// Session //
/////////////

#[test]
fn session_renders_headless() {
    let dir = tempfile::tempdir().unwrap();
    let host = FakeHost::new();
    let settings = ExplorerSettings {
        favourites_path: dir.path().join("favourites.ron"),
        ..Default::default()
    };

    let mut session = ExplorerSession::new(settings, &host);
    session.query.add("game::CPosition", Presence::All);
    session.query.perform(&host);
    assert_eq!(session.query.results().len(), 3);

    let mut watch = watch(PLAYER, &host);
    watch.select(position());
    session.watches.push(watch);
    session.add_panel(ObjectPanel::new(
        "Game Data",
        vec![PanelEntry::new("Tomato", Value::new(3_u32))],
        session.classifier().clone(),
    ));

    let ctx = egui::Context::default();
    for _ in 0..2 {
        let _ = ctx.run(egui::RawInput::default(), |ctx| session.show(ctx, &host));
    }

    assert_eq!(session.watches.len(), 1);
    assert!(session.ui.panel_count() > 0);
    assert_eq!(session.systems.tree().len(), 10);
}
