use std::path::Path;

use ard_inspect::session::UiSessionState;
use ard_log::{debug, info, warn};
use ron::ser::PrettyConfig;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    fuzzy::fuzzy_matches,
    host::{ComponentType, EcsHost, Entity, EntityLabel, EntityQuery},
    settings::{ExplorerSettings, SettingsError},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Presence {
    All,
    Any,
    None,
}

impl Presence {
    pub const ALL: [Presence; 3] = [Presence::All, Presence::Any, Presence::None];

    pub fn label(self) -> &'static str {
        match self {
            Presence::All => "All",
            Presence::Any => "Any",
            Presence::None => "None",
        }
    }
}

/// A named query the user wants to keep around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavouriteQuery {
    pub name: String,
    pub query: EntityQuery,
}

/// An entity returned by the last query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub entity: Entity,
    pub label: EntityLabel,
}

/// Builds entity queries out of the host's component types.
pub struct QueryBuilder {
    components: Vec<ComponentType>,
    query: EntityQuery,
    results: Vec<QueryResult>,
    favourites: Vec<FavouriteQuery>,
    new_favourite: String,
}

impl QueryBuilder {
    pub fn new(host: &dyn EcsHost) -> Self {
        let mut seen = FxHashSet::default();
        let components: Vec<ComponentType> = host
            .component_types()
            .into_iter()
            .filter(|component| seen.insert(component.key.clone()))
            .collect();
        info!("number of components = {}", components.len());

        Self {
            components,
            query: EntityQuery::default(),
            results: Vec::new(),
            favourites: Vec::new(),
            new_favourite: String::new(),
        }
    }

    #[inline(always)]
    pub fn components(&self) -> &[ComponentType] {
        &self.components
    }

    #[inline(always)]
    pub fn query(&self) -> &EntityQuery {
        &self.query
    }

    #[inline(always)]
    pub fn results(&self) -> &[QueryResult] {
        &self.results
    }

    #[inline(always)]
    pub fn favourites(&self) -> &[FavouriteQuery] {
        &self.favourites
    }

    pub fn component(&self, key: &str) -> Option<&ComponentType> {
        self.components.iter().find(|component| component.key == key)
    }

    /// Component types matching the filter text, best match first. Every component when the
    /// filter is empty.
    pub fn matching(&self, filter: &str, settings: &ExplorerSettings) -> Vec<&ComponentType> {
        if filter.is_empty() {
            return self.components.iter().collect();
        }

        fuzzy_matches(
            &self.components,
            filter,
            |component| component.name.as_str(),
            settings.fuzzy_strategy,
            settings.fuzzy_max_length_difference,
        )
    }

    /// Adds a known component to one of the lists. Duplicates are ignored.
    pub fn add(&mut self, key: &str, presence: Presence) {
        if self.component(key).is_none() {
            return;
        }

        let list = self.list_mut(presence);
        if !list.iter().any(|existing| existing == key) {
            list.push(key.to_owned());
        }
    }

    pub fn remove(&mut self, key: &str, presence: Presence) {
        self.list_mut(presence).retain(|existing| existing != key);
    }

    pub fn clear(&mut self, presence: Presence) {
        self.list_mut(presence).clear();
    }

    /// Runs the current query. An empty query clears the results.
    pub fn perform(&mut self, host: &dyn EcsHost) {
        self.results.clear();
        if self.query.is_empty() {
            return;
        }

        self.results = host
            .query(&self.query)
            .into_iter()
            .map(|entity| QueryResult {
                entity,
                label: EntityLabel::new(host, entity),
            })
            .collect();
        debug!("query matched {} entities", self.results.len());
    }

    /// Saves the current query under `name`. Blank names are rejected.
    pub fn add_favourite(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        self.favourites.push(FavouriteQuery {
            name: name.to_owned(),
            query: self.query.clone(),
        });
        true
    }

    pub fn remove_favourite(&mut self, index: usize) {
        if index < self.favourites.len() {
            self.favourites.remove(index);
        }
    }

    /// Replaces the current query with a favourite. Components the host no longer knows about
    /// are dropped.
    pub fn load_favourite(&mut self, index: usize) {
        let favourite = match self.favourites.get(index) {
            Some(favourite) => favourite.query.clone(),
            None => return,
        };

        for (presence, keys) in [
            (Presence::All, favourite.all),
            (Presence::Any, favourite.any),
            (Presence::None, favourite.none),
        ] {
            self.clear(presence);
            for key in keys {
                self.add(&key, presence);
            }
        }
    }

    pub fn load_favourites(&mut self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        self.favourites = ron::de::from_reader(reader)?;
        Ok(())
    }

    pub fn save_favourites(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        ron::ser::to_writer_pretty(writer, &self.favourites, PrettyConfig::default())?;
        Ok(())
    }

    fn list_mut(&mut self, presence: Presence) -> &mut Vec<String> {
        match presence {
            Presence::All => &mut self.query.all,
            Presence::Any => &mut self.query.any,
            Presence::None => &mut self.query.none,
        }
    }

    fn list(&self, presence: Presence) -> &[String] {
        match presence {
            Presence::All => &self.query.all,
            Presence::Any => &self.query.any,
            Presence::None => &self.query.none,
        }
    }

    /// Draws the query builder. Returns the result the user asked to watch, if any.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        host: &dyn EcsHost,
        session: &mut UiSessionState,
        settings: &ExplorerSettings,
    ) -> Option<QueryResult> {
        let mut changed_favourites = false;

        ui.label("Filter");
        ui.text_edit_singleline(&mut session.component_filter);

        let mut additions = Vec::new();
        let filter = session.component_filter.clone();
        let offset = session.scroll("components").offset;
        let output = egui::ScrollArea::vertical()
            .id_source("components")
            .max_height(250.0)
            .auto_shrink(false)
            .scroll_offset(offset)
            .show(ui, |ui| {
                for component in self.matching(&filter, settings) {
                    ui.horizontal(|ui| {
                        ui.label(component.name.as_str());
                        for presence in Presence::ALL {
                            if ui.button(presence.label()).clicked() {
                                additions.push((component.key.clone(), presence));
                            }
                        }
                    });
                }
            });
        session.scroll("components").offset = output.state.offset;

        for (key, presence) in additions {
            self.add(&key, presence);
        }

        let mut removals = Vec::new();
        ui.columns(3, |columns| {
            for (column, presence) in columns.iter_mut().zip(Presence::ALL) {
                let list = self.list(presence);
                column.label(format!("{} ({})", presence.label(), list.len()));
                for key in list {
                    column.horizontal(|ui| {
                        let name = self
                            .component(key)
                            .map(|component| component.name.as_str())
                            .unwrap_or(key.as_str());
                        ui.label(name);
                        if ui.button("Remove").clicked() {
                            removals.push((key.clone(), presence));
                        }
                    });
                }
            }
        });
        for (key, presence) in removals {
            self.remove(&key, presence);
        }

        ui.separator();
        ui.label("Favourites");
        let mut load = None;
        let mut delete = None;
        for (i, favourite) in self.favourites.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(favourite.name.as_str());
                if ui.button("Load").clicked() {
                    load = Some(i);
                }
                if ui.button("Delete").clicked() {
                    delete = Some(i);
                }
            });
        }
        if let Some(i) = load {
            self.load_favourite(i);
        }
        if let Some(i) = delete {
            self.remove_favourite(i);
            changed_favourites = true;
        }

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.new_favourite);
            if ui.button("Add Favourite").clicked() {
                let name = std::mem::take(&mut self.new_favourite);
                changed_favourites |= self.add_favourite(&name);
            }
        });

        if changed_favourites {
            if let Err(err) = self.save_favourites(&settings.favourites_path) {
                warn!("unable to save favourite queries: {err}");
            }
        }

        if ui.button("Get Entity Query").clicked() {
            self.perform(host);
        }

        ui.separator();
        if self.results.is_empty() {
            ui.label("No entities matching query!");
            return None;
        }

        let mut watch = None;
        ui.label(format!("Entities ({})", self.results.len()));
        let offset = session.scroll("results").offset;
        let output = egui::ScrollArea::vertical()
            .id_source("results")
            .max_height(140.0)
            .auto_shrink(false)
            .scroll_offset(offset)
            .show(ui, |ui| {
                for result in &self.results {
                    if ui.button(result.label.text_with_count.as_str()).clicked() {
                        watch = Some(result.clone());
                    }
                }
            });
        session.scroll("results").offset = output.state.offset;

        watch
    }
}
