use ard_inspect::{render::TreeStyle, session::UiSessionState, tree::Disclosure};
use ard_log::{debug, warn};

use crate::host::{EcsHost, SystemInfo};

/// Most name filters shown at once.
pub const MAX_FILTER_COUNT: usize = 5;

/// Name of the root of the system hierarchy.
pub const WORLD: &str = "World";

const SCROLL_PANEL: &str = "systems";

/// Highlight colors of the name filters, by filter index.
pub const FILTER_COLORS: [egui::Color32; MAX_FILTER_COUNT] = [
    egui::Color32::from_rgb(255, 166, 166),
    egui::Color32::from_rgb(166, 255, 166),
    egui::Color32::from_rgb(166, 166, 255),
    egui::Color32::from_rgb(255, 166, 255),
    egui::Color32::from_rgb(166, 255, 255),
];

#[inline]
pub fn filter_color(index: usize) -> egui::Color32 {
    FILTER_COLORS
        .get(index)
        .copied()
        .unwrap_or(egui::Color32::WHITE)
}

/// Index of a system inside of a [`SystemTree`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SystemId(usize);

#[derive(Debug)]
pub struct SystemNode {
    name: String,
    /// Lowercase name, for filtering.
    key: String,
    parent: Option<SystemId>,
    children: Vec<SystemId>,
    expanded: bool,
}

impl SystemNode {
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn parent(&self) -> Option<SystemId> {
        self.parent
    }

    #[inline(always)]
    pub fn children(&self) -> &[SystemId] {
        &self.children
    }

    #[inline(always)]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// The world's systems as a hierarchy rooted at [`WORLD`], children in execution order.
#[derive(Debug)]
pub struct SystemTree {
    nodes: Vec<SystemNode>,
}

impl SystemTree {
    pub fn new(groups: Vec<SystemInfo>) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let root = tree.push(WORLD.to_owned(), None);
        for group in groups {
            tree.insert(group, root);
        }
        tree
    }

    #[inline(always)]
    pub fn root(&self) -> SystemId {
        SystemId(0)
    }

    #[inline(always)]
    pub fn node(&self, id: SystemId) -> &SystemNode {
        &self.nodes[id.0]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the host reported no systems at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn toggle(&mut self, id: SystemId) {
        let node = &mut self.nodes[id.0];
        node.expanded = !node.expanded;
    }

    pub fn set_expanded(&mut self, id: SystemId, expanded: bool) {
        self.nodes[id.0].expanded = expanded;
    }

    /// Collapses `id` and everything below it.
    pub fn collapse(&mut self, id: SystemId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.expanded = false;
            stack.extend_from_slice(&node.children);
        }
    }

    pub fn disclosure(&self, id: SystemId) -> Disclosure {
        let node = self.node(id);
        if node.children.is_empty() {
            Disclosure::Leaf
        } else if node.expanded {
            Disclosure::Expanded
        } else {
            Disclosure::Collapsed
        }
    }

    pub fn label(&self, id: SystemId) -> String {
        format!("{}{}", self.disclosure(id).glyph(), self.node(id).name)
    }

    /// Whether `id` or any system below it has a name containing `needle`, ignoring case.
    pub fn subtree_contains(&self, id: SystemId, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.key.contains(&needle) {
                return true;
            }
            stack.extend_from_slice(&node.children);
        }
        false
    }

    /// Whether any system above `id` has a name containing `needle`, ignoring case.
    pub fn ancestors_contain(&self, id: SystemId, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let mut parent = self.node(id).parent;
        while let Some(id) = parent {
            let node = self.node(id);
            if node.key.contains(&needle) {
                return true;
            }
            parent = node.parent;
        }
        false
    }

    /// Rows to draw with the given filters, in draw order.
    ///
    /// A system is hidden, along with everything below it, when some filter is set and no filter
    /// matches the system, its subsystems or its parents. A system is colored by the first filter
    /// matching its own name. The root is always shown.
    pub fn visible_rows(&self, filters: &[String]) -> Vec<SystemRow> {
        let mut rows = Vec::new();
        self.collect_rows(self.root(), 0, filters, &mut rows);
        rows
    }

    fn collect_rows(
        &self,
        id: SystemId,
        depth: usize,
        filters: &[String],
        rows: &mut Vec<SystemRow>,
    ) {
        let mut highlight = None;
        if depth != 0 {
            let name = &self.node(id).key;
            let mut has_filter = false;
            let mut has_match = false;
            for (i, filter) in filters.iter().enumerate() {
                if filter.is_empty() {
                    continue;
                }
                has_filter = true;

                if highlight.is_none() && name.contains(&filter.to_lowercase()) {
                    highlight = Some(i);
                }
                if !has_match {
                    has_match =
                        self.subtree_contains(id, filter) || self.ancestors_contain(id, filter);
                }
                if highlight.is_some() && has_match {
                    break;
                }
            }

            if has_filter && !has_match {
                return;
            }
        }

        rows.push(SystemRow {
            id,
            depth,
            highlight,
        });

        let node = self.node(id);
        if node.expanded {
            for child in &node.children {
                self.collect_rows(*child, depth + 1, filters, rows);
            }
        }
    }

    fn insert(&mut self, info: SystemInfo, parent: SystemId) {
        let id = self.push(info.name, Some(parent));
        for child in info.children {
            self.insert(child, id);
        }
    }

    fn push(&mut self, name: String, parent: Option<SystemId>) -> SystemId {
        let id = SystemId(self.nodes.len());
        self.nodes.push(SystemNode {
            key: name.to_lowercase(),
            name,
            parent,
            children: Vec::new(),
            expanded: false,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }
}

/// One line of the systems panel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SystemRow {
    pub id: SystemId,
    pub depth: usize,
    /// Index of the filter coloring the row.
    pub highlight: Option<usize>,
}

/// Browser over the world's system execution order with up to [`MAX_FILTER_COUNT`] colored name
/// filters.
pub struct SystemsPanel {
    tree: SystemTree,
    filters: Vec<String>,
}

impl SystemsPanel {
    pub fn new(host: &dyn EcsHost) -> Self {
        let tree = SystemTree::new(host.systems());
        if tree.is_empty() {
            warn!("host reported no systems");
        } else {
            debug!("number of systems = {}", tree.len() - 1);
        }

        Self {
            tree,
            filters: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn tree(&self) -> &SystemTree {
        &self.tree
    }

    #[inline(always)]
    pub fn tree_mut(&mut self) -> &mut SystemTree {
        &mut self.tree
    }

    #[inline(always)]
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Re-reads the hierarchy from the host. Expansion state is reset.
    pub fn rebuild(&mut self, host: &dyn EcsHost) {
        self.tree = SystemTree::new(host.systems());
    }

    /// Adds an empty filter. Returns `false` when the maximum is reached.
    pub fn add_filter(&mut self) -> bool {
        if self.filters.len() >= MAX_FILTER_COUNT {
            return false;
        }
        self.filters.push(String::new());
        true
    }

    pub fn set_filter(&mut self, index: usize, text: impl Into<String>) {
        if let Some(filter) = self.filters.get_mut(index) {
            *filter = text.into();
        }
    }

    pub fn remove_filter(&mut self, index: usize) {
        if index < self.filters.len() {
            self.filters.remove(index);
        }
    }

    #[inline]
    pub fn visible_rows(&self) -> Vec<SystemRow> {
        self.tree.visible_rows(&self.filters)
    }

    pub fn show(&mut self, ui: &mut egui::Ui, session: &mut UiSessionState, style: &TreeStyle) {
        let mut removed = None;
        for (i, filter) in self.filters.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(filter).text_color(filter_color(i)));
                if ui.button("X").clicked() {
                    removed = Some(i);
                }
            });
        }
        if let Some(i) = removed {
            self.remove_filter(i);
        }

        ui.horizontal(|ui| {
            if self.filters.len() < MAX_FILTER_COUNT && ui.button("Add Filter").clicked() {
                self.add_filter();
            }
            if ui.button("Collapse All").clicked() {
                let root = self.tree.root();
                self.tree.collapse(root);
            }
        });

        if self.tree.is_empty() {
            ui.label("No systems reported by the world!");
            return;
        }

        let rows = self.visible_rows();
        let mut clicked = None;
        let offset = session.scroll(SCROLL_PANEL).offset;
        let output = egui::ScrollArea::both()
            .id_source(SCROLL_PANEL)
            .auto_shrink(false)
            .scroll_offset(offset)
            .show(ui, |ui| {
                for row in &rows {
                    ui.horizontal(|ui| {
                        ui.add_space(style.indent * row.depth as f32);

                        let mut text = egui::RichText::new(self.tree.label(row.id));
                        if let Some(filter) = row.highlight {
                            text = text.color(filter_color(filter));
                        }
                        if ui
                            .add(egui::Label::new(text).sense(egui::Sense::click()))
                            .clicked()
                        {
                            clicked = Some(row.id);
                        }
                    });
                }
            });
        session.scroll(SCROLL_PANEL).offset = output.state.offset;

        if let Some(id) = clicked {
            self.tree.toggle(id);
        }
    }
}
