use std::sync::Arc;

use ard_inspect::{
    classify::Classifier,
    render::{render_tree, TreeStyle},
    session::UiSessionState,
    tree::ObjectTree,
    value::Value,
};
use ard_log::debug;

use crate::{fuzzy::fuzzy_matches, settings::ExplorerSettings};

/// A named value listed in an [`ObjectPanel`].
#[derive(Debug, Clone)]
pub struct PanelEntry {
    pub name: String,
    pub value: Value,
}

impl PanelEntry {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Browser over a fixed list of objects, such as game data or view prefabs. Selecting an
/// entry shows its tree with the root already expanded.
pub struct ObjectPanel {
    title: String,
    entries: Vec<PanelEntry>,
    classifier: Arc<Classifier>,
    filter: String,
    selected: Option<usize>,
    tree: Option<ObjectTree>,
}

impl ObjectPanel {
    pub fn new(
        title: impl Into<String>,
        entries: Vec<PanelEntry>,
        classifier: Arc<Classifier>,
    ) -> Self {
        Self {
            title: title.into(),
            entries,
            classifier,
            filter: String::new(),
            selected: None,
            tree: None,
        }
    }

    #[inline(always)]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline(always)]
    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    #[inline(always)]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[inline(always)]
    pub fn tree(&self) -> Option<&ObjectTree> {
        self.tree.as_ref()
    }

    #[inline(always)]
    pub fn tree_mut(&mut self) -> Option<&mut ObjectTree> {
        self.tree.as_mut()
    }

    /// Replaces the entries and drops the current selection.
    pub fn set_entries(&mut self, entries: Vec<PanelEntry>) {
        self.entries = entries;
        self.selected = None;
        self.tree = None;
    }

    /// Shows the entry at `index`. Selecting the current entry again keeps its tree.
    pub fn select(&mut self, index: usize) {
        if self.selected == Some(index) {
            return;
        }

        let entry = match self.entries.get(index) {
            Some(entry) => entry,
            None => return,
        };

        debug!("{}: showing `{}`", self.title, entry.name);
        self.tree = Some(
            ObjectTree::with_classifier(
                self.classifier.clone(),
                entry.name.clone(),
                Ok(Some(entry.value.clone())),
            )
            .expanded(),
        );
        self.selected = Some(index);
    }

    /// Indices of the entries matching the filter text, best match first.
    pub fn matching(&self, settings: &ExplorerSettings) -> Vec<usize> {
        let indexed: Vec<(usize, &str)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, entry.name.as_str()))
            .collect();

        if self.filter.is_empty() {
            return indexed.into_iter().map(|(i, _)| i).collect();
        }

        fuzzy_matches(
            &indexed,
            &self.filter,
            |entry| entry.1,
            settings.fuzzy_strategy,
            settings.fuzzy_max_length_difference,
        )
        .into_iter()
        .map(|(i, _)| *i)
        .collect()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &mut UiSessionState,
        settings: &ExplorerSettings,
        style: &TreeStyle,
    ) {
        ui.horizontal(|ui| {
            ui.label("Filter");
            ui.text_edit_singleline(&mut self.filter);
        });

        ui.horizontal_top(|ui| {
            let list_panel = format!("{} list", self.title);
            let offset = session.scroll(&list_panel).offset;
            let mut clicked = None;
            let output = egui::ScrollArea::vertical()
                .id_source(list_panel.as_str())
                .max_width(250.0)
                .auto_shrink(false)
                .scroll_offset(offset)
                .show(ui, |ui| {
                    for index in self.matching(settings) {
                        let name = self.entries[index].name.as_str();
                        if ui
                            .selectable_label(self.selected == Some(index), name)
                            .clicked()
                        {
                            clicked = Some(index);
                        }
                    }
                });
            session.scroll(&list_panel).offset = output.state.offset;

            if let Some(index) = clicked {
                self.select(index);
            }

            ui.vertical(|ui| match &mut self.tree {
                Some(tree) => {
                    render_tree(ui, tree, session.scroll(&self.title), style);
                }
                None => {
                    ui.label("Select an object");
                }
            });
        });
    }
}
