pub mod component;
pub mod fuzzy;
pub mod host;
pub mod panel;
pub mod query;
pub mod settings;
pub mod systems;
pub mod watch;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use ard_inspect::{classify::Classifier, session::UiSessionState};
use ard_log::warn;

use crate::{
    host::EcsHost,
    panel::ObjectPanel,
    query::QueryBuilder,
    settings::ExplorerSettings,
    systems::SystemsPanel,
    watch::EntityWatch,
};

/// Everything the explorer keeps between frames. Created by the host and passed to `show`
/// every frame.
pub struct ExplorerSession {
    pub settings: ExplorerSettings,
    pub ui: UiSessionState,
    pub query: QueryBuilder,
    pub watches: Vec<EntityWatch>,
    pub panels: Vec<ObjectPanel>,
    pub systems: SystemsPanel,
    classifier: Arc<Classifier>,
}

impl ExplorerSession {
    pub fn new(settings: ExplorerSettings, host: &dyn EcsHost) -> Self {
        Self::with_classifier(settings, host, Arc::new(Classifier::default()))
    }

    /// Uses a classifier with additional host types registered.
    pub fn with_classifier(
        settings: ExplorerSettings,
        host: &dyn EcsHost,
        classifier: Arc<Classifier>,
    ) -> Self {
        let mut query = QueryBuilder::new(host);
        if settings.favourites_path.exists() {
            if let Err(err) = query.load_favourites(&settings.favourites_path) {
                warn!("unable to load favourite queries: {err}");
            }
        }

        Self {
            settings,
            ui: UiSessionState::new(),
            query,
            watches: Vec::new(),
            panels: Vec::new(),
            systems: SystemsPanel::new(host),
            classifier,
        }
    }

    #[inline(always)]
    pub fn classifier(&self) -> &Arc<Classifier> {
        &self.classifier
    }

    pub fn add_panel(&mut self, panel: ObjectPanel) {
        self.panels.push(panel);
    }

    /// Draws the entity query window with the watched entities, the systems window, and one
    /// window per object panel.
    pub fn show(&mut self, ctx: &egui::Context, host: &dyn EcsHost) {
        let style = self.settings.tree_style();

        egui::Window::new("Entity Query").show(ctx, |ui| {
            let watch = self.query.show(ui, host, &mut self.ui, &self.settings);
            if let Some(result) = watch {
                self.watches.push(EntityWatch::new(
                    result.entity,
                    result.label,
                    self.classifier.clone(),
                ));
            }

            if self.watches.is_empty() {
                return;
            }

            ui.separator();
            let mut closed = Vec::new();
            for (i, watch) in self.watches.iter_mut().enumerate() {
                ui.push_id(i, |ui| {
                    if watch.show(ui, host, &mut self.ui, &style) {
                        closed.push(i);
                    }
                });
                ui.separator();
            }

            for i in closed.into_iter().rev() {
                let watch = self.watches.remove(i);
                self.ui.forget(&format!("watch {}", watch.entity().index));
            }
        });

        egui::Window::new("Systems").show(ctx, |ui| {
            self.systems.show(ui, &mut self.ui, &style);
        });

        for panel in &mut self.panels {
            egui::Window::new(panel.title().to_owned()).show(ctx, |ui| {
                panel.show(ui, &mut self.ui, &self.settings, &style);
            });
        }
    }
}
