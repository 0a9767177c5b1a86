use std::sync::Arc;

use ard_inspect::{
    classify::Classifier,
    error::InspectError,
    render::{render_tree, TreeStyle},
    session::UiSessionState,
    tree::ObjectTree,
};
use ard_log::debug;

use crate::{
    component::{fetch_component, root_label, FetchState},
    host::{ComponentKind, ComponentType, EcsHost, Entity, EntityLabel},
};

/// What a watch can currently show.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchStatus {
    /// The entity no longer exists.
    Destroyed,
    NoSelection,
    /// The selected component was removed from the entity.
    ComponentRemoved,
    BufferEmpty,
    Error(InspectError),
    Ready,
}

/// One entity the user is watching, with the component they selected.
///
/// The component's tree is built once and kept until the selection or the buffer element
/// changes, so expansion state survives between frames.
pub struct EntityWatch {
    entity: Entity,
    label: EntityLabel,
    classifier: Arc<Classifier>,
    selected: Option<ComponentType>,
    buffer_index: usize,
    buffer_len: usize,
    tree: Option<ObjectTree>,
}

impl EntityWatch {
    pub fn new(entity: Entity, label: EntityLabel, classifier: Arc<Classifier>) -> Self {
        Self {
            entity,
            label,
            classifier,
            selected: None,
            buffer_index: 0,
            buffer_len: 0,
            tree: None,
        }
    }

    #[inline(always)]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    #[inline(always)]
    pub fn label(&self) -> &EntityLabel {
        &self.label
    }

    #[inline(always)]
    pub fn selected(&self) -> Option<&ComponentType> {
        self.selected.as_ref()
    }

    #[inline(always)]
    pub fn buffer_index(&self) -> usize {
        self.buffer_index
    }

    #[inline(always)]
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    #[inline(always)]
    pub fn tree(&self) -> Option<&ObjectTree> {
        self.tree.as_ref()
    }

    #[inline(always)]
    pub fn tree_mut(&mut self) -> Option<&mut ObjectTree> {
        self.tree.as_mut()
    }

    /// Selects a component. Reselecting the current component keeps the tree.
    pub fn select(&mut self, component: ComponentType) {
        if self.selected.as_ref() == Some(&component) {
            return;
        }

        debug!(
            "watching `{}` on entity {}",
            component.name, self.entity.index
        );
        self.selected = Some(component);
        self.buffer_index = 0;
        self.tree = None;
    }

    pub fn set_buffer_index(&mut self, index: usize) {
        if index != self.buffer_index {
            self.buffer_index = index;
            self.tree = None;
        }
    }

    pub fn next_element(&mut self) {
        self.set_buffer_index(self.buffer_index + 1);
    }

    pub fn previous_element(&mut self) {
        self.set_buffer_index(self.buffer_index.saturating_sub(1));
    }

    /// Checks the entity and selection against the host, and builds the tree if needed.
    pub fn refresh(&mut self, host: &dyn EcsHost) -> WatchStatus {
        if !host.is_alive(self.entity) {
            self.tree = None;
            return WatchStatus::Destroyed;
        }

        let component = match &self.selected {
            Some(component) => component.clone(),
            None => return WatchStatus::NoSelection,
        };

        if !host
            .components_of(self.entity)
            .iter()
            .any(|other| other.key == component.key)
        {
            self.tree = None;
            return WatchStatus::ComponentRemoved;
        }

        if self.tree.is_some() {
            return WatchStatus::Ready;
        }

        let fetch = fetch_component(host, self.entity, &component, self.buffer_index);
        self.buffer_len = fetch.buffer_len;
        if let Some(index) = fetch.buffer_index {
            self.buffer_index = index;
        }

        match fetch.state {
            FetchState::BufferEmpty => WatchStatus::BufferEmpty,
            FetchState::Error => {
                let err = match fetch.value {
                    Err(err) => err,
                    Ok(_) => InspectError::unavailable(component.name.clone()),
                };
                debug!("unable to read `{}`: {err}", component.name);
                WatchStatus::Error(err)
            }
            FetchState::Success => {
                self.tree = Some(ObjectTree::with_classifier(
                    self.classifier.clone(),
                    root_label(&component),
                    fetch.value,
                ));
                WatchStatus::Ready
            }
        }
    }

    /// Draws the watch. Returns `true` if the user closed it.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        host: &dyn EcsHost,
        session: &mut UiSessionState,
        style: &TreeStyle,
    ) -> bool {
        let mut close = false;
        ui.horizontal(|ui| {
            ui.label(self.label.text.as_str());
            close = ui.button("Close").clicked();
        });

        let status = self.refresh(host);
        if status == WatchStatus::Destroyed {
            ui.label("Entity Destroyed!");
            return close;
        }

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                for component in host.components_of(self.entity) {
                    if ui.button(component.name.as_str()).clicked() {
                        self.select(component);
                    }
                }
            });

            ui.vertical(|ui| self.show_component(ui, host, status, session, style));
        });

        close
    }

    fn show_component(
        &mut self,
        ui: &mut egui::Ui,
        host: &dyn EcsHost,
        status: WatchStatus,
        session: &mut UiSessionState,
        style: &TreeStyle,
    ) {
        match status {
            WatchStatus::Destroyed => {}
            WatchStatus::NoSelection => {
                ui.label("Select a component");
            }
            WatchStatus::ComponentRemoved => {
                ui.label("Component is removed!");
            }
            WatchStatus::BufferEmpty => {
                ui.label("No buffer elements");
            }
            WatchStatus::Error(err) => {
                ui.label(format!("Unable to read the component: {err}"));
            }
            WatchStatus::Ready => {
                let is_buffer = self
                    .selected
                    .as_ref()
                    .map_or(false, |component| component.kind == ComponentKind::Buffer);
                if is_buffer {
                    ui.horizontal(|ui| {
                        if ui.button("Previous").clicked() {
                            self.previous_element();
                        }
                        ui.label(format!(
                            "Element {}/{}",
                            self.buffer_index + 1,
                            self.buffer_len
                        ));
                        if ui.button("Next").clicked() {
                            self.next_element();
                        }
                    });

                    // Element changed this frame.
                    if self.tree.is_none() {
                        self.refresh(host);
                    }
                }

                let panel = format!("watch {}", self.entity.index);
                if let Some(tree) = &mut self.tree {
                    render_tree(ui, tree, session.scroll(&panel), style);
                }
            }
        }
    }
}
