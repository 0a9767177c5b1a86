use ard_inspect::value::Reflected;

use crate::host::{ComponentKind, ComponentType, EcsHost, Entity};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FetchState {
    Success,
    /// The component is a buffer without any elements.
    BufferEmpty,
    /// The component could not be read.
    Error,
}

/// Result of reading one component of an entity.
#[derive(Debug, Clone)]
pub struct ComponentFetch {
    pub state: FetchState,
    pub value: Reflected,
    /// Element count for buffers. Zero otherwise.
    pub buffer_len: usize,
    /// The element actually read, after clamping. `None` when nothing was read from a buffer.
    pub buffer_index: Option<usize>,
}

/// Reads `component` from `entity`. For buffers the requested index is clamped to the last
/// element.
pub fn fetch_component(
    host: &dyn EcsHost,
    entity: Entity,
    component: &ComponentType,
    buffer_index: usize,
) -> ComponentFetch {
    let (value, buffer_len, buffer_index) = match component.kind {
        ComponentKind::Data | ComponentKind::SharedData => {
            (host.read_component(entity, component), 0, None)
        }
        ComponentKind::Buffer => {
            let len = host.buffer_len(entity, component);
            if len == 0 {
                return ComponentFetch {
                    state: FetchState::BufferEmpty,
                    value: Ok(None),
                    buffer_len: 0,
                    buffer_index: None,
                };
            }

            let index = buffer_index.min(len - 1);
            (
                host.read_buffer_element(entity, component, index),
                len,
                Some(index),
            )
        }
    };

    ComponentFetch {
        state: if value.is_ok() {
            FetchState::Success
        } else {
            FetchState::Error
        },
        value,
        buffer_len,
        buffer_index,
    }
}

/// Name of the root node of a component's tree.
pub fn root_label(component: &ComponentType) -> String {
    format!("{} ({})", component.name, component.kind)
}
