use std::fmt;

use ard_inspect::value::Reflected;
use serde::{Deserialize, Serialize};

/// Handle to an entity of the host's world.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    pub index: u32,
    pub version: u32,
}

impl Entity {
    #[inline]
    pub const fn new(index: u32, version: u32) -> Self {
        Self { index, version }
    }
}

/// How a component is stored on an entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// One value per entity.
    Data,
    /// One value shared by every entity in a chunk.
    SharedData,
    /// A dynamically sized list of elements.
    Buffer,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComponentKind::Data => "Data",
            ComponentKind::SharedData => "SharedData",
            ComponentKind::Buffer => "Buffer",
        })
    }
}

/// A component type registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentType {
    /// Stable identifier. Persisted in favourite queries.
    pub key: String,
    /// Readable name shown in lists.
    pub name: String,
    pub kind: ComponentKind,
}

impl ComponentType {
    pub fn new(key: impl Into<String>, name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Component keys an entity must have all of, at least one of, and none of.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityQuery {
    pub all: Vec<String>,
    pub any: Vec<String>,
    pub none: Vec<String>,
}

impl EntityQuery {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.any.is_empty() && self.none.is_empty()
    }
}

/// A system or system group, with its subsystems in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub name: String,
    pub children: Vec<SystemInfo>,
}

impl SystemInfo {
    pub fn new(name: impl Into<String>, children: Vec<SystemInfo>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// The explorer's view of a running ECS world.
///
/// Every method is called from the UI thread while a frame is being built. Reads must not
/// block on systems that are currently running.
pub trait EcsHost {
    /// Every component type the explorer can query for.
    fn component_types(&self) -> Vec<ComponentType>;

    fn query(&self, query: &EntityQuery) -> Vec<Entity>;

    fn is_alive(&self, entity: Entity) -> bool;

    fn components_of(&self, entity: Entity) -> Vec<ComponentType>;

    /// Reads a `Data` or `SharedData` component.
    fn read_component(&self, entity: Entity, component: &ComponentType) -> Reflected;

    /// Number of elements of a `Buffer` component.
    fn buffer_len(&self, entity: Entity, component: &ComponentType) -> usize;

    fn read_buffer_element(
        &self,
        entity: Entity,
        component: &ComponentType,
        index: usize,
    ) -> Reflected;

    /// Game specific name of an entity, e.g. `Player - Ard`.
    fn display_name(&self, _entity: Entity) -> Option<String> {
        None
    }

    /// Top level system groups of the world in execution order.
    fn systems(&self) -> Vec<SystemInfo> {
        Vec::new()
    }
}

/// Labels shown for an entity in query results and watch headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLabel {
    /// `Entity {index}`, followed by ` ({name})` when a name is known.
    pub text: String,
    /// `Entity {index} - {component count}`, followed by ` ({name})` when a name is known.
    pub text_with_count: String,
}

impl EntityLabel {
    pub fn new(host: &dyn EcsHost, entity: Entity) -> Self {
        let components = host.components_of(entity);
        let name = host
            .display_name(entity)
            .or_else(|| fallback_name(&components));

        let mut text = format!("Entity {}", entity.index);
        let mut text_with_count = format!("Entity {} - {}", entity.index, components.len());
        if let Some(name) = name {
            text.push_str(&format!(" ({name})"));
            text_with_count.push_str(&format!(" ({name})"));
        }

        Self {
            text,
            text_with_count,
        }
    }
}

/// Singleton components (named `S...`) identify an entity best. Otherwise an entity with a
/// single component is named after it.
fn fallback_name(components: &[ComponentType]) -> Option<String> {
    let singletons: Vec<&str> = components
        .iter()
        .filter(|component| component.name.to_uppercase().starts_with('S'))
        .map(|component| component.name.as_str())
        .collect();

    if !singletons.is_empty() {
        Some(singletons.join(", "))
    } else if let [only] = components {
        Some(only.name.clone())
    } else {
        None
    }
}
