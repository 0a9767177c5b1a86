use std::{fmt, sync::Arc};

use static_assertions::assert_impl_all;

use crate::{
    descriptor::{TypeDescriptor, TypeFlags},
    error::InspectError,
    impls::KeyValue,
    value::{Inspect, Member, Reflect, Reflected, Value},
};

/// Fields of a graph node that are never shown. They point back at the owning graph or only
/// matter to the graph editor.
pub const HIDDEN_NODE_FIELDS: [&str; 2] = ["graph", "position"];

/// A texture the GUI can draw. Rendered as an inline image instead of a text row.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureHandle {
    pub id: egui::TextureId,
    pub size: egui::Vec2,
    pub name: String,
}

impl Inspect for TextureHandle {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>(TypeFlags::CLASS)
    }

    fn display(&self) -> Result<String, InspectError> {
        Ok(self.name.clone())
    }

    fn object_name(&self) -> Option<Result<String, InspectError>> {
        Some(Ok(self.name.clone()))
    }
}

/////////////////
// Scene graph //
/////////////////

/// An object of the host's scene graph.
pub trait SceneNode {
    /// Fails once the host has destroyed the object.
    fn name(&self) -> Result<String, InspectError>;

    fn components(&self) -> Vec<Value>;

    fn children(&self) -> Vec<SceneObject>;

    fn layer(&self) -> String;

    fn tag(&self) -> String;

    fn is_static(&self) -> bool;

    fn transform(&self) -> Reflected;

    /// A rendered preview of the object, if the host can produce one.
    fn thumbnail(&self) -> Option<TextureHandle>;
}

/// Shared handle to a scene graph object.
#[derive(Clone)]
pub struct SceneObject(pub Arc<dyn SceneNode>);

impl SceneObject {
    pub fn new(node: impl SceneNode + 'static) -> Self {
        Self(Arc::new(node))
    }
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SceneObject").field(&self.0.name().ok()).finish()
    }
}

impl Inspect for SceneObject {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>(TypeFlags::CLASS)
    }

    fn object_name(&self) -> Option<Result<String, InspectError>> {
        Some(self.0.name())
    }

    fn members(&self) -> Result<Vec<Member>, InspectError> {
        let name = self.0.name()?;
        let thumbnail = self.0.thumbnail();

        Ok(vec![
            Member::field("Components", &self.0.components()),
            Member::field("Children", &self.0.children()),
            Member::field("Layer", &self.0.layer()),
            Member::field("Tag", &self.0.tag()),
            Member::field("IsStatic", &self.0.is_static()),
            Member::reflected("Transform", self.0.transform()),
            Member::field(name, &thumbnail),
        ])
    }
}

/////////////////
// Node graphs //
/////////////////

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

/// A port on the other end of a connection.
#[derive(Debug, Clone)]
pub struct Connection {
    pub direction: PortDirection,
    pub node: GraphNodeRef,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub field_name: String,
    pub direction: PortDirection,
    pub connections: Vec<Connection>,
}

/// A visual scripting graph.
pub trait NodeGraph {
    fn name(&self) -> Result<String, InspectError>;

    fn nodes(&self) -> Vec<GraphNodeRef>;
}

/// A node of a visual scripting graph.
pub trait GraphNode {
    fn name(&self) -> Result<String, InspectError>;

    /// The node's own data fields.
    fn fields(&self) -> Result<Vec<Member>, InspectError>;

    /// Node specific fields that should be hidden in addition to [`HIDDEN_NODE_FIELDS`].
    fn hidden_fields(&self) -> &[&'static str] {
        &[]
    }

    /// Every port registered on the node, connected or not.
    fn ports(&self) -> Vec<Port>;
}

#[derive(Clone)]
pub struct Graph(pub Arc<dyn NodeGraph>);

#[derive(Clone)]
pub struct GraphNodeRef(pub Arc<dyn GraphNode>);

impl Graph {
    pub fn new(graph: impl NodeGraph + 'static) -> Self {
        Self(Arc::new(graph))
    }
}

impl GraphNodeRef {
    pub fn new(node: impl GraphNode + 'static) -> Self {
        Self(Arc::new(node))
    }

    /// Connected nodes for every port with at least one connection, keyed by port name. Each
    /// port's connections are ordered by the connected port's direction, outputs first.
    pub fn connections(&self) -> Vec<KeyValue<String, Vec<GraphNodeRef>>> {
        self.0
            .ports()
            .into_iter()
            .filter(|port| !port.connections.is_empty())
            .map(|mut port| {
                port.connections
                    .sort_by(|a, b| b.direction.cmp(&a.direction));
                let nodes = port.connections.into_iter().map(|c| c.node).collect();
                KeyValue::new(port.field_name, nodes)
            })
            .collect()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Graph").field(&self.0.name().ok()).finish()
    }
}

impl fmt::Debug for GraphNodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GraphNodeRef")
            .field(&self.0.name().ok())
            .finish()
    }
}

impl Inspect for Graph {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>(TypeFlags::CLASS)
    }

    fn object_name(&self) -> Option<Result<String, InspectError>> {
        Some(self.0.name())
    }

    fn members(&self) -> Result<Vec<Member>, InspectError> {
        Ok(vec![Member::field("Nodes", &self.0.nodes())])
    }
}

impl Inspect for GraphNodeRef {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>(TypeFlags::CLASS)
    }

    fn object_name(&self) -> Option<Result<String, InspectError>> {
        Some(self.0.name())
    }

    fn members(&self) -> Result<Vec<Member>, InspectError> {
        let hidden = self.0.hidden_fields();
        let mut members: Vec<Member> = self
            .0
            .fields()?
            .into_iter()
            .filter(|member| {
                let name = member.name.as_ref();
                !HIDDEN_NODE_FIELDS.contains(&name) && !hidden.contains(&name)
            })
            .collect();
        members.push(Member::field("Connections", &self.connections()));
        Ok(members)
    }
}

assert_impl_all!(SceneObject: Reflect);
assert_impl_all!(Graph: Reflect);
assert_impl_all!(GraphNodeRef: Reflect);
