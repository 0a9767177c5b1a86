// Lets the derive macro refer to `::ard_inspect` from inside this crate as well.
extern crate self as ard_inspect;

pub mod classify;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod format;
pub mod impls;
pub mod populate;
pub mod render;
pub mod session;
pub mod tree;
pub mod value;


pub use ard_inspect_derive::Inspect;

pub mod prelude {
    pub use crate::classify::Category;
    pub use crate::classify::Classifier;
    pub use crate::classify::EngineType;
    pub use crate::descriptor::EnumConstant;
    pub use crate::descriptor::TypeDescriptor;
    pub use crate::descriptor::TypeFlags;
    pub use crate::engine::GraphNode;
    pub use crate::engine::GraphNodeRef;
    pub use crate::engine::Graph;
    pub use crate::engine::NodeGraph;
    pub use crate::engine::SceneNode;
    pub use crate::engine::SceneObject;
    pub use crate::engine::TextureHandle;
    pub use crate::error::InspectError;
    pub use crate::impls::InterfaceRef;
    pub use crate::impls::KeyValue;
    pub use crate::impls::Opaque;
    pub use crate::render::render_tree;
    pub use crate::render::RenderOutput;
    pub use crate::render::TreeStyle;
    pub use crate::session::ScrollState;
    pub use crate::session::UiSessionState;
    pub use crate::tree::Disclosure;
    pub use crate::tree::NodeId;
    pub use crate::tree::NodeValue;
    pub use crate::tree::ObjectTree;
    pub use crate::value::Inspect;
    pub use crate::value::Member;
    pub use crate::value::MemberAccess;
    pub use crate::value::Reflect;
    pub use crate::value::Reflected;
    pub use crate::value::Value;
    pub use ard_inspect_derive::Inspect;
}
