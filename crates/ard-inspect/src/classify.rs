use std::any::TypeId;

use ard_math::{Quat, Vec2, Vec3, Vec3A, Vec4};
use rustc_hash::FxHashMap;

use crate::{
    descriptor::{TypeDescriptor, TypeFlags},
    engine::{Graph, GraphNodeRef, SceneObject, TextureHandle},
};

/// Engine types that get hand authored children instead of generic struct handling.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EngineType {
    Vector2,
    Vector3,
    Vector4,
    Quaternion,
    Texture,
    SceneNode,
    NodeGraph,
    GraphNode,
}

/// Semantic category of a node. Fixed at node construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// The slot holds a null reference.
    Null,
    /// Reading the slot failed.
    Unavailable,
    Native,
    Enum,
    Collection,
    KeyValue,
    Tuple,
    Struct,
    Class,
    Interface,
    Pointer,
    Anonymous,
    Engine(EngineType),
    Unknown,
}

impl Category {
    /// Whether population can produce children for this category.
    pub fn is_composite(self) -> bool {
        match self {
            Category::Enum
            | Category::Collection
            | Category::KeyValue
            | Category::Tuple
            | Category::Struct
            | Category::Class
            | Category::Pointer => true,
            Category::Engine(engine) => engine != EngineType::Texture,
            Category::Null
            | Category::Unavailable
            | Category::Native
            | Category::Interface
            | Category::Anonymous
            | Category::Unknown => false,
        }
    }
}

/// Maps runtime types onto categories.
pub struct Classifier {
    special: FxHashMap<TypeId, EngineType>,
}

impl Default for Classifier {
    fn default() -> Self {
        let mut classifier = Self::empty();
        classifier.register::<Vec2>(EngineType::Vector2);
        classifier.register::<Vec3>(EngineType::Vector3);
        classifier.register::<Vec3A>(EngineType::Vector3);
        classifier.register::<Vec4>(EngineType::Vector4);
        classifier.register::<Quat>(EngineType::Quaternion);
        classifier.register::<TextureHandle>(EngineType::Texture);
        classifier.register::<SceneObject>(EngineType::SceneNode);
        classifier.register::<Graph>(EngineType::NodeGraph);
        classifier.register::<GraphNodeRef>(EngineType::GraphNode);
        classifier
    }
}

impl Classifier {
    /// A classifier without any special engine types.
    pub fn empty() -> Self {
        Self {
            special: FxHashMap::default(),
        }
    }

    /// Registers a host type that should be handled as an engine type. The type's `Inspect`
    /// implementation provides its children.
    pub fn register<T: ?Sized + 'static>(&mut self, engine: EngineType) {
        self.special.insert(TypeId::of::<T>(), engine);
    }

    /// First match wins. The special registry is checked before any generic rule so a more
    /// specific category is never shadowed.
    pub fn classify(&self, ty: &TypeDescriptor) -> Category {
        if let Some(engine) = self.special.get(&ty.id()) {
            return Category::Engine(*engine);
        }

        let flags = ty.flags();
        if flags.intersects(TypeFlags::PRIMITIVE | TypeFlags::TEXT) {
            Category::Native
        } else if flags.contains(TypeFlags::ENUM) {
            Category::Enum
        } else if flags.intersects(TypeFlags::ARRAY | TypeFlags::ENUMERABLE) {
            Category::Collection
        } else if flags.contains(TypeFlags::KEY_VALUE) {
            Category::KeyValue
        } else if flags.contains(TypeFlags::VALUE_TYPE) {
            if ty.is_tuple_shaped() {
                Category::Tuple
            } else if flags.contains(TypeFlags::ANONYMOUS) {
                Category::Anonymous
            } else {
                Category::Struct
            }
        } else if flags.contains(TypeFlags::INTERFACE) {
            Category::Interface
        } else if flags.contains(TypeFlags::POINTER) {
            Category::Pointer
        } else if flags.contains(TypeFlags::CLASS) {
            Category::Class
        } else {
            Category::Unknown
        }
    }
}
