use std::{
    any::Any,
    borrow::Cow,
    fmt,
    ops::Deref,
    sync::{Arc, Weak},
};

use crate::{descriptor::TypeDescriptor, error::InspectError};

/// Result of reading a slot. `Ok(None)` is a null reference.
pub type Reflected = Result<Option<Value>, InspectError>;

/// Capability interface every inspectable value exposes.
///
/// Only `descriptor` is required. The remaining methods default to "atomic" behavior, and the
/// classifier decides which of them the tree actually calls for a given value.
pub trait Inspect: AsAny {
    /// Runtime type of this value.
    fn descriptor(&self) -> TypeDescriptor;

    /// Runtime type, or the reason it cannot be determined right now (e.g. a held lock).
    fn try_descriptor(&self) -> Result<TypeDescriptor, InspectError> {
        Ok(self.descriptor())
    }

    /// Text form of the value itself.
    fn display(&self) -> Result<String, InspectError> {
        Ok(self.descriptor().readable_name())
    }

    /// Name of a named engine object. `Some(Err(_))` means the object reports a destroyed state.
    fn object_name(&self) -> Option<Result<String, InspectError>> {
        None
    }

    /// Instance fields followed by instance properties, in declared order.
    fn members(&self) -> Result<Vec<Member>, InspectError> {
        Ok(Vec::new())
    }

    /// Forward iteration over the elements of a collection. May be called more than once.
    fn for_each_element(&self, _visit: &mut dyn FnMut(Reflected)) -> Result<(), InspectError> {
        Ok(())
    }

    /// Slot `index` of a tuple.
    fn tuple_item(&self, index: usize) -> Reflected {
        Err(InspectError::NoSuchItem(index))
    }

    /// Key and value of a key-value pair.
    fn key_value(&self) -> Option<(Reflected, Reflected)> {
        None
    }

    /// Raw address of a pointer or native handle. `Some(0)` is a null handle.
    fn address(&self) -> Option<usize> {
        None
    }
}

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shared handle to an inspected value.
///
/// The tree keeps these in its node slots. Plain data is a snapshot taken when the parent was
/// populated. Values shared through `Arc` stay live and are re-read every time they are
/// formatted or populated.
#[derive(Clone)]
pub struct Value(Arc<dyn Inspect>);

impl Value {
    #[inline]
    pub fn new<T: Inspect>(value: T) -> Self {
        Self(Arc::new(value))
    }

    #[inline]
    pub fn from_arc<T: Inspect>(value: Arc<T>) -> Self {
        Self(value)
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        // Through the trait object, not the `Arc` holding it.
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// `true` when both handles point at the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Value {
    type Target = dyn Inspect;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Deliberately shallow. Values may form cycles.
        f.debug_tuple("Value")
            .field(&self.0.descriptor().readable_name())
            .finish()
    }
}

/// Conversion of a field into a node slot.
pub trait Reflect {
    fn reflect(&self) -> Reflected;
}

impl<T: Inspect + Clone> Reflect for T {
    #[inline]
    fn reflect(&self) -> Reflected {
        Ok(Some(Value::new(self.clone())))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    #[inline]
    fn reflect(&self) -> Reflected {
        match self {
            Some(value) => value.reflect(),
            None => Ok(None),
        }
    }
}

impl<T: Inspect> Reflect for Arc<T> {
    #[inline]
    fn reflect(&self) -> Reflected {
        Ok(Some(Value::from_arc(self.clone())))
    }
}

impl<T: Inspect> Reflect for Weak<T> {
    fn reflect(&self) -> Reflected {
        match self.upgrade() {
            Some(value) => Ok(Some(Value::from_arc(value))),
            None => Err(InspectError::unavailable(crate::descriptor::readable_type_name(
                std::any::type_name::<T>(),
            ))),
        }
    }
}

impl Reflect for Value {
    #[inline]
    fn reflect(&self) -> Reflected {
        Ok(Some(self.clone()))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemberAccess {
    Field,
    Property { get: bool, set: bool },
}

/// A named slot of a struct or class.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: Cow<'static, str>,
    pub access: MemberAccess,
    pub value: Reflected,
}

impl Member {
    #[inline]
    pub fn field(name: impl Into<Cow<'static, str>>, value: &impl Reflect) -> Self {
        Self {
            name: name.into(),
            access: MemberAccess::Field,
            value: value.reflect(),
        }
    }

    #[inline]
    pub fn property(
        name: impl Into<Cow<'static, str>>,
        get: bool,
        set: bool,
        value: Reflected,
    ) -> Self {
        Self {
            name: name.into(),
            access: MemberAccess::Property { get, set },
            value,
        }
    }

    /// Member whose value was produced elsewhere (computed values, failed reads).
    #[inline]
    pub fn reflected(name: impl Into<Cow<'static, str>>, value: Reflected) -> Self {
        Self {
            name: name.into(),
            access: MemberAccess::Field,
            value,
        }
    }

    /// Display label. Properties list their accessors, e.g. `Foo { get; set; }`.
    pub fn label(&self) -> String {
        match self.access {
            MemberAccess::Field => self.name.to_string(),
            MemberAccess::Property { get, set } => format!(
                "{} {{{}{} }}",
                self.name,
                if get { " get;" } else { "" },
                if set { " set;" } else { "" },
            ),
        }
    }
}
