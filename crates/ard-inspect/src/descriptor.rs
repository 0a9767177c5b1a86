use std::any::TypeId;

use bitflags::bitflags;

bitflags! {
    /// Facts about a runtime type that the classifier dispatches on. Several may be set at once
    /// (a fixed size array is both a value type and an array), which is why classification
    /// follows a strict priority order.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u32 {
        const PRIMITIVE = 1 << 0;
        const TEXT = 1 << 1;
        const ENUM = 1 << 2;
        const ARRAY = 1 << 3;
        const ENUMERABLE = 1 << 4;
        const KEY_VALUE = 1 << 5;
        const VALUE_TYPE = 1 << 6;
        const CLASS = 1 << 7;
        const INTERFACE = 1 << 8;
        const POINTER = 1 << 9;
        const ANONYMOUS = 1 << 10;
    }
}

/// A single declared constant of a fieldless enum.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: &'static str,
    pub value: i64,
}

/// Runtime description of a type.
///
/// Built by each `Inspect` implementation for its own concrete type, so it always describes the
/// most derived type reachable through a value and never the static type of the slot holding it.
#[derive(Debug, Copy, Clone)]
pub struct TypeDescriptor {
    id: TypeId,
    type_name: &'static str,
    flags: TypeFlags,
    constants: &'static [EnumConstant],
    arity: usize,
}

impl TypeDescriptor {
    #[inline]
    pub fn of<T: ?Sized + 'static>(flags: TypeFlags) -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            flags,
            constants: &[],
            arity: 0,
        }
    }

    /// Marks the type as an enum with the provided constants, in declared order.
    #[inline]
    pub fn with_constants(mut self, constants: &'static [EnumConstant]) -> Self {
        self.flags |= TypeFlags::ENUM;
        self.constants = constants;
        self
    }

    /// Number of positional slots for tuple shaped types.
    #[inline]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    #[inline(always)]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline(always)]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline(always)]
    pub fn constants(&self) -> &'static [EnumConstant] {
        self.constants
    }

    #[inline(always)]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn is(&self, flags: TypeFlags) -> bool {
        self.flags.intersects(flags)
    }

    /// Type name with every module path stripped, generic arguments included.
    pub fn readable_name(&self) -> String {
        readable_type_name(self.type_name)
    }

    /// Rust tuples are named `(A, B, ..)`. Types explicitly named as tuples also count. Generic
    /// arguments are ignored, so `Wrapper<MyTuple>` is not a tuple.
    pub fn is_tuple_shaped(&self) -> bool {
        let name = self.readable_name();
        let base = name.split('<').next().unwrap_or_default();
        base.starts_with('(') || base.contains("Tuple")
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

/// Turns `alloc::vec::Vec<core::option::Option<i32>>` into `Vec<Option<i32>>`.
pub fn readable_type_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut segment = String::new();

    for chr in raw.chars() {
        if chr.is_alphanumeric() || matches!(chr, '_' | ':' | '{' | '}') {
            segment.push(chr);
        } else {
            push_last_segment(&mut out, &mut segment);
            out.push(chr);
        }
    }
    push_last_segment(&mut out, &mut segment);

    out
}

fn push_last_segment(out: &mut String, segment: &mut String) {
    if let Some(last) = segment.rsplit("::").next() {
        out.push_str(last);
    }
    segment.clear();
}
