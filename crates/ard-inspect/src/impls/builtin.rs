use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    sync::{Mutex, RwLock, TryLockError},
};

use smallvec::SmallVec;

use crate::{
    descriptor::{readable_type_name, TypeDescriptor, TypeFlags},
    error::InspectError,
    format::display_reflected,
    value::{Inspect, Member, Reflect, Reflected, Value},
};

////////////////
// Primitives //
////////////////

macro_rules! inspect_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                #[inline]
                fn descriptor(&self) -> TypeDescriptor {
                    TypeDescriptor::of::<$ty>(TypeFlags::PRIMITIVE | TypeFlags::VALUE_TYPE)
                }

                #[inline]
                fn display(&self) -> Result<String, InspectError> {
                    Ok(self.to_string())
                }
            }
        )*
    };
}

inspect_primitive!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl Inspect for () {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<()>(TypeFlags::PRIMITIVE | TypeFlags::VALUE_TYPE)
    }

    fn display(&self) -> Result<String, InspectError> {
        Ok(String::from("()"))
    }
}

macro_rules! inspect_text {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                #[inline]
                fn descriptor(&self) -> TypeDescriptor {
                    TypeDescriptor::of::<$ty>(TypeFlags::TEXT | TypeFlags::CLASS)
                }

                #[inline]
                fn display(&self) -> Result<String, InspectError> {
                    Ok(self.to_string())
                }
            }
        )*
    };
}

inspect_text!(String, &'static str, Cow<'static, str>);

/////////////////
// Collections //
/////////////////

macro_rules! inspect_sequence {
    ($flags:expr, [$($generics:tt)*], $ty:ty) => {
        impl<$($generics)*> Inspect for $ty {
            #[inline]
            fn descriptor(&self) -> TypeDescriptor {
                TypeDescriptor::of::<Self>($flags)
            }

            fn for_each_element(
                &self,
                visit: &mut dyn FnMut(Reflected),
            ) -> Result<(), InspectError> {
                self.iter().for_each(|element| visit(element.reflect()));
                Ok(())
            }
        }
    };
}

inspect_sequence!(
    TypeFlags::ARRAY | TypeFlags::ENUMERABLE | TypeFlags::CLASS,
    [T: Reflect + 'static],
    Vec<T>
);
inspect_sequence!(
    TypeFlags::ENUMERABLE | TypeFlags::CLASS,
    [T: Reflect + 'static],
    VecDeque<T>
);
inspect_sequence!(
    TypeFlags::ARRAY | TypeFlags::ENUMERABLE | TypeFlags::VALUE_TYPE,
    [T: Reflect + 'static, const N: usize],
    [T; N]
);
inspect_sequence!(
    TypeFlags::ARRAY | TypeFlags::ENUMERABLE | TypeFlags::VALUE_TYPE,
    [A: smallvec::Array<Item = T> + 'static, T: Reflect + 'static],
    SmallVec<A>
);
inspect_sequence!(
    TypeFlags::ENUMERABLE | TypeFlags::CLASS,
    [T: Reflect + 'static, S: 'static],
    HashSet<T, S>
);
inspect_sequence!(
    TypeFlags::ENUMERABLE | TypeFlags::CLASS,
    [T: Reflect + 'static],
    BTreeSet<T>
);

/// An entry of a map-like collection. Collections whose elements are pairs get flattened into
/// `[key] = value` rows.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct KeyValue<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> KeyValue<K, V> {
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: Reflect + 'static, V: Reflect + 'static> Inspect for KeyValue<K, V> {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>(TypeFlags::KEY_VALUE | TypeFlags::VALUE_TYPE)
    }

    fn display(&self) -> Result<String, InspectError> {
        Ok(format!(
            "[{}, {}]",
            display_reflected(&self.key.reflect()),
            display_reflected(&self.value.reflect())
        ))
    }

    fn members(&self) -> Result<Vec<Member>, InspectError> {
        Ok(vec![
            Member::field("Key", &self.key),
            Member::field("Value", &self.value),
        ])
    }

    fn key_value(&self) -> Option<(Reflected, Reflected)> {
        Some((self.key.reflect(), self.value.reflect()))
    }
}

macro_rules! inspect_map {
    ([$($generics:tt)*], $ty:ty) => {
        impl<$($generics)*> Inspect for $ty {
            #[inline]
            fn descriptor(&self) -> TypeDescriptor {
                TypeDescriptor::of::<Self>(TypeFlags::ENUMERABLE | TypeFlags::CLASS)
            }

            fn for_each_element(
                &self,
                visit: &mut dyn FnMut(Reflected),
            ) -> Result<(), InspectError> {
                for (key, value) in self.iter() {
                    visit(Ok(Some(Value::new(KeyValue::new(key.clone(), value.clone())))));
                }
                Ok(())
            }
        }
    };
}

inspect_map!(
    [K: Reflect + Clone + 'static, V: Reflect + Clone + 'static, S: 'static],
    HashMap<K, V, S>
);
inspect_map!(
    [K: Reflect + Clone + 'static, V: Reflect + Clone + 'static],
    BTreeMap<K, V>
);

////////////
// Tuples //
////////////

macro_rules! inspect_tuple {
    ($arity:literal => $($name:ident $idx:tt),+) => {
        impl<$($name: Reflect + 'static),+> Inspect for ($($name,)+) {
            #[inline]
            fn descriptor(&self) -> TypeDescriptor {
                TypeDescriptor::of::<Self>(TypeFlags::VALUE_TYPE).with_arity($arity)
            }

            fn display(&self) -> Result<String, InspectError> {
                let items = [$(display_reflected(&self.$idx.reflect())),+];
                Ok(format!("({})", items.join(", ")))
            }

            fn tuple_item(&self, index: usize) -> Reflected {
                match index {
                    $($idx => self.$idx.reflect(),)+
                    _ => Err(InspectError::NoSuchItem(index)),
                }
            }
        }
    };
}

inspect_tuple!(1 => A 0);
inspect_tuple!(2 => A 0, B 1);
inspect_tuple!(3 => A 0, B 1, C 2);
inspect_tuple!(4 => A 0, B 1, C 2, D 3);
inspect_tuple!(5 => A 0, B 1, C 2, D 3, E 4);
inspect_tuple!(6 => A 0, B 1, C 2, D 3, E 4, F 5);

////////////////////////////////
// Pointers and anonymous fns //
////////////////////////////////

macro_rules! inspect_pointer {
    ($($ptr:ty),*) => {
        $(
            impl<T: 'static> Inspect for $ptr {
                #[inline]
                fn descriptor(&self) -> TypeDescriptor {
                    TypeDescriptor::of::<Self>(TypeFlags::POINTER)
                }

                fn display(&self) -> Result<String, InspectError> {
                    Ok(format!("{:p}", *self))
                }

                #[inline]
                fn address(&self) -> Option<usize> {
                    Some(*self as usize)
                }
            }
        )*
    };
}

inspect_pointer!(*const T, *mut T);

impl<R: 'static> Inspect for fn() -> R {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>(TypeFlags::VALUE_TYPE | TypeFlags::ANONYMOUS)
    }
}

impl<A: 'static, R: 'static> Inspect for fn(A) -> R {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>(TypeFlags::VALUE_TYPE | TypeFlags::ANONYMOUS)
    }
}

/// Stand-in for a type erased slot (`Box<dyn Trait>` and friends). Interfaces carry no member
/// list that is safe across arbitrary implementations, so these never get children.
#[derive(Debug, Copy, Clone)]
pub struct InterfaceRef {
    descriptor: TypeDescriptor,
}

impl InterfaceRef {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(TypeFlags::INTERFACE),
        }
    }
}

impl Inspect for InterfaceRef {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }
}

/// Stand-in for a value of a type that exposes nothing.
#[derive(Debug, Copy, Clone)]
pub struct Opaque {
    descriptor: TypeDescriptor,
}

impl Opaque {
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<T>(TypeFlags::empty()),
        }
    }
}

impl Inspect for Opaque {
    #[inline]
    fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }
}

///////////
// Locks //
///////////

// Locks are read with `try_*` so a frame never blocks on a value the host is writing. The guard
// is only held for the duration of a single read.
macro_rules! inspect_lock {
    ($lock:ident, $acquire:ident) => {
        impl<T: Inspect> Inspect for $lock<T> {
            fn descriptor(&self) -> TypeDescriptor {
                match self.$acquire() {
                    Ok(inner) => inner.descriptor(),
                    Err(_) => TypeDescriptor::of::<T>(TypeFlags::CLASS),
                }
            }

            fn try_descriptor(&self) -> Result<TypeDescriptor, InspectError> {
                Ok(lock_err::<T, _>(self.$acquire())?.descriptor())
            }

            fn display(&self) -> Result<String, InspectError> {
                lock_err::<T, _>(self.$acquire())?.display()
            }

            fn object_name(&self) -> Option<Result<String, InspectError>> {
                match lock_err::<T, _>(self.$acquire()) {
                    Ok(inner) => inner.object_name(),
                    Err(err) => Some(Err(err)),
                }
            }

            fn members(&self) -> Result<Vec<Member>, InspectError> {
                lock_err::<T, _>(self.$acquire())?.members()
            }

            fn for_each_element(
                &self,
                visit: &mut dyn FnMut(Reflected),
            ) -> Result<(), InspectError> {
                lock_err::<T, _>(self.$acquire())?.for_each_element(visit)
            }

            fn tuple_item(&self, index: usize) -> Reflected {
                lock_err::<T, _>(self.$acquire())?.tuple_item(index)
            }

            fn key_value(&self) -> Option<(Reflected, Reflected)> {
                match lock_err::<T, _>(self.$acquire()) {
                    Ok(inner) => inner.key_value(),
                    Err(err) => Some((Err(err.clone()), Err(err))),
                }
            }

            fn address(&self) -> Option<usize> {
                self.$acquire().ok().and_then(|inner| inner.address())
            }
        }
    };
}

inspect_lock!(RwLock, try_read);
inspect_lock!(Mutex, try_lock);

fn lock_err<T: ?Sized, G>(result: Result<G, TryLockError<G>>) -> Result<G, InspectError> {
    let name = || readable_type_name(std::any::type_name::<T>());
    result.map_err(|err| match err {
        TryLockError::Poisoned(_) => InspectError::Poisoned(name()),
        TryLockError::WouldBlock => InspectError::Locked(name()),
    })
}
