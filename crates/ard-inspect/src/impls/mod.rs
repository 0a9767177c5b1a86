mod builtin;
mod math;

pub use builtin::{InterfaceRef, KeyValue, Opaque};
