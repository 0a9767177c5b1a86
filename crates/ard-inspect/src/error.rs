use thiserror::Error;

/// Reasons a single read from an inspected value can fail.
///
/// These never escape a node. Population and formatting convert them into a placeholder row so
/// the rest of the tree keeps rendering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InspectError {
    /// The value no longer exists in the host (entity destroyed, component removed, weak
    /// reference dropped).
    #[error("`{0}` is no longer available")]
    Unavailable(String),
    /// A member could not be read.
    #[error("unable to read `{member}`: {reason}")]
    Access { member: String, reason: String },
    /// A lock guarding the value was poisoned by a panicking writer.
    #[error("lock guarding `{0}` is poisoned")]
    Poisoned(String),
    /// A lock guarding the value is currently held elsewhere.
    #[error("`{0}` is locked")]
    Locked(String),
    /// The object reports a destroyed state.
    #[error("`{0}` has been destroyed")]
    Destroyed(String),
    /// A tuple slot outside of the tuple's arity was requested.
    #[error("tuple has no item at index {0}")]
    NoSuchItem(usize),
}

impl InspectError {
    pub fn access(member: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Access {
            member: member.into(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(what: impl Into<String>) -> Self {
        Self::Unavailable(what.into())
    }
}
