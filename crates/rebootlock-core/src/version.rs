//! Store-assigned revision tokens.

use std::fmt;

/// Revision of a record as assigned by the coordination store.
///
/// Versions are opaque to the client beyond ordering: the store bumps the
/// version on every successful write, and a conditional replace only
/// succeeds when the caller presents the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    /// Wraps a raw store revision.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw store revision.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
