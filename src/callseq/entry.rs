//! A single `service:route` identifier.

use std::fmt;

/// One hop in a call sequence, of the form `"<service>:<route>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSequenceEntry(String);

impl CallSequenceEntry {
    /// Build the identifier for a call made by `service` while serving `route`.
    pub fn new(service: &str, route: &str) -> Self {
        Self(format!("{}:{}", service, route))
    }

    /// Wrap an entry read off the wire as-is.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallSequenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallSequenceEntry {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
