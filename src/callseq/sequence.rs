//! Ordered, de-duplicated chain of call identifiers.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::callseq::{CallSequenceEntry, ENTRY_SEPARATOR};

/// Ordered list of hops a request has travelled through.
///
/// Entries ingested from the wire are de-duplicated keeping the first
/// occurrence. [`CallSequence::push`] appends without de-duplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSequence {
    entries: Vec<CallSequenceEntry>,
}

impl CallSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from one or more raw header values.
    ///
    /// Each value is split on `;`. Empty segments are dropped, the rest are
    /// kept verbatim and de-duplicated in first-seen order across all values.
    pub fn from_header_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for value in values {
            for segment in value.split(ENTRY_SEPARATOR) {
                if segment.is_empty() {
                    continue;
                }
                if seen.insert(segment) {
                    entries.push(CallSequenceEntry::from_raw(segment));
                }
            }
        }

        Self { entries }
    }

    /// Append an entry at the end of the chain.
    pub fn push(&mut self, entry: CallSequenceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CallSequenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last hop in the chain, if any.
    pub fn last(&self) -> Option<&CallSequenceEntry> {
        self.entries.last()
    }

    /// Wire form: entries joined by `;`.
    pub fn to_header_value(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(ENTRY_SEPARATOR);
            }
            out.push_str(entry.as_str());
        }
        out
    }
}

impl fmt::Display for CallSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

impl FromStr for CallSequence {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_header_values([s]))
    }
}
