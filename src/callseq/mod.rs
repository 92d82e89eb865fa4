//! Call-sequence propagation.
//!
//! # Data Flow
//! ```text
//! inbound request headers (g-callsec: "A:/x;B:/y")
//!     → sequence.rs (split on ';', drop empty segments, de-duplicate)
//!     → tagger.rs (append "<application>:<route or caller>")
//!     → outbound header list (g-callsec: "A:/x;B:/y;C:/z")
//! ```
//!
//! # Design Decisions
//! - Pure, synchronous transform run once per outbound call
//! - De-duplication runs before the current identifier is appended, so a
//!   chain that revisits the same service and route shows it twice
//! - Inbound state is read-only and shared across concurrent fan-out calls

pub mod entry;
pub mod sequence;
pub mod tagger;

pub use entry::CallSequenceEntry;
pub use sequence::CallSequence;
pub use tagger::{outbound_call_sequence, tag_headers};

/// Header carrying the call sequence between services.
pub const CALL_SEQUENCE_HEADER: &str = "g-callsec";

/// Separator between entries in the wire form.
pub const ENTRY_SEPARATOR: char = ';';
