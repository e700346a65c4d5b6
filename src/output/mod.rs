//! Output record shaping and writers (§6), gated on `serde`/`serde_json`
//! since they're the only consumers of JSON encoding in this crate.

#[cfg(all(feature = "serde", feature = "serde_json"))]
pub mod records;
#[cfg(all(feature = "serde", feature = "serde_json"))]
pub mod writers;

#[cfg(all(feature = "serde", feature = "serde_json"))]
pub use records::ConflictRecord;
#[cfg(all(feature = "serde", feature = "serde_json"))]
pub use writers::{ConflictWriter, JsonLinesWriter};
