/*!
Pluggable output writers (§2 component 10). The CLI only needs an NDJSON
writer restricted to `ABNORMAL` records, but the trait exists so an
embedder can categorise into routes/hijacks/defaults as the original
parallel deployment did, without the core knowing about any of it.
*/

use super::records::ConflictRecord;
use crate::engine::Conflict;
use std::io::{self, Write};

pub trait ConflictWriter {
    fn write(&mut self, conflict: &Conflict) -> io::Result<()>;
}

/// Writes one JSON object per line to `sink`, restricted to `type ==
/// ABNORMAL` when `abnormal_only` is set -- the CLI default per §6.
pub struct JsonLinesWriter<W: Write> {
    sink: W,
    abnormal_only: bool,
    pretty: bool,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(sink: W, abnormal_only: bool, pretty: bool) -> Self {
        JsonLinesWriter {
            sink,
            abnormal_only,
            pretty,
        }
    }
}

impl<W: Write> ConflictWriter for JsonLinesWriter<W> {
    fn write(&mut self, conflict: &Conflict) -> io::Result<()> {
        let record = ConflictRecord::from(conflict);
        if self.abnormal_only && !record.is_abnormal() {
            return Ok(());
        }
        let line = if self.pretty {
            serde_json::to_string_pretty(&record)
        } else {
            serde_json::to_string(&record)
        }
        .map_err(io::Error::other)?;
        writeln!(self.sink, "{line}")
    }
}
