/*!
The pipeline driver (§4.4): primes a RIB from the leading bview files in
a time-ordered file list, then streams every file -- bviews replayed,
then the remaining updates -- through [`crate::engine::process_message`],
yielding the conflict stream to the caller.
*/

use crate::decode::{decode_line, InputFormat};
use crate::engine::{self, process_message, Conflict, DefaultRouteMode};
use crate::error::{CoreError, CoreResult};
use crate::models::{InternalMessage, MessageKind};
use crate::rib::Rib;
use crate::watcher::AsnWatchlist;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

fn read_lines(path: &Path) -> CoreResult<Vec<String>> {
    let file = File::open(path).map_err(|_| CoreError::MissingFile(path.to_path_buf()))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(CoreError::Io)
}

fn decode_file(format: InputFormat, collector: &str, lines: &[String]) -> Vec<InternalMessage> {
    lines
        .iter()
        .flat_map(|line| decode_line(format, collector, line))
        .collect()
}

pub struct Driver {
    pub collector: String,
    pub format: InputFormat,
    pub mode: DefaultRouteMode,
    pub watchlist: Option<AsnWatchlist>,
}

impl Driver {
    /// Primes `rib` from the head of `files`, then streams the rest
    /// (including the consumed bviews, replayed) through `process_message`,
    /// calling `on_conflict` for every conflict produced.
    pub fn run(
        &self,
        files: Vec<PathBuf>,
        rib: &mut Rib,
        mut on_conflict: impl FnMut(Conflict),
    ) -> CoreResult<()> {
        let mut queue: VecDeque<PathBuf> = files.into();
        let bviews = self.prime(&mut queue, rib)?;

        let is_watched: Option<Box<dyn Fn(&InternalMessage) -> bool>> = self
            .watchlist
            .as_ref()
            .map(|w| Box::new(w.as_predicate()) as Box<dyn Fn(&InternalMessage) -> bool>);

        for path in bviews.into_iter().chain(queue) {
            let lines = read_lines(&path)?;
            for msg in decode_file(self.format, &self.collector, &lines) {
                let outcome = process_message(
                    rib,
                    &msg,
                    self.mode,
                    is_watched.as_deref(),
                );
                if !outcome.defaults.is_empty() {
                    log::warn!("got a default route outside priming: {:?}", msg.prefix);
                }
                for conflict in outcome.conflicts {
                    on_conflict(conflict);
                }
            }
        }
        Ok(())
    }

    /// Priming phase: pop files from the head of the queue, installing
    /// every `F` entry directly (no conflict detection). Stops on the
    /// first file that isn't a pure bview and pushes it back. Fails if no
    /// bview was consumed at all.
    ///
    /// A decoded `Full`-kind message always carries an origin -- both
    /// decoders drop the row entirely on an unparseable AS-path rather
    /// than emit one with `origin: None` (matching the `try/except` around
    /// `get_as_origin` in the original table-dump and update readers) --
    /// so nothing here needs to special-case a missing origin.
    fn prime(&self, queue: &mut VecDeque<PathBuf>, rib: &mut Rib) -> CoreResult<Vec<PathBuf>> {
        let mut bviews = Vec::new();

        while let Some(path) = queue.pop_front() {
            let lines = read_lines(&path)?;
            let messages = decode_file(self.format, &self.collector, &lines);

            if messages.iter().any(|m| m.kind != MessageKind::Full) {
                queue.push_front(path);
                break;
            }

            for msg in &messages {
                if self.mode.is_default(&msg.prefix) {
                    log::warn!("got a default route in a bview: {:?}", msg.prefix);
                    continue;
                }
                engine::apply_announce(rib, msg);
            }
            bviews.push(path);
        }

        if bviews.is_empty() {
            return Err(CoreError::NoBviewsLoaded);
        }
        Ok(bviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_lines(lines: &[&str]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        f
    }

    fn bgpreader_driver() -> Driver {
        Driver {
            collector: "c".to_string(),
            format: InputFormat::Bgpreader,
            mode: DefaultRouteMode::Mask8,
            watchlist: None,
        }
    }

    #[test]
    fn priming_fails_with_no_bviews() {
        let driver = bgpreader_driver();
        let update_file = write_lines(&["U|W|2807|c|64496|127.0.0.1|1.2.0.0/16"]);
        let mut rib = Rib::new();
        let err = driver
            .run(vec![update_file.path().to_path_buf()], &mut rib, |_| {})
            .unwrap_err();
        assert!(matches!(err, CoreError::NoBviewsLoaded));
    }

    #[test]
    fn priming_installs_bview_then_streams_updates() {
        let driver = bgpreader_driver();
        let bview = write_lines(&[
            "R|R|2807|c|64496|127.0.0.1|1.2.0.0/16||64501 64497|18|2|NAG||||",
        ]);
        let update = write_lines(&[
            "U|A|2807|c|64496|127.0.0.1|1.2.0.0/16||64501 666|18|2|NAG||||",
        ]);
        let mut rib = Rib::new();
        let mut conflicts = Vec::new();
        driver
            .run(
                vec![bview.path().to_path_buf(), update.path().to_path_buf()],
                &mut rib,
                |c| conflicts.push(c),
            )
            .unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_with.asn, crate::models::Asn(64497));
    }

    #[test]
    fn bview_row_with_unparseable_as_path_is_dropped_not_fatal() {
        let driver = bgpreader_driver();
        // A full-table ("R|R") row with no AS-path field at all: the
        // decoder drops it (skip-and-warn) rather than surfacing a `None`
        // origin, so priming sees an empty-but-consumed bview file and
        // installs nothing, without treating this as an error.
        let bview = write_lines(&["R|R|2807|c|64496|127.0.0.1|1.2.0.0/16"]);
        let mut rib = Rib::new();
        driver
            .run(vec![bview.path().to_path_buf()], &mut rib, |_| {})
            .unwrap();
        assert_eq!(rib.node_count(), 0);
    }

    #[test]
    fn missing_file_is_a_critical_error() {
        let driver = bgpreader_driver();
        let mut rib = Rib::new();
        let err = driver
            .run(vec![PathBuf::from("/nonexistent/path")], &mut rib, |_| {})
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingFile(_)));
    }
}
