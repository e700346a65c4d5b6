/*!
error module defines the error types used throughout the detection pipeline.

The engine itself never raises: `process_message` ([`crate::engine::process_message`])
and the annotators in [`crate::annotate`] are total functions that return whatever
records they can compute, logging and dropping anything malformed along the way.
[`CoreError`] only surfaces at the pipeline boundary, where a handful of conditions
are genuinely unrecoverable: a missing input file, an empty bview set, unsortable
collector filenames, or a metadata file that can't be opened.
*/
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("input file not found: {0}")]
    MissingFile(PathBuf),

    #[error("no bview (table-dump) files were loaded before streaming updates")]
    NoBviewsLoaded,

    #[error("could not sort RIS filename {0:?}: expected (updates|bview).YYYYMMDD.HHMM")]
    UnsortableFilename(String),

    #[error("failed to open metadata file {path}: {source}")]
    MetadataOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metadata row in {path}: {reason}")]
    MetadataRow { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
