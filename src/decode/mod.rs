//! Input normalisers: each turns one line of a specific wire format into
//! zero or more [`crate::models::InternalMessage`]s. Adding a new input
//! format means adding a module here and a CLI `--input-format` arm --
//! nothing downstream of [`crate::engine`] knows the format existed.

#[cfg(feature = "serde_json")]
pub mod mabo;

pub mod bgpreader;

/// The supported input formats, selected with `-i`/`--input-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    #[cfg(feature = "serde_json")]
    Mabo,
    Bgpreader,
}

/// Decodes one line in the given format.
pub fn decode_line(
    format: InputFormat,
    collector: &str,
    line: &str,
) -> Vec<crate::models::InternalMessage> {
    match format {
        #[cfg(feature = "serde_json")]
        InputFormat::Mabo => mabo::decode_line(collector, line),
        InputFormat::Bgpreader => bgpreader::decode_line(collector, line),
    }
}
