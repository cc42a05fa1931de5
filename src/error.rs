use std::path::PathBuf;

/// Errors produced while loading and converting notes.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The XML reader rejected the input.
    #[error("malformed note XML at byte {position}: {source}")]
    Malformed {
        position: u64,
        source: quick_xml::Error,
    },

    /// A last-change-date value no accepted format matches.
    #[error("unrecognized timestamp {value:?}")]
    Timestamp { value: String },

    /// The note file could not be read.
    #[error("cannot read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
