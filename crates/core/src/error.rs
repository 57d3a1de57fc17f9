use std::path::PathBuf;
use thiserror::Error;

/// Environment-level failures. Any of these ends the run.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Per-file failures. These are logged where they happen and never abort the batch.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unparsable markup {path}: {reason}")]
    UnparsableMarkup { path: PathBuf, reason: String },

    #[error("unopenable document {path}: {reason}")]
    UnopenableDocument { path: PathBuf, reason: String },

    #[error("no extractor registered for extension: {0}")]
    UnsupportedExtension(String),
}
