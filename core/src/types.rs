use std::io;

use thiserror::Error;

/// Unified stream error covering source discovery, I/O, transforms and caller contracts.
/// - `From<io::Error>` enables `?` across the pipeline.
/// - `SourceNotFound` is kept apart from every other failure so callers can map it to "not found".
#[derive(Debug, Error)]
pub enum StreamError {
    /// The requested content source does not exist.
    #[error("source not found: {name}")]
    SourceNotFound { name: String },

    /// The content source exists but could not be opened.
    #[error("cannot open source {name}: {source}")]
    SourceOpen {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Caller broke an API contract (e.g. placeholder/source count mismatch).
    #[error("contract violation: {0}")]
    Contract(String),

    /// A chunk transform failed mid-stream.
    #[error("transform failed: {0}")]
    Transform(String),

    /// Read or write failure once streaming has started.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A source or target name was rejected before any I/O happened.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// The wrapper document could not be built.
    #[error("template error: {0}")]
    Template(String),
}

impl StreamError {
    /// Classify an `open()` failure for the named source.
    pub fn from_open(name: impl Into<String>, e: io::Error) -> Self {
        let name = name.into();
        if e.kind() == io::ErrorKind::NotFound {
            StreamError::SourceNotFound { name }
        } else {
            StreamError::SourceOpen { name, source: e }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StreamError::SourceNotFound { .. })
    }

    pub fn placeholder_mismatch(placeholders: usize, supplied: usize) -> Self {
        StreamError::Contract(format!(
            "template has {placeholders} placeholder(s) but {supplied} content source(s) were supplied"
        ))
    }
}
