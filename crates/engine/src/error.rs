use std::io;

use filters::{EnumerateError, PatternError, UnmatchedFile};
use thiserror::Error;
use vfs::StorageError;
use zip::result::ZipError;

/// Failure produced by the packaging pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The manifest file could not be read.
    #[error("failed to read manifest '{path}': {source}")]
    ManifestIo {
        /// Manifest path.
        path: String,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },

    /// The manifest document could not be parsed.
    #[error("failed to parse manifest '{path}': {source}")]
    ManifestParse {
        /// Manifest path.
        path: String,
        /// Parse failure reported by the JSON reader.
        #[source]
        source: serde_json::Error,
    },

    /// A manifest rule's pattern text is invalid.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Path resolution through the storage layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A path matched no rule under the unmatched-error policy.
    #[error(transparent)]
    Unmatched(#[from] UnmatchedFile),

    /// The output archive writer failed.
    #[error("failed to write output archive: {source}")]
    OutputZip {
        /// Failure reported by the archive writer.
        #[source]
        source: ZipError,
    },

    /// Copying a selected stream into the output failed.
    #[error("failed to copy '{path}' into the output archive: {source}")]
    OutputIo {
        /// Source path being copied.
        path: String,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },
}

impl From<EnumerateError> for EngineError {
    fn from(error: EnumerateError) -> Self {
        match error {
            EnumerateError::Unmatched(unmatched) => Self::Unmatched(unmatched),
            EnumerateError::Storage(storage) => Self::Storage(storage),
        }
    }
}
