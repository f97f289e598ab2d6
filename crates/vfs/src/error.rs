use std::io;

use thiserror::Error;
use zip::result::ZipError;

/// Failure produced while resolving a path through the virtual storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested path was empty or whitespace-only.
    #[error("storage path must not be empty")]
    EmptyPath,

    /// No physical file, directory, or container backs the requested path
    /// anywhere along its ancestry.
    #[error("path not found: '{path}'")]
    NotFound {
        /// The full requested path.
        path: String,
    },

    /// The archive backing a container driver could not be opened.
    #[error("failed to open container '{path}': {source}")]
    ContainerOpen {
        /// Path of the archive file.
        path: String,
        /// Parse failure reported by the archive reader.
        #[source]
        source: ZipError,
    },

    /// An underlying read failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn container_open(path: impl Into<String>, source: ZipError) -> Self {
        Self::ContainerOpen {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the path associated with the failure, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::EmptyPath => None,
            Self::NotFound { path } | Self::ContainerOpen { path, .. } | Self::Io { path, .. } => {
                Some(path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_full_path() {
        let error = StorageError::not_found("a/b.zip/c.txt");
        assert_eq!(error.to_string(), "path not found: 'a/b.zip/c.txt'");
        assert_eq!(error.path(), Some("a/b.zip/c.txt"));
    }

    #[test]
    fn io_error_exposes_source() {
        use std::error::Error as _;
        let error = StorageError::io("dir", io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(error.source().is_some());
        assert_eq!(error.path(), Some("dir"));
    }

    #[test]
    fn empty_path_has_no_associated_path() {
        assert_eq!(StorageError::EmptyPath.path(), None);
    }
}
