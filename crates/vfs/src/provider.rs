use std::io::Read;

use crate::error::StorageError;

/// Storage provider contract consumed by the filtering and packaging layers.
///
/// The default implementation is [`VirtualStorage`](crate::VirtualStorage);
/// callers may substitute a stub for testing. Paths are full path strings
/// that may textually cross container boundaries.
pub trait FileStorage {
    /// Opens `full_path` for reading. The path may address an entry inside a
    /// container (or inside nested containers).
    ///
    /// The returned stream is an independent resource owned by the caller.
    fn open_read(&self, full_path: &str) -> Result<Box<dyn Read>, StorageError>;

    /// Enumerates the full path of every file below `full_directory_path`,
    /// including files served out of containers encountered along the way.
    ///
    /// The sequence is lazy and single-pass; errors encountered mid-stream
    /// are yielded as items and terminate the enumeration.
    fn enumerate_files<'a>(
        &'a self,
        full_directory_path: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<String, StorageError>> + 'a>, StorageError>;
}
