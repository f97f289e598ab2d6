use std::cell::RefCell;
use std::cmp::Ordering;
use std::io::{Read, Seek};

use zip::ZipArchive;

use crate::error::StorageError;

/// Byte source an archive is parsed from: a plain file for containers met on
/// the physical layer, an in-memory buffer for containers extracted out of
/// an enclosing archive.
pub(crate) trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Opened archive plus a snapshot of its file entry names.
///
/// Entry names are normalized and sorted at open time; enumeration works off
/// the snapshot so the archive handle is only borrowed while reading entry
/// bytes.
pub(crate) struct ZipContainer {
    archive: RefCell<ZipArchive<Box<dyn ReadSeek>>>,
    names: Vec<String>,
}

impl ZipContainer {
    /// Parses the archive and snapshots its file entry names.
    pub(crate) fn open(reader: Box<dyn ReadSeek>, path: &str) -> Result<Self, StorageError> {
        let mut archive =
            ZipArchive::new(reader).map_err(|source| StorageError::container_open(path, source))?;
        let mut names = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive
                .by_index(index)
                .map_err(|source| StorageError::container_open(path, source))?;
            if entry.is_file() {
                names.push(vpath::normalize(entry.name()));
            }
        }
        names.sort_by(|a, b| vpath::cmp_ignore_case(a, b).then_with(|| a.cmp(b)));
        Ok(Self {
            archive: RefCell::new(archive),
            names,
        })
    }

    /// Normalized, sorted file entry names.
    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    /// Finds the stored entry name equal to `relative`, ignoring ASCII case.
    pub(crate) fn find_entry(&self, relative: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| vpath::eq_ignore_case(name, relative))
            .map(String::as_str)
    }

    /// Reads the full content of the entry named `name` (a stored name, as
    /// returned by [`find_entry`](Self::find_entry)).
    pub(crate) fn read_entry(&self, name: &str, full: &str) -> Result<Vec<u8>, StorageError> {
        let mut archive = self.archive.borrow_mut();
        let mut entry = archive
            .by_name(name)
            .map_err(|_| StorageError::not_found(full))?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| StorageError::io(full, source))?;
        Ok(bytes)
    }
}

impl std::fmt::Debug for ZipContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipContainer")
            .field("entries", &self.names.len())
            .finish()
    }
}

/// Backing kind of a driver: the fixed, closed set of storage layers.
#[derive(Debug)]
pub(crate) enum DriverKind {
    /// Direct filesystem access. Only the root driver uses this kind.
    Physical,
    /// Archive-backed access below the driver's root path.
    Container(ZipContainer),
}

/// One resolution layer: the driver owning the sub-tree below `root_path`.
#[derive(Debug)]
pub(crate) struct Driver {
    /// Virtual path prefix this driver serves. Empty for the physical root;
    /// otherwise normalized with a trailing separator.
    pub(crate) root_path: String,
    /// Arena index of the driver this one was resolved through.
    pub(crate) parent: Option<usize>,
    pub(crate) kind: DriverKind,
}

/// Arena of drivers plus a sorted index for longest-prefix lookup.
///
/// Arena indices are stable for the life of the session; the sorted index
/// orders root paths ASCII case-insensitively for binary search.
#[derive(Debug)]
pub(crate) struct DriverSet {
    arena: Vec<Driver>,
    sorted: Vec<usize>,
}

impl DriverSet {
    /// Creates the set holding only the physical root driver at index 0.
    pub(crate) fn new() -> Self {
        Self {
            arena: vec![Driver {
                root_path: String::new(),
                parent: None,
                kind: DriverKind::Physical,
            }],
            sorted: vec![0],
        }
    }

    pub(crate) fn get(&self, index: usize) -> &Driver {
        &self.arena[index]
    }

    /// Returns the index of the driver registered for exactly `root_path`.
    pub(crate) fn find_exact(&self, root_path: &str) -> Option<usize> {
        self.sorted
            .binary_search_by(|&i| vpath::cmp_ignore_case(&self.arena[i].root_path, root_path))
            .ok()
            .map(|pos| self.sorted[pos])
    }

    /// Returns the driver with the longest root path prefixing `path`.
    ///
    /// The physical root always qualifies, so lookup cannot fail.
    pub(crate) fn closest(&self, path: &str) -> usize {
        let bound = self
            .sorted
            .partition_point(|&i| vpath::cmp_ignore_case(&self.arena[i].root_path, path) != Ordering::Greater);
        for &index in self.sorted[..bound].iter().rev() {
            let root = &self.arena[index].root_path;
            if root.is_empty() || vpath::starts_with_ignore_case(path, root) {
                return index;
            }
        }
        0
    }

    /// Registers a driver and returns its arena index.
    pub(crate) fn insert(&mut self, driver: Driver) -> usize {
        debug_assert!(self.find_exact(&driver.root_path).is_none());
        let index = self.arena.len();
        let position = self.sorted.partition_point(|&i| {
            vpath::cmp_ignore_case(&self.arena[i].root_path, &driver.root_path) == Ordering::Less
        });
        self.arena.push(driver);
        self.sorted.insert(position, index);
        index
    }
}
