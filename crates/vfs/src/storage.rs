use std::cell::RefCell;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

#[cfg(debug_assertions)]
use std::{cell::Cell, rc::Rc};

use tracing::debug;

use crate::driver::{Driver, DriverKind, DriverSet, ReadSeek, ZipContainer};
use crate::error::StorageError;
use crate::iter::FileIter;
use crate::options::ContainerOptions;
use crate::provider::FileStorage;

/// A virtual storage session.
///
/// The session owns the driver registry. Container drivers are created
/// lazily while paths are resolved and are dropped together when the session
/// is dropped; nothing is released mid-session. The session is intended for
/// a single logical thread and uses no locking.
pub struct VirtualStorage {
    options: ContainerOptions,
    drivers: RefCell<DriverSet>,
    #[cfg(debug_assertions)]
    open_streams: Rc<Cell<usize>>,
}

impl Default for VirtualStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualStorage {
    /// Creates a session with every container kind enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates a session with an explicit container policy.
    #[must_use]
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            options,
            drivers: RefCell::new(DriverSet::new()),
            #[cfg(debug_assertions)]
            open_streams: Rc::new(Cell::new(0)),
        }
    }

    /// The container policy this session resolves with.
    #[must_use]
    pub fn options(&self) -> ContainerOptions {
        self.options
    }

    /// Number of read streams handed out and not yet dropped.
    ///
    /// Debug builds only; the production build does not track streams.
    #[cfg(debug_assertions)]
    #[must_use]
    pub fn open_stream_count(&self) -> usize {
        self.open_streams.get()
    }

    /// Opens `full_path` for reading, crossing container boundaries as
    /// needed.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when nothing along the path's ancestry
    /// backs it (including a path that resolves to a directory);
    /// [`StorageError::ContainerOpen`] when a container along the way cannot
    /// be parsed.
    pub fn open_read(&self, full_path: &str) -> Result<Box<dyn Read>, StorageError> {
        if full_path.trim().is_empty() {
            return Err(StorageError::EmptyPath);
        }
        let path = vpath::normalize(full_path);

        // Fast path: a plain file on the physical layer.
        if Path::new(&path).is_file() {
            return self.open_physical(&path);
        }

        let index = self.drivers.borrow().closest(&path);
        let root_len = self.driver_root(index).len();
        let relative = path[root_len..].to_owned();
        self.resolve_open(index, &relative, &path)
    }

    /// Enumerates the full path of every file below `full_directory_path`.
    ///
    /// Files are yielded depth-first in deterministic order; every file that
    /// qualifies as a container has its entries interleaved directly after
    /// it. The requested path may itself address a container or a directory
    /// inside one.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when the path has no physical or
    /// container-backed existence along its ancestry.
    pub fn enumerate_files(&self, full_directory_path: &str) -> Result<FileIter<'_>, StorageError> {
        if full_directory_path.trim().is_empty() {
            return Err(StorageError::EmptyPath);
        }
        let dir = vpath::normalize_dir(full_directory_path);
        let index = self.drivers.borrow().closest(&dir);
        let root_len = self.driver_root(index).len();
        let relative = dir[root_len..].to_owned();
        self.resolve_enumerate(index, &relative, &dir)
    }

    fn resolve_open(
        &self,
        index: usize,
        relative: &str,
        full: &str,
    ) -> Result<Box<dyn Read>, StorageError> {
        if self.is_container(index) {
            if let Some(name) = self.container_find_entry(index, relative) {
                let bytes = self.container_read_entry(index, &name, full)?;
                return Ok(self.track(Box::new(Cursor::new(bytes))));
            }
            for ancestor in vpath::ancestors(relative) {
                let Some(entry) = self.container_find_entry(index, ancestor) else {
                    continue;
                };
                if !self.options.recognizes(&entry) {
                    continue;
                }
                let child_root = format!("{}{entry}/", self.driver_root(index));
                let child = self.ensure_container(index, child_root)?;
                return self.resolve_open(child, &relative[ancestor.len() + 1..], full);
            }
            Err(StorageError::not_found(full))
        } else {
            if Path::new(relative).is_file() {
                return self.open_physical(relative);
            }
            for ancestor in vpath::ancestors(relative) {
                if !Path::new(ancestor).is_file() {
                    continue;
                }
                if !self.options.recognizes(ancestor) {
                    continue;
                }
                let child = self.ensure_container(index, vpath::normalize_dir(ancestor))?;
                return self.resolve_open(child, &relative[ancestor.len() + 1..], full);
            }
            Err(StorageError::not_found(full))
        }
    }

    fn resolve_enumerate(
        &self,
        index: usize,
        prefix: &str,
        full: &str,
    ) -> Result<FileIter<'_>, StorageError> {
        if self.is_container(index) {
            let matching = self.container_names_filtered(index, prefix);
            if !matching.is_empty() {
                return Ok(FileIter::entries(self, index, self.driver_root(index), matching));
            }
            if !prefix.is_empty() {
                let trimmed = vpath::trim_trailing(prefix);
                if let Some(entry) = self.container_find_entry(index, trimmed) {
                    if self.options.recognizes(&entry) {
                        let child_root = format!("{}{entry}/", self.driver_root(index));
                        let child = self.ensure_container(index, child_root)?;
                        return self.resolve_enumerate(child, "", full);
                    }
                }
                for ancestor in vpath::ancestors(trimmed) {
                    let Some(entry) = self.container_find_entry(index, ancestor) else {
                        continue;
                    };
                    if !self.options.recognizes(&entry) {
                        continue;
                    }
                    let child_root = format!("{}{entry}/", self.driver_root(index));
                    let child = self.ensure_container(index, child_root)?;
                    return self.resolve_enumerate(child, &prefix[ancestor.len() + 1..], full);
                }
            }
            // The container exists and backs the sub-tree; nothing matches
            // the prefix, so the sequence is simply empty.
            Ok(FileIter::empty(self))
        } else {
            let fs_path = vpath::trim_trailing(prefix).to_owned();
            let path = Path::new(&fs_path);
            if path.is_dir() {
                return FileIter::directory(self, &fs_path, prefix.to_owned());
            }
            if path.is_file() && self.options.recognizes(&fs_path) {
                let child = self.ensure_container(index, vpath::normalize_dir(&fs_path))?;
                return self.resolve_enumerate(child, "", full);
            }
            for ancestor in vpath::ancestors(&fs_path) {
                if !Path::new(ancestor).is_file() {
                    continue;
                }
                if !self.options.recognizes(ancestor) {
                    continue;
                }
                let child = self.ensure_container(index, vpath::normalize_dir(ancestor))?;
                return self.resolve_enumerate(child, &prefix[ancestor.len() + 1..], full);
            }
            Err(StorageError::not_found(full))
        }
    }

    /// Returns the registered driver for `root_path`, creating and
    /// registering it on first use.
    fn ensure_container(&self, parent: usize, root_path: String) -> Result<usize, StorageError> {
        if let Some(existing) = self.drivers.borrow().find_exact(&root_path) {
            return Ok(existing);
        }
        let file_path = vpath::trim_trailing(&root_path).to_owned();
        debug!(container = %file_path, "opening container driver");
        let reader: Box<dyn ReadSeek> = if self.is_container(parent) {
            let parent_root = self.driver_root(parent);
            let relative = vpath::trim_trailing(&root_path[parent_root.len()..]);
            let name = self
                .container_find_entry(parent, relative)
                .ok_or_else(|| StorageError::not_found(file_path.clone()))?;
            let bytes = self.container_read_entry(parent, &name, &file_path)?;
            Box::new(Cursor::new(bytes))
        } else {
            Box::new(
                File::open(&file_path)
                    .map_err(|source| StorageError::io(file_path.clone(), source))?,
            )
        };
        let container = ZipContainer::open(reader, &file_path)?;
        let index = self.drivers.borrow_mut().insert(Driver {
            root_path,
            parent: Some(parent),
            kind: DriverKind::Container(container),
        });
        Ok(index)
    }

    /// Creates (or reuses) the container driver rooted at `root_path` under
    /// `parent` and returns its index together with its full entry list.
    pub(crate) fn ensure_and_list(
        &self,
        parent: usize,
        root_path: String,
    ) -> Result<(usize, Vec<String>), StorageError> {
        let index = self.ensure_container(parent, root_path)?;
        Ok((index, self.container_names_filtered(index, "")))
    }

    pub(crate) fn recognizes(&self, name: &str) -> bool {
        self.options.recognizes(name)
    }

    fn open_physical(&self, path: &str) -> Result<Box<dyn Read>, StorageError> {
        let file = File::open(path).map_err(|source| StorageError::io(path, source))?;
        Ok(self.track(Box::new(file)))
    }

    fn is_container(&self, index: usize) -> bool {
        matches!(
            self.drivers.borrow().get(index).kind,
            DriverKind::Container(_)
        )
    }

    fn driver_root(&self, index: usize) -> String {
        self.drivers.borrow().get(index).root_path.clone()
    }

    fn container_find_entry(&self, index: usize, relative: &str) -> Option<String> {
        let drivers = self.drivers.borrow();
        match &drivers.get(index).kind {
            DriverKind::Container(zip) => zip.find_entry(relative).map(str::to_owned),
            DriverKind::Physical => None,
        }
    }

    fn container_read_entry(
        &self,
        index: usize,
        name: &str,
        full: &str,
    ) -> Result<Vec<u8>, StorageError> {
        let drivers = self.drivers.borrow();
        match &drivers.get(index).kind {
            DriverKind::Container(zip) => zip.read_entry(name, full),
            DriverKind::Physical => Err(StorageError::not_found(full)),
        }
    }

    fn container_names_filtered(&self, index: usize, prefix: &str) -> Vec<String> {
        let drivers = self.drivers.borrow();
        match &drivers.get(index).kind {
            DriverKind::Container(zip) => zip
                .names()
                .iter()
                .filter(|name| prefix.is_empty() || vpath::starts_with_ignore_case(name, prefix))
                .cloned()
                .collect(),
            DriverKind::Physical => Vec::new(),
        }
    }

    #[cfg(debug_assertions)]
    fn track(&self, inner: Box<dyn Read>) -> Box<dyn Read> {
        self.open_streams.set(self.open_streams.get() + 1);
        Box::new(TrackedReader {
            inner,
            count: Rc::clone(&self.open_streams),
        })
    }

    #[cfg(not(debug_assertions))]
    fn track(&self, inner: Box<dyn Read>) -> Box<dyn Read> {
        inner
    }
}

impl FileStorage for VirtualStorage {
    fn open_read(&self, full_path: &str) -> Result<Box<dyn Read>, StorageError> {
        Self::open_read(self, full_path)
    }

    fn enumerate_files<'a>(
        &'a self,
        full_directory_path: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<String, StorageError>> + 'a>, StorageError> {
        Ok(Box::new(Self::enumerate_files(self, full_directory_path)?))
    }
}

impl std::fmt::Debug for VirtualStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualStorage")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Debug-build stream wrapper keeping the session's leak counter accurate.
#[cfg(debug_assertions)]
struct TrackedReader {
    inner: Box<dyn Read>,
    count: Rc<Cell<usize>>,
}

#[cfg(debug_assertions)]
impl Read for TrackedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

#[cfg(debug_assertions)]
impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.count.set(self.count.get().saturating_sub(1));
    }
}
