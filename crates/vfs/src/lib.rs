#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `vfs` resolves path strings against a layered view of the filesystem in
//! which recognized archive files behave like directories. A path such as
//! `build/bundle.zip/assets/logo.png` textually crosses into the archive
//! `build/bundle.zip`; this crate serves reads and enumerations for such
//! paths transparently, at arbitrary nesting depth (an archive stored inside
//! another archive's entry tree is reachable the same way).
//!
//! # Design
//!
//! - [`VirtualStorage`] is a storage session: it owns a registry of drivers,
//!   each responsible for the sub-tree below its root path. The registry
//!   always contains the physical root driver (root path `""`); container
//!   drivers are created lazily the first time a resolution crosses into an
//!   archive and live until the session is dropped.
//! - Drivers form an arena. A container driver keeps the arena index of the
//!   driver it was resolved through, so crossing two archives back-to-back
//!   chains two drivers rather than making one driver recurse into nested
//!   archive data.
//! - Lookup picks the registered driver with the longest root path that
//!   prefixes the requested path (ASCII case-insensitive), falling back to
//!   the physical root.
//! - [`FileStorage`] is the provider contract consumed by the filtering
//!   layer; tests can substitute a stub instead of touching the disk.
//!
//! # Invariants
//!
//! - Exactly one driver has the empty root path, it is created with the
//!   session, and it is never removed while the session is live.
//! - Resolution never mutates the filesystem; the only session mutation is
//!   lazy driver registration.
//! - Enumeration is a lazy, single-pass, forward-only sequence. Dropping the
//!   iterator is the only cancellation.
//!
//! # Errors
//!
//! All operations report [`StorageError`]: a not-found failure naming the
//! full requested path, an I/O failure naming the path that could not be
//! read, or a container-open failure naming the archive that could not be
//! parsed. Container-open failures surface at first access to the archive's
//! sub-tree, never when the session is created.
//!
//! # Examples
//!
//! ```
//! use std::fs;
//! use std::io::Read;
//! use vfs::VirtualStorage;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let dir = temp.path().join("data");
//! fs::create_dir(&dir)?;
//! fs::write(dir.join("plain.txt"), b"plain")?;
//!
//! let storage = VirtualStorage::new();
//! let root = format!("{}/", dir.display());
//! let files: Vec<String> = storage
//!     .enumerate_files(&root)?
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(files, [format!("{root}plain.txt")]);
//!
//! let mut contents = String::new();
//! storage.open_read(&files[0])?.read_to_string(&mut contents)?;
//! assert_eq!(contents, "plain");
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod driver;
mod error;
mod iter;
mod options;
mod provider;
mod storage;

pub use error::StorageError;
pub use iter::FileIter;
pub use options::ContainerOptions;
pub use provider::FileStorage;
pub use storage::VirtualStorage;
