use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::storage::VirtualStorage;

/// Lazy, single-pass enumeration of files below a virtual path.
///
/// Produced by [`VirtualStorage::enumerate_files`]. Directories are walked
/// depth-first in deterministic (lexicographically sorted) order; every file
/// that qualifies as a container is yielded and then immediately followed by
/// its own entries. An error item terminates the sequence.
pub struct FileIter<'a> {
    storage: &'a VirtualStorage,
    frames: Vec<Frame>,
    failed: bool,
}

enum Frame {
    /// A physical directory being walked.
    Dir {
        fs: PathBuf,
        display: String,
        entries: Vec<DirEntryName>,
        cursor: usize,
    },
    /// A snapshot of container entry names being replayed.
    Entries {
        driver: usize,
        base: String,
        names: Vec<String>,
        cursor: usize,
    },
}

#[derive(Clone)]
struct DirEntryName {
    name: String,
    is_dir: bool,
}

enum Step {
    Pop,
    Descend { fs: PathBuf, display: String },
    File { display: String, container: bool },
    Entry { driver: usize, full: String, container: bool },
}

impl<'a> FileIter<'a> {
    pub(crate) fn empty(storage: &'a VirtualStorage) -> Self {
        Self {
            storage,
            frames: Vec::new(),
            failed: false,
        }
    }

    pub(crate) fn directory(
        storage: &'a VirtualStorage,
        fs_path: &str,
        display: String,
    ) -> Result<Self, StorageError> {
        let frame = read_dir_frame(Path::new(fs_path), display)?;
        Ok(Self {
            storage,
            frames: vec![frame],
            failed: false,
        })
    }

    pub(crate) fn entries(
        storage: &'a VirtualStorage,
        driver: usize,
        base: String,
        names: Vec<String>,
    ) -> Self {
        Self {
            storage,
            frames: vec![Frame::Entries {
                driver,
                base,
                names,
                cursor: 0,
            }],
            failed: false,
        }
    }

    fn fail(&mut self, error: StorageError) -> Option<Result<String, StorageError>> {
        self.failed = true;
        Some(Err(error))
    }
}

impl Iterator for FileIter<'_> {
    type Item = Result<String, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let step = match self.frames.last_mut()? {
                Frame::Dir {
                    fs,
                    display,
                    entries,
                    cursor,
                } => {
                    if *cursor >= entries.len() {
                        Step::Pop
                    } else {
                        let entry = entries[*cursor].clone();
                        *cursor += 1;
                        if entry.is_dir {
                            Step::Descend {
                                fs: fs.join(&entry.name),
                                display: format!("{display}{}/", entry.name),
                            }
                        } else {
                            Step::File {
                                display: format!("{display}{}", entry.name),
                                container: self.storage.recognizes(&entry.name),
                            }
                        }
                    }
                }
                Frame::Entries {
                    driver,
                    base,
                    names,
                    cursor,
                } => {
                    if *cursor >= names.len() {
                        Step::Pop
                    } else {
                        let name = names[*cursor].clone();
                        *cursor += 1;
                        Step::Entry {
                            driver: *driver,
                            full: format!("{base}{name}"),
                            container: self.storage.recognizes(&name),
                        }
                    }
                }
            };

            match step {
                Step::Pop => {
                    self.frames.pop();
                }
                Step::Descend { fs, display } => match read_dir_frame(&fs, display) {
                    Ok(frame) => self.frames.push(frame),
                    Err(error) => return self.fail(error),
                },
                Step::File { display, container } => {
                    if container {
                        // Physical containers hang off the root driver.
                        match self
                            .storage
                            .ensure_and_list(0, vpath::normalize_dir(&display))
                        {
                            Ok((driver, names)) => self.frames.push(Frame::Entries {
                                driver,
                                base: vpath::normalize_dir(&display),
                                names,
                                cursor: 0,
                            }),
                            Err(error) => return self.fail(error),
                        }
                    }
                    return Some(Ok(display));
                }
                Step::Entry {
                    driver,
                    full,
                    container,
                } => {
                    if container {
                        match self
                            .storage
                            .ensure_and_list(driver, vpath::normalize_dir(&full))
                        {
                            Ok((child, names)) => self.frames.push(Frame::Entries {
                                driver: child,
                                base: vpath::normalize_dir(&full),
                                names,
                                cursor: 0,
                            }),
                            Err(error) => return self.fail(error),
                        }
                    }
                    return Some(Ok(full));
                }
            }
        }
    }
}

fn read_dir_frame(fs: &Path, display: String) -> Result<Frame, StorageError> {
    let reader = fs::read_dir(fs)
        .map_err(|source| StorageError::io(vpath::trim_trailing(&display), source))?;
    let mut entries = Vec::new();
    for item in reader {
        let item = item.map_err(|source| StorageError::io(vpath::trim_trailing(&display), source))?;
        let file_type = item
            .file_type()
            .map_err(|source| StorageError::io(vpath::trim_trailing(&display), source))?;
        entries.push(DirEntryName {
            name: item.file_name().to_string_lossy().into_owned(),
            is_dir: file_type.is_dir(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Frame::Dir {
        fs: fs.to_path_buf(),
        display,
        entries,
        cursor: 0,
    })
}
