use crate::sorted;

/// Compiled, strictly sorted list of file names with an optional list of
/// directory names.
///
/// Both lists use the ordinal byte ordering of [`str`]. [`add`](Self::add)
/// and [`remove`](Self::remove) maintain sortedness and uniqueness through
/// the linear merges in [`sorted`], never by re-sorting.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileNameList {
    files: Vec<String>,
    directories: Option<Vec<String>>,
}

impl FileNameList {
    /// Creates an empty list.
    ///
    /// When `with_directories` is `false`, [`directories`](Self::directories)
    /// stays `None` and directory names are ignored by composition.
    #[must_use]
    pub fn new(with_directories: bool) -> Self {
        Self {
            files: Vec::new(),
            directories: with_directories.then(Vec::new),
        }
    }

    /// Builds a list from `names`, optionally prefixing every entry.
    ///
    /// Pass `must_sort = false` only when `names` is already strictly sorted
    /// in ordinal order; this is asserted in debug builds.
    #[must_use]
    pub fn from_names<I>(names: I, prefix: Option<&str>, must_sort: bool) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut files: Vec<String> = match prefix {
            Some(prefix) if !prefix.is_empty() => names
                .into_iter()
                .map(|name| format!("{prefix}{name}"))
                .collect(),
            _ => names.into_iter().collect(),
        };
        if must_sort {
            files.sort();
            files.dedup();
        } else {
            debug_assert!(sorted::is_sorted_strict(&files, str::cmp));
        }
        Self {
            files,
            directories: None,
        }
    }

    /// Sorted file names.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Sorted directory names, or `None` if not requested at creation time.
    #[must_use]
    pub fn directories(&self) -> Option<&[String]> {
        self.directories.as_deref()
    }

    /// Binary-search lookup of `name` in [`files`](Self::files).
    ///
    /// Returns the index on a hit, or the insertion point on a miss, exactly
    /// as [`slice::binary_search`] does.
    pub fn index_of(&self, name: &str) -> Result<usize, usize> {
        self.files.binary_search_by(|item| item.as_str().cmp(name))
    }

    /// Returns `true` if `name` is present in [`files`](Self::files).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_ok()
    }

    /// Combines another list into this one. Duplicates are kept once.
    pub fn add(&mut self, other: &Self) {
        self.files = sorted::union(&self.files, &other.files, str::cmp);
        if let (Some(dirs), Some(other_dirs)) =
            (self.directories.as_mut(), other.directories.as_ref())
        {
            *dirs = sorted::union(dirs, other_dirs, str::cmp);
        }
    }

    /// Subtracts another list: names present in `other` are removed.
    pub fn remove(&mut self, other: &Self) {
        self.files = sorted::difference(&self.files, &other.files, str::cmp);
        if let (Some(dirs), Some(other_dirs)) =
            (self.directories.as_mut(), other.directories.as_ref())
        {
            *dirs = sorted::difference(dirs, other_dirs, str::cmp);
        }
    }

    /// Number of file names held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file names are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
