use thiserror::Error;
use vfs::{FileStorage, StorageError};

use crate::outcome::MatchOutcome;
use crate::scoped::ScopedFilter;

/// Policy applied to a path matched by none of a target's scoped filters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MatchBehavior {
    /// Unmatched paths are omitted.
    #[default]
    Default,
    /// Unmatched paths are emitted as if included.
    NoneIsIncluded,
    /// An unmatched path aborts the enumeration with [`UnmatchedFile`].
    NoneIsUnmatchedError,
}

/// Failure raised under [`MatchBehavior::NoneIsUnmatchedError`], naming the
/// path no rule matched.
#[derive(Debug, Error)]
#[error("unmatched file name: {path}")]
pub struct UnmatchedFile {
    path: String,
}

impl UnmatchedFile {
    /// The full path that no rule matched.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Failure terminating [`PackTarget::included_files`].
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// A path matched no rule under the unmatched-error policy.
    #[error(transparent)]
    Unmatched(#[from] UnmatchedFile),
    /// The underlying storage enumeration failed mid-stream.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of challenging a single path, ignoring the match behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Challenge {
    outcome: MatchOutcome,
    removable_root: String,
    final_path: String,
}

impl Challenge {
    /// The tri-state decision for the challenged path.
    #[must_use]
    pub const fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    /// Root of the filter that decided, empty when unscoped or undecided.
    #[must_use]
    pub fn removable_root(&self) -> &str {
        &self.removable_root
    }

    /// The challenged path with [`removable_root`](Self::removable_root)
    /// stripped.
    #[must_use]
    pub fn final_path(&self) -> &str {
        &self.final_path
    }
}

/// One selected file produced by [`PackTarget::included_files`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selected {
    file_path: String,
    removable_root: String,
    final_path: String,
}

impl Selected {
    /// The file path relative to the enumerated root. It is the
    /// concatenation of [`removable_root`](Self::removable_root) and
    /// [`final_path`](Self::final_path). Never empty.
    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// The root to strip from [`file_path`](Self::file_path): the owning
    /// filter's root. Never missing, but may be empty.
    #[must_use]
    pub fn removable_root(&self) -> &str {
        &self.removable_root
    }

    /// The path to carry into the output: [`file_path`](Self::file_path)
    /// minus [`removable_root`](Self::removable_root).
    #[must_use]
    pub fn final_path(&self) -> &str {
        &self.final_path
    }
}

/// An ordered collection of [`ScopedFilter`]s targeting one output path.
///
/// The first filter producing a non-[`None`](MatchOutcome::None) outcome for
/// a candidate decides it; the [`MatchBehavior`] resolves candidates no
/// filter decided.
#[derive(Clone, Debug)]
pub struct PackTarget {
    target_root: String,
    match_behavior: MatchBehavior,
    filters: Vec<ScopedFilter>,
}

impl Default for PackTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl PackTarget {
    /// Creates a target writing to the output root `/` with the default
    /// match behavior and no filters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            target_root: String::new(),
            match_behavior: MatchBehavior::Default,
            filters: Vec::new(),
        }
    }

    /// The output path selected files are destined for. Defaults to `/`.
    #[must_use]
    pub fn target_root(&self) -> &str {
        if self.target_root.is_empty() {
            "/"
        } else {
            &self.target_root
        }
    }

    /// Sets the output path. Blank values normalize back to `/`.
    pub fn set_target_root(&mut self, value: &str) {
        if value.trim().is_empty() {
            self.target_root.clear();
        } else {
            self.target_root = vpath::normalize(value);
        }
    }

    /// The policy for paths matched by no filter.
    #[must_use]
    pub const fn match_behavior(&self) -> MatchBehavior {
        self.match_behavior
    }

    /// Sets the policy for paths matched by no filter.
    pub fn set_match_behavior(&mut self, behavior: MatchBehavior) {
        self.match_behavior = behavior;
    }

    /// The scoped filters in evaluation order.
    #[must_use]
    pub fn filters(&self) -> &[ScopedFilter] {
        &self.filters
    }

    /// Mutable access to the scoped filters.
    pub fn filters_mut(&mut self) -> &mut Vec<ScopedFilter> {
        &mut self.filters
    }

    /// Appends a scoped filter after every existing one.
    pub fn push_filter(&mut self, filter: ScopedFilter) {
        self.filters.push(filter);
    }

    /// Challenges one path against the filters, ignoring the match behavior.
    ///
    /// The first filter with a non-[`None`](MatchOutcome::None) outcome
    /// wins; its root becomes the removable root. When nothing matches, the
    /// removable root is empty and the final path equals the input.
    #[must_use]
    pub fn challenge(&self, path: &str) -> Challenge {
        for filter in &self.filters {
            let outcome = filter.evaluate(path);
            if outcome != MatchOutcome::None {
                let root = filter.root().unwrap_or("");
                return Challenge {
                    outcome,
                    removable_root: root.to_owned(),
                    final_path: strip_root(path, root).to_owned(),
                };
            }
        }
        Challenge {
            outcome: MatchOutcome::None,
            removable_root: String::new(),
            final_path: path.to_owned(),
        }
    }

    /// Lazily enumerates the files below `root` this target selects.
    ///
    /// Every candidate produced by `storage` is stripped of `root` and
    /// challenged; [`MatchBehavior`] resolves the undecided ones. The
    /// sequence is single-pass and not restartable.
    ///
    /// # Errors
    ///
    /// Fails immediately when `storage` cannot enumerate `root`. Mid-stream,
    /// an unmatched path under
    /// [`NoneIsUnmatchedError`](MatchBehavior::NoneIsUnmatchedError) or a
    /// storage failure is yielded as an [`EnumerateError`] item and ends the
    /// sequence.
    pub fn included_files<'a>(
        &'a self,
        root: &str,
        storage: &'a dyn FileStorage,
    ) -> Result<IncludedFiles<'a>, StorageError> {
        let root = vpath::normalize_dir(root);
        let inner = storage.enumerate_files(&root)?;
        Ok(IncludedFiles {
            target: self,
            root,
            inner,
            done: false,
        })
    }
}

/// Lazy selection stream produced by [`PackTarget::included_files`].
pub struct IncludedFiles<'a> {
    target: &'a PackTarget,
    root: String,
    inner: Box<dyn Iterator<Item = Result<String, StorageError>> + 'a>,
    done: bool,
}

impl Iterator for IncludedFiles<'_> {
    type Item = Result<Selected, EnumerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let target = self.target;
        loop {
            let full = match self.inner.next()? {
                Ok(full) => full,
                Err(error) => {
                    self.done = true;
                    return Some(Err(error.into()));
                }
            };
            let file_path = full.get(self.root.len()..).unwrap_or_default().to_owned();

            let mut outcome = MatchOutcome::None;
            let mut winner_root: Option<&str> = None;
            let mut partial_root = "";
            for filter in &target.filters {
                outcome = filter.evaluate(&file_path);
                if outcome != MatchOutcome::None {
                    winner_root = Some(filter.root().unwrap_or(""));
                    break;
                }
                if filter.scope_matches(&file_path) {
                    partial_root = filter.root().unwrap_or("");
                }
            }

            let removable_root = match outcome {
                MatchOutcome::Excluded => continue,
                MatchOutcome::Included => winner_root.unwrap_or(""),
                MatchOutcome::None => match target.match_behavior {
                    MatchBehavior::Default => continue,
                    MatchBehavior::NoneIsIncluded => partial_root,
                    MatchBehavior::NoneIsUnmatchedError => {
                        self.done = true;
                        return Some(Err(UnmatchedFile { path: full }.into()));
                    }
                },
            };

            let final_path = strip_root(&file_path, removable_root).to_owned();
            return Some(Ok(Selected {
                removable_root: removable_root.to_owned(),
                file_path,
                final_path,
            }));
        }
    }
}

fn strip_root<'p>(path: &'p str, root: &str) -> &'p str {
    if !root.is_empty() && vpath::starts_with_ignore_case(path, root) {
        &path[root.len()..]
    } else {
        path
    }
}
