#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `vpath` provides the string algebra shared by the filtering and virtual
//! storage crates. Paths in this workspace are plain strings that may cross
//! archive boundaries, so they are manipulated textually rather than through
//! [`std::path::Path`]: a single canonical `/` separator, ASCII
//! case-insensitive ordering, and prefix arithmetic over normalized strings.
//!
//! # Design
//!
//! - [`normalize`] and [`normalize_dir`] rewrite separators to the canonical
//!   form; the `_dir` variant guarantees a trailing separator so that prefix
//!   tests against directory roots never match partial segment names.
//! - [`cmp_ignore_case`], [`eq_ignore_case`], [`starts_with_ignore_case`],
//!   and [`ends_with_ignore_case`] implement the ordinal ASCII
//!   case-insensitive comparisons used for every path comparison in the
//!   workspace.
//! - [`Ancestors`] iterates the ancestor directories of a normalized path,
//!   deepest first, which is the probe order when searching for a container
//!   file along a path's ancestry.
//!
//! # Invariants
//!
//! - Normalized paths never contain `\`.
//! - Case-insensitivity is ASCII-level. Paths differing only in non-ASCII
//!   case are distinct; this is the documented comparison policy, not an
//!   oversight.
//!
//! # Examples
//!
//! ```
//! assert_eq!(vpath::normalize_dir(r"a\b"), "a/b/");
//! assert!(vpath::starts_with_ignore_case("Src/Main.rs", "src/"));
//! let parents: Vec<&str> = vpath::ancestors("a/b/c.txt").collect();
//! assert_eq!(parents, ["a/b", "a"]);
//! ```

use std::cmp::Ordering;

/// Canonical path separator used after normalization.
pub const SEPARATOR: char = '/';

/// Rewrites every `\` to the canonical `/` separator.
#[must_use]
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Rewrites separators and guarantees a single trailing `/`.
///
/// The empty string stays empty: it denotes the physical root, which has no
/// separator of its own.
#[must_use]
pub fn normalize_dir(path: &str) -> String {
    let mut normalized = normalize(path);
    if !normalized.is_empty() && !normalized.ends_with(SEPARATOR) {
        normalized.push(SEPARATOR);
    }
    normalized
}

/// Returns `path` without its trailing separator, if any.
#[must_use]
pub fn trim_trailing(path: &str) -> &str {
    path.strip_suffix(SEPARATOR).unwrap_or(path)
}

/// Ordinal ASCII case-insensitive ordering of two path strings.
#[must_use]
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut rhs = b.bytes();
    for x in a.bytes() {
        let Some(y) = rhs.next() else {
            return Ordering::Greater;
        };
        match x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    if rhs.next().is_some() {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// ASCII case-insensitive equality of two path strings.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Returns `true` if `path` starts with `prefix`, ignoring ASCII case.
#[must_use]
pub fn starts_with_ignore_case(path: &str, prefix: &str) -> bool {
    path.len() >= prefix.len() && path.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Returns `true` if `path` ends with `suffix`, ignoring ASCII case.
#[must_use]
pub fn ends_with_ignore_case(path: &str, suffix: &str) -> bool {
    path.len() >= suffix.len()
        && path.as_bytes()[path.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

/// Returns `true` if `text` contains a character that can never appear in a
/// path: an ASCII control character or one of `<`, `>`, `"`, `|`.
#[must_use]
pub fn has_invalid_chars(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_control() || matches!(c, '<' | '>' | '"' | '|'))
}

/// Iterates the ancestor directories of a normalized path, deepest first.
///
/// The path itself is not yielded, and neither is the empty root. A trailing
/// separator is ignored, so `"a/b/"` and `"a/b"` have the same ancestors.
#[must_use]
pub fn ancestors(path: &str) -> Ancestors<'_> {
    Ancestors {
        remaining: trim_trailing(path),
    }
}

/// Iterator returned by [`ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    remaining: &'a str,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let cut = self.remaining.rfind(SEPARATOR)?;
        self.remaining = &self.remaining[..cut];
        if self.remaining.is_empty() {
            None
        } else {
            Some(self.remaining)
        }
    }
}
