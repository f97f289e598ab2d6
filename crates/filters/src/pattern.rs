use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;

/// An include/exclude wildcard path pattern, compiled and ready to match.
///
/// The pattern text is validated and normalized at construction and the
/// matcher is compiled immediately; the value is immutable afterwards.
/// Matching is ASCII case-insensitive and anchored to the whole candidate.
///
/// Wildcard grammar, in translation precedence:
///
/// - a trailing `/` behaves as if followed by `**` (the directory and
///   everything under it),
/// - `**/` matches zero or more whole path segments (`a/**/b` matches
///   `a/b` as well as `a/x/y/b`),
/// - `**` not followed by a separator matches any run of characters,
///   separators included (`**.txt` matches at any depth),
/// - `*` matches a separator-free run, optionally followed by one
///   separator,
/// - `?` matches exactly one character,
/// - everything else matches literally.
#[derive(Clone)]
pub struct PathPattern {
    include: bool,
    pattern: String,
    matcher: Regex,
}

impl PathPattern {
    /// Creates a pattern with the given polarity.
    ///
    /// The text is normalized to `/` separators; one leading separator is
    /// stripped. Empty, whitespace-only, rooted (drive-letter or doubled
    /// leading separator), and invalid-character patterns are rejected.
    pub fn new(include: bool, pattern: &str) -> Result<Self, PatternError> {
        let normalized = vpath::normalize(pattern);
        if normalized.trim().is_empty() {
            return Err(PatternError::Empty);
        }
        if vpath::has_invalid_chars(&normalized) {
            return Err(PatternError::InvalidCharacters {
                pattern: normalized,
            });
        }
        let relative = normalized.strip_prefix('/').unwrap_or(&normalized);
        if relative.is_empty() {
            return Err(PatternError::Empty);
        }
        if relative.starts_with('/') || has_drive_prefix(relative) {
            return Err(PatternError::Rooted {
                pattern: normalized,
            });
        }
        let relative = relative.to_owned();
        let matcher = compile(&relative)?;
        Ok(Self {
            include,
            pattern: relative,
            matcher,
        })
    }

    /// Creates an include pattern.
    pub fn include(pattern: &str) -> Result<Self, PatternError> {
        Self::new(true, pattern)
    }

    /// Creates an exclude pattern.
    pub fn exclude(pattern: &str) -> Result<Self, PatternError> {
        Self::new(false, pattern)
    }

    /// Returns whether this is an include pattern.
    #[must_use]
    pub const fn is_include(&self) -> bool {
        self.include
    }

    /// Returns the normalized pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Tests a candidate path against the compiled matcher.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("include", &self.include)
            .field("pattern", &self.pattern)
            .finish()
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.include == other.include && self.pattern == other.pattern
    }
}

impl Eq for PathPattern {}

fn has_drive_prefix(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Translates the wildcard into an anchored matching expression.
///
/// The staged replacements run over the escaped text, so each stage only
/// sees escaped wildcard sequences, never text produced by an earlier stage.
fn compile(pattern: &str) -> Result<Regex, PatternError> {
    let mut wildcard = pattern.to_owned();
    if wildcard.ends_with('/') {
        wildcard.push_str("**");
    }
    let translated = regex::escape(&wildcard)
        .replace(r"\*\*/", ".*")
        .replace(r"\*\*", ".*")
        .replace(r"\*", "[^/]*/?")
        .replace(r"\?", ".");
    RegexBuilder::new(&format!("^{translated}$"))
        .case_insensitive(true)
        .build()
        .map_err(|source| PatternError::Compile {
            pattern: pattern.to_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(text: &str) -> PathPattern {
        PathPattern::include(text).expect("valid pattern")
    }

    #[test]
    fn empty_and_whitespace_patterns_are_rejected() {
        assert!(matches!(PathPattern::include(""), Err(PatternError::Empty)));
        assert!(matches!(
            PathPattern::include("   "),
            Err(PatternError::Empty)
        ));
        // A lone separator strips down to nothing.
        assert!(matches!(PathPattern::include("/"), Err(PatternError::Empty)));
    }

    #[test]
    fn rooted_patterns_are_rejected() {
        for rooted in ["d:", r"C:\Pouf", r"\\server\share", r"\\?\C:\Pouf"] {
            assert!(
                matches!(PathPattern::include(rooted), Err(PatternError::Rooted { .. })),
                "{rooted} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_characters_are_rejected() {
        assert!(matches!(
            PathPattern::include("a|b"),
            Err(PatternError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            PathPattern::include("a\u{1}b"),
            Err(PatternError::InvalidCharacters { .. })
        ));
    }

    #[test]
    fn one_leading_separator_is_stripped() {
        let stripped = pattern("/logs/run.txt");
        assert_eq!(stripped.pattern(), "logs/run.txt");
        assert!(stripped.matches("logs/run.txt"));
    }

    #[test]
    fn literal_patterns_anchor_to_the_whole_candidate() {
        let literal = pattern("a/file.txt");
        assert!(literal.matches("a/file.txt"));
        assert!(!literal.matches("a/file.txt/below.txt"));
        assert!(!literal.matches("prefix/a/file.txt"));
        assert!(!literal.matches("a/file.txt/"));
    }

    #[test]
    fn matching_ignores_ascii_case() {
        let literal = pattern("Docs/Readme.MD");
        assert!(literal.matches("docs/readme.md"));
    }

    #[test]
    fn single_wildcard_does_not_cross_separators() {
        let glob = pattern("a/*.txt");
        assert!(glob.matches("a/one.txt"));
        assert!(glob.matches("a/two.txt"));
        assert!(!glob.matches("a/sub/three.txt"));
    }

    #[test]
    fn single_wildcard_may_consume_one_trailing_separator() {
        let glob = pattern("a/*");
        assert!(glob.matches("a/segment"));
        assert!(glob.matches("a/segment/"));
        assert!(!glob.matches("a/segment/deeper"));
    }

    #[test]
    fn recursive_segment_wildcard_matches_zero_or_more_segments() {
        let glob = pattern("a/**/b.txt");
        assert!(glob.matches("a/b.txt"));
        assert!(glob.matches("a/x/b.txt"));
        assert!(glob.matches("a/x/y/b.txt"));
        assert!(!glob.matches("c/x/b.txt"));
    }

    #[test]
    fn bare_recursive_wildcard_matches_across_separators() {
        let glob = pattern("a/**.txt");
        assert!(glob.matches("a/one.txt"));
        assert!(glob.matches("a/x/y/two.txt"));
        assert!(!glob.matches("a/one.log"));
    }

    #[test]
    fn trailing_separator_covers_the_whole_subtree() {
        let glob = pattern("logs/");
        assert!(glob.matches("logs/x.txt"));
        assert!(glob.matches("logs/sub/y.txt"));
        assert!(!glob.matches("logs"));
        assert!(!glob.matches("other/x.txt"));
    }

    #[test]
    fn question_mark_matches_exactly_one_character() {
        let glob = pattern("ob?/");
        assert!(glob.matches("obj/file.o"));
        assert!(glob.matches("obx/file.o"));
        assert!(!glob.matches("ob/file.o"));
        assert!(!glob.matches("obje/file.o"));
    }

    #[test]
    fn backslash_input_is_normalized() {
        let glob = PathPattern::include(r"a\b\*.txt").expect("valid");
        assert_eq!(glob.pattern(), "a/b/*.txt");
        assert!(glob.matches("a/b/c.txt"));
    }

    #[test]
    fn equality_is_by_polarity_and_text() {
        let a = PathPattern::include("x/*.txt").expect("valid");
        let b = PathPattern::include("x/*.txt").expect("valid");
        let c = PathPattern::exclude("x/*.txt").expect("valid");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
