#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` decides which files take part in a packaging operation. Rules
//! pair a wildcard path pattern with an include/exclude polarity; ordered
//! rule lists are evaluated first-match-wins; scoped groups confine rule
//! lists to a root prefix; and a packaging target composes scoped groups
//! with a policy for paths no rule matched.
//!
//! # Design
//!
//! - [`PathPattern`] is an immutable value: the pattern text is validated,
//!   normalized, and compiled into an anchored case-insensitive matcher at
//!   construction. Changing a pattern means constructing a new value, so
//!   there is no matcher cache to invalidate.
//! - [`RuleSet`] is an ordered sequence of patterns. Evaluation is a linear
//!   scan in insertion order because correctness depends on strict order,
//!   not on match specificity.
//! - [`ScopedFilter`] gates a rule set behind a root prefix: candidates
//!   outside the root yield [`MatchOutcome::None`] without the matchers ever
//!   running.
//! - [`PackTarget`] walks its scoped filters in order, resolves the
//!   [`MatchBehavior`] policy for unmatched paths, and pairs every selected
//!   path with the root that must be stripped from it.
//!
//! # Invariants
//!
//! - Patterns are relative: never rooted, never a drive or UNC prefix, never
//!   empty. Violations fail at construction, not at evaluation time.
//! - Matching is anchored to the whole candidate and ASCII
//!   case-insensitive.
//! - The first rule (and the first scoped filter) producing a decision wins.
//!
//! # Errors
//!
//! [`PatternError`] reports invalid pattern text at construction.
//! [`UnmatchedFile`] aborts an enumeration under
//! [`MatchBehavior::NoneIsUnmatchedError`], naming the offending path.
//!
//! # Examples
//!
//! ```
//! use filters::{MatchOutcome, PathPattern, RuleSet};
//!
//! let mut rules = RuleSet::new();
//! rules.push(PathPattern::exclude("*.tmp")?);
//! rules.push(PathPattern::include("logs/")?);
//!
//! assert_eq!(rules.evaluate("scratch.tmp"), MatchOutcome::Excluded);
//! assert_eq!(rules.evaluate("logs/run/output.txt"), MatchOutcome::Included);
//! assert_eq!(rules.evaluate("readme.md"), MatchOutcome::None);
//! # Ok::<(), filters::PatternError>(())
//! ```

mod error;
mod outcome;
mod pattern;
mod rule_set;
mod scoped;
mod target;

pub use error::PatternError;
pub use outcome::MatchOutcome;
pub use pattern::PathPattern;
pub use rule_set::RuleSet;
pub use scoped::ScopedFilter;
pub use target::{
    Challenge, EnumerateError, IncludedFiles, MatchBehavior, PackTarget, Selected, UnmatchedFile,
};
