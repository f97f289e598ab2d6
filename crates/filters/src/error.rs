use thiserror::Error;

/// Error produced when pattern text cannot become a [`PathPattern`].
///
/// [`PathPattern`]: crate::PathPattern
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern was empty or whitespace-only.
    #[error("pattern must not be empty or whitespace")]
    Empty,

    /// The pattern contains a character that can never appear in a path.
    #[error("pattern '{pattern}' contains invalid path characters")]
    InvalidCharacters {
        /// The offending pattern text.
        pattern: String,
    },

    /// The pattern is rooted (drive, UNC, or doubled leading separator).
    #[error("pattern '{pattern}' must be a relative path")]
    Rooted {
        /// The offending pattern text.
        pattern: String,
    },

    /// The translated pattern failed to compile into a matcher.
    #[error("failed to compile pattern '{pattern}': {source}")]
    Compile {
        /// The offending pattern text.
        pattern: String,
        /// Compilation failure reported by the matching engine.
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// Returns the offending pattern text, when the error carries one.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::InvalidCharacters { pattern }
            | Self::Rooted { pattern }
            | Self::Compile { pattern, .. } => Some(pattern),
        }
    }
}
