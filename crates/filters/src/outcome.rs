use std::fmt;

/// Tri-state result of evaluating a path against ordered rules.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MatchOutcome {
    /// No rule matched the path.
    #[default]
    None,
    /// The first matching rule was an include rule.
    Included,
    /// The first matching rule was an exclude rule.
    Excluded,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Included => f.write_str("included"),
            Self::Excluded => f.write_str("excluded"),
        }
    }
}
