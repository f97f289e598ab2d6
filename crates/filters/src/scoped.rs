use crate::outcome::MatchOutcome;
use crate::rule_set::RuleSet;

/// A [`RuleSet`] confined to a root prefix of the scanned tree.
///
/// When a root is set, candidates outside it yield [`MatchOutcome::None`]
/// without the rule matchers ever running; candidates inside it are
/// evaluated with the root stripped, so the rules are written relative to
/// the scope.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScopedFilter {
    root: Option<String>,
    rules: RuleSet,
}

impl ScopedFilter {
    /// Creates an unscoped filter: every candidate reaches the rules.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            rules: RuleSet::new(),
        }
    }

    /// Creates a filter scoped to `root`.
    #[must_use]
    pub fn with_root(root: &str) -> Self {
        let mut filter = Self::new();
        filter.set_root(Some(root));
        filter
    }

    /// The normalized scope root, with its trailing separator, if any.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Sets or clears the scope root.
    ///
    /// The root is normalized to `/` separators with a trailing separator
    /// and no leading one; blank or `/`-only values clear the scope.
    pub fn set_root(&mut self, root: Option<&str>) {
        self.root = root.and_then(|value| {
            if value.trim().is_empty() {
                return None;
            }
            let mut normalized = vpath::normalize_dir(value);
            if normalized.starts_with('/') {
                normalized.remove(0);
            }
            if normalized.is_empty() {
                None
            } else {
                Some(normalized)
            }
        });
    }

    /// The contained rule set.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Mutable access to the contained rule set.
    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    /// Removes every rule, preserving the root.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Evaluates a candidate path against the scoped rules.
    #[must_use]
    pub fn evaluate(&self, path: &str) -> MatchOutcome {
        match &self.root {
            Some(root) => {
                if !vpath::starts_with_ignore_case(path, root) {
                    return MatchOutcome::None;
                }
                self.rules.evaluate(&path[root.len()..])
            }
            None => self.rules.evaluate(path),
        }
    }

    /// Returns `true` if the candidate falls inside this filter's scope.
    pub(crate) fn scope_matches(&self, path: &str) -> bool {
        match &self.root {
            Some(root) => vpath::starts_with_ignore_case(path, root),
            None => true,
        }
    }
}
