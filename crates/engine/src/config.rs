use std::fs;
use std::path::Path;

use filters::{MatchBehavior, PackTarget, PathPattern, PatternError, ScopedFilter};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Declarative packaging manifest: an ordered list of targets.
///
/// The manifest is the external configuration surface; the filtering engine
/// only ever sees the [`PackTarget`] values built from it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PackManifest {
    /// Packaging targets in evaluation order.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// One packaging target: output path, unmatched-path policy, and scoped
/// filters.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Output path selected files are destined for.
    #[serde(default = "default_target")]
    pub target: String,
    /// Policy for paths matched by no rule.
    #[serde(default)]
    pub match_behavior: MatchBehaviorConfig,
    /// Scoped filters in evaluation order.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

/// A scoped filter: an optional root and an ordered rule list.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Root prefix confining the rules, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Include/exclude rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One include/exclude rule.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// `true` for include, `false` for exclude.
    pub include: bool,
    /// Wildcard pattern text.
    pub pattern: String,
}

/// Manifest encoding of [`MatchBehavior`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBehaviorConfig {
    /// Unmatched paths are omitted.
    #[default]
    Default,
    /// Unmatched paths are emitted as if included.
    NoneIsIncluded,
    /// An unmatched path aborts the run.
    NoneIsUnmatchedError,
}

impl From<MatchBehaviorConfig> for MatchBehavior {
    fn from(config: MatchBehaviorConfig) -> Self {
        match config {
            MatchBehaviorConfig::Default => Self::Default,
            MatchBehaviorConfig::NoneIsIncluded => Self::NoneIsIncluded,
            MatchBehaviorConfig::NoneIsUnmatchedError => Self::NoneIsUnmatchedError,
        }
    }
}

fn default_target() -> String {
    "/".to_owned()
}

impl PackManifest {
    /// Parses a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serializes the manifest back to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Loads and parses a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EngineError::ManifestIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| EngineError::ManifestParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Builds the fully-constructed targets this manifest describes.
    pub fn build_targets(&self) -> Result<Vec<PackTarget>, PatternError> {
        self.targets.iter().map(TargetConfig::build).collect()
    }
}

impl TargetConfig {
    /// Builds the [`PackTarget`] this configuration describes.
    pub fn build(&self) -> Result<PackTarget, PatternError> {
        let mut target = PackTarget::new();
        target.set_target_root(&self.target);
        target.set_match_behavior(self.match_behavior.into());
        for filter in &self.filters {
            target.push_filter(filter.build()?);
        }
        Ok(target)
    }
}

impl FilterConfig {
    /// Builds the [`ScopedFilter`] this configuration describes.
    pub fn build(&self) -> Result<ScopedFilter, PatternError> {
        let mut filter = ScopedFilter::new();
        filter.set_root(self.root.as_deref());
        for rule in &self.rules {
            filter
                .rules_mut()
                .push(PathPattern::new(rule.include, &rule.pattern)?);
        }
        Ok(filter)
    }
}
