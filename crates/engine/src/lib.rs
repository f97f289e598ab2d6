#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` ties the workspace together into a packaging pipeline: a JSON
//! manifest describes targets (output path, match behavior, scoped
//! include/exclude rules); the engine builds the corresponding filter
//! objects, enumerates every target through the virtual storage, and copies
//! the selected streams into one output zip archive.
//!
//! # Design
//!
//! - [`PackManifest`] is the declarative configuration surface. It only
//!   produces fully-constructed [`filters::PackTarget`] values; the matching
//!   engine never parses documents itself.
//! - [`pack`] drives the selection streams and writes the archive. Entry
//!   names combine the target's output root with each selection's
//!   scope-relative path. Duplicate entry names are skipped (first writer
//!   wins) and reported in the [`PackSummary`].
//! - Failures are never retried and partial output is left for the caller
//!   to clean up; every error propagates immediately.
//!
//! # Examples
//!
//! ```
//! use engine::PackManifest;
//!
//! let manifest = PackManifest::from_json(r#"{
//!     "targets": [{
//!         "target": "/",
//!         "match_behavior": "default",
//!         "filters": [{
//!             "root": "src",
//!             "rules": [
//!                 {"include": false, "pattern": "*.tmp"},
//!                 {"include": true, "pattern": "**"}
//!             ]
//!         }]
//!     }]
//! }"#).expect("manifest parses");
//! let targets = manifest.build_targets().expect("patterns compile");
//! assert_eq!(targets.len(), 1);
//! ```

mod config;
mod error;
mod pack;

pub use config::{FilterConfig, MatchBehaviorConfig, PackManifest, RuleConfig, TargetConfig};
pub use error::EngineError;
pub use pack::{PackSummary, pack, run};
