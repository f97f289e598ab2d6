#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end of the packaging pipeline: it parses
//! arguments, initializes logging, and hands off to [`engine::run`].
//!
//! The binary takes a JSON manifest, the tree root to scan, and the output
//! archive path:
//!
//! ```text
//! globpack --config pack.json --root ./dist --output bundle.zip
//! ```
//!
//! Verbosity (`-v`, repeatable) maps onto the tracing env-filter; an
//! explicit `RUST_LOG` always wins.

mod frontend;

pub use frontend::run_with;
