//! `cdnshift` is a library for moving web assets behind a CDN.
//!
//! It provides the core logic for the `cdnshift` command-line tool but can also
//! be used on its own. The pipeline is linear and single-threaded:
//!
//! - `enumerator`: walks a directory and picks files by extension.
//! - `patterns`: builds the tag/extension alternations and the URL regex.
//! - `detector`: finds the files that reference at least one matching URL.
//! - `replacer`: rewrites those URLs to a CDN prefix, keeping a `.bak` copy.
//! - `runner`: wires the steps together from resolved `config::Settings`.
//!
//! Matching is line based. A URL split across lines is never seen.

pub mod cli;
pub mod config;
pub mod detector;
pub mod enumerator;
pub mod errors;
pub mod logging;
pub mod patterns;
pub mod replacer;
pub mod runner;

// Re-export main types for easier access by library users.
pub use config::Settings;
pub use detector::Detector;
pub use enumerator::FileEnumerator;
pub use errors::{Error, Result};
pub use patterns::{UrlMatch, UrlPattern};
pub use replacer::Replacer;
pub use runner::{RunSummary, run};
