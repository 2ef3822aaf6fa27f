//! doc-check-code library
//!
//! This library verifies the fenced code examples embedded in markdown
//! documentation. The primary interface is the doc-check-code binary, but the
//! library can be used programmatically for testing or custom integrations.
//!
//! ## Public API
//!
//! - [`locate_documents`] - Resolve explicit files or run the discovery sweep
//! - [`extract_fragments`] - Lazily extract [`CodeFragment`]s from a document
//! - [`Strategy`] - The verification strategy a fence tag resolves to
//! - [`Verifier`] - Verify one fragment and produce an [`Outcome`]
//! - [`Runner`] - Drive a whole run and collect a [`RunResult`]
//! - [`report`] - Render a [`RunResult`] and decide overall success
//!
//! ## Example
//!
//! ```no_run
//! use doc_check_code::{locate_documents, report, CheckConfig, OutputFormat, Runner, Verifier};
//! use std::path::Path;
//! use std::time::Instant;
//!
//! # async fn run() -> anyhow::Result<bool> {
//! let root = Path::new(".");
//! let config = CheckConfig::load(None, root)?;
//! let documents = locate_documents(&[], root, &config.discovery.patterns)?;
//!
//! let start = Instant::now();
//! let result = Runner::new(Verifier::new(config)).run(&documents).await;
//! report(&result, start.elapsed(), OutputFormat::Text, &mut std::io::stdout())
//! # }
//! ```

mod config;
mod exec;
mod extractor;
mod language;
mod locator;
mod outcome;
mod reporting;
mod runner;
mod strategy;

pub use config::{CheckConfig, DiscoveryConfig, PythonConfig, ShellConfig, DEFAULT_CONFIG_FILE};
pub use extractor::{extract_fragments, CodeFragment, Fragments};
pub use language::Strategy;
pub use locator::locate_documents;
pub use outcome::{Outcome, RunResult};
pub use reporting::{report, OutputFormat};
pub use runner::Runner;
pub use strategy::heuristics::{
    DOCUMENTATION_EXAMPLE, INTERACTIVE_COMMAND, PARTIAL_EXAMPLE, VARIABLE_PLACEHOLDERS,
};
pub use strategy::Verifier;
