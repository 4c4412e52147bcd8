//! Enginecheck - verify installed engine versions against manifest constraints.
//!
//! Projects declare the external tools they need ("engines" — a runtime,
//! a package manager) and the version ranges they accept in their manifest.
//! This crate resolves the installed version of every declared engine
//! concurrently and reports, in one pass, every engine that is missing or
//! out of range.
//!
//! # Modules
//!
//! - [`check`] - Concurrent check orchestration and result aggregation
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`launcher`] - Process launching for version probes
//! - [`manifest`] - Manifest (`package.json`) loading
//! - [`resolver`] - Per-engine version resolution
//!
//! # Example
//!
//! ```
//! use enginecheck::check::check_engines;
//! use enginecheck::resolver::Resolver;
//! use std::collections::BTreeMap;
//!
//! // No engines declared: the check passes vacuously.
//! let engines: BTreeMap<String, String> = BTreeMap::new();
//! let outcome = check_engines(&engines, &Resolver::new());
//! assert!(outcome.passed());
//! ```

pub mod check;
pub mod cli;
pub mod error;
pub mod launcher;
pub mod manifest;
pub mod resolver;

pub use check::{check_engines, CheckOutcome, Reports, VersionReport};
pub use error::{EngineCheckError, Result};
