//! CLI argument definitions.
//!
//! All arguments are defined with clap's derive macros. The entry point is
//! the [`Cli`] struct, parsed in `main`.

use clap::Parser;
use std::path::PathBuf;

/// enginecheck - verify installed engine versions against a manifest.
#[derive(Debug, Parser)]
#[command(name = "enginecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the manifest (defaults to package.json in the current directory)
    #[arg(short, long, env = "ENGINECHECK_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Print nothing on success
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
