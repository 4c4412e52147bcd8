//! enginecheck CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use enginecheck::check::check_engines;
use enginecheck::cli::Cli;
use enginecheck::manifest::Manifest;
use enginecheck::resolver::Resolver;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// `no_color` must be decided before this runs; the fmt layer fixes its
/// ANSI behavior at init time.
fn init_tracing(debug: bool, no_color: bool) {
    let filter = if debug {
        EnvFilter::new("enginecheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("enginecheck=info"))
    };

    let mut layer = fmt::layer().with_target(false);
    if no_color {
        layer = layer.with_ansi(false);
    }

    tracing_subscriber::registry().with(layer).with(filter).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }
    init_tracing(cli.debug, cli.no_color);

    let manifest_path = cli
        .manifest
        .clone()
        .unwrap_or_else(|| PathBuf::from("package.json"));

    tracing::debug!("checking engines declared in {}", manifest_path.display());

    let manifest = match Manifest::load(&manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            return ExitCode::from(1);
        }
    };

    let outcome = check_engines(&manifest.engines, &Resolver::new());

    if !cli.quiet {
        for (name, report) in &outcome.reports {
            let actual = report.actual.as_deref().unwrap_or("unknown");
            let mark = if report.satisfied() {
                style("ok").green()
            } else {
                style("fail").red()
            };
            println!("{mark} {name} {actual} (wanted {})", report.expected);
        }
    }

    match outcome.combined_error() {
        None => {
            if !cli.quiet && !outcome.reports.is_empty() {
                println!("{}", style("All engine constraints satisfied.").green());
            }
            ExitCode::SUCCESS
        }
        Some(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}
