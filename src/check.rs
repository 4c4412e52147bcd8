//! Concurrent engine checking.
//!
//! One resolver task runs per declared engine, fanned out on scoped threads.
//! Each task sends exactly one outcome message on a channel; the calling
//! thread alone drains the channel and counts the outstanding total down to
//! zero, so every piece of aggregate state is mutated serially without
//! locks. Outcomes may arrive in any order — reports are keyed by engine
//! name and error lines are emitted in name order, so the combined result
//! is deterministic regardless of scheduling.
//!
//! There is no timeout: a probe whose process never exits will hang the
//! whole check. Callers needing bounded latency must wrap the call.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;

use crate::error::EngineCheckError;
use crate::resolver::Resolver;

/// Installed-vs-declared record for one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    /// Resolved version; absent when resolution failed.
    pub actual: Option<String>,
    /// Declared range from the manifest.
    pub expected: String,
}

impl VersionReport {
    /// Whether the resolved version satisfies the declared range.
    pub fn satisfied(&self) -> bool {
        self.actual
            .as_deref()
            .is_some_and(|actual| satisfies(actual, &self.expected))
    }
}

/// Per-engine reports keyed by engine name.
pub type Reports = BTreeMap<String, VersionReport>;

/// Aggregated result of checking every declared engine.
///
/// Reports cover every engine, passing or not; only the error lines
/// distinguish outcomes.
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub reports: Reports,
    pub errors: Vec<String>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// All error lines joined with newlines, or `None` when the check passed.
    pub fn combined_error(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.join("\n"))
        }
    }

    /// Convert into a `Result` for callers that treat violations as errors.
    /// The reports ride along on the error path too.
    pub fn into_result(self) -> Result<Reports, EngineCheckError> {
        match self.combined_error() {
            None => Ok(self.reports),
            Some(message) => Err(EngineCheckError::Unsatisfied {
                message,
                reports: self.reports,
            }),
        }
    }
}

/// Check every declared engine against its version range.
///
/// Resolution runs concurrently across engines. The outcome always contains
/// exactly one report per declared engine: resolution failures are folded in
/// as `unable to determine version` errors rather than aborting the rest of
/// the check. An empty mapping yields an empty, passing outcome.
pub fn check_engines(engines: &BTreeMap<String, String>, resolver: &Resolver) -> CheckOutcome {
    let (tx, rx) = mpsc::channel();

    let mut failures: BTreeMap<String, String> = BTreeMap::new();
    let mut reports = Reports::new();

    thread::scope(|scope| {
        for (name, range) in engines {
            let tx = tx.clone();
            scope.spawn(move || {
                // Exactly one message per engine, success or failure.
                let _ = tx.send((name, range, resolver.resolve(name)));
            });
        }
        drop(tx);

        let mut outstanding = engines.len();
        while outstanding > 0 {
            // recv fails only once every sender is gone, which the
            // countdown rules out while tasks are still outstanding.
            let Ok((name, range, resolved)) = rx.recv() else {
                break;
            };
            outstanding -= 1;

            match resolved {
                Ok(actual) => {
                    if !satisfies(&actual, range) {
                        failures.insert(
                            name.clone(),
                            format!(
                                "{name} version ({actual}) does not satisfy specified range ({range})"
                            ),
                        );
                    }
                    reports.insert(
                        name.clone(),
                        VersionReport {
                            actual: Some(actual),
                            expected: range.clone(),
                        },
                    );
                }
                Err(cause) => {
                    tracing::debug!(engine = %name, error = %cause, "version resolution failed");
                    failures.insert(
                        name.clone(),
                        format!("unable to determine version for ({name})"),
                    );
                    reports.insert(
                        name.clone(),
                        VersionReport {
                            actual: None,
                            expected: range.clone(),
                        },
                    );
                }
            }
        }
    });

    CheckOutcome {
        reports,
        errors: failures.into_values().collect(),
    }
}

/// Range-satisfaction predicate over the `semver` crate.
///
/// Manifest ranges use node-style syntax: comparators, wildcards, `||`
/// unions, hyphen ranges, and space-joined AND comparators. The union is
/// split here and each alternative normalized by [`parse_range`] before
/// delegating to `semver`. A leading `v` on the actual version is shed
/// before parsing. Anything unparseable — version or range — evaluates as
/// unsatisfied rather than erroring, the usual behavior for manifest range
/// predicates.
fn satisfies(actual: &str, range: &str) -> bool {
    let bare = actual.strip_prefix(['v', 'V']).unwrap_or(actual);
    let Ok(version) = semver::Version::parse(bare) else {
        return false;
    };
    range.split("||").any(|alternative| {
        parse_range(alternative).is_ok_and(|requirement| requirement.matches(&version))
    })
}

/// Translate one node-style range alternative into `semver` syntax.
///
/// `semver::VersionReq` wants comma-separated comparators and has no hyphen
/// form, so `8.0.0 - 10.0.0` becomes `>=8.0.0, <=10.0.0` and
/// `>=1.2.3 <2.0.0` becomes `>=1.2.3, <2.0.0`. An empty alternative matches
/// anything, as it does in manifests.
fn parse_range(range: &str) -> Result<semver::VersionReq, semver::Error> {
    let range = range.trim();
    if range.is_empty() {
        return semver::VersionReq::parse("*");
    }
    if let Some((low, high)) = range.split_once(" - ") {
        return semver::VersionReq::parse(&format!(">={}, <={}", low.trim(), high.trim()));
    }
    semver::VersionReq::parse(&range.split_whitespace().collect::<Vec<_>>().join(", "))
}
