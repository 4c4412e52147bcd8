//! Version resolution for declared engines.
//!
//! The resolver answers one question: what version of a named engine is
//! installed right now? Two strategies:
//!
//! - **Host runtime**: engines matching a configured alias set (e.g. `node`
//!   and its historical fork `iojs`) are answered in-process from an
//!   injected version value, with any leading `v` prefix stripped. No
//!   subprocess is spawned.
//! - **Subprocess probe**: every other engine is launched as
//!   `<engine> --version`, its standard output buffered until the process
//!   exits, then trimmed.
//!
//! Failures come back as [`ResolveError`] values; a resolver never panics
//! and never blocks its caller on an error path.

use std::io;

use thiserror::Error;

use crate::launcher::{Launcher, SystemLauncher};

/// Failure to determine an engine's installed version.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The probe subprocess could not be started.
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Reading the probe's output failed mid-stream.
    #[error("error reading version output from '{command}': {source}")]
    Read {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The probe ran but exited with a failure status.
    #[error("'{command}' exited abnormally while reporting its version")]
    AbnormalExit { command: String },

    /// The probe exited cleanly without printing anything.
    #[error("'{command}' produced no version output")]
    NoOutput { command: String },
}

/// The runtime hosting the checker, answered in-process.
///
/// The alias set is configuration, not a hardcoded pair: callers name every
/// engine identifier that refers to this runtime, and supply the version
/// value themselves so tests can pin it.
#[derive(Debug, Clone)]
pub struct HostRuntime {
    aliases: Vec<String>,
    version: String,
}

impl HostRuntime {
    pub fn new<I, S>(aliases: I, version: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            version: version.into(),
        }
    }

    fn matches(&self, engine: &str) -> bool {
        self.aliases.iter().any(|alias| alias == engine)
    }

    /// Version with any leading non-numeric prefix stripped ("v8.1.0" → "8.1.0").
    fn bare_version(&self) -> String {
        self.version
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .to_string()
    }
}

/// Resolves the installed version of one named engine.
pub struct Resolver {
    launcher: Box<dyn Launcher>,
    host: Option<HostRuntime>,
}

impl Resolver {
    /// Resolver probing real subprocesses, with no host runtime registered.
    pub fn new() -> Self {
        Self::with_launcher(Box::new(SystemLauncher))
    }

    /// Resolver over a caller-supplied launcher.
    pub fn with_launcher(launcher: Box<dyn Launcher>) -> Self {
        Self {
            launcher,
            host: None,
        }
    }

    /// Register the host runtime, short-circuiting probes for its aliases.
    pub fn with_host_runtime(mut self, host: HostRuntime) -> Self {
        self.host = Some(host);
        self
    }

    /// Determine the installed version of `engine`.
    pub fn resolve(&self, engine: &str) -> Result<String, ResolveError> {
        if let Some(host) = &self.host {
            if host.matches(engine) {
                return Ok(host.bare_version());
            }
        }
        self.probe(engine)
    }

    fn probe(&self, engine: &str) -> Result<String, ResolveError> {
        let mut query =
            self.launcher
                .spawn(engine, &["--version"])
                .map_err(|source| ResolveError::Spawn {
                    command: engine.to_string(),
                    source,
                })?;

        // Buffer every chunk; the version is only complete once the process
        // exits. Resolving on the first chunk drops output that arrives in
        // several pieces.
        let mut raw = Vec::new();
        loop {
            match query.next_chunk() {
                Ok(Some(chunk)) => raw.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(source) => {
                    return Err(ResolveError::Read {
                        command: engine.to_string(),
                        source,
                    })
                }
            }
        }

        let exited_cleanly = query.wait().map_err(|source| ResolveError::Read {
            command: engine.to_string(),
            source,
        })?;
        if !exited_cleanly {
            return Err(ResolveError::AbnormalExit {
                command: engine.to_string(),
            });
        }

        let text = String::from_utf8_lossy(&raw);
        extract_version(&text).ok_or_else(|| ResolveError::NoOutput {
            command: engine.to_string(),
        })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull a version string out of `--version` output.
///
/// Most tools print the bare version (`2.11.2`), possibly `v`-prefixed.
/// Some print a banner around it (`ruby 3.2.1 (2023-02-08 ...)`), for which
/// the first version-shaped token wins. Output with nothing version-shaped
/// is passed through trimmed and left to fail range evaluation downstream.
fn extract_version(output: &str) -> Option<String> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return None;
    }

    let bare = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    if semver::Version::parse(bare).is_ok() {
        return Some(bare.to_string());
    }

    if let Ok(re) = regex::Regex::new(r"\d+\.\d+(\.\d+)?(-[0-9A-Za-z.-]+)?") {
        if let Some(m) = re.find(trimmed) {
            return Some(m.as_str().to_string());
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::testing::{Script, ScriptedLauncher};

    fn resolver(launcher: ScriptedLauncher) -> Resolver {
        Resolver::with_launcher(Box::new(launcher))
    }

    #[test]
    fn host_runtime_answers_without_subprocess() {
        // Empty launcher: any probe would fail, so success proves no spawn.
        let resolver = resolver(ScriptedLauncher::new())
            .with_host_runtime(HostRuntime::new(["node", "iojs"], "v4.0.0"));

        assert_eq!(resolver.resolve("node").unwrap(), "4.0.0");
        assert_eq!(resolver.resolve("iojs").unwrap(), "4.0.0");
    }

    #[test]
    fn non_alias_engines_still_probe() {
        let resolver = resolver(
            ScriptedLauncher::new().script("npm", Script::Emits(vec!["2.11.2\n"])),
        )
        .with_host_runtime(HostRuntime::new(["node"], "v4.0.0"));

        assert_eq!(resolver.resolve("npm").unwrap(), "2.11.2");
    }

    #[test]
    fn chunked_output_is_concatenated() {
        let resolver =
            resolver(ScriptedLauncher::new().script("npm", Script::Emits(vec!["2.1", ".0\n"])));

        assert_eq!(resolver.resolve("npm").unwrap(), "2.1.0");
    }

    #[test]
    fn missing_command_fails_with_spawn_error() {
        let resolver = resolver(ScriptedLauncher::new());

        let err = resolver.resolve("npm").unwrap_err();
        assert!(matches!(err, ResolveError::Spawn { .. }));
    }

    #[test]
    fn abnormal_exit_fails_resolution() {
        let resolver = resolver(
            ScriptedLauncher::new().script("npm", Script::EmitsThenFails(vec!["boom\n"])),
        );

        let err = resolver.resolve("npm").unwrap_err();
        assert!(matches!(err, ResolveError::AbnormalExit { .. }));
    }

    #[test]
    fn stream_error_fails_resolution() {
        let resolver = resolver(ScriptedLauncher::new().script("npm", Script::StreamError));

        let err = resolver.resolve("npm").unwrap_err();
        assert!(matches!(err, ResolveError::Read { .. }));
    }

    #[test]
    fn empty_output_fails_resolution() {
        let resolver = resolver(ScriptedLauncher::new().script("npm", Script::Emits(vec![])));

        let err = resolver.resolve("npm").unwrap_err();
        assert!(matches!(err, ResolveError::NoOutput { .. }));
    }

    #[test]
    fn extract_version_strips_v_prefix() {
        assert_eq!(extract_version("v10.2.0\n").as_deref(), Some("10.2.0"));
    }

    #[test]
    fn extract_version_finds_token_in_banner() {
        let output = "ruby 3.2.1 (2023-02-08 revision 31819e82c8)";
        assert_eq!(extract_version(output).as_deref(), Some("3.2.1"));
    }

    #[test]
    fn extract_version_passes_through_unrecognized_text() {
        assert_eq!(extract_version("bleeding-edge\n").as_deref(), Some("bleeding-edge"));
    }
}
