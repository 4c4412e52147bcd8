//! Project manifest loading.
//!
//! The checker only cares about the `engines` section of `package.json`:
//! a mapping from engine name to version-range expression. Everything else
//! in the file is ignored. Library callers can skip this module entirely
//! and hand `check_engines` a mapping they built themselves.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EngineCheckError, Result};

/// The subset of a `package.json` manifest the checker reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Package name, for diagnostics only.
    #[serde(default)]
    pub name: Option<String>,

    /// Declared engine constraints. A missing section means there is
    /// nothing to check.
    #[serde(default)]
    pub engines: BTreeMap<String, String>,
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                EngineCheckError::ManifestNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                EngineCheckError::Io(e)
            }
        })?;

        serde_json::from_str(&raw).map_err(|e| EngineCheckError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
