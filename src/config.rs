//! Project-level configuration file, `.meshguard.toml`.
//!
//! The config file points at the inspection profile and sets the CI
//! failure gate. A missing file is not an error; every field has a
//! default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::report::Severity;

pub const CONFIG_FILE: &str = ".meshguard.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inspection profile JSON, relative to the project root. `None`
    /// means the built-in defaults.
    pub profile: Option<PathBuf>,
    /// Exit nonzero when any result reaches this severity.
    pub fail_on: Severity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: None,
            fail_on: Severity::Error,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load `.meshguard.toml` from the project root.
    pub fn discover(root: &Path) -> Result<Self> {
        Self::load(&root.join(CONFIG_FILE))
    }

    /// Template written by `meshguard init`.
    pub fn starter_toml() -> &'static str {
        r#"# meshguard project configuration

# Inspection profile, exported with `meshguard export-profile`.
# Remove to use the built-in defaults.
# profile = "meshguard-profile.json"

# Exit nonzero when any result reaches this severity
# (info | warning | error | critical).
fail_on = "error"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert!(config.profile.is_none());
        assert_eq!(config.fail_on, Severity::Error);
    }

    #[test]
    fn file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "profile = \"p.json\"\nfail_on = \"warning\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.profile.as_deref(), Some(Path::new("p.json")));
        assert_eq!(config.fail_on, Severity::Warning);
    }

    #[test]
    fn starter_template_parses() {
        let config: Config = toml::from_str(Config::starter_toml()).unwrap();
        assert_eq!(config.fail_on, Severity::Error);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "fail_on = [1]").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
