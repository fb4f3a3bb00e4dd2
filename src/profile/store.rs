//! Active-profile resolution and caching.

use std::path::{Path, PathBuf};

use crate::error::{GuardError, Result};

use super::{document, Profile};

/// Owns profiles for a session. At most one profile is active; it is
/// resolved lazily on first use, cached afterwards, and created as a
/// transient default when no persisted profile exists.
#[derive(Default)]
pub struct ProfileStore {
    path: Option<PathBuf>,
    active: Option<Profile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by a profile document on disk.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            active: None,
        }
    }

    /// Resolve the active profile, loading or creating it on first call.
    pub fn active_profile(&mut self) -> &Profile {
        if self.active.is_none() {
            self.active = Some(self.resolve());
        }
        self.active.as_ref().expect("resolved above")
    }

    /// Clone of the active profile. Scans snapshot the profile through
    /// this at dispatch time so mid-scan store mutation cannot change a
    /// running scan's thresholds.
    pub fn snapshot(&mut self) -> Profile {
        self.active_profile().clone()
    }

    pub fn set_active(&mut self, profile: Profile) {
        self.active = Some(profile);
    }

    /// Persist the active profile to the backing path, if any.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| GuardError::Profile("store has no backing path".into()))?;
        let json = document::export(self.active_profile())?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    fn resolve(&self) -> Profile {
        if let Some(path) = &self.path {
            match load_document(path) {
                Ok(Some(profile)) => {
                    tracing::info!(path = %path.display(), profile = %profile.name, "loaded active profile");
                    return profile;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load profile, falling back to defaults");
                }
            }
        }
        tracing::debug!("using transient default profile");
        Profile::with_default_rules()
    }
}

fn load_document(path: &Path) -> Result<Option<Profile>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(document::import(&content)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_transient_default() {
        let mut store = ProfileStore::with_path("/nonexistent/profile.json");
        assert_eq!(store.active_profile().name, "Default Profile");
    }

    #[test]
    fn active_profile_is_cached_after_first_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let mut custom = Profile::empty("Custom");
        custom.description = "strict".into();
        std::fs::write(&path, document::export(&custom).unwrap()).unwrap();

        let mut store = ProfileStore::with_path(&path);
        assert_eq!(store.active_profile().name, "Custom");

        // Deleting the backing file does not evict the cache.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(store.active_profile().name, "Custom");
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let mut store = ProfileStore::new();
        let snapshot = store.snapshot();

        let mut altered = Profile::empty("Altered");
        altered.set_rule_config(crate::profile::RuleConfig::new("SM_Naming").disabled());
        store.set_active(altered);

        assert!(snapshot.is_rule_enabled("SM_Naming"));
        assert!(!store.active_profile().is_rule_enabled("SM_Naming"));
    }

    #[test]
    fn save_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let mut store = ProfileStore::with_path(&path);
        store.active_profile();
        store.save().unwrap();

        let mut reloaded = ProfileStore::with_path(&path);
        assert_eq!(
            reloaded.active_profile().rule_configs().len(),
            Profile::with_default_rules().rule_configs().len()
        );
    }
}
