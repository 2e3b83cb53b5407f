//! Profile store and persistence
//!
//! Holds every named profile plus the active-profile pointer, and round-trips
//! the whole set through a single JSON document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::student::Profile;

/// Errors raised by profile CRUD and persistence
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile name cannot be empty")]
    EmptyName,
    #[error("a profile named '{0}' already exists")]
    DuplicateName(String),
    #[error("failed to write profile store to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize profile store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// All profiles known to the session
///
/// The `active` pointer, when set, always names a key in `profiles`; loading
/// drops a stale pointer rather than carrying it around.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileStore {
    profiles: BTreeMap<String, Profile>,
    active: Option<String>,
}

impl ProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty profile and make it active
    ///
    /// Fails without touching the store when the trimmed name is empty or
    /// already taken.
    pub fn create(&mut self, name: &str) -> Result<&mut Profile, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if self.profiles.contains_key(name) {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }
        self.active = Some(name.to_string());
        log::info!("Created profile '{}'", name);
        Ok(self.profiles.entry(name.to_string()).or_insert_with(Profile::new))
    }

    /// Delete a profile; clears the active pointer if it pointed here
    pub fn delete(&mut self, name: &str) -> bool {
        let removed = self.profiles.remove(name).is_some();
        if removed {
            if self.active.as_deref() == Some(name) {
                self.active = None;
            }
            log::info!("Deleted profile '{}'", name);
        }
        removed
    }

    /// Make a profile active; unknown names are a no-op
    pub fn activate(&mut self, name: &str) -> bool {
        if self.profiles.contains_key(name) {
            self.active = Some(name.to_string());
            true
        } else {
            false
        }
    }

    /// Name of the active profile
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active profile
    pub fn active(&self) -> Option<&Profile> {
        self.active.as_deref().and_then(|n| self.profiles.get(n))
    }

    /// The active profile, mutably
    pub fn active_mut(&mut self) -> Option<&mut Profile> {
        match self.active.as_deref() {
            Some(name) => self.profiles.get_mut(name),
            None => None,
        }
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Look up a profile by name, mutably
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.get_mut(name)
    }

    /// All profile names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store has no profiles
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Merge profiles from another set, skipping names that already exist
    ///
    /// Returns how many were taken. The first merged profile becomes active
    /// when nothing was active before.
    pub fn merge(&mut self, incoming: BTreeMap<String, Profile>) -> usize {
        let mut merged = 0;
        for (name, mut profile) in incoming {
            if name.trim().is_empty() || self.profiles.contains_key(&name) {
                continue;
            }
            profile.normalize();
            if self.active.is_none() {
                self.active = Some(name.clone());
            }
            self.profiles.insert(name, profile);
            merged += 1;
        }
        merged
    }

    /// Re-establish invariants after deserialization
    fn normalize(&mut self) {
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
        if let Some(name) = &self.active {
            if !self.profiles.contains_key(name) {
                log::warn!("Dropping unknown active profile '{}'", name);
                self.active = None;
            }
        }
    }

    /// Load the store from disk
    ///
    /// A missing, unreadable, or corrupted file yields an empty store; losing
    /// the saved profiles is better than refusing to start.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No profile store at {:?}, starting empty", path);
            return Self::new();
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to read profile store {:?}: {}", path, e);
                return Self::new();
            }
        };

        match serde_json::from_str::<ProfileStore>(&text) {
            Ok(mut store) => {
                store.normalize();
                log::info!("Loaded {} profiles from {:?}", store.len(), path);
                store
            }
            Err(e) => {
                log::warn!("Failed to parse profile store {:?}: {}", path, e);
                Self::new()
            }
        }
    }

    /// Save the store to disk
    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ProfileError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| ProfileError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::info!("Saved {} profiles to {:?}", self.len(), path);
        Ok(())
    }
}

/// Default per-user location of the profile store
pub fn default_store_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "shigure", "Shigure") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("profiles.json");
        path
    } else {
        PathBuf::from("./profiles.json")
    }
}
