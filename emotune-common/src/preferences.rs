//! Persisted client preferences
//!
//! Holds the two pieces of process-wide state the client keeps between runs:
//! the theme flag and the email of the signed-in account. Loaded once at
//! startup and cleared explicitly on logout; nothing reads the file ad hoc.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Display theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Preferences file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    /// Email of the account that last logged in
    pub session_email: Option<String>,
}

/// Reads and writes the preferences file
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences; a missing file yields defaults
    pub fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No preferences file, using defaults");
            return Ok(Preferences::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Preferences(format!("Parse {} failed: {}", self.path.display(), e)))
    }

    /// Write preferences (temp file + rename)
    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(prefs)
            .map_err(|e| Error::Preferences(format!("Serialize failed: {}", e)))?;
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Persist the signed-in email
    pub fn remember_session(&self, email: &str) -> Result<Preferences> {
        let mut prefs = self.load()?;
        prefs.session_email = Some(email.trim().to_string());
        self.save(&prefs)?;
        Ok(prefs)
    }

    /// Forget the signed-in email, keeping the theme
    pub fn clear_session(&self) -> Result<Preferences> {
        let mut prefs = self.load()?;
        if prefs.session_email.take().is_some() {
            info!("Session email cleared");
        }
        self.save(&prefs)?;
        Ok(prefs)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<Preferences> {
        let mut prefs = self.load()?;
        prefs.theme = theme;
        self.save(&prefs)?;
        Ok(prefs)
    }
}
