//! Theme preference persistence
//!
//! The only persisted client state: `theme.toml` in the state directory
//! (the browser build keeps it under the `ecoplot-theme` storage key). A
//! stored value always wins over the system preference hint; the hint only
//! applies while the user has never chosen.

use crate::config::ClientConfig;
use crate::error::{EcoPlotError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Light/dark theme choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse the stored form
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(EcoPlotError::storage(format!(
                "unknown theme '{other}', expected light or dark"
            ))),
        }
    }

    /// Body class applied in dark mode
    pub fn body_class(&self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => "dark-mode",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// File-backed theme preference store
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    /// Store under the configured state directory
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            path: config.state_dir.join("theme.toml"),
        }
    }

    /// Stored preference, if the user ever chose one
    pub fn stored(&self) -> Result<Option<Theme>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| EcoPlotError::storage(format!("failed to read theme file: {e}")))?;
        let file: ThemeFile = toml::from_str(&content)
            .map_err(|e| EcoPlotError::storage(format!("failed to parse theme file: {e}")))?;
        Ok(Some(file.theme))
    }

    /// Effective theme at page init: stored wins, then the system hint
    pub fn initial(&self, system_prefers_dark: bool) -> Result<Theme> {
        match self.stored()? {
            Some(theme) => Ok(theme),
            None if system_prefers_dark => Ok(Theme::Dark),
            None => Ok(Theme::Light),
        }
    }

    /// Persist a choice
    pub fn set(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| EcoPlotError::storage(format!("failed to create state dir: {e}")))?;
        }
        let content = toml::to_string(&ThemeFile { theme })
            .map_err(|e| EcoPlotError::storage(format!("failed to serialize theme: {e}")))?;
        fs::write(&self.path, content)
            .map_err(|e| EcoPlotError::storage(format!("failed to write theme file: {e}")))?;
        debug!(theme = theme.as_str(), "theme preference stored");
        Ok(())
    }

    /// Flip between light and dark, persisting the result
    pub fn toggle(&self, system_prefers_dark: bool) -> Result<Theme> {
        let next = match self.initial(system_prefers_dark)? {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ThemeStore) {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::default().with_state_dir(dir.path());
        (dir, ThemeStore::new(&config))
    }

    #[test]
    fn unset_preference_follows_system_hint() {
        let (_dir, store) = store();
        assert_eq!(store.initial(true).unwrap(), Theme::Dark);
        assert_eq!(store.initial(false).unwrap(), Theme::Light);
    }

    #[test]
    fn stored_dark_wins_over_light_system() {
        let (_dir, store) = store();
        store.set(Theme::Dark).unwrap();
        assert_eq!(store.initial(false).unwrap(), Theme::Dark);
        assert_eq!(store.initial(false).unwrap().body_class(), "dark-mode");
    }

    #[test]
    fn toggle_round_trips_and_persists() {
        let (_dir, store) = store();
        assert_eq!(store.toggle(false).unwrap(), Theme::Dark);
        assert_eq!(store.stored().unwrap(), Some(Theme::Dark));
        assert_eq!(store.toggle(false).unwrap(), Theme::Light);
        assert_eq!(store.stored().unwrap(), Some(Theme::Light));
    }

    #[test]
    fn stored_form_matches_storage_contract() {
        let (dir, store) = store();
        store.set(Theme::Dark).unwrap();
        let raw = std::fs::read_to_string(dir.path().join("theme.toml")).unwrap();
        assert!(raw.contains("theme = \"dark\""));
    }
}
