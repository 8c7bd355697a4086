//! Client configuration
//!
//! Configuration is environment-driven with sensible defaults so the CLI can
//! run against a local EcoPlot server without any setup.

use crate::error::{EcoPlotError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default API base when `ECOPLOT_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the EcoPlot API client and local state
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the EcoPlot server
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Directory for persisted client state (theme preference)
    pub state_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            state_dir: default_state_dir(),
        }
    }
}

impl ClientConfig {
    /// Build configuration from environment variables
    ///
    /// Recognized variables: `ECOPLOT_API_URL`, `ECOPLOT_TIMEOUT_SECS`,
    /// `ECOPLOT_STATE_DIR`. Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("ECOPLOT_API_URL") {
            config.base_url = Url::parse(&raw)
                .map_err(|e| EcoPlotError::config(format!("invalid ECOPLOT_API_URL: {e}")))?;
        }

        if let Ok(raw) = std::env::var("ECOPLOT_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|e| EcoPlotError::config(format!("invalid ECOPLOT_TIMEOUT_SECS: {e}")))?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = std::env::var("ECOPLOT_STATE_DIR") {
            config.state_dir = PathBuf::from(raw);
        }

        Ok(config)
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Override the state directory
    pub fn with_state_dir(mut self, state_dir: impl Into<PathBuf>) -> Self {
        self.state_dir = state_dir.into();
        self
    }
}

/// Default state directory: `~/.ecoplot`, falling back to the working directory
fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ecoplot")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_server() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides_apply() {
        let config = ClientConfig::default()
            .with_base_url(Url::parse("https://ecoplot.example/").unwrap())
            .with_state_dir("/tmp/ecoplot-test");
        assert_eq!(config.base_url.host_str(), Some("ecoplot.example"));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/ecoplot-test"));
    }
}
