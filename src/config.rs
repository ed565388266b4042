//! Configuration for simbridge
//!
//! Centralized configuration with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a bridge instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Socket Configuration
    // -------------------------------------------------------------------------
    /// Explicit socket path. When unset the path is derived as
    /// `<system temp dir>/<app_name>-<user>` at each (re)bind.
    pub socket_override: Option<PathBuf>,

    /// Application name used in the derived socket path
    pub app_name: String,

    // -------------------------------------------------------------------------
    // Supervision Configuration
    // -------------------------------------------------------------------------
    /// How often the watchdog checks the socket path and worker liveness
    pub watchdog_interval: Duration,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// Half-extent of the bounding cube scanned for entity snapshots,
    /// centered on the world origin (game units)
    pub scan_radius: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_override: None,
            app_name: "simbridge".to_string(),
            watchdog_interval: Duration::from_secs(1),
            scan_radius: 100_000.0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve the socket path for the next bind.
    ///
    /// Recomputed on every call so a restart after an environment change
    /// picks up the current temp dir and user.
    pub fn socket_path(&self) -> PathBuf {
        match &self.socket_override {
            Some(path) => path.clone(),
            None => {
                let user = env::var("USER").unwrap_or_else(|_| "user".to_string());
                let mut path = env::temp_dir();
                path.push(format!("{}-{}", self.app_name, user));
                path
            }
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set an explicit socket path (disables the derived path)
    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.socket_override = Some(path.into());
        self
    }

    /// Set the application name used in the derived socket path
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = name.into();
        self
    }

    /// Set the watchdog poll interval
    pub fn watchdog_interval(mut self, interval: Duration) -> Self {
        self.config.watchdog_interval = interval;
        self
    }

    /// Set the entity-scan radius (in game units)
    pub fn scan_radius(mut self, radius: f64) -> Self {
        self.config.scan_radius = radius;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
