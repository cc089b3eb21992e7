//! Server configuration
//!
//! Configuration is read from an optional YAML file and then adjusted by
//! environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `WEBROOT_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "webroot.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

/// Listening address of the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Directory the server serves from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 10000,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("webroot"),
        }
    }
}

impl ServerConfig {
    /// Returns the address in `host:port` form, suitable for binding.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Loads the configuration for the running process.
    ///
    /// The file named by `WEBROOT_CONFIG` is read if set, otherwise
    /// `webroot.yaml` if present, otherwise the defaults are used. The
    /// `LISTEN_HOST`, `LISTEN_PORT` and `WEBROOT_DIR` variables override
    /// whatever the file says.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var("WEBROOT_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let cfg = serde_yaml::from_str(text)?;
        Ok(cfg)
    }

    /// Applies environment style overrides using `lookup` to fetch values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("LISTEN_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("LISTEN_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("LISTEN_PORT is not a valid port: {port:?}"))?;
        }

        if let Some(root) = lookup("WEBROOT_DIR") {
            self.static_files.root = PathBuf::from(root);
        }

        Ok(())
    }
}
