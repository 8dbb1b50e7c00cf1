//! Configuration loading for the reference CLI demo.
//!
//! Mirrors the shape the core itself has no opinion about: which
//! reference stages to assemble and with what parameters. Loaded from a
//! TOML file and deserialized with `serde`, the way a host application
//! would configure a real pipeline rather than hard-code it.
//!
//! # Example
//!
//! ```toml
//! log_level = "debug"
//!
//! [framer]
//! max_frame_len = 65536
//!
//! [tick]
//! interval_ms = 1000
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration for the demo pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level passed to [`crate::logging::init_logging`] when the CLI
    /// doesn't override it with `--log-level`.
    pub log_level: String,

    /// Parameters for the reference length-prefix framer stage.
    pub framer: FramerConfig,

    /// Parameters for the reference tick stage.
    pub tick: TickConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            framer: FramerConfig::default(),
            tick: TickConfig::default(),
        }
    }
}

/// Configuration for [`crate::stages::LengthPrefixFramer`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    /// Largest total frame size (length prefix included) this framer will
    /// write or accept.
    pub max_frame_len: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_frame_len: 1 << 20,
        }
    }
}

/// Configuration for [`crate::stages::TickStage`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Interval, in milliseconds, at which the tick stage re-arms itself.
    pub interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

/// Errors loading or parsing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Load configuration from a TOML file. Missing fields fall back to
/// [`Config::default`]'s values via `#[serde(default)]`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path_str = path.as_ref().display().to_string();
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path_str.clone(),
        source,
    })?;
    load_config_from_str(&content).map_err(|source| ConfigError::Parse {
        path: path_str,
        source,
    })
}

/// Load configuration from a TOML string, e.g. for tests or embedded
/// defaults.
pub fn load_config_from_str(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}
