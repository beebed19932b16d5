//! TOML-based configuration for mouse-probe.
//!
//! Reads `ProbeConfig` from `$XDG_CONFIG_HOME/mouse-probe/config.toml`
//! (falling back to `~/.config/mouse-probe/config.toml`).  A missing file is
//! not an error: every field has a default, so the probe runs with no
//! configuration at all.
//!
//! ```toml
//! [scan]
//! input_dir = "/dev/input"
//! node_prefix = "event"
//! max_candidates = 32
//! grab = false
//!
//! [display]
//! show_sync = false
//! poll_interval_ms = 100
//!
//! [log]
//! level = "info"
//! ```
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent, and whole sections default via
//! `#[serde(default)]`, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine config directory (neither XDG_CONFIG_HOME nor HOME is set)")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is unusable.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Where and how to look for the mouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Directory holding the event nodes.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Node name prefix; the rest of the name must be the numeric index.
    #[serde(default = "default_node_prefix")]
    pub node_prefix: String,
    /// Upper bound on candidates probed per scan.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Take exclusive delivery of the mouse's events (`EVIOCGRAB`).
    #[serde(default)]
    pub grab: bool,
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Print `SYN_REPORT` markers.
    #[serde(default)]
    pub show_sync: bool,
    /// Shutdown-flag check interval while waiting for input.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_input_dir() -> PathBuf {
    PathBuf::from("/dev/input")
}
fn default_node_prefix() -> String {
    "event".to_string()
}
fn default_max_candidates() -> usize {
    32
}
fn default_poll_interval_ms() -> u64 {
    100
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            node_prefix: default_node_prefix(),
            max_candidates: default_max_candidates(),
            grab: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_sync: false,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DisplayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ProbeConfig {
    /// Rejects values that would make the scan or the loop meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.max_candidates == 0 {
            return Err(ConfigError::Invalid("scan.max_candidates must be at least 1".into()));
        }
        if self.scan.node_prefix.is_empty() {
            return Err(ConfigError::Invalid("scan.node_prefix must not be empty".into()));
        }
        if self.display.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("display.poll_interval_ms must be at least 1".into()));
        }
        Ok(())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if neither `XDG_CONFIG_HOME`
/// nor `HOME` is set.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from the default location, or defaults if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<ProbeConfig, ConfigError> {
    let path = config_file_path()?;
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProbeConfig::default()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// Loads the config from an explicit path.  The file must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_file(path: &Path) -> Result<ProbeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parses TOML text into a config.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(content: &str) -> Result<ProbeConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// `$XDG_CONFIG_HOME/mouse-probe` or `~/.config/mouse-probe`.
fn platform_config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("mouse-probe"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
