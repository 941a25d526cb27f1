//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.runpad/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::executor::http::DEFAULT_ENDPOINT;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RunpadConfig {
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExecutorConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EditorConfig {
    pub language: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Absolute, or relative to `~/.runpad/`.
    pub draft_file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LANGUAGE: &str = "python";
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub language: String,
    pub theme: String,
    /// `None` when no home directory could be found.
    pub draft_path: Option<PathBuf>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.runpad/`.
pub fn runpad_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".runpad"))
}

/// Returns the path to `~/.runpad/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    runpad_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.runpad/config.toml`, generating a commented default
/// if it doesn't exist yet.
pub fn load_config() -> Result<RunpadConfig, ConfigError> {
    match config_path() {
        Some(path) => {
            if !path.exists() {
                info!("No config file found, generating default at {}", path.display());
                generate_default_config(&path);
                return Ok(RunpadConfig::default());
            }
            load_config_from(&path)
        }
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(RunpadConfig::default())
        }
    }
}

/// Load config from an explicit path. A missing file is an error here.
pub fn load_config_from(path: &Path) -> Result<RunpadConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RunpadConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = format!(
        r#"# runpad configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [executor]
# endpoint = "{DEFAULT_ENDPOINT}"   # Or RUNPAD_ENDPOINT / --endpoint
# timeout_secs = {DEFAULT_TIMEOUT_SECS}                     # Or RUNPAD_TIMEOUT_SECS / --timeout

# [editor]
# language = "{DEFAULT_LANGUAGE}"                  # Or RUNPAD_LANGUAGE
# theme = "{DEFAULT_THEME}"

# [storage]
# draft_file = "drafts.json"             # Relative to ~/.runpad/
"#
    );

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RunpadConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |name| std::env::var(name).ok())
}

/// `resolve` with the environment passed in as a lookup function.
fn resolve_with(
    config: &RunpadConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| env("RUNPAD_ENDPOINT"))
        .or_else(|| config.executor.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Timeout: CLI → env → config → default. Zero would fail every request.
    let timeout_secs = cli
        .timeout_secs
        .or_else(|| env_u64(&env, "RUNPAD_TIMEOUT_SECS"))
        .or(config.executor.timeout_secs)
        .filter(|&secs| secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    // Language: env → config → default
    let language = env("RUNPAD_LANGUAGE")
        .or_else(|| config.editor.language.clone())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let theme = config
        .editor
        .theme
        .clone()
        .unwrap_or_else(|| DEFAULT_THEME.to_string());

    ResolvedConfig {
        endpoint,
        timeout: Duration::from_secs(timeout_secs),
        language,
        theme,
        draft_path: resolve_draft_path(config),
    }
}

fn env_u64(env: impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = env(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", name, raw, e);
            None
        }
    }
}

/// Draft file: absolute config path wins, relative ones live under `~/.runpad/`.
fn resolve_draft_path(config: &RunpadConfig) -> Option<PathBuf> {
    match config.storage.draft_file.as_deref() {
        Some(file) if Path::new(file).is_absolute() => Some(PathBuf::from(file)),
        Some(file) => runpad_dir().map(|d| d.join(file)),
        None => runpad_dir().map(|d| d.join("drafts.json")),
    }
}
