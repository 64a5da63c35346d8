//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.scribe/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::runner::{DEFAULT_MAX_HISTORY, DEFAULT_MAX_OUTPUT_LINES};
use crate::core::session::SessionFile;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ScribeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
    /// Extension → language tag, merged over the built-in table.
    #[serde(default)]
    pub languages: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub restore_session: Option<bool>,
    pub tab_width: Option<u8>,
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TerminalConfig {
    pub shell: Option<String>,
    pub max_output_lines: Option<usize>,
    pub max_history: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TAB_WIDTH: u8 = 4;
pub const DEFAULT_SHELL: &str = "/bin/sh";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub restore_session: bool,
    pub tab_width: u8,
    /// `None` when there is nowhere to keep a session (no home directory).
    pub session_file: Option<PathBuf>,
    pub shell: String,
    pub max_output_lines: usize,
    pub max_history: usize,
    pub languages: HashMap<String, String>,
}

/// Values that came from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub no_restore: bool,
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

/// Returns the path to `~/.scribe/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".scribe").join("config.toml"))
}

/// Load config from `~/.scribe/config.toml`.
pub fn load_config() -> Result<ScribeConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(ScribeConfig::default())
        }
    }
}

/// Load config from `path`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ScribeConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<ScribeConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ScribeConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ScribeConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Scribe Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# restore_session = true             # Reopen last session's files (--no-restore skips)
# tab_width = 4
# session_file = "/path/to/session.json"   # Or set SCRIBE_SESSION_FILE

# [terminal]
# shell = "/bin/bash"                # Or set SCRIBE_SHELL; defaults to $SHELL
# max_output_lines = 5000
# max_history = 500

# [languages]
# "rs" = "rust"
# "jsx" = "javascript"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ScribeConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// `resolve` with an injectable environment lookup.
pub fn resolve_with_env(
    config: &ScribeConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Restore: CLI → config → default
    let restore_session = !cli.no_restore && config.general.restore_session.unwrap_or(true);

    // Session file: env → config → default location
    let session_file = env("SCRIBE_SESSION_FILE")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .or_else(|| config.general.session_file.clone())
        .or_else(SessionFile::default_location);

    // Shell: SCRIBE_SHELL → config → $SHELL → /bin/sh
    let shell = env("SCRIBE_SHELL")
        .filter(|s| !s.is_empty())
        .or_else(|| config.terminal.shell.clone())
        .or_else(|| env("SHELL").filter(|s| !s.is_empty()))
        .unwrap_or_else(|| DEFAULT_SHELL.to_string());

    ResolvedConfig {
        restore_session,
        tab_width: config
            .general
            .tab_width
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_TAB_WIDTH),
        session_file,
        shell,
        max_output_lines: config
            .terminal
            .max_output_lines
            .unwrap_or(DEFAULT_MAX_OUTPUT_LINES),
        max_history: config.terminal.max_history.unwrap_or(DEFAULT_MAX_HISTORY),
        languages: config.languages.clone(),
    }
}
