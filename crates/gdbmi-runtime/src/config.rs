use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve the configuration file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. GDBMI_CONFIG environment variable (with tilde expansion)
/// 3. XDG config directory
/// 4. ~/.config/gdbmi (fallback for systems without XDG)
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("GDBMI_CONFIG") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("gdbmi").join("config.toml"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home)
            .join(".config")
            .join("gdbmi")
            .join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no HOME directory or XDG config directory found"
            .to_string(),
    ))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GdbConfig {
    #[serde(default = "default_gdb_path")]
    pub path: String,
    #[serde(default = "default_gdb_args")]
    pub args: Vec<String>,
    /// Terminal the debuggee's stdio is pointed at after launch, so its
    /// output stays off the MI stream. Empty leaves it inherited.
    #[serde(default = "default_inferior_tty")]
    pub inferior_tty: String,
}

fn default_gdb_path() -> String {
    "gdb".to_string()
}

fn default_inferior_tty() -> String {
    "/dev/null".to_string()
}

fn default_gdb_args() -> Vec<String> {
    [
        "--return-child-result",
        "--quiet",
        "--nx",
        "--nw",
        "--interpreter=mi2",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for GdbConfig {
    fn default() -> Self {
        Self {
            path: default_gdb_path(),
            args: default_gdb_args(),
            inferior_tty: default_inferior_tty(),
        }
    }
}

/// What the read loop does with a line it cannot parse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// End the read loop with the parse error.
    #[default]
    Abort,
    /// Drop the line and keep reading.
    Skip,
}

/// Which UI entry point receives display values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Panel,
    Float,
    Virtual,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default)]
    pub on_parse_error: ParseErrorPolicy,
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default = "default_console_history")]
    pub console_history: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout_ms: Option<u64>,
}

fn default_console_history() -> usize {
    1000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            on_parse_error: ParseErrorPolicy::default(),
            display_mode: DisplayMode::default(),
            console_history: default_console_history(),
            command_timeout_ms: None,
        }
    }
}

impl SessionConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub gdb: GdbConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        resolve_config_path(None)
    }
}
