//! Configuration for arialive.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (ARIALIVE_HOME, ARIALIVE_KEEPALIVE_SECS)
//! 2. Config file (.arialive/config.yaml)
//! 3. Defaults (~/.arialive, 5 s keep-alive, cache of 9, 100 ms pump)
//!
//! Config file discovery searches the current directory and its parents
//! for .arialive/config.yaml.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{ManagerConfig, DEFAULT_CACHE_SIZE};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<std::result::Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// State directory (absolute, or relative to the config file)
    pub home: Option<String>,

    #[serde(default)]
    pub live_regions: LiveRegionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveRegionConfig {
    /// Seconds a message may wait in the queue before it is discarded
    pub keep_alive_secs: Option<u64>,

    /// Number of spoken messages kept for review
    pub cache_size: Option<usize>,

    /// Milliseconds between drain ticks
    pub pump_interval_ms: Option<u64>,

    /// Master switch for live region support
    pub infer_live_regions: Option<bool>,
}

/// Resolved configuration with absolute paths and concrete tunables
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the arialive home (override files live under it)
    pub home: PathBuf,

    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,

    /// Live-region tunables
    pub settings: Settings,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub keep_alive_secs: u64,
    pub cache_size: usize,
    pub pump_interval_ms: u64,
    pub infer_live_regions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keep_alive_secs: 5,
            cache_size: DEFAULT_CACHE_SIZE,
            pump_interval_ms: 100,
            infer_live_regions: true,
        }
    }
}

impl Settings {
    /// Manager tunables derived from these settings.
    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            keep_alive: Duration::from_secs(self.keep_alive_secs),
            cache_size: self.cache_size,
            infer_live_regions: self.infer_live_regions,
        }
    }

    /// Interval between drain ticks.
    pub fn pump_interval(&self) -> Duration {
        Duration::from_millis(self.pump_interval_ms)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".arialive").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(&path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".arialive");

    let config_file = find_config_file();
    let file = match &config_file {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let home = if let Ok(env_home) = std::env::var("ARIALIVE_HOME") {
        PathBuf::from(env_home)
    } else if let (Some(home_str), Some(path)) = (&file.home, &config_file) {
        let base = path.parent().unwrap_or(Path::new("."));
        resolve_path(base, home_str)
    } else {
        default_home
    };

    let defaults = Settings::default();
    let mut settings = Settings {
        keep_alive_secs: file
            .live_regions
            .keep_alive_secs
            .unwrap_or(defaults.keep_alive_secs),
        cache_size: file.live_regions.cache_size.unwrap_or(defaults.cache_size),
        pump_interval_ms: file
            .live_regions
            .pump_interval_ms
            .unwrap_or(defaults.pump_interval_ms),
        infer_live_regions: file
            .live_regions
            .infer_live_regions
            .unwrap_or(defaults.infer_live_regions),
    };

    if let Ok(env_keep_alive) = std::env::var("ARIALIVE_KEEPALIVE_SECS") {
        settings.keep_alive_secs = env_keep_alive
            .parse()
            .context("ARIALIVE_KEEPALIVE_SECS must be an integer")?;
    }

    Ok(ResolvedConfig {
        home,
        config_file,
        settings,
    })
}

/// Get the resolved configuration (cached after first call)
pub fn get() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{e:#}")));
    match result {
        Ok(config) => Ok(config),
        Err(message) => anyhow::bail!("Configuration error: {message}"),
    }
}

/// Get the arialive home directory (~/.arialive or $ARIALIVE_HOME)
pub fn home() -> Result<PathBuf> {
    Ok(get()?.home.clone())
}

/// Directory holding the persisted politeness overrides
pub fn overrides_dir() -> Result<PathBuf> {
    Ok(home()?.join("overrides"))
}

/// Live-region tunables
pub fn settings() -> Result<Settings> {
    Ok(get()?.settings.clone())
}
