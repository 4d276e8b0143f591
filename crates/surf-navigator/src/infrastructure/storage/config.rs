//! TOML-based configuration persistence for the navigator host.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Surf\config.toml`
//! - Linux:    `~/.config/surf/config.toml`
//! - macOS:    `~/Library/Application Support/Surf/config.toml`
//!
//! # What goes in the file? (for beginners)
//!
//! The file declares which screens the split navigator knows about, which
//! overlays the modal navigator can show, and where the split/stacked
//! breakpoint sits:
//!
//! ```toml
//! [navigator]
//! log_level = "debug"
//!
//! [layout]
//! main_width = 600
//! initial_width = 1024
//! initial_route_name = "inbox"
//! back_behavior = "history"
//!
//! [[screens]]
//! kind = "screen"
//! name = "main"
//!
//! [[screens]]
//! kind = "screen"
//! name = "inbox"
//!
//! [[overlays]]
//! kind = "overlay"
//! name = "share"
//! default_props = { animated = true }
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = ...)]`, so a missing file, an empty
//! file or a file written by an older version all load without error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use surf_core::{
    BackBehavior, Declaration, ModalRouterOptions, NavigationError, RouteConfig,
    SplitRouterOptions,
};
use thiserror::Error;

use crate::application::layout_bridge::DEFAULT_MAIN_WIDTH;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub navigator: NavigatorConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Declarations of the split navigator.  Must contain a `main` screen.
    #[serde(default = "default_screens")]
    pub screens: Vec<Declaration>,
    /// Declarations of the overlay navigator.
    #[serde(default = "default_overlays")]
    pub overlays: Vec<Declaration>,
}

/// Host process settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigatorConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where the navigation snapshot lives.  Defaults to `snapshot.json`
    /// next to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

/// Split/stacked layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Viewports strictly wider than this many pixels render split.
    #[serde(default = "default_main_width")]
    pub main_width: u32,
    /// Viewport width assumed at startup, before the first resize report.
    #[serde(default = "default_initial_width")]
    pub initial_width: u32,
    /// Screen focused in split mode when nothing else is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_route_name: Option<String>,
    /// What `GO_BACK` returns to in split mode.
    #[serde(default)]
    pub back_behavior: BackBehavior,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_main_width() -> u32 {
    DEFAULT_MAIN_WIDTH
}
fn default_initial_width() -> u32 {
    1024
}
fn default_screens() -> Vec<Declaration> {
    vec![
        Declaration::screen("main"),
        Declaration::screen("first"),
        Declaration::screen("second"),
    ]
}
fn default_overlays() -> Vec<Declaration> {
    vec![Declaration::overlay("menu"), Declaration::overlay("alert")]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            navigator: NavigatorConfig::default(),
            layout: LayoutConfig::default(),
            screens: default_screens(),
            overlays: default_overlays(),
        }
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            snapshot_path: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            main_width: default_main_width(),
            initial_width: default_initial_width(),
            initial_route_name: None,
            back_behavior: BackBehavior::default(),
        }
    }
}

// ── Router wiring ─────────────────────────────────────────────────────────────

impl AppConfig {
    /// Route config of the split navigator, flattened from `screens`.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::InvalidDeclaration`] for overlay entries and
    /// [`NavigationError::DuplicateRouteName`] for repeated names.
    pub fn split_route_config(&self) -> Result<RouteConfig, NavigationError> {
        surf_core::domain::declaration::screen_route_config(&self.screens)
    }

    /// Split router options for a viewport that currently is (or is not) split.
    pub fn split_router_options(&self, is_split: bool) -> SplitRouterOptions {
        SplitRouterOptions {
            initial_route_name: self.layout.initial_route_name.clone(),
            is_split,
            back_behavior: self.layout.back_behavior,
        }
    }

    pub fn modal_router_options(&self) -> ModalRouterOptions {
        ModalRouterOptions {
            declarations: self.overlays.clone(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Resolves where the navigation snapshot is stored for `config`.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when no explicit path is
/// configured and the platform directory is unknown.
pub fn snapshot_file_path(config: &AppConfig) -> Result<PathBuf, ConfigError> {
    match &config.navigator.snapshot_path {
        Some(path) => Ok(path.clone()),
        None => Ok(config_dir()?.join("snapshot.json")),
    }
}

/// Loads `AppConfig` from the platform config file, returning
/// `AppConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`; a missing file yields the defaults.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_file_path()?)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// See [`save_config`].
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the `surf` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Surf"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("surf"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Surf"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
