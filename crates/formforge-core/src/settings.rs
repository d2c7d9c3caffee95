//! Settings for the formforge workspace.
//!
//! [`Settings`] holds workspace configuration with sensible defaults and can
//! be loaded from TOML. A partial TOML file is fine: any field not present
//! keeps its default. Environment variables prefixed with `FORMFORGE_` win
//! over both.
//!
//! [`SETTINGS`] is a lazily-initialized global instance for applications
//! that prefer configure-once access over passing `Settings` around.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, ForgeResult};

/// Template engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directories to search for template files.
    pub dirs: Vec<PathBuf>,
    /// Whether one-off string templates are HTML-escaped by default.
    pub autoescape: bool,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            autoescape: true,
        }
    }
}

/// The complete set of workspace settings.
///
/// # Examples
///
/// ```
/// use formforge_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled. Controls log formatting and how much
    /// error detail responses carry.
    pub debug: bool,
    /// The tracing filter directive (e.g. "info", "formforge_views=debug").
    pub log_level: String,
    /// Template engine configuration.
    pub templates: TemplateSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            templates: TemplateSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML string. Missing fields keep defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml_str(toml_str: &str) -> ForgeResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| ForgeError::Serialization(format!("Failed to parse settings TOML: {e}")))
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Loads settings from a TOML file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let mut settings = Self::from_toml_file(path)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Applies `FORMFORGE_*` environment variable overrides in place.
    ///
    /// Recognized variables:
    ///
    /// | Env var | Setting |
    /// |---|---|
    /// | `FORMFORGE_DEBUG` | `debug` ("1"/"true"/"yes" enable) |
    /// | `FORMFORGE_LOG_LEVEL` | `log_level` |
    /// | `FORMFORGE_TEMPLATE_DIRS` | `templates.dirs` (colon-separated) |
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("FORMFORGE_DEBUG") {
            self.debug = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(value) = std::env::var("FORMFORGE_LOG_LEVEL") {
            if !value.is_empty() {
                self.log_level = value;
            }
        }
        if let Ok(value) = std::env::var("FORMFORGE_TEMPLATE_DIRS") {
            self.templates.dirs = value
                .split(':')
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup, then use
/// [`get`](LazySettings::get) anywhere.
///
/// # Panics
///
/// [`get`](LazySettings::get) panics if settings have not been configured.
/// [`configure`](LazySettings::configure) panics if called more than once.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
