//! Configuration management.
//!
//! Defaults reproduce the in-page behaviour; a TOML file may override any of
//! them. Values that cannot be interpreted keep their defaults.

use crate::augment::menu::{NavigationPolicy, PanelGeometry, ZIndexStrategy};
use crate::augment::{AugmentSettings, TimingSettings, TriggerSettings};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default popup listing size.
pub const DEFAULT_POPUP_MAX_ITEMS: usize = 10;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, returning `None` for anything unrecognised.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Output format.
    pub format: LogFormat,
    /// Append log output to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Main configuration for promptrc.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptrcConfig {
    /// In-page session settings.
    pub augment: AugmentSettings,
    /// Popup listing size.
    pub popup_max_items: usize,
    /// Filesystem store location; the platform default when `None`.
    pub store_path: Option<PathBuf>,
    /// Logging.
    pub logging: LoggingSettings,
}

impl Default for PromptrcConfig {
    fn default() -> Self {
        Self {
            augment: AugmentSettings::default(),
            popup_max_items: DEFAULT_POPUP_MAX_ITEMS,
            store_path: None,
            logging: LoggingSettings::default(),
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Trigger detection.
    pub trigger: Option<ConfigFileTrigger>,
    /// Menu.
    pub menu: Option<ConfigFileMenu>,
    /// Delays.
    pub timing: Option<ConfigFileTiming>,
    /// Pattern index.
    pub index: Option<ConfigFileIndex>,
    /// Store.
    pub storage: Option<ConfigFileStorage>,
    /// Logging.
    pub logging: Option<ConfigFileLogging>,
}

/// `[trigger]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileTrigger {
    /// Lookback window in characters.
    pub lookback: Option<usize>,
    /// Require `//`.
    pub double_slash: Option<bool>,
}

/// `[menu]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileMenu {
    /// In-page cap.
    pub max_items: Option<usize>,
    /// Popup cap.
    pub popup_max_items: Option<usize>,
    /// `clamped` or `cyclic`.
    pub navigation: Option<String>,
    /// `scan` or `fixed`.
    pub z_index: Option<String>,
    /// Z-index for the fixed strategy.
    pub fixed_z_index: Option<i64>,
    /// Panel width.
    pub panel_width: Option<f64>,
    /// Panel height.
    pub panel_height: Option<f64>,
    /// Panel padding.
    pub padding: Option<f64>,
}

/// `[timing]` section, all in milliseconds.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileTiming {
    /// Debounce.
    pub debounce_ms: Option<u64>,
    /// Debounce with native slash UI.
    pub native_debounce_ms: Option<u64>,
    /// Announcement lifetime.
    pub announce_ms: Option<u64>,
    /// Hide animation.
    pub hide_animation_ms: Option<u64>,
}

/// `[index]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileIndex {
    /// Query cache capacity.
    pub cache_capacity: Option<usize>,
}

/// `[storage]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileStorage {
    /// Store file path; `~/` is expanded.
    pub path: Option<String>,
}

/// `[logging]` section.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path; `~/` is expanded.
    pub file: Option<String>,
}

impl PromptrcConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for [`ConfigFile`].
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/promptrc/` on macOS)
    /// 2. XDG config dir (`~/.config/promptrc/`)
    ///
    /// Returns default configuration if no usable file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("promptrc").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("promptrc")
                .join("config.toml"),
        ];
        for path in candidates.iter().filter(|path| path.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring config file"),
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `PromptrcConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();
        let augment = &mut config.augment;

        if let Some(trigger) = file.trigger {
            if let Some(lookback) = trigger.lookback.filter(|&n| n > 0) {
                augment.trigger.lookback = lookback;
            }
            if let Some(double_slash) = trigger.double_slash {
                augment.trigger.double_slash = double_slash;
            }
        }

        if let Some(menu) = file.menu {
            if let Some(max_items) = menu.max_items.filter(|&n| n > 0) {
                augment.max_items = max_items;
            }
            if let Some(popup) = menu.popup_max_items.filter(|&n| n > 0) {
                config.popup_max_items = popup;
            }
            if let Some(navigation) = menu.navigation.as_deref().and_then(parse_navigation) {
                augment.navigation = navigation;
            }
            if let Some(strategy) = menu.z_index.as_deref().and_then(parse_z_index) {
                augment.z_index = strategy;
            }
            if let Some(z) = menu.fixed_z_index {
                augment.fixed_z_index = z;
            }
            augment.geometry = merge_geometry(augment.geometry, &menu);
        }

        if let Some(timing) = file.timing {
            augment.timing = merge_timing(augment.timing, &timing);
        }

        if let Some(capacity) = file.index.and_then(|index| index.cache_capacity) {
            if capacity > 0 {
                augment.cache_capacity = capacity;
            }
        }

        if let Some(path) = file.storage.and_then(|storage| storage.path) {
            config.store_path = Some(expand_home(&path));
        }

        if let Some(logging) = file.logging {
            if let Some(format) = logging.format.as_deref().and_then(LogFormat::parse) {
                config.logging.format = format;
            }
            config.logging.file = logging.file.as_deref().map(expand_home);
        }

        config
    }

    /// Sets the store path.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Session settings.
    #[must_use]
    pub const fn augment_settings(&self) -> AugmentSettings {
        self.augment
    }

    /// Trigger settings.
    #[must_use]
    pub const fn trigger_settings(&self) -> TriggerSettings {
        self.augment.trigger
    }
}

fn parse_navigation(s: &str) -> Option<NavigationPolicy> {
    match s.trim().to_lowercase().as_str() {
        "clamped" | "clamp" => Some(NavigationPolicy::Clamped),
        "cyclic" | "wrap" => Some(NavigationPolicy::Cyclic),
        other => {
            warn!(value = other, "unknown menu.navigation");
            None
        },
    }
}

fn parse_z_index(s: &str) -> Option<ZIndexStrategy> {
    match s.trim().to_lowercase().as_str() {
        "scan" => Some(ZIndexStrategy::Scan),
        "fixed" => Some(ZIndexStrategy::Fixed),
        other => {
            warn!(value = other, "unknown menu.z_index");
            None
        },
    }
}

fn merge_geometry(mut geometry: PanelGeometry, menu: &ConfigFileMenu) -> PanelGeometry {
    let positive = |v: &f64| v.is_finite() && *v > 0.0;
    if let Some(width) = menu.panel_width.filter(positive) {
        geometry.width = width;
    }
    if let Some(height) = menu.panel_height.filter(positive) {
        geometry.height = height;
    }
    if let Some(padding) = menu.padding.filter(|v| v.is_finite() && *v >= 0.0) {
        geometry.padding = padding;
    }
    geometry
}

fn merge_timing(mut timing: TimingSettings, file: &ConfigFileTiming) -> TimingSettings {
    if let Some(ms) = file.debounce_ms {
        timing.debounce = Duration::from_millis(ms);
    }
    if let Some(ms) = file.native_debounce_ms {
        timing.native_debounce = Duration::from_millis(ms);
    }
    if let Some(ms) = file.announce_ms {
        timing.announce = Duration::from_millis(ms);
    }
    if let Some(ms) = file.hide_animation_ms {
        timing.hide_animation = Duration::from_millis(ms);
    }
    timing
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base_dirs) = directories::BaseDirs::new() {
            return base_dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}
