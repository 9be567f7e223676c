//! CLI command implementations.
//!
//! Each submodule implements one group of `promptrc` commands. Commands
//! return their rendered output so the binary decides where it goes.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | Popup-style listing with an optional type filter |
//! | `search` | Pattern index query |
//! | `show` | Full pattern record |
//! | `assemble` | Composite prompt from several patterns |
//! | `custom` | Custom pattern management |
//! | `toggle` | Per-site and global switches |
//! | `message` | Dispatch one JSON envelope to the background handler |
//! | `shortcut` | Translate a keyboard shortcut into a page message |
//! | `simulate` | Drive a headless session against an in-memory page |
//!
//! # Example Usage
//!
//! ```bash
//! promptrc search rabbit
//! promptrc custom add --trigger "Be terse." --purpose "Brevity"
//! promptrc simulate --surface textarea "/rab{down}{enter}"
//! ```

mod custom;
mod patterns;
mod simulate;

pub use custom::{
    cmd_custom_add, cmd_custom_list, cmd_custom_remove, cmd_message, cmd_shortcut,
    cmd_toggle_extension, cmd_toggle_site,
};
pub use patterns::{cmd_assemble, cmd_list, cmd_search, cmd_show};
pub use simulate::{SimulationReport, Step, SurfaceChoice, cmd_simulate, parse_steps};

use crate::catalog::BuiltinCatalog;
use crate::config::PromptrcConfig;
use crate::messaging::BackgroundHandler;
use crate::services::{CustomPatternService, PatternIndex};
use crate::storage::{FilesystemStore, PatternStore};
use crate::{Error, Result};
use std::sync::Arc;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default).
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    /// Parses output format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Shared state for one CLI invocation.
pub struct CliContext {
    config: PromptrcConfig,
    store: Arc<dyn PatternStore>,
    handler: BackgroundHandler,
}

impl CliContext {
    /// Opens the configured filesystem store and the embedded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog is malformed or the store location
    /// cannot be determined or created.
    pub fn open(config: PromptrcConfig) -> Result<Self> {
        let path = config
            .store_path
            .clone()
            .or_else(FilesystemStore::default_path)
            .ok_or_else(|| Error::OperationFailed {
                operation: "resolve_store_path".to_string(),
                cause: "no home directory".to_string(),
            })?;
        let store: Arc<dyn PatternStore> = Arc::new(FilesystemStore::new(path)?);
        Self::with_store(config, store)
    }

    /// Uses an explicit store.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is malformed.
    pub fn with_store(config: PromptrcConfig, store: Arc<dyn PatternStore>) -> Result<Self> {
        let catalog = BuiltinCatalog::load()?;
        let handler = BackgroundHandler::new(catalog, CustomPatternService::new(Arc::clone(&store)));
        Ok(Self {
            config,
            store,
            handler,
        })
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &PromptrcConfig {
        &self.config
    }

    /// Store behind the custom pattern service.
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn PatternStore> {
        &self.store
    }

    /// Background handler.
    #[must_use]
    pub const fn handler(&self) -> &BackgroundHandler {
        &self.handler
    }

    /// Builds an index over the catalog plus the stored custom patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if custom patterns cannot be read.
    pub fn index(&self) -> Result<PatternIndex> {
        let mut index =
            PatternIndex::from_catalog(self.handler.catalog(), self.config.augment.cache_capacity);
        index.set_custom(self.handler.service().list()?);
        Ok(index)
    }
}

/// Serializes a value as pretty JSON.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
        operation: "serialize_output".to_string(),
        cause: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) fn test_context() -> CliContext {
    use crate::storage::MemoryStore;
    let store: Arc<dyn PatternStore> = Arc::new(MemoryStore::new());
    CliContext::with_store(PromptrcConfig::default(), store).unwrap()
}
