//! Persisted store collaborator.
//!
//! The extension persists three keys through an asynchronous key-value store
//! with change notifications:
//!
//! | Key | Type | Default |
//! |-----|------|---------|
//! | `customPatterns` | sequence of [`Pattern`] | `[]` |
//! | `disabledSites` | sequence of hostnames | `[]` |
//! | `extensionEnabled` | boolean | `true` |
//!
//! Backends implement [`PatternStore`]:
//!
//! | Backend | Location |
//! |---------|----------|
//! | [`MemoryStore`] | In-process, optional byte quota |
//! | [`FilesystemStore`] | `~/.config/promptrc/store.json` |

mod change_bus;
mod filesystem;
mod memory;
mod traits;

pub use change_bus::{ChangeBus, StoreChange};
pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;
pub use traits::PatternStore;

use crate::models::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys understood by the persisted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// User-authored patterns.
    CustomPatterns,
    /// Hostnames where the picker is disabled.
    DisabledSites,
    /// Global on/off switch.
    ExtensionEnabled,
}

impl StoreKey {
    /// Returns the storage key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomPatterns => "customPatterns",
            Self::DisabledSites => "disabledSites",
            Self::ExtensionEnabled => "extensionEnabled",
        }
    }

    /// Returns every key.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CustomPatterns,
            Self::DisabledSites,
            Self::ExtensionEnabled,
        ]
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partial record of stored values.
///
/// `None` means "not present in this record", which is distinct from an
/// explicitly stored empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    /// Custom patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_patterns: Option<Vec<Pattern>>,
    /// Disabled hostnames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_sites: Option<Vec<String>>,
    /// Global enablement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_enabled: Option<bool>,
}

impl StoreRecord {
    /// Returns a copy restricted to the given keys.
    #[must_use]
    pub fn project(&self, keys: &[StoreKey]) -> Self {
        let mut out = Self::default();
        for key in keys {
            match key {
                StoreKey::CustomPatterns => out.custom_patterns.clone_from(&self.custom_patterns),
                StoreKey::DisabledSites => out.disabled_sites.clone_from(&self.disabled_sites),
                StoreKey::ExtensionEnabled => out.extension_enabled = self.extension_enabled,
            }
        }
        out
    }

    /// Returns the keys present in this record.
    #[must_use]
    pub fn keys(&self) -> Vec<StoreKey> {
        let mut keys = Vec::with_capacity(3);
        if self.custom_patterns.is_some() {
            keys.push(StoreKey::CustomPatterns);
        }
        if self.disabled_sites.is_some() {
            keys.push(StoreKey::DisabledSites);
        }
        if self.extension_enabled.is_some() {
            keys.push(StoreKey::ExtensionEnabled);
        }
        keys
    }

    /// Overwrites the keys present in `update`, returning those that changed.
    pub fn merge(&mut self, update: Self) -> Vec<StoreKey> {
        let mut changed = Vec::new();
        if let Some(patterns) = update.custom_patterns {
            if self.custom_patterns.as_ref() != Some(&patterns) {
                changed.push(StoreKey::CustomPatterns);
            }
            self.custom_patterns = Some(patterns);
        }
        if let Some(sites) = update.disabled_sites {
            if self.disabled_sites.as_ref() != Some(&sites) {
                changed.push(StoreKey::DisabledSites);
            }
            self.disabled_sites = Some(sites);
        }
        if let Some(enabled) = update.extension_enabled {
            if self.extension_enabled != Some(enabled) {
                changed.push(StoreKey::ExtensionEnabled);
            }
            self.extension_enabled = Some(enabled);
        }
        changed
    }

    /// Custom patterns, defaulting to empty.
    #[must_use]
    pub fn custom_patterns_or_default(&self) -> Vec<Pattern> {
        self.custom_patterns.clone().unwrap_or_default()
    }

    /// Disabled sites, defaulting to empty.
    #[must_use]
    pub fn disabled_sites_or_default(&self) -> Vec<String> {
        self.disabled_sites.clone().unwrap_or_default()
    }

    /// Global enablement, defaulting to `true`.
    #[must_use]
    pub fn extension_enabled_or_default(&self) -> bool {
        self.extension_enabled.unwrap_or(true)
    }
}
