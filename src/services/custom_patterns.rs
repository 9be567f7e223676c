//! Custom pattern and toggle persistence.
//!
//! Background-side operations over the persisted store: custom pattern
//! upsert/delete and the global/per-site enablement switches. Every write
//! goes through [`PatternStore::update`], which reads and writes under the
//! store's lock, so concurrent writers never lose each other's changes.
//! Subscribed pages observe every change through the store's notification.

use crate::models::{Pattern, PatternDraft};
use crate::storage::{PatternStore, StoreKey, StoreRecord};
use crate::{Result, current_timestamp_millis};
use std::sync::Arc;
use tracing::{info, instrument};

/// Service for custom pattern CRUD and enablement flags.
#[derive(Clone)]
pub struct CustomPatternService {
    store: Arc<dyn PatternStore>,
}

impl CustomPatternService {
    /// Creates a service over a store.
    #[must_use]
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn PatternStore> {
        &self.store
    }

    /// Lists stored custom patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self) -> Result<Vec<Pattern>> {
        Ok(self
            .store
            .get(&[StoreKey::CustomPatterns])?
            .custom_patterns_or_default())
    }

    /// Validates and saves a custom pattern.
    ///
    /// A draft with an explicit id replaces any stored pattern with that id.
    /// Without one, a `custom-<millis>` id is generated and suffixed with
    /// `-1`, `-2`, ... until it is free, so a new pattern is always appended.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the store rejects the write.
    #[instrument(skip(self, draft))]
    pub fn save(&self, draft: PatternDraft) -> Result<Pattern> {
        let explicit = draft.id.as_deref().is_some_and(|id| !id.trim().is_empty());
        let mut pattern = draft.into_pattern(current_timestamp_millis())?;

        self.store.update(&[StoreKey::CustomPatterns], &mut |record| {
            let mut patterns = record.custom_patterns_or_default();
            if !explicit {
                pattern.id = unused_id(&patterns, &pattern.id);
            }
            match patterns.iter_mut().find(|p| p.id == pattern.id) {
                Some(existing) => *existing = pattern.clone(),
                None => patterns.push(pattern.clone()),
            }
            Ok(StoreRecord {
                custom_patterns: Some(patterns),
                ..Default::default()
            })
        })?;
        info!(id = %pattern.id, "custom pattern saved");
        Ok(pattern)
    }

    /// Deletes a custom pattern by id.
    ///
    /// Returns true if a pattern was removed; deleting an unknown id is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut removed = false;
        self.store.update(&[StoreKey::CustomPatterns], &mut |record| {
            let mut patterns = record.custom_patterns_or_default();
            let before = patterns.len();
            patterns.retain(|p| p.id != id);
            removed = patterns.len() != before;
            Ok(StoreRecord {
                custom_patterns: removed.then_some(patterns),
                ..Default::default()
            })
        })?;
        if removed {
            info!(id, "custom pattern deleted");
        }
        Ok(removed)
    }

    /// Reads the global enablement flag (default `true`).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn extension_enabled(&self) -> Result<bool> {
        Ok(self
            .store
            .get(&[StoreKey::ExtensionEnabled])?
            .extension_enabled_or_default())
    }

    /// Persists the global enablement flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    #[instrument(skip(self))]
    pub fn set_extension_enabled(&self, enabled: bool) -> Result<()> {
        self.store.set(StoreRecord {
            extension_enabled: Some(enabled),
            ..Default::default()
        })
    }

    /// Lists disabled hostnames.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn disabled_sites(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .get(&[StoreKey::DisabledSites])?
            .disabled_sites_or_default())
    }

    /// Adds or removes a hostname from the disabled list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self))]
    pub fn set_site_disabled(&self, hostname: &str, disabled: bool) -> Result<()> {
        self.store.update(&[StoreKey::DisabledSites], &mut |record| {
            let mut sites = record.disabled_sites_or_default();
            let present = sites.iter().any(|s| s.eq_ignore_ascii_case(hostname));
            let sites = match (disabled, present) {
                (true, false) => {
                    sites.push(hostname.to_lowercase());
                    Some(sites)
                },
                (false, true) => {
                    sites.retain(|s| !s.eq_ignore_ascii_case(hostname));
                    Some(sites)
                },
                _ => None,
            };
            Ok(StoreRecord {
                disabled_sites: sites,
                ..Default::default()
            })
        })
    }
}

/// First of `base`, `base-1`, `base-2`, ... not used by any pattern.
fn unused_id(patterns: &[Pattern], base: &str) -> String {
    let taken = |id: &str| patterns.iter().any(|p| p.id == id);
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|id| !taken(id))
        .unwrap_or_else(|| base.to_string())
}
