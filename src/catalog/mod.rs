//! Built-in pattern catalog.
//!
//! The catalog is a fixed, version-controlled list embedded at compile time
//! from `patterns.json`. Rituals come first, then development patterns; that
//! order is the tie-breaking order for every query.

use crate::models::{Pattern, PatternType};
use crate::{Error, Result};
use std::collections::HashSet;

/// Embedded catalog source.
const CATALOG_JSON: &str = include_str!("patterns.json");

/// The built-in, read-only pattern set.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    patterns: Vec<Pattern>,
}

impl BuiltinCatalog {
    /// Parses the embedded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed or contains
    /// duplicate ids.
    pub fn load() -> Result<Self> {
        Self::from_json(CATALOG_JSON)
    }

    /// Parses a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids are not unique.
    pub fn from_json(json: &str) -> Result<Self> {
        let patterns: Vec<Pattern> =
            serde_json::from_str(json).map_err(|e| Error::OperationFailed {
                operation: "parse_catalog".to_string(),
                cause: e.to_string(),
            })?;
        Self::from_patterns(patterns)
    }

    /// Builds a catalog from an explicit pattern list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on a duplicate id.
    pub fn from_patterns(patterns: Vec<Pattern>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(patterns.len());
        for pattern in &patterns {
            if !seen.insert(pattern.id.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate catalog id: {}",
                    pattern.id
                )));
            }
        }
        Ok(Self { patterns })
    }

    /// Returns all patterns in catalog order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Looks up a pattern by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.id == id)
    }

    /// Counts patterns of a given type.
    #[must_use]
    pub fn count_of(&self, kind: PatternType) -> usize {
        self.patterns
            .iter()
            .filter(|pattern| pattern.pattern_type == kind)
            .count()
    }

    /// Consumes the catalog, returning its patterns.
    #[must_use]
    pub fn into_patterns(self) -> Vec<Pattern> {
        self.patterns
    }
}
