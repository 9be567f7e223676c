//! # promptrc
//!
//! A curated library of prompt-engineering patterns with an in-page
//! slash-command picker for LLM chat text fields.
//!
//! Typing `/` followed by a query inside any supported text field opens a
//! floating suggestion panel; choosing an entry replaces the slash command
//! with the pattern's trigger text.
//!
//! ## Features
//!
//! - Built-in pattern catalog merged with user-defined custom patterns
//! - Slash-trigger detection for plain inputs, textareas and contenteditable regions
//! - Keyboard and pointer driven suggestion menu with accessibility metadata
//! - Host-page guard against competing autocomplete UI and SPA navigation
//! - Cross-context messaging bridge (`showPromptPicker`, `insertPrompt`, toggles)
//!
//! The browser is modelled behind the [`host::HostPage`] trait, so the whole
//! in-page core runs headless against [`host::Document`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use promptrc::augment::{AugmentSession, PageEvent};
//! use promptrc::host::{Document, InputType};
//!
//! let mut page = Document::new("chat.example.com");
//! let field = page.add_input(InputType::Text);
//! let mut session = AugmentSession::attach(&mut page, index, settings);
//! page.type_text(field, "/rab");
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod augment;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod host;
pub mod messaging;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use augment::{AugmentSession, AugmentSettings, Disposition, PageEvent};
pub use catalog::BuiltinCatalog;
pub use config::PromptrcConfig;
pub use models::{Pattern, PatternDraft, PatternType, ToggleState, TriggerContext};
pub use services::{CustomPatternService, PatternIndex};
pub use storage::{PatternStore, StoreKey, StoreRecord};

/// Error type for promptrc operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed message envelopes, custom patterns missing required fields |
/// | `OperationFailed` | I/O errors, JSON (de)serialization failures, logging init |
/// | `NotFound` | Looking up an unknown pattern id |
/// | `StoreUnavailable` | The persisted store rejects a read or write (quota, sync errors) |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A message envelope has no `action` or an unknown one
    /// - A custom pattern has an empty trigger or purpose
    /// - A config value cannot be interpreted
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur
    /// - JSON or TOML parsing fails
    /// - Logging is initialized twice
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A requested pattern does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The persisted store could not complete a request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Result type alias for promptrc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in milliseconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp_millis() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
