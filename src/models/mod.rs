//! Data models for promptrc.
//!
//! This module contains the core data structures shared by the catalog,
//! the pattern index, the in-page augmentation session and the messaging bridge.

mod assembly;
mod pattern;
mod toggles;
mod trigger;

pub use assembly::compose_prompt;
pub use pattern::{DEFAULT_ICON, Pattern, PatternDraft, PatternType, TypeFilter};
pub use toggles::ToggleState;
pub use trigger::TriggerContext;
