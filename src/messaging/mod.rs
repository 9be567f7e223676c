//! Cross-context messaging bridge.
//!
//! Other extension contexts talk to the page and to the background worker
//! through JSON envelopes `{action, ...payload}` answered by
//! `{success, error?, ...}`.
//!
//! | Action | Handled by |
//! |--------|------------|
//! | `getPatterns` | [`BackgroundHandler`] |
//! | `saveCustomPattern` | [`BackgroundHandler`] |
//! | `deleteCustomPattern` | [`BackgroundHandler`] |
//! | `showPromptPicker` | [`handle_content`] |
//! | `insertPrompt` | [`handle_content`] |
//! | `toggleSite` | [`handle_content`] |
//! | `toggleExtension` | [`handle_content`] |

mod action;
mod background;
mod content;
mod envelope;

pub use action::{Action, Context, Shortcut};
pub use background::BackgroundHandler;
pub use content::{handle_content, handle_content_value};
pub use envelope::{Request, Response};
