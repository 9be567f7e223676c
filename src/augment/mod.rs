//! In-page text-field augmentation.
//!
//! Data flow for one slash command:
//!
//! ```text
//! input event ─▶ AugmentSession ─▶ surface (read) ─▶ trigger::detect
//!      ─▶ debounce timer ─▶ store read ─▶ PatternIndex::query
//!      ─▶ MenuController ─▶ panel ─▶ selection ─▶ insertion ─▶ surface (write)
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`trigger`] | Slash-command detection |
//! | [`menu`] | Menu state machine, placement and rendering |
//! | [`guard`] | Native-UI heuristics and the mutation watcher |
//! | [`insertion`] | Text splicing and host notification |
//! | [`session`] | Owned per-page state and event handling |
//! | [`driver`] | Headless event loop over an in-memory page |

pub mod driver;
pub mod guard;
pub mod insertion;
pub mod menu;
pub mod session;
pub mod settings;
pub mod trigger;

pub use driver::PageDriver;
pub use guard::{HostGuard, MutationWatcher, WatchEvent};
pub use session::{AugmentSession, ClickTarget, Disposition, Key, PageEvent};
pub use settings::{AugmentSettings, TimingSettings};
pub use trigger::{TriggerSettings, detect};
