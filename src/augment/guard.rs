//! Host-page guard.
//!
//! Two concerns: noticing that the page ships its own slash-command UI
//! (longer debounce, and keys pass through while a foreign panel is on
//! screen), and noticing that a route change has pulled our panel out of the
//! document.

use super::settings::TimingSettings;
use crate::host::{HostPage, MutationRecord, PanelId, Selector};
use std::time::Duration;
use tracing::debug;

/// Markers of a native slash-command UI.
#[must_use]
pub fn native_slash_markers() -> Vec<Selector> {
    vec![
        Selector::any().attr("data-slash-command"),
        Selector::any().attr_eq("data-autocomplete-type", "slash-command"),
        Selector::any().class("slash-command"),
        Selector::any()
            .attr_eq("role", "menu")
            .attr_contains("aria-label", "command"),
    ]
}

/// Markers of a competing suggestion panel.
#[must_use]
pub fn foreign_panel_markers() -> Vec<Selector> {
    vec![
        Selector::any().attr_eq("role", "listbox"),
        Selector::any().attr_eq("role", "menu"),
        Selector::any().class("autocomplete-dropdown"),
    ]
}

/// Structural heuristics against the host page's own autocomplete.
#[derive(Debug, Clone)]
pub struct HostGuard {
    foreign_panels: Vec<Selector>,
    native_detected: bool,
}

impl HostGuard {
    /// Scans the page once for native slash-command markers.
    pub fn detect(page: &dyn HostPage) -> Self {
        let native_detected = native_slash_markers()
            .iter()
            .any(|selector| page.has_match(selector));
        if native_detected {
            debug!(host = page.hostname(), "native slash-command UI detected");
        }
        Self {
            foreign_panels: foreign_panel_markers(),
            native_detected,
        }
    }

    /// Whether the page looked like it has its own slash commands.
    #[must_use]
    pub const fn native_detected(&self) -> bool {
        self.native_detected
    }

    /// Debounce delay for this page.
    #[must_use]
    pub const fn debounce(&self, timing: &TimingSettings) -> Duration {
        if self.native_detected {
            timing.native_debounce
        } else {
            timing.debounce
        }
    }

    /// Returns true while a competing panel is visible.
    pub fn foreign_panel_visible(&self, page: &dyn HostPage) -> bool {
        self.foreign_panels
            .iter()
            .any(|selector| page.has_visible_match(selector))
    }
}

/// Event produced by the [`MutationWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The menu's panel is no longer in the document.
    PanelDetached(PanelId),
}

/// Watches structural mutations for an orphaned panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationWatcher;

impl MutationWatcher {
    /// Creates a watcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Inspects a batch of mutations.
    ///
    /// Only batches that remove nodes are considered, and only while a panel
    /// is mounted.
    pub fn observe(
        &self,
        records: &[MutationRecord],
        page: &dyn HostPage,
        panel: Option<PanelId>,
    ) -> Option<WatchEvent> {
        let panel = panel?;
        let removed: usize = records.iter().map(|record| record.removed).sum();
        if removed == 0 || page.panel_attached(panel) {
            return None;
        }
        Some(WatchEvent::PanelDetached(panel))
    }
}
