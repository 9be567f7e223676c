//! Runtime settings for an in-page session.

use super::menu::{NavigationPolicy, PanelGeometry, ZIndexStrategy};
use super::trigger::TriggerSettings;
use crate::services::DEFAULT_CACHE_CAPACITY;
use std::time::Duration;

/// Default in-page menu size.
pub const DEFAULT_MAX_ITEMS: usize = 8;

/// Default fixed z-index.
pub const DEFAULT_FIXED_Z_INDEX: i64 = 2_147_483_000;

/// Delays used by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSettings {
    /// Debounce before showing the menu.
    pub debounce: Duration,
    /// Debounce when the page has its own slash-command UI.
    pub native_debounce: Duration,
    /// Lifetime of a live-region announcement.
    pub announce: Duration,
    /// Fade-out before the panel is removed.
    pub hide_animation: Duration,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            native_debounce: Duration::from_millis(300),
            announce: Duration::from_millis(1000),
            hide_animation: Duration::from_millis(150),
        }
    }
}

/// Everything an [`AugmentSession`](super::AugmentSession) can be tuned with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentSettings {
    /// Trigger detection.
    pub trigger: TriggerSettings,
    /// Maximum items in the in-page menu.
    pub max_items: usize,
    /// Highlight movement at the boundaries.
    pub navigation: NavigationPolicy,
    /// Z-index strategy.
    pub z_index: ZIndexStrategy,
    /// Z-index for [`ZIndexStrategy::Fixed`].
    pub fixed_z_index: i64,
    /// Panel box.
    pub geometry: PanelGeometry,
    /// Delays.
    pub timing: TimingSettings,
    /// Pattern index cache capacity.
    pub cache_capacity: usize,
}

impl Default for AugmentSettings {
    fn default() -> Self {
        Self {
            trigger: TriggerSettings::default(),
            max_items: DEFAULT_MAX_ITEMS,
            navigation: NavigationPolicy::default(),
            z_index: ZIndexStrategy::default(),
            fixed_z_index: DEFAULT_FIXED_Z_INDEX,
            geometry: PanelGeometry::default(),
            timing: TimingSettings::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
