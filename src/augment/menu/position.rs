//! Panel placement and stacking.

use crate::host::{PanelPosition, Rect, Viewport};
use serde::{Deserialize, Serialize};

/// Floor for the scanned z-index.
pub const MIN_SCANNED_Z_INDEX: i64 = 999_999;

/// Panel box used for overflow checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    /// Panel width.
    pub width: f64,
    /// Panel height.
    pub height: f64,
    /// Gap between the anchor and the panel, and minimum left margin.
    pub padding: f64,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            padding: 5.0,
        }
    }
}

/// Computes the panel position for an anchor.
///
/// Below the anchor by default; above it if the panel would overflow the
/// viewport bottom. The left edge is pulled in when the panel would overflow
/// the right edge and is never less than the padding.
#[must_use]
pub fn place(anchor: Rect, viewport: Viewport, geometry: PanelGeometry) -> PanelPosition {
    let PanelGeometry {
        width,
        height,
        padding,
    } = geometry;

    let top = if anchor.bottom() + height + padding > viewport.height {
        anchor.top + viewport.scroll_y - height - padding
    } else {
        anchor.bottom() + viewport.scroll_y + padding
    };

    let left = if anchor.left + width > viewport.width {
        viewport.width - width - padding
    } else {
        anchor.left + viewport.scroll_x
    };

    PanelPosition {
        top,
        left: left.max(padding),
    }
}

/// How the panel's z-index is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZIndexStrategy {
    /// One above the highest z-index on the page, at least [`MIN_SCANNED_Z_INDEX`].
    #[default]
    Scan,
    /// A fixed large constant, skipping the page scan.
    Fixed,
}

/// Resolves the z-index for a strategy.
///
/// `highest` is only consulted for [`ZIndexStrategy::Scan`].
#[must_use]
pub fn stacking_order(strategy: ZIndexStrategy, fixed: i64, highest: impl FnOnce() -> i64) -> i64 {
    match strategy {
        ZIndexStrategy::Scan => highest().saturating_add(1).max(MIN_SCANNED_Z_INDEX),
        ZIndexStrategy::Fixed => fixed,
    }
}
