//! Host page boundary.
//!
//! The in-page core never touches a browser directly. Everything it needs
//! from the page it visits (editable fields, focus, geometry, timers, the
//! floating panel, live-region announcements and store reads) goes through
//! the [`HostPage`] trait. The page owns all deferred work: timers and store
//! reads return handles immediately and resolve later as events delivered
//! back to the session.
//!
//! | Implementation | Use |
//! |----------------|-----|
//! | [`Document`] | In-memory page for tests, simulations and the CLI |
//!
//! Editable fields are reached through the [`EditableSurface`] trait, which
//! hides the differences between plain inputs, textareas and
//! contenteditable regions.

mod document;
mod panel;
mod selector;
mod surface;

pub use document::{Document, ElementSpec, FRAME_MS};
pub use panel::{OptionView, PanelPosition, PanelView};
pub use selector::Selector;
pub use surface::{
    ContentEditable, EditableSurface, ElementKind, InputType, SurfaceKind, TextArea, TextInput,
    byte_offset, classify,
};

use crate::storage::StoreKey;
use std::fmt;
use std::time::Duration;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

handle!(
    /// Reference to an element owned by the host page.
    ElementId,
    "el"
);
handle!(
    /// Handle to a pending timer or animation frame.
    TimerId,
    "timer"
);
handle!(
    /// Handle to a mounted suggestion panel.
    PanelId,
    "panel"
);
handle!(
    /// Handle to a live-region announcement.
    AnnouncementId,
    "status"
);
handle!(
    /// Handle to an outstanding store read.
    ReadTicket,
    "read"
);

/// Element bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Visible viewport dimensions and scroll offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Inner width.
    pub width: f64,
    /// Inner height.
    pub height: f64,
    /// Horizontal scroll offset.
    pub scroll_x: f64,
    /// Vertical scroll offset.
    pub scroll_y: f64,
}

impl Viewport {
    /// Creates an unscrolled viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Synthetic notification fired on an edited field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeNotification {
    /// Bubbling `input` notification.
    Input,
    /// Bubbling `change` notification.
    Change,
}

/// Summary of one structural mutation observed under the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationRecord {
    /// Number of nodes added.
    pub added: usize,
    /// Number of nodes removed.
    pub removed: usize,
}

/// Capabilities the in-page core needs from the page it runs in.
///
/// Methods taking an [`ElementId`] treat unknown or detached elements as
/// absent: queries return `None`/`false` and mutations do nothing.
pub trait HostPage {
    /// Hostname of the page, used for per-site toggles.
    fn hostname(&self) -> &str;

    /// Current viewport.
    fn viewport(&self) -> Viewport;

    /// Element that currently has focus.
    fn active_element(&self) -> Option<ElementId>;

    /// First editable element in document order.
    fn first_editable(&self) -> Option<ElementId>;

    /// Editable surface for an element, if it is editable.
    fn surface(&self, id: ElementId) -> Option<&dyn EditableSurface>;

    /// Mutable editable surface for an element, if it is editable.
    fn surface_mut(&mut self, id: ElementId) -> Option<&mut dyn EditableSurface>;

    /// Bounding box of an element.
    fn bounding_rect(&self, id: ElementId) -> Option<Rect>;

    /// Moves focus to an element.
    fn focus(&mut self, id: ElementId);

    /// Fires a synthetic notification on an element.
    fn dispatch(&mut self, id: ElementId, notification: ChangeNotification);

    /// Returns true if any element in the document matches the selector.
    fn has_match(&self, selector: &Selector) -> bool;

    /// Returns true if any visible element other than our own panel matches.
    fn has_visible_match(&self, selector: &Selector) -> bool;

    /// Highest z-index currently in use on the page (0 when none).
    fn highest_z_index(&self) -> i64;

    /// Mounts the suggestion panel, initially transparent.
    fn mount_panel(&mut self, view: &PanelView) -> PanelId;

    /// Replaces the content of a mounted panel.
    fn update_panel(&mut self, id: PanelId, view: &PanelView);

    /// Sets the panel's opacity state (`true` = fully visible).
    fn set_panel_revealed(&mut self, id: PanelId, revealed: bool);

    /// Returns true while the panel is attached to the document.
    fn panel_attached(&self, id: PanelId) -> bool;

    /// Removes a panel from the document.
    fn remove_panel(&mut self, id: PanelId);

    /// Adds a polite `role="status"` live-region announcement.
    fn announce(&mut self, message: &str) -> AnnouncementId;

    /// Removes an announcement.
    fn retract(&mut self, id: AnnouncementId);

    /// Schedules a one-shot timer.
    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    /// Cancels a timer; unknown ids are ignored.
    fn clear_timeout(&mut self, id: TimerId);

    /// Schedules a callback on the next animation frame.
    fn request_animation_frame(&mut self) -> TimerId;

    /// Starts an asynchronous read of the persisted store.
    fn read_store(&mut self, keys: &[StoreKey]) -> ReadTicket;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_display() {
        assert_eq!(ElementId(3).to_string(), "el-3");
        assert_eq!(TimerId(7).to_string(), "timer-7");
        assert_eq!(ReadTicket(1).to_string(), "read-1");
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 30.0);
        assert!((rect.bottom() - 50.0).abs() < f64::EPSILON);
        assert!((rect.right() - 110.0).abs() < f64::EPSILON);
    }
}
