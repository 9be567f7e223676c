//! Menu state machine.
//!
//! ```text
//!            show (>=1 match)               move / highlight
//!   Hidden ───────────────────▶ Visible ◀──────────────────┐
//!     ▲                           │  │                     │
//!     │   select / hide / 0 hits  │  └─────────────────────┘
//!     └───────────────────────────┘
//! ```
//!
//! The controller is the only writer of [`MenuState`]. It holds no host
//! handles; the session turns transitions into panel updates.

use crate::host::ElementId;
use crate::models::Pattern;
use serde::{Deserialize, Serialize};

/// Highlight movement policy at the list boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPolicy {
    /// Stop at the first and last item.
    #[default]
    Clamped,
    /// Wrap around; Tab and Shift+Tab also navigate.
    Cyclic,
}

/// Where a visible menu came from, which decides how a selection inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOrigin {
    /// Opened by a slash command at the given offsets.
    Slash {
        /// Offset of the command's slash.
        slash_offset: usize,
        /// Caret offset when the command was detected.
        caret_offset: usize,
    },
    /// Opened by the picker command; selections append.
    Picker,
}

/// Highlight movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the list.
    Next,
    /// Towards the start of the list.
    Previous,
}

/// Contents of a visible menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleMenu {
    /// Matching patterns, never empty.
    pub items: Vec<Pattern>,
    /// Highlighted item, always within `items`.
    pub highlighted: usize,
    /// Field the menu is attached to.
    pub anchor: ElementId,
    /// How the menu was opened.
    pub origin: MenuOrigin,
}

/// Menu state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuState {
    /// No menu on screen.
    #[default]
    Hidden,
    /// Menu on screen.
    Visible(VisibleMenu),
}

/// Result of [`MenuController::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `Hidden -> Visible`.
    Shown,
    /// `Visible -> Visible` with new items.
    Refiltered,
    /// No matches: the menu is (or stays) hidden.
    Hidden,
}

/// A committed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Chosen pattern.
    pub pattern: Pattern,
    /// Field to insert into.
    pub anchor: ElementId,
    /// How the menu was opened.
    pub origin: MenuOrigin,
}

/// Owner of the menu state.
#[derive(Debug, Clone, Default)]
pub struct MenuController {
    state: MenuState,
    policy: NavigationPolicy,
}

impl MenuController {
    /// Creates a hidden controller.
    #[must_use]
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            state: MenuState::Hidden,
            policy,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &MenuState {
        &self.state
    }

    /// Visible menu, if any.
    #[must_use]
    pub const fn visible(&self) -> Option<&VisibleMenu> {
        match &self.state {
            MenuState::Visible(menu) => Some(menu),
            MenuState::Hidden => None,
        }
    }

    /// Returns true while the menu is visible.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self.state, MenuState::Visible(_))
    }

    /// Navigation policy.
    #[must_use]
    pub const fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    /// Shows `items` for `anchor`, resetting the highlight to the first item.
    pub fn show(&mut self, items: Vec<Pattern>, anchor: ElementId, origin: MenuOrigin) -> Transition {
        if items.is_empty() {
            self.state = MenuState::Hidden;
            return Transition::Hidden;
        }

        let transition = if self.is_visible() {
            Transition::Refiltered
        } else {
            Transition::Shown
        };
        self.state = MenuState::Visible(VisibleMenu {
            items,
            highlighted: 0,
            anchor,
            origin,
        });
        transition
    }

    /// Moves the highlight. Returns true if it changed.
    pub fn move_highlight(&mut self, direction: Direction) -> bool {
        let policy = self.policy;
        let MenuState::Visible(menu) = &mut self.state else {
            return false;
        };

        let last = menu.items.len().saturating_sub(1);
        let previous = menu.highlighted;
        menu.highlighted = match (direction, policy) {
            (Direction::Next, NavigationPolicy::Clamped) => (previous + 1).min(last),
            (Direction::Previous, NavigationPolicy::Clamped) => previous.saturating_sub(1),
            (Direction::Next, NavigationPolicy::Cyclic) => {
                if previous >= last { 0 } else { previous + 1 }
            },
            (Direction::Previous, NavigationPolicy::Cyclic) => {
                if previous == 0 { last } else { previous - 1 }
            },
        };
        previous != menu.highlighted
    }

    /// Highlights a specific item (pointer hover). Out-of-range indices are ignored.
    pub fn highlight(&mut self, index: usize) -> bool {
        match &mut self.state {
            MenuState::Visible(menu) if index < menu.items.len() && menu.highlighted != index => {
                menu.highlighted = index;
                true
            },
            _ => false,
        }
    }

    /// Commits the highlighted item and hides the menu.
    pub fn select(&mut self) -> Option<Selection> {
        let index = self.visible()?.highlighted;
        self.select_at(index)
    }

    /// Commits the item at `index` and hides the menu.
    ///
    /// Returns `None`, leaving the menu untouched, if `index` is out of range.
    pub fn select_at(&mut self, index: usize) -> Option<Selection> {
        if index >= self.visible()?.items.len() {
            return None;
        }
        let MenuState::Visible(mut menu) = std::mem::take(&mut self.state) else {
            return None;
        };
        Some(Selection {
            pattern: menu.items.swap_remove(index),
            anchor: menu.anchor,
            origin: menu.origin,
        })
    }

    /// Hides the menu without a selection. Returns true if it was visible.
    pub fn hide(&mut self) -> bool {
        let was_visible = self.is_visible();
        self.state = MenuState::Hidden;
        was_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternType;

    fn items(n: usize) -> Vec<Pattern> {
        (0..n)
            .map(|i| Pattern::new(format!("p{i}"), format!("t{i}"), "p", PatternType::DevPattern))
            .collect()
    }

    fn shown(policy: NavigationPolicy, n: usize) -> MenuController {
        let mut menu = MenuController::new(policy);
        menu.show(items(n), ElementId(1), MenuOrigin::Picker);
        menu
    }

    #[test]
    fn test_show_transitions() {
        let mut menu = MenuController::new(NavigationPolicy::Clamped);
        assert_eq!(menu.show(Vec::new(), ElementId(1), MenuOrigin::Picker), Transition::Hidden);
        assert_eq!(menu.show(items(3), ElementId(1), MenuOrigin::Picker), Transition::Shown);
        menu.move_highlight(Direction::Next);
        assert_eq!(menu.show(items(2), ElementId(1), MenuOrigin::Picker), Transition::Refiltered);
        assert_eq!(menu.visible().unwrap().highlighted, 0, "refilter resets highlight");
        assert_eq!(menu.show(Vec::new(), ElementId(1), MenuOrigin::Picker), Transition::Hidden);
        assert!(!menu.is_visible());
    }

    #[test]
    fn test_clamped_navigation_stops_at_bounds() {
        let mut menu = shown(NavigationPolicy::Clamped, 3);
        assert!(!menu.move_highlight(Direction::Previous));
        assert_eq!(menu.visible().unwrap().highlighted, 0);
        menu.move_highlight(Direction::Next);
        menu.move_highlight(Direction::Next);
        assert!(!menu.move_highlight(Direction::Next));
        assert_eq!(menu.visible().unwrap().highlighted, 2);
    }

    #[test]
    fn test_cyclic_navigation_wraps() {
        let mut menu = shown(NavigationPolicy::Cyclic, 3);
        assert!(menu.move_highlight(Direction::Previous));
        assert_eq!(menu.visible().unwrap().highlighted, 2);
        assert!(menu.move_highlight(Direction::Next));
        assert_eq!(menu.visible().unwrap().highlighted, 0);
    }

    #[test]
    fn test_single_item_never_moves() {
        let mut menu = shown(NavigationPolicy::Cyclic, 1);
        assert!(!menu.move_highlight(Direction::Next));
        assert!(!menu.move_highlight(Direction::Previous));
    }

    #[test]
    fn test_select_hides_and_returns_item() {
        let mut menu = shown(NavigationPolicy::Clamped, 3);
        menu.move_highlight(Direction::Next);
        let selection = menu.select().unwrap();
        assert_eq!(selection.pattern.id, "p1");
        assert_eq!(selection.anchor, ElementId(1));
        assert!(!menu.is_visible());
        assert!(menu.select().is_none());
    }

    #[test]
    fn test_select_at_out_of_range_keeps_menu() {
        let mut menu = shown(NavigationPolicy::Clamped, 2);
        assert!(menu.select_at(5).is_none());
        assert!(menu.is_visible());
    }

    #[test]
    fn test_pointer_highlight() {
        let mut menu = shown(NavigationPolicy::Clamped, 3);
        assert!(menu.highlight(2));
        assert!(!menu.highlight(2));
        assert!(!menu.highlight(7));
        assert_eq!(menu.visible().unwrap().highlighted, 2);
    }

    #[test]
    fn test_hide_reports_previous_visibility() {
        let mut menu = shown(NavigationPolicy::Clamped, 1);
        assert!(menu.hide());
        assert!(!menu.hide());
    }
}
