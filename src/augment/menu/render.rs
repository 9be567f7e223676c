//! Builds the panel view for a visible menu.

use super::VisibleMenu;
use crate::host::{OptionView, PanelPosition, PanelView};
use crate::models::Pattern;

/// Accessible label of the listbox.
pub const LISTBOX_LABEL: &str = "Prompt pattern suggestions";

/// Number of trigger characters shown in an option preview.
pub const PREVIEW_CHARS: usize = 60;

/// DOM id of the option at `index`.
#[must_use]
pub fn option_id(index: usize) -> String {
    format!("promptrc-option-{index}")
}

/// Live-region text announcing the result count.
#[must_use]
pub fn announcement(count: usize) -> String {
    format!("{count} prompt patterns available")
}

/// Title line: icon then the id without its family prefix.
#[must_use]
pub fn option_title(pattern: &Pattern) -> String {
    format!("{} {}", pattern.display_icon(), pattern.short_name())
}

/// Trigger preview, truncated with `...` past [`PREVIEW_CHARS`].
#[must_use]
pub fn option_preview(pattern: &Pattern) -> String {
    let mut chars = pattern.trigger.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Renders a visible menu.
#[must_use]
pub fn render(menu: &VisibleMenu, position: PanelPosition, z_index: i64) -> PanelView {
    let options = menu
        .items
        .iter()
        .enumerate()
        .map(|(index, pattern)| OptionView {
            dom_id: option_id(index),
            pattern_id: pattern.id.clone(),
            title: option_title(pattern),
            preview: option_preview(pattern),
            selected: index == menu.highlighted,
        })
        .collect();

    PanelView {
        aria_label: LISTBOX_LABEL.to_string(),
        active_descendant: Some(option_id(menu.highlighted)),
        options,
        position,
        z_index,
    }
}
