//! Insertion engine.
//!
//! Text edits are computed as pure functions over character offsets, then
//! written through the element's surface. Every write refocuses the field
//! and fires `input` then `change` so frameworks that own the field see it.

use crate::host::{ChangeNotification, ElementId, HostPage, byte_offset};
use tracing::debug;

/// Replaces `[slash_offset, caret)` with `trigger`, keeping the tail.
///
/// Returns the new text and the caret offset just after the trigger.
/// Offsets past the end are clamped, and a caret before the slash is
/// treated as sitting on it.
#[must_use]
pub fn splice_trigger(text: &str, slash_offset: usize, caret: usize, trigger: &str) -> (String, usize) {
    let start = byte_offset(text, slash_offset);
    let end = byte_offset(text, caret).max(start);
    let head = &text[..start];
    let spliced = format!("{head}{trigger}{}", &text[end..]);
    let caret = head.chars().count() + trigger.chars().count();
    (spliced, caret)
}

/// Appends `trigger`, separated by a newline when the text is non-empty.
///
/// Returns the new text and the caret offset at its end.
#[must_use]
pub fn append_trigger(text: &str, trigger: &str) -> (String, usize) {
    let appended = if text.is_empty() {
        trigger.to_string()
    } else {
        format!("{text}\n{trigger}")
    };
    let caret = appended.chars().count();
    (appended, caret)
}

/// Writes `text` into an editable element and notifies the page.
///
/// Returns false, changing nothing, if the element is gone or not editable.
pub fn write_text(page: &mut dyn HostPage, target: ElementId, text: &str, caret: usize) -> bool {
    let Some(surface) = page.surface_mut(target) else {
        debug!(%target, "insertion target no longer editable");
        return false;
    };
    surface.set_text(text, caret);
    page.focus(target);
    page.dispatch(target, ChangeNotification::Input);
    page.dispatch(target, ChangeNotification::Change);
    true
}
