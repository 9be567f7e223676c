//! Slash-trigger detection.
//!
//! Pure function of text and caret. The nearest `/` inside the lookback
//! window before the caret opens a command; any whitespace between it and
//! the caret means the slash belongs to ordinary prose.

use crate::models::TriggerContext;

/// Default number of characters scanned backwards from the caret.
pub const DEFAULT_LOOKBACK: usize = 50;

/// Trigger detection options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSettings {
    /// Characters scanned backwards from the caret.
    pub lookback: usize,
    /// Require `//` instead of `/` to open a command.
    pub double_slash: bool,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            double_slash: false,
        }
    }
}

/// Detects a slash command ending at `caret` (a character offset).
///
/// A caret past the end of the text is clamped to the end.
#[must_use]
pub fn detect(text: &str, caret: usize, settings: &TriggerSettings) -> TriggerContext {
    let before: Vec<char> = text.chars().take(caret).collect();
    let caret = before.len();
    if caret == 0 {
        return TriggerContext::inactive(caret);
    }

    let window_start = caret.saturating_sub(settings.lookback);
    let Some(slash) = before[window_start..]
        .iter()
        .rposition(|&c| c == '/')
        .map(|pos| window_start + pos)
    else {
        return TriggerContext::inactive(caret);
    };

    let query = &before[slash + 1..];
    if query.iter().any(|c| c.is_whitespace()) {
        return TriggerContext::inactive(caret);
    }

    let slash_offset = if settings.double_slash {
        match slash.checked_sub(1) {
            Some(first) if before[first] == '/' => first,
            _ => return TriggerContext::inactive(caret),
        }
    } else {
        slash
    };

    let query: String = query.iter().collect();
    TriggerContext::active(query.to_lowercase(), slash_offset, caret)
}
