//! Slash-trigger context.

use crate::host::ElementId;

/// Derived, ephemeral view of a slash command under the caret.
///
/// Computed fresh on every qualifying input event and never persisted.
/// Offsets are character offsets into the field's text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriggerContext {
    /// Whether a slash command is currently being typed.
    pub active: bool,
    /// Lower-cased text between the slash and the caret.
    pub query: String,
    /// Element the context was read from.
    pub source: Option<ElementId>,
    /// Offset of the (first) slash of the command.
    pub slash_offset: usize,
    /// Caret offset at detection time.
    pub caret_offset: usize,
}

impl TriggerContext {
    /// An inactive context at the given caret.
    #[must_use]
    pub fn inactive(caret_offset: usize) -> Self {
        Self {
            caret_offset,
            ..Self::default()
        }
    }

    /// An active context.
    #[must_use]
    pub fn active(query: impl Into<String>, slash_offset: usize, caret_offset: usize) -> Self {
        Self {
            active: true,
            query: query.into(),
            source: None,
            slash_offset,
            caret_offset,
        }
    }

    /// Attaches the source element.
    #[must_use]
    pub const fn with_source(mut self, source: ElementId) -> Self {
        self.source = Some(source);
        self
    }
}
