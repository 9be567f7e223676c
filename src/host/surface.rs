//! Editable surfaces.
//!
//! Plain inputs and textareas expose a `value` plus a selection range;
//! contenteditable regions expose rendered text nodes plus a document
//! selection. [`EditableSurface`] gives the core one contract over both.
//! All offsets are character offsets, never byte offsets.

use std::fmt;

/// Concrete kind of an editable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// `<input>` with a text-like type.
    PlainInput,
    /// `<textarea>`.
    TextArea,
    /// Element with `contenteditable`.
    ContentEditable,
}

impl SurfaceKind {
    /// Returns a short name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlainInput => "input",
            Self::TextArea => "textarea",
            Self::ContentEditable => "contenteditable",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` attribute of an `<input>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputType {
    /// `text` (also the default for a missing type).
    Text,
    /// `search`.
    Search,
    /// `email`.
    Email,
    /// `url`.
    Url,
    /// `password`.
    Password,
    /// `number`.
    Number,
    /// Any other type.
    Other(String),
}

impl InputType {
    /// Parses a `type` attribute value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "text" => Self::Text,
            "search" => Self::Search,
            "email" => Self::Email,
            "url" => Self::Url,
            "password" => Self::Password,
            "number" => Self::Number,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns true for the free-text types the picker augments.
    #[must_use]
    pub const fn is_text_like(&self) -> bool {
        matches!(self, Self::Text | Self::Search | Self::Email | Self::Url)
    }
}

/// Structural kind of a host element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// `<input type=...>`.
    Input(InputType),
    /// `<textarea>`.
    TextArea,
    /// Any element with `contenteditable` set.
    ContentEditable,
    /// A non-editable element, by tag name.
    Other(String),
}

/// Decides whether an element is editable and with which surface.
#[must_use]
pub fn classify(kind: &ElementKind) -> Option<SurfaceKind> {
    match kind {
        ElementKind::ContentEditable => Some(SurfaceKind::ContentEditable),
        ElementKind::TextArea => Some(SurfaceKind::TextArea),
        ElementKind::Input(input_type) if input_type.is_text_like() => Some(SurfaceKind::PlainInput),
        ElementKind::Input(_) | ElementKind::Other(_) => None,
    }
}

/// Uniform text and caret access for an editable element.
pub trait EditableSurface: fmt::Debug {
    /// Which concrete surface this is.
    fn kind(&self) -> SurfaceKind;

    /// Current text content.
    fn text(&self) -> String;

    /// Caret offset, or `None` when the element has no caret.
    fn caret_offset(&self) -> Option<usize>;

    /// Collapses the selection to `offset`, clamped to the text length.
    fn set_caret(&mut self, offset: usize);

    /// Replaces the whole text and collapses the caret to `caret`.
    fn set_text(&mut self, text: &str, caret: usize);
}

/// Converts a character offset into a byte offset, clamping to the end.
#[must_use]
pub fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Value plus selection, shared by inputs and textareas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ValueField {
    value: String,
    selection_start: usize,
    selection_end: usize,
}

impl ValueField {
    fn new(value: &str) -> Self {
        let end = char_len(value);
        Self {
            value: value.to_string(),
            selection_start: end,
            selection_end: end,
        }
    }

    fn collapse(&mut self, offset: usize) {
        let offset = offset.min(char_len(&self.value));
        self.selection_start = offset;
        self.selection_end = offset;
    }

    fn replace(&mut self, text: &str, caret: usize) {
        text.clone_into(&mut self.value);
        self.collapse(caret);
    }
}

/// A text-like `<input>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    input_type: InputType,
    field: ValueField,
}

impl TextInput {
    /// Creates an input with `value`, caret at the end.
    #[must_use]
    pub fn new(input_type: InputType, value: &str) -> Self {
        Self {
            input_type,
            field: ValueField::new(value),
        }
    }

    /// The input's type.
    #[must_use]
    pub const fn input_type(&self) -> &InputType {
        &self.input_type
    }
}

impl EditableSurface for TextInput {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::PlainInput
    }

    fn text(&self) -> String {
        self.field.value.clone()
    }

    fn caret_offset(&self) -> Option<usize> {
        Some(self.field.selection_start)
    }

    fn set_caret(&mut self, offset: usize) {
        self.field.collapse(offset);
    }

    fn set_text(&mut self, text: &str, caret: usize) {
        self.field.replace(text, caret);
    }
}

/// A `<textarea>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    field: ValueField,
}

impl TextArea {
    /// Creates a textarea with `value`, caret at the end.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            field: ValueField::new(value),
        }
    }
}

impl EditableSurface for TextArea {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::TextArea
    }

    fn text(&self) -> String {
        self.field.value.clone()
    }

    fn caret_offset(&self) -> Option<usize> {
        Some(self.field.selection_start)
    }

    fn set_caret(&mut self, offset: usize) {
        self.field.collapse(offset);
    }

    fn set_text(&mut self, text: &str, caret: usize) {
        self.field.replace(text, caret);
    }
}

/// A contenteditable region modelled as a run of text nodes.
///
/// The caret is a (node, offset) selection point; its character offset is
/// the length of all rendered text before that point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentEditable {
    nodes: Vec<String>,
    selection: Option<(usize, usize)>,
}

impl ContentEditable {
    /// Creates a region from text nodes, with no selection.
    #[must_use]
    pub fn from_nodes(nodes: Vec<String>) -> Self {
        Self {
            nodes,
            selection: None,
        }
    }

    /// Places the selection inside a specific node.
    pub fn select(&mut self, node: usize, offset: usize) {
        if let Some(text) = self.nodes.get(node) {
            self.selection = Some((node, offset.min(char_len(text))));
        }
    }

    /// Removes the selection.
    pub const fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Rendered text nodes.
    #[must_use]
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }
}

impl EditableSurface for ContentEditable {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::ContentEditable
    }

    fn text(&self) -> String {
        self.nodes.concat()
    }

    fn caret_offset(&self) -> Option<usize> {
        let (node, offset) = self.selection?;
        let before: usize = self.nodes[..node].iter().map(|n| char_len(n)).sum();
        Some(before + offset)
    }

    fn set_caret(&mut self, offset: usize) {
        if self.nodes.is_empty() {
            self.nodes.push(String::new());
        }
        let mut remaining = offset;
        for (index, node) in self.nodes.iter().enumerate() {
            let len = char_len(node);
            if remaining <= len {
                self.selection = Some((index, remaining));
                return;
            }
            remaining -= len;
        }
        let last = self.nodes.len() - 1;
        self.selection = Some((last, char_len(&self.nodes[last])));
    }

    fn set_text(&mut self, text: &str, caret: usize) {
        self.nodes = vec![text.to_string()];
        self.selection = Some((0, caret.min(char_len(text))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_parse() {
        assert_eq!(InputType::parse(""), InputType::Text);
        assert_eq!(InputType::parse("EMAIL"), InputType::Email);
        assert_eq!(InputType::parse("date"), InputType::Other("date".to_string()));
    }

    #[test]
    fn test_value_field_caret_clamped() {
        let mut input = TextInput::new(InputType::Text, "hello");
        assert_eq!(input.caret_offset(), Some(5));
        input.set_caret(99);
        assert_eq!(input.caret_offset(), Some(5));
        input.set_text("héllo wörld", 3);
        assert_eq!(input.text(), "héllo wörld");
        assert_eq!(input.caret_offset(), Some(3));
    }

    #[test]
    fn test_content_editable_caret_across_nodes() {
        let mut region =
            ContentEditable::from_nodes(vec!["Hello ".to_string(), "/rab".to_string()]);
        assert_eq!(region.caret_offset(), None);
        region.select(1, 4);
        assert_eq!(region.text(), "Hello /rab");
        assert_eq!(region.caret_offset(), Some(10));

        region.set_caret(3);
        assert_eq!(region.caret_offset(), Some(3));
    }

    #[test]
    fn test_content_editable_set_text_collapses_nodes() {
        let mut region = ContentEditable::from_nodes(vec!["a".to_string(), "b".to_string()]);
        region.set_text("abc", 2);
        assert_eq!(region.nodes(), ["abc".to_string()]);
        assert_eq!(region.caret_offset(), Some(2));
    }

    #[test]
    fn test_empty_content_editable_set_caret() {
        let mut region = ContentEditable::default();
        region.set_caret(4);
        assert_eq!(region.caret_offset(), Some(0));
    }

    #[test]
    fn test_byte_offset() {
        assert_eq!(byte_offset("héllo", 2), 3);
        assert_eq!(byte_offset("abc", 10), 3);
        assert_eq!(byte_offset("", 0), 0);
    }
}
