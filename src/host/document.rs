//! In-memory host page.
//!
//! [`Document`] is a deterministic stand-in for a browser page. Elements are
//! added with [`ElementSpec`] builders, time only moves when the owner pops
//! due timers, and store reads queue until the owner resolves them. Nothing
//! here knows about the menu or the session; it only records what the core
//! asked the page to do.

use super::surface::{ContentEditable, TextArea, TextInput};
use super::{
    AnnouncementId, ChangeNotification, EditableSurface, ElementId, ElementKind, HostPage,
    InputType, MutationRecord, PanelId, PanelView, ReadTicket, Rect, Selector, SurfaceKind,
    TimerId, Viewport, byte_offset, classify,
};
use crate::storage::StoreKey;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Delay used for animation frames.
pub const FRAME_MS: u64 = 16;

/// Description of an element to add to a [`Document`].
#[derive(Debug, Clone)]
pub struct ElementSpec {
    kind: ElementKind,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    rect: Rect,
    visible: bool,
    z_index: Option<i64>,
    value: String,
}

impl ElementSpec {
    fn with_kind(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            rect: Rect::new(40.0, 100.0, 600.0, 40.0),
            visible: true,
            z_index: None,
            value: String::new(),
        }
    }

    /// An `<input>` of the given type.
    #[must_use]
    pub fn input(input_type: InputType) -> Self {
        Self::with_kind(ElementKind::Input(input_type))
    }

    /// A `<textarea>`.
    #[must_use]
    pub fn textarea() -> Self {
        Self::with_kind(ElementKind::TextArea)
    }

    /// A contenteditable region.
    #[must_use]
    pub fn content_editable() -> Self {
        Self::with_kind(ElementKind::ContentEditable)
    }

    /// A non-editable element.
    #[must_use]
    pub fn element(tag: &str) -> Self {
        Self::with_kind(ElementKind::Other(tag.to_lowercase()))
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Adds a class.
    #[must_use]
    pub fn class(mut self, name: &str) -> Self {
        self.classes.push(name.to_string());
        self
    }

    /// Sets the bounding box.
    #[must_use]
    pub const fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Marks the element as not rendered.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Sets a computed z-index.
    #[must_use]
    pub const fn z_index(mut self, z_index: i64) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Sets the initial text, caret at the end.
    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        value.clone_into(&mut self.value);
        self
    }
}

#[derive(Debug)]
struct Node {
    spec: ElementSpec,
    attached: bool,
    surface: Option<Box<dyn EditableSurface>>,
}

#[derive(Debug, Clone)]
struct MountedPanel {
    view: PanelView,
    revealed: bool,
    attached: bool,
}

/// Deterministic in-memory [`HostPage`].
#[derive(Debug)]
pub struct Document {
    hostname: String,
    viewport: Viewport,
    nodes: Vec<Node>,
    active: Option<ElementId>,
    panels: BTreeMap<PanelId, MountedPanel>,
    announcements: BTreeMap<AnnouncementId, String>,
    timers: BTreeMap<TimerId, u64>,
    now_ms: u64,
    reads: VecDeque<(ReadTicket, Vec<StoreKey>)>,
    notifications: Vec<(ElementId, ChangeNotification)>,
    next_handle: u64,
}

impl Document {
    /// Creates an empty page for `hostname`.
    #[must_use]
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            viewport: Viewport::default(),
            nodes: Vec::new(),
            active: None,
            panels: BTreeMap::new(),
            announcements: BTreeMap::new(),
            timers: BTreeMap::new(),
            now_ms: 0,
            reads: VecDeque::new(),
            notifications: Vec::new(),
            next_handle: 1,
        }
    }

    /// Replaces the viewport.
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Adds an element and returns its id.
    pub fn add(&mut self, spec: ElementSpec) -> ElementId {
        let surface: Option<Box<dyn EditableSurface>> =
            classify(&spec.kind).map(|kind| -> Box<dyn EditableSurface> {
                match (kind, &spec.kind) {
                    (SurfaceKind::PlainInput, ElementKind::Input(input_type)) => {
                        Box::new(TextInput::new(input_type.clone(), &spec.value))
                    },
                    (SurfaceKind::TextArea, _) => Box::new(TextArea::new(&spec.value)),
                    _ => {
                        let mut region = ContentEditable::from_nodes(vec![spec.value.clone()]);
                        region.set_caret(spec.value.chars().count());
                        Box::new(region)
                    },
                }
            });
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(Node {
            spec,
            attached: true,
            surface,
        });
        id
    }

    /// Adds an `<input>`.
    pub fn add_input(&mut self, input_type: InputType) -> ElementId {
        self.add(ElementSpec::input(input_type))
    }

    /// Adds a `<textarea>`.
    pub fn add_textarea(&mut self) -> ElementId {
        self.add(ElementSpec::textarea())
    }

    /// Adds a contenteditable region.
    pub fn add_content_editable(&mut self) -> ElementId {
        self.add(ElementSpec::content_editable())
    }

    /// Removes focus and returns the element that had it.
    pub const fn blur(&mut self) -> Option<ElementId> {
        self.active.take()
    }

    /// Types `text` at the caret of an editable element, focusing it.
    ///
    /// Returns false if the element is not editable. No notifications are
    /// recorded; the caller delivers the matching input event.
    pub fn type_text(&mut self, id: ElementId, text: &str) -> bool {
        self.focus(id);
        let Some(surface) = self.surface_mut(id) else {
            return false;
        };
        let current = surface.text();
        let caret = surface
            .caret_offset()
            .unwrap_or_else(|| current.chars().count());
        let split = byte_offset(&current, caret);
        let updated = format!("{}{text}{}", &current[..split], &current[split..]);
        surface.set_text(&updated, caret + text.chars().count());
        true
    }

    /// Deletes the character before the caret.
    pub fn backspace(&mut self, id: ElementId) -> bool {
        let Some(surface) = self.surface_mut(id) else {
            return false;
        };
        let current = surface.text();
        let caret = surface
            .caret_offset()
            .unwrap_or_else(|| current.chars().count());
        if caret == 0 {
            return true;
        }
        let start = byte_offset(&current, caret - 1);
        let end = byte_offset(&current, caret);
        let updated = format!("{}{}", &current[..start], &current[end..]);
        surface.set_text(&updated, caret - 1);
        true
    }

    /// Moves the caret of an editable element.
    pub fn set_caret(&mut self, id: ElementId, offset: usize) {
        if let Some(surface) = self.surface_mut(id) {
            surface.set_caret(offset);
        }
    }

    /// Text of an editable element.
    #[must_use]
    pub fn text(&self, id: ElementId) -> Option<String> {
        self.surface(id).map(EditableSurface::text)
    }

    /// Caret of an editable element.
    #[must_use]
    pub fn caret(&self, id: ElementId) -> Option<usize> {
        self.surface(id).and_then(EditableSurface::caret_offset)
    }

    /// Detaches an element, as a host script removing it would.
    pub fn remove(&mut self, id: ElementId) -> MutationRecord {
        let Some(node) = self.node_mut(id) else {
            return MutationRecord::default();
        };
        node.attached = false;
        if self.active == Some(id) {
            self.active = None;
        }
        MutationRecord {
            added: 0,
            removed: 1,
        }
    }

    /// Replaces the page body, detaching every element and panel.
    ///
    /// Models a single-page-app route change that rebuilds the DOM without
    /// unloading the script.
    pub fn navigate(&mut self) -> MutationRecord {
        let mut removed = 0;
        for node in self.nodes.iter_mut().filter(|node| node.attached) {
            node.attached = false;
            removed += 1;
        }
        for panel in self.panels.values_mut().filter(|panel| panel.attached) {
            panel.attached = false;
            removed += 1;
        }
        self.announcements.clear();
        self.active = None;
        MutationRecord { added: 0, removed }
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Removes and returns the earliest timer due at or before `deadline_ms`,
    /// advancing the clock to its due time.
    pub fn pop_due_timer(&mut self, deadline_ms: u64) -> Option<TimerId> {
        let (&id, &due) = self
            .timers
            .iter()
            .filter(|&(_, &due)| due <= deadline_ms)
            .min_by_key(|&(id, &due)| (due, *id))?;
        self.timers.remove(&id);
        self.now_ms = self.now_ms.max(due);
        Some(id)
    }

    /// Moves the clock forward to `ms` without firing anything.
    pub fn advance_clock_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Takes every queued store read.
    pub fn take_reads(&mut self) -> Vec<(ReadTicket, Vec<StoreKey>)> {
        self.reads.drain(..).collect()
    }

    /// Attached panel views, most recently mounted last.
    #[must_use]
    pub fn attached_panels(&self) -> Vec<&PanelView> {
        self.panels
            .values()
            .filter(|panel| panel.attached)
            .map(|panel| &panel.view)
            .collect()
    }

    /// View of a panel, attached or not.
    #[must_use]
    pub fn panel(&self, id: PanelId) -> Option<&PanelView> {
        self.panels.get(&id).map(|panel| &panel.view)
    }

    /// Whether a panel has been revealed.
    #[must_use]
    pub fn panel_revealed(&self, id: PanelId) -> bool {
        self.panels.get(&id).is_some_and(|panel| panel.revealed)
    }

    /// Current live-region messages.
    #[must_use]
    pub fn announcements(&self) -> Vec<&str> {
        self.announcements.values().map(String::as_str).collect()
    }

    /// Notifications dispatched so far.
    #[must_use]
    pub fn notifications(&self) -> &[(ElementId, ChangeNotification)] {
        &self.notifications
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.nodes.get(index))
            .filter(|node| node.attached)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.nodes.get_mut(index))
            .filter(|node| node.attached)
    }

    const fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn schedule(&mut self, delay_ms: u64) -> TimerId {
        let id = TimerId(self.next_handle());
        self.timers.insert(id, self.now_ms + delay_ms);
        id
    }
}

impl HostPage for Document {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.filter(|&id| self.node(id).is_some())
    }

    fn first_editable(&self) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|node| node.attached && node.surface.is_some())
            .map(|index| ElementId(index as u64))
    }

    fn surface(&self, id: ElementId) -> Option<&dyn EditableSurface> {
        let surface: &dyn EditableSurface = self.node(id)?.surface.as_deref()?;
        Some(surface)
    }

    fn surface_mut(&mut self, id: ElementId) -> Option<&mut dyn EditableSurface> {
        let surface: &mut dyn EditableSurface = self.node_mut(id)?.surface.as_deref_mut()?;
        Some(surface)
    }

    fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        self.node(id).map(|node| node.spec.rect)
    }

    fn focus(&mut self, id: ElementId) {
        if self.node(id).is_some() {
            self.active = Some(id);
        }
    }

    fn dispatch(&mut self, id: ElementId, notification: ChangeNotification) {
        if self.node(id).is_some() {
            self.notifications.push((id, notification));
        }
    }

    fn has_match(&self, selector: &Selector) -> bool {
        self.nodes.iter().any(|node| {
            node.attached && selector.matches(&node.spec.attributes, &node.spec.classes)
        })
    }

    fn has_visible_match(&self, selector: &Selector) -> bool {
        self.nodes.iter().any(|node| {
            node.attached
                && node.spec.visible
                && selector.matches(&node.spec.attributes, &node.spec.classes)
        })
    }

    fn highest_z_index(&self) -> i64 {
        self.nodes
            .iter()
            .filter(|node| node.attached)
            .filter_map(|node| node.spec.z_index)
            .max()
            .unwrap_or(0)
    }

    fn mount_panel(&mut self, view: &PanelView) -> PanelId {
        let id = PanelId(self.next_handle());
        self.panels.insert(
            id,
            MountedPanel {
                view: view.clone(),
                revealed: false,
                attached: true,
            },
        );
        id
    }

    fn update_panel(&mut self, id: PanelId, view: &PanelView) {
        if let Some(panel) = self.panels.get_mut(&id).filter(|panel| panel.attached) {
            panel.view = view.clone();
        }
    }

    fn set_panel_revealed(&mut self, id: PanelId, revealed: bool) {
        if let Some(panel) = self.panels.get_mut(&id).filter(|panel| panel.attached) {
            panel.revealed = revealed;
        }
    }

    fn panel_attached(&self, id: PanelId) -> bool {
        self.panels.get(&id).is_some_and(|panel| panel.attached)
    }

    fn remove_panel(&mut self, id: PanelId) {
        if let Some(panel) = self.panels.get_mut(&id) {
            panel.attached = false;
            panel.revealed = false;
        }
    }

    fn announce(&mut self, message: &str) -> AnnouncementId {
        let id = AnnouncementId(self.next_handle());
        self.announcements.insert(id, message.to_string());
        id
    }

    fn retract(&mut self, id: AnnouncementId) {
        self.announcements.remove(&id);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX / 2);
        self.schedule(delay_ms)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }

    fn request_animation_frame(&mut self) -> TimerId {
        self.schedule(FRAME_MS)
    }

    fn read_store(&mut self, keys: &[StoreKey]) -> ReadTicket {
        let ticket = ReadTicket(self.next_handle());
        self.reads.push_back((ticket, keys.to_vec()));
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editable_classification() {
        let mut page = Document::new("example.com");
        let text = page.add_input(InputType::Text);
        let password = page.add_input(InputType::Password);
        let div = page.add(ElementSpec::element("div"));
        assert!(page.surface(text).is_some());
        assert!(page.surface(password).is_none());
        assert!(page.surface(div).is_none());
        assert_eq!(page.first_editable(), Some(text));
    }

    #[test]
    fn test_type_text_inserts_at_caret() {
        let mut page = Document::new("example.com");
        let field = page.add(ElementSpec::textarea().value("hello world"));
        page.set_caret(field, 5);
        assert!(page.type_text(field, ","));
        assert_eq!(page.text(field).as_deref(), Some("hello, world"));
        assert_eq!(page.caret(field), Some(6));
        assert_eq!(page.active_element(), Some(field));

        assert!(page.backspace(field));
        assert_eq!(page.text(field).as_deref(), Some("hello world"));
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut page = Document::new("example.com");
        let late = page.set_timeout(Duration::from_millis(300));
        let early = page.set_timeout(Duration::from_millis(100));
        let cancelled = page.set_timeout(Duration::from_millis(50));
        page.clear_timeout(cancelled);

        assert_eq!(page.pop_due_timer(99), None);
        assert_eq!(page.pop_due_timer(1_000), Some(early));
        assert_eq!(page.now_ms(), 100);
        assert_eq!(page.pop_due_timer(1_000), Some(late));
        assert_eq!(page.pop_due_timer(1_000), None);
    }

    #[test]
    fn test_navigate_detaches_everything() {
        let mut page = Document::new("example.com");
        let field = page.add_input(InputType::Text);
        page.focus(field);
        let panel = page.mount_panel(&PanelView {
            aria_label: String::new(),
            active_descendant: None,
            options: Vec::new(),
            position: crate::host::PanelPosition::default(),
            z_index: 0,
        });

        let record = page.navigate();
        assert_eq!(record.removed, 2);
        assert!(!page.panel_attached(panel));
        assert!(page.surface(field).is_none());
        assert_eq!(page.active_element(), None);
    }

    #[test]
    fn test_selector_queries_respect_visibility() {
        let mut page = Document::new("example.com");
        page.add(ElementSpec::element("div").attr("role", "listbox").hidden());
        let selector = Selector::any().attr_eq("role", "listbox");
        assert!(page.has_match(&selector));
        assert!(!page.has_visible_match(&selector));
    }

    #[test]
    fn test_highest_z_index() {
        let mut page = Document::new("example.com");
        assert_eq!(page.highest_z_index(), 0);
        page.add(ElementSpec::element("div").z_index(42));
        page.add(ElementSpec::element("div").z_index(7));
        assert_eq!(page.highest_z_index(), 42);
    }
}
