//! The in-page session.
//!
//! One [`AugmentSession`] exists per page. It owns every piece of mutable
//! in-page state (toggles, the current field, the menu, pending timers and
//! store reads) and is driven exclusively through [`AugmentSession::handle`]
//! plus the bridge entry points used by cross-context messages.
//!
//! Deferred work is keyed by the handles the page hands back. A store read
//! that was started to show the menu carries the generation it was started
//! in; any dismissal or new keystroke bumps the generation, so a late read
//! can never reopen a menu the user already closed.

use super::guard::{HostGuard, MutationWatcher, WatchEvent};
use super::insertion::{append_trigger, splice_trigger, write_text};
use super::menu::{
    self, Direction, MenuController, MenuOrigin, NavigationPolicy, Selection, Transition,
};
use super::settings::AugmentSettings;
use super::trigger::detect;
use crate::host::{
    AnnouncementId, ElementId, HostPage, MutationRecord, PanelId, PanelView, ReadTicket, TimerId,
};
use crate::models::{Pattern, ToggleState, TriggerContext};
use crate::services::PatternIndex;
use crate::storage::{StoreChange, StoreKey, StoreRecord};
use std::collections::HashMap;
use tracing::{debug, info};

/// A key as reported by a `keydown` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// `ArrowDown`.
    ArrowDown,
    /// `ArrowUp`.
    ArrowUp,
    /// `Enter`.
    Enter,
    /// `Escape`.
    Escape,
    /// `Tab`.
    Tab,
    /// A printable character.
    Character(char),
    /// Any other named key.
    Other(String),
}

impl Key {
    /// Parses a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(name: &str) -> Self {
        match name {
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Other(other.to_string()),
                }
            },
        }
    }
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// An option row of our panel.
    Option(usize),
    /// Our panel, outside any option.
    Panel,
    /// Anywhere else on the page.
    Outside,
}

/// Events delivered by the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// An `input` event bubbled from `target`.
    Input {
        /// Element whose content changed.
        target: ElementId,
    },
    /// A `keydown` event, seen in the capture phase.
    KeyDown {
        /// The key.
        key: Key,
        /// Whether Shift was held.
        shift: bool,
    },
    /// The pointer entered an option row.
    PointerEnter {
        /// Option index.
        index: usize,
    },
    /// A click.
    Click {
        /// What was clicked.
        target: ClickTarget,
    },
    /// An element lost focus.
    Blur {
        /// Element that lost focus.
        target: ElementId,
    },
    /// IME composition started.
    CompositionStart,
    /// IME composition ended.
    CompositionEnd,
    /// A timer or animation frame fired.
    Timer(TimerId),
    /// Structural mutations under the document body.
    Mutations(Vec<MutationRecord>),
    /// The persisted store reported changed keys.
    StoreChanged(StoreChange),
    /// A store read finished.
    StoreLoaded {
        /// Ticket returned by [`HostPage::read_store`].
        ticket: ReadTicket,
        /// Values read.
        record: StoreRecord,
    },
    /// The page is unloading.
    BeforeUnload,
}

/// How the page should treat the event after the session saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disposition {
    /// Call `preventDefault()`.
    pub prevent_default: bool,
    /// Call `stopPropagation()`.
    pub stop_propagation: bool,
}

impl Disposition {
    /// Leave the event alone.
    pub const PASS: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };

    /// The session handled the event completely.
    pub const CONSUMED: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };

    /// Keep the default action but hide the event from the page.
    pub const STOP: Self = Self {
        prevent_default: false,
        stop_propagation: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Debounce,
    Reveal(PanelId),
    Retract(AnnouncementId),
    RemovePanel(PanelId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingRead {
    Refresh,
    Show { generation: u64 },
}

/// Owned in-page state: toggles, current field, menu and deferred work.
pub struct AugmentSession {
    settings: AugmentSettings,
    hostname: String,
    index: PatternIndex,
    menu: MenuController,
    guard: HostGuard,
    watcher: MutationWatcher,
    toggles: ToggleState,
    current: Option<ElementId>,
    pending: Option<TriggerContext>,
    composing: bool,
    generation: u64,
    panel: Option<PanelId>,
    debounce: Option<TimerId>,
    timers: HashMap<TimerId, Deferred>,
    reads: HashMap<ReadTicket, PendingRead>,
    detached: bool,
}

impl AugmentSession {
    /// Attaches to a page and starts loading toggles and custom patterns.
    pub fn attach(page: &mut dyn HostPage, index: PatternIndex, settings: AugmentSettings) -> Self {
        let guard = HostGuard::detect(&*page);
        let hostname = page.hostname().to_string();
        info!(
            host = %hostname,
            native_slash_ui = guard.native_detected(),
            "augment session attached"
        );

        let mut session = Self {
            settings,
            hostname,
            index,
            menu: MenuController::new(settings.navigation),
            guard,
            watcher: MutationWatcher::new(),
            toggles: ToggleState::default(),
            current: None,
            pending: None,
            composing: false,
            generation: 0,
            panel: None,
            debounce: None,
            timers: HashMap::new(),
            reads: HashMap::new(),
            detached: false,
        };
        let ticket = page.read_store(StoreKey::all());
        session.reads.insert(ticket, PendingRead::Refresh);
        session
    }

    /// Handles one page event.
    pub fn handle(&mut self, page: &mut dyn HostPage, event: PageEvent) -> Disposition {
        if self.detached {
            return Disposition::PASS;
        }

        match event {
            PageEvent::Input { target } => self.on_input(page, target),
            PageEvent::KeyDown { key, shift } => return self.on_key(page, &key, shift),
            PageEvent::PointerEnter { index } => {
                if self.menu.highlight(index) {
                    self.refresh_panel(page);
                }
            },
            PageEvent::Click { target } => self.on_click(page, target),
            PageEvent::Blur { target } => {
                let anchored = self.menu.visible().is_some_and(|menu| menu.anchor == target);
                if anchored || self.current == Some(target) {
                    self.dismiss(page);
                }
            },
            PageEvent::CompositionStart => {
                self.composing = true;
                self.dismiss(page);
            },
            PageEvent::CompositionEnd => self.composing = false,
            PageEvent::Timer(timer) => self.on_timer(page, timer),
            PageEvent::Mutations(records) => self.on_mutations(page, &records),
            PageEvent::StoreChanged(change) => {
                let ticket = page.read_store(&change.keys);
                self.reads.insert(ticket, PendingRead::Refresh);
            },
            PageEvent::StoreLoaded { ticket, record } => self.on_store_loaded(page, ticket, &record),
            PageEvent::BeforeUnload => self.teardown(page),
        }
        Disposition::PASS
    }

    /// Opens the menu with the unfiltered list on the current field.
    ///
    /// Returns true if a menu is visible afterwards.
    pub fn show_picker(&mut self, page: &mut dyn HostPage) -> bool {
        if self.detached || !self.toggles.is_active() {
            return false;
        }
        let editable = |id: &ElementId| page.surface(*id).is_some();
        let Some(anchor) = self
            .current
            .filter(editable)
            .or_else(|| page.active_element().filter(editable))
        else {
            debug!("picker requested without an editable field");
            return false;
        };

        self.cancel_debounce(page);
        self.pending = None;
        self.generation += 1;
        self.current = Some(anchor);
        let items = self.index.query("", self.settings.max_items);
        self.present(page, items, anchor, MenuOrigin::Picker);
        self.menu.is_visible()
    }

    /// Appends a pattern to the focused field, or the first editable one.
    ///
    /// Returns false if the page has no editable field.
    pub fn insert_pattern(&mut self, page: &mut dyn HostPage, pattern: &Pattern) -> bool {
        if self.detached {
            return false;
        }
        let Some(target) = page
            .active_element()
            .filter(|&id| page.surface(id).is_some())
            .or_else(|| page.first_editable())
        else {
            debug!(pattern = %pattern.id, "no editable field for insertion");
            return false;
        };
        let Some(text) = page.surface(target).map(|surface| surface.text()) else {
            return false;
        };

        self.current = Some(target);
        let (updated, caret) = append_trigger(&text, &pattern.trigger);
        let inserted = write_text(page, target, &updated, caret);
        if inserted {
            metrics::counter!("patterns_inserted_total", "path" => "append").increment(1);
            info!(pattern = %pattern.id, %target, "pattern appended");
        }
        inserted
    }

    /// Sets the per-site switch, hiding the menu when disabling.
    pub fn set_site_disabled(&mut self, page: &mut dyn HostPage, disabled: bool) {
        self.toggles.site_disabled = disabled;
        if disabled {
            self.dismiss(page);
        }
    }

    /// Sets the global switch, hiding the menu when disabling.
    pub fn set_extension_enabled(&mut self, page: &mut dyn HostPage, enabled: bool) {
        self.toggles.global_enabled = enabled;
        if !enabled {
            self.dismiss(page);
        }
    }

    /// Menu controller.
    #[must_use]
    pub const fn menu(&self) -> &MenuController {
        &self.menu
    }

    /// Enablement flags.
    #[must_use]
    pub const fn toggles(&self) -> ToggleState {
        self.toggles
    }

    /// Pattern index.
    #[must_use]
    pub const fn index(&self) -> &PatternIndex {
        &self.index
    }

    /// Mounted panel, if the menu is visible.
    #[must_use]
    pub const fn panel(&self) -> Option<PanelId> {
        self.panel
    }

    /// Last field the session observed.
    #[must_use]
    pub const fn current_element(&self) -> Option<ElementId> {
        self.current
    }

    /// Whether a debounce timer is pending.
    #[must_use]
    pub const fn debounce_pending(&self) -> bool {
        self.debounce.is_some()
    }

    /// Whether the page looked like it has its own slash commands.
    #[must_use]
    pub const fn native_slash_ui(&self) -> bool {
        self.guard.native_detected()
    }

    /// Whether the session has been torn down.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.detached
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &AugmentSettings {
        &self.settings
    }

    fn on_input(&mut self, page: &mut dyn HostPage, target: ElementId) {
        if !self.toggles.is_active() || self.composing {
            return;
        }
        let Some(surface) = page.surface(target) else {
            return;
        };
        self.current = Some(target);

        let context = surface
            .caret_offset()
            .map_or_else(
                || TriggerContext::inactive(0),
                |caret| detect(&surface.text(), caret, &self.settings.trigger),
            )
            .with_source(target);

        if !context.active {
            self.dismiss(page);
            return;
        }

        self.generation += 1;
        self.pending = Some(context);
        self.cancel_debounce(page);
        let timer = page.set_timeout(self.guard.debounce(&self.settings.timing));
        self.debounce = Some(timer);
        self.timers.insert(timer, Deferred::Debounce);
    }

    fn on_key(&mut self, page: &mut dyn HostPage, key: &Key, shift: bool) -> Disposition {
        if !self.menu.is_visible() {
            return Disposition::PASS;
        }
        if self.guard.foreign_panel_visible(&*page) {
            debug!("foreign panel visible; key passed through");
            return Disposition::PASS;
        }

        let cyclic = self.menu.policy() == NavigationPolicy::Cyclic;
        match key {
            Key::ArrowDown => self.navigate(page, Direction::Next),
            Key::ArrowUp => self.navigate(page, Direction::Previous),
            Key::Tab if cyclic => {
                let direction = if shift {
                    Direction::Previous
                } else {
                    Direction::Next
                };
                self.navigate(page, direction);
            },
            Key::Enter => {
                if let Some(selection) = self.menu.select() {
                    self.commit(page, selection);
                }
            },
            Key::Escape => {
                self.dismiss(page);
                return Disposition::STOP;
            },
            _ => return Disposition::PASS,
        }
        Disposition::CONSUMED
    }

    fn on_click(&mut self, page: &mut dyn HostPage, target: ClickTarget) {
        match target {
            ClickTarget::Option(index) => {
                if let Some(selection) = self.menu.select_at(index) {
                    self.commit(page, selection);
                }
            },
            ClickTarget::Outside if self.menu.is_visible() => self.dismiss(page),
            ClickTarget::Outside | ClickTarget::Panel => {},
        }
    }

    fn on_timer(&mut self, page: &mut dyn HostPage, timer: TimerId) {
        match self.timers.remove(&timer) {
            Some(Deferred::Debounce) if self.debounce == Some(timer) => {
                self.debounce = None;
                if self.pending.is_some() {
                    let ticket = page.read_store(&[StoreKey::CustomPatterns]);
                    self.reads.insert(
                        ticket,
                        PendingRead::Show {
                            generation: self.generation,
                        },
                    );
                }
            },
            Some(Deferred::Reveal(panel)) if self.panel == Some(panel) => {
                page.set_panel_revealed(panel, true);
            },
            Some(Deferred::Retract(announcement)) => page.retract(announcement),
            Some(Deferred::RemovePanel(panel)) => page.remove_panel(panel),
            Some(Deferred::Debounce | Deferred::Reveal(_)) | None => {},
        }
    }

    fn on_mutations(&mut self, page: &mut dyn HostPage, records: &[MutationRecord]) {
        let Some(WatchEvent::PanelDetached(panel)) =
            self.watcher.observe(records, &*page, self.panel)
        else {
            return;
        };
        debug!(%panel, "panel detached by the host page; resetting menu");
        self.panel = None;
        self.menu.hide();
        self.cancel_debounce(page);
        self.pending = None;
        self.generation += 1;
        if self.current.is_some_and(|id| page.surface(id).is_none()) {
            self.current = None;
        }
    }

    fn on_store_loaded(&mut self, page: &mut dyn HostPage, ticket: ReadTicket, record: &StoreRecord) {
        let Some(purpose) = self.reads.remove(&ticket) else {
            return;
        };
        self.apply_record(page, record);

        let PendingRead::Show { generation } = purpose else {
            return;
        };
        if generation != self.generation || !self.toggles.is_active() || self.composing {
            debug!(%ticket, "discarding stale store read");
            return;
        }
        let Some(context) = self.pending.take() else {
            return;
        };
        let Some(anchor) = context.source.filter(|&id| page.surface(id).is_some()) else {
            return;
        };

        let items = self.index.query(&context.query, self.settings.max_items);
        self.present(
            page,
            items,
            anchor,
            MenuOrigin::Slash {
                slash_offset: context.slash_offset,
                caret_offset: context.caret_offset,
            },
        );
    }

    fn apply_record(&mut self, page: &mut dyn HostPage, record: &StoreRecord) {
        let was_active = self.toggles.is_active();
        self.toggles.apply_record(record, &self.hostname);
        if let Some(custom) = &record.custom_patterns {
            if custom.as_slice() != self.index.custom() {
                self.index.set_custom(custom.clone());
            }
        }
        if was_active && !self.toggles.is_active() {
            self.dismiss(page);
        }
    }

    fn present(
        &mut self,
        page: &mut dyn HostPage,
        items: Vec<Pattern>,
        anchor: ElementId,
        origin: MenuOrigin,
    ) {
        let count = items.len();
        let previous = self.menu.visible().map(|menu| menu.items.len());
        match self.menu.show(items, anchor, origin) {
            Transition::Hidden => self.fade_out_panel(page),
            Transition::Shown => {
                let Some(view) = self.view(&*page) else {
                    self.menu.hide();
                    return;
                };
                let panel = page.mount_panel(&view);
                self.panel = Some(panel);
                let frame = page.request_animation_frame();
                self.timers.insert(frame, Deferred::Reveal(panel));
                self.announce(page, count);
                metrics::counter!("menu_shown_total").increment(1);
                debug!(%panel, %anchor, count, "menu shown");
            },
            Transition::Refiltered => {
                self.refresh_panel(page);
                if previous != Some(count) {
                    self.announce(page, count);
                }
            },
        }
    }

    fn navigate(&mut self, page: &mut dyn HostPage, direction: Direction) {
        if self.menu.move_highlight(direction) {
            self.refresh_panel(page);
        }
    }

    fn commit(&mut self, page: &mut dyn HostPage, selection: Selection) {
        self.dismiss(page);
        let Selection {
            pattern,
            anchor,
            origin,
        } = selection;
        let Some(surface) = page.surface(anchor) else {
            debug!(%anchor, "selection target disappeared");
            return;
        };
        let text = surface.text();

        let edit = match origin {
            MenuOrigin::Slash {
                slash_offset,
                caret_offset,
            } => {
                let caret = surface.caret_offset().unwrap_or(caret_offset);
                let fresh = detect(&text, caret, &self.settings.trigger);
                if fresh.active {
                    Some(splice_trigger(&text, fresh.slash_offset, fresh.caret_offset, &pattern.trigger))
                } else if text.chars().nth(slash_offset) == Some('/') {
                    Some(splice_trigger(&text, slash_offset, caret_offset, &pattern.trigger))
                } else {
                    None
                }
            },
            MenuOrigin::Picker => Some(append_trigger(&text, &pattern.trigger)),
        };

        let Some((updated, caret)) = edit else {
            debug!(%anchor, "slash command no longer present; selection dropped");
            return;
        };
        if write_text(page, anchor, &updated, caret) {
            metrics::counter!("patterns_inserted_total", "path" => "menu").increment(1);
            info!(pattern = %pattern.id, %anchor, "pattern inserted");
        }
    }

    fn dismiss(&mut self, page: &mut dyn HostPage) {
        self.cancel_debounce(page);
        self.pending = None;
        self.generation += 1;
        self.menu.hide();
        self.fade_out_panel(page);
    }

    fn fade_out_panel(&mut self, page: &mut dyn HostPage) {
        if let Some(panel) = self.panel.take() {
            page.set_panel_revealed(panel, false);
            let timer = page.set_timeout(self.settings.timing.hide_animation);
            self.timers.insert(timer, Deferred::RemovePanel(panel));
        }
    }

    fn cancel_debounce(&mut self, page: &mut dyn HostPage) {
        if let Some(timer) = self.debounce.take() {
            page.clear_timeout(timer);
            self.timers.remove(&timer);
        }
    }

    fn announce(&mut self, page: &mut dyn HostPage, count: usize) {
        let announcement = page.announce(&menu::announcement(count));
        let timer = page.set_timeout(self.settings.timing.announce);
        self.timers.insert(timer, Deferred::Retract(announcement));
    }

    fn view(&self, page: &dyn HostPage) -> Option<PanelView> {
        let menu = self.menu.visible()?;
        let anchor = page.bounding_rect(menu.anchor)?;
        let position = menu::place(anchor, page.viewport(), self.settings.geometry);
        let z_index = menu::stacking_order(self.settings.z_index, self.settings.fixed_z_index, || {
            page.highest_z_index()
        });
        Some(menu::render(menu, position, z_index))
    }

    fn refresh_panel(&self, page: &mut dyn HostPage) {
        if let (Some(panel), Some(view)) = (self.panel, self.view(&*page)) {
            page.update_panel(panel, &view);
        }
    }

    fn teardown(&mut self, page: &mut dyn HostPage) {
        for (timer, deferred) in self.timers.drain() {
            page.clear_timeout(timer);
            match deferred {
                Deferred::Retract(announcement) => page.retract(announcement),
                Deferred::RemovePanel(panel) => page.remove_panel(panel),
                Deferred::Debounce | Deferred::Reveal(_) => {},
            }
        }
        if let Some(panel) = self.panel.take() {
            page.remove_panel(panel);
        }
        self.debounce = None;
        self.pending = None;
        self.reads.clear();
        self.menu.hide();
        self.detached = true;
        info!(host = %self.hostname, "augment session torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Document, InputType};
    use crate::models::PatternType;

    fn index() -> PatternIndex {
        PatternIndex::new(
            vec![
                Pattern::new("ritual-rabbit", "Follow the white rabbit...", "Mode shift", PatternType::Ritual),
                Pattern::new("pat-debug", "Debug step by step", "Chain of thought", PatternType::DevPattern),
            ],
            8,
        )
    }

    fn attached() -> (Document, AugmentSession, ElementId) {
        let mut page = Document::new("chat.example.com");
        let field = page.add_input(InputType::Text);
        let mut session = AugmentSession::attach(&mut page, index(), AugmentSettings::default());
        for (ticket, _) in page.take_reads() {
            session.handle(
                &mut page,
                PageEvent::StoreLoaded {
                    ticket,
                    record: StoreRecord::default(),
                },
            );
        }
        (page, session, field)
    }

    fn type_and_open(page: &mut Document, session: &mut AugmentSession, field: ElementId, text: &str) {
        page.type_text(field, text);
        session.handle(page, PageEvent::Input { target: field });
        let timer = page.pop_due_timer(u64::MAX).unwrap();
        session.handle(page, PageEvent::Timer(timer));
        let (ticket, keys) = page.take_reads().pop().unwrap();
        assert_eq!(keys, vec![StoreKey::CustomPatterns]);
        session.handle(
            page,
            PageEvent::StoreLoaded {
                ticket,
                record: StoreRecord::default(),
            },
        );
    }

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Character('a'));
        assert_eq!(Key::from_dom("Shift"), Key::Other("Shift".to_string()));
    }

    #[test]
    fn test_slash_opens_menu_after_debounce_and_read() {
        let (mut page, mut session, field) = attached();
        type_and_open(&mut page, &mut session, field, "/rab");
        let menu = session.menu().visible().unwrap();
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.items[0].id, "ritual-rabbit");
        assert!(session.panel().is_some());
        assert_eq!(page.announcements(), vec!["1 prompt patterns available"]);
    }

    #[test]
    fn test_stale_read_does_not_reopen_dismissed_menu() {
        let (mut page, mut session, field) = attached();
        page.type_text(field, "/rab");
        session.handle(&mut page, PageEvent::Input { target: field });
        let timer = page.pop_due_timer(u64::MAX).unwrap();
        session.handle(&mut page, PageEvent::Timer(timer));
        let (ticket, _) = page.take_reads().pop().unwrap();

        session.handle(&mut page, PageEvent::Blur { target: field });
        session.handle(
            &mut page,
            PageEvent::StoreLoaded {
                ticket,
                record: StoreRecord::default(),
            },
        );
        assert!(!session.menu().is_visible());
        assert!(session.panel().is_none());
    }

    #[test]
    fn test_escape_stops_propagation_only() {
        let (mut page, mut session, field) = attached();
        type_and_open(&mut page, &mut session, field, "/");
        let disposition = session.handle(
            &mut page,
            PageEvent::KeyDown {
                key: Key::Escape,
                shift: false,
            },
        );
        assert_eq!(disposition, Disposition::STOP);
        assert!(!session.menu().is_visible());
    }

    #[test]
    fn test_keys_pass_when_hidden() {
        let (mut page, mut session, _) = attached();
        let disposition = session.handle(
            &mut page,
            PageEvent::KeyDown {
                key: Key::ArrowDown,
                shift: false,
            },
        );
        assert_eq!(disposition, Disposition::PASS);
    }

    #[test]
    fn test_composition_suppresses_detection() {
        let (mut page, mut session, field) = attached();
        session.handle(&mut page, PageEvent::CompositionStart);
        page.type_text(field, "/rab");
        session.handle(&mut page, PageEvent::Input { target: field });
        assert!(!session.debounce_pending());
        session.handle(&mut page, PageEvent::CompositionEnd);
        session.handle(&mut page, PageEvent::Input { target: field });
        assert!(session.debounce_pending());
    }

    #[test]
    fn test_teardown_clears_everything() {
        let (mut page, mut session, field) = attached();
        type_and_open(&mut page, &mut session, field, "/");
        session.handle(&mut page, PageEvent::BeforeUnload);
        assert!(session.is_detached());
        assert_eq!(page.pending_timers(), 0);
        assert!(page.attached_panels().is_empty());
        assert!(page.announcements().is_empty());

        page.type_text(field, "/");
        session.handle(&mut page, PageEvent::Input { target: field });
        assert!(!session.debounce_pending());
    }
}
