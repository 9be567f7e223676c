//! Headless page driver.
//!
//! Couples a [`Document`] with an [`AugmentSession`] and a store, and plays
//! the part of the browser's event loop: delivering input events, firing due
//! timers in order, resolving queued store reads and forwarding store change
//! notifications.

use super::session::{AugmentSession, Disposition, Key, PageEvent};
use super::settings::AugmentSettings;
use crate::host::{Document, ElementId, MutationRecord};
use crate::services::PatternIndex;
use crate::storage::{PatternStore, StoreChange, StoreKey};
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::warn;

/// A page, its session and the store behind it.
pub struct PageDriver {
    page: Document,
    session: AugmentSession,
    store: Arc<dyn PatternStore>,
    changes: Receiver<StoreChange>,
}

impl PageDriver {
    /// Attaches a session to `page` and resolves the initial store read.
    pub fn new(
        mut page: Document,
        store: Arc<dyn PatternStore>,
        index: PatternIndex,
        settings: AugmentSettings,
    ) -> Self {
        let changes = store.subscribe();
        let session = AugmentSession::attach(&mut page, index, settings);
        let mut driver = Self {
            page,
            session,
            store,
            changes,
        };
        driver.settle();
        driver
    }

    /// The page.
    #[must_use]
    pub const fn page(&self) -> &Document {
        &self.page
    }

    /// Mutable page access for setting up elements.
    pub const fn page_mut(&mut self) -> &mut Document {
        &mut self.page
    }

    /// The session.
    #[must_use]
    pub const fn session(&self) -> &AugmentSession {
        &self.session
    }

    /// The store.
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn PatternStore> {
        &self.store
    }

    /// Page and session together, for bridge calls.
    pub const fn parts_mut(&mut self) -> (&mut Document, &mut AugmentSession) {
        (&mut self.page, &mut self.session)
    }

    /// Delivers one event, then resolves any store work it caused.
    pub fn deliver(&mut self, event: PageEvent) -> Disposition {
        let disposition = self.session.handle(&mut self.page, event);
        self.settle();
        disposition
    }

    /// Types `text` one character at a time, with an input event after each.
    pub fn type_text(&mut self, target: ElementId, text: &str) {
        let mut buffer = [0u8; 4];
        for ch in text.chars() {
            if !self.page.type_text(target, ch.encode_utf8(&mut buffer)) {
                return;
            }
            self.deliver(PageEvent::Input { target });
        }
    }

    /// Deletes the character before the caret and delivers an input event.
    pub fn backspace(&mut self, target: ElementId) {
        if self.page.backspace(target) {
            self.deliver(PageEvent::Input { target });
        }
    }

    /// Presses a key.
    pub fn press(&mut self, key: Key) -> Disposition {
        self.deliver(PageEvent::KeyDown { key, shift: false })
    }

    /// Presses a key with Shift held.
    pub fn press_shifted(&mut self, key: Key) -> Disposition {
        self.deliver(PageEvent::KeyDown { key, shift: true })
    }

    /// Moves focus away from the focused element.
    pub fn blur(&mut self) {
        if let Some(target) = self.page.blur() {
            self.deliver(PageEvent::Blur { target });
        }
    }

    /// Replaces the page body and reports the mutation.
    pub fn navigate(&mut self) -> MutationRecord {
        let record = self.page.navigate();
        self.deliver(PageEvent::Mutations(vec![record]));
        record
    }

    /// Advances virtual time, firing every timer that falls due.
    pub fn advance(&mut self, ms: u64) {
        let deadline = self.page.now_ms().saturating_add(ms);
        while let Some(timer) = self.page.pop_due_timer(deadline) {
            self.deliver(PageEvent::Timer(timer));
        }
        self.page.advance_clock_to(deadline);
    }

    /// Resolves store reads and change notifications until none remain.
    pub fn settle(&mut self) {
        loop {
            let mut progressed = false;

            loop {
                let change = match self.changes.try_recv() {
                    Ok(change) => change,
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!(skipped, "store change notifications lagged; refreshing all keys");
                        StoreChange {
                            keys: StoreKey::all().to_vec(),
                        }
                    },
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                };
                progressed = true;
                self.session
                    .handle(&mut self.page, PageEvent::StoreChanged(change));
            }

            for (ticket, keys) in self.page.take_reads() {
                progressed = true;
                match self.store.get(&keys) {
                    Ok(record) => {
                        self.session
                            .handle(&mut self.page, PageEvent::StoreLoaded { ticket, record });
                    },
                    Err(e) => warn!(error = %e, %ticket, "store read failed"),
                }
            }

            if !progressed {
                break;
            }
        }
    }
}
