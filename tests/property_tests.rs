//! Property-based tests for trigger detection, insertion, navigation and
//! the pattern index.

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use promptrc::augment::insertion::splice_trigger;
use promptrc::augment::menu::{Direction, MenuController, MenuOrigin, NavigationPolicy};
use promptrc::augment::{TriggerSettings, detect};
use promptrc::catalog::BuiltinCatalog;
use promptrc::host::ElementId;
use promptrc::models::{Pattern, PatternType};
use promptrc::services::PatternIndex;

fn items(n: usize) -> Vec<Pattern> {
    (0..n)
        .map(|i| Pattern::new(format!("pat-{i}"), format!("Trigger {i}"), "p", PatternType::DevPattern))
        .collect()
}

proptest! {
    /// Property: a slash followed by a whitespace-free query at the caret is detected.
    #[test]
    fn prop_slash_query_is_detected(
        prefix in "[a-zA-Z .,]{0,40}",
        query in "[a-zA-Z0-9_-]{0,40}",
    ) {
        let text = format!("{prefix}/{query}");
        let ctx = detect(&text, text.chars().count(), &TriggerSettings::default());
        prop_assert!(ctx.active);
        prop_assert_eq!(ctx.query, query.to_lowercase());
        prop_assert_eq!(ctx.slash_offset, prefix.chars().count());
        prop_assert_eq!(ctx.caret_offset, text.chars().count());
    }

    /// Property: whitespace between the last slash and the caret deactivates.
    #[test]
    fn prop_whitespace_after_slash_is_inactive(
        head in "[a-z]{0,10}",
        tail in "[a-z]{0,10}",
        space in prop::sample::select(vec![" ", "\t", "\n"]),
    ) {
        let text = format!("/{head}{space}{tail}");
        let ctx = detect(&text, text.chars().count(), &TriggerSettings::default());
        prop_assert!(!ctx.active);
    }

    /// Property: slashes beyond the lookback window are never seen.
    #[test]
    fn prop_lookback_bounds_the_search(filler in 50usize..120) {
        let text = format!("/{}", "a".repeat(filler));
        let ctx = detect(&text, text.chars().count(), &TriggerSettings::default());
        prop_assert!(!ctx.active);
    }

    /// Property: detection never panics and active offsets are ordered.
    #[test]
    fn prop_detect_is_total(text in "\\PC{0,80}", caret in 0usize..100) {
        let ctx = detect(&text, caret, &TriggerSettings::default());
        prop_assert!(ctx.caret_offset <= text.chars().count());
        if ctx.active {
            prop_assert!(ctx.slash_offset < ctx.caret_offset);
        }
    }

    /// Property: splicing keeps everything outside the replaced range.
    #[test]
    fn prop_splice_preserves_head_and_tail(
        head in "[a-zé ]{0,20}",
        query in "[a-z]{0,10}",
        tail in "[a-zé ]{0,20}",
        trigger in "[A-Za-z .]{1,30}",
    ) {
        let text = format!("{head}/{query}{tail}");
        let slash = head.chars().count();
        let caret = slash + 1 + query.chars().count();
        let (updated, new_caret) = splice_trigger(&text, slash, caret, &trigger);
        prop_assert_eq!(&updated, &format!("{head}{trigger}{tail}"));
        prop_assert_eq!(new_caret, slash + trigger.chars().count());
    }

    /// Property: the highlight never leaves the item range.
    #[test]
    fn prop_highlight_stays_in_bounds(
        count in 1usize..12,
        cyclic in any::<bool>(),
        moves in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let policy = if cyclic { NavigationPolicy::Cyclic } else { NavigationPolicy::Clamped };
        let mut menu = MenuController::new(policy);
        menu.show(items(count), ElementId(0), MenuOrigin::Picker);
        for down in moves {
            let direction = if down { Direction::Next } else { Direction::Previous };
            menu.move_highlight(direction);
            let highlighted = menu.visible().unwrap().highlighted;
            prop_assert!(highlighted < count);
        }
    }

    /// Property: index queries ignore case and respect the limit.
    #[test]
    fn prop_index_query_case_insensitive(query in "[a-zA-Z]{0,6}", limit in 1usize..20) {
        let catalog = BuiltinCatalog::load().unwrap();
        let mut index = PatternIndex::from_catalog(&catalog, 8);
        let upper = index.query(&query.to_uppercase(), limit);
        let lower = index.query(&query.to_lowercase(), limit);
        prop_assert_eq!(&upper, &lower);
        prop_assert!(upper.len() <= limit);
        let needle = query.to_lowercase();
        prop_assert!(upper.iter().all(|pattern| pattern.matches(&needle)));
    }
}
