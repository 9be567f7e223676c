//! Table-driven tests for element classification, panel placement,
//! stacking order and key parsing.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use promptrc::augment::Key;
use promptrc::augment::menu::{PanelGeometry, ZIndexStrategy, place, stacking_order};
use promptrc::cli::{Step, SurfaceChoice, parse_steps};
use promptrc::host::{ElementKind, InputType, Rect, SurfaceKind, Viewport, classify};
use promptrc::models::{PatternType, TypeFilter};
use test_case::test_case;

#[test_case(ElementKind::Input(InputType::Text) => Some(SurfaceKind::PlainInput) ; "text input")]
#[test_case(ElementKind::Input(InputType::Search) => Some(SurfaceKind::PlainInput) ; "search input")]
#[test_case(ElementKind::Input(InputType::Email) => Some(SurfaceKind::PlainInput) ; "email input")]
#[test_case(ElementKind::Input(InputType::Url) => Some(SurfaceKind::PlainInput) ; "url input")]
#[test_case(ElementKind::Input(InputType::Password) => None ; "password input")]
#[test_case(ElementKind::Input(InputType::Number) => None ; "number input")]
#[test_case(ElementKind::Input(InputType::parse("checkbox")) => None ; "checkbox input")]
#[test_case(ElementKind::TextArea => Some(SurfaceKind::TextArea) ; "textarea")]
#[test_case(ElementKind::ContentEditable => Some(SurfaceKind::ContentEditable) ; "contenteditable")]
#[test_case(ElementKind::Other("div".to_string()) => None ; "plain div")]
fn test_classify(kind: ElementKind) -> Option<SurfaceKind> {
    classify(&kind)
}

#[test_case("" => InputType::Text ; "missing type")]
#[test_case("TEXT" => InputType::Text ; "upper case")]
#[test_case(" url " => InputType::Url ; "padded")]
#[test_case("tel" => InputType::Other("tel".to_string()) ; "other")]
fn test_input_type_parse(value: &str) -> InputType {
    InputType::parse(value)
}

#[test_case(Rect::new(50.0, 100.0, 300.0, 40.0), Viewport::new(1000.0, 800.0) => (145.0, 50.0) ; "below anchor")]
#[test_case(Rect::new(50.0, 600.0, 300.0, 40.0), Viewport::new(1000.0, 800.0) => (195.0, 50.0) ; "flips above")]
#[test_case(Rect::new(800.0, 100.0, 100.0, 40.0), Viewport::new(1000.0, 800.0) => (145.0, 595.0) ; "right overflow")]
#[test_case(Rect::new(0.0, 100.0, 100.0, 40.0), Viewport::new(1000.0, 800.0) => (145.0, 5.0) ; "left padding")]
#[test_case(Rect::new(10.0, 100.0, 100.0, 40.0), Viewport::new(300.0, 800.0) => (145.0, 5.0) ; "narrow viewport")]
fn test_place(anchor: Rect, viewport: Viewport) -> (f64, f64) {
    let position = place(anchor, viewport, PanelGeometry::default());
    (position.top, position.left)
}

#[test]
fn test_place_accounts_for_scroll() {
    let viewport = Viewport {
        scroll_y: 250.0,
        ..Viewport::new(1000.0, 800.0)
    };
    let position = place(Rect::new(50.0, 100.0, 300.0, 40.0), viewport, PanelGeometry::default());
    assert!((position.top - 395.0).abs() < f64::EPSILON);
}

#[test_case(ZIndexStrategy::Scan, 0 => 999_999 ; "scan floor")]
#[test_case(ZIndexStrategy::Scan, 2_000_000 => 2_000_001 ; "scan above page")]
#[test_case(ZIndexStrategy::Scan, i64::MAX => i64::MAX ; "scan saturates")]
#[test_case(ZIndexStrategy::Fixed, 2_000_000 => 42 ; "fixed ignores page")]
fn test_stacking_order(strategy: ZIndexStrategy, highest: i64) -> i64 {
    stacking_order(strategy, 42, || highest)
}

#[test_case("ArrowDown" => Key::ArrowDown ; "arrow down")]
#[test_case("Up" => Key::ArrowUp ; "legacy up")]
#[test_case("Esc" => Key::Escape ; "legacy escape")]
#[test_case("a" => Key::Character('a') ; "character")]
#[test_case("Shift" => Key::Other("Shift".to_string()) ; "modifier")]
fn test_key_from_dom(name: &str) -> Key {
    Key::from_dom(name)
}

#[test_case("{up}" => vec![Step::Press(Key::ArrowUp)] ; "single key")]
#[test_case("/a{bs}{wait}" => vec![Step::Type("/a".to_string()), Step::Backspace, Step::Wait] ; "backspace and wait")]
#[test_case("" => Vec::<Step>::new() ; "empty")]
fn test_parse_steps(input: &str) -> Vec<Step> {
    parse_steps(input).unwrap()
}

#[test_case("textarea" => Some(SurfaceChoice::TextArea) ; "textarea")]
#[test_case("RICH" => Some(SurfaceChoice::ContentEditable) ; "alias")]
#[test_case("select" => None ; "unknown")]
fn test_surface_choice(name: &str) -> Option<SurfaceChoice> {
    SurfaceChoice::parse(name)
}

#[test_case("ritual" => Some(PatternType::Ritual) ; "ritual")]
#[test_case("dev-pattern" => Some(PatternType::DevPattern) ; "kebab")]
#[test_case("DEV_PATTERN" => Some(PatternType::DevPattern) ; "wire name")]
#[test_case("COMBINATION" => Some(PatternType::Combination) ; "combination")]
#[test_case("poem" => None ; "unknown")]
fn test_pattern_type_parse(name: &str) -> Option<PatternType> {
    PatternType::parse(name)
}

#[test]
fn test_type_filter_default_is_all() {
    assert_eq!(TypeFilter::default(), TypeFilter::All);
}
