//! Headless session simulation.

use super::CliContext;
use crate::augment::{Key, PageDriver};
use crate::host::{Document, ElementId, InputType};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Field type to simulate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceChoice {
    /// `<input type="text">`.
    #[default]
    Input,
    /// `<textarea>`.
    TextArea,
    /// A contenteditable region.
    ContentEditable,
}

impl SurfaceChoice {
    /// Parses a surface name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "input" | "text" => Some(Self::Input),
            "textarea" => Some(Self::TextArea),
            "contenteditable" | "editable" | "rich" => Some(Self::ContentEditable),
            _ => None,
        }
    }

    fn add_to(self, page: &mut Document) -> ElementId {
        match self {
            Self::Input => page.add_input(InputType::Text),
            Self::TextArea => page.add_textarea(),
            Self::ContentEditable => page.add_content_editable(),
        }
    }
}

/// One simulation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Literal text typed one character at a time.
    Type(String),
    /// A named key.
    Press(Key),
    /// Deletes the character before the caret.
    Backspace,
    /// Lets pending timers fire.
    Wait,
}

/// Parses `"/rab{down}{enter}"` style input.
///
/// Named keys: `{down}`, `{up}`, `{enter}`, `{esc}`, `{tab}`, `{backspace}`
/// and `{wait}`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an unknown key name or an unclosed brace.
pub fn parse_steps(input: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| Error::InvalidInput(format!("unclosed '{{' in {input:?}")))?;
        let step = match after[..close].to_lowercase().as_str() {
            "down" => Step::Press(Key::ArrowDown),
            "up" => Step::Press(Key::ArrowUp),
            "enter" => Step::Press(Key::Enter),
            "esc" | "escape" => Step::Press(Key::Escape),
            "tab" => Step::Press(Key::Tab),
            "backspace" | "bs" => Step::Backspace,
            "wait" => Step::Wait,
            other => return Err(Error::InvalidInput(format!("unknown key {{{other}}}"))),
        };
        if !literal.is_empty() {
            steps.push(Step::Type(std::mem::take(&mut literal)));
        }
        steps.push(step);
        rest = &after[close + 1..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        steps.push(Step::Type(literal));
    }
    Ok(steps)
}

/// Visible menu at the end of a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSnapshot {
    /// Pattern ids in display order.
    pub items: Vec<String>,
    /// Highlighted index.
    pub highlighted: usize,
}

/// Outcome of a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    /// Final field text.
    pub text: String,
    /// Final caret offset in characters.
    pub caret: Option<usize>,
    /// Menu, if still open.
    pub menu: Option<MenuSnapshot>,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "text:  {:?}", self.text)?;
        if let Some(caret) = self.caret {
            writeln!(f, "caret: {caret}")?;
        }
        match &self.menu {
            None => writeln!(f, "menu:  hidden"),
            Some(menu) => {
                writeln!(f, "menu:  {} item(s)", menu.items.len())?;
                for (i, id) in menu.items.iter().enumerate() {
                    let marker = if i == menu.highlighted { '>' } else { ' ' };
                    writeln!(f, "  {marker} {id}")?;
                }
                Ok(())
            },
        }
    }
}

/// Runs `steps` against a fresh page hosting one field.
///
/// Timers are allowed to fire after every typed run, so the menu has
/// appeared by the time the next named key is pressed.
///
/// # Errors
///
/// Returns an error if the custom patterns cannot be read.
pub fn cmd_simulate(
    ctx: &CliContext,
    hostname: &str,
    surface: SurfaceChoice,
    steps: &[Step],
) -> Result<SimulationReport> {
    let settings = ctx.config().augment;
    let mut page = Document::new(hostname);
    let field = surface.add_to(&mut page);
    let mut driver = PageDriver::new(page, Arc::clone(ctx.store()), ctx.index()?, settings);

    let settle_ms = u64::try_from(
        settings
            .timing
            .debounce
            .max(settings.timing.native_debounce)
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
    .saturating_add(crate::host::FRAME_MS);

    for step in steps {
        match step {
            Step::Type(text) => {
                driver.type_text(field, text);
                driver.advance(settle_ms);
            },
            Step::Press(key) => {
                driver.press(key.clone());
            },
            Step::Backspace => {
                driver.backspace(field);
                driver.advance(settle_ms);
            },
            Step::Wait => driver.advance(settle_ms),
        }
    }

    let menu = driver.session().menu().visible().map(|menu| MenuSnapshot {
        items: menu.items.iter().map(|pattern| pattern.id.clone()).collect(),
        highlighted: menu.highlighted,
    });
    Ok(SimulationReport {
        text: driver.page().text(field).unwrap_or_default(),
        caret: driver.page().caret(field),
        menu,
    })
}
