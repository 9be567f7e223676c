//! Composite prompt assembly.

use super::Pattern;

/// Joins the selected pattern triggers and the user's own context into one prompt.
///
/// Sections are separated by a blank line; an empty user context is omitted.
#[must_use]
pub fn compose_prompt<'a, I>(patterns: I, user_context: &str) -> String
where
    I: IntoIterator<Item = &'a Pattern>,
{
    let mut sections: Vec<&str> = patterns
        .into_iter()
        .map(|pattern| pattern.trigger.as_str())
        .collect();
    let context = user_context.trim_end();
    if !context.is_empty() {
        sections.push(context);
    }
    sections.join("\n\n")
}
