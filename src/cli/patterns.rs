//! Catalog browsing commands.

use super::{CliContext, OutputFormat, to_json};
use crate::augment::menu::render::{option_preview, option_title};
use crate::models::{Pattern, TypeFilter, compose_prompt};
use crate::{Error, Result};
use std::fmt::Write;

/// Lists patterns the way the popup does, optionally filtered by type.
///
/// # Errors
///
/// Returns an error if custom patterns cannot be read.
pub fn cmd_list(
    ctx: &CliContext,
    filter: TypeFilter,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    let limit = limit.unwrap_or(ctx.config().popup_max_items);
    let patterns = ctx.index()?.query_filtered("", filter, limit);
    render_patterns(&patterns, format)
}

/// Runs a pattern index query.
///
/// # Errors
///
/// Returns an error if custom patterns cannot be read.
pub fn cmd_search(
    ctx: &CliContext,
    query: &str,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    let limit = limit.unwrap_or(ctx.config().augment.max_items);
    let patterns = ctx.index()?.query(&query.to_lowercase(), limit);
    render_patterns(&patterns, format)
}

/// Shows one pattern in full.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id.
pub fn cmd_show(ctx: &CliContext, id: &str, format: OutputFormat) -> Result<String> {
    let index = ctx.index()?;
    let pattern = index
        .get(id)
        .ok_or_else(|| Error::NotFound(format!("pattern {id}")))?;

    if format == OutputFormat::Json {
        return to_json(pattern);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", option_title(pattern));
    let _ = writeln!(out, "type:        {}", pattern.pattern_type);
    let _ = writeln!(out, "trigger:     {}", pattern.trigger);
    let _ = writeln!(out, "purpose:     {}", pattern.purpose);
    if !pattern.implication.is_empty() {
        let _ = writeln!(out, "implication: {}", pattern.implication);
    }
    if let Some(description) = &pattern.description {
        let _ = writeln!(out, "description: {description}");
    }
    if !pattern.examples.is_empty() {
        let _ = writeln!(out, "examples:");
        for example in &pattern.examples {
            let _ = writeln!(out, "  - {example}");
        }
    }
    Ok(out)
}

/// Builds a composite prompt from pattern ids and free text.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id.
pub fn cmd_assemble(ctx: &CliContext, ids: &[String], context: &str) -> Result<String> {
    let index = ctx.index()?;
    let patterns = ids
        .iter()
        .map(|id| {
            index
                .get(id)
                .ok_or_else(|| Error::NotFound(format!("pattern {id}")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(compose_prompt(patterns, context))
}

fn render_patterns(patterns: &[Pattern], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(&patterns),
        OutputFormat::Table => {
            if patterns.is_empty() {
                return Ok("No patterns found.\n".to_string());
            }
            let mut out = String::new();
            for pattern in patterns {
                let _ = writeln!(
                    out,
                    "{:<36} {:<12} {}",
                    pattern.id,
                    pattern.pattern_type.as_str(),
                    option_preview(pattern)
                );
            }
            Ok(out)
        },
    }
}
