//! Custom pattern, toggle and messaging commands.

use super::{CliContext, OutputFormat, to_json};
use crate::messaging::{Request, Shortcut};
use crate::models::PatternDraft;
use crate::{Error, Result};
use std::fmt::Write;

/// Saves a custom pattern through the background handler.
///
/// # Errors
///
/// Returns an error if the draft is invalid or the store rejects the write.
pub fn cmd_custom_add(ctx: &CliContext, draft: PatternDraft) -> Result<String> {
    let response = ctx.handler().handle(&Request::SaveCustomPattern { pattern: draft });
    match (response.success, response.pattern) {
        (true, Some(pattern)) => Ok(format!("Saved custom pattern {}\n", pattern.id)),
        _ => Err(response_error(response.error)),
    }
}

/// Deletes a custom pattern. Unknown ids succeed.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn cmd_custom_remove(ctx: &CliContext, id: &str) -> Result<String> {
    let response = ctx.handler().handle(&Request::DeleteCustomPattern {
        pattern_id: id.to_string(),
    });
    if response.success {
        Ok(format!("Removed custom pattern {id}\n"))
    } else {
        Err(response_error(response.error))
    }
}

/// Lists custom patterns.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn cmd_custom_list(ctx: &CliContext, format: OutputFormat) -> Result<String> {
    let custom = ctx.handler().service().list()?;
    if format == OutputFormat::Json {
        return to_json(&custom);
    }
    if custom.is_empty() {
        return Ok("No custom patterns.\n".to_string());
    }
    let mut out = String::new();
    for pattern in &custom {
        let _ = writeln!(out, "{:<24} {}", pattern.id, pattern.trigger);
    }
    Ok(out)
}

/// Persists the per-site switch.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn cmd_toggle_site(ctx: &CliContext, hostname: &str, disabled: bool) -> Result<String> {
    ctx.handler().service().set_site_disabled(hostname, disabled)?;
    let state = if disabled { "disabled" } else { "enabled" };
    Ok(format!("{} {state}\n", hostname.to_lowercase()))
}

/// Persists the global switch.
///
/// # Errors
///
/// Returns an error if the store rejects the write.
pub fn cmd_toggle_extension(ctx: &CliContext, enabled: bool) -> Result<String> {
    ctx.handler().service().set_extension_enabled(enabled)?;
    let state = if enabled { "enabled" } else { "disabled" };
    Ok(format!("extension {state}\n"))
}

/// Dispatches one JSON envelope and returns the JSON response.
///
/// Parse failures are answered in-band, like any other failed request.
///
/// # Errors
///
/// Returns an error only if the response cannot be serialized.
pub fn cmd_message(ctx: &CliContext, json: &str) -> Result<String> {
    let response = match serde_json::from_str::<serde_json::Value>(json) {
        Ok(value) => ctx.handler().handle_value(value),
        Err(e) => crate::messaging::Response::failure(&Error::InvalidInput(format!(
            "invalid JSON: {e}"
        )))
        .to_value(),
    };
    to_json(&response)
}

/// Shows the page message a shortcut produces.
///
/// # Errors
///
/// Returns an error if the persisted switch cannot be toggled.
pub fn cmd_shortcut(ctx: &CliContext, command: &str) -> Result<String> {
    match ctx.handler().on_shortcut(&Shortcut::from(command))? {
        Some(request) => to_json(&request),
        None => Ok(format!("unknown shortcut: {command}\n")),
    }
}

fn response_error(error: Option<String>) -> Error {
    Error::InvalidInput(error.unwrap_or_else(|| "request failed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_context;

    fn draft(trigger: &str) -> PatternDraft {
        PatternDraft {
            id: Some("custom-cli".to_string()),
            trigger: trigger.to_string(),
            purpose: "Testing".to_string(),
            ..PatternDraft::default()
        }
    }

    #[test]
    fn test_add_list_remove() {
        let ctx = test_context();
        assert_eq!(
            cmd_custom_add(&ctx, draft("Be terse.")).unwrap(),
            "Saved custom pattern custom-cli\n"
        );
        let listing = cmd_custom_list(&ctx, OutputFormat::Table).unwrap();
        assert!(listing.contains("custom-cli"));
        cmd_custom_remove(&ctx, "custom-cli").unwrap();
        assert_eq!(
            cmd_custom_list(&ctx, OutputFormat::Table).unwrap(),
            "No custom patterns.\n"
        );
    }

    #[test]
    fn test_add_invalid_draft() {
        let ctx = test_context();
        assert!(cmd_custom_add(&ctx, draft("  ")).is_err());
    }

    #[test]
    fn test_message_reports_bad_json() {
        let ctx = test_context();
        let out = cmd_message(&ctx, "{not json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["success"], serde_json::json!(false));
    }

    #[test]
    fn test_toggle_site_lowercases() {
        let ctx = test_context();
        assert_eq!(
            cmd_toggle_site(&ctx, "Chat.Example.com", true).unwrap(),
            "chat.example.com disabled\n"
        );
        assert_eq!(
            ctx.handler().service().disabled_sites().unwrap(),
            vec!["chat.example.com".to_string()]
        );
    }

    #[test]
    fn test_shortcut_toggle() {
        let ctx = test_context();
        let out = cmd_shortcut(&ctx, "toggle_extension").unwrap();
        assert!(out.contains("\"enabled\": false"));
        assert!(!ctx.handler().service().extension_enabled().unwrap());
    }
}
