//! Request and response envelopes.
//!
//! Requests are JSON objects tagged by `action`:
//!
//! ```json
//! { "action": "toggleSite", "disabled": true }
//! ```
//!
//! Responses always carry `success`, plus `error` on failure and whatever
//! payload the action returns:
//!
//! ```json
//! { "success": false, "error": "invalid input: unknown action: frobnicate" }
//! ```

use super::action::Action;
use crate::models::{Pattern, PatternDraft};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// List built-in and custom patterns.
    GetPatterns,
    /// Upsert a custom pattern.
    SaveCustomPattern {
        /// Pattern to save.
        pattern: PatternDraft,
    },
    /// Delete a custom pattern.
    DeleteCustomPattern {
        /// Id of the pattern to delete.
        #[serde(rename = "patternId", alias = "id")]
        pattern_id: String,
    },
    /// Open the picker.
    ShowPromptPicker,
    /// Append a pattern to the focused field.
    InsertPrompt {
        /// Pattern to insert.
        pattern: Pattern,
    },
    /// Per-site switch.
    ToggleSite {
        /// New state.
        disabled: bool,
    },
    /// Global switch.
    ToggleExtension {
        /// New state.
        enabled: bool,
    },
}

impl Request {
    /// Action of this request.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::GetPatterns => Action::GetPatterns,
            Self::SaveCustomPattern { .. } => Action::SaveCustomPattern,
            Self::DeleteCustomPattern { .. } => Action::DeleteCustomPattern,
            Self::ShowPromptPicker => Action::ShowPromptPicker,
            Self::InsertPrompt { .. } => Action::InsertPrompt,
            Self::ToggleSite { .. } => Action::ToggleSite,
            Self::ToggleExtension { .. } => Action::ToggleExtension,
        }
    }

    /// Parses an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `action` is missing or unknown, or
    /// the payload does not fit the action.
    pub fn from_value(value: Value) -> Result<Self> {
        let action = value
            .get("action")
            .and_then(Value::as_str)
            .map(Action::from)
            .ok_or_else(|| Error::InvalidInput("missing action".to_string()))?;
        if !action.is_known() {
            return Err(Error::InvalidInput(format!("unknown action: {action}")));
        }
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidInput(format!("malformed {action} request: {e}")))
    }

    /// Parses an envelope from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for invalid JSON or envelopes.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }
}

/// Acknowledgement sent back to the requesting context.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Whether the request succeeded.
    pub success: bool,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Built-in patterns (`getPatterns`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<Pattern>>,
    /// Custom patterns (`getPatterns`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_patterns: Option<Vec<Pattern>>,
    /// Saved pattern (`saveCustomPattern`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

impl Response {
    /// A bare success.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// A failure carrying the error's message.
    #[must_use]
    pub fn failure(error: &Error) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// A pattern listing.
    #[must_use]
    pub fn listing(patterns: Vec<Pattern>, custom_patterns: Vec<Pattern>) -> Self {
        Self {
            success: true,
            patterns: Some(patterns),
            custom_patterns: Some(custom_patterns),
            ..Self::default()
        }
    }

    /// A saved pattern.
    #[must_use]
    pub fn saved(pattern: Pattern) -> Self {
        Self {
            success: true,
            pattern: Some(pattern),
            ..Self::default()
        }
    }

    /// Serializes the response, falling back to a failure envelope.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "success": false, "error": e.to_string() })
        })
    }
}

impl From<Result<Self>> for Response {
    fn from(result: Result<Self>) -> Self {
        result.unwrap_or_else(|e| Self::failure(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_toggle_site() {
        let request = Request::from_value(json!({"action": "toggleSite", "disabled": true})).unwrap();
        assert_eq!(request, Request::ToggleSite { disabled: true });
        assert_eq!(request.action(), Action::ToggleSite);
    }

    #[test]
    fn test_parse_delete_accepts_pattern_id() {
        let request =
            Request::from_json(r#"{"action":"deleteCustomPattern","patternId":"custom-1"}"#).unwrap();
        assert_eq!(
            request,
            Request::DeleteCustomPattern {
                pattern_id: "custom-1".to_string()
            }
        );
    }

    #[test]
    fn test_missing_and_unknown_action() {
        let err = Request::from_value(json!({"disabled": true})).unwrap_err();
        assert_eq!(err.to_string(), "invalid input: missing action");

        let err = Request::from_value(json!({"action": "frobnicate"})).unwrap_err();
        assert_eq!(err.to_string(), "invalid input: unknown action: frobnicate");
    }

    #[test]
    fn test_malformed_payload() {
        let err = Request::from_value(json!({"action": "toggleExtension"})).unwrap_err();
        assert!(err.to_string().contains("malformed toggleExtension request"));
    }

    #[test]
    fn test_request_serializes_with_action_tag() {
        let value = serde_json::to_value(Request::ShowPromptPicker).unwrap();
        assert_eq!(value, json!({"action": "showPromptPicker"}));
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(Response::ok().to_value(), json!({"success": true}));
        let failure = Response::failure(&Error::StoreUnavailable("quota exceeded".to_string()));
        assert_eq!(
            failure.to_value(),
            json!({"success": false, "error": "store unavailable: quota exceeded"})
        );
        let listing = Response::listing(Vec::new(), Vec::new()).to_value();
        assert_eq!(listing["customPatterns"], json!([]));
    }
}
