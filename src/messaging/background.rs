//! Background-side message handlers and shortcut forwarding.

use super::action::Shortcut;
use super::envelope::{Request, Response};
use crate::catalog::BuiltinCatalog;
use crate::services::CustomPatternService;
use crate::{Error, Result};
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Handles storage-backed requests from the popup and options page.
pub struct BackgroundHandler {
    catalog: BuiltinCatalog,
    service: CustomPatternService,
}

impl BackgroundHandler {
    /// Creates a handler over a catalog and the custom pattern service.
    #[must_use]
    pub const fn new(catalog: BuiltinCatalog, service: CustomPatternService) -> Self {
        Self { catalog, service }
    }

    /// The built-in catalog.
    #[must_use]
    pub const fn catalog(&self) -> &BuiltinCatalog {
        &self.catalog
    }

    /// The custom pattern service.
    #[must_use]
    pub const fn service(&self) -> &CustomPatternService {
        &self.service
    }

    /// Handles one request. Errors become failure responses.
    #[instrument(skip(self), fields(action = %request.action()))]
    pub fn handle(&self, request: &Request) -> Response {
        let response = Response::from(self.dispatch(request));
        if let Some(error) = &response.error {
            warn!(%error, "request failed");
        }
        response
    }

    /// Parses a raw envelope and handles it.
    pub fn handle_value(&self, value: Value) -> Value {
        let response = match Request::from_value(value) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                warn!(error = %e, "rejected envelope");
                Response::failure(&e)
            },
        };
        response.to_value()
    }

    fn dispatch(&self, request: &Request) -> Result<Response> {
        match request {
            Request::GetPatterns => Ok(Response::listing(
                self.catalog.patterns().to_vec(),
                self.service.list()?,
            )),
            Request::SaveCustomPattern { pattern } => {
                self.service.save(pattern.clone()).map(Response::saved)
            },
            Request::DeleteCustomPattern { pattern_id } => {
                self.service.delete(pattern_id)?;
                Ok(Response::ok())
            },
            Request::ShowPromptPicker
            | Request::InsertPrompt { .. }
            | Request::ToggleSite { .. }
            | Request::ToggleExtension { .. } => Err(Error::InvalidInput(format!(
                "{} is handled by the page",
                request.action()
            ))),
        }
    }

    /// Translates a keyboard shortcut into the message for the active page.
    ///
    /// `toggle_extension` persists the flipped switch first. Unknown commands
    /// yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted switch cannot be read or written.
    #[instrument(skip(self), fields(command = %shortcut))]
    pub fn on_shortcut(&self, shortcut: &Shortcut) -> Result<Option<Request>> {
        match shortcut {
            Shortcut::InsertPrompt => Ok(Some(Request::ShowPromptPicker)),
            Shortcut::ToggleExtension => {
                let enabled = !self.service.extension_enabled()?;
                self.service.set_extension_enabled(enabled)?;
                info!(enabled, "extension toggled from shortcut");
                Ok(Some(Request::ToggleExtension { enabled }))
            },
            Shortcut::Unknown(command) => {
                warn!(%command, "ignoring unknown shortcut");
                Ok(None)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Pattern, PatternDraft, PatternType};
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn handler() -> BackgroundHandler {
        let catalog = BuiltinCatalog::from_patterns(vec![Pattern::new(
            "ritual-rabbit",
            "Go down the rabbit hole",
            "Depth",
            PatternType::Ritual,
        )])
        .unwrap();
        BackgroundHandler::new(catalog, CustomPatternService::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn test_get_patterns_lists_both_sets() {
        let handler = handler();
        let draft = PatternDraft {
            trigger: "Be terse".to_string(),
            purpose: "Brevity".to_string(),
            ..PatternDraft::default()
        };
        assert!(handler.handle(&Request::SaveCustomPattern { pattern: draft }).success);

        let response = handler.handle(&Request::GetPatterns);
        assert_eq!(response.patterns.unwrap().len(), 1);
        assert_eq!(response.custom_patterns.unwrap().len(), 1);
    }

    #[test]
    fn test_save_requires_trigger() {
        let response = handler().handle(&Request::SaveCustomPattern {
            pattern: PatternDraft::default(),
        });
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("invalid input: trigger and purpose are required")
        );
    }

    #[test]
    fn test_delete_unknown_succeeds() {
        let response = handler().handle_value(json!({
            "action": "deleteCustomPattern",
            "patternId": "custom-404"
        }));
        assert_eq!(response, json!({"success": true}));
    }

    #[test]
    fn test_page_action_rejected() {
        let response = handler().handle(&Request::ShowPromptPicker);
        assert!(!response.success);
    }

    #[test]
    fn test_shortcuts() {
        let handler = handler();
        assert_eq!(
            handler.on_shortcut(&Shortcut::InsertPrompt).unwrap(),
            Some(Request::ShowPromptPicker)
        );
        assert_eq!(
            handler.on_shortcut(&Shortcut::ToggleExtension).unwrap(),
            Some(Request::ToggleExtension { enabled: false })
        );
        assert_eq!(
            handler.on_shortcut(&Shortcut::ToggleExtension).unwrap(),
            Some(Request::ToggleExtension { enabled: true })
        );
        assert_eq!(handler.on_shortcut(&Shortcut::from("reload")).unwrap(), None);
    }
}
