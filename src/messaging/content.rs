//! Page-side message handlers.

use super::envelope::{Request, Response};
use crate::augment::AugmentSession;
use crate::host::HostPage;
use crate::Error;
use serde_json::Value;
use tracing::{debug, instrument};

/// Dispatches a request addressed to the page into the session.
///
/// Every handler is idempotent. Background actions are rejected with a
/// failure response.
#[instrument(skip(session, page), fields(action = %request.action()))]
pub fn handle_content(
    session: &mut AugmentSession,
    page: &mut dyn HostPage,
    request: &Request,
) -> Response {
    match request {
        Request::ShowPromptPicker => {
            let shown = session.show_picker(page);
            debug!(shown, "picker requested");
            Response::ok()
        },
        Request::InsertPrompt { pattern } => {
            let inserted = session.insert_pattern(page, pattern);
            debug!(inserted, pattern = %pattern.id, "insert requested");
            Response::ok()
        },
        Request::ToggleSite { disabled } => {
            session.set_site_disabled(page, *disabled);
            Response::ok()
        },
        Request::ToggleExtension { enabled } => {
            session.set_extension_enabled(page, *enabled);
            Response::ok()
        },
        Request::GetPatterns
        | Request::SaveCustomPattern { .. }
        | Request::DeleteCustomPattern { .. } => Response::failure(&Error::InvalidInput(format!(
            "{} is handled by the background context",
            request.action()
        ))),
    }
}

/// Parses a raw envelope and dispatches it, answering parse errors in-band.
pub fn handle_content_value(
    session: &mut AugmentSession,
    page: &mut dyn HostPage,
    value: Value,
) -> Value {
    let response = match Request::from_value(value) {
        Ok(request) => handle_content(session, page, &request),
        Err(e) => Response::failure(&e),
    };
    response.to_value()
}
