//! Mark-message-read workflow: one request, then a local class change.
//!
//! Failures are logged only. Read state is not worth an alert.

use postbox_core::api::{ApiClient, ApiResult};
use tracing::{debug, warn};

use super::WorkflowOutcome;
use crate::dom::{Document, UNREAD_CLASS};

pub async fn run(api: ApiClient, message_id: String, element_id: String) -> WorkflowOutcome {
    let result = api.mark_read(&message_id).await;
    WorkflowOutcome::MarkRead {
        message_id,
        element_id,
        result,
    }
}

pub(crate) fn apply(doc: &mut Document, message_id: &str, element_id: &str, result: ApiResult<()>) {
    if let Err(err) = result {
        warn!(message_id, status = ?err.status, "failed to mark message as read: {err}");
        return;
    }
    match doc.get_mut(element_id) {
        Ok(element) => {
            element.remove_class(UNREAD_CLASS);
            debug!(message_id, element_id, "message marked read");
        }
        Err(err) => warn!(message_id, "marked read but {err}"),
    }
}
