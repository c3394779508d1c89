//! Async workflows.
//!
//! A workflow is one user action that needs the server: a lookup followed by
//! a form submission, a mark-read call, a login. The network part runs as a
//! spawned task and only produces a [`WorkflowOutcome`]; the page applies the
//! outcome to the document when it drains its inbox.
//!
//! ## Pure Async Pattern
//!
//! ```ignore
//! // Workflow: pure async, returns an outcome
//! pub async fn logout(api: ApiClient) -> WorkflowOutcome { ... }
//!
//! // Page: spawns it and receives WorkflowCompleted on the inbox
//! self.spawn_workflow(WorkflowKind::Logout, auth::logout(api));
//! ```

pub mod auth;
pub mod mark_read;
pub mod send_message;

use std::fmt;
use std::time::Duration;

use postbox_core::api::ApiResult;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::dom::Document;
use crate::error::PageError;
use crate::events::Event;
use crate::task::TaskId;

pub use send_message::{MessageDraft, SendFailure, SendMessageState, SendMessageWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    SendMessage,
    MarkRead,
    Login,
    Register,
    Logout,
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowKind::SendMessage => "send_message",
            WorkflowKind::MarkRead => "mark_read",
            WorkflowKind::Login => "login",
            WorkflowKind::Register => "register",
            WorkflowKind::Logout => "logout",
        };
        f.write_str(name)
    }
}

/// Why a workflow stopped before finishing. Terminal; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Cancelled,
    TimedOut(Duration),
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interruption::Cancelled => write!(f, "cancelled"),
            Interruption::TimedOut(limit) => write!(f, "timed out after {}ms", limit.as_millis()),
        }
    }
}

/// What the network part of a workflow came back with.
#[derive(Debug)]
pub enum WorkflowOutcome {
    /// The send-message state machine after the lookup step.
    SendMessage(SendMessageWorkflow),
    MarkRead {
        message_id: String,
        element_id: String,
        result: ApiResult<()>,
    },
    Login {
        email: String,
        result: ApiResult<Option<serde_json::Value>>,
    },
    Register(ApiResult<()>),
    /// HTTP status of the logout request.
    Logout(ApiResult<u16>),
}

impl WorkflowOutcome {
    /// Applies the outcome to the document.
    ///
    /// Returns the event to dispatch, for workflows that end in a
    /// notification.
    pub fn apply(self, doc: &mut Document) -> Result<Option<Event>, PageError> {
        match self {
            WorkflowOutcome::SendMessage(mut workflow) => {
                workflow.finish(doc)?;
                Ok(None)
            }
            WorkflowOutcome::MarkRead {
                message_id,
                element_id,
                result,
            } => {
                mark_read::apply(doc, &message_id, &element_id, result);
                Ok(None)
            }
            WorkflowOutcome::Login { email, result } => Ok(Some(auth::login_event(email, result))),
            WorkflowOutcome::Register(result) => Ok(Some(auth::registration_event(result))),
            WorkflowOutcome::Logout(result) => Ok(auth::logout_event(result)),
        }
    }
}

/// Inbox message for a finished (or interrupted) workflow.
#[derive(Debug)]
pub struct WorkflowCompleted {
    pub id: TaskId,
    pub kind: WorkflowKind,
    pub result: Result<WorkflowOutcome, Interruption>,
}

/// Handle to a spawned workflow.
///
/// Dropping it does not stop the workflow. Joining waits for the task; its
/// outcome is still delivered through the page inbox.
#[derive(Debug)]
pub struct WorkflowHandle {
    id: TaskId,
    kind: WorkflowKind,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl WorkflowHandle {
    pub(crate) fn new(
        id: TaskId,
        kind: WorkflowKind,
        cancel: CancellationToken,
        join: JoinHandle<()>,
    ) -> Self {
        Self {
            id,
            kind,
            cancel,
            join,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    /// Requests cancellation. The workflow reports `Interruption::Cancelled`
    /// unless it already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub async fn join(self) -> Result<(), JoinError> {
        self.join.await
    }
}

/// Runs `fut`, racing it against cancellation and an optional time limit.
pub(crate) async fn run_bounded<F>(
    fut: F,
    cancel: CancellationToken,
    timeout: Option<Duration>,
) -> Result<F::Output, Interruption>
where
    F: Future,
{
    let bounded = async move {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_elapsed| Interruption::TimedOut(limit)),
            None => Ok(fut.await),
        }
    };

    tokio::select! {
        () = cancel.cancelled() => Err(Interruption::Cancelled),
        result = bounded => result,
    }
}
