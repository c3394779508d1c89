//! Send-message workflow.
//!
//! ```text
//! Idle ──start──► ResolvingUser ──resolve──► Submitting ──finish──► Done(Ok(action))
//!   │                   │
//!   └─► Done(Err(Validation))  └─► Done(Err(UserNotFound | LookupFault))
//! ```
//!
//! `start` runs synchronously on the click, `resolve` is the only network
//! step, and `finish` points the message form at `/send_message/{id}` and
//! submits it.

use std::fmt;

use postbox_core::api::ApiClient;
use tracing::{debug, error, warn};

use crate::dom::{Document, fields, ids};
use crate::error::PageError;

pub const VALIDATION_ALERT: &str = "Please enter both the username and message.";
pub const USER_NOT_FOUND_ALERT: &str = "User not found";
pub const INVALID_USERNAME_ALERT: &str = "Invalid username.";

/// Form action for a resolved recipient.
pub fn send_action(user_id: &str) -> String {
    format!("/send_message/{user_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendFailure {
    /// Recipient or message was empty.
    Validation,
    /// The lookup answered with a non-success status.
    UserNotFound { status: u16 },
    /// The lookup failed without a usable answer (network, bad body).
    LookupFault(String),
}

impl SendFailure {
    /// Alerts shown to the user, in order.
    pub fn alerts(&self) -> &'static [&'static str] {
        match self {
            SendFailure::Validation => &[VALIDATION_ALERT],
            SendFailure::UserNotFound { .. } => &[USER_NOT_FOUND_ALERT, INVALID_USERNAME_ALERT],
            SendFailure::LookupFault(_) => &[INVALID_USERNAME_ALERT],
        }
    }
}

impl fmt::Display for SendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendFailure::Validation => write!(f, "recipient and message are required"),
            SendFailure::UserNotFound { status } => {
                write!(f, "recipient not found (HTTP {status})")
            }
            SendFailure::LookupFault(message) => write!(f, "recipient lookup failed: {message}"),
        }
    }
}

impl std::error::Error for SendFailure {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageState {
    Idle,
    ResolvingUser,
    Submitting { user_id: String },
    /// `Ok` carries the form action that was submitted.
    Done(Result<String, SendFailure>),
}

/// The user's input, read from the send-message form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub receiver_name: String,
    pub message: String,
}

impl MessageDraft {
    pub fn new(receiver_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            receiver_name: receiver_name.into(),
            message: message.into(),
        }
    }

    pub fn from_document(doc: &Document) -> Result<Self, PageError> {
        Ok(Self::new(
            doc.field_value(fields::RECEIVER_NAME)?,
            doc.field_value(fields::MESSAGE)?,
        ))
    }

    /// Both inputs must be non-empty. Whitespace counts as input.
    pub fn validate(&self) -> Result<(), SendFailure> {
        if self.receiver_name.is_empty() || self.message.is_empty() {
            Err(SendFailure::Validation)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
pub struct SendMessageWorkflow {
    draft: MessageDraft,
    state: SendMessageState,
}

impl SendMessageWorkflow {
    pub fn new(draft: MessageDraft) -> Self {
        Self {
            draft,
            state: SendMessageState::Idle,
        }
    }

    pub fn state(&self) -> &SendMessageState {
        &self.state
    }

    /// `Idle -> ResolvingUser`, or straight to `Done` when validation fails.
    ///
    /// Returns true if there is a lookup to run.
    pub fn start(&mut self) -> bool {
        if self.state != SendMessageState::Idle {
            return false;
        }
        match self.draft.validate() {
            Ok(()) => {
                self.state = SendMessageState::ResolvingUser;
                true
            }
            Err(failure) => {
                debug!(%failure, "send message rejected");
                self.state = SendMessageState::Done(Err(failure));
                false
            }
        }
    }

    /// `ResolvingUser -> Submitting | Done(Err)`. One lookup, no retry.
    pub async fn resolve(mut self, api: &ApiClient) -> Self {
        if self.state != SendMessageState::ResolvingUser {
            return self;
        }

        let receiver = self.draft.receiver_name.as_str();
        self.state = match api.get_user_id(receiver).await {
            Ok(user_id) => {
                debug!(receiver, %user_id, "recipient resolved");
                SendMessageState::Submitting { user_id }
            }
            Err(err) if err.is_http_status() => {
                warn!(receiver, status = ?err.status, "recipient not found");
                SendMessageState::Done(Err(SendFailure::UserNotFound {
                    status: err.status.unwrap_or_default(),
                }))
            }
            Err(err) => {
                error!(receiver, kind = %err.kind, "recipient lookup failed: {err}");
                SendMessageState::Done(Err(SendFailure::LookupFault(err.message)))
            }
        };
        self
    }

    /// Applies the resolved state to the page.
    ///
    /// `Submitting` sets the form action and submits the form; a failed
    /// `Done` raises its alerts.
    pub fn finish(&mut self, doc: &mut Document) -> Result<(), PageError> {
        match &self.state {
            SendMessageState::Submitting { user_id } => {
                let action = send_action(user_id);
                doc.get_mut(ids::SEND_MESSAGE_FORM)?.action = Some(action.clone());
                doc.submit_form(ids::SEND_MESSAGE_FORM)?;
                self.state = SendMessageState::Done(Ok(action));
            }
            SendMessageState::Done(Err(failure)) => {
                for alert in failure.alerts() {
                    doc.alert(*alert);
                }
            }
            SendMessageState::Idle
            | SendMessageState::ResolvingUser
            | SendMessageState::Done(Ok(_)) => {}
        }
        Ok(())
    }
}

/// Network step, as spawned by the page.
pub async fn run(workflow: SendMessageWorkflow, api: ApiClient) -> super::WorkflowOutcome {
    super::WorkflowOutcome::SendMessage(workflow.resolve(&api).await)
}
