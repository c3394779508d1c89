//! Event taxonomy and inbox event types.
//!
//! ## Event Kinds
//!
//! `EventKind` is the closed set the mediator knows how to dispatch, plus
//! `Unrecognized` for names it does not handle yet. Components may notify
//! about any name; the mediator ignores the unrecognized ones.
//!
//! ## Inbox Pattern
//!
//! Everything that re-enters the page after the current call stack unwinds
//! (component notifications, workflow results) arrives as a `PageEvent` on
//! the page inbox and is applied in arrival order.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::workflows::WorkflowCompleted;

/// Event payload. Absent payloads are `Value::Null`.
pub type Payload = Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    LoginAttempt,
    LoginSuccess,
    LoginFailure,
    Logout,
    RegistrationSuccess,
    RegistrationFailure,
    /// A name outside the taxonomy; dispatching it does nothing.
    Unrecognized(String),
}

impl EventKind {
    /// The wire name components use when notifying.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::LoginAttempt => "loginAttempt",
            EventKind::LoginSuccess => "loginSuccess",
            EventKind::LoginFailure => "loginFailure",
            EventKind::Logout => "logout",
            EventKind::RegistrationSuccess => "registrationSuccess",
            EventKind::RegistrationFailure => "registrationFailure",
            EventKind::Unrecognized(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventKind::Unrecognized(_))
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        match name {
            "loginAttempt" => EventKind::LoginAttempt,
            "loginSuccess" => EventKind::LoginSuccess,
            "loginFailure" => EventKind::LoginFailure,
            "logout" => EventKind::Logout,
            "registrationSuccess" => EventKind::RegistrationSuccess,
            "registrationFailure" => EventKind::RegistrationFailure,
            other => EventKind::Unrecognized(other.to_string()),
        }
    }
}

impl FromStr for EventKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventKind::from(s))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification to the mediator.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Registered name of the notifying component; None for system events.
    pub sender: Option<String>,
    pub payload: Payload,
}

impl Event {
    pub fn new(kind: EventKind, payload: Payload) -> Self {
        Self {
            kind,
            sender: None,
            payload,
        }
    }

    /// A system-originated event without payload.
    pub fn system(kind: EventKind) -> Self {
        Self::new(kind, Payload::Null)
    }

    #[must_use]
    pub fn from_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Events delivered through the page inbox.
#[derive(Debug)]
pub enum PageEvent {
    /// A component called `trigger_event`.
    Notify(Event),
    /// A spawned workflow finished (or was interrupted).
    WorkflowCompleted(WorkflowCompleted),
}
