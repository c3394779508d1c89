//! Login, registration and logout round trips.
//!
//! Each ends in a mediator notification; the page dispatches the returned
//! event after applying the outcome.

use postbox_core::api::{ApiClient, ApiResult};
use serde_json::Value;
use tracing::{error, warn};

use super::WorkflowOutcome;
use crate::events::{Event, EventKind};
use crate::registry::names;

pub async fn login(api: ApiClient, email: String, password: String) -> WorkflowOutcome {
    let result = api.login(&email, &password).await;
    WorkflowOutcome::Login { email, result }
}

pub async fn register(
    api: ApiClient,
    username: String,
    email: String,
    password: String,
) -> WorkflowOutcome {
    WorkflowOutcome::Register(api.register(&username, &email, &password).await)
}

pub async fn logout(api: ApiClient) -> WorkflowOutcome {
    WorkflowOutcome::Logout(api.logout().await)
}

/// `loginSuccess` with the server's JSON body (the email when there is
/// none), else `loginFailure`.
pub(crate) fn login_event(email: String, result: ApiResult<Option<Value>>) -> Event {
    let event = match result {
        Ok(body) => Event::new(
            EventKind::LoginSuccess,
            body.unwrap_or(Value::String(email)),
        ),
        Err(err) => {
            warn!(status = ?err.status, "login rejected: {err}");
            Event::system(EventKind::LoginFailure)
        }
    };
    event.from_sender(names::LOGIN)
}

pub(crate) fn registration_event(result: ApiResult<()>) -> Event {
    match result {
        Ok(()) => Event::system(EventKind::RegistrationSuccess),
        Err(err) => {
            warn!(status = ?err.status, "registration rejected: {err}");
            Event::system(EventKind::RegistrationFailure)
        }
    }
}

/// Any HTTP answer means the session is gone. A fault dispatches nothing.
pub(crate) fn logout_event(result: ApiResult<u16>) -> Option<Event> {
    match result {
        Ok(_) => Some(Event::system(EventKind::Logout)),
        Err(err) => {
            error!(kind = %err.kind, "logout request failed: {err}");
            None
        }
    }
}
