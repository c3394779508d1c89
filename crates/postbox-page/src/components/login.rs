use serde_json::Value;

use crate::component::{Component, MediatorBinding};
use crate::dom::{Document, ids};
use crate::error::PageError;
use crate::events::EventKind;

/// Payload the login control sends with `loginAttempt`.
pub const LOGIN_ATTEMPT_PAYLOAD: &str = "Logging in";

/// Login control. Clicking it notifies `loginAttempt`; the mediator hands
/// the attempt to the login workflow.
#[derive(Debug, Default)]
pub struct LoginForm {
    binding: Option<MediatorBinding>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for LoginForm {
    fn kind(&self) -> &'static str {
        "LoginForm"
    }

    fn bind(&mut self, binding: MediatorBinding) {
        self.binding = Some(binding);
    }

    fn binding(&self) -> Option<&MediatorBinding> {
        self.binding.as_ref()
    }

    fn activate(&mut self, doc: &mut Document) -> Result<(), PageError> {
        // No button, no click.
        doc.get(ids::LOGIN_BUTTON)
            .ok_or_else(|| PageError::missing_element(ids::LOGIN_BUTTON))?;
        self.trigger_event(
            EventKind::LoginAttempt,
            Value::String(LOGIN_ATTEMPT_PAYLOAD.to_string()),
        );
        Ok(())
    }
}
