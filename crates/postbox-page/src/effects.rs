//! Effect types.
//!
//! An effect is one step of a dispatch: a single component method
//! invocation, a redirect, or a hand-off to the page runtime. The mediator
//! maps each event to an ordered `Vec<Effect>` and applies them in order.

use crate::events::Payload;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// `target.display_msg(message)`.
    DisplayMessage {
        target: &'static str,
        message: &'static str,
    },

    /// `target.update(payload)`.
    UpdateDashboard {
        target: &'static str,
        payload: Payload,
    },

    /// Redirect the page.
    Navigate { to: &'static str },

    /// Hand the attempt to the login workflow (run by the page runtime).
    ForwardToAuth { payload: Payload },
}

impl Effect {
    /// Registered component this effect resolves, if any.
    pub fn target(&self) -> Option<&'static str> {
        match self {
            Effect::DisplayMessage { target, .. } | Effect::UpdateDashboard { target, .. } => {
                Some(target)
            }
            Effect::Navigate { .. } | Effect::ForwardToAuth { .. } => None,
        }
    }
}
