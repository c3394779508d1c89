//! Mediator dispatcher.
//!
//! `effects_for` is the event table: a pure mapping from an event to the
//! ordered effects it causes. `Mediator::notify` resolves each effect's
//! target by name at dispatch time and applies the effects strictly in
//! order. The mediator keeps no per-event state; repeated events are applied
//! every time.

use std::time::Instant;

use postbox_core::config::WiringPolicy;
use tracing::{debug, error};

use crate::component::{Component, MediatorBinding, MediatorHandle};
use crate::dom::Document;
use crate::effects::Effect;
use crate::error::PageError;
use crate::events::{Event, EventKind, Payload};
use crate::registry::{Registry, names};

/// User-facing notification texts.
pub mod messages {
    pub const WELCOME_BACK: &str = "Welcome back!";
    pub const LOGIN_FAILED: &str = "Login failed! Please check your credentials.";
    pub const LOGGED_OUT: &str = "Logged out successfully.";
    pub const REGISTRATION_SUCCEEDED: &str = "Registration successful! Please log in.";
    pub const REGISTRATION_FAILED: &str = "Registration failed! Email already registered.";
}

/// Redirect targets.
pub mod routes {
    pub const DASHBOARD: &str = "/dashboard";
    pub const LOGIN: &str = "/login";
}

/// The event table.
pub fn effects_for(kind: &EventKind, payload: &Payload) -> Vec<Effect> {
    let notify = |message| Effect::DisplayMessage {
        target: names::NOTIFICATION_PANEL,
        message,
    };

    match kind {
        EventKind::LoginAttempt => vec![Effect::ForwardToAuth {
            payload: payload.clone(),
        }],
        EventKind::LoginSuccess => vec![
            notify(messages::WELCOME_BACK),
            Effect::UpdateDashboard {
                target: names::DASHBOARD,
                payload: payload.clone(),
            },
            Effect::Navigate {
                to: routes::DASHBOARD,
            },
        ],
        EventKind::LoginFailure => vec![notify(messages::LOGIN_FAILED)],
        EventKind::Logout => vec![
            notify(messages::LOGGED_OUT),
            Effect::Navigate { to: routes::LOGIN },
        ],
        EventKind::RegistrationSuccess => vec![
            notify(messages::REGISTRATION_SUCCEEDED),
            Effect::Navigate { to: routes::LOGIN },
        ],
        EventKind::RegistrationFailure => vec![notify(messages::REGISTRATION_FAILED)],
        EventKind::Unrecognized(_) => Vec::new(),
    }
}

/// Central dispatcher. Owns the registry; one instance per page session.
#[derive(Debug)]
pub struct Mediator {
    registry: Registry,
    handle: MediatorHandle,
    policy: WiringPolicy,
}

impl Mediator {
    /// `handle` is what registered components receive as their back-reference.
    pub fn new(handle: MediatorHandle, policy: WiringPolicy) -> Self {
        Self {
            registry: Registry::new(),
            handle,
            policy,
        }
    }

    pub fn handle(&self) -> &MediatorHandle {
        &self.handle
    }

    pub fn policy(&self) -> WiringPolicy {
        self.policy
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Binds `component` under `name` and gives it the mediator handle.
    ///
    /// Re-registering a name replaces the previous component (returned).
    pub fn register(
        &mut self,
        name: &str,
        mut component: Box<dyn Component>,
    ) -> Option<Box<dyn Component>> {
        component.bind(MediatorBinding {
            name: name.to_string(),
            mediator: self.handle.clone(),
        });
        let previous = self.registry.register(name, component);
        if let Some(previous) = &previous {
            debug!(name, replaced = previous.kind(), "component re-registered");
        }
        previous
    }

    pub fn component(&self, name: &str) -> Result<&dyn Component, PageError> {
        self.registry.resolve(name)
    }

    pub fn component_mut(&mut self, name: &str) -> Result<&mut dyn Component, PageError> {
        self.registry.resolve_mut(name)
    }

    /// Dispatches one event and returns the effects that were applied.
    ///
    /// Under `WiringPolicy::Strict` the first failing effect aborts the
    /// dispatch; later effects are not applied. Under `Lenient` the failure
    /// is logged and the remaining effects still run.
    pub fn notify(&mut self, doc: &mut Document, event: &Event) -> Result<Vec<Effect>, PageError> {
        let effects = effects_for(&event.kind, &event.payload);
        debug!(
            kind = %event.kind,
            sender = event.sender.as_deref().unwrap_or("-"),
            effects = effects.len(),
            "dispatch"
        );

        let mut applied = Vec::with_capacity(effects.len());
        for effect in effects {
            match self.apply(doc, &effect) {
                Ok(()) => applied.push(effect),
                Err(err) if self.policy.is_strict() => {
                    error!(kind = %event.kind, %err, "dispatch aborted");
                    return Err(err);
                }
                Err(err) => {
                    error!(
                        kind = %event.kind,
                        component = effect.target().unwrap_or("-"),
                        %err,
                        "effect skipped"
                    );
                }
            }
        }
        Ok(applied)
    }

    fn apply(&mut self, doc: &mut Document, effect: &Effect) -> Result<(), PageError> {
        match effect {
            Effect::DisplayMessage { target, message } => {
                self.registry.resolve_mut(target)?.display_msg(doc, message)
            }
            Effect::UpdateDashboard { target, payload } => {
                self.registry.resolve_mut(target)?.update(doc, payload)
            }
            Effect::Navigate { to } => {
                doc.navigate(*to);
                Ok(())
            }
            // Started by the page runtime once the dispatch returns.
            Effect::ForwardToAuth { .. } => Ok(()),
        }
    }

    /// Forwards a timer tick to every registered component.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        for component in self.registry.components_mut() {
            component.on_tick(doc, now);
        }
    }
}
