//! Component contract.
//!
//! Every participant exposes the same capability set: it accepts a mediator
//! binding at registration, may implement any of the effect methods, and can
//! notify the mediator about its own events through `trigger_event`.
//! Effect methods the component does not implement fail with
//! `UnsupportedEffect`; dispatch is by registered name, not by type.

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::debug;

use crate::dom::Document;
use crate::error::PageError;
use crate::events::{Event, EventKind, PageEvent, Payload};

pub type PageEventSender = mpsc::UnboundedSender<PageEvent>;
pub type PageEventReceiver = mpsc::UnboundedReceiver<PageEvent>;

/// Cloneable back-reference to the mediator.
///
/// Notifications are queued on the page inbox and dispatched once the
/// current dispatch has finished, so a component can notify from inside an
/// effect method without re-entering the mediator.
#[derive(Debug, Clone)]
pub struct MediatorHandle {
    tx: PageEventSender,
}

impl MediatorHandle {
    pub fn new(tx: PageEventSender) -> Self {
        Self { tx }
    }

    /// Queues an event for dispatch. Returns false if the page is gone.
    pub fn notify(&self, event: Event) -> bool {
        let kind = event.kind.clone();
        if self.tx.send(PageEvent::Notify(event)).is_ok() {
            true
        } else {
            debug!(%kind, "page closed; dropping notification");
            false
        }
    }
}

/// What a component learns when it is registered.
#[derive(Debug, Clone)]
pub struct MediatorBinding {
    /// Name the component is registered under
    pub name: String,
    pub mediator: MediatorHandle,
}

pub trait Component: Send {
    /// Type label used in error messages when the component is unbound.
    fn kind(&self) -> &'static str;

    /// Stores the mediator back-reference. Called by `Mediator::register`.
    fn bind(&mut self, binding: MediatorBinding);

    fn binding(&self) -> Option<&MediatorBinding>;

    /// Name for error messages: registered name, else the type label.
    fn label(&self) -> &str {
        self.binding().map_or(self.kind(), |b| b.name.as_str())
    }

    /// Shows a user-facing message.
    fn display_msg(&mut self, _doc: &mut Document, _message: &str) -> Result<(), PageError> {
        Err(PageError::unsupported(self.label(), "display_msg"))
    }

    /// Refreshes the component from an event payload.
    fn update(&mut self, _doc: &mut Document, _payload: &Payload) -> Result<(), PageError> {
        Err(PageError::unsupported(self.label(), "update"))
    }

    /// The component's primary control was used (button click).
    fn activate(&mut self, _doc: &mut Document) -> Result<(), PageError> {
        Err(PageError::unsupported(self.label(), "activate"))
    }

    /// Timer hook; called by `Page::tick`.
    fn on_tick(&mut self, _doc: &mut Document, _now: Instant) {}

    /// Notifies the mediator with this component as sender.
    ///
    /// Does nothing until the component has been registered.
    fn trigger_event(&self, kind: EventKind, payload: Payload) {
        if let Some(binding) = self.binding() {
            let event = Event::new(kind, payload).from_sender(binding.name.clone());
            binding.mediator.notify(event);
        }
    }
}
