//! Page-side coordination for the postbox messaging client.
//!
//! Widgets never reference each other. They register with the [`Mediator`]
//! under a name, report what happened through [`Component::trigger_event`],
//! and the mediator turns each event into an ordered list of effects on
//! other registered components. Network round trips live in [`workflows`]
//! and report back through the page inbox.
//!
//! ```text
//! user action ──► Page ──► workflow task ──► inbox ──┐
//!      │                                             ▼
//!      └──► Component::trigger_event ──► inbox ──► Mediator::notify ──► effects
//! ```

pub mod component;
pub mod components;
pub mod dom;
pub mod effects;
pub mod error;
pub mod events;
pub mod mediator;
pub mod popups;
pub mod registry;
pub mod runtime;
pub mod task;
pub mod workflows;

pub use component::{Component, MediatorBinding, MediatorHandle};
pub use dom::Document;
pub use effects::Effect;
pub use error::PageError;
pub use events::{Event, EventKind, PageEvent, Payload};
pub use mediator::Mediator;
pub use registry::Registry;
pub use runtime::Page;
