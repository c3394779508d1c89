use serde_json::Value;

use crate::component::{Component, MediatorBinding};
use crate::dom::{Document, ids};
use crate::error::PageError;
use crate::events::Payload;

/// Dashboard region refreshed after a successful login.
#[derive(Debug, Default)]
pub struct Dashboard {
    binding: Option<MediatorBinding>,
    last_payload: Option<Payload>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload of the most recent `update`.
    pub fn last_payload(&self) -> Option<&Payload> {
        self.last_payload.as_ref()
    }
}

/// Text shown for a payload: strings verbatim, `null` as nothing, anything
/// else as compact JSON.
fn render_payload(payload: &Payload) -> String {
    match payload {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Component for Dashboard {
    fn kind(&self) -> &'static str {
        "Dashboard"
    }

    fn bind(&mut self, binding: MediatorBinding) {
        self.binding = Some(binding);
    }

    fn binding(&self) -> Option<&MediatorBinding> {
        self.binding.as_ref()
    }

    fn update(&mut self, doc: &mut Document, payload: &Payload) -> Result<(), PageError> {
        doc.get_mut(ids::DASHBOARD)?.text = render_payload(payload);
        self.last_payload = Some(payload.clone());
        Ok(())
    }
}
