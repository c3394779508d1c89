//! Recording component for dispatch tests.

use std::sync::{Arc, Mutex};

use crate::component::{Component, MediatorBinding};
use crate::dom::Document;
use crate::error::PageError;
use crate::events::Payload;

/// Shared call log: one line per effect method call.
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

/// Records `display_msg`/`update` calls together with the page location at
/// call time, so tests can check ordering against navigation.
pub(crate) struct Recorder {
    tag: &'static str,
    log: CallLog,
    binding: Option<MediatorBinding>,
}

impl Recorder {
    pub(crate) fn new(tag: &'static str, log: &CallLog) -> Self {
        Self {
            tag,
            log: Arc::clone(log),
            binding: None,
        }
    }

    fn record(&self, line: String) {
        self.log.lock().unwrap().push(line);
    }
}

impl Component for Recorder {
    fn kind(&self) -> &'static str {
        "Recorder"
    }

    fn bind(&mut self, binding: MediatorBinding) {
        self.binding = Some(binding);
    }

    fn binding(&self) -> Option<&MediatorBinding> {
        self.binding.as_ref()
    }

    fn display_msg(&mut self, doc: &mut Document, message: &str) -> Result<(), PageError> {
        self.record(format!("{}.display_msg({message}) @ {}", self.tag, doc.location()));
        Ok(())
    }

    fn update(&mut self, doc: &mut Document, payload: &Payload) -> Result<(), PageError> {
        self.record(format!("{}.update({payload}) @ {}", self.tag, doc.location()));
        Ok(())
    }
}

pub(crate) fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn lines(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
