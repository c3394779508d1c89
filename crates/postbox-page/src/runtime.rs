//! Page runtime.
//!
//! One `Page` is one page session: the document, the mediator with its
//! registered components, the API client, and the inbox.
//!
//! ## Inbox Pattern
//!
//! - Components notify through their `MediatorHandle`, which queues on the inbox
//! - Workflows run as spawned tasks and send `WorkflowCompleted` to the inbox
//! - `drain` / `run_until_idle` apply inbox events in arrival order
//!
//! Only the page touches the document; spawned tasks never do.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use postbox_core::api::ApiClient;
use postbox_core::config::Config;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::component::{MediatorHandle, PageEventReceiver, PageEventSender};
use crate::components::{Dashboard, LoginForm, NotificationPanel};
use crate::dom::{Document, fields, ids};
use crate::effects::Effect;
use crate::error::PageError;
use crate::events::{Event, PageEvent};
use crate::mediator::Mediator;
use crate::registry::names;
use crate::task::{TaskId, TaskSeq};
use crate::workflows::{
    MessageDraft, SendMessageWorkflow, WorkflowCompleted, WorkflowHandle, WorkflowKind,
    SendFailure, WorkflowOutcome, auth, mark_read, run_bounded, send_message,
};

pub struct Page {
    document: Document,
    mediator: Mediator,
    api: ApiClient,
    /// Per-workflow time limit; None waits indefinitely.
    request_timeout: Option<Duration>,
    /// Inbox sender - handles and workflows send events here.
    inbox_tx: PageEventSender,
    /// Inbox receiver - drained by the page.
    inbox_rx: PageEventReceiver,
    tasks: TaskSeq,
    in_flight: HashMap<TaskId, WorkflowKind>,
}

impl Page {
    /// A messaging page with the standard components registered.
    pub fn new(config: &Config, api: ApiClient) -> Self {
        Self::with_document(config, api, Document::messaging_page())
    }

    pub fn with_document(config: &Config, api: ApiClient, document: Document) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let mut mediator = Mediator::new(MediatorHandle::new(inbox_tx.clone()), config.wiring);

        mediator.register(
            names::NOTIFICATION_PANEL,
            Box::new(NotificationPanel::new(config.notification_hide())),
        );
        mediator.register(names::DASHBOARD, Box::new(Dashboard::new()));
        mediator.register(names::LOGIN, Box::new(LoginForm::new()));

        Self {
            document,
            mediator,
            api,
            request_timeout: config.request_timeout(),
            inbox_tx,
            inbox_rx,
            tasks: TaskSeq::default(),
            in_flight: HashMap::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn mediator(&self) -> &Mediator {
        &self.mediator
    }

    pub fn mediator_mut(&mut self) -> &mut Mediator {
        &mut self.mediator
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn set_request_timeout(&mut self, timeout: Option<Duration>) {
        self.request_timeout = timeout;
    }

    /// Workflows spawned and not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Dispatches an event now and runs any runtime-side effects.
    pub fn notify(&mut self, event: Event) -> Result<Vec<Effect>, PageError> {
        let effects = self.mediator.notify(&mut self.document, &event)?;
        if effects
            .iter()
            .any(|effect| matches!(effect, Effect::ForwardToAuth { .. }))
        {
            self.start_login()?;
        }
        Ok(effects)
    }

    /// Forwards a timer tick to the components.
    pub fn tick(&mut self, now: Instant) {
        self.mediator.tick(&mut self.document, now);
    }

    /// Applies everything already queued on the inbox, including events
    /// queued while draining.
    pub fn drain(&mut self) -> Result<usize, PageError> {
        let mut processed = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.handle_page_event(event)?;
            processed += 1;
        }
        Ok(processed)
    }

    /// Drains until no workflow is in flight and the inbox is empty.
    pub async fn run_until_idle(&mut self) -> Result<(), PageError> {
        loop {
            self.drain()?;
            if self.in_flight.is_empty() {
                return Ok(());
            }
            match self.inbox_rx.recv().await {
                Some(event) => self.handle_page_event(event)?,
                None => return Ok(()),
            }
        }
    }

    fn handle_page_event(&mut self, event: PageEvent) -> Result<(), PageError> {
        match event {
            PageEvent::Notify(event) => {
                self.notify(event)?;
            }
            PageEvent::WorkflowCompleted(completed) => self.on_workflow_completed(completed)?,
        }
        Ok(())
    }

    fn on_workflow_completed(&mut self, completed: WorkflowCompleted) -> Result<(), PageError> {
        let WorkflowCompleted { id, kind, result } = completed;
        self.in_flight.remove(&id);

        match result {
            Ok(outcome) => {
                debug!(task = %id, %kind, "workflow completed");
                if let Some(event) = outcome.apply(&mut self.document)? {
                    self.notify(event)?;
                }
            }
            Err(interruption) => {
                warn!(task = %id, %kind, %interruption, "workflow interrupted");
                // An interrupted lookup alerts like a lookup fault; other kinds stay silent.
                if kind == WorkflowKind::SendMessage {
                    for alert in SendFailure::LookupFault(interruption.to_string()).alerts() {
                        self.document.alert(*alert);
                    }
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // User actions
    // ========================================================================

    /// Clicks the login control.
    pub fn click_login(&mut self) -> Result<(), PageError> {
        self.mediator
            .component_mut(names::LOGIN)?
            .activate(&mut self.document)
    }

    /// Clicks the logout control.
    pub fn click_logout(&mut self) -> Result<WorkflowHandle, PageError> {
        self.document
            .get(ids::LOGOUT_BUTTON)
            .ok_or_else(|| PageError::missing_element(ids::LOGOUT_BUTTON))?;
        let api = self.api.clone();
        Ok(self.spawn_workflow(WorkflowKind::Logout, auth::logout(api)))
    }

    pub fn submit_registration(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> WorkflowHandle {
        let api = self.api.clone();
        self.spawn_workflow(
            WorkflowKind::Register,
            auth::register(
                api,
                username.to_string(),
                email.to_string(),
                password.to_string(),
            ),
        )
    }

    /// Clicks send on the message form.
    ///
    /// Invalid input is alerted right away and nothing is spawned.
    pub fn submit_message(&mut self) -> Result<Option<WorkflowHandle>, PageError> {
        let draft = MessageDraft::from_document(&self.document)?;
        let mut workflow = SendMessageWorkflow::new(draft);
        if !workflow.start() {
            workflow.finish(&mut self.document)?;
            return Ok(None);
        }

        let api = self.api.clone();
        Ok(Some(self.spawn_workflow(
            WorkflowKind::SendMessage,
            send_message::run(workflow, api),
        )))
    }

    /// Marks a message read; `element_id` is its row in the document.
    pub fn mark_as_read(&mut self, message_id: &str, element_id: &str) -> WorkflowHandle {
        let api = self.api.clone();
        self.spawn_workflow(
            WorkflowKind::MarkRead,
            mark_read::run(api, message_id.to_string(), element_id.to_string()),
        )
    }

    fn start_login(&mut self) -> Result<WorkflowHandle, PageError> {
        let email = self.document.field_value(fields::EMAIL)?.to_string();
        let password = self.document.field_value(fields::PASSWORD)?.to_string();
        let api = self.api.clone();
        Ok(self.spawn_workflow(WorkflowKind::Login, auth::login(api, email, password)))
    }

    /// Spawns a workflow with a uniform completion event on the inbox.
    fn spawn_workflow<Fut>(&mut self, kind: WorkflowKind, fut: Fut) -> WorkflowHandle
    where
        Fut: Future<Output = WorkflowOutcome> + Send + 'static,
    {
        let id = self.tasks.next_id();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let timeout = self.request_timeout;
        let tx = self.inbox_tx.clone();

        self.in_flight.insert(id, kind);
        debug!(task = %id, %kind, "workflow started");

        let join = tokio::spawn(async move {
            let result = run_bounded(fut, token, timeout).await;
            let _ = tx.send(PageEvent::WorkflowCompleted(WorkflowCompleted {
                id,
                kind,
                result,
            }));
        });
        WorkflowHandle::new(id, kind, cancel, join)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use postbox_core::config::WiringPolicy;

    use crate::dom::Element;
    use crate::events::EventKind;

    fn offline_page(config: &Config) -> Page {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        Page::new(config, api)
    }

    #[test]
    fn test_standard_components_registered() {
        let page = offline_page(&Config::default());
        assert_eq!(
            page.mediator().registry().names(),
            vec![names::DASHBOARD, names::NOTIFICATION_PANEL, names::LOGIN]
        );
    }

    #[test]
    fn test_config_reaches_mediator_and_workflows() {
        let config = Config {
            wiring: WiringPolicy::Lenient,
            request_timeout_secs: 3,
            ..Config::default()
        };
        let page = offline_page(&config);
        assert_eq!(page.mediator().policy(), WiringPolicy::Lenient);
        assert_eq!(page.request_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(page.api().base_url().as_str(), "http://127.0.0.1:9/");
    }

    #[test]
    fn test_logout_requires_logout_control() {
        let mut page = offline_page(&Config::default());
        let mut doc = Document::new("/");
        doc.insert(Element::new(ids::LOGIN_BUTTON));
        *page.document_mut() = doc;

        let err = page.click_logout().unwrap_err();
        assert_eq!(err, PageError::missing_element(ids::LOGOUT_BUTTON));
        assert_eq!(page.in_flight(), 0);
    }

    #[test]
    fn test_tick_hides_banner_after_configured_delay() {
        let config = Config {
            notification_hide_ms: 10,
            ..Config::default()
        };
        let mut page = offline_page(&config);
        page.notify(Event::system(EventKind::LoginFailure)).unwrap();
        assert!(page.document().get(ids::NOTIFICATION).unwrap().is_visible());

        page.tick(Instant::now() + Duration::from_millis(10));
        assert!(!page.document().get(ids::NOTIFICATION).unwrap().is_visible());
    }

    #[test]
    fn test_component_notification_is_queued_until_drain() {
        let mut page = offline_page(&Config::default());
        let handle = page.mediator().handle().clone();
        handle.notify(Event::new(EventKind::LoginSuccess, json!("bob")).from_sender("test"));

        assert!(page.document().navigations().is_empty());
        assert_eq!(page.drain().unwrap(), 1);
        assert_eq!(page.document().location(), "/dashboard");
        assert_eq!(page.document().get(ids::DASHBOARD).unwrap().text, "bob");
    }

    #[test]
    fn test_strict_wiring_error_surfaces_from_notify() {
        let mut page = offline_page(&Config::default());
        // Break the wiring: the dashboard region is gone.
        let mut doc = Document::new("/");
        doc.insert(Element::new(ids::NOTIFICATION));
        *page.document_mut() = doc;

        let err = page
            .notify(Event::new(EventKind::LoginSuccess, json!("bob")))
            .unwrap_err();
        assert_eq!(err, PageError::missing_element(ids::DASHBOARD));
        assert!(page.document().navigations().is_empty());
    }
}
