//! In-memory document model.
//!
//! Holds only what the page logic reads or writes: element visibility, text,
//! form control values, class lists, form actions and frame sources. Side
//! effects that leave the page (alerts, redirects, form submissions) are
//! journaled in order so callers and tests can observe them.

use std::collections::BTreeSet;

use crate::error::PageError;

/// Element ids the page logic relies on.
pub mod ids {
    pub const LOGIN_BUTTON: &str = "LoginBtn";
    pub const LOGOUT_BUTTON: &str = "logoutBtn";
    pub const NOTIFICATION: &str = "notification";
    pub const SEND_MESSAGE_FORM: &str = "sendMessageForm";
    pub const SEND_MESSAGE_POPUP: &str = "sendMessagePopup";
    pub const MESSAGE_POPUP: &str = "messagePopup";
    pub const MESSAGE_FRAME: &str = "messageFrame";
    pub const DASHBOARD: &str = "dashboard";
    pub const LOGIN_FORM: &str = "loginForm";

    /// Id of an inbox row for a message.
    pub fn message_item(message_id: &str) -> String {
        format!("message-{message_id}")
    }
}

/// Form control names (looked up by name, not id).
pub mod fields {
    pub const RECEIVER_NAME: &str = "receiver_name";
    pub const MESSAGE: &str = "message";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
}

/// Class marking an unread inbox row.
pub const UNREAD_CLASS: &str = "unread";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    /// Control name (`name=` attribute) for form fields
    pub name: Option<String>,
    /// Owning form id for form fields
    pub form: Option<String>,
    pub display: Display,
    pub text: String,
    pub value: String,
    pub action: Option<String>,
    pub src: Option<String>,
    classes: BTreeSet<String>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// A named form control owned by `form`.
    pub fn field(name: impl Into<String>, form: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            form: Some(form.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.display = Display::None;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn is_visible(&self) -> bool {
        self.display == Display::Block
    }

    pub fn show(&mut self) {
        self.display = Display::Block;
    }

    pub fn hide(&mut self) {
        self.display = Display::None;
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    /// Returns true if the class was present.
    pub fn remove_class(&mut self, class: &str) -> bool {
        self.classes.remove(class)
    }
}

/// A programmatic form submission (full-page navigation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form: String,
    pub action: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    location: String,
    navigations: Vec<String>,
    alerts: Vec<String>,
    submissions: Vec<FormSubmission>,
}

impl Document {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    /// The standard messaging page: login/logout controls, notification
    /// banner, dashboard, send-message popup with its form, and the
    /// message-thread popup.
    pub fn messaging_page() -> Self {
        let mut doc = Self::new("/");
        doc.insert(Element::new(ids::LOGIN_BUTTON));
        doc.insert(Element::new(ids::LOGIN_FORM).with_action("/login"));
        doc.insert(Element::field(fields::EMAIL, ids::LOGIN_FORM));
        doc.insert(Element::field(fields::PASSWORD, ids::LOGIN_FORM));
        doc.insert(Element::new(ids::LOGOUT_BUTTON));
        doc.insert(Element::new(ids::NOTIFICATION).hidden());
        doc.insert(Element::new(ids::DASHBOARD));
        doc.insert(Element::new(ids::SEND_MESSAGE_POPUP).hidden());
        doc.insert(Element::new(ids::SEND_MESSAGE_FORM));
        doc.insert(Element::field(fields::RECEIVER_NAME, ids::SEND_MESSAGE_FORM));
        doc.insert(Element::field(fields::MESSAGE, ids::SEND_MESSAGE_FORM));
        doc.insert(Element::new(ids::MESSAGE_POPUP).hidden());
        doc.insert(Element::new(ids::MESSAGE_FRAME));
        doc
    }

    /// Inserts an element, replacing any element with the same id.
    pub fn insert(&mut self, element: Element) {
        let existing = element.id.as_deref().and_then(|id| {
            self.elements
                .iter()
                .position(|e| e.id.as_deref() == Some(id))
        });
        match existing {
            Some(index) => self.elements[index] = element,
            None => self.elements.push(element),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Element, PageError> {
        self.elements
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| PageError::missing_element(id))
    }

    /// First control with this name.
    pub fn field(&self, name: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.name.as_deref() == Some(name))
    }

    pub fn field_value(&self, name: &str) -> Result<&str, PageError> {
        self.field(name)
            .map(|e| e.value.as_str())
            .ok_or_else(|| PageError::missing_element(name))
    }

    pub fn set_field_value(&mut self, name: &str, value: &str) -> Result<(), PageError> {
        let field = self
            .elements
            .iter_mut()
            .find(|e| e.name.as_deref() == Some(name))
            .ok_or_else(|| PageError::missing_element(name))?;
        field.value = value.to_string();
        Ok(())
    }

    /// Shows a blocking alert to the user.
    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Redirects the page.
    pub fn navigate(&mut self, to: impl Into<String>) {
        let to = to.into();
        self.location.clone_from(&to);
        self.navigations.push(to);
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Submits a form with the current values of its named controls.
    ///
    /// A form without an action posts to the current location.
    pub fn submit_form(&mut self, form_id: &str) -> Result<&FormSubmission, PageError> {
        let form = self
            .get(form_id)
            .ok_or_else(|| PageError::missing_element(form_id))?;
        let action = form.action.clone().unwrap_or_else(|| self.location.clone());
        let fields = self
            .elements
            .iter()
            .filter(|e| e.form.as_deref() == Some(form_id))
            .filter_map(|e| e.name.clone().map(|name| (name, e.value.clone())))
            .collect();
        self.submissions.push(FormSubmission {
            form: form_id.to_string(),
            action,
            fields,
        });
        let index = self.submissions.len() - 1;
        Ok(&self.submissions[index])
    }

    pub fn submissions(&self) -> &[FormSubmission] {
        &self.submissions
    }

    /// Adds an inbox row for a message, optionally marked unread.
    pub fn add_message_item(&mut self, message_id: &str, unread: bool) -> String {
        let id = ids::message_item(message_id);
        let mut item = Element::new(id.clone());
        if unread {
            item.add_class(UNREAD_CLASS);
        }
        self.insert(item);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messaging_page_has_every_id() {
        let doc = Document::messaging_page();
        for id in [
            ids::LOGIN_BUTTON,
            ids::LOGOUT_BUTTON,
            ids::NOTIFICATION,
            ids::SEND_MESSAGE_FORM,
            ids::SEND_MESSAGE_POPUP,
            ids::MESSAGE_POPUP,
            ids::MESSAGE_FRAME,
        ] {
            assert!(doc.get(id).is_some(), "missing {id}");
        }
        assert!(doc.field(fields::RECEIVER_NAME).is_some());
        assert!(doc.field(fields::MESSAGE).is_some());
        assert!(!doc.get(ids::NOTIFICATION).unwrap().is_visible());
    }

    #[test]
    fn test_missing_element_is_an_error() {
        let mut doc = Document::new("/");
        assert_eq!(
            doc.get_mut("nope").unwrap_err(),
            PageError::missing_element("nope")
        );
        assert!(doc.set_field_value("nope", "x").is_err());
    }

    #[test]
    fn test_submit_form_collects_own_fields_only() {
        let mut doc = Document::messaging_page();
        doc.set_field_value(fields::RECEIVER_NAME, "bob").unwrap();
        doc.set_field_value(fields::MESSAGE, "hi").unwrap();
        doc.set_field_value(fields::EMAIL, "me@example.com").unwrap();
        doc.get_mut(ids::SEND_MESSAGE_FORM).unwrap().action = Some("/send_message/42".into());

        let submission = doc.submit_form(ids::SEND_MESSAGE_FORM).unwrap().clone();
        assert_eq!(submission.action, "/send_message/42");
        assert_eq!(
            submission.fields,
            vec![
                ("receiver_name".to_string(), "bob".to_string()),
                ("message".to_string(), "hi".to_string()),
            ]
        );
        assert_eq!(doc.submissions().len(), 1);
    }

    #[test]
    fn test_form_without_action_posts_to_location() {
        let mut doc = Document::messaging_page();
        doc.navigate("/inbox");
        let submission = doc.submit_form(ids::SEND_MESSAGE_FORM).unwrap();
        assert_eq!(submission.action, "/inbox");
    }

    #[test]
    fn test_navigate_journals_every_redirect() {
        let mut doc = Document::new("/");
        doc.navigate("/login");
        doc.navigate("/login");
        assert_eq!(doc.location(), "/login");
        assert_eq!(doc.navigations(), ["/login", "/login"]);
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut doc = Document::new("/");
        doc.add_message_item("7", true);
        doc.add_message_item("7", false);
        let item = doc.get(&ids::message_item("7")).unwrap();
        assert!(!item.has_class(UNREAD_CLASS));
    }
}
