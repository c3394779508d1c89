//! Popup visibility toggles.

use crate::dom::{Document, ids};
use crate::error::PageError;

/// Path the message popup's frame loads for a conversation.
pub fn messages_path(user_id: &str) -> String {
    format!("/messages/{user_id}")
}

pub fn open_send_message(doc: &mut Document) -> Result<(), PageError> {
    doc.get_mut(ids::SEND_MESSAGE_POPUP)?.show();
    Ok(())
}

pub fn close_send_message(doc: &mut Document) -> Result<(), PageError> {
    doc.get_mut(ids::SEND_MESSAGE_POPUP)?.hide();
    Ok(())
}

/// Points the message frame at the user's conversation, then shows the popup.
pub fn open_message(doc: &mut Document, user_id: &str) -> Result<(), PageError> {
    doc.get_mut(ids::MESSAGE_FRAME)?.src = Some(messages_path(user_id));
    doc.get_mut(ids::MESSAGE_POPUP)?.show();
    Ok(())
}

pub fn close_message(doc: &mut Document) -> Result<(), PageError> {
    doc.get_mut(ids::MESSAGE_POPUP)?.hide();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_popup_toggles() {
        let mut doc = Document::messaging_page();
        open_send_message(&mut doc).unwrap();
        assert!(doc.get(ids::SEND_MESSAGE_POPUP).unwrap().is_visible());
        close_send_message(&mut doc).unwrap();
        assert!(!doc.get(ids::SEND_MESSAGE_POPUP).unwrap().is_visible());
    }

    #[test]
    fn test_message_popup_loads_conversation() {
        let mut doc = Document::messaging_page();
        open_message(&mut doc, "42").unwrap();

        assert_eq!(
            doc.get(ids::MESSAGE_FRAME).unwrap().src.as_deref(),
            Some("/messages/42")
        );
        assert!(doc.get(ids::MESSAGE_POPUP).unwrap().is_visible());

        close_message(&mut doc).unwrap();
        assert!(!doc.get(ids::MESSAGE_POPUP).unwrap().is_visible());
        // Closing leaves the frame where it was.
        assert!(doc.get(ids::MESSAGE_FRAME).unwrap().src.is_some());
    }

    #[test]
    fn test_popup_on_bare_document_fails() {
        let mut doc = Document::new("/");
        assert_eq!(
            open_message(&mut doc, "1").unwrap_err(),
            PageError::missing_element(ids::MESSAGE_FRAME)
        );
    }
}
