//! Message handlers: send and mark-read.

use anyhow::{Context, Result, bail};
use postbox_core::api::ApiClient;
use postbox_core::config::Config;
use postbox_page::Page;
use postbox_page::dom::{UNREAD_CLASS, fields};

use super::report;

pub async fn send(config: &Config, api: ApiClient, to: &str, message: &str) -> Result<()> {
    let mut page = Page::new(config, api);
    let doc = page.document_mut();
    doc.set_field_value(fields::RECEIVER_NAME, to)?;
    doc.set_field_value(fields::MESSAGE, message)?;

    page.submit_message().context("submit message")?;
    report::settle(&mut page).await?;
    report::print(&page);

    let Some(submission) = page.document().submissions().last() else {
        bail!("Message not sent");
    };

    // The browser would now navigate by posting the form.
    let response = page
        .api()
        .submit_form(&submission.action, &submission.fields)
        .await
        .with_context(|| format!("post {}", submission.action))?;
    println!("posted: {} -> HTTP {}", submission.action, response.status);
    if !(200..400).contains(&response.status) {
        bail!("Server rejected the message (HTTP {})", response.status);
    }
    Ok(())
}

pub async fn mark_read(config: &Config, api: ApiClient, message_id: &str) -> Result<()> {
    let mut page = Page::new(config, api);
    let element = page.document_mut().add_message_item(message_id, true);

    page.mark_as_read(message_id, &element);
    report::settle(&mut page).await?;
    report::print(&page);

    let unread = page
        .document()
        .get(&element)
        .is_some_and(|item| item.has_class(UNREAD_CLASS));
    println!(
        "message {message_id}: {}",
        if unread { "unread" } else { "read" }
    );
    Ok(())
}
