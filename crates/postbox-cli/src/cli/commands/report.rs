//! Session helpers and the end-of-command report.

use anyhow::{Context, Result};
use postbox_page::Page;
use postbox_page::dom::{Document, ids};

/// Lets every queued notification and in-flight workflow settle.
pub async fn settle(page: &mut Page) -> Result<()> {
    page.run_until_idle().await.context("page dispatch")
}

/// What the user would have seen, one line per observation.
pub fn render(doc: &Document) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(banner) = doc.get(ids::NOTIFICATION)
        && banner.is_visible()
        && !banner.text.is_empty()
    {
        lines.push(format!("notification: {}", banner.text));
    }
    if let Some(dashboard) = doc.get(ids::DASHBOARD)
        && !dashboard.text.is_empty()
    {
        lines.push(format!("dashboard: {}", dashboard.text));
    }
    for alert in doc.alerts() {
        lines.push(format!("alert: {alert}"));
    }
    for to in doc.navigations() {
        lines.push(format!("navigated: {to}"));
    }
    for submission in doc.submissions() {
        lines.push(format!(
            "submitted: {} -> {}",
            submission.form, submission.action
        ));
    }
    lines
}

pub fn print(page: &Page) {
    for line in render(page.document()) {
        println!("{line}");
    }
}
