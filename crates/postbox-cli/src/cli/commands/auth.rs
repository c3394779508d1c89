//! Login, register and logout handlers.

use anyhow::{Context, Result};
use postbox_core::api::ApiClient;
use postbox_core::config::Config;
use postbox_page::Page;
use postbox_page::dom::fields;

use super::report;

pub async fn login(config: &Config, api: ApiClient, email: &str, password: &str) -> Result<()> {
    let mut page = Page::new(config, api);
    let doc = page.document_mut();
    doc.set_field_value(fields::EMAIL, email)?;
    doc.set_field_value(fields::PASSWORD, password)?;

    page.click_login().context("click login")?;
    report::settle(&mut page).await?;
    report::print(&page);
    Ok(())
}

pub async fn register(
    config: &Config,
    api: ApiClient,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let mut page = Page::new(config, api);
    page.submit_registration(username, email, password);
    report::settle(&mut page).await?;
    report::print(&page);
    Ok(())
}

pub async fn logout(config: &Config, api: ApiClient) -> Result<()> {
    let mut page = Page::new(config, api);
    page.click_logout().context("click logout")?;
    report::settle(&mut page).await?;
    report::print(&page);
    Ok(())
}
