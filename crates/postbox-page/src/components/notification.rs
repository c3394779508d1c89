use std::time::{Duration, Instant};

use crate::component::{Component, MediatorBinding};
use crate::dom::{Document, ids};
use crate::error::PageError;

/// How long a message stays up when no config is given.
pub const DEFAULT_HIDE_AFTER: Duration = Duration::from_millis(3000);

/// Notification banner.
///
/// `display_msg` replaces the banner text and shows it; the banner hides
/// itself on the first tick after `hide_after` has elapsed. A new message
/// restarts the countdown.
#[derive(Debug)]
pub struct NotificationPanel {
    binding: Option<MediatorBinding>,
    hide_after: Duration,
    hide_at: Option<Instant>,
}

impl NotificationPanel {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            binding: None,
            hide_after,
            hide_at: None,
        }
    }

    /// When the banner is due to hide, if it is showing.
    pub fn hide_at(&self) -> Option<Instant> {
        self.hide_at
    }
}

impl Default for NotificationPanel {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_AFTER)
    }
}

impl Component for NotificationPanel {
    fn kind(&self) -> &'static str {
        "NotificationPanel"
    }

    fn bind(&mut self, binding: MediatorBinding) {
        self.binding = Some(binding);
    }

    fn binding(&self) -> Option<&MediatorBinding> {
        self.binding.as_ref()
    }

    fn display_msg(&mut self, doc: &mut Document, message: &str) -> Result<(), PageError> {
        let banner = doc.get_mut(ids::NOTIFICATION)?;
        banner.text = message.to_string();
        banner.show();
        self.hide_at = Some(Instant::now() + self.hide_after);
        Ok(())
    }

    fn on_tick(&mut self, doc: &mut Document, now: Instant) {
        if let Some(hide_at) = self.hide_at
            && now >= hide_at
        {
            self.hide_at = None;
            if let Ok(banner) = doc.get_mut(ids::NOTIFICATION) {
                banner.hide();
            }
        }
    }
}
