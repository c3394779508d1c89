//! Concrete page components.

mod dashboard;
mod login;
mod notification;

pub use dashboard::Dashboard;
pub use login::LoginForm;
pub use notification::NotificationPanel;

#[cfg(test)]
pub(crate) mod testing;
