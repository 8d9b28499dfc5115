//! Desktop notifications over the session bus.
//!
//! Sends `org.freedesktop.Notifications.Notify` through `notify-rust`.  The
//! notification id returned by the server is not kept: every message is
//! fire-and-forget.

use crate::traits::Notifier;
use log::debug;

/// Application name attached to every notification.
pub const APP_NAME: &str = "bspwmrc";

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub app_name: String,
    pub summary: String,
    pub body: String,
    pub timeout_ms: u32,
}

impl Message {
    pub fn new(summary: impl Into<String>, body: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            summary: summary.into(),
            body: body.into(),
            timeout_ms,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("notify send: {0}")]
pub struct NotifyError(String);

/// [`Notifier`] backed by the freedesktop notification daemon.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    type Error = NotifyError;

    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        debug!("notify {:?}: {:?}", message.summary, message.body);
        notify_rust::Notification::new()
            .appname(&message.app_name)
            .summary(&message.summary)
            .body(&message.body)
            .timeout(notify_rust::Timeout::Milliseconds(message.timeout_ms))
            .show()
            .map_err(|e| NotifyError(e.to_string()))?;
        Ok(())
    }
}
