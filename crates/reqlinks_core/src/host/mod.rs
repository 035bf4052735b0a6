//! Host collaborator contracts.
//!
//! The UI host owns notifications and browser tabs; core only calls them.
//! Both contracts are fire-and-forget: implementations must not block and
//! must not fail the calling operation.

use log::info;

/// Best-effort user notification (toast, badge).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// Opens a URL in a new background tab. Not awaited, no ordering guarantee.
pub trait TabOpener: Send + Sync {
    fn open(&self, url: &str);
}

/// Notification sink that records messages in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, message: &str) {
        info!(
            "event=notify module=host status=ok chars={}",
            message.chars().count()
        );
    }
}

/// Tab opener for hosts without a browser; logs the request only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTabOpener;

impl TabOpener for LogTabOpener {
    fn open(&self, _url: &str) {
        info!("event=tab_open module=host status=skipped reason=no_browser");
    }
}
