//! UI port used by view-models to talk to the user.

use crate::domain::notification::{Level, Notification};

/// Transient toasts, blocking alerts and yes/no confirmations.
pub trait Notifier {
    fn notify(&self, notification: Notification);
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// Notifier for headless runs: everything goes to the log and confirmations
/// get a fixed answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier {
    pub assume_yes: bool,
}

impl LogNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Danger => log::error!("{}", notification.message),
            Level::Warning => log::warn!("{}", notification.message),
            Level::Success | Level::Info => log::info!("{}", notification.message),
        }
    }

    fn alert(&self, message: &str) {
        log::warn!("{message}");
    }

    fn confirm(&self, message: &str) -> bool {
        log::info!("{message} -> {}", if self.assume_yes { "yes" } else { "no" });
        self.assume_yes
    }
}
