//! The notification side channel.
//!
//! Every completed operation - success or failure - emits exactly one
//! user-visible message here. This is the only feedback mechanism: mutation
//! methods resolve with `()` regardless of outcome. Views subscribe, render
//! each message as a toast, and dismiss it after [`DISMISS_AFTER`].
//!
//! The channel is a lossy broadcast: sending never blocks, and a message
//! emitted while no view is listening is simply dropped (a late response
//! after the subscribing view unmounted produces a harmless phantom
//! notification at worst).

use std::time::Duration;

use tokio::sync::broadcast;

/// How long a view should display a notification before auto-dismissing it.
pub const DISMISS_AFTER: Duration = Duration::from_secs(4);

const CHANNEL_CAPACITY: usize = 16;

/// Fixed operation-outcome texts the client emits on its own behalf.
/// Mutation successes carry the server's message instead.
pub mod messages {
    pub const ALL_COMPANIES: &str = "got all companies";
    pub const ALL_CUSTOMERS: &str = "got all customers";
    pub const ALL_COUPONS: &str = "got all coupons";
    pub const ALL_CUSTOMER_COUPONS: &str = "got all customer coupons";

    pub const PLEASE_LOGIN: &str = "please login to the site";
    pub const ACCESS_DENIED: &str = "access denied";
    pub const OPERATION_NOT_ALLOWED: &str = "operation is not allowed";
    pub const GENERAL_ERROR: &str = "general error occurred, please try again.";
    pub const NO_FILTER_MATCHES: &str = "no coupons from this filter";
}

/// Message category, controlling toast styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A single user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Broadcast sender handle for operation outcomes.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    /// Create a notifier with the default channel capacity.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to future notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Emit a success message.
    pub fn success(&self, message: impl Into<String>) {
        self.emit(Severity::Success, message.into());
    }

    /// Emit an error message.
    pub fn error(&self, message: impl Into<String>) {
        self.emit(Severity::Error, message.into());
    }

    fn emit(&self, severity: Severity, message: String) {
        // No receivers means no views are mounted; drop the message.
        let _ = self.tx.send(Notification { severity, message });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_in_order() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.success("got all coupons");
        notifier.error("access denied");

        let first = rx.try_recv().unwrap();
        assert_eq!(first.severity, Severity::Success);
        assert_eq!(first.message, "got all coupons");

        let second = rx.try_recv().unwrap();
        assert_eq!(second.severity, Severity::Error);
        assert_eq!(second.message, "access denied");
    }

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let notifier = Notifier::new();
        notifier.success("nobody is listening");
    }
}
