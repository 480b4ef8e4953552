//! Host-provided capabilities the client calls into.
//!
//! The client reports failures and session expiry through these traits
//! instead of showing UI or navigating itself. Closures implement both.

/// A transient, user-facing message about a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// HTTP status of the failed request, or `-1` when there was none.
    pub status: i32,
    pub message: String,
}

/// Surfaces failed-request messages to the user (toast, status bar, log).
///
/// # Example
///
/// ```rust,ignore
/// struct StatusBar(tokio::sync::mpsc::UnboundedSender<String>);
///
/// impl Notifier for StatusBar {
///     fn notify(&self, notice: &Notice) {
///         let _ = self.0.send(notice.message.clone());
///     }
/// }
/// ```
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notice: &Notice);
}

impl<F> Notifier for F
where
    F: Fn(&Notice) + Send + Sync + 'static,
{
    fn notify(&self, notice: &Notice) {
        self(notice);
    }
}

/// Default notifier: logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::info!(status = notice.status, message = %notice.message, "Request failed");
    }
}

/// Called once the stored credentials have been wiped after the server
/// reported an expired token. Hosts typically navigate to `login_path`.
///
/// Concurrent expirations are coalesced, so one expiry yields one call.
pub trait SessionExpiredHandler: Send + Sync + 'static {
    fn on_session_expired(&self, login_path: &str);
}

impl<F> SessionExpiredHandler for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn on_session_expired(&self, login_path: &str) {
        self(login_path);
    }
}

/// Default handler: logs the expiry and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogExpiry;

impl SessionExpiredHandler for LogExpiry {
    fn on_session_expired(&self, login_path: &str) {
        tracing::warn!(login_path, "Session expired; sign-in required");
    }
}
