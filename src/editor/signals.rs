use std::time::Duration;
use tokio::time::Instant;

/// Default lifetime of an info message
pub const DEFAULT_INFO_TTL: Duration = Duration::from_millis(2200);

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    shown_at: Instant,
}

/// Transient UI feedback: a busy flag, a short-lived info message and a
/// sticky error message.
///
/// `loading` is advisory only. Nothing stops a second request while it is set.
#[derive(Debug, Clone)]
pub struct Feedback {
    loading: bool,
    info: Option<Toast>,
    error: Option<String>,
    info_ttl: Duration,
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new(DEFAULT_INFO_TTL)
    }
}

impl Feedback {
    pub fn new(info_ttl: Duration) -> Self {
        Self {
            loading: false,
            info: None,
            error: None,
            info_ttl,
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// The current info message, until it expires or is replaced
    pub fn info(&self) -> Option<&str> {
        self.info
            .as_ref()
            .filter(|t| t.shown_at.elapsed() < self.info_ttl)
            .map(|t| t.message.as_str())
    }

    /// Show `message`, restarting the expiry clock
    pub fn toast(&mut self, message: impl Into<String>) {
        self.info = Some(Toast {
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    /// The last error, kept until replaced or cleared
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
