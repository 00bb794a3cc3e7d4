//! Unified error handling and user-facing normalization.
//!
//! Failures from the transport are normalized once, at this boundary, into
//! the tagged [`ApiError`] so internal code never inspects ad hoc optional
//! fields. [`report_failure`] is the single place a failure becomes a
//! user-facing message: it logs the raw error, emits exactly one
//! notification, and returns the resolved string for local UI state.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Fallback message when no failure source provides one.
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Errors produced by the API access layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (DNS, connect, timeout, aborted transfer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", body.summary())]
    Http {
        status: StatusCode,
        body: ErrorBody,
    },

    /// A success response carried a body this client could not decode.
    #[error("Response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status of the failure, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status(),
            Self::Parse(_) => None,
        }
    }
}

/// Error payload shape shared by every backend endpoint.
///
/// FastAPI-style backends put validation detail in `detail`; other layers use
/// `message`. Both are optional and anything else in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse an error body from raw response text.
    ///
    /// Non-JSON bodies (HTML error pages, empty bodies) degrade to the empty
    /// shape rather than failing.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// Best server-provided description: `detail` over `message`.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.message.as_deref())
    }

    fn summary(&self) -> &str {
        self.server_message().unwrap_or("(no error details provided)")
    }
}

/// Resolve a failure into a single human-readable message.
///
/// Precedence: server `detail` field, server `message` field, transport
/// error text, caller-supplied fallback, then [`DEFAULT_ERROR_MESSAGE`].
/// Total - always returns a string, never panics.
#[must_use]
pub fn user_message(err: &ApiError, fallback: Option<&str>) -> String {
    let from_error = match err {
        ApiError::Http { body, .. } => body.server_message().map(ToString::to_string),
        ApiError::Network(e) => {
            let text = e.to_string();
            (!text.is_empty()).then_some(text)
        }
        ApiError::Parse(e) => Some(e.to_string()),
    };

    from_error
        .or_else(|| fallback.map(ToString::to_string))
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A user-facing notification (the toast of the web storefront).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    /// An error-level notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// A success-level notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }
}

/// Sink for user-facing notifications.
///
/// The consuming view layer injects its own implementation; the default
/// [`LogNotifier`] routes through `tracing` so headless use still records
/// what the user would have seen.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default notifier backed by `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::warn!(message = %notification.message, "notification"),
            _ => tracing::info!(message = %notification.message, "notification"),
        }
    }
}

/// Shared notifier handle.
pub type SharedNotifier = Arc<dyn Notifier>;

/// The tracing-backed notifier, shared.
#[must_use]
pub fn default_notifier() -> SharedNotifier {
    Arc::new(LogNotifier)
}

/// Log a failure and surface it to the user exactly once.
///
/// Returns the resolved message so callers can also keep it in local state.
pub fn report_failure(notifier: &dyn Notifier, err: &ApiError, fallback: Option<&str>) -> String {
    let message = user_message(err, fallback);
    tracing::error!(error = %err, "API failure");
    notifier.notify(Notification::error(message.clone()));
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingNotifier;

    fn http_error(status: u16, body: &str) -> ApiError {
        ApiError::Http {
            status: StatusCode::from_u16(status).expect("status"),
            body: ErrorBody::from_text(body),
        }
    }

    #[test]
    fn test_detail_takes_precedence() {
        let err = http_error(400, r#"{"detail": "Invalid phone", "message": "nope"}"#);
        assert_eq!(user_message(&err, None), "Invalid phone");
    }

    #[test]
    fn test_message_when_no_detail() {
        let err = http_error(422, r#"{"message": "Quantity out of range"}"#);
        assert_eq!(user_message(&err, Some("fallback")), "Quantity out of range");
    }

    #[test]
    fn test_fallback_when_body_empty() {
        let err = http_error(500, "");
        assert_eq!(
            user_message(&err, Some("Could not place order")),
            "Could not place order"
        );
    }

    #[test]
    fn test_default_when_nothing_populated() {
        let err = http_error(500, "<html>oops</html>");
        assert_eq!(user_message(&err, None), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_parse_error_uses_its_text() {
        let parse_err = serde_json::from_str::<ErrorBody>("{not json").expect_err("must fail");
        let err = ApiError::Parse(parse_err);
        assert!(!user_message(&err, None).is_empty());
        assert_ne!(user_message(&err, None), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_error_body_degrades_on_non_json() {
        assert_eq!(ErrorBody::from_text("<html></html>"), ErrorBody::default());
        assert_eq!(ErrorBody::from_text(""), ErrorBody::default());
    }

    #[test]
    fn test_http_error_display() {
        let err = http_error(404, r#"{"detail": "Product not found"}"#);
        assert_eq!(err.to_string(), "HTTP 404 Not Found: Product not found");
    }

    #[test]
    fn test_report_failure_emits_exactly_one_notification() {
        let notifier = RecordingNotifier::default();
        let err = http_error(400, r#"{"detail": "Invalid phone"}"#);

        let message = report_failure(&notifier, &err, None);

        assert_eq!(message, "Invalid phone");
        let seen = notifier.notifications.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], Notification::error("Invalid phone"));
    }
}
