//! Notification boundary
//!
//! Confirmation and trigger messages leave the service through [`Notifier`].
//! The webhook backend is the deliverable channel; the log backend is the
//! default when none is configured.

pub mod templates;
pub mod webhook;

pub use webhook::WebhookNotifier;

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook error: {0}")]
    Webhook(String),
}

/// Delivery channel for outbound notifications.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that writes messages to the log instead of delivering them
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %recipient,
            subject = %subject,
            "Notification (log only): {}",
            body
        );
        Ok(())
    }
}
