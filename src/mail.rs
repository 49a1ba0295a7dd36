use std::sync::Mutex;

use async_trait::async_trait;
use log::info;
use once_cell::sync::Lazy;
use thiserror::Error;

/// Welcome email template, split once around the recipient-name placeholder.
static WELCOME_TEMPLATE: Lazy<(&'static str, &'static str)> = Lazy::new(|| {
    let raw = include_str!("../assets/welcome_email.html");
    raw.split_once("{{name}}").unwrap_or((raw, ""))
});

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Sending mail to `{0}` failed.")]
    Delivery(String),
}

/// Seam to the external email-delivery provider.
#[async_trait]
pub trait WelcomeMailer: Send + Sync {
    /// Sends the welcome email to a newly created user.
    async fn send_welcome(&self, email: &str, name: &str) -> Result<(), MailError>;
}

/// Renders the welcome email body for a recipient.
pub fn render_welcome(name: &str) -> String {
    let (before_name, after_name) = *WELCOME_TEMPLATE;
    format!("{}{}{}", before_name, name, after_name)
}

/// Mailer that renders the message and logs the send instead of delivering
/// it. Delivery is owned by the external provider.
pub struct LogMailer;

#[async_trait]
impl WelcomeMailer for LogMailer {
    async fn send_welcome(&self, email: &str, name: &str) -> Result<(), MailError> {
        let body = render_welcome(name);
        info!(
            "Welcome email for `{}` rendered ({} bytes).",
            email,
            body.len()
        );
        Ok(())
    }
}

/// Mailer recording every send, used by tests.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    /// Recipient email and name of every recorded send.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl WelcomeMailer for RecordingMailer {
    async fn send_welcome(&self, email: &str, name: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((email.to_string(), name.to_string()));
        Ok(())
    }
}
