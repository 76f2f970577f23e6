// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outgoing password-reset mail.

use tracing::info;

/// Errors raised while handing a message to the mail transport.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport is not configured: {0}")]
    NotConfigured(String),
    #[error("failed to deliver mail: {0}")]
    Delivery(String),
}

/// A password-reset message, fully rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetEmail {
    pub to_name: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
}

/// Delivery credentials for the mail account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailerCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub sender: Option<String>,
}

/// Sends password-reset mail.
pub trait Mailer: Send + Sync {
    /// Delivers `email`.
    ///
    /// # Errors
    ///
    /// Returns a `MailError` if the message could not be handed off.
    fn send(&self, email: &ResetEmail) -> Result<(), MailError>;
}

/// A mailer that writes each message to the log instead of the network.
#[derive(Debug, Clone, Default)]
pub struct LoggingMailer {
    credentials: MailerCredentials,
}

impl LoggingMailer {
    #[must_use]
    pub const fn new(credentials: MailerCredentials) -> Self {
        Self { credentials }
    }
}

impl Mailer for LoggingMailer {
    fn send(&self, email: &ResetEmail) -> Result<(), MailError> {
        let sender: &str = self
            .credentials
            .sender
            .as_deref()
            .unwrap_or("Park Spot <noreply@localhost>");
        info!(
            from = sender,
            to = %email.to_address,
            subject = %email.subject,
            oauth_configured = self.credentials.client_id.is_some(),
            "Password reset mail"
        );
        Ok(())
    }
}
