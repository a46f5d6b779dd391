//! Email message

use chrono::{DateTime, Utc};

use crate::domain::communication::email_addresses::EmailAddress;

/// Email message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// The sender of the email
    pub from: EmailAddress,

    /// The recipient of the email
    pub to: EmailAddress,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email, possibly empty
    pub html_body: String,

    /// The plain text body of the email, possibly empty
    pub text_body: String,
}

/// Acknowledgment returned by the provider for an accepted message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendReceipt {
    /// Provider-assigned message id
    pub message_id: String,

    /// The recipient as reported by the provider
    pub to: String,

    /// When the provider accepted the message
    pub submitted_at: Option<DateTime<Utc>>,
}
