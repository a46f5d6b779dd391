//! Email send requests and their outcomes

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::email_addresses::{EmailAddress, EmailAddressError};

/// Reasons an email send request is rejected before reaching the provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The payload is not a JSON email send request
    #[error("Invalid request body")]
    InvalidBody,

    /// The sender address is missing or malformed
    #[error("from: {0}")]
    InvalidSender(EmailAddressError),

    /// The recipient list is missing or empty
    #[error("to: at least one recipient is required")]
    NoRecipients,

    /// A recipient address is missing or malformed
    #[error("to[{index}]: {source}")]
    InvalidRecipient {
        /// Position of the offending entry
        index: usize,

        /// What is wrong with it
        source: EmailAddressError,
    },

    /// The subject is empty
    #[error("subject: subject is required")]
    EmptySubject,

    /// Neither body is present
    #[error("htmlBody/textBody: an HTML or a text body is required")]
    EmptyBody,
}

/// Email send request body
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailSendRequest {
    /// The sender address
    #[schema(example = "sender@example.com")]
    #[serde(deserialize_with = "null_as_default")]
    pub from: String,

    /// The recipients; only the first one is sent to
    #[schema(example = json!(["recipient@example.com"]))]
    #[serde(deserialize_with = "null_as_default")]
    pub to: Vec<String>,

    /// The subject line
    #[schema(example = "Welcome aboard")]
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,

    /// The HTML body, required unless `textBody` is given
    #[schema(example = "<p>Hello!</p>")]
    #[serde(deserialize_with = "null_as_default")]
    pub html_body: String,

    /// The plain text body, required unless `htmlBody` is given
    #[schema(example = "Hello!")]
    #[serde(deserialize_with = "null_as_default")]
    pub text_body: String,
}

/// Treats an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A request that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// The sender address
    pub from: EmailAddress,

    /// The recipients, never empty
    pub to: Vec<EmailAddress>,

    /// The subject line
    pub subject: String,

    /// The HTML body
    pub html_body: String,

    /// The plain text body
    pub text_body: String,
}

impl EmailSendRequest {
    /// Decode a request from a JSON payload.
    ///
    /// Absent fields decode as empty values and are left for [`validate`](Self::validate)
    /// to reject.
    pub fn from_json(payload: &[u8]) -> Result<Self, RequestError> {
        serde_json::from_slice(payload).map_err(|_| RequestError::InvalidBody)
    }

    /// Check the request, returning the first rule it breaks.
    pub fn validate(&self) -> Result<ValidatedRequest, RequestError> {
        let from = EmailAddress::new(&self.from).map_err(RequestError::InvalidSender)?;

        if self.to.is_empty() {
            return Err(RequestError::NoRecipients);
        }

        let to = self
            .to
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                EmailAddress::new(raw)
                    .map_err(|source| RequestError::InvalidRecipient { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if self.subject.is_empty() {
            return Err(RequestError::EmptySubject);
        }

        if self.html_body.is_empty() && self.text_body.is_empty() {
            return Err(RequestError::EmptyBody);
        }

        Ok(ValidatedRequest {
            from,
            to,
            subject: self.subject.clone(),
            html_body: self.html_body.clone(),
            text_body: self.text_body.clone(),
        })
    }
}

/// Email send response body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmailSendOutcome {
    /// Whether the provider accepted the email
    #[schema(example = true)]
    pub success: bool,

    /// Confirmation or error detail
    #[schema(example = "Email sent successfully")]
    pub message: String,
}

impl EmailSendOutcome {
    /// A successful outcome
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "Email sent successfully".to_string(),
        }
    }

    /// A failed outcome carrying `message`
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
