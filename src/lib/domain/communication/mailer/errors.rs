//! Mailer errors

use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The provider refused the message
    #[error("{message} (error code {code})")]
    Rejected {
        /// Provider-specific error code
        code: i64,

        /// Provider error description
        message: String,
    },

    /// The provider answered with something that is not a recognisable reply
    #[error("unexpected response from {provider} ({status}): {body}")]
    UnexpectedResponse {
        /// Provider name
        provider: &'static str,

        /// HTTP status code of the reply
        status: u16,

        /// Raw reply body
        body: String,
    },

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}
