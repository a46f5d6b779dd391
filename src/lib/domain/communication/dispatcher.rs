//! Email dispatcher: validate, send, normalize.

use std::sync::Arc;

use http::StatusCode;
use tracing::{error, info, warn};

use super::{
    mailer::{Mailer, MailerError, Message, SendReceipt},
    requests::{EmailSendOutcome, EmailSendRequest, RequestError},
};

/// Result of dispatching one request
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The provider accepted the email
    Sent(SendReceipt),

    /// The request never reached the provider
    Rejected(RequestError),

    /// The provider refused or could not be reached
    Failed(MailerError),
}

impl DispatchOutcome {
    /// The HTTP status every transport reports for this outcome
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Sent(_) => StatusCode::OK,
            Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the email was sent
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

impl From<&DispatchOutcome> for EmailSendOutcome {
    fn from(outcome: &DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Sent(_) => EmailSendOutcome::sent(),
            DispatchOutcome::Rejected(err) => EmailSendOutcome::failure(err.to_string()),
            DispatchOutcome::Failed(err) => {
                EmailSendOutcome::failure(format!("Failed to send email: {err}"))
            }
        }
    }
}

impl From<DispatchOutcome> for EmailSendOutcome {
    fn from(outcome: DispatchOutcome) -> Self {
        Self::from(&outcome)
    }
}

/// Validates requests and hands them to a [`Mailer`]
#[derive(Debug)]
pub struct EmailDispatcher<M: Mailer> {
    mailer: Arc<M>,
}

impl<M: Mailer> Clone for EmailDispatcher<M> {
    fn clone(&self) -> Self {
        Self {
            mailer: Arc::clone(&self.mailer),
        }
    }
}

impl<M: Mailer> EmailDispatcher<M> {
    /// Creates a new dispatcher sending through `mailer`.
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }

    /// Decodes a JSON payload and dispatches it.
    pub async fn dispatch_json(&self, payload: &[u8]) -> DispatchOutcome {
        match EmailSendRequest::from_json(payload) {
            Ok(request) => self.dispatch(&request).await,
            Err(err) => {
                warn!("rejected undecodable email send request");
                DispatchOutcome::Rejected(err)
            }
        }
    }

    /// Validates `request` and, if it is valid, sends it to its first recipient.
    ///
    /// The provider is called at most once and only for a valid request.
    pub async fn dispatch(&self, request: &EmailSendRequest) -> DispatchOutcome {
        let validated = match request.validate() {
            Ok(validated) => validated,
            Err(err) => {
                warn!(error = %err, "rejected invalid email send request");
                return DispatchOutcome::Rejected(err);
            }
        };

        let mut recipients = validated.to.into_iter();
        let Some(to) = recipients.next() else {
            return DispatchOutcome::Rejected(RequestError::NoRecipients);
        };

        let dropped = recipients.len();
        if dropped > 0 {
            warn!(dropped, "only the first recipient is sent to");
        }

        let message = Message {
            from: validated.from,
            to,
            subject: validated.subject,
            html_body: validated.html_body,
            text_body: validated.text_body,
        };

        match self.mailer.send_email(&message).await {
            Ok(receipt) => {
                info!(message_id = %receipt.message_id, to = %message.to, "email sent");
                DispatchOutcome::Sent(receipt)
            }
            Err(err) => {
                error!(error = %err, to = %message.to, "email provider failed");
                DispatchOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use testresult::TestResult;

    use crate::domain::communication::mailer::tests::MockMailer;

    use super::*;

    fn request(to: &[&str]) -> EmailSendRequest {
        EmailSendRequest {
            from: "test@example.com".to_string(),
            to: to.iter().map(|s| s.to_string()).collect(),
            subject: "S".to_string(),
            html_body: "<p>x</p>".to_string(),
            text_body: String::new(),
        }
    }

    fn receipt() -> SendReceipt {
        SendReceipt {
            message_id: "b7bc2f4a-e38e-4336-af7d-e6c392c2f817".to_string(),
            to: "a@example.com".to_string(),
            submitted_at: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_success() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(|message| {
                message.from.as_str() == "test@example.com"
                    && message.to.as_str() == "a@example.com"
                    && message.subject == "S"
                    && message.html_body == "<p>x</p>"
                    && message.text_body.is_empty()
            })
            .returning(|_| Ok(receipt()));

        let dispatcher = EmailDispatcher::new(Arc::new(mailer));

        let outcome = dispatcher.dispatch(&request(&["a@example.com"])).await;

        assert!(outcome.is_sent());
        assert_eq!(outcome.status_code(), StatusCode::OK);
        assert_eq!(EmailSendOutcome::from(outcome), EmailSendOutcome::sent());

        Ok(())
    }

    #[tokio::test]
    async fn test_dispatch_sends_to_first_recipient_only() {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(|message| message.to.as_str() == "a@example.com")
            .returning(|_| Ok(receipt()));

        let dispatcher = EmailDispatcher::new(Arc::new(mailer));

        let outcome = dispatcher
            .dispatch(&request(&["a@example.com", "b@example.com"]))
            .await;

        assert!(outcome.is_sent());
    }

    #[tokio::test]
    async fn test_dispatch_validation_failure_skips_provider() {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(0);

        let dispatcher = EmailDispatcher::new(Arc::new(mailer));

        let outcome = dispatcher.dispatch(&request(&[])).await;

        assert_eq!(outcome.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            EmailSendOutcome::from(outcome),
            EmailSendOutcome::failure("to: at least one recipient is required")
        );
    }

    #[tokio::test]
    async fn test_dispatch_provider_failure() {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .returning(|_| Err(MailerError::from(anyhow!("connection refused"))));

        let dispatcher = EmailDispatcher::new(Arc::new(mailer));

        let outcome = dispatcher.dispatch(&request(&["a@example.com"])).await;

        assert_eq!(outcome.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            EmailSendOutcome::from(outcome),
            EmailSendOutcome::failure("Failed to send email: connection refused")
        );
    }

    #[tokio::test]
    async fn test_dispatch_json_malformed_payload() {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(0);

        let dispatcher = EmailDispatcher::new(Arc::new(mailer));

        let outcome = dispatcher.dispatch_json(b"{\"from\":").await;

        assert_eq!(outcome.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            EmailSendOutcome::from(outcome),
            EmailSendOutcome::failure("Invalid request body")
        );
    }

    #[tokio::test]
    async fn test_dispatch_json_valid_payload() {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .returning(|_| Ok(receipt()));

        let dispatcher = EmailDispatcher::new(Arc::new(mailer));

        let outcome = dispatcher
            .dispatch_json(
                br#"{"from":"test@example.com","to":["a@example.com"],"subject":"S","htmlBody":"<p>x</p>","textBody":""}"#,
            )
            .await;

        assert!(outcome.is_sent());
    }
}
