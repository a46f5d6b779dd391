//! AWS Lambda entry point
//!
//! Accepts API Gateway proxy events carrying the same JSON body as `POST /send-email`
//! and answers with the same status codes and response body. The event's HTTP method
//! is not checked; API Gateway routing decides which events reach the function.

use lambda_http::{
    http::header::CONTENT_TYPE, run as run_lambda, service_fn, Body, Error, Request, Response,
};
use tracing::debug;

use crate::domain::communication::{
    dispatcher::EmailDispatcher, mailer::Mailer, requests::EmailSendOutcome,
};

/// Handles a single invocation event.
///
/// # Errors
/// Only fails when the response itself cannot be encoded. Rejected and failed sends
/// are ordinary responses.
pub async fn handle_event<M: Mailer>(
    dispatcher: &EmailDispatcher<M>,
    event: Request,
) -> Result<Response<Body>, Error> {
    debug!(method = %event.method(), "handling function invocation");

    let outcome = dispatcher.dispatch_json(event.body()).await;
    let status = outcome.status_code();
    let body = serde_json::to_string(&EmailSendOutcome::from(outcome))?;

    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))?;

    Ok(response)
}

/// Runs the Lambda runtime loop, dispatching every event through `dispatcher`.
#[mutants::skip]
pub async fn run<M: Mailer>(dispatcher: EmailDispatcher<M>) -> Result<(), Error> {
    let dispatcher = &dispatcher;

    run_lambda(service_fn(move |event: Request| async move {
        handle_event(dispatcher, event).await
    }))
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lambda_http::http::{self, StatusCode};
    use testresult::TestResult;

    use crate::domain::communication::mailer::{tests::MockMailer, MailerError, SendReceipt};

    use super::*;

    fn event(body: &str) -> TestResult<Request> {
        Ok(http::Request::builder()
            .method("POST")
            .uri("https://abc123.execute-api.eu-west-1.amazonaws.com/send-email")
            .body(Body::from(body.to_string()))?)
    }

    fn outcome(response: &Response<Body>) -> TestResult<EmailSendOutcome> {
        Ok(serde_json::from_slice(response.body())?)
    }

    fn dispatcher(mailer: MockMailer) -> EmailDispatcher<MockMailer> {
        EmailDispatcher::new(Arc::new(mailer))
    }

    fn sending_mailer(times: usize) -> MockMailer {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(times)
            .returning(|_| Ok(SendReceipt::default()));

        mailer
    }

    #[tokio::test]
    async fn test_valid_event() -> TestResult {
        let response = handle_event(
            &dispatcher(sending_mailer(1)),
            event(
                r#"{"from":"test@example.com","to":["recipient@example.com"],"subject":"Test Subject","htmlBody":"<p>Test body</p>","textBody":"Test body"}"#,
            )?,
        )
        .await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"application/json"[..])
        );
        assert_eq!(outcome(&response)?, EmailSendOutcome::sent());

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_recipient_event() -> TestResult {
        let response = handle_event(
            &dispatcher(sending_mailer(0)),
            event(
                r#"{"from":"test@example.com","to":[],"subject":"Test Subject","htmlBody":"<p>Test body</p>","textBody":"Test body"}"#,
            )?,
        )
        .await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!outcome(&response)?.success);

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_event_body() -> TestResult {
        let response = handle_event(&dispatcher(sending_mailer(0)), event("not json")?).await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            outcome(&response)?,
            EmailSendOutcome::failure("Invalid request body")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_provider_failure_event() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(1).returning(|_| {
            Err(MailerError::Rejected {
                code: 300,
                message: "Invalid email request".to_string(),
            })
        });

        let response = handle_event(
            &dispatcher(mailer),
            event(r#"{"from":"test@example.com","to":["a@example.com"],"subject":"S","textBody":"x"}"#)?,
        )
        .await?;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            outcome(&response)?,
            EmailSendOutcome::failure("Failed to send email: Invalid email request (error code 300)")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_response_message_is_json_escaped() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(1).returning(|_| {
            Err(MailerError::Rejected {
                code: 300,
                message: "Invalid \"To\" address".to_string(),
            })
        });

        let response = handle_event(
            &dispatcher(mailer),
            event(r#"{"from":"test@example.com","to":["a@example.com"],"subject":"S","textBody":"x"}"#)?,
        )
        .await?;

        assert_eq!(
            outcome(&response)?.message,
            "Failed to send email: Invalid \"To\" address (error code 300)"
        );

        Ok(())
    }
}
