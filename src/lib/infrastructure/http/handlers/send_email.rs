//! Send email handler

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    domain::communication::{
        dispatcher::DispatchOutcome,
        mailer::Mailer,
        requests::EmailSendOutcome,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

impl IntoResponse for DispatchOutcome {
    fn into_response(self) -> Response {
        (self.status_code(), Json(EmailSendOutcome::from(self))).into_response()
    }
}

/// Validate an email and forward it to the provider
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Email",
    path = "/send-email",
    request_body = crate::domain::communication::requests::EmailSendRequest,
    responses(
        (status = 200, description = "Email sent", body = EmailSendOutcome, example = json!({ "success": true, "message": "Email sent successfully" })),
        (status = 400, description = "Malformed or invalid request", body = EmailSendOutcome, example = json!({ "success": false, "message": "Invalid request body" })),
        (status = 405, description = "Method other than POST", body = EmailSendOutcome, example = json!({ "success": false, "message": "Method not allowed" })),
        (status = 500, description = "The provider failed", body = EmailSendOutcome, example = json!({ "success": false, "message": "Failed to send email: <error>" })),
    )
)]
pub async fn handler<M: Mailer>(State(state): State<AppState<M>>, body: Bytes) -> Response {
    state.dispatcher.dispatch_json(&body).await.into_response()
}

/// Reject every method but POST
pub async fn method_not_allowed() -> ApiError {
    ApiError::new_405()
}
