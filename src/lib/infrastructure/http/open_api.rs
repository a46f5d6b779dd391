//! OpenAPI module

use utoipa::OpenApi;

use crate::{
    domain::communication::requests::{EmailSendOutcome, EmailSendRequest},
    infrastructure::http::handlers::send_email,
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Postmark Gateway"),
    paths(send_email::handler),
    components(schemas(EmailSendRequest, EmailSendOutcome))
)]
pub struct ApiDocs;
