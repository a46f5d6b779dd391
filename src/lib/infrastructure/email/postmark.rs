//! Postmark email provider implementation

use std::fmt;

use anyhow::{anyhow, ensure, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clap::Parser;
use reqwest::{header::ACCEPT, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::communication::mailer::{Mailer, MailerError, Message, SendReceipt};

/// Postmark configuration
#[derive(Clone, Parser)]
pub struct PostmarkConfig {
    /// The Postmark server API token
    #[clap(long, env = "POSTMARK_SERVER_TOKEN", hide_env_values = true)]
    pub server_token: String,

    /// The Postmark API base URL
    #[clap(long, env = "POSTMARK_API_URL", default_value = PostmarkMailer::API_URL)]
    pub api_url: String,
}

impl fmt::Debug for PostmarkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostmarkConfig")
            .field("server_token", &"[redacted]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Postmark mailer
#[derive(Debug, Clone)]
pub struct PostmarkMailer {
    client: Client,
    config: PostmarkConfig,
}

impl PostmarkMailer {
    /// The public Postmark API
    pub const API_URL: &'static str = "https://api.postmarkapp.com";

    const TOKEN_HEADER: &'static str = "X-Postmark-Server-Token";

    /// Create a new Postmark mailer
    pub fn new(config: PostmarkConfig) -> Result<Self> {
        ensure!(
            !config.server_token.trim().is_empty(),
            "POSTMARK_SERVER_TOKEN must not be empty"
        );

        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    fn email_url(&self) -> String {
        format!("{}/email", self.config.api_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    html_body: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    text_body: &'a str,
}

impl<'a> From<&'a Message> for PostmarkEmail<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            from: message.from.as_str(),
            to: message.to.as_str(),
            subject: &message.subject,
            html_body: &message.html_body,
            text_body: &message.text_body,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkResponse {
    error_code: i64,
    message: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "MessageID")]
    message_id: Option<String>,
}

#[async_trait]
impl Mailer for PostmarkMailer {
    async fn send_email(&self, message: &Message) -> Result<SendReceipt, MailerError> {
        debug!(to = %message.to, "sending email through Postmark");

        let response = self
            .client
            .post(self.email_url())
            .header(ACCEPT, "application/json")
            .header(Self::TOKEN_HEADER, &self.config.server_token)
            .json(&PostmarkEmail::from(message))
            .send()
            .await
            .map_err(|e| anyhow!("request to Postmark failed: {e}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("failed to read Postmark response: {e}"))?;

        let reply = match serde_json::from_str::<PostmarkResponse>(&body) {
            Ok(reply) => reply,
            Err(_) => {
                return Err(MailerError::UnexpectedResponse {
                    provider: "Postmark",
                    status: status.as_u16(),
                    body,
                })
            }
        };

        if reply.error_code != 0 {
            return Err(MailerError::Rejected {
                code: reply.error_code,
                message: reply.message,
            });
        }

        if !status.is_success() {
            return Err(MailerError::UnexpectedResponse {
                provider: "Postmark",
                status: status.as_u16(),
                body,
            });
        }

        Ok(SendReceipt {
            message_id: reply.message_id.unwrap_or_default(),
            to: reply.to.unwrap_or_else(|| message.to.to_string()),
            submitted_at: reply.submitted_at,
        })
    }
}
