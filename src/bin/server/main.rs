#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Email gateway server: HTTP when run standalone, Lambda when run inside AWS Lambda

use std::{env, sync::Arc};

use anyhow::{anyhow, Result};
use clap::Parser;
use postmark_gateway::{
    domain::communication::dispatcher::EmailDispatcher,
    infrastructure::{
        email::postmark::{PostmarkConfig, PostmarkMailer},
        function,
        http::{AppState, HttpServer, HttpServerConfig},
    },
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The Postmark configuration
    #[clap(flatten)]
    pub postmark: PostmarkConfig,
}

/// Set by the Lambda runtime in every function's environment
const LAMBDA_FUNCTION_NAME: &str = "AWS_LAMBDA_FUNCTION_NAME";

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let lambda = env::var_os(LAMBDA_FUNCTION_NAME).is_some();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if lambda {
        tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_current_span(false)
            .without_time()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    }

    if let Err(e) = dotenv {
        debug!("No .env file loaded: {}", e);
    }

    let args = Args::parse();

    let mailer = PostmarkMailer::new(args.postmark)?;
    let dispatcher = EmailDispatcher::new(Arc::new(mailer));

    if lambda {
        info!("Starting Lambda runtime");

        function::run(dispatcher).await.map_err(|e| anyhow!(e))
    } else {
        HttpServer::new(AppState::new(dispatcher), args.server)
            .await?
            .run()
            .await
    }
}
