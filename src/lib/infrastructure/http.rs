//! HTTP Server

use std::{
    future::Future,
    net::{Ipv4Addr, SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::Request,
    routing::{get, post},
    Json, Router,
};
use axum_server::Handle;
use clap::Parser;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{info, info_span};
use utoipa::OpenApi;

use crate::domain::communication::mailer::Mailer;

use handlers::{panic_handler, send_email};
use open_api::ApiDocs;

pub use state::AppState;

mod errors;
mod handlers;
mod open_api;
mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// How long in-flight requests may run after shutdown starts
    pub const GRACE_PERIOD: Duration = Duration::from_secs(10);

    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new<M: Mailer>(state: AppState<M>, config: HttpServerConfig) -> Result<Self> {
        let router = router(state);

        let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {}", config.port))?;
        listener
            .set_nonblocking(true)
            .context("failed to make listener non-blocking")?;

        Ok(Self { router, listener })
    }

    /// The address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to get local address")
    }

    /// Runs the HTTP server until Ctrl+C or SIGTERM arrives.
    #[mutants::skip]
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Runs the HTTP server until `signal` completes, then lets in-flight requests
    /// finish for up to [`Self::GRACE_PERIOD`].
    pub async fn run_until<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("HTTP Server listening on {}", self.local_addr()?);

        let handle = Handle::new();
        let shutdown = handle.clone();

        tokio::spawn(async move {
            signal.await;
            info!("Shutting down HTTP server");
            shutdown.graceful_shutdown(Some(Self::GRACE_PERIOD));
        });

        axum_server::from_tcp(self.listener)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await
            .context("server error")?;

        info!("HTTP server stopped");

        Ok(())
    }
}

/// Create the application's router
pub fn router<M: Mailer>(state: AppState<M>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .route(
            "/send-email",
            post(send_email::handler::<M>).fallback(send_email::method_not_allowed),
        )
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .layer(trace_layer)
        .layer(CatchPanicLayer::custom(panic_handler))
        .with_state(state)
}

#[mutants::skip]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
