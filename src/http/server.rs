//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that forwards every request to the dispatcher
//! - Wire up middleware (tracing, request ID, request deadline)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::http::request::{incoming_from_parts, request_id, X_REQUEST_ID};
use crate::http::response::into_http;

/// Application state injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub static_root: Arc<PathBuf>,
}

/// HTTP front end for a frozen dispatcher.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `dispatcher`.
    pub fn new(config: AppConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher,
            static_root: Arc::new(PathBuf::from(&config.static_files.root)),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The Axum router, for driving the server without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` completes, then drain.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Fallback handler: every request goes through the route table.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers);

    let incoming = match incoming_from_parts(&parts, body).await {
        Ok(incoming) => incoming,
        Err(rejection) => {
            tracing::debug!(request_id = %request_id, error = %rejection, "Request rejected");
            return rejection.into_response();
        }
    };

    let report = state.dispatcher.dispatch(incoming).await;
    tracing::debug!(
        request_id = %request_id,
        outcome = report.outcome.label(),
        handlers_run = report.handlers_run,
        "Dispatch finished"
    );

    into_http(report, parts, &state.static_root, &request_id).await
}
