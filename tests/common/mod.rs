//! Shared utilities for integration tests.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;

use chain_router::app::demo_router;
use chain_router::config::AppConfig;
use chain_router::{Dispatcher, HttpServer};

/// Config whose static root points at the repository's `templates/`.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.static_files.root = format!("{}/templates", env!("CARGO_MANIFEST_DIR"));
    config.timeouts.request_secs = 5;
    config
}

/// Axum app serving `dispatcher`.
#[allow(dead_code)]
pub fn app_for(dispatcher: Dispatcher) -> Router {
    HttpServer::new(test_config(), dispatcher).into_router()
}

/// Axum app serving the demo routes.
#[allow(dead_code)]
pub fn demo_app() -> Router {
    let config = test_config();
    let dispatcher = demo_router(config.routing.clone()).unwrap();
    app_for(dispatcher)
}

/// Send one request through the app without a socket.
#[allow(dead_code)]
pub async fn send(app: &Router, method: &str, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(res: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
