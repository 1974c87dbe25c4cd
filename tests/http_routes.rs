//! HTTP-level tests for the demo routes and outcome mapping.

use axum::http::{header, StatusCode};

use chain_router::dispatch::{async_handler_fn, handler_fn, RouterBuilder};
use chain_router::http::X_REQUEST_ID;
use chain_router::Method;

mod common;

#[tokio::test]
async fn test_index_is_served_from_static_root() {
    let app = common::demo_app();
    let res = common::send(&app, "GET", "/").await;

    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "got {}", content_type);
    assert!(common::body_string(res).await.contains("<h1>Hello World</h1>"));
}

#[tokio::test]
async fn test_constrained_captures() {
    let app = common::demo_app();

    let res = common::send(&app, "GET", "/product/list/15").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        common::body_string(res).await,
        "You are on the list screen of product with id 15"
    );

    let res = common::send(&app, "GET", "/product/archive/15").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::body_string(res).await, "Cannot GET /product/archive/15");

    let res = common::send(&app, "GET", "/product/list/abc").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_consoles_query_slice() {
    let app = common::demo_app();

    let res = common::send(&app, "GET", "/consoles").await;
    assert_eq!(res.status(), StatusCode::OK);
    let all: Vec<String> = serde_json::from_str(&common::body_string(res).await).unwrap();
    assert_eq!(all, vec!["Nintendo Switch", "Playstation 4", "Xbox One"]);

    let res = common::send(&app, "GET", "/consoles?begin=1&end=2").await;
    let some: Vec<String> = serde_json::from_str(&common::body_string(res).await).unwrap();
    assert_eq!(some, vec!["Playstation 4"]);

    let res = common::send(&app, "GET", "/consoles?begin=oops&end=99").await;
    let clamped: Vec<String> = serde_json::from_str(&common::body_string(res).await).unwrap();
    assert_eq!(clamped.len(), 3);
}

#[tokio::test]
async fn test_rest_groups() {
    let app = common::demo_app();

    let res = common::send(&app, "POST", "/games").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(common::body_string(res).await, "Adding a new game");

    let res = common::send(&app, "PUT", "/games/4").await;
    assert_eq!(common::body_string(res).await, "Editing game with id 4");

    let res = common::send(&app, "DELETE", "/games").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::body_string(res).await, "Cannot DELETE /games");

    let res = common::send(&app, "GET", "/games/").await;
    assert_eq!(common::body_string(res).await, "Showing all games");
}

#[tokio::test]
async fn test_head_uses_get_route() {
    let app = common::demo_app();
    let res = common::send(&app, "HEAD", "/games").await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unsupported_method_is_not_found() {
    let app = common::demo_app();
    let res = common::send(&app, "TRACE", "/games").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = common::demo_app();
    let res = common::send(&app, "GET", "/current_time").await;
    assert!(res.headers().contains_key(&X_REQUEST_ID));
    assert!(common::body_string(res).await.starts_with("The time is "));
}

#[tokio::test]
async fn test_stalled_chain_is_server_error() {
    let mut builder = RouterBuilder::default();
    builder
        .route(Method::Get, "/stuck", vec![handler_fn(|_req, _res, _next| {})])
        .unwrap();
    let app = common::app_for(builder.build());

    let res = common::send(&app, "GET", "/stuck").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_chain_without_response_is_not_found() {
    let mut builder = RouterBuilder::default();
    builder
        .route(
            Method::Get,
            "/through",
            vec![handler_fn(|_req, _res, next| next.proceed())],
        )
        .unwrap();
    let app = common::app_for(builder.build());

    let res = common::send(&app, "GET", "/through").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::body_string(res).await, "Cannot GET /through");
}

#[tokio::test]
async fn test_file_outside_root_is_refused() {
    let mut builder = RouterBuilder::default();
    builder
        .route(
            Method::Get,
            "/escape",
            vec![handler_fn(|_req, res, _next| res.send_file("../Cargo.toml"))],
        )
        .unwrap();
    let app = common::app_for(builder.build());

    let res = common::send(&app, "GET", "/escape").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_handler_sees_body_and_sets_headers() {
    let mut builder = RouterBuilder::default();
    builder
        .route(
            Method::Post,
            "/echo",
            vec![async_handler_fn(|req, res, _next| {
                Box::pin(async move {
                    let body = String::from_utf8_lossy(req.body()).to_string();
                    res.set_header(
                        header::CONTENT_TYPE,
                        header::HeaderValue::from_static("text/plain"),
                    );
                    res.send(body);
                })
            })],
        )
        .unwrap();
    let app = common::app_for(builder.build());

    let res = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .method("POST")
            .uri("/echo")
            .body(axum::body::Body::from("ping"))
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(common::body_string(res).await, "ping");
}
