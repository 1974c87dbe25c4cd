//! Demo application built on the router.
//!
//! Registers the sample routes served by the binary: a static index page,
//! constrained captures, query slicing, REST-style groups, a multi-stage
//! chain and a global timing middleware.

pub mod slice;

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::StatusCode;

use crate::config::RoutingConfig;
use crate::dispatch::{handler_fn, BoxHandler, Dispatcher, RouterBuilder};
use crate::routing::{Method, RouteError};

/// Consoles listed by `GET /consoles`.
pub const CONSOLES: [&str; 3] = ["Nintendo Switch", "Playstation 4", "Xbox One"];

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Global middleware: stamps `current_time` into the request context.
pub fn time_middleware() -> BoxHandler {
    handler_fn(|req, _res, next| {
        req.context.insert("current_time", now_millis());
        next.proceed();
    })
}

/// Register every demo route and freeze the result.
pub fn demo_router(options: RoutingConfig) -> Result<Dispatcher, RouteError> {
    let mut builder = RouterBuilder::new(options);

    builder.get("/", vec![handler_fn(|_req, res, _next| res.send_file("index.html"))])?;

    builder.get(
        "/:model/:action(edit|list|delete)/:id([0-9]+)",
        vec![handler_fn(|req, res, _next| {
            let model = req.param("model").unwrap_or_default();
            let action = req.param("action").unwrap_or_default();
            let id = req.param("id").unwrap_or_default();
            res.send(format!("You are on the {} screen of {} with id {}", action, model, id));
        })],
    )?;

    builder.get(
        "/consoles",
        vec![handler_fn(|req, res, _next| {
            let begin = req.query("begin").or_else(|| req.query("inicio"));
            let end = req.query("end").or_else(|| req.query("fim"));
            res.send_json(slice::slice_by_query(&CONSOLES, begin, end).to_vec());
        })],
    )?;

    builder
        .group("/games")?
        .get(vec![handler_fn(|_req, res, _next| res.send("Showing all games"))])?
        .post(vec![handler_fn(|_req, res, _next| {
            res.status(StatusCode::CREATED).send("Adding a new game");
        })])?;

    builder
        .group("/games/:id([0-9]+)")?
        .get(vec![handler_fn(|req, res, _next| {
            res.send(format!("Showing game with id {}", req.param("id").unwrap_or_default()));
        })])?
        .put(vec![handler_fn(|req, res, _next| {
            res.send(format!("Editing game with id {}", req.param("id").unwrap_or_default()));
        })])?
        .delete(vec![handler_fn(|req, res, _next| {
            res.send(format!("Deleting game with id {}", req.param("id").unwrap_or_default()));
        })])?;

    builder.route(Method::Get, "/multiple_functions", multiple_functions())?;

    builder.get(
        "/current_time",
        vec![handler_fn(|req, res, _next| {
            let now: u64 = req.context.get_as("current_time").unwrap_or_default();
            res.send(format!("The time is {}", now));
        })],
    )?;

    builder.use_global(time_middleware());

    Ok(builder.build())
}

/// Three stages sharing `begin_time` through the context.
fn multiple_functions() -> Vec<BoxHandler> {
    vec![
        handler_fn(|req, _res, next| {
            req.context.insert("begin_time", now_millis());
            tracing::info!("Stage 1");
            next.proceed();
        }),
        handler_fn(|_req, _res, next| {
            let mut acc = 0u64;
            for i in 0..100_000u64 {
                acc = std::hint::black_box(acc.wrapping_add(i));
            }
            tracing::info!(acc, "Stage 2");
            next.proceed();
        }),
        handler_fn(|req, res, _next| {
            tracing::info!("Final stage");
            let begin: u64 = req.context.get_as("begin_time").unwrap_or_else(now_millis);
            let diff = now_millis().saturating_sub(begin);
            res.send(format!("Finished in {}ms", diff));
        }),
    ]
}
