//! Handler trait and continuation token.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::dispatch::request::Request;
use crate::dispatch::response::Response;

/// One stage of a handler chain.
///
/// A handler either calls [`Next::proceed`] to let the chain advance, or writes
/// a response through the [`Response`] sink to end it. Returning having done
/// neither stalls the chain.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: &'a mut Next,
    ) -> BoxFuture<'a, ()>;
}

/// Shared, type-erased handler as stored in route chains.
pub type BoxHandler = Arc<dyn Handler>;

/// Ordered handlers attached to one route.
pub type Chain = Vec<BoxHandler>;

/// Continuation token handed to each handler.
#[derive(Debug, Default)]
pub struct Next {
    calls: u32,
}

impl Next {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Signal that the chain should advance to the next handler.
    ///
    /// Only the first call counts; extra calls are reported as a defect by the
    /// dispatcher and otherwise ignored.
    pub fn proceed(&mut self) {
        self.calls = self.calls.saturating_add(1);
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }
}

/// Adapter for synchronous closures.
pub struct FnHandler<F>(F);

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut Request, &mut Response, &mut Next) + Send + Sync + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: &'a mut Next,
    ) -> BoxFuture<'a, ()> {
        (self.0)(req, res, next);
        Box::pin(std::future::ready(()))
    }
}

/// Adapter for closures returning a boxed future.
pub struct AsyncFnHandler<F>(F);

impl<F> Handler for AsyncFnHandler<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, &'a mut Next) -> BoxFuture<'a, ()>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a mut Request,
        res: &'a mut Response,
        next: &'a mut Next,
    ) -> BoxFuture<'a, ()> {
        (self.0)(req, res, next)
    }
}

/// Wrap a synchronous closure as a handler.
///
/// ```
/// use chain_router::dispatch::handler_fn;
///
/// let stamp = handler_fn(|req, _res, next| {
///     req.context.insert("seen", true);
///     next.proceed();
/// });
/// # let _ = stamp;
/// ```
pub fn handler_fn<F>(f: F) -> BoxHandler
where
    F: Fn(&mut Request, &mut Response, &mut Next) + Send + Sync + 'static,
{
    Arc::new(FnHandler(f))
}

/// Wrap an asynchronous closure as a handler.
///
/// ```
/// use chain_router::dispatch::async_handler_fn;
///
/// let slow = async_handler_fn(|_req, res, _next| {
///     Box::pin(async move {
///         tokio::task::yield_now().await;
///         res.send("done");
///     })
/// });
/// # let _ = slow;
/// ```
pub fn async_handler_fn<F>(f: F) -> BoxHandler
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, &'a mut Next) -> BoxFuture<'a, ()>
        + Send
        + Sync
        + 'static,
{
    Arc::new(AsyncFnHandler(f))
}
