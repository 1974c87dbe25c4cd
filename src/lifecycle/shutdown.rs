//! Stop signal shared by running servers and whoever decides to stop them.

use std::future::Future;

use tokio::sync::broadcast;

/// Handle for requesting a graceful stop.
///
/// Each [`HttpServer::run`](crate::http::HttpServer::run) takes a
/// [`Shutdown::signal`] future; [`Shutdown::trigger`] completes every
/// outstanding one, after which the servers drain in-flight dispatches.
#[derive(Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// Future completing once a stop is requested.
    ///
    /// Subscribes immediately, so a trigger after this call is never missed.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.notify.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Request a stop. Returns how many servers were waiting.
    pub fn trigger(&self, reason: &str) -> usize {
        let waiting = self.notify.send(()).unwrap_or(0);
        tracing::info!(reason, waiting, "Shutdown requested");
        waiting
    }

    pub fn waiting(&self) -> usize {
        self.notify.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
