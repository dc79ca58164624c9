//! Server lifecycle — bind to an address, then serve the router.
//!
//! Binding and serving are separate steps so tests can bind port 0 and read
//! the assigned address before any request is made.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::routes::CallbackRoutes;

/// Local callback server, configured with a bind host and port.
pub struct CallbackServer {
    host: String,
    port: u16,
    routes: CallbackRoutes,
}

impl CallbackServer {
    /// Create a server for `host:port` with an empty route table.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            routes: CallbackRoutes::new(),
        }
    }

    /// Handle to the route table. Clones share the same table, so routes
    /// registered through any handle are visible to the running server.
    #[must_use]
    pub fn routes(&self) -> CallbackRoutes {
        self.routes.clone()
    }

    /// Bind the TCP listener.
    ///
    /// # Errors
    ///
    /// Returns an error when the address cannot be bound.
    pub async fn bind(&self) -> std::io::Result<BoundServer> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        let addr = listener.local_addr()?;
        tracing::info!(addr = %addr, "callback server listening");
        Ok(BoundServer {
            listener,
            router: crate::router::build(self.routes.clone()),
        })
    }
}

/// A bound, not-yet-serving callback server.
pub struct BoundServer {
    listener: TcpListener,
    router: axum::Router,
}

impl BoundServer {
    /// The address the listener is bound to (resolves port 0).
    ///
    /// # Errors
    ///
    /// Returns an error when the local address cannot be read.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve requests until the `shutdown` future completes.
    ///
    /// # Errors
    ///
    /// Returns an error when the accept loop fails.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Serve requests forever.
    ///
    /// # Errors
    ///
    /// Returns an error when the accept loop fails.
    pub async fn serve(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulebridge_app::ports::CallbackHost;

    #[tokio::test]
    async fn should_bind_ephemeral_port() {
        let server = CallbackServer::new("127.0.0.1", 0);
        let bound = server.bind().await.unwrap();
        let addr = bound.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn should_share_route_table_between_handles() {
        let server = CallbackServer::new("127.0.0.1", 0);
        let a = server.routes();
        let b = server.routes();
        a.register_redirect("/welcome/", "https://www.google.com/");
        assert!(b.lookup("/welcome").is_some());
    }

    #[tokio::test]
    async fn should_stop_serving_on_shutdown_signal() {
        let server = CallbackServer::new("127.0.0.1", 0);
        let bound = server.bind().await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(bound.serve_with_shutdown(async move {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        task.await.unwrap().unwrap();
    }
}
