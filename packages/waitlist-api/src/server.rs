//! Hyper server setup and request handling.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::{Request, Response, Result as HyperResult};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use crate::router::Router;

/// HTTP server for the wait list API.
pub struct Server {
    addr: SocketAddr,
    router: Arc<Router>,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to
    /// * `router` - Request router
    pub fn new(addr: SocketAddr, router: Router) -> Self {
        Self {
            addr,
            router: Arc::new(router),
        }
    }

    /// Serves requests until `shutdown` resolves.
    ///
    /// # Returns
    /// `Result<(), std::io::Error>` indicating success or failure.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve_listener(listener, shutdown).await
    }

    /// Serves requests on an already bound listener until `shutdown` resolves.
    ///
    /// Open connections are aborted on shutdown, so once this returns no
    /// copy of the router, and none of its request senders, remains alive.
    pub async fn serve_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Server listening on http://{}", listener.local_addr()?);
        tokio::pin!(shutdown);
        let mut connections = JoinSet::new();

        loop {
            while connections.try_join_next().is_some() {}

            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = &mut shutdown => {
                    tracing::info!(
                        "Server stopped accepting connections, closing {} open",
                        connections.len()
                    );
                    break;
                }
            };
            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);

            connections.spawn(async move {
                let builder = ConnectionBuilder::new(TokioExecutor::new());
                if let Err(err) = builder
                    .serve_connection(
                        io,
                        hyper::service::service_fn(move |req| handle_request(req, router.clone())),
                    )
                    .await
                {
                    tracing::warn!("Error serving connection from {}: {}", peer, err);
                }
            });
        }

        connections.shutdown().await;
        Ok(())
    }
}

/// Handles an incoming HTTP request.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> HyperResult<Response<Full<Bytes>>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = match router.route(req).await {
        Ok(response) => response,
        Err(err) => err.into(),
    };
    tracing::debug!("{} {} -> {}", method, path, response.status());
    Ok(response.map(Full::new))
}
