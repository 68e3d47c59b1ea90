//! HTTP listener implementation.
//!
//! Accepts incoming connections and serves each one on its own task.

use crate::service::handle_request;
use crate::state::AppState;
use crate::util::generate_connection_id;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

/// HTTP server error.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    BindError {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read local address: {0}")]
    LocalAddrError(#[source] std::io::Error),
}

/// HTTP server bound to a single address.
pub struct HttpServer {
    /// TCP listener.
    listener: TcpListener,
    /// Address actually bound (resolves port 0).
    local_addr: SocketAddr,
    /// State shared with every handler.
    state: AppState,
}

impl HttpServer {
    /// Bind the listener.
    pub async fn bind(address: SocketAddr, state: AppState) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::BindError { address, source })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddrError)?;

        info!(listen = %local_addr, "http listener bound");

        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    /// Get the bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the server, accepting connections until shutdown.
    #[instrument(skip_all, fields(listen = %self.local_addr))]
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!("http server starting");

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, addr)) => {
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                _ = shutdown.recv() => {
                    info!("http server shutting down");
                    break;
                }
            }
        }
    }

    /// Serve a connection on a new task.
    fn handle_connection(&self, stream: TcpStream, client_addr: SocketAddr) {
        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "failed to set TCP_NODELAY on client connection");
        }

        let state = self.state.clone();
        let connection_id = generate_connection_id();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| handle_request(req, state.clone()));

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(
                    connection_id = %connection_id,
                    client = %client_addr,
                    error = %e,
                    "connection error"
                );
            } else {
                debug!(
                    connection_id = %connection_id,
                    client = %client_addr,
                    "connection closed"
                );
            }
        });
    }
}
