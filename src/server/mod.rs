//! HTTP front end for the LTP service.
//!
//! A blocking `tiny_http` server. Each request only touches the in-memory
//! cache, so a single accept loop on its own thread is enough.

pub mod handlers;

pub use handlers::{route, HttpReply};

use crate::error::ServerError;
use crate::services::PriceService;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Header, Response, Server, StatusCode};

/// A bound HTTP server, ready to serve.
pub struct HttpServer {
    server: Arc<Server>,
}

/// Stops a running [`HttpServer::serve`] loop from another thread.
#[derive(Clone)]
pub struct ShutdownHandle {
    server: Arc<Server>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.server.unblock();
    }
}

impl HttpServer {
    /// Bind to `addr` (e.g. "0.0.0.0:8080").
    pub fn bind(addr: &str) -> Result<Self, ServerError> {
        let server = Server::http(addr).map_err(|e| ServerError::Bind(format!("{}: {}", addr, e)))?;
        Ok(Self {
            server: Arc::new(server),
        })
    }

    /// The address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            server: self.server.clone(),
        }
    }

    /// Serve requests until the shutdown handle is triggered. Blocks the calling thread.
    pub fn serve(self, service: Arc<dyn PriceService>) {
        if let Some(addr) = self.local_addr() {
            tracing::info!("HTTP server listening on http://{}", addr);
        }

        for request in self.server.incoming_requests() {
            let reply = route(request.method(), request.url(), service.as_ref());
            tracing::debug!(
                method = %request.method(),
                url = %request.url(),
                status = reply.status,
                "Handled request"
            );

            if let Err(e) = request.respond(json_response(reply)) {
                tracing::warn!(error = %e, "Failed to write response");
            }
        }

        tracing::info!("HTTP server stopped");
    }
}

fn json_response(reply: HttpReply) -> Response<Cursor<Vec<u8>>> {
    let headers = "Content-Type: application/json"
        .parse::<Header>()
        .into_iter()
        .collect();
    let body = reply.body.into_bytes();
    let len = body.len();
    Response::new(StatusCode(reply.status), headers, Cursor::new(body), Some(len), None)
}
