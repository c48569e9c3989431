use std::sync::Arc;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionError};
use crate::router::Router;
use crate::server::listener::Accepted;

/// Everything a worker needs to serve one accepted client.
///
/// Created by the accept loop, moved into the worker that picks it up, and
/// dropped (closing the socket) when that worker's connection loop ends.
pub struct ClientContext {
    pub stream: TcpStream,
    pub peer_addr: String,
    pub peer_port: u16,
    pub peer_dns: String,
    pub local_addr: String,
    pub local_dns: String,
    pub config: Arc<Config>,
    pub router: Arc<Router>,
}

impl ClientContext {
    pub fn new(accepted: Accepted, config: Arc<Config>, router: Arc<Router>) -> Self {
        Self {
            stream: accepted.stream,
            peer_addr: accepted.peer_addr,
            peer_port: accepted.peer_port,
            peer_dns: accepted.peer_dns,
            local_addr: accepted.local_addr,
            local_dns: accepted.local_dns,
            config,
            router,
        }
    }

    /// Serves requests on this connection until it closes.
    pub async fn serve(self) {
        info!(
            peer = %self.peer_dns,
            port = self.peer_port,
            ip = %self.peer_addr,
            local = %self.local_addr,
            local_name = %self.local_dns,
            "client connected"
        );

        let mut conn = Connection::new(self.stream);
        match conn.run(&self.router).await {
            Ok(()) => debug!(peer = %self.peer_addr, port = self.peer_port, "client requested close"),
            Err(ConnectionError::Closed) => {
                debug!(peer = %self.peer_addr, port = self.peer_port, "client disconnected")
            }
            Err(e) => warn!(peer = %self.peer_addr, port = self.peer_port, error = %e, "connection closed"),
        }
    }
}
