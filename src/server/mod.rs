//! Accept loop and connection dispatch.
//!
//! One task accepts connections and hands each to the worker pool; a worker
//! then owns that connection until it closes.

pub mod client;
pub mod listener;
pub mod pool;
pub mod shutdown;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::router::Router;
use client::ClientContext;
use listener::ListeningSocket;
use pool::WorkerPool;

pub struct Server {
    config: Arc<Config>,
    router: Arc<Router>,
    socket: ListeningSocket,
}

impl Server {
    /// Binds the listening socket. A failure here means the server never starts.
    pub fn bind(config: Config, router: Router) -> anyhow::Result<Self> {
        let socket = ListeningSocket::bind_and_listen(config.port, config.family)?
            .with_reverse_dns(config.reverse_dns);

        Ok(Self {
            config: Arc::new(config),
            router: Arc::new(router),
            socket,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Accepts and dispatches connections until `signal` resolves or an
    /// accept fails, then stops the worker pool.
    pub async fn run<F>(self, signal: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(addr = ?self.local_addr().ok(), "accepting connections");

        let pool = WorkerPool::new(self.config.workers, self.config.queue_capacity);
        tokio::pin!(signal);

        loop {
            let accepted = tokio::select! {
                res = self.socket.accept() => res,
                _ = &mut signal => {
                    info!("shutdown signal received");
                    break;
                }
            };

            match accepted {
                Ok(accepted) => {
                    let ctx = ClientContext::new(
                        accepted,
                        Arc::clone(&self.config),
                        Arc::clone(&self.router),
                    );
                    if pool.dispatch(ctx.serve()).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(error = %e, "accept failed, stopping server");
                    break;
                }
            }
        }

        pool.shutdown().await;
        pool.join().await;
        Ok(())
    }
}
