use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::{lookup_host, TcpListener, TcpSocket};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::Config;
use crate::files::Resolver;
use crate::http::connection::Connection;

/// Pending connections the OS queues while one is being served.
pub const BACKLOG: u32 = 1;

/// Owns the listening socket and serves connections one at a time.
pub struct Server {
    listener: TcpListener,
    resolver: Resolver,
    shutdown: watch::Receiver<bool>,
    shutdown_tx: watch::Sender<bool>,
}

/// Stops a running [`Server`] from another task.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Makes the server return from [`Server::run`] at its next accept.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

impl Server {
    /// Binds the configured address with address reuse and a backlog of one.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let listen_addr = cfg.server.listen_addr();
        let addr = lookup_host(&listen_addr)
            .await
            .with_context(|| format!("failed to resolve {}", listen_addr))?
            .next()
            .with_context(|| format!("no address for {}", listen_addr))?;

        let listener = listen(addr).with_context(|| format!("failed to bind {}", addr))?;
        info!("Listening on {}", listener.local_addr()?);
        info!("Serving files from {}", cfg.static_files.root.display());

        let (shutdown_tx, shutdown) = watch::channel(false);

        Ok(Self {
            listener,
            resolver: Resolver::new(&cfg.static_files.root),
            shutdown,
            shutdown_tx,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Accepts and fully serves connections until stopped.
    ///
    /// A connection is handled to completion before the next accept, so a
    /// stop request takes effect once the in-flight connection is closed.
    /// The listening socket is released when this returns.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            if *self.shutdown.borrow() {
                break;
            }

            info!("Waiting for a connection");
            let accepted = tokio::select! {
                res = self.listener.accept() => res,
                _ = self.shutdown.changed() => continue,
            };

            let (socket, peer) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };
            info!(%peer, "Accepted connection");

            let mut conn = Connection::new(socket, self.resolver.clone());
            if let Err(e) = conn.run().await {
                warn!(%peer, "Connection error: {}", e);
            }
        }

        info!("Server stopped");
        Ok(())
    }
}

fn listen(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };

    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(BACKLOG)
}
