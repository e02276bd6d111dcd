//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds a socket and spawns a Session task for each incoming
//! client. Sessions share nothing but the registry, the generator and the
//! immutable configuration in [`Shared`].

use crate::config::ListenConfig;
use crate::network::{Session, Shared};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{Instrument, error, info, instrument, warn};
use uuid::Uuid;

/// The Gateway accepts incoming TCP connections and spawns sessions.
pub struct Gateway {
    listener: TcpListener,
    nodelay: bool,
    shared: Shared,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(listen: &ListenConfig, shared: Shared) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(listen.address).await?;
        info!(address = %listener.local_addr()?, "Listener bound");
        Ok(Self {
            listener,
            nodelay: listen.nodelay,
            shared,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    continue;
                }
            };

            if self.nodelay
                && let Err(e) = stream.set_nodelay(true)
            {
                warn!(%addr, error = %e, "Failed to set TCP_NODELAY");
            }

            let id = Uuid::new_v4();
            info!(session = %id, %addr, "Connection accepted");
            let session = Session::new(id, addr, &self.shared);

            tokio::spawn(
                async move {
                    crate::metrics::session_opened();
                    match session.run(stream).await {
                        Ok(end) => info!(session = %id, %addr, ?end, "Connection closed"),
                        Err(e) => {
                            error!(session = %id, %addr, error = %e, code = e.error_code(), "Session error")
                        }
                    }
                    crate::metrics::session_closed();
                }
                .instrument(tracing::Span::current()),
            );
        }
    }
}
