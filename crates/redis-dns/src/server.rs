//! UDP + TCP protocol server.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use hickory_server::ServerFuture;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tokio::net::UdpSocket;
use tracing::info;

use super::error::BindSnafu;
use super::error::DnsError;
use super::error::DnsResult;
use super::handler::DnsRequestHandler;

/// DNS server listening on one address over both UDP and TCP.
///
/// Both listeners share one [`DnsRequestHandler`].
pub struct DnsProtocolServer {
    server: ServerFuture<DnsRequestHandler>,
    local_addr: SocketAddr,
}

impl DnsProtocolServer {
    /// Bind UDP, then TCP on the same port.
    ///
    /// Binding port 0 picks a free UDP port and reuses it for TCP, which is
    /// what tests rely on.
    pub async fn bind(addr: SocketAddr, handler: DnsRequestHandler, tcp_timeout: Duration) -> DnsResult<Self> {
        let udp_socket = UdpSocket::bind(addr).await.context(BindSnafu { addr })?;
        let local_addr = udp_socket.local_addr().context(BindSnafu { addr })?;
        let tcp_listener = TcpListener::bind(local_addr).await.context(BindSnafu { addr: local_addr })?;

        info!(
            addr = %local_addr,
            zone = %handler.zone().apex,
            hostname = %handler.zone().hostname,
            "DNS server listening (UDP + TCP)"
        );

        let mut server = ServerFuture::new(handler);
        server.register_socket(udp_socket);
        server.register_listener(tcp_listener, tcp_timeout);

        Ok(Self { server, local_addr })
    }

    /// Address the listeners are bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until the listeners fail.
    pub async fn run(mut self) -> DnsResult<()> {
        self.server.block_until_done().await.map_err(|e| DnsError::Server { reason: e.to_string() })?;
        info!("DNS server stopped");
        Ok(())
    }

    /// Serve until `shutdown` completes, then drain in-flight requests.
    pub async fn run_until<F>(mut self, shutdown: F) -> DnsResult<()>
    where
        F: Future<Output = ()>,
    {
        let finished = tokio::select! {
            result = self.server.block_until_done() => Some(result),
            _ = shutdown => None,
        };

        match finished {
            Some(result) => result.map_err(|e| DnsError::Server { reason: e.to_string() })?,
            None => {
                info!("shutdown requested, stopping DNS server");
                self.server.shutdown_gracefully().await.map_err(|e| DnsError::Server { reason: e.to_string() })?;
            }
        }
        info!("DNS server stopped");
        Ok(())
    }
}
