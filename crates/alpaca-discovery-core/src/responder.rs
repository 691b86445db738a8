//! Device side of the discovery handshake.
//!
//! Answers `alpacadiscovery1` requests with the Alpaca API port. Uses
//! SO_REUSEPORT so it can share the discovery port with other listeners.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, info, warn};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::protocol::{discovery_reply, DISCOVERY_MESSAGE, MAX_REQUEST_SIZE};

/// Pause after a receive error before listening again
const ERROR_BACKOFF: Duration = Duration::from_millis(500);

/// Create a UDP socket with SO_REUSEPORT bound to `addr`.
pub fn create_reusable_socket(addr: SocketAddr) -> Result<std::net::UdpSocket, io::Error> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_reuse_address(true)?;

    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Discovery responder advertising a single Alpaca API port.
pub struct DiscoveryResponder {
    socket: UdpSocket,
    alpaca_port: u16,
}

impl DiscoveryResponder {
    /// Bind the responder. Must be called inside a tokio runtime.
    pub fn bind(addr: SocketAddr, alpaca_port: u16) -> Result<Self, io::Error> {
        let std_socket = create_reusable_socket(addr)?;
        let socket = UdpSocket::from_std(std_socket)?;
        info!(
            "Alpaca discovery listening on UDP {} (Alpaca port {})",
            socket.local_addr()?,
            alpaca_port
        );

        Ok(Self { socket, alpaca_port })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, io::Error> {
        self.socket.local_addr()
    }

    /// Wait for one datagram and answer it if it is a discovery request.
    ///
    /// Returns the peer that was answered, or `None` for ignored packets.
    pub async fn handle_next(&self) -> Result<Option<SocketAddr>, io::Error> {
        let mut buf = [0u8; MAX_REQUEST_SIZE];
        let (len, peer) = self.socket.recv_from(&mut buf).await?;
        debug!("Received UDP packet of size {} from {}", len, peer);

        if &buf[..len] != DISCOVERY_MESSAGE {
            debug!("Ignoring non-Alpaca discovery packet from {}", peer);
            return Ok(None);
        }

        let reply = discovery_reply(self.alpaca_port);
        self.socket.send_to(&reply, peer).await?;
        info!("Discovery response sent to {}", peer);

        Ok(Some(peer))
    }

    /// Answer discovery requests until the task is dropped.
    pub async fn run(&self) {
        loop {
            if let Err(e) = self.handle_next().await {
                warn!("Discovery responder error: {}", e);
                if let Some(pause) = backoff_after(&e) {
                    tokio::time::sleep(pause).await;
                }
            }
        }
    }
}

/// How long to wait before the next receive after `error`.
///
/// A reset or refusal is an ICMP bounce from an earlier reply and says
/// nothing about this socket, so listening resumes at once.
fn backoff_after(error: &io::Error) -> Option<Duration> {
    match error.kind() {
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::Interrupted => None,
        _ => Some(ERROR_BACKOFF),
    }
}
