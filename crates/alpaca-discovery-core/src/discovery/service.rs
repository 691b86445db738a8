//! Discovery prober service.
//!
//! One service owns one broadcast-enabled socket. It sends the request once
//! and listens until the window closes; dropping it closes the socket.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use log::{debug, error, warn};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::{timeout, Instant};

use crate::error::{DiscoveryError, MalformedResponse};
use crate::protocol::{parse_discovery_response, DISCOVERY_MESSAGE, DISCOVERY_PORT, MAX_RESPONSE_SIZE};
use crate::types::{DeviceList, DiscoveryResponse};

/// Limited broadcast address used when none is given
pub const DEFAULT_BROADCAST_ADDRESS: &str = "255.255.255.255";

/// Default listen window
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// When the receive loop stops listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenMode {
    /// Stop at the first receive that sees no data for the whole timeout,
    /// or once the window since the send has elapsed.
    #[default]
    FirstSilence,
    /// Keep listening through silent gaps until `send time + timeout`.
    UntilDeadline,
}

/// Discovery options
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Destination of the request; any IPv4 address or host name
    pub broadcast_address: String,
    /// Destination UDP port
    pub port: u16,
    /// Listen window
    pub timeout: Duration,
    pub listen_mode: ListenMode,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            broadcast_address: DEFAULT_BROADCAST_ADDRESS.to_string(),
            port: DISCOVERY_PORT,
            timeout: DEFAULT_TIMEOUT,
            listen_mode: ListenMode::default(),
        }
    }
}

/// Progress reported while a discovery runs.
#[derive(Debug)]
pub enum DiscoveryEvent<'a> {
    /// A reply was parsed and appended to the device list.
    Response {
        response: &'a DiscoveryResponse,
        raw: &'a [u8],
    },
    /// A datagram could not be parsed; the device list is unchanged.
    Malformed {
        from: SocketAddr,
        raw: &'a [u8],
        error: &'a MalformedResponse,
    },
    /// A socket failure ended the attempt.
    Aborted { error: &'a DiscoveryError },
}

/// Create an IPv4 UDP socket allowed to send broadcasts, bound to an
/// ephemeral port on all interfaces.
pub fn create_broadcast_socket() -> Result<std::net::UdpSocket, io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_broadcast(true)?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Single-shot discovery prober.
pub struct DiscoveryService {
    socket: UdpSocket,
    options: DiscoveryOptions,
}

impl DiscoveryService {
    /// Open the broadcast socket. Must be called inside a tokio runtime.
    pub fn new(options: DiscoveryOptions) -> Result<Self, DiscoveryError> {
        let std_socket = create_broadcast_socket().map_err(DiscoveryError::Socket)?;
        let socket = UdpSocket::from_std(std_socket).map_err(DiscoveryError::Socket)?;

        if let Ok(local) = socket.local_addr() {
            debug!("Discovery socket bound to {}", local);
        }

        Ok(Self { socket, options })
    }

    /// Send the discovery request once and return the resolved destination.
    pub async fn send_request(&self) -> Result<SocketAddr, DiscoveryError> {
        let target = self.resolve_target().await?;

        self.socket
            .send_to(DISCOVERY_MESSAGE, target)
            .await
            .map_err(|source| DiscoveryError::Send { target, source })?;

        debug!("Sent {} byte discovery request to {}", DISCOVERY_MESSAGE.len(), target);
        Ok(target)
    }

    /// Resolve the configured destination to an IPv4 socket address.
    async fn resolve_target(&self) -> Result<SocketAddr, DiscoveryError> {
        let host = self.options.broadcast_address.as_str();
        let port = self.options.port;
        let resolve_error = |source: io::Error| DiscoveryError::Resolve {
            target: format!("{}:{}", host, port),
            source,
        };

        let mut addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(resolve_error)?;

        addrs.find(SocketAddr::is_ipv4).ok_or_else(|| {
            resolve_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "address family not supported by the IPv4 discovery socket",
            ))
        })
    }

    /// Receive replies until the listen window closes.
    ///
    /// `sent_at` anchors the window; every datagram is reported through
    /// `on_event` before the next receive.
    pub async fn collect<F>(&self, sent_at: Instant, on_event: &mut F) -> Result<DeviceList, DiscoveryError>
    where
        F: FnMut(DiscoveryEvent<'_>),
    {
        let window = self.options.timeout;
        // None when the window is too large to represent; no deadline then.
        let deadline = sent_at.checked_add(window);
        let mut devices = DeviceList::new();
        let mut buf = vec![0u8; MAX_RESPONSE_SIZE];

        loop {
            let now = Instant::now();
            if deadline.is_some_and(|deadline| now >= deadline) {
                debug!("Listen window of {:?} elapsed", window);
                break;
            }

            let wait = match (self.options.listen_mode, deadline) {
                (ListenMode::UntilDeadline, Some(deadline)) => deadline - now,
                _ => window,
            };

            match timeout(wait, self.socket.recv_from(&mut buf)).await {
                Ok(Ok((len, from))) => {
                    let raw = &buf[..len];
                    match parse_discovery_response(raw, from) {
                        Ok(response) => {
                            debug!("Discovery response from {}: alpaca port {}", from, response.alpaca_port);
                            on_event(DiscoveryEvent::Response {
                                response: &response,
                                raw,
                            });
                            devices.push(response);
                        }
                        Err(error) => {
                            debug!("Malformed discovery response from {}: {}", from, error);
                            on_event(DiscoveryEvent::Malformed {
                                from,
                                raw,
                                error: &error,
                            });
                        }
                    }
                }
                Ok(Err(e)) => return Err(DiscoveryError::Receive(e)),
                Err(_) => {
                    if self.options.listen_mode == ListenMode::FirstSilence {
                        debug!("No response for {:?}, stopping", wait);
                        break;
                    }
                }
            }
        }

        Ok(devices)
    }

    /// Run one full discovery: open, send, listen, close.
    ///
    /// Socket failures are reported as [`DiscoveryEvent::Aborted`] and yield
    /// an empty list.
    pub async fn discover_once<F>(options: DiscoveryOptions, mut on_event: F) -> DeviceList
    where
        F: FnMut(DiscoveryEvent<'_>),
    {
        match Self::try_discover(options, &mut on_event).await {
            Ok(devices) => devices,
            Err(error) => {
                debug!("Discovery aborted: {}", error);
                on_event(DiscoveryEvent::Aborted { error: &error });
                DeviceList::new()
            }
        }
    }

    async fn try_discover<F>(options: DiscoveryOptions, on_event: &mut F) -> Result<DeviceList, DiscoveryError>
    where
        F: FnMut(DiscoveryEvent<'_>),
    {
        let service = Self::new(options)?;
        service.send_request().await?;
        let sent_at = Instant::now();
        service.collect(sent_at, on_event).await
    }
}

/// Broadcast a discovery request to `broadcast_address` on the standard port
/// and return every reply received within `timeout`.
///
/// Malformed replies and socket failures go to the logger.
pub async fn discover(broadcast_address: &str, timeout: Duration) -> DeviceList {
    let options = DiscoveryOptions {
        broadcast_address: broadcast_address.to_string(),
        timeout,
        ..DiscoveryOptions::default()
    };

    DiscoveryService::discover_once(options, |event| match event {
        DiscoveryEvent::Malformed { from, raw, error } => {
            warn!(
                "Received invalid JSON from {}: {} ({})",
                from.ip(),
                String::from_utf8_lossy(raw),
                error
            );
        }
        DiscoveryEvent::Aborted { error } => error!("Error during discovery: {}", error),
        DiscoveryEvent::Response { .. } => {}
    })
    .await
}
