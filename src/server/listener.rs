use serde::Deserialize;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tracing::{debug, info, warn};

/// Backlog requested from `listen`; the kernel clamps it to its own maximum.
const LISTEN_BACKLOG: u32 = 4096;

/// Which address family the listening socket may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    #[default]
    Either,
}

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("unsupported address family {0:?}")]
    UnsupportedFamily(String),

    #[error("no candidate address could be bound on port {port}: {source}")]
    NoBindableAddress { port: u16, source: io::Error },

    #[error("listen failed on {addr}: {source}")]
    Listen { addr: SocketAddr, source: io::Error },

    #[error("accept failed: {0}")]
    Accept(io::Error),
}

impl FromStr for AddressFamily {
    type Err = ListenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ipv4" | "inet" => Ok(AddressFamily::Ipv4),
            "ipv6" | "inet6" => Ok(AddressFamily::Ipv6),
            "either" | "unspec" | "any" => Ok(AddressFamily::Either),
            _ => Err(ListenError::UnsupportedFamily(s.to_string())),
        }
    }
}

impl AddressFamily {
    /// Wildcard addresses to try, in order. For `Either` the IPv6 wildcard
    /// comes first since on most hosts it also accepts IPv4 peers.
    pub fn wildcard_candidates(self, port: u16) -> Vec<SocketAddr> {
        let v4 = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
        let v6 = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
        match self {
            AddressFamily::Ipv4 => vec![v4],
            AddressFamily::Ipv6 => vec![v6],
            AddressFamily::Either => vec![v6, v4],
        }
    }
}

/// A freshly accepted connection and what is known about both ends.
#[derive(Debug)]
pub struct Accepted {
    pub stream: TcpStream,
    pub peer_addr: String,
    pub peer_port: u16,
    pub peer_dns: String,
    pub local_addr: String,
    pub local_dns: String,
}

/// Passive socket bound to a wildcard address.
pub struct ListeningSocket {
    listener: TcpListener,
    family: AddressFamily,
    reverse_dns: bool,
}

impl ListeningSocket {
    /// Binds the first candidate wildcard address that accepts the bind and
    /// starts listening on it.
    pub fn bind_and_listen(port: u16, family: AddressFamily) -> Result<Self, ListenError> {
        let mut last_error = None;

        for addr in family.wildcard_candidates(port) {
            let attempt = || -> io::Result<TcpSocket> {
                let socket = match addr {
                    SocketAddr::V4(_) => TcpSocket::new_v4()?,
                    SocketAddr::V6(_) => TcpSocket::new_v6()?,
                };
                socket.set_reuseaddr(true)?;
                socket.bind(addr)?;
                Ok(socket)
            };

            match attempt() {
                Ok(socket) => {
                    let listener = socket
                        .listen(LISTEN_BACKLOG)
                        .map_err(|source| ListenError::Listen { addr, source })?;

                    let bound_family = match addr {
                        SocketAddr::V4(_) => AddressFamily::Ipv4,
                        SocketAddr::V6(_) => AddressFamily::Ipv6,
                    };
                    info!(%addr, "listening socket bound");

                    return Ok(Self {
                        listener,
                        family: bound_family,
                        reverse_dns: true,
                    });
                }
                Err(e) => {
                    debug!(%addr, error = %e, "bind candidate failed");
                    last_error = Some(e);
                }
            }
        }

        Err(ListenError::NoBindableAddress {
            port,
            source: last_error.unwrap_or_else(|| {
                io::Error::new(io::ErrorKind::AddrNotAvailable, "no candidate addresses")
            }),
        })
    }

    /// Enables or disables reverse DNS on accept. When disabled, names fall
    /// back to the printed address.
    pub fn with_reverse_dns(mut self, enabled: bool) -> Self {
        self.reverse_dns = enabled;
        self
    }

    /// Family of the address that was actually bound.
    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for the next connection. Interruptions are retried; any other
    /// failure is returned and should end the accept loop.
    pub async fn accept(&self) -> Result<Accepted, ListenError> {
        let (stream, peer) = loop {
            match self.listener.accept().await {
                Ok(pair) => break pair,
                Err(e) if is_interruption(&e) => continue,
                Err(e) => return Err(ListenError::Accept(e)),
            }
        };

        let peer_dns = self.resolve_name(peer.ip()).await;
        let local = best_effort_local_addr(stream.local_addr(), || self.listener.local_addr());
        let (local_addr, local_dns) = match local {
            Some(local) => (format_ip(&local), self.resolve_name(local.ip()).await),
            None => (String::new(), String::new()),
        };

        Ok(Accepted {
            stream,
            peer_addr: format_ip(&peer),
            peer_port: peer.port(),
            peer_dns,
            local_addr,
            local_dns,
        })
    }

    /// Best-effort reverse lookup; falls back to the address text.
    async fn resolve_name(&self, ip: IpAddr) -> String {
        if !self.reverse_dns {
            return ip.to_string();
        }

        match tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&ip)).await {
            Ok(Ok(name)) => name,
            Ok(Err(e)) => {
                debug!(%ip, error = %e, "reverse lookup failed");
                ip.to_string()
            }
            Err(_) => ip.to_string(),
        }
    }
}

fn is_interruption(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}

/// Local endpoint of an accepted connection. Queried on the accepted socket
/// since a dual-stack listener has no single local address; falls back to the
/// listener's address, then to nothing.
fn best_effort_local_addr(
    accepted: io::Result<SocketAddr>,
    listener: impl FnOnce() -> io::Result<SocketAddr>,
) -> Option<SocketAddr> {
    match accepted {
        Ok(local) => Some(local),
        Err(e) => {
            warn!(error = %e, "local address of accepted socket unavailable");
            listener().ok()
        }
    }
}

/// Prints the address part of `addr` in its family's notation.
pub fn format_ip(addr: &SocketAddr) -> String {
    match addr {
        SocketAddr::V4(v4) => v4.ip().to_string(),
        SocketAddr::V6(v6) => match v6.ip().to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => v6.ip().to_string(),
        },
    }
}
