//! TCP connection establishment
//!
//! Resolves the server address and opens the socket under the configured
//! timeout, then applies socket tuning suited to interactive command and
//! response traffic.

use std::io;

use socket2::{SockRef, TcpKeepalive};
use tokio::net::{TcpStream, lookup_host};
use tracing::debug;

use crate::constants::socket::{KEEPALIVE_TIME, RECV_BUFFER, SEND_BUFFER};
use crate::error::SessionError;
use crate::types::ServerTimeout;

/// Open a TCP connection to `host:port`, bounded by `timeout`
///
/// Name resolution and the TCP handshake share a single timeout budget.
/// The first resolved address is used.
pub async fn connect(
    host: &str,
    port: u16,
    timeout: ServerTimeout,
) -> Result<TcpStream, SessionError> {
    let stream = tokio::time::timeout(timeout.as_duration(), open_stream(host, port))
        .await
        .map_err(|_| SessionError::ConnectTimeout {
            host: host.to_string(),
            port,
        })??;

    tune_socket(&stream);

    debug!("Connected to {}:{}", host, port);
    Ok(stream)
}

async fn open_stream(host: &str, port: u16) -> Result<TcpStream, SessionError> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|source| SessionError::Connect {
            host: host.to_string(),
            port,
            source,
        })?;

    let addr = addrs.next().ok_or_else(|| SessionError::Connect {
        host: host.to_string(),
        port,
        source: io::Error::new(io::ErrorKind::NotFound, "no addresses resolved"),
    })?;

    TcpStream::connect(addr)
        .await
        .map_err(|source| SessionError::Connect {
            host: host.to_string(),
            port,
            source,
        })
}

/// Apply socket options for low-latency request/response traffic
///
/// Failures here are logged and ignored; the connection works without
/// the tuning.
fn tune_socket(stream: &TcpStream) {
    let sock_ref = SockRef::from(stream);

    if let Err(e) = sock_ref.set_recv_buffer_size(RECV_BUFFER) {
        debug!("Failed to set receive buffer size: {}", e);
    }
    if let Err(e) = sock_ref.set_send_buffer_size(SEND_BUFFER) {
        debug!("Failed to set send buffer size: {}", e);
    }
    // Commands are short lines; never batch them
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let keepalive = TcpKeepalive::new().with_time(KEEPALIVE_TIME);
    if let Err(e) = sock_ref.set_tcp_keepalive(&keepalive) {
        debug!("Failed to set TCP keepalive: {}", e);
    }
}
