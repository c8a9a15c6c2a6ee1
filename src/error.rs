//! Session error types for the POP3 client
//!
//! This module provides detailed error types for the session layer and the
//! protocol command set, making it easier to diagnose and handle different
//! failure scenarios. Variants group into four categories exposed through
//! the `is_*` predicates: timeouts, protocol violations, state errors, and
//! transport errors.

use std::fmt;

/// Errors that can occur on a protocol session
#[derive(Debug)]
#[non_exhaustive]
pub enum SessionError {
    /// Connect attempt exceeded the configured timeout
    ConnectTimeout { host: String, port: u16 },

    /// A read or write exceeded the configured timeout
    Timeout { operation: &'static str },

    /// TCP connection or name resolution failed
    Connect {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    /// Server response failed the protocol's success check; carries the
    /// server's explanatory text
    UnexpectedResponse { response: String },

    /// Response line could not be decoded with the configured text encoding
    InvalidUtf8 { source: std::string::FromUtf8Error },

    /// A line exceeded the accepted length bound
    LineTooLong { limit: usize },

    /// Operation invoked after the session was disposed
    Disposed,

    /// Operation invoked before a successful connect
    NotConnected,

    /// Operation invoked before a successful login
    NotAuthenticated,

    /// Connect invoked on a session that is already connected
    AlreadyConnected,

    /// I/O error during communication
    Io(std::io::Error),

    /// Server closed the connection mid-exchange
    ConnectionClosed,

    /// TLS handshake failed
    Tls {
        host: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Trust root loading or TLS client configuration failed
    Certificate { detail: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectTimeout { host, port } => {
                write!(f, "Could not connect to {} on port {}: timed out", host, port)
            }
            Self::Timeout { operation } => {
                write!(f, "Timed out waiting for {}", operation)
            }
            Self::Connect { host, port, source } => {
                write!(f, "Failed to connect to {}:{}: {}", host, port, source)
            }
            Self::UnexpectedResponse { response } => {
                write!(f, "Unexpected response from server: {}", response)
            }
            Self::InvalidUtf8 { source } => {
                write!(f, "Response is not valid UTF-8: {}", source)
            }
            Self::LineTooLong { limit } => {
                write!(f, "Line exceeded the {} byte limit", limit)
            }
            Self::Disposed => write!(f, "Session has been disposed"),
            Self::NotConnected => write!(f, "Session is not connected"),
            Self::NotAuthenticated => write!(f, "Session is not authenticated"),
            Self::AlreadyConnected => write!(f, "Session is already connected"),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::ConnectionClosed => write!(f, "Connection closed by server"),
            Self::Tls { host, source } => {
                write!(f, "TLS handshake with '{}' failed: {}", host, source)
            }
            Self::Certificate { detail } => {
                write!(f, "Certificate setup failed: {}", detail)
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::InvalidUtf8 { source } => Some(source),
            Self::Io(e) => Some(e),
            Self::Tls { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl SessionError {
    /// Check if this is a timeout (connect or I/O deadline exceeded)
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectTimeout { .. } | Self::Timeout { .. })
    }

    /// Check if this is a protocol violation (response rejected or unreadable)
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedResponse { .. } | Self::InvalidUtf8 { .. } | Self::LineTooLong { .. }
        )
    }

    /// Check if this is a state error (guard failed before touching the network)
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::Disposed | Self::NotConnected | Self::NotAuthenticated | Self::AlreadyConnected
        )
    }

    /// Check if this is a transport failure (socket or TLS layer)
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. }
                | Self::Io(_)
                | Self::ConnectionClosed
                | Self::Tls { .. }
                | Self::Certificate { .. }
        )
    }

    /// Get the appropriate log level for this error
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        match self {
            // Guard failures are caller mistakes, not operational problems
            Self::Disposed
            | Self::NotConnected
            | Self::NotAuthenticated
            | Self::AlreadyConnected => tracing::Level::DEBUG,
            // Broken pipe means the peer went away mid-write; routine
            Self::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe => tracing::Level::DEBUG,
            // TLS and trust store problems need attention
            Self::Tls { .. } | Self::Certificate { .. } => tracing::Level::ERROR,
            // Timeouts, rejections, and connectivity errors might be transient
            _ => tracing::Level::WARN,
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
