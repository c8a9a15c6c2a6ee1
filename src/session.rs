//! Protocol-agnostic client session
//!
//! [`Session`] owns the connection lifecycle for any line-oriented
//! command/response protocol: it opens the socket (optionally wrapping it
//! in TLS), tracks the connected/authenticated/disposed state, and guards
//! every operation against use in the wrong state. The protocol itself is
//! a capability supplied through the [`Protocol`] trait, so a POP3 session
//! and, say, an SMTP session differ only in the plugged-in command set.

pub mod wire;

use async_trait::async_trait;
use tracing::debug;

pub use wire::{PayloadReader, Wire};

use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::network;
use crate::stream::ConnectionStream;
use crate::tls::TlsManager;

/// The protocol-specific capabilities a session needs
///
/// Implementations decide what a success response looks like and how the
/// login and logout exchanges run. Everything else (socket handling,
/// timeouts, state tracking) lives in [`Session`].
#[async_trait]
pub trait Protocol: Send + Sync {
    /// Check a response line for success, extracting the failure reason
    /// on error
    fn check_result_ok(&self, line: &str) -> Result<(), SessionError>;

    /// Validate the server greeting received right after connecting
    fn on_connected(&self, greeting: &str) -> Result<(), SessionError> {
        self.check_result_ok(greeting)
    }

    /// Run the authentication exchange
    async fn on_login(
        &self,
        wire: &mut Wire,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError>;

    /// Run the sign-off exchange; must not fail
    async fn on_logout(&self, wire: &mut Wire);
}

/// A client session for protocol `P`
///
/// The lifecycle is connect, login, commands, disconnect. Once
/// disconnected the session is spent; operations on it return a state
/// error. Dropping a session without calling [`disconnect`] closes the
/// socket without the protocol sign-off.
///
/// [`disconnect`]: Session::disconnect
pub struct Session<P: Protocol> {
    protocol: P,
    config: ClientConfig,
    wire: Option<Wire>,
    connected: bool,
    authenticated: bool,
    disposed: bool,
}

impl<P: Protocol> Session<P> {
    /// Create a session; no connection is made until [`connect`]
    ///
    /// [`connect`]: Session::connect
    pub fn new(protocol: P, config: ClientConfig) -> Self {
        Self {
            protocol,
            config,
            wire: None,
            connected: false,
            authenticated: false,
            disposed: false,
        }
    }

    /// Open the connection and validate the server greeting
    ///
    /// Name resolution, the TCP handshake, the optional TLS handshake,
    /// and the greeting read are each bounded by the configured timeout.
    /// On any failure the session is left unconnected and the socket, if
    /// one was opened, is closed.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        if self.connected {
            return Err(SessionError::AlreadyConnected);
        }

        let timeout = self.config.timeout();
        let tcp = network::connect(&self.config.host, self.config.port, timeout).await?;

        let stream = if self.config.use_tls {
            let manager = TlsManager::new(self.config.tls_config())?;
            let handshake = manager.handshake(tcp, &self.config.host);
            let tls = tokio::time::timeout(timeout.as_duration(), handshake)
                .await
                .map_err(|_| SessionError::Timeout {
                    operation: "TLS handshake",
                })??;
            ConnectionStream::tls(tls)
        } else {
            ConnectionStream::plain(tcp)
        };

        // A failure from here on drops the local wire, closing the socket
        let mut wire = Wire::new(stream, timeout, self.config.encoding);
        let greeting = wire.read_response().await?;
        self.protocol.on_connected(&greeting)?;

        debug!("Session established with {}:{}", self.config.host, self.config.port);
        self.wire = Some(wire);
        self.connected = true;
        Ok(())
    }

    /// Authenticate via the protocol's login exchange
    ///
    /// A failed attempt leaves the session connected but unauthenticated;
    /// callers may retry with different credentials.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        self.check_connection_status()?;

        self.authenticated = false;
        let wire = self.wire.as_mut().ok_or(SessionError::NotConnected)?;
        self.protocol.on_login(wire, username, password).await?;
        self.authenticated = true;
        Ok(())
    }

    /// Run the protocol sign-off without closing the connection
    ///
    /// Never fails; sign-off is best effort on a connection that may
    /// already be gone.
    pub async fn logout(&mut self) {
        self.authenticated = false;
        if let Some(wire) = self.wire.as_mut() {
            self.protocol.on_logout(wire).await;
        }
    }

    /// Sign off if authenticated, then tear the session down
    ///
    /// Teardown is irreversible: every later operation, including a
    /// repeated disconnect, sees the disposed state (a repeated
    /// disconnect is simply a no-op).
    pub async fn disconnect(&mut self) {
        if self.authenticated {
            self.logout().await;
        }
        self.wire = None;
        self.connected = false;
        self.disposed = true;
    }

    /// Error unless the session is connected and usable
    pub fn check_connection_status(&self) -> Result<(), SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        Ok(())
    }

    /// Error unless the session is connected and authenticated
    pub fn check_authentication_status(&self) -> Result<(), SessionError> {
        self.check_connection_status()?;
        if !self.authenticated {
            return Err(SessionError::NotAuthenticated);
        }
        Ok(())
    }

    /// Send one command line
    pub async fn send_command(&mut self, command: &str) -> Result<(), SessionError> {
        self.wire_mut()?.send_command(command).await
    }

    /// Read one response line
    pub async fn get_response(&mut self) -> Result<String, SessionError> {
        self.wire_mut()?.read_response().await
    }

    /// Send a command and read its one-line response
    pub async fn send_command_get_response(
        &mut self,
        command: &str,
    ) -> Result<String, SessionError> {
        let wire = self.wire_mut()?;
        wire.send_command(command).await?;
        wire.read_response().await
    }

    /// Send a command and verify the response reports success
    pub async fn send_command_check_ok(&mut self, command: &str) -> Result<(), SessionError> {
        let response = self.send_command_get_response(command).await?;
        self.protocol.check_result_ok(&response)
    }

    /// Check a response line using the protocol's success rule
    pub fn check_result_ok(&self, line: &str) -> Result<(), SessionError> {
        self.protocol.check_result_ok(line)
    }

    /// Payload access for multi-line data following a response
    pub fn payload_reader(&mut self) -> Result<PayloadReader<'_>, SessionError> {
        Ok(self.wire_mut()?.payload())
    }

    fn wire_mut(&mut self) -> Result<&mut Wire, SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        self.wire.as_mut().ok_or(SessionError::NotConnected)
    }

    /// The configured server hostname
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// The configured server port
    pub fn port(&self) -> u16 {
        self.config.port
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
