//! POP3 command set
//!
//! [`Pop3`] plugs the POP3 exchanges into the generic [`Session`];
//! [`Pop3Client`] wraps that session in the mailbox operations: count,
//! retrieve, delete. Message numbers on the wire are 1-based; the
//! index-taking methods convert from 0-based.

pub mod response;

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::message::{MessageBuilder, RawMessage, RawMessageBuilder, RetrievedMessage};
use crate::session::{Protocol, Session, Wire};
use crate::types::MessageNumber;

/// Multi-line payloads end with a line holding only this character
pub const TERMINATOR: char = '.';

const TERMINATOR_LINE: &str = ".";

/// The POP3 protocol capability: `+OK` success lines, USER/PASS login,
/// QUIT sign-off
#[derive(Debug, Clone, Copy, Default)]
pub struct Pop3;

#[async_trait]
impl Protocol for Pop3 {
    fn check_result_ok(&self, line: &str) -> Result<(), SessionError> {
        if response::is_ok_response(line) {
            Ok(())
        } else {
            Err(SessionError::UnexpectedResponse {
                response: response::failure_message(line).to_string(),
            })
        }
    }

    async fn on_login(
        &self,
        wire: &mut Wire,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        debug!("Logging in as {}", username);

        wire.send_command(&format!("USER {}", username)).await?;
        let line = wire.read_response().await?;
        self.check_result_ok(&line)?;

        wire.send_command(&format!("PASS {}", password)).await?;
        let line = wire.read_response().await?;
        self.check_result_ok(&line)
    }

    async fn on_logout(&self, wire: &mut Wire) {
        // Best effort; the server closes the connection after QUIT anyway
        let _ = wire.send_command("QUIT").await;
    }
}

/// Diagnostic recorded when a sized payload is not followed by the
/// expected terminator line
///
/// The message was still delivered; the warning flags that the framing
/// after it looked wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramingWarning {
    uid: String,
    received: String,
}

impl FramingWarning {
    /// Identifier of the message whose framing looked wrong
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// The line received where the terminator was expected
    pub fn received(&self) -> &str {
        &self.received
    }
}

impl fmt::Display for FramingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expected \".\" in stream, but received \"{}\"",
            self.received
        )
    }
}

/// A POP3 mailbox client
///
/// ```no_run
/// use pop3_client::{ClientConfig, Pop3Client};
///
/// # async fn demo() -> Result<(), pop3_client::SessionError> {
/// let mut client = Pop3Client::open(
///     ClientConfig::new("pop.example.com", 110),
///     "alice",
///     "secret",
/// )
/// .await?;
///
/// for index in 0..client.message_count().await? {
///     let message = client.get_message(index as u32, false).await?;
///     println!("{} bytes", message.len());
/// }
/// client.disconnect().await;
/// # Ok(())
/// # }
/// ```
pub struct Pop3Client {
    session: Session<Pop3>,
    warnings: Vec<FramingWarning>,
}

impl Pop3Client {
    /// Create a client; no connection is made until [`connect`]
    ///
    /// [`connect`]: Pop3Client::connect
    pub fn new(config: ClientConfig) -> Self {
        Self {
            session: Session::new(Pop3, config),
            warnings: Vec::new(),
        }
    }

    /// Connect and log in, in one call
    ///
    /// On failure the partially opened connection is closed without a
    /// QUIT.
    pub async fn open(
        config: ClientConfig,
        username: &str,
        password: &str,
    ) -> Result<Self, SessionError> {
        let mut client = Self::new(config);
        client.connect().await?;
        client.login(username, password).await?;
        Ok(client)
    }

    /// Open the connection and validate the server greeting
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        self.session.connect().await
    }

    /// Authenticate with USER and PASS
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        self.session.login(username, password).await
    }

    /// Send QUIT without closing the connection state
    pub async fn logout(&mut self) {
        self.session.logout().await
    }

    /// QUIT if authenticated, then tear the session down for good
    pub async fn disconnect(&mut self) {
        self.session.disconnect().await
    }

    /// Number of messages in the maildrop, via STAT
    pub async fn message_count(&mut self) -> Result<u64, SessionError> {
        self.session.check_authentication_status()?;

        let response = self.session.send_command_get_response("STAT").await?;
        self.session.check_result_ok(&response)?;
        Ok(response::stat_message_count(&response))
    }

    /// Retrieve the message at a 0-based index as raw bytes
    ///
    /// With `headers_only` the server is asked for the headers alone
    /// (TOP with zero body lines) instead of the full message (RETR).
    pub async fn get_message(
        &mut self,
        index: u32,
        headers_only: bool,
    ) -> Result<RawMessage, SessionError> {
        self.get_message_with(&RawMessageBuilder, index, headers_only)
            .await
    }

    /// Retrieve the message with the given wire identifier as raw bytes
    pub async fn get_message_by_uid(
        &mut self,
        uid: &str,
        headers_only: bool,
    ) -> Result<RawMessage, SessionError> {
        self.get_message_by_uid_with(&RawMessageBuilder, uid, headers_only)
            .await
    }

    /// Retrieve the message at a 0-based index through a custom builder
    pub async fn get_message_with<B: MessageBuilder>(
        &mut self,
        builder: &B,
        index: u32,
        headers_only: bool,
    ) -> Result<B::Message, SessionError> {
        let number = MessageNumber::from_index(index).to_string();
        self.fetch(builder, &number, headers_only).await
    }

    /// Retrieve the message with the given wire identifier through a
    /// custom builder
    pub async fn get_message_by_uid_with<B: MessageBuilder>(
        &mut self,
        builder: &B,
        uid: &str,
        headers_only: bool,
    ) -> Result<B::Message, SessionError> {
        self.fetch(builder, uid, headers_only).await
    }

    async fn fetch<B: MessageBuilder>(
        &mut self,
        builder: &B,
        uid: &str,
        headers_only: bool,
    ) -> Result<B::Message, SessionError> {
        self.session.check_authentication_status()?;

        let command = if headers_only {
            format!("TOP {} 0", uid)
        } else {
            format!("RETR {}", uid)
        };
        let response = self.session.send_command_get_response(&command).await?;

        // The hint is scanned before the success check; failure lines
        // never carry one
        let size_hint = response::octet_size_hint(&response);
        self.session.check_result_ok(&response)?;

        let mut message = {
            let mut payload = self.session.payload_reader()?;
            builder
                .build(&mut payload, headers_only, size_hint, TERMINATOR)
                .await?
        };
        message.set_uid(uid);

        // A sized read leaves the terminator line on the wire
        if size_hint.is_some() {
            self.confirm_terminator(uid).await?;
        }
        Ok(message)
    }

    /// Consume the terminator line after a sized payload
    ///
    /// A mismatch is recorded and logged, not raised: the message itself
    /// arrived intact, and some servers pad or mangle the trailing line.
    async fn confirm_terminator(&mut self, uid: &str) -> Result<(), SessionError> {
        let mut line = self.session.get_response().await?;
        if line.is_empty() {
            // Tolerate a single stray blank line before the terminator
            line = self.session.get_response().await?;
        }

        if line != TERMINATOR_LINE {
            let warning = FramingWarning {
                uid: uid.to_string(),
                received: line,
            };
            warn!("Message {}: {}", uid, warning);
            self.warnings.push(warning);
        }
        Ok(())
    }

    /// Delete the message at a 0-based index
    pub async fn delete_message(&mut self, index: u32) -> Result<(), SessionError> {
        let number = MessageNumber::from_index(index).to_string();
        self.delete_message_by_uid(&number).await
    }

    /// Delete the message with the given wire identifier
    pub async fn delete_message_by_uid(&mut self, uid: &str) -> Result<(), SessionError> {
        self.session
            .send_command_check_ok(&format!("DELE {}", uid))
            .await
    }

    /// Delete the message a retrieval produced, using its stamped
    /// identifier
    pub async fn delete_message_for<M: RetrievedMessage>(
        &mut self,
        message: &M,
    ) -> Result<(), SessionError> {
        self.delete_message_by_uid(message.uid()).await
    }

    /// Framing diagnostics collected so far
    pub fn warnings(&self) -> &[FramingWarning] {
        &self.warnings
    }

    /// Drain the collected framing diagnostics
    pub fn take_warnings(&mut self) -> Vec<FramingWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// The underlying session, for raw commands beyond the POP3 surface
    pub fn session_mut(&mut self) -> &mut Session<Pop3> {
        &mut self.session
    }

    pub fn host(&self) -> &str {
        self.session.host()
    }

    pub fn port(&self) -> u16 {
        self.session.port()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_disposed(&self) -> bool {
        self.session.is_disposed()
    }
}
