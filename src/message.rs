//! Message retrieval seam
//!
//! Retrieval commands hand the payload to a [`MessageBuilder`], so callers
//! decide how message bytes become a value: parse them, stream them to
//! disk, or just keep them raw. [`RawMessageBuilder`] is the bundled
//! implementation that collects the payload verbatim.

use async_trait::async_trait;

use crate::constants::line::CRLF;
use crate::error::SessionError;
use crate::session::PayloadReader;

/// A message produced by a retrieval command
///
/// The only contract is carrying the identifier the message was fetched
/// under; the session stamps it after the builder runs.
pub trait RetrievedMessage: Send {
    fn uid(&self) -> &str;
    fn set_uid(&mut self, uid: &str);
}

/// Builds a message value from the payload following a retrieval response
#[async_trait]
pub trait MessageBuilder: Send + Sync {
    type Message: RetrievedMessage;

    /// Consume the payload of one retrieved message
    ///
    /// With a size hint the builder must read exactly that many bytes and
    /// leave the terminator line on the wire. Without one it must consume
    /// lines up to and including the terminator line.
    async fn build(
        &self,
        payload: &mut PayloadReader<'_>,
        headers_only: bool,
        size_hint: Option<u64>,
        terminator: char,
    ) -> Result<Self::Message, SessionError>;
}

/// A message kept as raw bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    uid: String,
    bytes: Vec<u8>,
}

impl RawMessage {
    /// The message content as received, CRLF line endings included
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl RetrievedMessage for RawMessage {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn set_uid(&mut self, uid: &str) {
        self.uid = uid.to_string();
    }
}

/// Collects the payload into a [`RawMessage`] without interpreting it
///
/// Lines are not dot-unstuffed; the bytes are exactly what the server
/// sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawMessageBuilder;

#[async_trait]
impl MessageBuilder for RawMessageBuilder {
    type Message = RawMessage;

    async fn build(
        &self,
        payload: &mut PayloadReader<'_>,
        _headers_only: bool,
        size_hint: Option<u64>,
        terminator: char,
    ) -> Result<RawMessage, SessionError> {
        let bytes = match size_hint {
            Some(len) => payload.read_exact(len).await?,
            None => {
                let terminator_line = terminator.to_string();
                let mut bytes = Vec::new();
                loop {
                    let line = payload.read_line().await?;
                    if line == terminator_line {
                        break;
                    }
                    bytes.extend_from_slice(line.as_bytes());
                    bytes.extend_from_slice(CRLF);
                }
                bytes
            }
        };

        Ok(RawMessage {
            uid: String::new(),
            bytes,
        })
    }
}
