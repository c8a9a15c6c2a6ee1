//! Line-level wire primitives
//!
//! [`Wire`] owns the buffered connection and provides the two operations
//! every line-oriented protocol is built from: send a command line, read
//! a response line. Both are bounded by the session timeout. Payload
//! reads (message bodies and other multi-line data) go through
//! [`PayloadReader`] with a larger line cap.

use std::borrow::Cow;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, trace};

use crate::constants::buffer::{PAYLOAD_CHUNK, READER_CAPACITY};
use crate::constants::line::{CRLF, PAYLOAD_MAX, RESPONSE_MAX};
use crate::error::SessionError;
use crate::stream::ConnectionStream;
use crate::types::{ServerTimeout, TextEncoding};

/// Buffered connection with line framing
pub struct Wire {
    reader: BufReader<ConnectionStream>,
    timeout: ServerTimeout,
    encoding: TextEncoding,
}

impl Wire {
    pub(crate) fn new(
        stream: ConnectionStream,
        timeout: ServerTimeout,
        encoding: TextEncoding,
    ) -> Self {
        Self {
            reader: BufReader::with_capacity(READER_CAPACITY, stream),
            timeout,
            encoding,
        }
    }

    /// Send one command line, CRLF-terminated
    pub async fn send_command(&mut self, command: &str) -> Result<(), SessionError> {
        debug!("C: {}", redact(command));

        let duration = self.timeout.as_duration();
        let io = async {
            self.reader.write_all(command.as_bytes()).await?;
            self.reader.write_all(CRLF).await?;
            self.reader.flush().await
        };
        tokio::time::timeout(duration, io)
            .await
            .map_err(|_| SessionError::Timeout { operation: "send" })??;
        Ok(())
    }

    /// Read one response line, with the terminator stripped
    pub async fn read_response(&mut self) -> Result<String, SessionError> {
        let line = self.read_line_capped(RESPONSE_MAX, "response").await?;
        trace!("S: {}", line);
        Ok(line)
    }

    /// Payload access for multi-line data following a response
    pub fn payload(&mut self) -> PayloadReader<'_> {
        PayloadReader { wire: self }
    }

    /// Read a line of at most `cap` bytes, stripping the CRLF or LF
    async fn read_line_capped(
        &mut self,
        cap: usize,
        operation: &'static str,
    ) -> Result<String, SessionError> {
        let duration = self.timeout.as_duration();
        let mut buf = Vec::with_capacity(128);

        let read = async {
            (&mut self.reader)
                .take(cap as u64)
                .read_until(b'\n', &mut buf)
                .await
        };
        let n = tokio::time::timeout(duration, read)
            .await
            .map_err(|_| SessionError::Timeout { operation })??;

        if n == 0 {
            return Err(SessionError::ConnectionClosed);
        }
        if buf.last() != Some(&b'\n') {
            // Either the line blew past the cap or the peer hung up mid-line
            if n >= cap {
                return Err(SessionError::LineTooLong { limit: cap });
            }
            return Err(SessionError::ConnectionClosed);
        }

        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        self.encoding.decode(buf)
    }
}

/// Reader for the data that follows a response line
///
/// Borrows the wire so no command can interleave with a payload read.
pub struct PayloadReader<'a> {
    wire: &'a mut Wire,
}

impl PayloadReader<'_> {
    /// Read exactly `len` bytes
    pub async fn read_exact(&mut self, len: u64) -> Result<Vec<u8>, SessionError> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let duration = self.wire.timeout.as_duration();
        // Cap the initial allocation; the server-claimed size is untrusted
        let mut data = Vec::with_capacity(len.min(PAYLOAD_CHUNK as u64) as usize);
        let mut chunk = vec![0u8; PAYLOAD_CHUNK];
        let mut remaining = len;

        while remaining > 0 {
            let want = remaining.min(PAYLOAD_CHUNK as u64) as usize;
            let n = tokio::time::timeout(duration, self.wire.reader.read(&mut chunk[..want]))
                .await
                .map_err(|_| SessionError::Timeout { operation: "payload" })??;
            if n == 0 {
                return Err(SessionError::ConnectionClosed);
            }
            data.extend_from_slice(&chunk[..n]);
            remaining -= n as u64;
        }

        Ok(data)
    }

    /// Read one payload line
    ///
    /// Payload lines get a larger cap than response lines; message bodies
    /// legitimately carry long lines.
    pub async fn read_line(&mut self) -> Result<String, SessionError> {
        self.wire.read_line_capped(PAYLOAD_MAX, "payload").await
    }
}

/// Hide credentials in command logging
fn redact(command: &str) -> Cow<'_, str> {
    let bytes = command.as_bytes();
    if bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"PASS") {
        Cow::Borrowed("PASS ***")
    } else {
        Cow::Borrowed(command)
    }
}
