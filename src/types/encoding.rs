//! Response text decoding policy
//!
//! Commands are always written to the wire as the raw bytes of the command
//! string plus CRLF. Responses are decoded separately according to the
//! configured policy below, so a permissive deployment can keep working
//! against servers that emit mislabeled or legacy bytes in response lines.
//! The send and receive paths are deliberately independent.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// How received response and payload lines are decoded into text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// Strict UTF-8; a malformed sequence fails the read with a protocol error
    #[default]
    Utf8,
    /// Lossy UTF-8; malformed sequences become U+FFFD replacement characters
    Utf8Lossy,
}

impl TextEncoding {
    /// Decode a complete line (terminator already stripped) per this policy
    pub fn decode(self, bytes: Vec<u8>) -> Result<String, SessionError> {
        match self {
            Self::Utf8 => {
                String::from_utf8(bytes).map_err(|source| SessionError::InvalidUtf8 { source })
            }
            Self::Utf8Lossy => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}
