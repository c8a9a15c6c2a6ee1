//! Minimal async client for line-oriented command/response protocols,
//! with a POP3 command set.
//!
//! The crate splits into two layers. [`Session`] handles everything a
//! line protocol needs regardless of which protocol it is: opening the
//! socket with a timeout, optional TLS, sending command lines, reading
//! response lines, and refusing operations in the wrong state. The
//! [`Protocol`] trait plugs the protocol-specific exchanges into that
//! session; [`Pop3Client`] is the shipped POP3 implementation.
//!
//! # Example
//!
//! ```no_run
//! use pop3_client::{ClientConfig, Pop3Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pop3_client::SessionError> {
//!     let mut client = Pop3Client::open(
//!         ClientConfig::new("pop.example.com", 110),
//!         "alice",
//!         "secret",
//!     )
//!     .await?;
//!
//!     let count = client.message_count().await?;
//!     println!("{} messages waiting", count);
//!
//!     if count > 0 {
//!         let message = client.get_message(0, true).await?;
//!         println!("first headers: {} bytes", message.len());
//!     }
//!
//!     client.disconnect().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod message;
pub mod network;
pub mod pop3;
pub mod session;
pub mod stream;
pub mod tls;
pub mod types;

pub use config::{ClientConfig, ConfigError};
pub use error::SessionError;
pub use message::{MessageBuilder, RawMessage, RawMessageBuilder, RetrievedMessage};
pub use pop3::{FramingWarning, Pop3, Pop3Client};
pub use session::{PayloadReader, Protocol, Session, Wire};
pub use stream::ConnectionStream;
pub use tls::{TlsConfig, TlsManager};
pub use types::{MessageNumber, ServerTimeout, TextEncoding};
