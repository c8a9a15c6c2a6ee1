//! Core value types for the POP3 client
//!
//! This module provides the strongly-typed wrappers used throughout the
//! session and command set layers.

pub mod encoding;
pub mod message;
pub mod timeout;

pub use encoding::TextEncoding;
pub use message::MessageNumber;
pub use timeout::ServerTimeout;
