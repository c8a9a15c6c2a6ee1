//! Timeout newtype for type-safe timeout handling
//!
//! A strongly-typed wrapper around `std::time::Duration` so the session
//! timeout cannot be confused with other durations at call sites.

use std::time::Duration;

/// Timeout applied uniformly to connect, send, and receive operations
///
/// The protocol is strictly synchronous request/response, so one bound
/// covers every point where the session can suspend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerTimeout(Duration);

impl ServerTimeout {
    /// Default server timeout (10 seconds)
    pub const DEFAULT: Self = Self(Duration::from_secs(10));

    /// Create a new server timeout
    #[inline]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// Create a server timeout from whole seconds
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Get the underlying duration
    #[inline]
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Get timeout in seconds
    #[inline]
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0.as_secs()
    }
}

impl Default for ServerTimeout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<Duration> for ServerTimeout {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl From<ServerTimeout> for Duration {
    fn from(timeout: ServerTimeout) -> Self {
        timeout.0
    }
}
