//! Message identifier newtype
//!
//! POP3 numbers messages starting at 1 within a session, while the public
//! API is zero-indexed. Keeping the converted value in its own type makes
//! the off-by-one boundary explicit instead of scattering `+ 1` through
//! command formatting.

use std::fmt;

/// A 1-based POP3 message number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageNumber(u64);

impl MessageNumber {
    /// Convert a zero-based index into the protocol's 1-based number
    #[inline]
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index as u64 + 1)
    }

    /// Create from an already 1-based number; rejects 0
    #[must_use]
    pub const fn from_number(number: u64) -> Option<Self> {
        if number == 0 { None } else { Some(Self(number)) }
    }

    /// Get the 1-based numeric value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
