//! Constants used throughout the POP3 client
//!
//! This module centralizes line framing limits, buffer sizes, and socket
//! tuning values to improve maintainability and reduce duplication.

/// Line framing limits
///
/// POP3 responses are short status lines ([RFC 1939](https://datatracker.ietf.org/doc/html/rfc1939)
/// caps them at 512 octets including CRLF), but servers in the wild exceed
/// the letter of the RFC, so the caps here are generous. They exist to bound
/// memory on a misbehaving peer, not to enforce the RFC.
pub mod line {
    /// Protocol line terminator appended to every outgoing command
    pub const CRLF: &[u8] = b"\r\n";

    /// Maximum accepted length for a single response line (bytes, including CRLF)
    pub const RESPONSE_MAX: usize = 4096;

    /// Maximum accepted length for a single payload line when framing by
    /// terminator (message bodies routinely carry lines far beyond the
    /// 998-byte limit of RFC 5322)
    pub const PAYLOAD_MAX: usize = 64 * 1024;

    // Compile-time validation

    /// A response cap below the RFC 1939 line limit would reject valid servers
    const _RESPONSE_COVERS_RFC: () = assert!(RESPONSE_MAX >= 512);

    /// Payload lines are at least as permissive as response lines
    const _PAYLOAD_COVERS_RESPONSE: () = assert!(PAYLOAD_MAX >= RESPONSE_MAX);
}

/// Buffer size constants
pub mod buffer {
    /// BufReader capacity for response parsing (8KB)
    ///
    /// Status lines are tiny; the same reader also feeds payload streaming,
    /// where a page-sized buffer keeps syscall counts low without holding
    /// large idle allocations per session.
    pub const READER_CAPACITY: usize = 8 * 1024;

    /// Chunk size for counted payload reads (8KB)
    ///
    /// Counted payloads are read in chunks so the per-read timeout applies
    /// to socket progress, not to the whole message, and so a hostile size
    /// declaration cannot force a single huge allocation up front.
    pub const PAYLOAD_CHUNK: usize = 8 * 1024;
}

/// Socket tuning constants
pub mod socket {
    use std::time::Duration;

    /// Receive buffer size (256KB) - large enough that multi-megabyte
    /// message downloads are not throttled by the default kernel buffer
    pub const RECV_BUFFER: usize = 256 * 1024;

    /// Send buffer size (64KB) - commands are a handful of bytes
    pub const SEND_BUFFER: usize = 64 * 1024;

    /// TCP keepalive idle time before probes are sent
    pub const KEEPALIVE_TIME: Duration = Duration::from_secs(60);
}
