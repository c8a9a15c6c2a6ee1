//! POP3 response line parsing
//!
//! Response lines are small enough that a few scanning functions beat a
//! grammar or regex. The rules here are deliberately lenient where
//! servers are known to vary.

use memchr::memchr;

/// True when the line reports success
///
/// The check is a case-insensitive `+OK` prefix. `+OKAY` also passes;
/// nothing anchors the token.
pub fn is_ok_response(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 3 && bytes[..3].eq_ignore_ascii_case(b"+OK")
}

/// The human-readable part of a failure line
///
/// Everything after the first space, trimmed. A line without a space is
/// returned whole, trimmed.
pub fn failure_message(line: &str) -> &str {
    match memchr(b' ', line.as_bytes()) {
        Some(idx) => line[idx + 1..].trim(),
        None => line.trim(),
    }
}

/// Message count from a STAT response (`+OK <count> <size>`)
///
/// A missing or unparseable count degrades to 0 rather than failing;
/// STAT responses in the wild are not always well formed.
pub fn stat_message_count(line: &str) -> u64 {
    line.split_whitespace()
        .nth(1)
        .and_then(|token| token.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Advisory payload size from a retrieval response
///
/// Looks for a digit run followed by whitespace and a word starting with
/// `octets` (case-insensitive), anywhere in the line. Returns `None`
/// when no such pair exists or the digits overflow; `Some(0)` is a real
/// size, distinct from no hint at all.
pub fn octet_size_hint(line: &str) -> Option<u64> {
    let mut tokens = line.split_whitespace();
    let mut prev = tokens.next()?;

    for token in tokens {
        let bytes = token.as_bytes();
        if bytes.len() >= 6 && bytes[..6].eq_ignore_ascii_case(b"octets") {
            let digits = trailing_digits(prev);
            if !digits.is_empty() {
                return digits.parse::<u64>().ok();
            }
        }
        prev = token;
    }
    None
}

/// The run of ASCII digits at the end of a token
fn trailing_digits(token: &str) -> &str {
    let bytes = token.as_bytes();
    let start = bytes
        .iter()
        .rposition(|b| !b.is_ascii_digit())
        .map_or(0, |i| i + 1);
    &token[start..]
}
