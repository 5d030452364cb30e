//! Incremental recognition of the header names the parser cares about.
//!
//! The classifier is fed the lowercased bytes of a header name one at a
//! time, in step with the parser loop, so a name is never compared in bulk.

use super::Flags;

const CONNECTION: &[u8] = b"connection";
const CONTENT_LENGTH: &[u8] = b"content-length";
const TRANSFER_ENCODING: &[u8] = b"transfer-encoding";
const PROXY_CONNECTION: &[u8] = b"proxy-connection";

const CLOSE: &[u8] = b"close";
const KEEP_ALIVE: &[u8] = b"keep-alive";
const CHUNKED: &[u8] = b"chunked";

/// Progress of the header name classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderMatchState {
    /// No byte of the name seen yet.
    Start,
    /// Not a well-known name.
    General,
    /// `content-length`
    ContentLength,
    /// `connection` or `proxy-connection`
    Connection,
    /// `transfer-encoding`
    TransferEncoding,
    /// Prefix of `transfer-encoding` so far.
    MatchingTransferEncoding,
    /// Prefix shared by `connection` and `content-length` so far.
    MatchingConnectionOrContentLength,
    /// Prefix of `content-length` only.
    MatchingContentLength,
    /// Prefix of `connection` only.
    MatchingConnection,
    /// Prefix of `proxy-connection` so far.
    MatchingProxyConnection,
}

/// Sub-state machine classifying one header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderClassifier {
    state: HeaderMatchState,
    index: usize,
}

impl Default for HeaderClassifier {
    fn default() -> HeaderClassifier {
        HeaderClassifier::new()
    }
}

impl HeaderClassifier {
    /// A classifier positioned before the first byte of a name.
    pub const fn new() -> HeaderClassifier {
        HeaderClassifier { state: HeaderMatchState::Start, index: 0 }
    }

    /// Current sub-state.
    #[inline]
    pub fn state(&self) -> HeaderMatchState {
        self.state
    }

    /// Number of name bytes confirmed against a candidate.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Prepare for a new header name.
    #[inline]
    pub fn reset(&mut self) {
        *self = HeaderClassifier::new();
    }

    /// Observe the next lowercased byte of the name.
    pub fn advance(&mut self, lower: u8) {
        use self::HeaderMatchState::*;

        self.state = match self.state {
            Start => {
                self.index = 1;
                match lower {
                    b'c' => MatchingConnectionOrContentLength,
                    b't' => MatchingTransferEncoding,
                    b'p' => MatchingProxyConnection,
                    _ => General,
                }
            }
            MatchingConnectionOrContentLength => {
                let connection = CONNECTION[self.index] == lower;
                let content_length = CONTENT_LENGTH[self.index] == lower;
                self.index += 1;
                match (connection, content_length) {
                    (true, true) => MatchingConnectionOrContentLength,
                    (true, false) => MatchingConnection,
                    (false, true) => MatchingContentLength,
                    (false, false) => General,
                }
            }
            MatchingConnection => self.step(CONNECTION, lower, MatchingConnection, Connection),
            MatchingContentLength => self.step(CONTENT_LENGTH, lower, MatchingContentLength, ContentLength),
            MatchingTransferEncoding => self.step(TRANSFER_ENCODING, lower, MatchingTransferEncoding, TransferEncoding),
            MatchingProxyConnection => self.step(PROXY_CONNECTION, lower, MatchingProxyConnection, Connection),
            // a recognized name followed by more bytes is some other name
            Connection | ContentLength | TransferEncoding | General => General,
        };
    }

    /// The name ended. A partial match is not a match.
    pub fn finish(&mut self) -> HeaderMatchState {
        use self::HeaderMatchState::*;

        self.state = match self.state {
            Connection => Connection,
            ContentLength => ContentLength,
            TransferEncoding => TransferEncoding,
            _ => General,
        };
        self.state
    }

    #[inline]
    fn step(&mut self, name: &[u8], lower: u8, matching: HeaderMatchState, matched: HeaderMatchState) -> HeaderMatchState {
        if self.index >= name.len() || name[self.index] != lower {
            return HeaderMatchState::General;
        }
        self.index += 1;
        if self.index == name.len() { matched } else { matching }
    }
}

/// Comma separated elements of a header value, trimmed of optional whitespace.
fn elements(value: &[u8]) -> impl Iterator<Item = &[u8]> {
    value.split(|&b| b == b',').map(trim).filter(|e| !e.is_empty())
}

fn trim(mut bytes: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = bytes {
        bytes = rest;
    }
    bytes
}

/// Flags carried by a `Connection` value.
pub(crate) fn connection_flags(value: &[u8]) -> Flags {
    elements(value).fold(Flags::empty(), |flags, e| {
        if e.eq_ignore_ascii_case(CLOSE) {
            flags | Flags::CONNECTION_CLOSE
        } else if e.eq_ignore_ascii_case(KEEP_ALIVE) {
            flags | Flags::CONNECTION_KEEP_ALIVE
        } else {
            flags
        }
    })
}

/// `true` when `chunked` is the final transfer coding.
pub(crate) fn is_chunked(value: &[u8]) -> bool {
    elements(value).last().map_or(false, |e| e.eq_ignore_ascii_case(CHUNKED))
}

/// Decimal `Content-Length`. `u64::MAX` is reserved for "unknown".
pub(crate) fn parse_content_length(value: &[u8]) -> Option<u64> {
    let digits = trim(value);
    if digits.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
    }
    if n == u64::MAX { None } else { Some(n) }
}
