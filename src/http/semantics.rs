//! Connection management rules derived from a parsed message head.
//! See RFC 2616 section 4.4 and 8.1.

use super::{Flags, ParserType, UNKNOWN_CONTENT_LENGTH};

/// `true` if the message can only be delimited by closing the connection.
pub fn message_needs_eof(parser_type: ParserType, status_code: u16, flags: Flags, content_length: u64) -> bool {
    if parser_type == ParserType::Request {
        return false;
    }
    if status_code / 100 == 1 ||     // 1xx e.g. Continue
        status_code == 204 ||        // No Content
        status_code == 304 ||        // Not Modified
        flags.contains(Flags::SKIP_BODY) {
        return false;
    }
    if flags.contains(Flags::CHUNKED) || content_length != UNKNOWN_CONTENT_LENGTH {
        return false;
    }
    true
}

/// `true` if the connection may carry another message after this one.
pub fn should_keep_alive(http_major: u16, http_minor: u16, flags: Flags, needs_eof: bool) -> bool {
    let persistent = if (http_major, http_minor) >= (1, 1) {
        !flags.contains(Flags::CONNECTION_CLOSE)
    } else {
        // HTTP/1.0 or earlier
        flags.contains(Flags::CONNECTION_KEEP_ALIVE)
    };
    persistent && !needs_eof
}
