//! HTTP parser.

use std::fmt;

use bitflags::bitflags;

use crate::error::ParseError;

pub mod header;
pub mod parser;
pub mod semantics;
mod tables;

pub use self::header::{HeaderClassifier, HeaderMatchState};
pub use self::parser::{MessageHandler, ParseState, Parser};

/// Largest single token (method, path, header name or header value) accepted by default.
pub const HTTP_MAX_HEADER_SIZE: usize = 80 * 1024;

/// `content_length` of a message without a `Content-Length` header.
pub const UNKNOWN_CONTENT_LENGTH: u64 = u64::MAX;

/// A parser types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserType {
    /// Parse request only.
    Request,
    /// Parse response only.
    Response,
}

impl TryFrom<u8> for ParserType {
    type Error = ParseError;

    fn try_from(tag: u8) -> Result<ParserType, ParseError> {
        match tag {
            0 => Ok(ParserType::Request),
            1 => Ok(ParserType::Response),
            _ => Err(ParseError::BadParserType),
        }
    }
}

bitflags! {
    /// Facts about the current message learned from its headers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        /// `Transfer-Encoding: chunked`
        const CHUNKED = 1 << 0;
        /// `Connection: close`
        const CONNECTION_CLOSE = 1 << 1;
        /// `Connection: keep-alive`
        const CONNECTION_KEEP_ALIVE = 1 << 2;
        /// The message has no body regardless of its headers, e.g. a response to HEAD.
        const SKIP_BODY = 1 << 3;
    }
}

/// A list of well-known HTTP versions.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVersion {
    /// HTTP/0.9
    HTTP_0_9,
    /// HTTP/1.0
    HTTP_1_0,
    /// HTTP/1.1
    HTTP_1_1,
}

impl HttpVersion {
    /// Detect HTTP version with major and minor.
    pub fn find(major: u16, minor: u16) -> Option<HttpVersion> {
        match (major, minor) {
            (0, 9) => Some(HttpVersion::HTTP_0_9),
            (1, 0) => Some(HttpVersion::HTTP_1_0),
            (1, 1) => Some(HttpVersion::HTTP_1_1),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HttpVersion::HTTP_0_9 => f.pad("HTTP/0.9"),
            HttpVersion::HTTP_1_0 => f.pad("HTTP/1.0"),
            HttpVersion::HTTP_1_1 => f.pad("HTTP/1.1"),
        }
    }
}

/// Parser limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Capacity of the token buffer. A token must be strictly shorter.
    pub max_token_size: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config { max_token_size: HTTP_MAX_HEADER_SIZE }
    }
}

impl Config {
    /// Set the token buffer capacity.
    pub fn max_token_size(mut self, size: usize) -> Config {
        self.max_token_size = size;
        self
    }
}
