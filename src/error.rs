//! Error types for the parser.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::buffer::Overflow;

/// Result of [`Parser::parse`](crate::http::Parser::parse): the number of
/// bytes consumed from the chunk.
pub type ParseResult = Result<usize, ParseError>;

/// Result returned by every [`MessageHandler`](crate::http::MessageHandler) callback.
pub type CallbackResult = Result<(), CallbackError>;

/// A list specifying categories of parse errors.
///
/// Every error is fatal to the message in progress.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Non-alphabetic byte in the request method, or an empty method.
    #[error("invalid character in request method")]
    BadMethodCharacter,

    /// Byte outside the URL character class, or an empty path.
    #[error("invalid character in request path")]
    BadPathCharacter,

    /// The version does not start with `HTTP/`.
    #[error("invalid HTTP version head")]
    BadHttpVersionHead,

    /// Missing, non-numeric, or out of range (> 999) major version.
    #[error("invalid HTTP major version")]
    BadHttpVersionMajor,

    /// Missing, non-numeric, or out of range (> 999) minor version.
    #[error("invalid HTTP minor version")]
    BadHttpVersionMinor,

    /// Byte outside the token class in a header name, or a malformed header line.
    #[error("invalid header token")]
    BadHeaderToken,

    /// `Content-Length` is not a decimal number, overflows, or conflicts with
    /// an earlier `Content-Length`.
    #[error("invalid content length")]
    InvalidContentLength,

    /// A single token exceeded the token buffer.
    #[error(transparent)]
    BufferOverflow(#[from] Overflow),

    /// The parser is in a state its type cannot process.
    #[error("parser reached a state its type cannot handle")]
    BadParserState,

    /// An earlier call failed and the parser was not reset since.
    #[error("parser stopped by an earlier error")]
    Crashed,

    /// Unknown parser type tag.
    #[error("unknown parser type")]
    BadParserType,

    /// Error returned by a callback, passed through unchanged.
    #[error(transparent)]
    Callback(#[from] CallbackError),
}

/// Opaque error produced by a [`MessageHandler`](crate::http::MessageHandler) callback.
#[derive(Debug)]
pub struct CallbackError(Box<dyn StdError + Send + Sync>);

impl CallbackError {
    /// Wrap any error, or a message.
    pub fn new<E>(error: E) -> CallbackError
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        CallbackError(error.into())
    }

    /// The wrapped error.
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }

    /// Unwrap into the boxed error.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync> {
        self.0
    }
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for CallbackError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_error_is_transparent() {
        let err = ParseError::from(CallbackError::new("handler refused"));
        assert_eq!(err.to_string(), "handler refused");
        match err {
            ParseError::Callback(inner) => assert_eq!(inner.get_ref().to_string(), "handler refused"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_overflow_message() {
        let err = ParseError::from(Overflow { capacity: 16 });
        assert_eq!(err.to_string(), "token exceeds buffer capacity of 16 bytes");
    }

    #[test]
    fn test_callback_error_downcast() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "closed");
        let err = CallbackError::new(io);
        assert!(err.into_inner().downcast::<std::io::Error>().is_ok());
    }
}
