//! HTTP request parser.

use tracing::{debug, trace};

use crate::buffer::TokenBuffer;
use crate::error::{CallbackResult, ParseError, ParseResult};

use super::header::{self, HeaderClassifier, HeaderMatchState};
use super::tables::{is_url_char, token};
use super::{semantics, Config, Flags, HttpVersion, ParserType, UNKNOWN_CONTENT_LENGTH};

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const SPACE: u8 = b' ';
const TAB: u8 = b'\t';
const SLASH: u8 = b'/';
const DOT: u8 = b'.';
const COLON: u8 = b':';

const HTTP: &[u8] = b"HTTP";
const MAX_VERSION: u16 = 999;

/// Parser event handler.
///
/// Every callback runs inline, before the parser looks at the next byte.
/// Returning an error stops [`Parser::parse`], which hands the error back
/// as [`ParseError::Callback`].
#[allow(unused_variables)]
pub trait MessageHandler<T = ()> {
    /// Called when the first byte of a request is seen.
    /// Default implementation is nothing to do.
    fn on_message_begin(&mut self, parser: &Parser<T>) -> CallbackResult {
        Ok(())
    }

    /// Called when request method parsed.
    /// Default implementation is nothing to do.
    fn on_method(&mut self, parser: &Parser<T>, method: &[u8]) -> CallbackResult {
        Ok(())
    }

    /// Called when request path parsed.
    /// Default implementation is nothing to do.
    fn on_path(&mut self, parser: &Parser<T>, path: &[u8]) -> CallbackResult {
        Ok(())
    }

    /// Called when HTTP version parsed, which completes the request line.
    /// Default implementation is nothing to do.
    fn on_version(&mut self, parser: &Parser<T>) -> CallbackResult {
        Ok(())
    }

    /// Called when header field's name parsed. The name is lowercased.
    /// Default implementation is nothing to do.
    fn on_header_field(&mut self, parser: &Parser<T>, name: &[u8]) -> CallbackResult {
        Ok(())
    }

    /// Called when header field's value parsed.
    /// Default implementation is nothing to do.
    fn on_header_value(&mut self, parser: &Parser<T>, value: &[u8]) -> CallbackResult {
        Ok(())
    }

    /// Called when completed to parsing of headers.
    /// Default implementation is nothing to do.
    fn on_headers_complete(&mut self, parser: &Parser<T>) -> CallbackResult {
        Ok(())
    }

    /// Called when completed to parsing of a message without body.
    /// Default implementation is nothing to do.
    fn on_message_complete(&mut self, parser: &Parser<T>) -> CallbackResult {
        Ok(())
    }
}

/// Position of the parser in the message grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseState {
    /// Before the request line; blank lines are skipped here.
    RequestStart,
    /// Reading the method.
    Method,
    /// Reading the request path.
    Path,
    /// Reading `HTTP` before the `/`.
    VersionHead,
    /// Reading major version digits.
    VersionMajor,
    /// Reading minor version digits.
    VersionMinor,
    /// Reading a header name, or the blank line ending the headers.
    HeaderField,
    /// Reading a header value.
    HeaderValue,
    /// Headers are complete. Body bytes are left to the caller.
    Body,
    /// Reserved for body streaming.
    Stream,
    /// Before the status line of a response.
    ResponseStart,
    /// An error was returned. Only [`Parser::reset`] leaves this state.
    Crashed,
}

/// HTTP parser.
///
/// `T` is application data carried along with the parser and handed back to
/// every callback through [`Parser::data`]. The parser never looks at it.
#[derive(Debug)]
pub struct Parser<T = ()> {
    // parser internal state
    parser_type: ParserType,
    state: ParseState,
    header: HeaderClassifier,
    index: usize,

    // http version
    http_major: u16,
    http_minor: u16,

    content_length: u64,
    status_code: u16,
    flags: Flags,

    buffer: TokenBuffer,
    data: T,
}

impl Parser<()> {
    /// Create a new `Parser` with the default [`Config`].
    pub fn new(parser_type: ParserType) -> Parser {
        Parser::with_data(parser_type, ())
    }
}

impl<T> Parser<T> {
    /// Create a new `Parser` owning application data.
    pub fn with_data(parser_type: ParserType, data: T) -> Parser<T> {
        Parser::with_config(parser_type, Config::default(), data)
    }

    /// Create a new `Parser` with explicit limits.
    pub fn with_config(parser_type: ParserType, config: Config, data: T) -> Parser<T> {
        Parser {
            parser_type,
            state: start_state(parser_type),
            header: HeaderClassifier::new(),
            index: 0,
            http_major: 0,
            http_minor: 0,
            content_length: UNKNOWN_CONTENT_LENGTH,
            status_code: 0,
            flags: Flags::empty(),
            buffer: TokenBuffer::with_capacity(config.max_token_size),
            data,
        }
    }

    /// Parse a chunk of the byte stream.
    ///
    /// Chunks may be split anywhere, down to one byte per call. Returns the
    /// number of bytes consumed, which is less than `data.len()` only when
    /// the headers ended inside the chunk: the remaining bytes belong to the
    /// body and are not looked at.
    ///
    /// Any error, including one returned by a callback, moves the parser to
    /// [`ParseState::Crashed`]. Every later call fails with
    /// [`ParseError::Crashed`] until [`Parser::reset`].
    pub fn parse<H: MessageHandler<T>>(&mut self, data: &[u8], handler: &mut H) -> ParseResult {
        if self.state == ParseState::Crashed {
            return Err(ParseError::Crashed);
        }

        let result = match self.parser_type {
            ParserType::Request => self.parse_request(data, handler),
            ParserType::Response => self.parse_response(data, handler),
        };
        if result.is_err() {
            self.state = ParseState::Crashed;
        }
        result
    }

    /// Return to the initial state for the next message on the connection.
    /// Application data and buffer storage are kept.
    pub fn reset(&mut self) {
        self.state = start_state(self.parser_type);
        self.header.reset();
        self.index = 0;
        self.http_major = 0;
        self.http_minor = 0;
        self.content_length = UNKNOWN_CONTENT_LENGTH;
        self.status_code = 0;
        self.flags = Flags::empty();
        self.buffer.reset();
    }

    /// Release the parser, handing back the application data.
    pub fn into_data(self) -> T {
        self.data
    }

    /// `true` if the message ends when the connection closes.
    pub fn needs_eof(&self) -> bool {
        semantics::message_needs_eof(self.parser_type, self.status_code, self.flags, self.content_length)
    }

    /// `true` if the connection may be reused after this message.
    pub fn should_keep_alive(&self) -> bool {
        semantics::should_keep_alive(self.http_major, self.http_minor, self.flags, self.needs_eof())
    }

    /// `true` if a body follows the headers.
    pub fn body_expected(&self) -> bool {
        if self.flags.contains(Flags::SKIP_BODY) {
            return false;
        }
        if self.flags.contains(Flags::CHUNKED) {
            return true;
        }
        match self.content_length {
            UNKNOWN_CONTENT_LENGTH => self.needs_eof(),
            0 => false,
            _ => true,
        }
    }

    /// Mark the message as having no body, e.g. a response to a HEAD request.
    pub fn set_skip_body(&mut self, skip: bool) {
        self.flags.set(Flags::SKIP_BODY, skip);
    }

    /// Type fixed at construction.
    pub fn parser_type(&self) -> ParserType {
        self.parser_type
    }

    /// Current parse state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Classification of the header being read.
    pub fn header_state(&self) -> HeaderMatchState {
        self.header.state()
    }

    /// Major version number, 0 until parsed.
    pub fn http_major(&self) -> u16 {
        self.http_major
    }

    /// Minor version number, 0 until parsed.
    pub fn http_minor(&self) -> u16 {
        self.http_minor
    }

    /// Parsed version, if it is one of the well-known ones.
    pub fn http_version(&self) -> Option<HttpVersion> {
        HttpVersion::find(self.http_major, self.http_minor)
    }

    /// Value of `Content-Length`, if one was seen.
    pub fn content_length(&self) -> Option<u64> {
        match self.content_length {
            UNKNOWN_CONTENT_LENGTH => None,
            n => Some(n),
        }
    }

    /// Response status code. Always 0 for requests.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Flags learned from the headers so far.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Bytes of the token currently being scanned.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.contents()
    }

    /// Application data.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Application data, mutably.
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    fn parse_request<H: MessageHandler<T>>(&mut self, data: &[u8], handler: &mut H) -> ParseResult {
        for (read, &byte) in data.iter().enumerate() {
            let result = match self.state {
                ParseState::RequestStart => self.start_request(byte, handler),
                ParseState::Method => self.read_method(byte, handler),
                ParseState::Path => self.read_path(byte, handler),
                ParseState::VersionHead => self.read_version_head(byte),
                ParseState::VersionMajor => self.read_version_major(byte),
                ParseState::VersionMinor => self.read_version_minor(byte, handler),
                ParseState::HeaderField => self.read_header_field(byte, handler),
                ParseState::HeaderValue => self.read_header_value(byte, handler),
                ParseState::Body => return Ok(read),
                ParseState::Stream | ParseState::ResponseStart => Err(ParseError::BadParserState),
                ParseState::Crashed => Err(ParseError::Crashed),
            };

            if let Err(err) = result {
                debug!(state = ?self.state, byte, error = %err, "rejecting request byte");
                return Err(err);
            }
        }

        Ok(data.len())
    }

    fn parse_response<H: MessageHandler<T>>(&mut self, data: &[u8], _handler: &mut H) -> ParseResult {
        for &byte in data {
            let result = match self.state {
                ParseState::ResponseStart => self.start_response(byte),
                ParseState::Crashed => Err(ParseError::Crashed),
                _ => Err(ParseError::BadParserState),
            };

            if let Err(err) = result {
                debug!(state = ?self.state, byte, error = %err, "rejecting response byte");
                return Err(err);
            }
        }

        Ok(data.len())
    }

    // Status lines are not parsed yet.
    fn start_response(&mut self, _byte: u8) -> Result<(), ParseError> {
        Ok(())
    }

    fn start_request<H: MessageHandler<T>>(&mut self, byte: u8, handler: &mut H) -> Result<(), ParseError> {
        match byte {
            CR | LF => Ok(()),
            _ if byte.is_ascii_alphabetic() => {
                self.state = ParseState::Method;
                handler.on_message_begin(self)?;
                self.read_method(byte, handler)
            }
            _ => Err(ParseError::BadMethodCharacter),
        }
    }

    fn read_method<H: MessageHandler<T>>(&mut self, byte: u8, handler: &mut H) -> Result<(), ParseError> {
        match byte {
            _ if byte.is_ascii_alphabetic() => Ok(self.buffer.append(byte)?),
            SPACE if !self.buffer.is_empty() => {
                trace!(method = %String::from_utf8_lossy(self.buffer.contents()), "request method");
                handler.on_method(self, self.buffer.contents())?;
                self.buffer.reset();
                self.state = ParseState::Path;
                Ok(())
            }
            _ => Err(ParseError::BadMethodCharacter),
        }
    }

    fn read_path<H: MessageHandler<T>>(&mut self, byte: u8, handler: &mut H) -> Result<(), ParseError> {
        match byte {
            _ if is_url_char(byte) => Ok(self.buffer.append(byte)?),
            SPACE if !self.buffer.is_empty() => {
                trace!(path = %String::from_utf8_lossy(self.buffer.contents()), "request path");
                handler.on_path(self, self.buffer.contents())?;
                self.buffer.reset();
                self.index = 0;
                self.state = ParseState::VersionHead;
                Ok(())
            }
            _ => Err(ParseError::BadPathCharacter),
        }
    }

    fn read_version_head(&mut self, byte: u8) -> Result<(), ParseError> {
        match byte {
            SLASH if self.index == HTTP.len() => {
                self.index = 0;
                self.state = ParseState::VersionMajor;
                Ok(())
            }
            _ if self.index < HTTP.len() && HTTP[self.index] == byte => {
                self.index += 1;
                Ok(())
            }
            _ => Err(ParseError::BadHttpVersionHead),
        }
    }

    fn read_version_major(&mut self, byte: u8) -> Result<(), ParseError> {
        match byte {
            b'0'..=b'9' => {
                self.http_major = push_digit(self.http_major, byte).ok_or(ParseError::BadHttpVersionMajor)?;
                self.index += 1;
                Ok(())
            }
            DOT if self.index > 0 => {
                self.index = 0;
                self.state = ParseState::VersionMinor;
                Ok(())
            }
            _ => Err(ParseError::BadHttpVersionMajor),
        }
    }

    fn read_version_minor<H: MessageHandler<T>>(&mut self, byte: u8, handler: &mut H) -> Result<(), ParseError> {
        match byte {
            b'0'..=b'9' => {
                self.http_minor = push_digit(self.http_minor, byte).ok_or(ParseError::BadHttpVersionMinor)?;
                self.index += 1;
                Ok(())
            }
            CR if self.index > 0 => Ok(()),
            LF if self.index > 0 => {
                trace!(major = self.http_major, minor = self.http_minor, "request line complete");
                handler.on_version(self)?;
                self.buffer.reset();
                self.header.reset();
                self.index = 0;
                self.state = ParseState::HeaderField;
                Ok(())
            }
            _ => Err(ParseError::BadHttpVersionMinor),
        }
    }

    fn read_header_field<H: MessageHandler<T>>(&mut self, byte: u8, handler: &mut H) -> Result<(), ParseError> {
        match byte {
            // only the blank line ending the headers may carry a CR
            CR if self.buffer.is_empty() => Ok(()),
            LF if self.buffer.is_empty() => self.complete_headers(handler),
            COLON if !self.buffer.is_empty() => {
                let kind = self.header.finish();
                trace!(name = %String::from_utf8_lossy(self.buffer.contents()), ?kind, "header field");
                handler.on_header_field(self, self.buffer.contents())?;
                self.buffer.reset();
                self.state = ParseState::HeaderValue;
                Ok(())
            }
            _ => match token(byte) {
                Some(lower) => {
                    self.header.advance(lower);
                    Ok(self.buffer.append(lower)?)
                }
                None => Err(ParseError::BadHeaderToken),
            },
        }
    }

    fn read_header_value<H: MessageHandler<T>>(&mut self, byte: u8, handler: &mut H) -> Result<(), ParseError> {
        match byte {
            CR => Ok(()),
            LF => {
                self.apply_header_value()?;
                trace!(value = %String::from_utf8_lossy(self.buffer.contents()), "header value");
                handler.on_header_value(self, self.buffer.contents())?;
                self.buffer.reset();
                self.header.reset();
                self.state = ParseState::HeaderField;
                Ok(())
            }
            // leading whitespace
            SPACE | TAB if self.buffer.is_empty() => Ok(()),
            _ => Ok(self.buffer.append(byte)?),
        }
    }

    fn apply_header_value(&mut self) -> Result<(), ParseError> {
        let value = self.buffer.contents();
        match self.header.state() {
            HeaderMatchState::Connection => {
                self.flags |= header::connection_flags(value);
            }
            HeaderMatchState::TransferEncoding => {
                if header::is_chunked(value) {
                    self.flags |= Flags::CHUNKED;
                }
            }
            HeaderMatchState::ContentLength => {
                let length = header::parse_content_length(value).ok_or(ParseError::InvalidContentLength)?;
                if self.content_length != UNKNOWN_CONTENT_LENGTH && self.content_length != length {
                    return Err(ParseError::InvalidContentLength);
                }
                self.content_length = length;
            }
            _ => (),
        }
        Ok(())
    }

    fn complete_headers<H: MessageHandler<T>>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        trace!(flags = ?self.flags, content_length = ?self.content_length(), "headers complete");
        self.state = ParseState::Body;
        handler.on_headers_complete(self)?;
        if !self.body_expected() {
            handler.on_message_complete(self)?;
        }
        Ok(())
    }
}

// Appends a decimal digit, or `None` once the number passes `MAX_VERSION`.
fn push_digit(number: u16, digit: u8) -> Option<u16> {
    number
        .checked_mul(10)
        .and_then(|n| n.checked_add(u16::from(digit - b'0')))
        .filter(|&n| n <= MAX_VERSION)
}

fn start_state(parser_type: ParserType) -> ParseState {
    match parser_type {
        ParserType::Request => ParseState::RequestStart,
        ParserType::Response => ParseState::ResponseStart,
    }
}
