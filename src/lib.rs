/*! Incremental HTTP/1.x request parser for Rust.

The caller pushes arbitrary-sized chunks of a byte stream into a [`Parser`]
and receives callbacks on a [`MessageHandler`] as the method, path, version
and each header complete. It's inspired by
[http-parser](https://github.com/joyent/http-parser) written in C.

```
use bee_el::http::{MessageHandler, Parser, ParserType};

struct Paths(Vec<Vec<u8>>);

impl MessageHandler for Paths {
    fn on_path(&mut self, _: &Parser, path: &[u8]) -> bee_el::CallbackResult {
        self.0.push(path.to_vec());
        Ok(())
    }
}

let mut parser = Parser::new(ParserType::Request);
let mut paths = Paths(Vec::new());
parser.parse(b"GET /index.html HTTP/1.1\r\n\r\n", &mut paths).unwrap();
assert_eq!(paths.0, vec![b"/index.html".to_vec()]);
assert!(parser.should_keep_alive());
```
*/

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use self::version::version;

#[allow(missing_docs)]
pub mod version {
    pub const MAJOR: &str = env!("CARGO_PKG_VERSION_MAJOR");
    pub const MINOR: &str = env!("CARGO_PKG_VERSION_MINOR");
    pub const PATCH: &str = env!("CARGO_PKG_VERSION_PATCH");
    pub const PRE: &str = env!("CARGO_PKG_VERSION_PRE");

    /// Show version string.
    pub fn version() -> String {
        format!("{}.{}.{}{}",
                MAJOR, MINOR, PATCH,
                if PRE.is_empty() { String::new() } else { ["-", PRE].concat() })
    }
}

pub mod buffer;
pub mod error;
pub mod http;

pub use error::{CallbackError, CallbackResult, ParseError, ParseResult};
pub use http::{Config, Flags, MessageHandler, Parser, ParserType};

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert_eq!(super::version(), "0.1.1-alpha");
    }
}
