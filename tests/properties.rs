//! Properties of the request parser that must hold for any input.

use bee_el::http::{HeaderClassifier, HeaderMatchState, MessageHandler, ParseState, Parser, ParserType};
use bee_el::{CallbackResult, ParseError};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Begin,
    Method(Vec<u8>),
    Path(Vec<u8>),
    Version(u16, u16),
    Field(Vec<u8>),
    Value(Vec<u8>),
    HeadersComplete,
    Complete,
}

#[derive(Default)]
struct Recorder(Vec<Event>);

impl MessageHandler for Recorder {
    fn on_message_begin(&mut self, _: &Parser) -> CallbackResult {
        self.0.push(Event::Begin);
        Ok(())
    }

    fn on_method(&mut self, _: &Parser, method: &[u8]) -> CallbackResult {
        self.0.push(Event::Method(method.to_vec()));
        Ok(())
    }

    fn on_path(&mut self, _: &Parser, path: &[u8]) -> CallbackResult {
        self.0.push(Event::Path(path.to_vec()));
        Ok(())
    }

    fn on_version(&mut self, parser: &Parser) -> CallbackResult {
        self.0.push(Event::Version(parser.http_major(), parser.http_minor()));
        Ok(())
    }

    fn on_header_field(&mut self, _: &Parser, name: &[u8]) -> CallbackResult {
        self.0.push(Event::Field(name.to_vec()));
        Ok(())
    }

    fn on_header_value(&mut self, _: &Parser, value: &[u8]) -> CallbackResult {
        self.0.push(Event::Value(value.to_vec()));
        Ok(())
    }

    fn on_headers_complete(&mut self, _: &Parser) -> CallbackResult {
        self.0.push(Event::HeadersComplete);
        Ok(())
    }

    fn on_message_complete(&mut self, _: &Parser) -> CallbackResult {
        self.0.push(Event::Complete);
        Ok(())
    }
}

fn request() -> impl Strategy<Value = Vec<u8>> {
    let method = prop::sample::select(vec!["GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS"]);
    let path = "/[a-zA-Z0-9/._~%-]{0,24}";
    let minor = 0u16..=1;
    let header = ("[A-Za-z][A-Za-z0-9-]{0,15}", "[ -~]{0,24}");
    let headers = prop::collection::vec(header, 0..8);
    let connection = prop::option::of(prop::sample::select(vec!["close", "keep-alive", "Keep-Alive, Upgrade"]));

    (method, path, minor, headers, connection).prop_map(|(method, path, minor, headers, connection)| {
        let mut msg = format!("{} {} HTTP/1.{}\r\n", method, path, minor);
        for (name, value) in headers {
            // avoid accidental framing headers with unparsable values
            let name = format!("X-{}", name);
            msg.push_str(&format!("{}: {}\r\n", name, value));
        }
        if let Some(connection) = connection {
            msg.push_str(&format!("Connection: {}\r\n", connection));
        }
        msg.push_str("\r\n");
        msg.into_bytes()
    })
}

fn parse_whole(msg: &[u8]) -> (Parser, Recorder) {
    let mut parser = Parser::new(ParserType::Request);
    let mut recorder = Recorder::default();
    let consumed = parser.parse(msg, &mut recorder).expect("valid request");
    assert_eq!(consumed, msg.len());
    (parser, recorder)
}

fn mixed_case(name: &str, upper: &[bool]) -> Vec<u8> {
    name.bytes()
        .zip(upper.iter().cycle())
        .map(|(b, &up)| if up { b.to_ascii_uppercase() } else { b })
        .collect()
}

fn classify(name: &[u8]) -> HeaderMatchState {
    let mut classifier = HeaderClassifier::new();
    for &b in name {
        classifier.advance(b.to_ascii_lowercase());
    }
    classifier.finish()
}

proptest! {
    #[test]
    fn prop_chunking_does_not_change_callbacks(
        msg in request(),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..12),
    ) {
        let (whole_parser, whole) = parse_whole(&msg);

        let mut offsets: Vec<usize> = cuts.iter().map(|i| i.index(msg.len() + 1)).collect();
        offsets.push(0);
        offsets.push(msg.len());
        offsets.sort_unstable();
        offsets.dedup();

        let mut parser = Parser::new(ParserType::Request);
        let mut recorder = Recorder::default();
        for window in offsets.windows(2) {
            let chunk = &msg[window[0]..window[1]];
            prop_assert_eq!(parser.parse(chunk, &mut recorder).unwrap(), chunk.len());
        }

        prop_assert_eq!(&recorder.0, &whole.0);
        prop_assert_eq!(parser.state(), whole_parser.state());
        prop_assert_eq!(parser.flags(), whole_parser.flags());
        prop_assert_eq!(parser.should_keep_alive(), whole_parser.should_keep_alive());
    }

    #[test]
    fn prop_one_byte_at_a_time(msg in request()) {
        let (_, whole) = parse_whole(&msg);

        let mut parser = Parser::new(ParserType::Request);
        let mut recorder = Recorder::default();
        for byte in &msg {
            parser.parse(std::slice::from_ref(byte), &mut recorder).unwrap();
        }
        prop_assert_eq!(recorder.0, whole.0);
    }

    #[test]
    fn prop_reset_matches_fresh_parser(
        msg in request(),
        garbage in prop::collection::vec(any::<u8>(), 0..32),
        cut in any::<prop::sample::Index>(),
    ) {
        let mut input = msg[..cut.index(msg.len() + 1)].to_vec();
        input.extend_from_slice(&garbage);

        let mut parser = Parser::new(ParserType::Request);
        let _ = parser.parse(&input, &mut Recorder::default());
        parser.reset();

        let fresh = Parser::new(ParserType::Request);
        prop_assert_eq!(parser.state(), fresh.state());
        prop_assert_eq!(parser.header_state(), fresh.header_state());
        prop_assert_eq!(parser.http_major(), fresh.http_major());
        prop_assert_eq!(parser.http_minor(), fresh.http_minor());
        prop_assert_eq!(parser.content_length(), fresh.content_length());
        prop_assert_eq!(parser.status_code(), fresh.status_code());
        prop_assert_eq!(parser.flags(), fresh.flags());
        prop_assert_eq!(parser.buffered(), fresh.buffered());
    }

    #[test]
    fn prop_input_after_an_error_is_refused(
        msg in request(),
        garbage in prop::collection::vec(any::<u8>(), 1..32),
        more in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 1..6),
        cut in any::<prop::sample::Index>(),
    ) {
        let mut input = msg[..cut.index(msg.len() + 1)].to_vec();
        input.extend_from_slice(&garbage);

        let mut parser = Parser::new(ParserType::Request);
        let mut recorder = Recorder::default();
        let failed = parser.parse(&input, &mut recorder).is_err();
        let seen = recorder.0.len();

        for chunk in &more {
            let result = parser.parse(chunk, &mut recorder);
            if failed {
                prop_assert!(matches!(result, Err(ParseError::Crashed)));
                prop_assert_eq!(parser.state(), ParseState::Crashed);
                prop_assert_eq!(recorder.0.len(), seen);
            }
            prop_assert!(parser.http_major() <= 999 && parser.http_minor() <= 999);
        }

        parser.reset();
        let (_, whole) = parse_whole(&msg);
        let mut recorder = Recorder::default();
        prop_assert_eq!(parser.parse(&msg, &mut recorder).unwrap(), msg.len());
        prop_assert_eq!(recorder.0, whole.0);
    }

    #[test]
    fn prop_well_known_names_in_any_case(upper in prop::collection::vec(any::<bool>(), 1..20)) {
        prop_assert_eq!(classify(&mixed_case("content-length", &upper)), HeaderMatchState::ContentLength);
        prop_assert_eq!(classify(&mixed_case("connection", &upper)), HeaderMatchState::Connection);
        prop_assert_eq!(classify(&mixed_case("transfer-encoding", &upper)), HeaderMatchState::TransferEncoding);
        prop_assert_eq!(classify(&mixed_case("proxy-connection", &upper)), HeaderMatchState::Connection);
    }

    #[test]
    fn prop_other_names_are_general(name in "[a-z0-9-]{1,24}") {
        prop_assume!(!["content-length", "connection", "transfer-encoding", "proxy-connection"].contains(&name.as_str()));
        prop_assert_eq!(classify(name.as_bytes()), HeaderMatchState::General);
    }

    #[test]
    fn prop_diverging_prefix_is_general(
        which in 0usize..4,
        keep in any::<prop::sample::Index>(),
        next in "[a-z0-9-]",
    ) {
        let names = ["content-length", "connection", "transfer-encoding", "proxy-connection"];
        let name = names[which].as_bytes();
        let len = keep.index(name.len());
        let mut candidate = name[..len].to_vec();
        candidate.push(next.as_bytes()[0]);
        prop_assume!(!names.iter().any(|n| n.as_bytes() == candidate.as_slice()));
        prop_assert_eq!(classify(&candidate), HeaderMatchState::General);
    }
}
