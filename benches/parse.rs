use bee_el::http::{MessageHandler, Parser, ParserType};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

struct BenchHandler;

impl MessageHandler for BenchHandler {}

fn create_request(version: u16) -> String {
    let headers = [("Host", "faultier.jp"),
                   ("User-Agent", "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.9; rv:30.0) Gecko/20100101 Firefox/30.0"),
                   ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
                   ("Accept-Encoding", "gzip,deflate"),
                   ("Connection", "keep-alive"),
                   ("Cookie", "key1=value1; key2=value2")];
    let mut msg = format!("GET /path/to/some/contents HTTP/1.{}\r\n", version);
    for (name, value) in headers {
        msg.push_str(&format!("{}: {}\r\n", name, value));
    }
    msg.push_str("\r\n");
    msg
}

fn bench_no_message(c: &mut Criterion) {
    let empty: &[u8] = &[];
    let mut parser = Parser::new(ParserType::Request);
    c.bench_function("no_message", |b| b.iter(|| parser.parse(black_box(empty), &mut BenchHandler)));
}

fn bench_request_line_only(c: &mut Criterion) {
    let data = b"GET / HTTP/1.0\r\n\r\n";
    let mut parser = Parser::new(ParserType::Request);
    c.bench_function("request_without_header", |b| b.iter(|| {
        parser.reset();
        parser.parse(black_box(data), &mut BenchHandler)
    }));
}

fn bench_request_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_get");
    for version in [0, 1] {
        let msg = create_request(version);
        let mut parser = Parser::new(ParserType::Request);
        group.bench_function(format!("http_1_{}", version), |b| b.iter(|| {
            parser.reset();
            parser.parse(black_box(msg.as_bytes()), &mut BenchHandler)
        }));
    }
    group.finish();
}

fn bench_one_byte_at_a_time(c: &mut Criterion) {
    let msg = create_request(1);
    let mut parser = Parser::new(ParserType::Request);
    c.bench_function("request_get_bytewise", |b| b.iter(|| {
        parser.reset();
        for byte in msg.as_bytes() {
            black_box(parser.parse(black_box(std::slice::from_ref(byte)), &mut BenchHandler).unwrap());
        }
    }));
}

criterion_group!(benches, bench_no_message, bench_request_line_only, bench_request_get, bench_one_byte_at_a_time);
criterion_main!(benches);
