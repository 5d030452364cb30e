//! Byte class tables, built at compile time.

/// Tokens as defined by RFC 2616, lowercased. Zero for non-token bytes.
///
/// ```text
/// token      = 1*<any CHAR except CTLs or separators>
/// separators = "(" | ")" | "<" | ">" | "@"
///            | "," | ";" | ":" | "\" | <">
///            | "/" | "[" | "]" | "?" | "="
///            | "{" | "}" | SP | HT
/// ```
static TOKENS: [u8; 256] = build_tokens();

/// Bytes allowed in a request path: CHAR minus CTL and SP, plus every
/// byte with the high bit set.
static URL_CHARS: [bool; 256] = build_url_chars();

const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";

const fn build_tokens() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut b = 0x21;
    while b < 0x7f {
        let mut separator = false;
        let mut i = 0;
        while i < SEPARATORS.len() {
            if SEPARATORS[i] == b as u8 {
                separator = true;
            }
            i += 1;
        }
        if !separator {
            table[b] = (b as u8).to_ascii_lowercase();
        }
        b += 1;
    }
    table
}

const fn build_url_chars() -> [bool; 256] {
    let mut table = [false; 256];
    let mut b = 0x21;
    while b < 256 {
        table[b] = b != 0x7f;
        b += 1;
    }
    table
}

/// Lowercased form of a header token byte, or `None` if it is not a token byte.
#[inline]
pub(crate) fn token(b: u8) -> Option<u8> {
    match TOKENS[b as usize] {
        0 => None,
        t => Some(t),
    }
}

#[inline]
pub(crate) fn is_url_char(b: u8) -> bool {
    URL_CHARS[b as usize]
}
