use crate::http::request::RequestLine;

/// Parses the request line out of the bytes of a single read.
///
/// Input is cut at the first NUL byte. The first three whitespace-separated
/// tokens become method, target and version; line breaks count as
/// whitespace, and headers or body after them are ignored.
pub fn parse_request_line(buf: &[u8]) -> RequestLine {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());

    let mut parts = buf[..end]
        .split(|&b| is_space(b))
        .filter(|token| !token.is_empty());
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    let version = parts.next().unwrap_or_default();

    RequestLine::new(method, target, version)
}

/// Whitespace as in C's `isspace`: space, `\t`, `\n`, `\v`, `\f`, `\r`.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}
