//! Query string decoding.
//!
//! Everything here works on raw bytes: a decoded `%XX` is the exact byte,
//! whether or not the result is valid UTF-8.

/// Decodes `%XX` escapes and `+` in a query component.
///
/// Decoding is lenient: a `%` that is not followed by two hex digits is kept
/// as a literal `%`.
///
/// ```
/// # use sse_echo::http::query::url_decode;
/// assert_eq!(url_decode("Hello+World%21"), b"Hello World!");
/// assert_eq!(url_decode("100%"), b"100%");
/// assert_eq!(url_decode("%FF"), b"\xFF");
/// ```
pub fn url_decode(encoded: impl AsRef<[u8]>) -> Vec<u8> {
    let bytes = encoded.as_ref();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => match (hex_value(bytes.get(i + 1)), hex_value(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    decoded.push(hi << 4 | lo);
                    i += 3;
                    continue;
                }
                _ => decoded.push(b'%'),
            },
            b'+' => decoded.push(b' '),
            b => decoded.push(b),
        }
        i += 1;
    }

    decoded
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    match byte? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Returns the decoded value of the first `name=value` pair in `query`.
///
/// `query` is the part after `?`, without the `?`. Strings shorter than four
/// bytes cannot hold a useful pair and yield an empty value, as does a
/// missing key. Segments without `=` are ignored.
pub fn extract_query_param(query: impl AsRef<[u8]>, name: &str) -> Vec<u8> {
    let query = query.as_ref();
    if query.len() < 4 {
        return Vec::new();
    }

    query
        .split(|&b| b == b'&')
        .filter_map(|segment| {
            let eq = segment.iter().position(|&b| b == b'=')?;
            Some((&segment[..eq], &segment[eq + 1..]))
        })
        .find(|(key, _)| *key == name.as_bytes())
        .map(|(_, value)| url_decode(value))
        .unwrap_or_default()
}
