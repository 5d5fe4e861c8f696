/// The first line of a request, split into its parts.
///
/// Tokens missing from the input are left empty; a malformed line is not an
/// error, it just fails to match any route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// The request method as sent (e.g. "GET")
    pub method: String,
    /// The path with any query string removed (e.g. "/events")
    pub path: String,
    /// Everything after the first `?`, without the `?`. Empty if absent.
    /// Kept as raw bytes since it may be echoed back verbatim.
    pub raw_query: Vec<u8>,
    /// HTTP version token (typically "HTTP/1.1")
    pub version: String,
}

impl RequestLine {
    /// Builds a request line from a method and a request target that may
    /// carry a query string.
    ///
    /// Method, path and version are only compared and logged, so invalid
    /// UTF-8 in them is replaced. A replaced path never equals a valid one.
    pub fn new(
        method: impl AsRef<[u8]>,
        target: impl AsRef<[u8]>,
        version: impl AsRef<[u8]>,
    ) -> Self {
        let target = target.as_ref();
        let (path, raw_query) = match target.iter().position(|&b| b == b'?') {
            Some(pos) => (&target[..pos], &target[pos + 1..]),
            None => (target, &[][..]),
        };

        Self {
            method: String::from_utf8_lossy(method.as_ref()).into_owned(),
            path: String::from_utf8_lossy(path).into_owned(),
            raw_query: raw_query.to_vec(),
            version: String::from_utf8_lossy(version.as_ref()).into_owned(),
        }
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}
