use url::Url;

/// Longest request URL accepted, excluding the trailing CRLF.
pub const MAX_REQUEST_SIZE: usize = 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum FrameError {
    /// No CRLF yet; read more.
    Incomplete,
    /// Over [`MAX_REQUEST_SIZE`] bytes without a terminator.
    TooLong,
    InvalidUtf8,
}

#[derive(Debug, PartialEq)]
pub enum RequestError {
    Malformed(url::ParseError),
    /// The URL names a host other than ours. Holds the host it named.
    HostMismatch(Option<String>),
}

/// A request addressed to this server.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
}

impl Request {
    /// Raw percent-encoded path, `/` when empty.
    pub fn path(&self) -> &str {
        match self.url.path() {
            "" => "/",
            path => path,
        }
    }
}

/// Extracts the request line from `buf`.
///
/// Returns the trimmed line once a CRLF has been seen. Anything after the
/// terminator is ignored.
pub fn parse_request_line(buf: &[u8]) -> Result<&str, FrameError> {
    let Some(end) = buf.windows(2).position(|w| w == b"\r\n") else {
        if buf.len() > MAX_REQUEST_SIZE + 1 {
            return Err(FrameError::TooLong);
        }
        return Err(FrameError::Incomplete);
    };

    if end > MAX_REQUEST_SIZE {
        return Err(FrameError::TooLong);
    }

    std::str::from_utf8(&buf[..end])
        .map(str::trim)
        .map_err(|_| FrameError::InvalidUtf8)
}

/// Parses a request line as a URL relative to `gemini://<host>/` and checks
/// it is addressed to `host`.
pub fn parse_request(line: &str, host: &str) -> Result<Request, RequestError> {
    let base = Url::parse(&format!("gemini://{}/", host)).map_err(RequestError::Malformed)?;
    let url = Url::options()
        .base_url(Some(&base))
        .parse(line)
        .map_err(RequestError::Malformed)?;

    // `url` keeps the host's case for non-special schemes like gemini, but
    // DNS names are case-insensitive, so `Example.org` is still this capsule.
    match url.host_str() {
        Some(requested) if requested.eq_ignore_ascii_case(host) => Ok(Request { url }),
        other => Err(RequestError::HostMismatch(other.map(str::to_string))),
    }
}
