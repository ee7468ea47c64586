/// Gemini status codes.
///
/// The first digit is the category: 1x input, 2x success, 3x redirect,
/// 4x temporary failure, 5x permanent failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Input,
    SensitiveInput,
    Success,
    TemporaryRedirect,
    PermanentRedirect,
    TemporaryFailure,
    ServerUnavailable,
    CgiError,
    ProxyError,
    SlowDown,
    PermanentFailure,
    NotFound,
    Gone,
    ProxyRequestRefused,
    BadRequest,
}

impl Status {
    pub fn as_u8(&self) -> u8 {
        match self {
            Status::Input => 10,
            Status::SensitiveInput => 11,
            Status::Success => 20,
            Status::TemporaryRedirect => 30,
            Status::PermanentRedirect => 31,
            Status::TemporaryFailure => 40,
            Status::ServerUnavailable => 41,
            Status::CgiError => 42,
            Status::ProxyError => 43,
            Status::SlowDown => 44,
            Status::PermanentFailure => 50,
            Status::NotFound => 51,
            Status::Gone => 52,
            Status::ProxyRequestRefused => 53,
            Status::BadRequest => 59,
        }
    }
}

/// A status line plus, for successes, the body that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub meta: String,
    pub body: Option<Vec<u8>>,
}

impl Response {
    pub fn new(status: Status, meta: impl Into<String>) -> Self {
        Self {
            status,
            meta: meta.into(),
            body: None,
        }
    }

    pub fn success(mime: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status: Status::Success,
            meta: mime.into(),
            body: Some(body),
        }
    }

    pub fn redirect(target: impl Into<String>) -> Self {
        Self::new(Status::TemporaryRedirect, target)
    }

    pub fn not_found() -> Self {
        Self::new(Status::NotFound, "Not found")
    }

    pub fn server_error() -> Self {
        Self::new(Status::TemporaryFailure, "Server error")
    }

    pub fn bad_request() -> Self {
        Self::new(Status::BadRequest, "Bad request")
    }

    pub fn proxy_refused() -> Self {
        Self::new(Status::ProxyRequestRefused, "No proxy request please")
    }

    /// `<status> <meta>\r\n`
    pub fn header(&self) -> String {
        format!("{} {}\r\n", self.status.as_u8(), self.meta)
    }

    /// Header followed by the body, exactly as written to the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = self.header().into_bytes();
        if let Some(body) = &self.body {
            buf.extend_from_slice(body);
        }
        buf
    }
}
