/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): Resource served
/// - `BadRequest` (400): Malformed request
/// - `NotFound` (404): Resource not found
/// - `MethodNotAllowed` (405): HTTP method not supported
/// - `InternalServerError` (500): Resource exists but could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A response ready to be serialized.
///
/// Success responses carry a single `Content-Type` header and a body.
/// Error responses are a bare status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// The only header line emitted, as (name, value)
    pub header: Option<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a 200 OK response with the given body and media type.
    pub fn ok(body: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        Self {
            status: StatusCode::Ok,
            header: Some(("Content-Type".to_string(), media_type.into())),
            body: body.into(),
        }
    }

    /// Creates a header-less, body-less response for an error status.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            header: None,
            body: Vec::new(),
        }
    }

    pub fn bad_request() -> Self {
        Self::empty(StatusCode::BadRequest)
    }

    pub fn not_found() -> Self {
        Self::empty(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::empty(StatusCode::MethodNotAllowed)
    }

    pub fn internal_error() -> Self {
        Self::empty(StatusCode::InternalServerError)
    }

    /// Returns the `Content-Type` value, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.header
            .as_ref()
            .filter(|(name, _)| name == "Content-Type")
            .map(|(_, value)| value.as_str())
    }
}
