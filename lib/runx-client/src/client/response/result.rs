use std::str::Utf8Error;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};

/// A decoded response.
///
/// The status, headers and raw body are always available, even when no decode
/// rule matched the response (an undocumented status for instance). In that
/// case [`payload`](Self::payload) is `None`.
#[derive(Debug, Clone)]
pub struct TypedResult<P> {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    payload: Option<P>,
}

impl<P> TypedResult<P> {
    pub(in crate::client) fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        payload: Option<P>,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            payload,
        }
    }

    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw `Content-Type` header, if present and printable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// The raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The raw body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// The decoded payload, if a rule matched.
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    /// Consumes the result and returns the decoded payload.
    pub fn into_payload(self) -> Option<P> {
        self.payload
    }

    /// Consumes the result and returns all its parts.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes, Option<P>) {
        (self.status, self.headers, self.body, self.payload)
    }
}
