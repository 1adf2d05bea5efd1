use std::error::Error as StdError;

use http::StatusCode;

use super::parameters::{ParamLocation, ParamStyle};

/// Boxed error returned by request editors and custom transports.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur when calling the runx API.
///
/// Every variant except [`Transport`](Self::Transport), [`Cancelled`](Self::Cancelled)
/// and [`Decode`](Self::Decode) is raised before anything is sent on the wire.
/// Nothing is retried internally: the error is handed back to the caller as is.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// A parameter could not be rendered into its textual form.
    ///
    /// Raised while building the request, no request is sent.
    #[display("Invalid parameter: {_0}")]
    Encoding(EncodingError),

    /// The base server URL or the expanded operation path is not a valid URI.
    #[display("Cannot resolve '{url}': {error}")]
    #[from(skip)]
    PathResolution {
        /// The URL (or path) that could not be resolved.
        url: String,
        /// Why the resolution failed.
        error: String,
    },

    /// The JSON request body could not be serialized.
    #[display("Failed to serialize request body: {_0}")]
    Body(serde_json::Error),

    /// A request editor failed; the request was not sent.
    ///
    /// Mutations already applied by the editors that ran before are kept.
    #[display("{_0}")]
    Editor(EditorError),

    /// The transport could not execute the request or read the response body.
    #[display("{_0}")]
    Transport(TransportError),

    /// The call cancellation token fired while waiting for the server.
    #[display("Call cancelled while waiting for the server")]
    Cancelled,

    /// A response matched a decode rule but its body does not fit the expected shape.
    ///
    /// The response body has already been fully read and released.
    #[display("Failed to decode {operation_id} response ({status}) at '{path}': {error}\n{body}")]
    #[from(skip)]
    Decode {
        /// The operation whose response failed to decode.
        operation_id: &'static str,
        /// The response status code.
        status: StatusCode,
        /// JSON path where deserialization stopped.
        path: String,
        /// The underlying JSON error.
        error: serde_json::Error,
        /// The response body, truncated for display.
        body: String,
    },
}

/// Errors raised while encoding a call parameter.
#[derive(Debug, Clone, PartialEq, derive_more::Error, derive_more::Display)]
pub enum EncodingError {
    /// A required parameter was not supplied.
    #[display("missing required {location} parameter '{name}'")]
    MissingParameter {
        /// The parameter name.
        name: String,
        /// Where the parameter was expected.
        location: ParamLocation,
    },

    /// The value shape is not supported by the parameter style.
    #[display("unsupported value for {style} parameter '{name}': {value}")]
    UnsupportedValue {
        /// The parameter name.
        name: String,
        /// The style used to render the value.
        style: ParamStyle,
        /// The rejected value.
        value: serde_json::Value,
    },

    /// The style cannot be used at this location.
    #[display("{style} style is not allowed for {location} parameter '{name}'")]
    UnsupportedStyle {
        /// The parameter name.
        name: String,
        /// The requested style.
        style: ParamStyle,
        /// The parameter location.
        location: ParamLocation,
    },

    /// The rendered path value is a `.` or `..` segment, which URL resolution
    /// would collapse into another path.
    #[display("path parameter '{name}' cannot be the dot segment '{value}'")]
    DotSegment {
        /// The parameter name.
        name: String,
        /// The rendered value.
        value: String,
    },

    /// The rendered value is not a valid HTTP header name or value.
    #[display("invalid header parameter '{name}': {message}")]
    InvalidHeader {
        /// The parameter name.
        name: String,
        /// Details from the `http` crate.
        message: String,
    },

    /// The typed value could not be converted before encoding.
    #[display("cannot serialize parameter '{name}': {message}")]
    Serialization {
        /// The parameter name.
        name: String,
        /// The serialization error message.
        message: String,
    },
}

/// A request editor failed.
#[derive(Debug, derive_more::Display)]
#[display("Request editor #{index} failed: {source}")]
pub struct EditorError {
    index: usize,
    source: BoxError,
}

impl EditorError {
    pub(in crate::client) fn new(index: usize, source: BoxError) -> Self {
        Self { index, source }
    }

    /// Position of the failing editor in the chain (default editors first).
    pub fn index(&self) -> usize {
        self.index
    }
}

impl StdError for EditorError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Kind of transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TransportErrorKind {
    /// DNS resolution or connection establishment failed.
    #[display("connection")]
    Connect,
    /// The transport gave up waiting.
    #[display("timeout")]
    Timeout,
    /// Reading or writing the body failed.
    #[display("I/O")]
    Io,
    /// The request could not be converted for the underlying client.
    #[display("request")]
    Request,
    /// Anything else reported by the transport.
    #[display("transport")]
    Other,
}

/// A network, connection, timeout or I/O failure reported by a [`Transport`](super::Transport).
#[derive(Debug, derive_more::Display)]
#[display("{kind} error: {source}")]
pub struct TransportError {
    kind: TransportErrorKind,
    source: BoxError,
}

impl TransportError {
    /// Wraps a transport specific error.
    pub fn new(kind: TransportErrorKind, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    /// The failure kind.
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if error.is_body() || error.is_decode() {
            TransportErrorKind::Io
        } else if error.is_builder() || error.is_request() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };
        Self::new(kind, error)
    }
}
