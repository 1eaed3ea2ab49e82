//! Error types for courier.

use derive_more::{Display, Error, From};
use serde_json::{Map, Value};

// ============================================================================
// Status Error
// ============================================================================

/// Body of a rejected response.
///
/// The executor first tries to read the body as a JSON object (`null` counts
/// as an empty object); when that fails the raw text is kept instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// Body decoded as a JSON object.
    Json(Map<String, Value>),
    /// Body that is not a JSON object, as (lossy) UTF-8 text.
    Raw(String),
}

impl ErrorBody {
    /// Decode a response body, falling back to raw text.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice::<Option<Map<String, Value>>>(bytes).map_or_else(
            |_| Self::Raw(String::from_utf8_lossy(bytes).into_owned()),
            |map| Self::Json(map.unwrap_or_default()),
        )
    }

    /// The decoded JSON object, if any.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Json(map) => Some(map),
            Self::Raw(_) => None,
        }
    }

    /// The raw text, if the body was not a JSON object.
    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Raw(text) => Some(text),
        }
    }
}

/// A response whose status is outside the acceptable set.
///
/// Built once by the executor when the status check fails.
#[derive(Debug, Clone, PartialEq, Display, Error)]
#[display("message: {message}")]
pub struct StatusError {
    status: u16,
    message: String,
    body: ErrorBody,
}

impl StatusError {
    /// Create a status error for a rejected response body.
    #[must_use]
    pub fn new(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            message: format!("unexpected status code: {status}"),
            body: ErrorBody::from_bytes(body),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Parsed or raw response body.
    #[must_use]
    pub const fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// Status is 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Status is 5xx.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Decode a JSON error body into a caller type.
    ///
    /// Returns `None` when the body was kept as raw text.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     code: String,
    ///     message: String,
    /// }
    ///
    /// if let Err(Error::Status(err)) = courier.get::<User>(&config, url, headers, query).await {
    ///     if let Some(Ok(api_error)) = err.decode_body::<ApiError>() {
    ///         println!("API error: {} - {}", api_error.code, api_error.message);
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body.as_json().map(|map| {
            serde_json::from_value(Value::Object(map.clone()))
                .map_err(|e| Error::json_deserialization("", e.to_string()))
        })
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// The request could not be built (bad URL, header or method).
    #[display("request construction")]
    RequestConstruction,
    /// The request body could not be serialized.
    #[display("body encoding")]
    BodyEncoding,
    /// Connection, TLS, timeout or cancellation failure.
    #[display("transport")]
    Transport,
    /// The response body could not be read.
    #[display("response read")]
    ResponseRead,
    /// The server answered with an unacceptable status.
    #[display("status")]
    Status,
    /// A successful response body did not match the expected shape.
    #[display("decode")]
    Decode,
}

/// Main error type for courier operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Response status outside the acceptable set.
    #[display("{_0}")]
    #[from]
    Status(#[error(not(source))] StatusError),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout or deadline exceeded.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The caller cancelled the request.
    #[display("request cancelled")]
    #[from(skip)]
    Cancelled,

    /// Failure while reading the response body.
    #[display("reading response body: {_0}")]
    #[from(skip)]
    ResponseRead(#[error(not(source))] String),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Header name or value that HTTP does not allow.
    #[display("invalid header: {_0}")]
    #[from(skip)]
    InvalidHeader(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a response read error.
    #[must_use]
    pub fn response_read(message: impl Into<String>) -> Self {
        Self::ResponseRead(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_) | Self::InvalidHeader(_) | Self::InvalidRequest(_) => {
                ErrorKind::RequestConstruction
            }
            Self::JsonSerialization(_) | Self::FormSerialization(_) => ErrorKind::BodyEncoding,
            Self::Connection(_) | Self::Tls(_) | Self::Timeout | Self::Cancelled => {
                ErrorKind::Transport
            }
            Self::ResponseRead(_) => ErrorKind::ResponseRead,
            Self::Status(_) => ErrorKind::Status,
            Self::JsonDeserialization { .. } => ErrorKind::Decode,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if the caller cancelled the request.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` for any transport-level failure.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport)
    }

    /// Returns the HTTP status code if this is a status error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(err) => Some(err.status()),
            _ => None,
        }
    }

    /// Returns the status error, if this is one.
    #[must_use]
    pub const fn as_status_error(&self) -> Option<&StatusError> {
        match self {
            Self::Status(err) => Some(err),
            _ => None,
        }
    }

    /// Consume into the status error, if this is one.
    #[must_use]
    pub fn into_status_error(self) -> Option<StatusError> {
        match self {
            Self::Status(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
