//! HTTP response types.
//!
//! - [`Response`] - buffered response as returned by an [`HttpClient`](crate::HttpClient)
//! - [`TypedResponse`] - accepted response with its body decoded into `T`
//!
//! # Example
//!
//! ```ignore
//! let response = courier.get::<Vec<User>>(&config, url, headers, query).await?;
//! let total = response.header("X-Total-Count");
//! let users = response.into_data().unwrap_or_default();
//! ```

use bytes::Bytes;
use http::HeaderMap;

// ============================================================================
// Buffered Response
// ============================================================================

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HeaderMap,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HeaderMap, B) {
        (self.status, self.headers, self.body)
    }
}

impl Response<Bytes> {
    /// Returns `true` if the body holds nothing but whitespace.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.trim_ascii().is_empty()
    }
}

// ============================================================================
// Typed Response
// ============================================================================

/// Accepted response whose body was decoded into `T`.
///
/// `data` is `None` when the server sent an empty body.
#[derive(Debug, Clone)]
pub struct TypedResponse<T> {
    status: u16,
    data: Option<T>,
    headers: HeaderMap,
}

impl<T> TypedResponse<T> {
    /// Creates a typed response.
    #[must_use]
    pub const fn new(status: u16, data: Option<T>, headers: HeaderMap) -> Self {
        Self {
            status,
            data,
            headers,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Decoded body, if the server sent one.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Consume into the decoded body.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Consume into (status, data, headers).
    #[must_use]
    pub fn into_parts(self) -> (u16, Option<T>, HeaderMap) {
        (self.status, self.data, self.headers)
    }
}
