//! HTTP client trait.
//!
//! [`HttpClient`] is the transport seam: it sends a fully built request and
//! hands back the buffered response. Status policy and JSON decoding live in
//! the executor above it.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations should be async-first and support connection pooling.
/// The whole response body is read before the future resolves.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Body read failures
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}
