//! Request/response logging middleware.
//!
//! This middleware logs HTTP exchanges using the `tracing` crate. It sits in
//! front of the raw hyper service of every pooled client.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, span, warn};

use crate::{Error, Request, Response, Result};

/// Layer that adds request/response logging at debug level.
///
/// Failures are logged at warn level.
///
/// # Example
///
/// ```ignore
/// use courier::middleware::LoggingLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(LoggingLayer::new())
///     .service(client);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer;

impl LoggingLayer {
    /// Create a new logging layer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging { inner }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method();
        let url = request.url().to_string();

        let span = span!(Level::DEBUG, "http_request", %method, %url);

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();
                debug!(headers = ?request.headers(), "sending request");

                let result = inner.call(request).await;

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        let bytes = response.body().len();
                        debug!(status, bytes, elapsed_ms, "request completed");
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use http::HeaderMap;
    use tower::ServiceExt;

    use super::*;
    use crate::Method;

    /// Service stub replaying canned results.
    #[derive(Clone)]
    struct Replay(Arc<Mutex<VecDeque<Result<Response<Bytes>>>>>);

    impl Service<Request<Bytes>> for Replay {
        type Response = Response<Bytes>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _request: Request<Bytes>) -> Self::Future {
            let next = self
                .0
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .pop_front()
                .unwrap_or(Err(Error::Cancelled));
            Box::pin(async move { next })
        }
    }

    fn request() -> Request<Bytes> {
        let url = url::Url::parse("http://localhost/logged").expect("url");
        Request::builder(Method::Get, url).build()
    }

    #[tokio::test]
    async fn logging_passes_results_through() {
        let replay = Replay(Arc::new(Mutex::new(VecDeque::from([
            Ok(Response::new(204, HeaderMap::new(), Bytes::new())),
            Err(Error::Timeout),
        ]))));
        let service = LoggingLayer::new().layer(replay);

        let response = service.clone().oneshot(request()).await.expect("response");
        assert_eq!(response.status(), 204);

        let err = service.oneshot(request()).await.expect_err("error");
        assert!(err.is_timeout());
    }
}
