//! Pooled HTTP client using hyper-util.

use std::error::Error as StdError;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::{
    client::legacy::Client,
    rt::{TokioExecutor, TokioTimer},
};
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::{
    Error, HttpClient, Request, Response, Result,
    config::TransportSettings,
    connector::{TimedHttpsConnector, timed_https_connector},
    middleware::LoggingLayer,
};

// ============================================================================
// Type-Erased Service
// ============================================================================

/// Type-erased service stack behind a pooled client.
pub type BoxedService = BoxCloneService<Request<Bytes>, Response<Bytes>, Error>;

/// Future type for Tower Service implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

/// Thread-safe wrapper for `BoxedService`.
///
/// This wrapper uses a Mutex to make the service Sync, which is required
/// by the `HttpClient` trait.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request<Bytes>) -> ServiceFuture {
        // Lock, clone the service, and release the lock immediately
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

// ============================================================================
// Raw Client
// ============================================================================

/// Raw hyper client, innermost service of the stack.
#[derive(Clone)]
struct RawHyperClient {
    inner: Client<TimedHttpsConnector, Full<Bytes>>,
    timeout: Duration,
}

impl RawHyperClient {
    fn new(settings: TransportSettings) -> Self {
        let connector = timed_https_connector(settings.tls_handshake_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(settings.idle_conn_timeout)
            .pool_max_idle_per_host(settings.max_idle_conns)
            .build(connector);

        Self {
            inner,
            timeout: settings.timeout,
        }
    }

    /// Build a hyper request from a courier request.
    fn build_hyper_request(request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let body = body.map_or_else(Full::default, Full::new);
        let mut http_request = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str())
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))?;

        *http_request.headers_mut() = headers;

        Ok(http_request)
    }

    /// Send the request and buffer the whole response, bounded by the timeout.
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let hyper_request = Self::build_hyper_request(request)?;

        tokio::time::timeout(self.timeout, self.exchange(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
    }

    async fn exchange(&self, request: http::Request<Full<Bytes>>) -> Result<Response<Bytes>> {
        let response = self
            .inner
            .request(request)
            .await
            .map_err(Self::map_hyper_error)?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| Error::response_read(e.to_string()))?
            .to_bytes();

        Ok(Response::new(parts.status.as_u16(), parts.headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let timed_out = error_chain(&err).any(|cause| {
            cause
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::TimedOut)
        });
        if timed_out {
            return Error::Timeout;
        }

        let msg = error_chain(&err)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ");

        if is_tls_error(&err) {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

fn error_chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

/// A rustls error anywhere in the chain, bare or wrapped in an [`io::Error`].
fn is_tls_error(err: &(dyn StdError + 'static)) -> bool {
    error_chain(err).any(|cause| {
        cause.is::<rustls::Error>()
            || cause
                .downcast_ref::<io::Error>()
                .and_then(io::Error::get_ref)
                .is_some_and(|inner| inner.is::<rustls::Error>())
    })
}

impl Service<Request<Bytes>> for RawHyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}

// ============================================================================
// Pooled Client
// ============================================================================

/// HTTP client with its own connection pool, built for one set of
/// [`TransportSettings`].
///
/// Instances are created and cached by [`ClientPool`](crate::ClientPool);
/// every request goes through the logging middleware before reaching hyper.
#[derive(Clone)]
pub struct PooledClient {
    service: SyncService,
    settings: TransportSettings,
}

impl std::fmt::Debug for PooledClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PooledClient {
    /// Create a client for the given settings.
    #[must_use]
    pub fn new(settings: TransportSettings) -> Self {
        let raw = RawHyperClient::new(settings);
        let service: BoxedService = BoxCloneService::new(LoggingLayer::new().layer(raw));

        Self {
            service: SyncService::new(service),
            settings,
        }
    }

    /// The settings this client was built with.
    #[must_use]
    pub const fn settings(&self) -> &TransportSettings {
        &self.settings
    }
}

impl HttpClient for PooledClient {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.service.call(request).await
    }
}

impl Service<Request<Bytes>> for PooledClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        // SyncService is always ready (the underlying service is polled when called)
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        self.service.call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn client_keeps_settings() {
        let settings = Config::new()
            .timeout(Duration::from_secs(60))
            .max_idle_conns(16)
            .transport_settings();
        let client = PooledClient::new(settings);

        assert_eq!(client.settings().timeout, Duration::from_secs(60));
        assert_eq!(client.settings().max_idle_conns, 16);
    }

    #[test]
    fn client_is_debug() {
        let client = PooledClient::new(Config::default().transport_settings());
        let debug = format!("{client:?}");
        assert!(debug.contains("PooledClient"));
    }

    #[test]
    fn tls_errors_are_detected_by_type() {
        let bare = rustls::Error::InvalidCertificate(rustls::CertificateError::UnknownIssuer);
        assert!(is_tls_error(&bare));

        let wrapped = io::Error::new(
            io::ErrorKind::InvalidData,
            rustls::Error::InvalidCertificate(rustls::CertificateError::Expired),
        );
        assert!(is_tls_error(&wrapped));
    }

    #[test]
    fn tls_in_host_name_is_not_a_tls_error() {
        let refused = io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "tcp connect error: tls.example.com: Connection refused",
        );
        assert!(!is_tls_error(&refused));
    }

    #[test]
    fn build_request_keeps_headers() {
        let url = url::Url::parse("http://localhost:8080/users?page=1").expect("url");
        let request = Request::builder(crate::Method::Post, url)
            .header(http::header::ACCEPT, "application/json")
            .body(Bytes::from_static(b"{}"))
            .build();

        let hyper_request = RawHyperClient::build_hyper_request(request).expect("request");
        assert_eq!(hyper_request.method(), http::Method::POST);
        assert_eq!(hyper_request.uri(), "http://localhost:8080/users?page=1");
        assert_eq!(
            hyper_request.headers().get(http::header::ACCEPT),
            Some(&http::HeaderValue::from_static("application/json"))
        );
    }
}
