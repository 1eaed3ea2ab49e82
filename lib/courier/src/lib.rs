//! Typed JSON HTTP client with pooled connections.
//!
//! A [`Courier`] sends GET, POST, PUT, PATCH and DELETE requests, checks the
//! response status against the configuration and decodes the JSON body into
//! the caller's type. Clients are cached in a [`ClientPool`] keyed by their
//! transport settings so calls sharing timeouts share connections.
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let courier = Courier::new();
//! let config = Config::new().timeout(std::time::Duration::from_secs(5));
//!
//! let mut headers = Headers::new();
//! headers.add_bearer("token");
//!
//! let response = courier
//!     .get::<User>(&config, "https://api.example.com/users/42", headers, Query::new())
//!     .await?;
//! let user = response.into_data();
//! ```

mod client;
mod config;
mod connector;
mod executor;
pub mod middleware;
mod pool;
pub mod prelude;

pub use client::{BoxedService, PooledClient, ServiceFuture};
pub use config::{
    Config, DEFAULT_IDLE_CONN_TIMEOUT, DEFAULT_MAX_IDLE_CONNS, DEFAULT_TIMEOUT,
    DEFAULT_TLS_HANDSHAKE_TIMEOUT, TransportSettings,
};
pub use connector::{ConnectTimeout, TimedHttpsConnector, https_connector, timed_https_connector};
pub use executor::Courier;
pub use pool::ClientPool;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use courier_core::{
    ContentType, Error, ErrorBody, ErrorKind, Headers, HttpClient, Method, Query, Request,
    RequestBuilder, RequestData, ResolvedBody, Response, Result, StatusError, TypedResponse,
    from_json, to_form, to_json,
};

// Re-export http types for status codes and headers
pub use courier_core::{HeaderMap, StatusCode, header};

pub use tokio_util::sync::CancellationToken;
pub use url;
