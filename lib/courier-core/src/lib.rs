//! Core types for the courier JSON HTTP client.
//!
//! This crate provides the transport-agnostic types used by courier:
//! - [`Method`] - HTTP method enum
//! - [`Headers`] - request header set with auth helpers
//! - [`Query`], [`RequestData`] and [`ResolvedBody`] - request payloads
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] and [`TypedResponse`] - raw and decoded responses
//! - [`Error`], [`StatusError`] and [`Result`] - Error handling
//! - [`HttpClient`] - Core client trait for HTTP execution
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
mod error;
mod headers;
mod method;
mod payload;
pub mod prelude;
mod request;
mod response;

pub use body::{ContentType, from_json, to_form, to_json};
pub use client::HttpClient;
pub use error::{Error, ErrorBody, ErrorKind, Result, StatusError};
pub use headers::Headers;
pub use method::Method;
pub use payload::{Query, RequestData, ResolvedBody};
pub use request::{Request, RequestBuilder};
pub use response::{Response, TypedResponse};

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, header};
