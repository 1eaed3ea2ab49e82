//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Error, ErrorBody, ErrorKind, Headers, HttpClient, Method, Query, Request,
    RequestData, Response, Result, StatusError, TypedResponse, from_json, to_json,
};
