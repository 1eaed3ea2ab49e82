//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    CancellationToken, Config, Courier, Error, ErrorBody, ErrorKind, Headers, Method, Query,
    RequestData, Result, StatusCode, StatusError, TypedResponse,
};
pub use serde::{Deserialize, Serialize};
