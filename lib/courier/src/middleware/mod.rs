//! Tower middleware layers for courier pooled clients.
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`

mod logging;

pub use logging::{Logging, LoggingLayer};
