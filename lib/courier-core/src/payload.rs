//! Request payload descriptors.
//!
//! - [`Query`] - query parameters for any verb
//! - [`RequestData`] - query parameters plus an optional JSON or form body
//! - [`ResolvedBody`] - wire-ready bytes with their content type
//!
//! # Example
//!
//! ```
//! use courier_core::{ContentType, RequestData};
//! use serde_json::json;
//!
//! let data = RequestData::new()
//!     .query("dry_run", "true")
//!     .json(json!({"name": "Jane Doe"}));
//!
//! let body = data.resolve().expect("encode").expect("has body");
//! assert_eq!(body.content_type(), ContentType::Json);
//! assert_eq!(body.bytes().as_ref(), br#"{"name":"Jane Doe"}"#);
//! ```

use std::collections::BTreeMap;

use bytes::Bytes;
use url::Url;

use crate::{ContentType, Result, to_form, to_json};

// ============================================================================
// Query
// ============================================================================

/// Query parameters appended to a request URL.
///
/// Parameters are kept sorted by key, so the generated query string is the
/// same on every call. Keys and values are percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, String>,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a parameter in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    /// Parameter value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if there is no parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Appends the parameters to `url`.
    ///
    /// An empty query leaves the URL untouched. Existing query pairs are kept.
    pub fn apply_to(&self, url: &mut Url) {
        if self.params.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(&self.params);
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// ============================================================================
// Resolved Body
// ============================================================================

/// Encoded request body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBody {
    content_type: ContentType,
    bytes: Bytes,
}

impl ResolvedBody {
    /// Creates a resolved body.
    #[must_use]
    pub const fn new(content_type: ContentType, bytes: Bytes) -> Self {
        Self {
            content_type,
            bytes,
        }
    }

    /// Content type to send with the body.
    #[must_use]
    pub const fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Encoded bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Consume into the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

// ============================================================================
// Request Data
// ============================================================================

/// Payload of a write request: query parameters plus a JSON or form body.
///
/// `J` is the JSON body type; it defaults to `()` when no JSON body is set.
/// When both a JSON body and form fields are present the JSON body wins.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestData<J = ()> {
    query: Query,
    json: Option<J>,
    form: BTreeMap<String, String>,
}

impl<J> Default for RequestData<J> {
    fn default() -> Self {
        Self {
            query: Query::default(),
            json: None,
            form: BTreeMap::new(),
        }
    }
}

impl RequestData {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<J> RequestData<J> {
    /// Sets the JSON body.
    #[must_use]
    pub fn json<T>(self, value: T) -> RequestData<T> {
        RequestData {
            query: self.query,
            json: Some(value),
            form: self.form,
        }
    }

    /// Sets a form field.
    #[must_use]
    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    /// Sets several form fields.
    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.form
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name, value);
        self
    }

    /// Replaces all query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &Query {
        &self.query
    }

    /// JSON body, if set.
    #[must_use]
    pub const fn json_body(&self) -> Option<&J> {
        self.json.as_ref()
    }

    /// Form fields.
    #[must_use]
    pub const fn form_fields(&self) -> &BTreeMap<String, String> {
        &self.form
    }
}

impl<J: serde::Serialize> RequestData<J> {
    /// Encodes the body.
    ///
    /// Returns `None` when neither a JSON body nor form fields are set.
    ///
    /// # Errors
    ///
    /// Returns a body-encoding error if serialization fails.
    pub fn resolve(&self) -> Result<Option<ResolvedBody>> {
        if let Some(json) = &self.json {
            let bytes = to_json(json)?;
            return Ok(Some(ResolvedBody::new(ContentType::Json, bytes)));
        }
        if !self.form.is_empty() {
            let bytes = to_form(&self.form)?;
            return Ok(Some(ResolvedBody::new(ContentType::FormUrlEncoded, bytes)));
        }
        Ok(None)
    }
}
