//! Request header set.
//!
//! [`Headers`] is a plain name/value map. Names are stored as given; case
//! folding only happens once the set is turned into an [`http::HeaderMap`].
//!
//! # Example
//!
//! ```
//! use courier_core::Headers;
//!
//! let mut headers = Headers::new();
//! headers.add("X-Request-Id", "42");
//! headers.add_bearer("my-token");
//!
//! assert_eq!(headers.get("Authorization"), "Bearer my-token");
//! assert_eq!(headers.get("X-Missing"), "");
//! ```

use std::collections::HashMap;
use std::collections::hash_map;

use base64::Engine;
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, Result};

/// Mutable mapping from header name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    /// Creates an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any previous value for the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), value.into());
    }

    /// Returns `true` if a header with exactly this name is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Header value, or an empty string when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.inner.get(name).map_or("", String::as_str)
    }

    /// Removes a header.
    pub fn remove(&mut self, name: &str) {
        self.inner.remove(name);
    }

    /// Sets `Authorization: Bearer <token>`.
    pub fn add_bearer(&mut self, token: impl AsRef<str>) {
        self.add("Authorization", format!("Bearer {}", token.as_ref()));
    }

    /// Sets `Authorization: Basic <base64(username:password)>`.
    pub fn add_basic_auth(&mut self, username: impl AsRef<str>, password: impl AsRef<str>) {
        let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        self.add("Authorization", format!("Basic {encoded}"));
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no header is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts into an [`http::HeaderMap`].
    ///
    /// Names that differ only by case collapse into one entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if a name or value is not legal HTTP.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.inner.len());
        for (name, value) in &self.inner {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
