//! Request executor and the five verb entry points.

use std::future::{Future, pending};
use std::sync::Arc;

use bytes::Bytes;
use http::HeaderValue;
use http::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    ClientPool, Config, ContentType, Error, Headers, HttpClient, Method, Query, Request,
    RequestData, ResolvedBody, Response, Result, StatusError, TypedResponse, from_json,
};

/// Typed JSON client.
///
/// Each call applies the configuration defaults, sends the request through
/// the pooled client matching the configuration, checks the status and
/// decodes the body into `T`.
///
/// Clones share the same [`ClientPool`].
///
/// # Example
///
/// ```ignore
/// use courier::prelude::*;
///
/// #[derive(Debug, Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// let courier = Courier::new();
/// let mut headers = Headers::new();
/// headers.add_bearer("my-token");
///
/// let response = courier
///     .get::<User>(&Config::new(), "https://api.example.com/users/1", headers, Query::new())
///     .await?;
/// println!("{:?}", response.data());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Courier {
    pool: Arc<ClientPool>,
}

impl Courier {
    /// Create a courier with its own client pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a courier that draws clients from `pool`.
    #[must_use]
    pub const fn with_pool(pool: Arc<ClientPool>) -> Self {
        Self { pool }
    }

    /// The client pool.
    #[must_use]
    pub const fn pool(&self) -> &Arc<ClientPool> {
        &self.pool
    }

    /// Send a GET request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        config: &Config,
        url: &str,
        headers: Headers,
        query: Query,
    ) -> Result<TypedResponse<T>> {
        self.send(config, Method::Get, url, headers, &query, None)
            .await
    }

    /// Send a DELETE request.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        config: &Config,
        url: &str,
        headers: Headers,
        query: Query,
    ) -> Result<TypedResponse<T>> {
        self.send(config, Method::Delete, url, headers, &query, None)
            .await
    }

    /// Send a POST request.
    pub async fn post<T: DeserializeOwned, J: Serialize>(
        &self,
        config: &Config,
        url: &str,
        headers: Headers,
        data: RequestData<J>,
    ) -> Result<TypedResponse<T>> {
        self.send_data(config, Method::Post, url, headers, &data)
            .await
    }

    /// Send a PUT request.
    pub async fn put<T: DeserializeOwned, J: Serialize>(
        &self,
        config: &Config,
        url: &str,
        headers: Headers,
        data: RequestData<J>,
    ) -> Result<TypedResponse<T>> {
        self.send_data(config, Method::Put, url, headers, &data)
            .await
    }

    /// Send a PATCH request.
    pub async fn patch<T: DeserializeOwned, J: Serialize>(
        &self,
        config: &Config,
        url: &str,
        headers: Headers,
        data: RequestData<J>,
    ) -> Result<TypedResponse<T>> {
        self.send_data(config, Method::Patch, url, headers, &data)
            .await
    }

    async fn send_data<T: DeserializeOwned, J: Serialize>(
        &self,
        config: &Config,
        method: Method,
        url: &str,
        headers: Headers,
        data: &RequestData<J>,
    ) -> Result<TypedResponse<T>> {
        let body = data.resolve()?;
        self.send(config, method, url, headers, data.query_params(), body)
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        config: &Config,
        method: Method,
        url: &str,
        headers: Headers,
        query: &Query,
        body: Option<ResolvedBody>,
    ) -> Result<TypedResponse<T>> {
        let mut url = Url::parse(url)?;
        query.apply_to(&mut url);

        let mut builder = Request::builder(method, url).headers(headers.to_header_map()?);
        if let Some(body) = body {
            builder = builder.resolved_body(body);
        }

        self.execute(config, builder.build()).await
    }

    /// Run a built request through the pipeline.
    ///
    /// `Accept: application/json` replaces any `Accept` header of the request.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        config: &Config,
        mut request: Request<Bytes>,
    ) -> Result<TypedResponse<T>> {
        let config = config.clone().with_defaults();

        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static(ContentType::Json.as_str()));

        let client = self.pool.get_client(&config);
        let response = guard(&config, client.execute(request)).await?;

        decode(&config, response)
    }
}

/// Race the exchange against the cancel token and the deadline.
async fn guard<F>(config: &Config, exchange: F) -> Result<Response<Bytes>>
where
    F: Future<Output = Result<Response<Bytes>>>,
{
    let cancelled = async {
        match &config.cancel {
            Some(token) => token.cancelled().await,
            None => pending().await,
        }
    };
    let deadline = async {
        match config.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => pending().await,
        }
    };

    tokio::select! {
        biased;
        () = cancelled => Err(Error::Cancelled),
        () = deadline => Err(Error::Timeout),
        result = exchange => result,
    }
}

/// Apply the status policy, then decode the body.
fn decode<T: DeserializeOwned>(
    config: &Config,
    response: Response<Bytes>,
) -> Result<TypedResponse<T>> {
    let status = response.status();

    if !config.is_acceptable(status) {
        warn!(status, "unacceptable response status");
        return Err(StatusError::new(status, response.body()).into());
    }

    let data = if response.is_body_empty() {
        debug!(status, "empty response body");
        None
    } else {
        Some(from_json(response.body())?)
    };

    let (status, headers, _) = response.into_parts();
    Ok(TypedResponse::new(status, data, headers))
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use http::HeaderMap;
    use serde::Deserialize;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::{ErrorBody, ErrorKind};

    #[derive(Debug, PartialEq, Deserialize)]
    struct User {
        id: String,
    }

    fn response(status: u16, body: &'static str) -> Response<Bytes> {
        Response::new(status, HeaderMap::new(), Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn decode_accepted_body() {
        let config = Config::default();
        let_assert!(Ok(typed) = decode::<User>(&config, response(200, r#"{"id":"123"}"#)));

        check!(typed.status() == 200);
        check!(typed.data() == Some(&User { id: "123".into() }));
    }

    #[test]
    fn decode_empty_body() {
        let config = Config::default();
        let_assert!(Ok(typed) = decode::<User>(&config, response(200, "")));

        check!(typed.status() == 200);
        check!(typed.data().is_none());
    }

    #[test]
    fn decode_any_2xx() {
        let config = Config::default();
        for status in [200, 201, 203, 226, 299] {
            let_assert!(Ok(typed) = decode::<User>(&config, response(status, r#"{"id":"1"}"#)));
            check!(typed.status() == status);
        }

        let_assert!(Err(err) = decode::<User>(&config, response(300, "")));
        check!(err.status() == Some(300));
        let_assert!(Err(err) = decode::<User>(&config, response(199, "")));
        check!(err.status() == Some(199));
    }

    #[test]
    fn decode_listed_2xx_overlap() {
        let config = Config::new().acceptable_status([201]);
        let_assert!(Ok(typed) = decode::<User>(&config, response(201, r#"{"id":"1"}"#)));

        check!(typed.status() == 201);
        check!(typed.data() == Some(&User { id: "1".into() }));
    }

    #[test]
    fn decode_listed_status() {
        let config = Config::new().acceptable_status([404]);
        let_assert!(Ok(typed) = decode::<User>(&config, response(404, r#"{"id":"x"}"#)));

        check!(typed.status() == 404);
    }

    #[test]
    fn decode_rejected_status() {
        let config = Config::default();
        let_assert!(
            Err(Error::Status(err)) = decode::<User>(&config, response(500, r#"{"error":"boom"}"#))
        );

        check!(err.status() == 500);
        check!(err.message() == "unexpected status code: 500");
        check!(err.body().as_json().is_some());
    }

    #[test]
    fn decode_rejected_raw_body() {
        let config = Config::default();
        let_assert!(Err(err) = decode::<User>(&config, response(503, "upstream down")));

        check!(err.kind() == ErrorKind::Status);
        let_assert!(Some(status_error) = err.into_status_error());
        check!(status_error.body() == &ErrorBody::Raw("upstream down".into()));
    }

    #[test]
    fn decode_shape_mismatch() {
        let config = Config::default();
        let_assert!(Err(err) = decode::<User>(&config, response(200, r#"{"id":42}"#)));

        check!(err.kind() == ErrorKind::Decode);
        let_assert!(Error::JsonDeserialization { path, .. } = err);
        check!(path == "id");
    }

    #[tokio::test]
    async fn guard_passes_result_through() {
        let config = Config::default();
        let result = guard(&config, async { Ok(response(204, "")) }).await;

        let_assert!(Ok(response) = result);
        check!(response.status() == 204);
    }

    #[tokio::test]
    async fn guard_cancelled_token() {
        let token = CancellationToken::new();
        token.cancel();
        let config = Config::new().cancel_token(token);

        let result = guard(&config, pending()).await;
        let_assert!(Err(Error::Cancelled) = result);
    }

    #[tokio::test(start_paused = true)]
    async fn guard_deadline() {
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_millis(10);
        let config = Config::new().deadline(deadline);

        let result = guard(&config, pending()).await;
        let_assert!(Err(Error::Timeout) = result);
    }

    #[tokio::test]
    async fn invalid_url_fails_before_dispatch() {
        let courier = Courier::new();
        let result = courier
            .get::<User>(&Config::default(), "not a url", Headers::new(), Query::new())
            .await;

        let_assert!(Err(err) = result);
        check!(err.kind() == ErrorKind::RequestConstruction);
        check!(courier.pool().is_empty());
    }

    #[tokio::test]
    async fn encoding_failure_fails_before_dispatch() {
        let courier = Courier::new();
        let data = RequestData::new().json(std::collections::HashMap::from([((1, 2), "pair")]));
        let result = courier
            .post::<User, _>(&Config::default(), "http://localhost/", Headers::new(), data)
            .await;

        let_assert!(Err(err) = result);
        check!(err.kind() == ErrorKind::BodyEncoding);
        check!(courier.pool().is_empty());
    }
}
