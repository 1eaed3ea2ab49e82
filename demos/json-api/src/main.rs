//! JSON API Example
//!
//! Wraps a small user service with courier's typed verbs.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use std::time::Duration;

use courier::prelude::*;

// ============================================================================
// Data Types
// ============================================================================

/// A user of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Fields that can change on an existing user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ============================================================================
// API wrapper
// ============================================================================

/// User service client.
#[derive(Debug, Clone)]
pub struct UserApi {
    courier: Courier,
    config: Config,
    base_url: String,
    token: String,
}

impl UserApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            courier: Courier::new(),
            config: Config::new().timeout(Duration::from_secs(10)),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.add_bearer(&self.token);
        headers
    }

    pub async fn list_users(&self, page: u32) -> courier::Result<Vec<User>> {
        let query = Query::new().param("page", page.to_string());
        let response = self
            .courier
            .get(&self.config, &self.url("/users"), self.headers(), query)
            .await?;
        Ok(response.into_data().unwrap_or_default())
    }

    /// Fetch one user; `None` when the service answers 404.
    pub async fn find_user(&self, id: &str) -> courier::Result<Option<User>> {
        let result = self
            .courier
            .get::<User>(
                &self.config,
                &self.url(&format!("/users/{id}")),
                self.headers(),
                Query::new(),
            )
            .await;

        match result {
            Ok(response) => Ok(response.into_data()),
            Err(Error::Status(err)) if err.status() == 404 => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn create_user(&self, user: &User) -> courier::Result<TypedResponse<User>> {
        self.courier
            .post(
                &self.config,
                &self.url("/users"),
                self.headers(),
                RequestData::new().json(user),
            )
            .await
    }

    pub async fn update_user(&self, id: &str, patch: &UserPatch) -> courier::Result<Option<User>> {
        let response = self
            .courier
            .patch(
                &self.config,
                &self.url(&format!("/users/{id}")),
                self.headers(),
                RequestData::new().json(patch),
            )
            .await?;
        Ok(response.into_data())
    }

    pub async fn delete_user(&self, id: &str) -> courier::Result<()> {
        self.courier
            .delete::<serde_json::Value>(
                &self.config,
                &self.url(&format!("/users/{id}")),
                self.headers(),
                Query::new(),
            )
            .await?;
        Ok(())
    }
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> courier::Result<()> {
    tracing_subscriber::fmt::init();

    let base_url = std::env::var("USER_API_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let api = UserApi::new(base_url, "demo-token");

    println!("User API client created for {}", api.base_url);

    match api.list_users(1).await {
        Ok(users) => println!("{} users on page 1", users.len()),
        Err(Error::Status(err)) => println!("service answered {}: {:?}", err.status(), err.body()),
        Err(err) if err.is_transport() => println!("service unreachable: {err}"),
        Err(err) => return Err(err),
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
