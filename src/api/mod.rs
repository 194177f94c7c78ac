//! Fetch boundary: one read-only call against the `/users` resource.
//!
//! Owns transport details only (timeout, status mapping, JSON decoding) and
//! turns every failure into a [`FetchError`] before returning. No retries are
//! performed here; retrying means calling [`ApiClient::fetch_all_users`] again.
//!
pub mod model;

pub use model::{Address, Company, User};

use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USERS_PATH: &str = "/users";

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client with an explicit request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::other(e.to_string(), Some("builder")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn users_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), USERS_PATH)
    }

    /// Fetch the full ordered list of users, exactly as the server returns it.
    pub async fn fetch_all_users(&self) -> Result<Vec<User>, FetchError> {
        let url = self.users_url();
        tracing::debug!(%url, "GET users");
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        let users = response
            .json::<Vec<User>>()
            .await
            .map_err(map_transport_error)?;
        tracing::debug!(count = users.len(), "decoded users");
        Ok(users)
    }
}

fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::connectivity(Some("timeout"))
    } else if error.is_connect() {
        FetchError::connectivity(Some("connect"))
    } else if error.is_decode() {
        FetchError::other(format!("invalid user payload: {error}"), Some("decode"))
    } else if error.is_request() {
        FetchError::connectivity(Some("request"))
    } else if let Some(status) = error.status() {
        map_status_error(status)
    } else {
        FetchError::other(error.to_string(), None)
    }
}

fn map_status_error(status: StatusCode) -> FetchError {
    FetchError::server(status.as_u16(), status.canonical_reason().unwrap_or(""))
}
