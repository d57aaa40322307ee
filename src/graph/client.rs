// Social-graph provider client — bearer-authenticated JSON over HTTP.
//
// A thin reqwest wrapper with a generic GET helper. All provider endpoints
// share the same conventions: bearer-token auth, JSON responses, and numeric
// cursor pagination (first request passes cursor -1, a next_cursor of 0 or an
// empty page signals exhaustion).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::UserId;

/// Cursor value for the first page of any paginated endpoint.
pub const FIRST_PAGE_CURSOR: i64 = -1;

/// Authenticated HTTP client for the social-graph provider.
pub struct GraphClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GraphClient {
    /// Create a new provider client pointing at the given base URL.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("kith/0.1 (trust-decisions)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Make a GET request to a provider endpoint and deserialize the response.
    ///
    /// `path` is the endpoint path (e.g. "followers/ids"). `params` are query
    /// string key-value pairs.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        debug!(path = path, "Provider GET request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Provider request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Provider {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {path} response"))
    }

    /// Resolve a handle to its numeric account id.
    pub async fn resolve_handle(&self, handle: &str) -> Result<UserId> {
        let resp: ShowUserResponse = self
            .get_json("users/show", &[("handle", handle)])
            .await
            .with_context(|| format!("Failed to resolve handle @{handle}"))?;
        Ok(resp.id)
    }
}

// -- Serde types for handle resolution --

#[derive(Deserialize)]
struct ShowUserResponse {
    id: UserId,
}

/// One page of account ids from a relationship endpoint.
#[derive(Debug, Deserialize)]
pub struct IdPage {
    pub ids: Vec<UserId>,
    pub next_cursor: i64,
}
