//! Outbound HTTP client for third-party JSON APIs.
//!
//! Each call is a single stateless request/response: no retry, no backoff and
//! no caching. Any transport failure or non-2xx status becomes an
//! [`UpstreamError`].

mod error;

pub use error::UpstreamError;

use reqwest::{Client, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::observability::TracedClientExt;

/// Configuration for the upstream client.
#[derive(Clone, Debug)]
pub struct UpstreamClientConfig {
    /// Whole-request timeout, connect included.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("service-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Shared outbound client. Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new(config: UpstreamClientConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// `GET url?query` and decode the JSON body.
    pub async fn get_json<Q, T>(&self, url: &str, query: &Q) -> Result<T, UpstreamError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(target_url = %redact(url), "Sending GET to upstream");

        let response = self
            .client
            .traced_get(url)
            .query(query)
            .send()
            .await
            .map_err(UpstreamError::network)?;

        read_json(response).await
    }

    /// `POST url` with a JSON body and bearer authentication, then decode the
    /// JSON reply.
    pub async fn post_json<B, T>(&self, url: &str, bearer: &str, body: &B) -> Result<T, UpstreamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(target_url = %redact(url), "Sending POST to upstream");

        let response = self
            .client
            .traced_post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(UpstreamError::network)?;

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, UpstreamError> {
    let status = response.status();

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            target: target_of(response.url()),
        });
    }

    response.json::<T>().await.map_err(UpstreamError::decode)
}

/// Host and path only; the query may hold credentials.
fn target_of(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or_default(), url.path())
}

fn redact(url: &str) -> String {
    Url::parse(url)
        .map(|u| target_of(&u))
        .unwrap_or_else(|_| "<invalid url>".to_string())
}
