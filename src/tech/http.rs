//! Outbound HTTP client base
//!
//! Wraps a pooled `reqwest::Client` bound to a base URL. Every response goes
//! through [`HttpClientBase::ensure_success`], so callers only ever see
//! decoded payloads or an error carrying the status code.

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

type TokenGenerator = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct HttpClientBase {
    client: reqwest::Client,
    base_url: String,
    generate_token: Option<TokenGenerator>,
}

impl HttpClientBase {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("machine-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            generate_token: None,
        }
    }

    /// Attach a bearer token to every request, generated fresh per call
    pub fn with_token_generator<F>(mut self, generate: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.generate_token = Some(Arc::new(generate));
        self
    }

    /// Resolve `path` against the base URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.generate_token {
            Some(generate) => request.bearer_auth(generate()),
            None => request,
        }
    }

    pub async fn get_json<U: DeserializeOwned>(&self, path: &str) -> Result<U> {
        let url = self.url(path);
        log::debug!("GET {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        Self::ensure_success(response)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    /// GET a raw body, asking the server for XML
    pub async fn get_plain_string(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        log::debug!("GET {} (plain)", url);

        let response = self
            .authorize(self.client.get(&url))
            .header(ACCEPT, HeaderValue::from_static("application/xml"))
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        Self::ensure_success(response)
            .await?
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))
    }

    pub async fn post_json<U, X>(&self, path: &str, model: &X) -> Result<U>
    where
        U: DeserializeOwned,
        X: Serialize + ?Sized,
    {
        let url = self.url(path);
        log::debug!("POST {}", url);

        let response = self
            .authorize(self.client.post(&url))
            .json(model)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        Self::ensure_success(response)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    pub async fn put_json<U, X>(&self, path: &str, model: &X) -> Result<U>
    where
        U: DeserializeOwned,
        X: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.send_put(&url, model).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }

    /// PUT and ignore the response body
    pub async fn put<X: Serialize + ?Sized>(&self, path: &str, model: &X) -> Result<()> {
        let url = self.url(path);
        self.send_put(&url, model).await?;
        Ok(())
    }

    async fn send_put<X: Serialize + ?Sized>(&self, url: &str, model: &X) -> Result<Response> {
        log::debug!("PUT {}", url);

        let response = self
            .authorize(self.client.put(url))
            .json(model)
            .send()
            .await
            .with_context(|| format!("PUT {} failed", url))?;

        Self::ensure_success(response).await
    }

    /// Turn any non-2xx response into an error with status and body
    pub async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        log::warn!("Request to {} failed with {}", url, status);
        anyhow::bail!("Request to {} failed with status {}: {}", url, status, body)
    }
}
