//! REST client for the Frunk server.
//!
//! One [`ApiClient`] holds the cookie jar for the session, so every request
//! made through a clone of it is credentialed the same way.

mod auth;
mod koculator;
mod notes;

pub use koculator::Evaluation;
pub use notes::CreatedNote;

use crate::config::ServerConfig;
use crate::error::api::ApiError;

use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, trace, warn};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_MAX_ELAPSED: Duration = Duration::from_secs(2);
const RETRY_INITIAL_INTERVAL: Duration = Duration::from_millis(100);
const FALLBACK_POST_ERROR: &str = "error";

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    retry_max_elapsed: Duration,
}

impl ApiClient {
    pub fn new(api_root: &str) -> Result<Self, ApiError> {
        Self::build(api_root, DEFAULT_TIMEOUT_DURATION, DEFAULT_RETRY_MAX_ELAPSED)
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ApiError> {
        Self::build(
            &config.api_root,
            config.request_timeout(),
            config.retry_max_elapsed(),
        )
    }

    fn build(
        api_root: &str,
        timeout: Duration,
        retry_max_elapsed: Duration,
    ) -> Result<Self, ApiError> {
        // `Url::join` replaces the last segment unless the root ends in '/'
        let mut root = api_root.to_string();
        if !root.ends_with('/') {
            root.push('/');
        }
        let base_url = Url::parse(&root)?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        debug!("API client created for {base_url}");

        Ok(Self {
            base_url,
            client,
            retry_max_elapsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        trace!("{method} {url}");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Turn a non-2xx response into a [`ApiError::Request`].
    ///
    /// POST failures carry the body's `error` field; every other method
    /// carries the raw body text. A body that cannot be read is a transport
    /// failure and comes back as the outer `Err`.
    async fn failure(method: &Method, response: Response) -> Result<ApiError, ApiError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::unreadable_body)?;

        let message = if *method == Method::POST {
            serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| value.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| FALLBACK_POST_ERROR.to_string())
        } else {
            body
        };

        debug!("{method} failed with HTTP {status}: {message}");
        Ok(ApiError::request(status, message))
    }

    async fn expect_json<T: DeserializeOwned>(
        method: &Method,
        response: Response,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::failure(method, response).await?);
        }
        let value: Value = response.json().await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, url.clone(), None).await?;
        Self::expect_json(&Method::GET, response).await
    }

    /// GET with exponential backoff on transient failures.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let mut backoff = ExponentialBackoff {
            initial_interval: RETRY_INITIAL_INTERVAL,
            max_elapsed_time: Some(self.retry_max_elapsed),
            ..Default::default()
        };

        loop {
            match self.get_once(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => match backoff.next_backoff() {
                    Some(delay) => {
                        warn!("GET {url} failed ({e}), retrying after {delay:?}");
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(e),
                },
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(method.clone(), url, Some(body)).await?;
        Self::expect_json(&method, response).await
    }

    /// DELETE, ignoring whatever body the server acknowledges with.
    async fn delete(&self, url: Url) -> Result<(), ApiError> {
        let response = self.send::<()>(Method::DELETE, url, None).await?;
        if !response.status().is_success() {
            return Err(Self::failure(&Method::DELETE, response).await?);
        }
        Ok(())
    }
}
