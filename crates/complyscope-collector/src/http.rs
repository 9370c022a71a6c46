//! Plain HTTP probing: response headers and the policy-text fallback.

use crate::error::{CollectError, Result};
use complyscope_audit::ResponseHeaders;
use complyscope_core::HttpConfig;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Base delay in milliseconds for retry backoff.
const RETRY_DELAY_MS: u64 = 500;

/// Fetches what a browser is not needed for.
#[async_trait::async_trait]
pub trait HttpSource: Send + Sync {
    /// Response headers of `url`, whatever the status code.
    async fn fetch_headers(&self, url: &str) -> Result<ResponseHeaders>;

    /// Body of `url`. Non-success statuses are errors.
    async fn fetch_body(&self, url: &str) -> Result<String>;
}

/// Build an HTTP client with the configured timeout and user agent.
///
/// # Errors
/// Returns error if the HTTP client cannot be created.
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()?)
}

/// reqwest-backed [`HttpSource`] with retries.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    max_retries: u32,
}

impl HttpProbe {
    /// Create a probe from configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            max_retries: config.max_retries,
        })
    }

    /// GET with linear backoff. Transport errors and 5xx responses are
    /// retried; anything else is returned as is.
    async fn get_with_retry(&self, url: &str) -> Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            let outcome = self.client.get(url).send().await;
            let retryable = match &outcome {
                Ok(response) => response.status().is_server_error(),
                Err(e) => !e.is_builder(),
            };

            if !retryable || attempt >= self.max_retries {
                return Ok(outcome?);
            }

            attempt += 1;
            let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
            match &outcome {
                Ok(response) => warn!(
                    url,
                    status = response.status().as_u16(),
                    attempt,
                    ?delay,
                    "server error, retrying"
                ),
                Err(e) => warn!(url, error = %e, attempt, ?delay, "request failed, retrying"),
            }
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl HttpSource for HttpProbe {
    async fn fetch_headers(&self, url: &str) -> Result<ResponseHeaders> {
        let response = self.get_with_retry(url).await?;
        let headers: ResponseHeaders = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        debug!(
            url,
            status = response.status().as_u16(),
            count = headers.len(),
            "response headers fetched"
        );
        Ok(headers)
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let response = self.get_with_retry(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(url, bytes = body.len(), "body fetched");
        Ok(body)
    }
}
