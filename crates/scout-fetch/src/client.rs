//! Shared HTTP client with throttling and retries.

use std::time::Duration;

use log::{debug, info};
use reqwest::{RequestBuilder, Response, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::Semaphore, time};
use url::Url;

use crate::FetchError;

/// Longest back-off exponent; later attempts wait as long as this one.
const MAX_BACKOFF_EXPONENT: u32 = 5;

/// Client settings.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt for 429, 5xx and transport errors.
    pub retries: u32,
    /// Maximum requests in flight.
    pub concurrency: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("scout/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(15),
            retries: 2,
            concurrency: 8,
        }
    }
}

/// reqwest wrapper adding a request semaphore, a fixed user agent and retries.
#[derive(Debug)]
pub struct HttpClient {
    /// Underlying client.
    client: reqwest::Client,
    /// Bounds requests in flight.
    sem: Semaphore,
    /// Retries after the first attempt.
    retries: u32,
}

impl HttpClient {
    /// Builds a client.
    pub fn new(settings: &ClientSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            sem: Semaphore::new(settings.concurrency.max(1)),
            retries: settings.retries,
        })
    }

    /// GETs a URL and returns the body as text.
    pub async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        let res = self
            .send(&url, || {
                self.client
                    .get(url.clone())
                    .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            })
            .await?;
        res.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// GETs a URL and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let res = self
            .send(&url, || {
                self.client
                    .get(url.clone())
                    .header(header::ACCEPT, "application/json")
            })
            .await?;
        decode(&url, res).await
    }

    /// POSTs a JSON body with a bearer token and decodes the JSON response.
    pub async fn post_json<B, T>(
        &self,
        url: Url,
        token: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, FetchError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let res = self
            .send(&url, || {
                self.client
                    .post(url.clone())
                    .bearer_auth(token)
                    .timeout(timeout)
                    .json(body)
            })
            .await?;
        decode(&url, res).await
    }

    /// Sends the request built by `make`, retrying transient failures with back-off.
    async fn send(
        &self,
        url: &Url,
        make: impl Fn() -> RequestBuilder,
    ) -> Result<Response, FetchError> {
        let mut attempt = 0;
        loop {
            let result = {
                let _permit = self.sem.acquire().await;
                info!("REQ {url}");
                make().send().await
            };
            match result {
                Ok(res) if res.status().is_success() => return Ok(res),
                Ok(res) => {
                    let status = res.status();
                    if should_retry(status) && attempt < self.retries {
                        attempt += 1;
                        debug!("{url} returned {status}, retry {attempt}/{}", self.retries);
                        time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status,
                    });
                }
                Err(err) => {
                    if is_retryable_error(&err) && attempt < self.retries {
                        attempt += 1;
                        debug!("{url} failed ({err}), retry {attempt}/{}", self.retries);
                        time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(FetchError::Http {
                        url: url.to_string(),
                        source: err,
                    });
                }
            }
        }
    }
}

/// Decodes a JSON response body.
async fn decode<T: DeserializeOwned>(url: &Url, res: Response) -> Result<T, FetchError> {
    res.json().await.map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Statuses worth retrying: rate limiting and server errors.
fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Transport errors worth retrying.
fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_body() || err.is_request()
}

/// Exponential back-off: 500 ms doubled per attempt, capped.
fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_millis(500 * (1 << attempt.min(MAX_BACKOFF_EXPONENT)))
}
