//! HTTP client with connection pooling and retry logic

use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use shaproof_errors::{Error, NetworkError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Fallback wait reported when a 429 carries no `retry-after`
const DEFAULT_RATE_LIMIT_WAIT: u64 = 60;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    /// Extra attempts after the first; zero disables retries
    pub retry_count: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 4,
            retry_count: 0,
            retry_delay: Duration::from_secs(1),
            user_agent: format!("shaproof/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    /// Execute a GET request carrying extra headers, with retries
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retry attempts or the
    /// server reports that the rate limit is exhausted.
    pub async fn get_with_headers(&self, url: &str, headers: &HeaderMap) -> Result<Response, Error> {
        self.retry_request(|| self.client.get(url).headers(headers.clone()).send())
            .await
    }

    /// Execute a request with retries
    ///
    /// Transport failures and 5xx responses are retried up to `retry_count`
    /// times; the last 5xx response is handed back to the caller.
    async fn retry_request<F, Fut>(&self, mut f: F) -> Result<Response, Error>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.retry_count {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay * attempt).await;
            }

            match f().await {
                Ok(response) => {
                    if let Some(seconds) = rate_limit_wait(&response) {
                        return Err(NetworkError::RateLimited { seconds }.into());
                    }

                    if response.status().is_server_error() && attempt < self.config.retry_count {
                        tracing::debug!(
                            status = response.status().as_u16(),
                            attempt,
                            "server error, retrying"
                        );
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) => {
                    // Don't retry on certain errors
                    let retry = Self::should_retry(&e);
                    last_error = Some(e);
                    if !retry {
                        break;
                    }
                }
            }
        }

        // Convert the last error
        match last_error {
            Some(e) if e.is_timeout() => Err(NetworkError::Timeout {
                url: e
                    .url()
                    .map(std::string::ToString::to_string)
                    .unwrap_or_default(),
            }
            .into()),
            Some(e) if e.is_connect() => Err(NetworkError::ConnectionRefused(e.to_string()).into()),
            Some(e) => Err(NetworkError::RequestFailed(e.to_string()).into()),
            None => Err(NetworkError::RequestFailed("Unknown error".to_string()).into()),
        }
    }

    /// Determine if an error should be retried
    fn should_retry(error: &reqwest::Error) -> bool {
        // Transport failures retry; errors carrying a status retry only on 5xx
        error.is_timeout()
            || error.is_connect()
            || error.status().is_none_or(|s| s.is_server_error())
    }
}

/// Seconds to wait when the response signals an exhausted rate limit
///
/// Covers `429 Too Many Requests` and the `403` GitHub sends once
/// `x-ratelimit-remaining` reaches zero.
fn rate_limit_wait(response: &Response) -> Option<u64> {
    let headers = response.headers();
    let header_u64 = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
    };

    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => {
            Some(header_u64("retry-after").unwrap_or(DEFAULT_RATE_LIMIT_WAIT))
        }
        StatusCode::FORBIDDEN if header_u64("x-ratelimit-remaining") == Some(0) => {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs());
            Some(
                header_u64("retry-after")
                    .or_else(|| header_u64("x-ratelimit-reset").map(|reset| reset.saturating_sub(now)))
                    .unwrap_or(DEFAULT_RATE_LIMIT_WAIT),
            )
        }
        _ => None,
    }
}
