use crate::errors::AppError;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Delay before retrying after the given zero-based attempt.
fn backoff_for(attempt: u32) -> Duration {
    Duration::from_millis(2_u64.saturating_pow(attempt).saturating_mul(100))
}

/// HTTP client with timeout and optional retry logic
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, max_retries: u32) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_retries,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Fetch JSON from URL, retrying with exponential backoff when configured.
    ///
    /// Query parameters are kept out of the span so secrets such as API keys
    /// are never logged.
    #[instrument(skip(self, query), fields(url = %url))]
    pub async fn get_json<T>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let full_url = Url::parse_with_params(url, query)
            .map_err(|e| AppError::internal(format!("Invalid URL {}: {}", url, e)))?;

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.fetch_with_timeout(url, full_url.clone()).await {
                Ok(response) => {
                    info!(url = %url, attempt = attempt.saturating_add(1), "Request successful");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(url = %url, attempt = attempt.saturating_add(1), error = %e, "Request failed");
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let backoff = backoff_for(attempt);
                        warn!(
                            url = %url,
                            backoff_ms = backoff.as_millis(),
                            "Retrying with exponential backoff"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        error!(
            url = %url,
            attempts = self.max_retries.saturating_add(1),
            "All attempts exhausted"
        );
        Err(last_error.unwrap_or_else(|| AppError::internal("Unknown error after retries")))
    }

    async fn fetch_with_timeout<T>(&self, url: &str, full_url: Url) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = tokio::time::timeout(self.timeout, self.client.get(full_url).send())
            .await
            .map_err(|_| AppError::timeout(format!("Request to {} timed out", url)))?
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::timeout(format!("Request to {} timed out", url))
                } else {
                    // Drop the URL from the error: it carries the query string.
                    AppError::NetworkError(e.without_url())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http(
                status.as_u16(),
                format!("HTTP error: {}", status),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::NetworkError(e.without_url()))?;
        let json: T = serde_json::from_str(&text)?;

        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_100ms() {
        assert_eq!(backoff_for(0), Duration::from_millis(100));
        assert_eq!(backoff_for(1), Duration::from_millis(200));
        assert_eq!(backoff_for(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_saturates_for_large_attempts() {
        assert_eq!(backoff_for(64), Duration::from_millis(u64::MAX));
        assert_eq!(backoff_for(u32::MAX), Duration::from_millis(u64::MAX));
    }
}
