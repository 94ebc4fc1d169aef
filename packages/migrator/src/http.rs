//! HTTP client wrapper for the store admin REST API.

use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::StatusCode;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{MigratorError, Result};

/// User agent string identifying this migrator.
const USER_AGENT: &str = concat!("blog-migrator/", env!("CARGO_PKG_VERSION"));

/// Header carrying the store access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Upper bound on a server-requested `Retry-After` delay (seconds).
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Create a configured HTTP client that authenticates every request with `token`.
pub fn create_client(token: &str) -> Result<Client> {
    let mut headers = HeaderMap::new();
    let mut token_value = HeaderValue::from_str(token)
        .map_err(|_| MigratorError::Config("Access token contains invalid characters".into()))?;
    token_value.set_sensitive(true);
    headers.insert(ACCESS_TOKEN_HEADER, token_value);

    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Seconds requested by a `Retry-After` header, if it holds a number.
fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.min(MAX_RETRY_AFTER_SECS))
}

/// Send a request with retry logic.
///
/// `build` is called once per attempt. Uses exponential backoff for
/// transient failures (network errors, 5xx responses) and honours
/// `Retry-After` on 429 responses. Other 4xx responses fail immediately.
///
/// # Arguments
/// * `url` - URL of the request, used in error messages
/// * `build` - Produces a fresh request for each attempt
pub fn send_with_retry<F>(url: &str, build: F) -> Result<Response>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<String> = None;
    let mut requested_delay: Option<Duration> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // Exponential backoff: 500ms, 1000ms, 2000ms
            let delay = requested_delay.take().unwrap_or_else(|| {
                Duration::from_millis(RETRY_BASE_DELAY_MS * (1 << (attempt - 1)))
            });
            tracing::debug!(attempt, delay = ?delay, "Retrying after delay");
            thread::sleep(delay);
        }

        match build().send() {
            Ok(response) => {
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    requested_delay = retry_after_secs(&response).map(Duration::from_secs);
                    tracing::warn!(
                        url,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        "Rate limited, will retry"
                    );
                    last_error = Some(format!("Rate limited: {status}"));
                    continue;
                }

                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        "Server error, will retry"
                    );
                    last_error = Some(format!("Server error: {status}"));
                    continue;
                }

                // Don't retry other client errors - they won't succeed
                if status.is_client_error() {
                    let body = response.text().unwrap_or_default();
                    return Err(MigratorError::Api {
                        status: status.as_u16(),
                        url: url.to_string(),
                        body,
                    });
                }

                return Ok(response);
            }
            Err(e) => {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
                return Err(MigratorError::Http(e));
            }
        }
    }

    Err(MigratorError::RetriesExhausted {
        attempts: MAX_RETRIES,
        message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
    })
}
