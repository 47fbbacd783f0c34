use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const MAX_RETRIES: usize = 2;
const BASE_BACKOFF_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub api_key: Option<String>,
    pub api_endpoint: Option<String>,
}

/// Upstream response; either a flat `{url}` or the OpenAI-style
/// `{data: [{url}]}` shape is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    pub url: Option<String>,
    #[serde(default)]
    pub data: Vec<GeneratedImageItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImageItem {
    pub url: Option<String>,
}

impl GeneratedImage {
    pub fn into_url(self) -> Option<String> {
        self.url
            .or_else(|| self.data.into_iter().find_map(|item| item.url))
            .filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image generation not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("upstream returned no image URL")]
    EmptyResponse,
}

/// Thin client for the external text-to-image API the admin page uses to
/// illustrate entries. Configured entirely from env; when unconfigured the
/// route answers 503 instead of failing at startup.
#[derive(Clone)]
pub struct ImageProvider {
    config: ImageConfig,
    client: reqwest::Client,
}

impl ImageProvider {
    pub fn from_env() -> Self {
        let api_key = env_string("IMAGE_API_KEY");
        let api_endpoint = env_string("IMAGE_API_ENDPOINT");
        let timeout =
            Duration::from_millis(env_u64("IMAGE_API_TIMEOUT").unwrap_or(DEFAULT_TIMEOUT_MS));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config: ImageConfig {
                api_key,
                api_endpoint,
            },
            client,
        }
    }

    pub fn is_available(&self) -> bool {
        self.config
            .api_endpoint
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let endpoint = self
            .config
            .api_endpoint
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ImageError::NotConfigured("IMAGE_API_ENDPOINT"))?;

        let payload = serde_json::json!({ "prompt": prompt, "n": 1 });
        let response = self.post_with_retry(endpoint, &payload).await?;
        response.into_url().ok_or(ImageError::EmptyResponse)
    }

    async fn post_with_retry(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<GeneratedImage, ImageError> {
        let mut last_error: Option<ImageError> = None;

        for retry in 0..=MAX_RETRIES {
            let mut request = self.client.post(url).json(payload);
            if let Some(key) = self.config.api_key.as_deref().filter(|v| !v.trim().is_empty()) {
                request = request.bearer_auth(key);
            }

            match request.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let bytes = resp.bytes().await?;
                        return serde_json::from_slice(&bytes).map_err(ImageError::Json);
                    }
                    let body = resp.text().await.unwrap_or_default();
                    let err = ImageError::HttpStatus { status, body };
                    if retry < MAX_RETRIES && is_retryable(status) {
                        let backoff = Duration::from_millis(BASE_BACKOFF_MS * (1 << retry));
                        warn!(retry, ?status, "image request failed, retrying");
                        sleep(backoff).await;
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    let err = ImageError::Request(e);
                    if retry < MAX_RETRIES {
                        let backoff = Duration::from_millis(BASE_BACKOFF_MS * (1 << retry));
                        warn!(retry, "image request error, retrying");
                        sleep(backoff).await;
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            }
        }
        Err(last_error.unwrap_or(ImageError::NotConfigured("unknown")))
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.parse().ok()
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}
