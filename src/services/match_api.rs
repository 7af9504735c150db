use crate::models::MatchRun;
use reqwest::{Client, Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the match-run API
#[derive(Debug, Error)]
pub enum MatchApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Too many requests, slow down")]
    RateLimited,

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Match-run endpoints the poller depends on
pub trait MatchRunApi: Send + Sync + 'static {
    /// `POST /match/run`; may return an existing ready run for the same URL
    fn create_run(&self, url: &str) -> impl Future<Output = Result<MatchRun, MatchApiError>> + Send;

    /// `GET /match/run/:id`
    fn get_run(&self, run_id: &str) -> impl Future<Output = Result<MatchRun, MatchApiError>> + Send;
}

/// HTTP client for the match-run API
pub struct MatchApiClient {
    base_url: String,
    client: Client,
}

impl MatchApiClient {
    /// Create a new client
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, MatchApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn parse_run(response: Response, context: &str) -> Result<MatchRun, MatchApiError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MatchApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("{} failed: {} - {}", context, status, body);
            return Err(MatchApiError::ApiError {
                status: status.as_u16(),
                message: error_message_from_body(&body)
                    .unwrap_or_else(|| format!("{} failed", context)),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| MatchApiError::InvalidResponse(format!("{}: {}", context, e)))
    }
}

/// Pull an `error`/`message` field out of a JSON error body
fn error_message_from_body(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("error")
        .or_else(|| json.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

impl MatchRunApi for MatchApiClient {
    async fn create_run(&self, url: &str) -> Result<MatchRun, MatchApiError> {
        let endpoint = self.endpoint("/match/run");
        tracing::debug!("Creating match run for {}", url);

        let response = self
            .client
            .post(&endpoint)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await?;

        Self::parse_run(response, "Create match run").await
    }

    async fn get_run(&self, run_id: &str) -> Result<MatchRun, MatchApiError> {
        let endpoint = self.endpoint(&format!("/match/run/{}", urlencoding::encode(run_id)));

        let response = self.client.get(&endpoint).send().await?;

        Self::parse_run(response, "Fetch match run").await
    }
}
