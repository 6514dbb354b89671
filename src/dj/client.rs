use crate::config::DjSettings;
use crate::radio::QueuedRequest;

use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DjError {
    #[error("Http Error: {status}\n{body}")]
    Http { status: StatusCode, body: String },

    #[error("Error Connecting: {0}")]
    Connection(reqwest::Error),

    #[error("Timeout Error: {0}")]
    Timeout(reqwest::Error),

    #[error("Error: {0}")]
    Other(reqwest::Error),
}

impl From<reqwest::Error> for DjError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DjError::Timeout(err)
        } else if err.is_connect() {
            DjError::Connection(err)
        } else {
            DjError::Other(err)
        }
    }
}

/// Talks to the radio API with the DJ's token.
pub struct DjClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl DjClient {
    pub fn new(settings: &DjSettings) -> Result<Self, DjError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            token: settings.token.clone(),
        })
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DjError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DjError::Http { status, body })
    }

    pub async fn next(&self) -> Result<QueuedRequest, DjError> {
        let url = format!("{}next/", self.api_url);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn played(&self, request_id: i64) -> Result<(), DjError> {
        let url = format!("{}played/", self.api_url);
        debug!("POST {} ({})", url, request_id);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&json!({ "song_request": request_id }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
