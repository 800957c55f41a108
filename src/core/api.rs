// src/core/api.rs

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::config::Settings;
use crate::core::models::{
    mime_type_for, AnalysisRequest, AnalyzeReply, AnalyzeResponse, HealthResponse, ServiceConfig,
    TextPayload,
};

pub const ANALYZE_PATH: &str = "api/analyze";
pub const HEALTH_PATH: &str = "api/health";
pub const CONFIG_PATH: &str = "api/config";

/// Failures talking to the analysis service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("{0}")]
    Transport(String),
    /// A response arrived but its body was not the expected JSON.
    #[error("{0}")]
    Decode(String),
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status}")]
    Status { status: u16 },
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// The remote analysis service as seen by the client.
///
/// The HTTP implementation lives below; tests substitute an in-process fake.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Base URL the client talks to, for display.
    fn base_url(&self) -> &str;

    /// Sends one analysis request. A decoded body is returned whatever the HTTP
    /// status; deciding success is up to the caller.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalyzeReply, ApiError>;

    async fn health(&self) -> Result<HealthResponse, ApiError>;

    async fn service_config(&self) -> Result<ServiceConfig, ApiError>;
}

pub struct HttpAnalysisApi {
    client: Client,
    base: Url,
}

impl HttpAnalysisApi {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("EmoLetrTui/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base: settings.base_url.clone() })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "GET");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "GET request failed.");
            ApiError::Transport(e.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16() });
        }
        decode_body(response).await
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl AnalysisApi for HttpAnalysisApi {
    fn base_url(&self) -> &str {
        self.base.as_str()
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalyzeReply, ApiError> {
        let url = self.endpoint(ANALYZE_PATH)?;
        let builder = match request {
            AnalysisRequest::Text { text } => {
                debug!(chars = text.chars().count(), "Submitting text analysis.");
                self.client.post(url.clone()).json(&TextPayload { text })
            }
            AnalysisRequest::File { file_name, bytes } => {
                debug!(file = %file_name, size = bytes.len(), "Submitting file analysis.");
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type_for(file_name))
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                self.client.post(url.clone()).multipart(Form::new().part("file", part))
            }
        };

        let response = builder.send().await.map_err(|e| {
            error!(url = %url, error = %e, "Analyze request failed.");
            ApiError::Transport(e.to_string())
        })?;
        let status = response.status().as_u16();
        info!(status, kind = %request.kind(), "Received analyze response.");
        let body: AnalyzeResponse = decode_body(response).await?;
        Ok(AnalyzeReply { status, body })
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json(HEALTH_PATH).await
    }

    async fn service_config(&self) -> Result<ServiceConfig, ApiError> {
        self.get_json(CONFIG_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn endpoints_are_joined_under_the_base_path() {
        let settings = Settings::from_lookup(|key| match key {
            "EMOLETR_API_URL" => Some("http://analysis.local:8080/emoletr".to_string()),
            _ => None,
        });
        let api = HttpAnalysisApi::new(&settings).unwrap();
        assert_eq!(
            api.endpoint(ANALYZE_PATH).unwrap().as_str(),
            "http://analysis.local:8080/emoletr/api/analyze"
        );
        assert_eq!(api.base_url(), "http://analysis.local:8080/emoletr/");
    }

    #[test]
    fn default_endpoint_targets_localhost() {
        let api = HttpAnalysisApi::new(&Settings::default()).unwrap();
        assert_eq!(
            api.endpoint(HEALTH_PATH).unwrap().as_str(),
            "http://localhost:5000/api/health"
        );
    }
}
