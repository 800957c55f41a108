// src/core/health.rs

use rust_i18n::t;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::core::api::{AnalysisApi, ApiError};
use crate::core::models::{HealthResponse, ServiceConfig};
use crate::core::notification::Severity;
use crate::event::{AppEvent, EventSender};

/// What the client knows about the analysis service.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceStatus {
    /// The startup probe has not answered yet.
    Checking,
    Ready { model: Option<String> },
    /// Running, but without the language-model key it needs.
    Unconfigured { model: Option<String> },
    /// Reachable but reporting a status other than "healthy".
    Degraded { status: String },
    Unreachable { reason: String },
}

impl ServiceStatus {
    /// Notification the user should see for this status, if any.
    pub fn advisory(&self) -> Option<(String, Severity)> {
        match self {
            ServiceStatus::Unconfigured { .. } => {
                Some((t!("notify.api_unconfigured").to_string(), Severity::Warning))
            }
            ServiceStatus::Unreachable { .. } => {
                Some((t!("notify.api_unreachable").to_string(), Severity::Error))
            }
            _ => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(
            self,
            ServiceStatus::Ready { .. } | ServiceStatus::Unconfigured { .. } | ServiceStatus::Degraded { .. }
        )
    }

    pub fn model(&self) -> Option<&str> {
        match self {
            ServiceStatus::Ready { model } | ServiceStatus::Unconfigured { model } => model.as_deref(),
            _ => None,
        }
    }
}

/// Classifies the outcome of `GET /api/health`.
pub fn evaluate(outcome: Result<HealthResponse, ApiError>) -> ServiceStatus {
    match outcome {
        Ok(health) if health.status == "healthy" && health.api_configured => {
            info!(model = ?health.model, "API is healthy and configured.");
            ServiceStatus::Ready { model: health.model }
        }
        Ok(health) if health.status == "healthy" => {
            warn!(model = ?health.model, "API is running but the LLM is not configured.");
            ServiceStatus::Unconfigured { model: health.model }
        }
        Ok(health) => {
            warn!(status = %health.status, "API reported an unexpected status.");
            ServiceStatus::Degraded { status: health.status }
        }
        Err(e) => {
            error!(error = %e, "Cannot connect to the API.");
            ServiceStatus::Unreachable { reason: e.to_string() }
        }
    }
}

/// Startup reachability and configuration check.
pub async fn probe(api: &dyn AnalysisApi) -> ServiceStatus {
    info!(base_url = api.base_url(), "Probing analysis service.");
    evaluate(api.health().await)
}

/// Fetches the public upload limits. Failures keep the built-in defaults.
pub async fn fetch_service_config(api: &dyn AnalysisApi) -> Option<ServiceConfig> {
    match api.service_config().await {
        Ok(config) => {
            info!(
                max_file_size_mb = config.max_file_size_mb,
                extensions = ?config.allowed_extensions,
                "Service configuration loaded."
            );
            Some(config)
        }
        Err(e) => {
            warn!(error = %e, "Could not load service configuration, keeping defaults.");
            None
        }
    }
}

/// Fire-and-forget startup check: reports the service status and, when the
/// service answers, its upload limits. Never blocks the UI.
pub fn spawn_startup_probe(api: Arc<dyn AnalysisApi>, events: EventSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let status = probe(api.as_ref()).await;
        let reachable = status.is_reachable();
        let _ = events.send(AppEvent::HealthChecked(status));
        if reachable {
            if let Some(config) = fetch_service_config(api.as_ref()).await {
                let _ = events.send(AppEvent::ServiceConfigLoaded(config));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(status: &str, configured: bool) -> HealthResponse {
        HealthResponse {
            status: status.to_string(),
            api_configured: configured,
            model: Some("gpt-4".into()),
            timestamp: None,
        }
    }

    #[test]
    fn healthy_and_configured_is_silent() {
        let status = evaluate(Ok(health("healthy", true)));
        assert_eq!(status, ServiceStatus::Ready { model: Some("gpt-4".into()) });
        assert!(status.advisory().is_none());
    }

    #[test]
    fn missing_configuration_warns_once() {
        let status = evaluate(Ok(health("healthy", false)));
        let (message, severity) = status.advisory().unwrap();
        assert_eq!(severity, Severity::Warning);
        assert_eq!(message, t!("notify.api_unconfigured"));
        assert!(status.is_reachable());
    }

    #[test]
    fn transport_failure_is_an_error() {
        let status = evaluate(Err(ApiError::Transport("connection refused".into())));
        assert!(!status.is_reachable());
        let (message, severity) = status.advisory().unwrap();
        assert_eq!(severity, Severity::Error);
        assert_eq!(message, t!("notify.api_unreachable"));
    }

    #[test]
    fn http_error_and_bad_body_are_unreachable() {
        assert!(matches!(
            evaluate(Err(ApiError::Status { status: 502 })),
            ServiceStatus::Unreachable { .. }
        ));
        assert!(matches!(
            evaluate(Err(ApiError::Decode("expected value".into()))),
            ServiceStatus::Unreachable { .. }
        ));
    }

    #[test]
    fn other_status_is_logged_only() {
        let status = evaluate(Ok(health("starting", true)));
        assert_eq!(status, ServiceStatus::Degraded { status: "starting".into() });
        assert!(status.advisory().is_none());
    }
}
