// src/core/dispatcher.rs

use rust_i18n::t;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::api::{AnalysisApi, ApiError};
use crate::core::input::FileSelection;
use crate::core::models::{AnalysisReport, AnalysisRequest, RequestKind};
use crate::event::{AppEvent, EventSender};

/// How a single submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Success(AnalysisReport),
    /// Localized reason, without the "Error:" prefix.
    Failure(String),
}

fn fallback_failure(kind: RequestKind) -> String {
    match kind {
        RequestKind::Text => t!("notify.analysis_failed").to_string(),
        RequestKind::File => t!("notify.file_analysis_failed").to_string(),
    }
}

fn transport_failure(error: &ApiError) -> String {
    match error {
        ApiError::Decode(reason) => t!("notify.invalid_response", reason = reason).to_string(),
        other => t!("notify.network_failure", reason = other).to_string(),
    }
}

/// Performs exactly one analyze call and classifies the answer. No retry.
pub async fn dispatch(api: &dyn AnalysisApi, request: &AnalysisRequest) -> DispatchOutcome {
    let kind = request.kind();
    match api.analyze(request).await {
        Ok(reply) if reply.is_success() => {
            info!(%kind, "Analysis succeeded.");
            let body = reply.body;
            DispatchOutcome::Success(AnalysisReport {
                result: body.analysis.unwrap_or_default(),
                text_length: body.text_length,
                analyzed_at: body.analyzed_at,
            })
        }
        Ok(reply) => {
            warn!(%kind, status = reply.status, error = ?reply.body.error, "Analysis rejected by the service.");
            let message = reply
                .body
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| fallback_failure(kind));
            DispatchOutcome::Failure(message)
        }
        Err(e) => {
            warn!(%kind, error = %e, "Analysis request failed.");
            DispatchOutcome::Failure(transport_failure(&e))
        }
    }
}

/// Sends `ControlReleased` when dropped, so the submission control comes back
/// on every exit path of a submission task, unwinding included.
pub struct BusyGuard {
    events: EventSender,
    label: Option<String>,
}

impl BusyGuard {
    pub fn new(events: EventSender, restore_label: String) -> Self {
        Self { events, label: Some(restore_label) }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Some(label) = self.label.take() {
            debug!(label = %label, "Releasing submission control.");
            // The UI loop may already be gone on shutdown.
            let _ = self.events.send(AppEvent::ControlReleased { label });
        }
    }
}

/// Runs one submission in the background.
///
/// The task is detached: it is never cancelled and always reports its outcome,
/// followed by the release of the control with the label captured at dispatch.
pub fn spawn_submission(
    api: Arc<dyn AnalysisApi>,
    request: AnalysisRequest,
    restore_label: String,
    events: EventSender,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _guard = BusyGuard::new(events.clone(), restore_label);
        settle(api.as_ref(), &request, &events).await;
    })
}

/// Like `spawn_submission`, but reads the selected file first, off the UI loop.
/// A file that cannot be read is reported as `InputRejected` and never sent.
pub fn spawn_file_submission(
    api: Arc<dyn AnalysisApi>,
    selection: FileSelection,
    restore_label: String,
    events: EventSender,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _guard = BusyGuard::new(events.clone(), restore_label);
        let request = match selection.read().await {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Selected file rejected.");
                let _ = events.send(AppEvent::InputRejected {
                    message: e.user_message(),
                    severity: e.severity(),
                });
                return;
            }
        };
        settle(api.as_ref(), &request, &events).await;
    })
}

async fn settle(api: &dyn AnalysisApi, request: &AnalysisRequest, events: &EventSender) {
    let kind = request.kind();
    let outcome = dispatch(api, request).await;
    let _ = events.send(AppEvent::AnalysisSettled { kind, outcome });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{AnalyzeReply, AnalyzeResponse, HealthResponse, ServiceConfig};
    use async_trait::async_trait;

    struct Scripted(fn() -> Result<AnalyzeReply, ApiError>);

    #[async_trait]
    impl AnalysisApi for Scripted {
        fn base_url(&self) -> &str {
            "http://test/"
        }
        async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalyzeReply, ApiError> {
            (self.0)()
        }
        async fn health(&self) -> Result<HealthResponse, ApiError> {
            Err(ApiError::Transport("unused".into()))
        }
        async fn service_config(&self) -> Result<ServiceConfig, ApiError> {
            Err(ApiError::Transport("unused".into()))
        }
    }

    fn text() -> AnalysisRequest {
        AnalysisRequest::Text { text: "Il pleuvait sur Oran.".into() }
    }

    #[tokio::test]
    async fn success_requires_flag_and_status() {
        let api = Scripted(|| {
            Ok(AnalyzeReply {
                status: 200,
                body: serde_json::from_str(
                    r#"{"success":true,"text_length":21,"analysis":{"dominant_emotion":"tristesse"}}"#,
                )
                .unwrap(),
            })
        });
        let DispatchOutcome::Success(report) = dispatch(&api, &text()).await else {
            panic!("expected success");
        };
        assert_eq!(report.result.dominant_emotion.as_deref(), Some("tristesse"));
        assert_eq!(report.text_length, Some(21));
    }

    #[tokio::test]
    async fn server_error_message_is_kept_verbatim() {
        let api = Scripted(|| {
            Ok(AnalyzeReply {
                status: 503,
                body: AnalyzeResponse { error: Some("LLM API not configured".into()), ..Default::default() },
            })
        });
        assert_eq!(
            dispatch(&api, &text()).await,
            DispatchOutcome::Failure("LLM API not configured".into())
        );
    }

    #[tokio::test]
    async fn missing_error_uses_kind_fallback() {
        let api = Scripted(|| Ok(AnalyzeReply { status: 200, body: AnalyzeResponse::default() }));
        let file = AnalysisRequest::File { file_name: "a.txt".into(), bytes: b"x".to_vec() };
        assert_eq!(
            dispatch(&api, &file).await,
            DispatchOutcome::Failure(t!("notify.file_analysis_failed").to_string())
        );
    }

    #[tokio::test]
    async fn transport_error_is_a_failure() {
        let api = Scripted(|| Err(ApiError::Transport("connection refused".into())));
        let DispatchOutcome::Failure(message) = dispatch(&api, &text()).await else {
            panic!("expected failure");
        };
        assert!(message.contains("connection refused"));
    }

    #[tokio::test]
    async fn guard_releases_control_when_dropped() {
        let (tx, mut rx) = crate::event::channel();
        drop(BusyGuard::new(tx, "Analyser".into()));
        match rx.recv().await {
            Some(AppEvent::ControlReleased { label }) => assert_eq!(label, "Analyser"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn submission_reports_outcome_then_release() {
        let (tx, mut rx) = crate::event::channel();
        let api: Arc<dyn AnalysisApi> = Arc::new(Scripted(|| Err(ApiError::Decode("eof".into()))));
        spawn_submission(api, text(), "Analyser".into(), tx).await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::AnalysisSettled { kind: RequestKind::Text, outcome: DispatchOutcome::Failure(_) })
        ));
        assert!(matches!(rx.recv().await, Some(AppEvent::ControlReleased { .. })));
    }

    #[tokio::test]
    async fn unreadable_file_is_rejected_without_a_request() {
        let (tx, mut rx) = crate::event::channel();
        let api: Arc<dyn AnalysisApi> = Arc::new(Scripted(|| panic!("must not be called")));
        let selection = crate::core::input::InputCollector::default()
            .select_file("/nowhere/absent.txt")
            .unwrap()
            .unwrap();
        spawn_file_submission(api, selection, "Analyser".into(), tx).await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::InputRejected { severity: crate::core::notification::Severity::Error, .. })
        ));
        assert!(matches!(rx.recv().await, Some(AppEvent::ControlReleased { .. })));
    }

    #[tokio::test]
    async fn panicking_submission_still_releases_control() {
        let (tx, mut rx) = crate::event::channel();
        let api: Arc<dyn AnalysisApi> = Arc::new(Scripted(|| panic!("client exploded")));
        assert!(spawn_submission(api, text(), "Analyser".into(), tx).await.is_err());

        match rx.recv().await {
            Some(AppEvent::ControlReleased { label }) => assert_eq!(label, "Analyser"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
