// src/event.rs

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::core::dispatcher::DispatchOutcome;
use crate::core::health::ServiceStatus;
use crate::core::models::{RequestKind, ServiceConfig};
use crate::core::notification::Severity;

/// Results of background work, applied to the `App` by the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    AnalysisSettled { kind: RequestKind, outcome: DispatchOutcome },
    /// The submission control may be restored to `label`.
    ControlReleased { label: String },
    /// A selected file could not be turned into a request.
    InputRejected { message: String, severity: Severity },
    HealthChecked(ServiceStatus),
    ServiceConfigLoaded(ServiceConfig),
}

pub type EventSender = UnboundedSender<AppEvent>;
pub type EventReceiver = UnboundedReceiver<AppEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
