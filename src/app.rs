// src/app.rs

use chrono::{DateTime, Utc};
use ratatui::widgets::ScrollbarState;
use rust_i18n::t;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use strum::IntoEnumIterator;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{Locale, Settings};
use crate::core::api::AnalysisApi;
use crate::core::dispatcher::{spawn_file_submission, spawn_submission, DispatchOutcome};
use crate::core::export::export_results;
use crate::core::health::ServiceStatus;
use crate::core::input::InputCollector;
use crate::core::models::{AnalysisReport, RequestKind};
use crate::core::notification::{Notification, NotificationCenter, Severity};
use crate::core::preferences::{PreferenceStore, LOCALE_KEY};
use crate::core::renderer::{render, RenderedResult};
use crate::event::{AppEvent, EventSender};

/// Idle and busy labels of the submission control, in `locale`.
fn control_labels(locale: &str) -> [String; 3] {
    [
        t!("submit.idle", locale = locale).to_string(),
        t!("submit.busy_text", locale = locale).to_string(),
        t!("submit.busy_file", locale = locale).to_string(),
    ]
}

pub const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Which prompt receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Text,
    /// The file prompt, standing in for a native file chooser.
    File,
}

/// The "Analyze" control: disabled with a progress label while a request is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    enabled: bool,
    label: String,
}

impl SubmitControl {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Owner of all UI state.
///
/// The notification slot and the submission control are private: `notify` /
/// `clear_notification` and `set_busy` / `clear_busy` are their only mutators.
pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input: String,
    pub file_input: String,
    pub rendered: Option<RenderedResult>,
    pub last_report: Option<AnalysisReport>,
    pub service_status: ServiceStatus,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
    pub spinner_frame: usize,
    pub locale: Locale,
    collector: InputCollector,
    notifications: NotificationCenter,
    control: SubmitControl,
    settings: Settings,
    api: Arc<dyn AnalysisApi>,
    events: EventSender,
    preferences: PreferenceStore,
}

impl App {
    pub fn new(
        settings: Settings,
        api: Arc<dyn AnalysisApi>,
        events: EventSender,
        preferences: PreferenceStore,
        locale: Locale,
    ) -> Self {
        locale.apply();
        Self {
            should_quit: false,
            input_mode: InputMode::Text,
            input: String::new(),
            file_input: String::new(),
            rendered: None,
            last_report: None,
            service_status: ServiceStatus::Checking,
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
            spinner_frame: 0,
            locale,
            collector: InputCollector::default(),
            notifications: NotificationCenter::new(),
            control: SubmitControl { enabled: true, label: t!("submit.idle").to_string() },
            settings,
            api,
            events,
            preferences,
        }
    }

    // --- Notification slot ---

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notifications.notify(message, severity);
    }

    pub fn clear_notification(&mut self) {
        self.notifications.clear();
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    // --- Submission control ---

    /// Disables the control and shows `busy_label`. Returns the label it replaced,
    /// which the caller hands back to `clear_busy` once the work settles.
    pub fn set_busy(&mut self, busy_label: impl Into<String>) -> String {
        self.control.enabled = false;
        std::mem::replace(&mut self.control.label, busy_label.into())
    }

    pub fn clear_busy(&mut self, label: impl Into<String>) {
        self.control.enabled = true;
        self.control.label = label.into();
    }

    pub fn control(&self) -> &SubmitControl {
        &self.control
    }

    // --- Accessors ---

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn collector(&self) -> &InputCollector {
        &self.collector
    }

    pub fn api(&self) -> Arc<dyn AnalysisApi> {
        Arc::clone(&self.api)
    }

    pub fn events(&self) -> EventSender {
        self.events.clone()
    }

    // --- Submissions ---

    /// Submits the text prompt. Ignored while the control is disabled.
    pub fn submit_text(&mut self) -> Option<JoinHandle<()>> {
        if !self.control.enabled {
            debug!("Submission control disabled, ignoring text submission.");
            return None;
        }
        let request = match self.collector.collect_text(&self.input) {
            Ok(request) => request,
            Err(e) => {
                self.notify(e.user_message(), e.severity());
                return None;
            }
        };
        let restore_label = self.set_busy(t!("submit.busy_text"));
        Some(spawn_submission(self.api(), request, restore_label, self.events()))
    }

    /// Submits the file named in the file prompt and leaves file mode. The file
    /// is read by the background task, never on the UI loop.
    ///
    /// Not gated by the control state, so it can overlap a running submission.
    pub fn submit_file(&mut self) -> Option<JoinHandle<()>> {
        let raw_path = std::mem::take(&mut self.file_input);
        self.input_mode = InputMode::Text;
        let selection = match self.collector.select_file(&raw_path) {
            Ok(Some(selection)) => selection,
            Ok(None) => return None,
            Err(e) => {
                self.notify(e.user_message(), e.severity());
                return None;
            }
        };
        let message = t!("notify.file_selected", name = selection.file_name()).to_string();
        self.notify(message, Severity::Info);
        let restore_label = self.set_busy(t!("submit.busy_file"));
        Some(spawn_file_submission(self.api(), selection, restore_label, self.events()))
    }

    pub fn open_file_prompt(&mut self) {
        self.input_mode = InputMode::File;
        self.file_input.clear();
    }

    pub fn cancel_file_prompt(&mut self) {
        debug!("File prompt dismissed.");
        self.input_mode = InputMode::Text;
        self.file_input.clear();
    }

    // --- Background results ---

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::AnalysisSettled { kind, outcome } => self.on_analysis_settled(kind, outcome),
            AppEvent::ControlReleased { label } => {
                let label = self.localized_control_label(label);
                self.clear_busy(label);
            }
            AppEvent::InputRejected { message, severity } => self.notify(message, severity),
            AppEvent::HealthChecked(status) => {
                if let Some((message, severity)) = status.advisory() {
                    self.notify(message, severity);
                }
                self.service_status = status;
            }
            AppEvent::ServiceConfigLoaded(config) => self.collector.update_limits(&config),
        }
    }

    fn on_analysis_settled(&mut self, kind: RequestKind, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Success(report) => {
                self.rendered = Some(render(&report.result));
                self.last_report = Some(report);
                self.reset_scroll();
                let message = match kind {
                    RequestKind::Text => t!("notify.analysis_done"),
                    RequestKind::File => t!("notify.file_analysis_done"),
                };
                self.notify(message, Severity::Success);
            }
            DispatchOutcome::Failure(reason) => {
                let message = t!("notify.error", message = reason).to_string();
                self.notify(message, Severity::Error);
            }
        }
    }

    /// Writes the rendered result to the export directory. Does nothing when no
    /// result is displayed.
    pub fn export_results(&mut self, now: DateTime<Utc>) -> Option<PathBuf> {
        let rendered = self.rendered.as_ref()?;
        match export_results(rendered, &self.settings.export_dir, now) {
            Ok(path) => {
                self.notify(t!("notify.exported"), Severity::Success);
                Some(path)
            }
            Err(e) => {
                let message = t!("notify.export_failed", reason = e).to_string();
                self.notify(message, Severity::Error);
                None
            }
        }
    }

    /// Switches the interface language and remembers the choice.
    pub fn toggle_locale(&mut self) {
        self.locale = self.locale.next();
        self.locale.apply();
        info!(locale = %self.locale, "Interface language changed.");
        if let Err(e) = self.preferences.set(LOCALE_KEY, &self.locale.to_string()) {
            warn!(error = %e, "Could not save locale preference.");
        }
        let label = std::mem::take(&mut self.control.label);
        self.control.label = self.localized_control_label(label);
        if let Some(report) = &self.last_report {
            self.rendered = Some(render(&report.result));
        }
        let lang = self.locale.to_string();
        let message = t!("notify.locale_changed", lang = lang).to_string();
        self.notify(message, Severity::Info);
    }

    /// Translates a control label captured under any locale into the current one.
    /// Labels that are not control labels are returned unchanged.
    fn localized_control_label(&self, label: String) -> String {
        let current = control_labels(&self.locale.to_string());
        Locale::iter()
            .find_map(|locale| control_labels(&locale.to_string()).iter().position(|l| *l == label))
            .map(|index| current[index].clone())
            .unwrap_or(label)
    }

    // --- Housekeeping ---

    pub fn on_tick(&mut self, now: Instant) {
        self.notifications.tick(now);
        if !self.control.enabled {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Clears the prompt and the displayed result. In-flight submissions keep
    /// running and still report back.
    pub fn reset(&mut self) {
        self.input.clear();
        self.file_input.clear();
        self.input_mode = InputMode::Text;
        self.rendered = None;
        self.last_report = None;
        self.reset_scroll();
    }
}
