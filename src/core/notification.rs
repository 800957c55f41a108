// src/core/notification.rs

use std::time::{Duration, Instant};
use strum::{Display, EnumString};
use tracing::{debug, error, info, warn};

/// How long a notification stays fully visible.
pub const DISPLAY_WINDOW: Duration = Duration::from_secs(5);
/// Fade-out that follows the display window before the notification is removed.
pub const FADE_DURATION: Duration = Duration::from_millis(300);

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "✕",
            Severity::Warning => "⚠",
            Severity::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Fading,
    Expired,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl Notification {
    pub fn phase(&self, now: Instant) -> NotificationPhase {
        let elapsed = now.saturating_duration_since(self.shown_at);
        if elapsed < DISPLAY_WINDOW {
            NotificationPhase::Visible
        } else if elapsed < DISPLAY_WINDOW + FADE_DURATION {
            NotificationPhase::Fading
        } else {
            NotificationPhase::Expired
        }
    }
}

/// Single-slot notification holder: a new notification always replaces the
/// current one, so at most one is visible.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    current: Option<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notify_at(message, severity, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        match severity {
            Severity::Error => error!(%severity, text = %message, "Notification shown."),
            Severity::Warning => warn!(%severity, text = %message, "Notification shown."),
            Severity::Success => info!(%severity, text = %message, "Notification shown."),
            Severity::Info => debug!(%severity, text = %message, "Notification shown."),
        }
        if let Some(previous) = self.current.take() {
            debug!(replaced = %previous.message, "Replacing visible notification.");
        }
        self.current = Some(Notification { message, severity, shown_at: now });
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Drops the notification once its display window and fade have elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|n| n.phase(now) == NotificationPhase::Expired)
        {
            self.current = None;
        }
    }
}
