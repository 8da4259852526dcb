//! UI state owned by the controller and drawn by the renderer.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use egui::Color32;

use crate::api::PredictionResult;
use crate::api::types::{HistoryEntry, SensorReading};
use crate::crop_form::{CropForm, FormField, FormPhase};
use crate::dashboard::DashboardState;
use crate::egui_app::ui::style;
use crate::request_state::RequestState;
use crate::result_view::ResultScreen;
use crate::weather::WeatherReport;

/// How long a notification stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(5);
/// Oldest notifications are dropped past this many.
pub const MAX_TOASTS: usize = 4;

/// Top-level view shown in the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Landing,
    Form,
    Result,
    History,
    Dashboard,
}

impl Page {
    pub const NAV: [Page; 4] = [Page::Landing, Page::Form, Page::History, Page::Dashboard];

    pub fn label(self) -> &'static str {
        match self {
            Self::Landing => "Home",
            Self::Form => "Recommend",
            Self::Result => "Result",
            Self::History => "History",
            Self::Dashboard => "Dashboard",
        }
    }

    /// Key under which the language selector is hosted, when the view shows one.
    pub fn translation_host(self) -> Option<&'static str> {
        match self {
            Self::Form => Some("form"),
            Self::History => Some("history"),
            Self::Dashboard => Some("dashboard"),
            Self::Landing | Self::Result => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

/// Transient notification in the corner of the window.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub title: String,
    pub text: String,
    pub tone: StatusTone,
    /// Border and title color.
    pub accent: Color32,
    pub shown_at: Instant,
}

/// Notification stack, newest last.
#[derive(Clone, Debug, Default)]
pub struct ToastState {
    pub items: Vec<Toast>,
}

impl ToastState {
    pub fn push(&mut self, title: impl Into<String>, text: impl Into<String>, tone: StatusTone) {
        self.items.push(Toast {
            title: title.into(),
            text: text.into(),
            tone,
            accent: style::tone_color(tone),
            shown_at: Instant::now(),
        });
        if self.items.len() > MAX_TOASTS {
            let overflow = self.items.len() - MAX_TOASTS;
            self.items.drain(..overflow);
        }
    }

    /// Drop notifications older than [`TOAST_TTL`].
    pub fn prune(&mut self, now: Instant) {
        self.items
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < TOAST_TTL);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.last()
    }
}

/// Modal message the user must acknowledge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Open sensor import dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SensorPrompt {
    pub channel_id: String,
    pub api_key: String,
}

/// Crop form page.
#[derive(Debug, Default)]
pub struct FormState {
    pub fields: CropForm,
    /// Field highlighted after a failed validation.
    pub invalid_field: Option<FormField>,
    pub submit: RequestState<PredictionResult>,
    pub sensor_prompt: Option<SensorPrompt>,
    pub sensor: RequestState<SensorReading>,
}

impl FormState {
    pub fn phase(&self) -> FormPhase {
        if self.submit.is_pending() {
            FormPhase::Submitting
        } else {
            FormPhase::Editing
        }
    }
}

/// Export buttons on the result page.
#[derive(Debug, Default)]
pub struct ExportState {
    pub last: RequestState<PathBuf>,
}

#[derive(Debug, Default)]
pub struct UiState {
    pub page: Page,
    pub form: FormState,
    pub result: ResultScreen,
    pub export: ExportState,
    pub history: RequestState<Vec<HistoryEntry>>,
    pub dashboard: DashboardState,
    pub weather: RequestState<WeatherReport>,
    pub toasts: ToastState,
    pub alert: Option<Alert>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_are_capped_and_expire() {
        let mut toasts = ToastState::default();
        for index in 0..6 {
            toasts.push("Note", format!("{index}"), StatusTone::Info);
        }
        assert_eq!(toasts.items.len(), MAX_TOASTS);
        assert_eq!(toasts.items[0].text, "2");
        let later = Instant::now() + TOAST_TTL + Duration::from_millis(1);
        toasts.prune(later);
        assert!(toasts.items.is_empty());
    }

    #[test]
    fn selector_is_hosted_on_form_history_and_dashboard() {
        let hosts: Vec<_> = [Page::Landing, Page::Form, Page::Result, Page::History, Page::Dashboard]
            .into_iter()
            .filter_map(Page::translation_host)
            .collect();
        assert_eq!(hosts, ["form", "history", "dashboard"]);
    }
}
