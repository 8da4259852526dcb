use super::*;
use crate::egui_app::state::{Alert, StatusTone};

impl AppController {
    pub(crate) fn notify(&mut self, title: &str, text: impl Into<String>, tone: StatusTone) {
        let text = text.into();
        match tone {
            StatusTone::Error => tracing::warn!(title, text = %text, "notification"),
            StatusTone::Info | StatusTone::Success => {
                tracing::info!(title, text = %text, "notification")
            }
        }
        self.ui.toasts.push(title, text, tone);
    }

    pub(crate) fn notify_error(&mut self, title: &str, text: impl Into<String>) {
        self.notify(title, text, StatusTone::Error);
    }

    /// Show a modal that stays until dismissed.
    pub(crate) fn raise_alert(&mut self, title: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(title, message = %message, "alert raised");
        self.ui.alert = Some(Alert {
            title: title.to_string(),
            message,
        });
    }

    pub fn dismiss_alert(&mut self) {
        self.ui.alert = None;
    }

    pub fn dismiss_toast(&mut self, index: usize) {
        self.ui.toasts.dismiss(index);
    }
}
