//! Maintains app state and bridges backend calls to the egui UI.

mod background_jobs;
mod dashboard;
mod history;
mod jobs;
mod navigation;
mod notifications;
mod prediction;
mod results;
mod weather;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiClient;
use crate::config::{self, AppSettings, ConfigError};
use crate::egui_app::state::UiState;
use crate::handoff::{HandoffError, ResultHandoff};
use crate::translation::{TranslationController, UnknownLanguage};

use jobs::ControllerJobs;

/// Errors that prevent the controller from starting.
#[derive(Debug, Error)]
pub enum ControllerInitError {
    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to open result storage: {0}")]
    Handoff(#[from] HandoffError),
}

pub struct AppController {
    pub ui: UiState,
    api: ApiClient,
    handoff: ResultHandoff,
    settings: AppSettings,
    /// Where settings changes are written; `None` keeps them in memory.
    settings_path: Option<PathBuf>,
    translation: TranslationController,
    jobs: ControllerJobs,
}

impl AppController {
    /// Controller with in-memory settings.
    pub fn new(api: ApiClient, handoff: ResultHandoff, settings: AppSettings) -> Self {
        let translation = TranslationController::new(settings.language.as_deref());
        Self {
            ui: UiState::default(),
            api,
            handoff,
            settings,
            settings_path: None,
            translation,
            jobs: ControllerJobs::new(),
        }
    }

    /// Load persisted config and open the result storage under the app directory.
    pub fn load() -> Result<Self, ControllerInitError> {
        let path = config::config_path()?;
        let settings = config::load_from(&path)?;
        let api = ApiClient::new(settings.resolved_api_base());
        tracing::info!(api_base = api.base_url(), "backend configured");
        let handoff = ResultHandoff::persistent()?;
        let mut controller = Self::new(api, handoff, settings);
        controller.settings_path = Some(path);
        Ok(controller)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn handoff(&self) -> &ResultHandoff {
        &self.handoff
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn translation(&self) -> &TranslationController {
        &self.translation
    }

    /// Per-frame housekeeping: apply finished jobs and expire notifications.
    pub fn tick(&mut self) {
        self.poll_background_jobs();
        self.ui.toasts.prune(std::time::Instant::now());
    }

    /// True while any worker has not reported back yet.
    pub fn is_busy(&self) -> bool {
        self.jobs.in_flight() > 0
    }

    /// Pick the display language and remember it.
    pub fn select_language(&mut self, code: &str) -> Result<(), UnknownLanguage> {
        if self.translation.select(code)? {
            tracing::info!(language = self.translation.selected(), "language changed");
            self.settings.language = Some(self.translation.selected().to_string());
            self.persist_settings();
        }
        Ok(())
    }

    fn persist_settings(&self) {
        let Some(path) = self.settings_path.as_deref() else {
            return;
        };
        if let Err(err) = config::save_to_path(&self.settings, path) {
            tracing::warn!(error = %err, "failed to save settings");
        }
    }
}
