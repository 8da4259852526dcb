use std::path::PathBuf;

use rfd::FileDialog;

use super::jobs::{ExportOutcome, JobMessage, JobOutcome};
use super::*;
use crate::egui_app::state::{Page, StatusTone};
use crate::export::{self, ExportFormat, ExportSnapshot};
use crate::result_view::SuggestionJob;
use crate::suggestions::{self, SuggestError, Suggestions};

impl AppController {
    pub(super) fn start_suggestions(&mut self, job: SuggestionJob) {
        let api = self.api.clone();
        let SuggestionJob {
            ticket,
            input,
            crop,
        } = job;
        self.jobs.spawn("suggest", move || {
            let result = suggestions::fetch_suggestions(&api, input, &crop);
            JobMessage::Suggestions(JobOutcome::new(ticket, result))
        });
    }

    /// Ask for suggestions again, e.g. after a failure.
    pub fn reload_suggestions(&mut self) {
        if self.ui.result.suggestions.is_pending() {
            return;
        }
        if let Some(job) = self.ui.result.begin_suggestions() {
            self.start_suggestions(job);
        }
    }

    pub(super) fn handle_suggestions(&mut self, outcome: JobOutcome<Suggestions, SuggestError>) {
        let JobOutcome { ticket, result } = outcome;
        let result = result.map_err(|err| {
            tracing::warn!(error = %err.source, "suggestions failed");
            err.message
        });
        if !self.ui.result.suggestions.resolve(ticket, result).is_applied() {
            tracing::debug!("dropping suggestions for a closed result view");
        }
    }

    /// Forget the current recommendation and start over on the form.
    pub fn retry_recommendation(&mut self) {
        if let Err(err) = self.ui.result.retry(&self.handoff) {
            tracing::warn!(error = %err, "failed to clear recommendation slot");
        }
        self.navigate(Page::Form);
    }

    /// Write the displayed result to the export folder.
    pub fn export_result(&mut self, format: ExportFormat) {
        if self.ui.export.last.is_pending() {
            return;
        }
        let Some(displayed) = self.ui.result.displayed() else {
            return;
        };
        let snapshot = ExportSnapshot::new(&displayed.result, self.ui.result.suggestions.value());
        let dir = match export::resolve_export_dir(self.settings.export_dir.as_deref()) {
            Ok(dir) => dir,
            Err(err) => {
                self.raise_alert("Export failed", err.to_string());
                return;
            }
        };
        let ticket = self.ui.export.last.begin();
        let api = self.api.clone();
        self.jobs.spawn("export", move || {
            let result = export::export_snapshot(&api, &snapshot, format, &dir);
            JobMessage::Exported(ExportOutcome {
                format,
                outcome: JobOutcome::new(ticket, result),
            })
        });
    }

    pub(super) fn handle_export(&mut self, message: ExportOutcome) {
        let ExportOutcome { format, outcome } = message;
        let JobOutcome { ticket, result } = outcome;
        match result {
            Ok(path) => {
                let text = format!("{} saved to {}", format.label(), path.display());
                if self.ui.export.last.resolve(ticket, Ok(path)).is_applied() {
                    self.notify("Exported", text, StatusTone::Success);
                }
            }
            Err(err) => {
                let message = err.to_string();
                if self
                    .ui
                    .export
                    .last
                    .resolve(ticket, Err(message.clone()))
                    .is_applied()
                {
                    self.raise_alert("Export failed", message);
                }
            }
        }
    }

    /// Let the user pick where exports are written.
    pub fn choose_export_dir(&mut self) {
        let mut dialog = FileDialog::new().set_title("Export folder");
        if let Some(current) = self.settings.export_dir.as_deref() {
            dialog = dialog.set_directory(current);
        }
        if let Some(dir) = dialog.pick_folder() {
            self.set_export_dir(dir);
        }
    }

    /// Reveal the folder holding the last export in the system file manager.
    pub fn open_export_folder(&mut self) {
        let dir = match self.ui.export.last.value() {
            Some(path) => path.parent().map(PathBuf::from),
            None => export::resolve_export_dir(self.settings.export_dir.as_deref()).ok(),
        };
        let Some(dir) = dir.filter(|dir| dir.exists()) else {
            self.notify_error("Export folder", "Nothing has been exported yet");
            return;
        };
        if let Err(err) = open::that(&dir) {
            self.notify_error(
                "Export folder",
                format!("Could not open folder {}: {err}", dir.display()),
            );
        }
    }

    pub fn set_export_dir(&mut self, dir: PathBuf) {
        tracing::info!(dir = %dir.display(), "export folder changed");
        self.settings.export_dir = Some(dir);
        self.persist_settings();
    }
}
