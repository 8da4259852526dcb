use super::jobs::{JobMessage, JobOutcome};
use super::*;
use crate::api::ApiError;
use crate::api::types::HistoryEntry;
use crate::history::{self, HISTORY_FAILED_MESSAGE};

impl AppController {
    /// Fetch the configured number of past predictions.
    pub fn reload_history(&mut self) {
        if self.ui.history.is_pending() {
            return;
        }
        let ticket = self.ui.history.begin();
        let api = self.api.clone();
        let limit = self.settings.history_limit;
        self.jobs.spawn("history", move || {
            let result = history::fetch_history(&api, limit);
            JobMessage::History(JobOutcome::new(ticket, result))
        });
    }

    pub(super) fn handle_history(&mut self, outcome: JobOutcome<Vec<HistoryEntry>, ApiError>) {
        let JobOutcome { ticket, result } = outcome;
        let result = result.map_err(|err| {
            tracing::warn!(error = %err, "history request failed");
            err.user_message(HISTORY_FAILED_MESSAGE)
        });
        let _ = self.ui.history.resolve(ticket, result);
    }
}
