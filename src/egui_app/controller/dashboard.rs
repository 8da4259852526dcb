use std::path::PathBuf;

use rfd::FileDialog;

use super::jobs::{JobMessage, JobOutcome, ToolMessage};
use super::*;
use crate::api::ApiError;
use crate::dashboard::disease::{self, IMAGE_EXTENSIONS};
use crate::dashboard::{
    DashboardTab, ToolInputError, calendar, chat, fertilizer, irrigation, prices, yield_predictor,
};
use crate::egui_app::state::StatusTone;
use crate::request_state::RequestState;

/// Apply a tool reply. Returns the message to show when it failed.
fn settle<T>(
    state: &mut RequestState<T>,
    outcome: JobOutcome<T, ApiError>,
    fallback: &str,
) -> Option<String> {
    let JobOutcome { ticket, result } = outcome;
    let result = result.map_err(|err| {
        tracing::warn!(error = %err, "tool request failed");
        err.user_message(fallback)
    });
    let failure = result.as_ref().err().cloned();
    if state.resolve(ticket, result).is_applied() {
        failure
    } else {
        None
    }
}

impl AppController {
    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.ui.dashboard.select(tab);
    }

    fn reject_tool_input(&mut self, err: ToolInputError) {
        match err {
            ToolInputError::Busy => tracing::debug!("tool submit ignored while loading"),
            ToolInputError::NotNumeric { .. } => self.notify_error("Error", err.to_string()),
        }
    }

    pub fn submit_fertilizer(&mut self) {
        let loading = self.ui.dashboard.is_loading();
        match self.ui.dashboard.fertilizer.begin(loading) {
            Ok((ticket, request)) => {
                let api = self.api.clone();
                self.jobs.spawn("fertilizer", move || {
                    let result = fertilizer::calculate(&api, &request);
                    JobMessage::Tool(ToolMessage::Fertilizer(JobOutcome::new(ticket, result)))
                });
            }
            Err(err) => self.reject_tool_input(err),
        }
    }

    pub fn submit_yield(&mut self) {
        let loading = self.ui.dashboard.is_loading();
        match self.ui.dashboard.yield_tool.begin(loading) {
            Ok((ticket, request)) => {
                let api = self.api.clone();
                self.jobs.spawn("yield", move || {
                    let result = yield_predictor::predict(&api, &request);
                    JobMessage::Tool(ToolMessage::Yield(JobOutcome::new(ticket, result)))
                });
            }
            Err(err) => self.reject_tool_input(err),
        }
    }

    pub fn submit_irrigation(&mut self) {
        let loading = self.ui.dashboard.is_loading();
        match self.ui.dashboard.irrigation.begin(loading) {
            Ok((ticket, request)) => {
                let api = self.api.clone();
                self.jobs.spawn("irrigation", move || {
                    let result = irrigation::schedule(&api, &request);
                    JobMessage::Tool(ToolMessage::Irrigation(JobOutcome::new(ticket, result)))
                });
            }
            Err(err) => self.reject_tool_input(err),
        }
    }

    pub fn submit_calendar(&mut self) {
        let loading = self.ui.dashboard.is_loading();
        match self.ui.dashboard.calendar.begin(loading) {
            Ok((ticket, request)) => {
                let api = self.api.clone();
                self.jobs.spawn("calendar", move || {
                    let result = calendar::fetch_calendars(&api, &request);
                    JobMessage::Tool(ToolMessage::Calendar(JobOutcome::new(ticket, result)))
                });
            }
            Err(err) => self.reject_tool_input(err),
        }
    }

    pub fn refresh_prices(&mut self) {
        let loading = self.ui.dashboard.is_loading();
        match self.ui.dashboard.prices.begin(loading) {
            Ok(ticket) => {
                let api = self.api.clone();
                self.jobs.spawn("prices", move || {
                    let result = prices::fetch(&api);
                    JobMessage::Tool(ToolMessage::Prices(JobOutcome::new(ticket, result)))
                });
            }
            Err(err) => self.reject_tool_input(err),
        }
    }

    /// Send the chat draft; a blank draft does nothing.
    pub fn send_chat(&mut self) {
        let loading = self.ui.dashboard.is_loading();
        match self.ui.dashboard.chat.begin(loading) {
            Ok(Some((ticket, request))) => {
                let api = self.api.clone();
                self.jobs.spawn("chat", move || {
                    let result = chat::send(&api, &request);
                    JobMessage::Tool(ToolMessage::Chat(JobOutcome::new(ticket, result)))
                });
            }
            Ok(None) => {}
            Err(err) => self.reject_tool_input(err),
        }
    }

    /// Pick a plant photo and send it for analysis.
    pub fn pick_disease_image(&mut self) {
        let picked = FileDialog::new()
            .set_title("Plant photo")
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            self.detect_disease(path);
        }
    }

    pub fn detect_disease(&mut self, path: PathBuf) {
        let loading = self.ui.dashboard.is_loading();
        match self.ui.dashboard.disease.begin(loading, path.clone()) {
            Ok(ticket) => {
                let api = self.api.clone();
                let max_bytes = self.settings.max_image_bytes;
                self.jobs.spawn("disease", move || {
                    let result = disease::detect(&api, &path, max_bytes);
                    JobMessage::Tool(ToolMessage::Disease(JobOutcome::new(ticket, result)))
                });
            }
            Err(err) => self.reject_tool_input(err),
        }
    }

    pub fn clear_disease(&mut self) {
        self.ui.dashboard.disease.clear();
    }

    pub(super) fn handle_tool(&mut self, message: ToolMessage) {
        let dashboard = &mut self.ui.dashboard;
        let failure = match message {
            ToolMessage::Fertilizer(outcome) => settle(
                &mut dashboard.fertilizer.plan,
                outcome,
                fertilizer::FAILED_MESSAGE,
            )
            .map(|message| ("Error", message)),
            ToolMessage::Yield(outcome) => settle(
                &mut dashboard.yield_tool.estimate,
                outcome,
                yield_predictor::FAILED_MESSAGE,
            )
            .map(|message| ("Error", message)),
            ToolMessage::Irrigation(outcome) => settle(
                &mut dashboard.irrigation.schedule,
                outcome,
                irrigation::FAILED_MESSAGE,
            )
            .map(|message| ("Error", message)),
            ToolMessage::Calendar(outcome) => settle(
                &mut dashboard.calendar.calendars,
                outcome,
                calendar::FAILED_MESSAGE,
            )
            .map(|message| ("Calendar Error", message)),
            ToolMessage::Prices(outcome) => settle(
                &mut dashboard.prices.board,
                outcome,
                prices::FAILED_MESSAGE,
            )
            .map(|message| ("Error", message)),
            ToolMessage::Chat(outcome) => dashboard
                .chat
                .finish(outcome.ticket, outcome.result)
                .map(|message| ("Chat Error", message)),
            ToolMessage::Disease(outcome) => {
                self.handle_disease(outcome);
                None
            }
        };
        if let Some((title, message)) = failure {
            self.notify_error(title, message);
        }
    }

    fn handle_disease(
        &mut self,
        outcome: JobOutcome<disease::DiseaseReport, disease::DetectError>,
    ) {
        let JobOutcome { ticket, result } = outcome;
        match result {
            Ok(report) => {
                let summary = report.summary().to_string();
                if self
                    .ui
                    .dashboard
                    .disease
                    .diagnosis
                    .resolve(ticket, Ok(report))
                    .is_applied()
                {
                    self.notify("Analysis Complete", summary, StatusTone::Success);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "disease detection failed");
                let message = err.user_message();
                if self
                    .ui
                    .dashboard
                    .disease
                    .diagnosis
                    .resolve(ticket, Err(message.clone()))
                    .is_applied()
                {
                    self.notify_error("Error", message);
                }
            }
        }
    }
}
