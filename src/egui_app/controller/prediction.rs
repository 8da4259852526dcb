use super::jobs::{JobMessage, JobOutcome};
use super::*;
use crate::api::PredictionResult;
use crate::api::types::SensorReading;
use crate::api::ApiError;
use crate::egui_app::state::{Page, SensorPrompt, StatusTone};
use crate::workflow::{self, SENSOR_FAILED_MESSAGE, SubmitError};

impl AppController {
    /// Validate the form and send it for a recommendation.
    pub fn submit_form(&mut self) {
        if self.ui.form.submit.is_pending() {
            return;
        }
        let input = match self.ui.form.fields.validate() {
            Ok(input) => input,
            Err(err) => {
                self.ui.form.invalid_field = err.first_field();
                self.notify_error("Validation Error", err.to_string());
                return;
            }
        };
        self.ui.form.invalid_field = None;
        let ticket = self.ui.form.submit.begin();
        let api = self.api.clone();
        let handoff = self.handoff.clone();
        self.jobs.spawn("predict", move || {
            let result = workflow::submit_prediction(&api, &handoff, input)
                .map(|submitted| submitted.result);
            JobMessage::Prediction(JobOutcome::new(ticket, result))
        });
    }

    pub(super) fn handle_prediction(&mut self, outcome: JobOutcome<PredictionResult, SubmitError>) {
        let JobOutcome { ticket, result } = outcome;
        match result {
            Ok(result) => {
                if self.ui.form.submit.resolve(ticket, Ok(result)).is_applied() {
                    self.navigate(Page::Result);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "prediction failed");
                let message = err.user_message();
                if self
                    .ui
                    .form
                    .submit
                    .resolve(ticket, Err(message.clone()))
                    .is_applied()
                {
                    self.notify_error("Error", message);
                }
            }
        }
    }

    /// Empty every input.
    pub fn clear_form(&mut self) {
        self.ui.form.fields.clear();
        self.ui.form.invalid_field = None;
    }

    /// Ask for sensor credentials. Only a remembered channel id is filled in.
    pub fn open_sensor_prompt(&mut self) {
        self.ui.form.sensor_prompt = Some(SensorPrompt {
            channel_id: self.settings.sensor_channel_id.clone().unwrap_or_default(),
            api_key: String::new(),
        });
    }

    pub fn cancel_sensor_prompt(&mut self) {
        self.ui.form.sensor_prompt = None;
    }

    /// Fetch the latest sensor feed with the credentials in the open prompt.
    pub fn confirm_sensor_prompt(&mut self) {
        let Some(prompt) = self.ui.form.sensor_prompt.take() else {
            return;
        };
        let channel_id = prompt.channel_id.trim().to_string();
        let api_key = prompt.api_key.trim().to_string();
        if channel_id.is_empty() || api_key.is_empty() {
            tracing::debug!("sensor import cancelled: missing credentials");
            return;
        }
        if self.settings.sensor_channel_id.as_deref() != Some(channel_id.as_str()) {
            self.settings.sensor_channel_id = Some(channel_id.clone());
            self.persist_settings();
        }
        let ticket = self.ui.form.sensor.begin();
        let api = self.api.clone();
        self.jobs.spawn("sensor", move || {
            let result = workflow::fetch_sensor_reading(&api, &channel_id, &api_key);
            JobMessage::SensorLoaded(JobOutcome::new(ticket, result))
        });
    }

    pub(super) fn handle_sensor_loaded(&mut self, outcome: JobOutcome<SensorReading, ApiError>) {
        let JobOutcome { ticket, result } = outcome;
        match result {
            Ok(reading) => {
                if !self.ui.form.sensor.resolve(ticket, Ok(reading.clone())).is_applied() {
                    return;
                }
                let filled = self.ui.form.fields.apply_sensor_reading(&reading);
                tracing::info!(filled, "sensor values applied");
                self.notify(
                    "Loaded from ThingSpeak",
                    "Values populated from latest feed.",
                    StatusTone::Success,
                );
            }
            Err(err) => {
                let message = err.user_message(SENSOR_FAILED_MESSAGE);
                if self
                    .ui
                    .form
                    .sensor
                    .resolve(ticket, Err(message.clone()))
                    .is_applied()
                {
                    self.notify_error("ThingSpeak Error", message);
                }
            }
        }
    }
}
