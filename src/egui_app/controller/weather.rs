use super::jobs::{JobMessage, JobOutcome};
use super::*;
use crate::api::ApiError;
use crate::weather::{self, FAILED_MESSAGE, WeatherReport};

impl AppController {
    pub fn refresh_weather(&mut self) {
        if self.ui.weather.is_pending() {
            return;
        }
        let ticket = self.ui.weather.begin();
        let api = self.api.clone();
        self.jobs.spawn("weather", move || {
            JobMessage::Weather(JobOutcome::new(ticket, weather::fetch_weather(&api)))
        });
    }

    pub(super) fn handle_weather(&mut self, outcome: JobOutcome<WeatherReport, ApiError>) {
        let JobOutcome { ticket, result } = outcome;
        let result = result.map_err(|err| err.user_message(FAILED_MESSAGE));
        let _ = self.ui.weather.resolve(ticket, result);
    }
}
