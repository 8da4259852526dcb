//! Prediction submission and sensor import, run on worker threads.

use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::api::endpoints::{Predict, SaveHistory, SensorLatest};
use crate::api::types::{HistoryRecord, SensorQuery, SensorReading};
use crate::api::{ApiClient, ApiError, PredictionInput, PredictionResult};
use crate::crop_form::PREDICTION_FAILED_MESSAGE;
use crate::handoff::{HandoffError, ResultHandoff};

/// Fallback text when the sensor lookup fails without a message.
pub const SENSOR_FAILED_MESSAGE: &str = "ThingSpeak fetch failed";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Prediction request failed: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Handoff(#[from] HandoffError),
}

impl SubmitError {
    /// Notification text for the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(_) => PREDICTION_FAILED_MESSAGE.to_string(),
            Self::Handoff(err) => format!("Could not keep the recommendation: {err}"),
        }
    }
}

/// A prediction stored in the handoff, with its history write still running.
#[derive(Debug)]
pub struct Submitted {
    pub result: PredictionResult,
    pub history_write: JoinHandle<()>,
}

/// Run `/predict`, store the result in the handoff and start the history write.
///
/// On any error the handoff is left as it was.
pub fn submit_prediction(
    api: &ApiClient,
    handoff: &ResultHandoff,
    input: PredictionInput,
) -> Result<Submitted, SubmitError> {
    let result = api.call::<Predict>(&input)?.into_result(input)?;
    tracing::info!(crop = %result.crop, confidence = result.confidence, "prediction received");
    handoff.set(&result)?;
    let history_write = spawn_history_write(api.clone(), HistoryRecord::from(&result));
    Ok(Submitted {
        result,
        history_write,
    })
}

/// Post a history record in the background. Failures are only logged.
pub fn spawn_history_write(api: ApiClient, record: HistoryRecord) -> JoinHandle<()> {
    thread::spawn(move || match api.call::<SaveHistory>(&record) {
        Ok(_) => tracing::debug!(crop = %record.prediction, "history entry saved"),
        Err(err) => tracing::warn!(error = %err, "failed to save history entry"),
    })
}

/// Latest feed values for the given sensor channel.
pub fn fetch_sensor_reading(
    api: &ApiClient,
    channel_id: &str,
    api_key: &str,
) -> Result<SensorReading, ApiError> {
    let query = SensorQuery {
        channel_id: channel_id.trim().to_string(),
        api_key: api_key.trim().to_string(),
    };
    api.call::<SensorLatest>(&query)
}
