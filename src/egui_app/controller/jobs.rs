use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use crate::api::ApiError;
use crate::api::PredictionResult;
use crate::api::types::{HistoryEntry, SensorReading};
use crate::dashboard::calendar::CalendarView;
use crate::dashboard::chat::ChatReply;
use crate::dashboard::disease::{DetectError, DiseaseReport};
use crate::dashboard::fertilizer::FertilizerPlan;
use crate::dashboard::irrigation::IrrigationPlan;
use crate::dashboard::prices::PriceBoard;
use crate::dashboard::yield_predictor::YieldEstimate;
use crate::export::{ExportError, ExportFormat};
use crate::request_state::Ticket;
use crate::suggestions::{SuggestError, Suggestions};
use crate::weather::WeatherReport;
use crate::workflow::SubmitError;

/// A finished request tagged with the ticket it was started under.
#[derive(Debug)]
pub(crate) struct JobOutcome<T, E> {
    pub(crate) ticket: Ticket,
    pub(crate) result: Result<T, E>,
}

impl<T, E> JobOutcome<T, E> {
    pub(crate) fn new(ticket: Ticket, result: Result<T, E>) -> Self {
        Self { ticket, result }
    }
}

#[derive(Debug)]
pub(crate) struct ExportOutcome {
    pub(crate) format: ExportFormat,
    pub(crate) outcome: JobOutcome<PathBuf, ExportError>,
}

#[derive(Debug)]
pub(crate) enum ToolMessage {
    Fertilizer(JobOutcome<FertilizerPlan, ApiError>),
    Yield(JobOutcome<YieldEstimate, ApiError>),
    Irrigation(JobOutcome<IrrigationPlan, ApiError>),
    Calendar(JobOutcome<CalendarView, ApiError>),
    Prices(JobOutcome<PriceBoard, ApiError>),
    Chat(JobOutcome<ChatReply, ApiError>),
    Disease(JobOutcome<DiseaseReport, DetectError>),
}

#[derive(Debug)]
pub(crate) enum JobMessage {
    Prediction(JobOutcome<PredictionResult, SubmitError>),
    SensorLoaded(JobOutcome<SensorReading, ApiError>),
    Suggestions(JobOutcome<Suggestions, SuggestError>),
    Exported(ExportOutcome),
    History(JobOutcome<Vec<HistoryEntry>, ApiError>),
    Weather(JobOutcome<WeatherReport, ApiError>),
    Tool(ToolMessage),
}

/// Worker threads and the channel they report on.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    in_flight: usize,
}

impl ControllerJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = channel();
        Self {
            message_tx,
            message_rx,
            in_flight: 0,
        }
    }

    /// Run `job` on its own thread; its message is picked up by the next poll.
    pub(crate) fn spawn<F>(&mut self, name: &'static str, job: F)
    where
        F: FnOnce() -> JobMessage + Send + 'static,
    {
        let tx = self.message_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("agrodesk-{name}"))
            .spawn(move || {
                if tx.send(job()).is_err() {
                    tracing::debug!(job = name, "controller gone before job finished");
                }
            });
        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(err) => tracing::error!(job = name, error = %err, "failed to spawn worker"),
        }
    }

    pub(crate) fn try_recv_message(&mut self) -> Result<JobMessage, TryRecvError> {
        let message = self.message_rx.try_recv()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Ok(message)
    }

    /// Workers started but not yet drained.
    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }
}
