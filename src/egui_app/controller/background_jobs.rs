use std::sync::mpsc::TryRecvError;

use super::jobs::JobMessage;
use super::*;

impl AppController {
    /// Apply every message workers have sent since the last frame.
    pub fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            match message {
                JobMessage::Prediction(outcome) => self.handle_prediction(outcome),
                JobMessage::SensorLoaded(outcome) => self.handle_sensor_loaded(outcome),
                JobMessage::Suggestions(outcome) => self.handle_suggestions(outcome),
                JobMessage::Exported(outcome) => self.handle_export(outcome),
                JobMessage::History(outcome) => self.handle_history(outcome),
                JobMessage::Weather(outcome) => self.handle_weather(outcome),
                JobMessage::Tool(message) => self.handle_tool(message),
            }
        }
    }
}
