//! Agricultural tool panels.
//!
//! Each tool owns its input form and a [`RequestState`] for its last result.
//! Tools never touch each other's state; the dashboard only tracks which tab
//! is active and derives one loading flag from all of them.

pub mod calendar;
pub mod chat;
pub mod disease;
pub mod fertilizer;
pub mod irrigation;
pub mod prices;
pub mod yield_predictor;

use serde::Deserialize;
use thiserror::Error;

use crate::request_state::RequestState;

pub use calendar::CalendarTool;
pub use chat::ChatTool;
pub use disease::DiseaseTool;
pub use fertilizer::FertilizerTool;
pub use irrigation::IrrigationTool;
pub use prices::PricesTool;
pub use yield_predictor::YieldTool;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DashboardTab {
    #[default]
    Fertilizer,
    Yield,
    Irrigation,
    Calendar,
    Prices,
    Chat,
    Disease,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 7] = [
        DashboardTab::Fertilizer,
        DashboardTab::Yield,
        DashboardTab::Irrigation,
        DashboardTab::Calendar,
        DashboardTab::Prices,
        DashboardTab::Chat,
        DashboardTab::Disease,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Fertilizer => "Fertilizer Calculator",
            Self::Yield => "Yield Predictor",
            Self::Irrigation => "Irrigation Schedule",
            Self::Calendar => "Planting Calendar",
            Self::Prices => "Market Prices",
            Self::Chat => "AI Assistant",
            Self::Disease => "Disease Detection",
        }
    }
}

/// A tool input that could not be sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolInputError {
    #[error("{field} must be a number")]
    NotNumeric { field: &'static str },
    #[error("Another request is still running")]
    Busy,
}

/// Parse a numeric tool field.
pub(crate) fn parse_number(field: &'static str, raw: &str) -> Result<f64, ToolInputError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ToolInputError::NotNumeric { field })
}

/// `value` with `decimals` places, or `-` when missing.
pub fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:.decimals$}"),
        None => "-".to_string(),
    }
}

/// `value` as the backend sent it, or `N/A` when missing.
pub fn or_na<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Nutrient triple as reported by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Npk {
    #[serde(rename = "N", default)]
    pub n: Option<f64>,
    #[serde(rename = "P", default)]
    pub p: Option<f64>,
    #[serde(rename = "K", default)]
    pub k: Option<f64>,
}

/// Per-tool state plus the active tab.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub active: DashboardTab,
    pub fertilizer: FertilizerTool,
    pub yield_tool: YieldTool,
    pub irrigation: IrrigationTool,
    pub calendar: CalendarTool,
    pub prices: PricesTool,
    pub chat: ChatTool,
    pub disease: DiseaseTool,
}

impl DashboardState {
    /// Switch tabs. Results of other tabs are kept.
    pub fn select(&mut self, tab: DashboardTab) {
        self.active = tab;
    }

    /// True while any tool request is in flight; gates every submit button.
    pub fn is_loading(&self) -> bool {
        self.fertilizer.plan.is_pending()
            || self.yield_tool.estimate.is_pending()
            || self.irrigation.schedule.is_pending()
            || self.calendar.calendars.is_pending()
            || self.prices.board.is_pending()
            || self.chat.reply.is_pending()
            || self.disease.diagnosis.is_pending()
    }

    /// Leave the dashboard: outstanding replies will be discarded.
    pub fn leave(&mut self) {
        self.fertilizer.plan.invalidate();
        self.yield_tool.estimate.invalidate();
        self.irrigation.schedule.invalidate();
        self.calendar.calendars.invalidate();
        self.prices.board.invalidate();
        self.chat.reply.invalidate();
        self.disease.diagnosis.invalidate();
    }
}

/// Refuse to start while `loading`, otherwise begin `state`.
pub(crate) fn begin_unless_loading<T>(
    loading: bool,
    state: &mut RequestState<T>,
) -> Result<crate::request_state::Ticket, ToolInputError> {
    if loading {
        return Err(ToolInputError::Busy);
    }
    Ok(state.begin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_tabs_keeps_other_results() {
        let mut dashboard = DashboardState::default();
        let ticket = dashboard.prices.board.begin();
        let _ = dashboard
            .prices
            .board
            .resolve(ticket, Ok(prices::PriceBoard::default()));
        dashboard.select(DashboardTab::Chat);
        dashboard.select(DashboardTab::Fertilizer);
        assert!(dashboard.prices.board.value().is_some());
        assert_eq!(dashboard.active, DashboardTab::Fertilizer);
    }

    #[test]
    fn loading_flag_tracks_any_pending_tool() {
        let mut dashboard = DashboardState::default();
        assert!(!dashboard.is_loading());
        let ticket = dashboard.irrigation.schedule.begin();
        assert!(dashboard.is_loading());
        let _ = dashboard
            .irrigation
            .schedule
            .resolve(ticket, Err("Failed".into()));
        assert!(!dashboard.is_loading());
    }

    #[test]
    fn leaving_discards_outstanding_replies() {
        let mut dashboard = DashboardState::default();
        let ticket = dashboard.prices.board.begin();
        dashboard.leave();
        assert!(!dashboard.is_loading());
        let resolution = dashboard
            .prices
            .board
            .resolve(ticket, Ok(prices::PriceBoard::default()));
        assert!(!resolution.is_applied());
    }

    #[test]
    fn number_parsing_and_formatting() {
        assert_eq!(parse_number("Area", " 2.5 "), Ok(2.5));
        assert_eq!(
            parse_number("Area", ""),
            Err(ToolInputError::NotNumeric { field: "Area" })
        );
        assert_eq!(fixed(Some(12.345), 1), "12.3");
        assert_eq!(fixed(None, 2), "-");
        assert_eq!(or_na(None::<f64>), "N/A");
    }
}
