//! Planting calendars and their month grid.

use serde::Serialize;
use serde_json::Value;

use super::{ToolInputError, begin_unless_loading};
use crate::api::{ApiClient, ApiError, Endpoint, Method};
use crate::request_state::{RequestState, Ticket};

pub const FAILED_MESSAGE: &str = "Failed to fetch calendar";

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CalendarRequest {
    pub crop: String,
}

/// `POST /calendar`; an empty crop asks for every calendar.
pub struct FetchCalendar;

impl Endpoint for FetchCalendar {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/calendar";
    type Request = CalendarRequest;
    type Response = Value;
}

/// Fetch calendars and pick the ones to display.
///
/// A reply carrying `error` is a failure even with a 2xx status; the known
/// crops are appended to its message.
pub fn fetch_calendars(api: &ApiClient, request: &CalendarRequest) -> Result<CalendarView, ApiError> {
    let reply = api.call::<FetchCalendar>(request)?;
    if let Some(message) = reply_error(&reply) {
        return Err(ApiError::Backend(message));
    }
    Ok(CalendarView::from_reply(&request.crop, &reply))
}

fn reply_error(reply: &Value) -> Option<String> {
    let error = match reply.get("error")? {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    let available: Vec<String> = reply
        .get("available_crops")
        .and_then(Value::as_array)
        .map(|crops| crops.iter().map(value_text).collect())
        .unwrap_or_default();
    if available.is_empty() {
        Some(error)
    } else {
        Some(format!("{error}. Available: {}", available.join(", ")))
    }
}

/// What a month cell shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonthMark {
    #[default]
    Idle,
    Plant,
    Harvest,
    Both,
}

impl MonthMark {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Plant => "Plant",
            Self::Harvest => "Harvest",
            Self::Both => "Both",
        }
    }
}

/// Inclusive month indices, `0` = January.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthRange {
    pub start: usize,
    pub end: usize,
}

impl MonthRange {
    /// Months covered, wrapping past December (`Nov-Feb`).
    pub fn months(self) -> impl Iterator<Item = usize> {
        let len = (self.end + 12 - self.start) % 12 + 1;
        (0..len).map(move |offset| (self.start + offset) % 12)
    }
}

fn month_index(name: &str) -> Option<usize> {
    let prefix: String = name.trim().to_lowercase().chars().take(3).collect();
    MONTHS
        .iter()
        .position(|month| month.to_lowercase().starts_with(&prefix))
}

/// Parse `"Jun-Jul"` or `"Oct"`. Unknown start months become January,
/// unknown end months December; an unknown single month is January.
pub fn parse_month_range(range: &str) -> MonthRange {
    let parts: Vec<&str> = range.split('-').collect();
    if let [start, end] = parts.as_slice() {
        return MonthRange {
            start: month_index(start).unwrap_or(0),
            end: month_index(end).unwrap_or(11),
        };
    }
    let single = month_index(range).unwrap_or(0);
    MonthRange {
        start: single,
        end: single,
    }
}

/// Mark every month covered by the planting and harvesting ranges.
pub fn month_grid(planting: &[String], harvesting: &[String]) -> [MonthMark; 12] {
    let mut plant = [false; 12];
    let mut harvest = [false; 12];
    for (ranges, marks) in [(planting, &mut plant), (harvesting, &mut harvest)] {
        for range in ranges.iter().filter(|range| !range.trim().is_empty()) {
            for month in parse_month_range(range).months() {
                marks[month] = true;
            }
        }
    }
    std::array::from_fn(|month| match (plant[month], harvest[month]) {
        (true, true) => MonthMark::Both,
        (true, false) => MonthMark::Plant,
        (false, true) => MonthMark::Harvest,
        (false, false) => MonthMark::Idle,
    })
}

/// One crop's calendar with its month grid.
#[derive(Clone, Debug, PartialEq)]
pub struct CropCalendar {
    pub crop: String,
    pub season: Option<String>,
    pub duration_days: Option<String>,
    pub planting: Vec<String>,
    pub harvesting: Vec<String>,
    pub grid: [MonthMark; 12],
}

impl CropCalendar {
    fn from_value(crop: &str, data: &Value) -> Self {
        let planting = ranges(data.get("planting"));
        let harvesting = ranges(data.get("harvesting"));
        Self {
            crop: crop.to_string(),
            season: non_empty_text(data.get("season")),
            duration_days: non_empty_text(data.get("duration_days")),
            grid: month_grid(&planting, &harvesting),
            planting,
            harvesting,
        }
    }

    pub fn planting_text(&self) -> String {
        join_or_na(&self.planting)
    }

    pub fn harvesting_text(&self) -> String {
        join_or_na(&self.harvesting)
    }
}

/// Calendars chosen for display from one reply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalendarView {
    pub requested: String,
    pub calendars: Vec<CropCalendar>,
}

impl CalendarView {
    /// Prefer the `calendars` map, then the requested crop's key, then the
    /// first key that is not `error`.
    pub fn from_reply(requested: &str, reply: &Value) -> Self {
        let requested = requested.trim().to_string();
        let mut calendars = Vec::new();
        if let Some(Value::Object(all)) = reply.get("calendars") {
            calendars.extend(
                all.iter()
                    .map(|(crop, data)| CropCalendar::from_value(crop, data)),
            );
        } else if let Value::Object(map) = reply {
            let wanted = requested.to_lowercase();
            let picked = match map.get(&wanted) {
                Some(data) => Some((wanted.as_str(), data)),
                None => map
                    .iter()
                    .find(|(key, _)| key.as_str() != "error")
                    .map(|(key, data)| (key.as_str(), data)),
            };
            if let Some((crop, data)) = picked {
                calendars.push(CropCalendar::from_value(crop, data));
            }
        }
        Self {
            requested,
            calendars,
        }
    }

    pub fn empty_message(&self) -> String {
        format!(
            "No calendar data found for \"{}\". Try: rice, wheat, corn",
            self.requested
        )
    }
}

#[derive(Debug, Default)]
pub struct CalendarTool {
    pub crop: String,
    pub calendars: RequestState<CalendarView>,
}

impl CalendarTool {
    pub fn begin(&mut self, loading: bool) -> Result<(Ticket, CalendarRequest), ToolInputError> {
        let ticket = begin_unless_loading(loading, &mut self.calendars)?;
        let request = CalendarRequest {
            crop: self.crop.trim().to_string(),
        };
        Ok((ticket, request))
    }

    pub fn button_label(&self) -> String {
        let crop = self.crop.trim();
        if crop.is_empty() {
            "Get All Calendars".to_string()
        } else {
            format!("Get {crop} Calendar")
        }
    }
}

fn ranges(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(value_text)
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![value_text(other)],
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        other => Some(value_text(other)).filter(|text| !text.trim().is_empty()),
    }
}

fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "N/A".to_string()
    } else {
        items.join(", ")
    }
}
