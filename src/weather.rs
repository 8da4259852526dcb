//! Current weather strip on the landing view.

use serde_json::Value;

use crate::api::endpoints::Weather;
use crate::api::{ApiClient, ApiError};
use crate::suggestions::{display_value, humanize};

pub const FAILED_MESSAGE: &str = "Failed to load weather";

/// Weather reply flattened into labelled rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherReport {
    pub rows: Vec<(String, String)>,
}

impl WeatherReport {
    /// Top-level keys become rows; nested objects are expanded one level.
    pub fn from_value(value: &Value) -> Self {
        let mut rows = Vec::new();
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        Value::Object(inner) if !inner.is_empty() => {
                            for (inner_key, inner_value) in inner {
                                rows.push((
                                    format!("{} {}", humanize(key), inner_key.replace('_', " ")),
                                    display_value(inner_value),
                                ));
                            }
                        }
                        other => rows.push((humanize(key), display_value(other))),
                    }
                }
            }
            Value::Null => {}
            other => rows.push(("Weather".to_string(), display_value(other))),
        }
        Self { rows }
    }
}

pub fn fetch_weather(api: &ApiClient) -> Result<WeatherReport, ApiError> {
    let value = api.call::<Weather>(&())?;
    Ok(WeatherReport::from_value(&value))
}
