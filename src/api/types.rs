//! Wire types shared by the prediction, history and sensor endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use super::ApiError;

/// Confidence assumed when `/predict` does not report one.
pub const DEFAULT_CONFIDENCE: f64 = 95.0;

/// Soil and climate readings sent to `/predict`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

/// A successful recommendation, as stored in the result handoff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub crop: String,
    pub confidence: f64,
    #[serde(rename = "inputData")]
    pub input_data: PredictionInput,
}

/// Raw `/predict` reply. Older backends name the label `prediction`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl PredictResponse {
    /// Combine the reply with the inputs that produced it.
    pub fn into_result(self, input: PredictionInput) -> Result<PredictionResult, ApiError> {
        let crop = self
            .crop
            .or(self.prediction)
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .ok_or_else(|| ApiError::Decode("prediction response has no crop label".into()))?;
        Ok(PredictionResult {
            crop,
            confidence: self.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            input_data: input,
        })
    }
}

/// Body of `POST /history`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub input: PredictionInput,
    pub prediction: String,
    pub confidence: f64,
}

impl From<&PredictionResult> for HistoryRecord {
    fn from(result: &PredictionResult) -> Self {
        Self {
            input: result.input_data,
            prediction: result.crop.clone(),
            confidence: result.confidence,
        }
    }
}

/// Inputs stored with a history row. Rows written by older clients may
/// lack some of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryInput {
    #[serde(rename = "N", default, deserialize_with = "number_or_text")]
    pub n: Option<f64>,
    #[serde(rename = "P", default, deserialize_with = "number_or_text")]
    pub p: Option<f64>,
    #[serde(rename = "K", default, deserialize_with = "number_or_text")]
    pub k: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub ph: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub rainfall: Option<f64>,
}

/// One stored prediction returned by `GET /history`.
///
/// Every field is optional so one damaged row does not hide the others.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default, deserialize_with = "text_or_default")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "input_or_default")]
    pub input: HistoryInput,
    #[serde(default, deserialize_with = "text_or_default")]
    pub prediction: String,
    #[serde(default, deserialize_with = "number_or_text")]
    pub confidence: Option<f64>,
}

/// `GET /history` reply; a missing list means no history.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Latest sensor feed values; absent fields leave the form untouched.
///
/// Feeds report values either as numbers or as numeric strings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SensorReading {
    #[serde(rename = "N", default, deserialize_with = "number_or_text")]
    pub n: Option<f64>,
    #[serde(rename = "P", default, deserialize_with = "number_or_text")]
    pub p: Option<f64>,
    #[serde(rename = "K", default, deserialize_with = "number_or_text")]
    pub k: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub ph: Option<f64>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub rainfall: Option<f64>,
}

/// Credentials for the sensor feed lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SensorQuery {
    #[serde(rename = "channelId")]
    pub channel_id: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

/// A number, or a string holding one. Anything else reads as absent.
fn number_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(value.filter(|number| number.is_finite()))
}

fn text_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn input_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HistoryInput, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> PredictionInput {
        PredictionInput {
            n: 90.0,
            p: 42.0,
            k: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph: 6.5,
            rainfall: 202.9,
        }
    }

    #[test]
    fn input_uses_uppercase_nutrient_keys() {
        let value = serde_json::to_value(input()).unwrap();
        assert_eq!(value["N"], json!(90.0));
        assert_eq!(value["rainfall"], json!(202.9));
        assert!(value.get("n").is_none());
    }

    #[test]
    fn result_serializes_input_data_camel_case() {
        let result = PredictResponse {
            crop: Some("rice".into()),
            ..Default::default()
        }
        .into_result(input())
        .unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["crop"], json!("rice"));
        assert_eq!(value["confidence"], json!(95.0));
        assert_eq!(value["inputData"]["K"], json!(43.0));
    }

    #[test]
    fn falls_back_to_prediction_label() {
        let response: PredictResponse =
            serde_json::from_value(json!({"prediction": "maize", "confidence": 71.5})).unwrap();
        let result = response.into_result(input()).unwrap();
        assert_eq!(result.crop, "maize");
        assert_eq!(result.confidence, 71.5);
    }

    #[test]
    fn missing_label_is_rejected() {
        let err = PredictResponse::default().into_result(input()).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn sensor_reading_tolerates_missing_fields() {
        let reading: SensorReading =
            serde_json::from_value(json!({"N": 12, "humidity": 61.5, "ph": null})).unwrap();
        assert_eq!(reading.n, Some(12.0));
        assert_eq!(reading.humidity, Some(61.5));
        assert_eq!(reading.ph, None);
        assert_eq!(reading.rainfall, None);
    }

    #[test]
    fn sensor_reading_accepts_numeric_strings() {
        let reading: SensorReading = serde_json::from_str(
            r#"{"N":"80","temperature":" 25.5 ","humidity":"n/a","P":true}"#,
        )
        .unwrap();
        assert_eq!(reading.n, Some(80.0));
        assert_eq!(reading.temperature, Some(25.5));
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.p, None);
    }

    #[test]
    fn damaged_history_rows_still_decode() {
        let page: HistoryPage = serde_json::from_value(json!({"history": [
            {"id": 1, "timestamp": "2024-05-01T08:30:00Z", "prediction": "rice",
             "confidence": null, "input": {"N": 90, "ph": "6.5"}},
            {"prediction": "maize", "input": null},
            {"id": 3, "timestamp": 1714550000, "prediction": "jute", "confidence": 80}
        ]}))
        .unwrap();
        assert_eq!(page.history.len(), 3);
        let rice = &page.history[0];
        assert_eq!(rice.confidence, None);
        assert_eq!(rice.input.n, Some(90.0));
        assert_eq!(rice.input.ph, Some(6.5));
        assert_eq!(rice.input.rainfall, None);
        assert_eq!(page.history[1].input, HistoryInput::default());
        assert_eq!(page.history[1].timestamp, "");
        assert_eq!(page.history[2].timestamp, "1714550000");
        assert_eq!(page.history[2].confidence, Some(80.0));
    }
}
