use serde::{Deserialize, Serialize};

use super::{ToolInputError, begin_unless_loading, parse_number};
use crate::api::{ApiClient, ApiError, Endpoint, Method};
use crate::request_state::{RequestState, Ticket};

pub const FAILED_MESSAGE: &str = "Prediction failed";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl SoilQuality {
    pub const ALL: [SoilQuality; 3] = [SoilQuality::Low, SoilQuality::Medium, SoilQuality::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct YieldForm {
    pub crop: String,
    pub area: String,
    pub soil_quality: SoilQuality,
    pub n: String,
    pub p: String,
    pub k: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YieldRequest {
    pub crop: String,
    pub area: f64,
    pub soil_quality: SoilQuality,
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
}

impl YieldForm {
    pub fn to_request(&self) -> Result<YieldRequest, ToolInputError> {
        Ok(YieldRequest {
            crop: self.crop.trim().to_string(),
            area: parse_number("Area", &self.area)?,
            soil_quality: self.soil_quality,
            n: parse_number("N", &self.n)?,
            p: parse_number("P", &self.p)?,
            k: parse_number("K", &self.k)?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct YieldFactors {
    #[serde(default)]
    pub soil_quality: Option<String>,
    #[serde(default)]
    pub npk_adjustment: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct YieldEstimate {
    #[serde(default)]
    pub predicted_yield_tonnes: Option<f64>,
    #[serde(default)]
    pub yield_per_hectare: Option<f64>,
    #[serde(default)]
    pub area_hectares: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub factors: Option<YieldFactors>,
}

/// `POST /yield/predict`
pub struct PredictYield;

impl Endpoint for PredictYield {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/yield/predict";
    type Request = YieldRequest;
    type Response = YieldEstimate;
}

pub fn predict(api: &ApiClient, request: &YieldRequest) -> Result<YieldEstimate, ApiError> {
    api.call::<PredictYield>(request)
}

#[derive(Debug, Default)]
pub struct YieldTool {
    pub form: YieldForm,
    pub estimate: RequestState<YieldEstimate>,
}

impl YieldTool {
    pub fn begin(&mut self, loading: bool) -> Result<(Ticket, YieldRequest), ToolInputError> {
        let request = self.form.to_request()?;
        let ticket = begin_unless_loading(loading, &mut self.estimate)?;
        Ok((ticket, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn soil_quality_defaults_to_medium() {
        let form = YieldForm {
            crop: "wheat".into(),
            area: "3".into(),
            n: "80".into(),
            p: "40".into(),
            k: "40".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(form.to_request().unwrap()).unwrap();
        assert_eq!(value["soil_quality"], json!("medium"));
        assert_eq!(value["N"], json!(80.0));
    }

    #[test]
    fn busy_dashboard_refuses_to_start() {
        let mut tool = YieldTool::default();
        tool.form = YieldForm {
            crop: "rice".into(),
            area: "1".into(),
            n: "1".into(),
            p: "1".into(),
            k: "1".into(),
            soil_quality: SoilQuality::High,
        };
        assert_eq!(tool.begin(true).unwrap_err(), ToolInputError::Busy);
        assert!(tool.begin(false).is_ok());
    }

    #[test]
    fn estimate_reads_factors() {
        let estimate: YieldEstimate = serde_json::from_value(json!({
            "predicted_yield_tonnes": 9.6,
            "yield_per_hectare": 3.2,
            "area_hectares": 3,
            "confidence": 85,
            "factors": {"soil_quality": "high", "npk_adjustment": 10}
        }))
        .unwrap();
        let factors = estimate.factors.unwrap();
        assert_eq!(factors.soil_quality.as_deref(), Some("high"));
        assert_eq!(factors.npk_adjustment, Some(10.0));
    }
}
