use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ToolInputError, begin_unless_loading, parse_number};
use crate::api::{ApiClient, ApiError, Endpoint, Method};
use crate::request_state::{RequestState, Ticket};

pub const FAILED_MESSAGE: &str = "Failed";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Sandy,
    #[default]
    Loam,
    Clay,
}

impl SoilType {
    pub const ALL: [SoilType; 3] = [SoilType::Sandy, SoilType::Loam, SoilType::Clay];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sandy => "Sandy",
            Self::Loam => "Loam",
            Self::Clay => "Clay",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IrrigationForm {
    pub crop: String,
    pub soil_type: SoilType,
    pub rainfall: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IrrigationRequest {
    pub crop: String,
    pub soil_type: SoilType,
    pub rainfall: f64,
}

impl IrrigationForm {
    pub fn to_request(&self) -> Result<IrrigationRequest, ToolInputError> {
        Ok(IrrigationRequest {
            crop: self.crop.trim().to_string(),
            soil_type: self.soil_type,
            rainfall: parse_number("Rainfall", &self.rainfall)?,
        })
    }
}

/// How often and how much to water.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Watering {
    #[serde(default)]
    pub frequency_days: Option<f64>,
    #[serde(default)]
    pub amount_mm: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Schedule {
    #[serde(flatten)]
    pub base: Watering,
    /// Growth stage name to its own watering plan.
    #[serde(default)]
    pub stages: BTreeMap<String, Watering>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Adjustments {
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub rainfall_impact: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct IrrigationPlan {
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub adjustments: Option<Adjustments>,
}

/// `POST /irrigation/schedule`
pub struct ScheduleIrrigation;

impl Endpoint for ScheduleIrrigation {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/irrigation/schedule";
    type Request = IrrigationRequest;
    type Response = IrrigationPlan;
}

pub fn schedule(api: &ApiClient, request: &IrrigationRequest) -> Result<IrrigationPlan, ApiError> {
    api.call::<ScheduleIrrigation>(request)
}

#[derive(Debug, Default)]
pub struct IrrigationTool {
    pub form: IrrigationForm,
    pub schedule: RequestState<IrrigationPlan>,
}

impl IrrigationTool {
    pub fn begin(&mut self, loading: bool) -> Result<(Ticket, IrrigationRequest), ToolInputError> {
        let request = self.form.to_request()?;
        let ticket = begin_unless_loading(loading, &mut self.schedule)?;
        Ok((ticket, request))
    }
}
