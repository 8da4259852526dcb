use serde::{Deserialize, Serialize};

use super::{Npk, ToolInputError, begin_unless_loading, parse_number};
use crate::api::{ApiClient, ApiError, Endpoint, Method};
use crate::request_state::{RequestState, Ticket};

pub const FAILED_MESSAGE: &str = "Calculation failed";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FertilizerForm {
    pub n: String,
    pub p: String,
    pub k: String,
    pub area: String,
    pub crop: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FertilizerRequest {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub area: f64,
    pub crop: String,
}

impl FertilizerForm {
    pub fn to_request(&self) -> Result<FertilizerRequest, ToolInputError> {
        Ok(FertilizerRequest {
            n: parse_number("Current N", &self.n)?,
            p: parse_number("Current P", &self.p)?,
            k: parse_number("Current K", &self.k)?,
            area: parse_number("Area", &self.area)?,
            crop: self.crop.trim().to_string(),
        })
    }
}

/// Fertilizer quantities in kilograms.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub urea: Option<f64>,
    #[serde(default)]
    pub dap: Option<f64>,
    #[serde(default)]
    pub muriate_potash: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FertilizerPlan {
    #[serde(default)]
    pub area_hectares: Option<f64>,
    #[serde(default)]
    pub requirements_kg: Requirements,
    #[serde(default)]
    pub current_npk: Npk,
    #[serde(default)]
    pub target_npk: Npk,
}

/// `POST /fertilizer/calculate`
pub struct CalculateFertilizer;

impl Endpoint for CalculateFertilizer {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/fertilizer/calculate";
    type Request = FertilizerRequest;
    type Response = FertilizerPlan;
}

pub fn calculate(api: &ApiClient, request: &FertilizerRequest) -> Result<FertilizerPlan, ApiError> {
    api.call::<CalculateFertilizer>(request)
}

#[derive(Debug, Default)]
pub struct FertilizerTool {
    pub form: FertilizerForm,
    pub plan: RequestState<FertilizerPlan>,
}

impl FertilizerTool {
    pub fn begin(&mut self, loading: bool) -> Result<(Ticket, FertilizerRequest), ToolInputError> {
        let request = self.form.to_request()?;
        let ticket = begin_unless_loading(loading, &mut self.plan)?;
        Ok((ticket, request))
    }
}
