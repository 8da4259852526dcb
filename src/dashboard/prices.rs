use std::collections::BTreeMap;

use serde::Deserialize;

use super::{ToolInputError, begin_unless_loading};
use crate::api::{ApiClient, ApiError, Endpoint, Method};
use crate::request_state::{RequestState, Ticket};

pub const FAILED_MESSAGE: &str = "Failed";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CropPrice {
    #[serde(default)]
    pub price_per_ton: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub trend: Option<String>,
}

impl CropPrice {
    pub fn trend(&self) -> Trend {
        match self.trend.as_deref().map(str::trim) {
            Some(trend) if trend.eq_ignore_ascii_case("up") => Trend::Up,
            Some(trend) if trend.eq_ignore_ascii_case("down") => Trend::Down,
            _ => Trend::Flat,
        }
    }

    /// `+2.5%`, `-1%` or `0%`; `-` when unknown.
    pub fn change_text(&self) -> String {
        match self.change {
            Some(change) if change > 0.0 => format!("+{change}%"),
            Some(change) => format!("{change}%"),
            None => "-".to_string(),
        }
    }

    pub fn price_text(&self) -> String {
        let Some(price) = self.price_per_ton else {
            return "-".to_string();
        };
        match self.currency.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(currency) => format!("{price} {currency}/ton"),
            None => format!("${price}/ton"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PriceBoard {
    #[serde(default)]
    pub prices: BTreeMap<String, CropPrice>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// `GET /market/prices`
pub struct MarketPrices;

impl Endpoint for MarketPrices {
    const METHOD: Method = Method::Get;
    const PATH: &'static str = "/market/prices";
    type Request = ();
    type Response = PriceBoard;
}

pub fn fetch(api: &ApiClient) -> Result<PriceBoard, ApiError> {
    api.call::<MarketPrices>(&())
}

#[derive(Debug, Default)]
pub struct PricesTool {
    pub board: RequestState<PriceBoard>,
}

impl PricesTool {
    pub fn begin(&mut self, loading: bool) -> Result<Ticket, ToolInputError> {
        begin_unless_loading(loading, &mut self.board)
    }
}
