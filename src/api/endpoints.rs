//! Routes used by the prediction flow, history, sensor import and weather.
//!
//! Dashboard tool routes live next to their tool in [`crate::dashboard`].

use serde::Serialize;

use super::types::{
    HistoryPage, HistoryRecord, PredictResponse, PredictionInput, SensorQuery, SensorReading,
};
use super::{Endpoint, Method};

/// `POST /predict`
pub struct Predict;

impl Endpoint for Predict {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/predict";
    type Request = PredictionInput;
    type Response = PredictResponse;
}

/// Body of `POST /suggest`: the original inputs plus the predicted label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SuggestRequest {
    #[serde(flatten)]
    pub input: PredictionInput,
    pub prediction: String,
}

/// `POST /suggest`; the reply shape varies, see [`crate::suggestions`].
pub struct Suggest;

impl Endpoint for Suggest {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/suggest";
    type Request = SuggestRequest;
    type Response = serde_json::Value;
}

/// `POST /history`
pub struct SaveHistory;

impl Endpoint for SaveHistory {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/history";
    type Request = HistoryRecord;
    type Response = serde_json::Value;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryQuery {
    pub limit: usize,
}

/// `GET /history?limit=N`
pub struct ListHistory;

impl Endpoint for ListHistory {
    const METHOD: Method = Method::Get;
    const PATH: &'static str = "/history";
    type Request = HistoryQuery;
    type Response = HistoryPage;

    fn query(request: &HistoryQuery) -> Vec<(&'static str, String)> {
        vec![("limit", request.limit.to_string())]
    }
}

/// `GET /thingspeak/latest?channelId=..&apiKey=..`
pub struct SensorLatest;

impl Endpoint for SensorLatest {
    const METHOD: Method = Method::Get;
    const PATH: &'static str = "/thingspeak/latest";
    type Request = SensorQuery;
    type Response = SensorReading;

    fn query(request: &SensorQuery) -> Vec<(&'static str, String)> {
        vec![
            ("channelId", request.channel_id.clone()),
            ("apiKey", request.api_key.clone()),
        ]
    }
}

/// `GET /weather`
pub struct Weather;

impl Endpoint for Weather {
    const METHOD: Method = Method::Get;
    const PATH: &'static str = "/weather";
    type Request = ();
    type Response = serde_json::Value;
}
