//! Backend HTTP adapter: base address, JSON bodies and one error shape.

mod client;
mod error;

pub mod endpoints;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{PredictionInput, PredictionResult};

use serde::{Serialize, de::DeserializeOwned};

/// HTTP verbs used by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One backend route together with its request and response shapes.
///
/// GET endpoints send no body; their request type only feeds [`Endpoint::query`].
pub trait Endpoint {
    const METHOD: Method;
    const PATH: &'static str;
    type Request: Serialize;
    type Response: DeserializeOwned;

    /// Query-string pairs derived from the request.
    fn query(_request: &Self::Request) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}
