//! Crop disease detection from a photo.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::ToolInputError;
use crate::api::{ApiClient, ApiError, Endpoint, Method};
use crate::request_state::{RequestState, Ticket};

pub const FAILED_MESSAGE: &str = "Detection failed";
pub const COMPLETED_MESSAGE: &str = "Disease detection completed";
pub const HEALTHY_LABEL: &str = "Healthy Plant";

/// Extensions offered by the file picker.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Debug, Error)]
pub enum ImageEncodeError {
    #[error("Failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Image {path} is {size} bytes; the limit is {max} bytes")]
    TooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("Unsupported image type: {path}")]
    Unsupported { path: PathBuf },
}

/// MIME type for an image path, by extension.
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Read `path` into a `data:<mime>;base64,...` URI, refusing files over `max_bytes`.
pub fn encode_image_data_uri(path: &Path, max_bytes: u64) -> Result<String, ImageEncodeError> {
    let mime = image_mime(path).ok_or_else(|| ImageEncodeError::Unsupported {
        path: path.to_path_buf(),
    })?;
    let read_err = |source| ImageEncodeError::Read {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(read_err)?.len();
    if size > max_bytes {
        return Err(ImageEncodeError::TooLarge {
            path: path.to_path_buf(),
            size,
            max: max_bytes,
        });
    }
    let bytes = std::fs::read(path).map_err(read_err)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectRequest {
    pub image: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DiseaseReport {
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub symptoms: Option<Vec<String>>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub prevention: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub raw: Option<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl DiseaseReport {
    fn disease_name(&self) -> Option<&str> {
        self.disease.as_deref().filter(|name| !name.trim().is_empty())
    }

    pub fn symptoms(&self) -> &[String] {
        self.symptoms.as_deref().unwrap_or_default()
    }

    pub fn is_healthy(&self) -> bool {
        self.disease_name().is_none()
    }

    pub fn title(&self) -> &str {
        self.disease_name().unwrap_or(HEALTHY_LABEL)
    }

    /// Notification text once detection finishes.
    pub fn summary(&self) -> &str {
        self.disease_name()
            .or_else(|| self.analysis.as_deref().filter(|a| !a.trim().is_empty()))
            .unwrap_or(COMPLETED_MESSAGE)
    }

    pub fn confidence_text(&self) -> Option<String> {
        match self.confidence.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(format!("{text}%")),
            other => Some(format!("{other}%")),
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        let severity = self.severity.as_deref()?.to_lowercase();
        Some(if severity.contains("high") {
            Severity::High
        } else if severity.contains("medium") {
            Severity::Medium
        } else {
            Severity::Low
        })
    }

    /// Free-form analysis, shown only alongside a raw model reply.
    pub fn raw_analysis(&self) -> Option<&str> {
        match (&self.analysis, &self.raw) {
            (Some(analysis), Some(raw)) if !raw.is_null() => Some(analysis),
            _ => None,
        }
    }
}

/// `POST /disease/detect`
pub struct DetectDisease;

impl Endpoint for DetectDisease {
    const METHOD: Method = Method::Post;
    const PATH: &'static str = "/disease/detect";
    type Request = DetectRequest;
    type Response = DiseaseReport;
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error(transparent)]
    Image(#[from] ImageEncodeError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl DetectError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Image(err) => err.to_string(),
            Self::Api(err) => err.user_message(FAILED_MESSAGE),
        }
    }
}

/// Encode the image at `path` and send it for analysis.
pub fn detect(api: &ApiClient, path: &Path, max_bytes: u64) -> Result<DiseaseReport, DetectError> {
    let image = encode_image_data_uri(path, max_bytes)?;
    Ok(api.call::<DetectDisease>(&DetectRequest { image })?)
}

#[derive(Debug, Default)]
pub struct DiseaseTool {
    pub image_path: Option<PathBuf>,
    pub diagnosis: RequestState<DiseaseReport>,
}

impl DiseaseTool {
    /// Start analysing `path`; the previous diagnosis is dropped.
    pub fn begin(&mut self, loading: bool, path: PathBuf) -> Result<Ticket, ToolInputError> {
        if loading {
            return Err(ToolInputError::Busy);
        }
        self.diagnosis.reset();
        self.image_path = Some(path);
        Ok(self.diagnosis.begin())
    }

    /// Forget the image and its diagnosis.
    pub fn clear(&mut self) {
        self.image_path = None;
        self.diagnosis.reset();
    }
}
