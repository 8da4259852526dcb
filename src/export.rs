//! Export of a recommendation and its suggestions to a file.
//!
//! Text reports are rendered by the backend and streamed to disk; JSON
//! reports are serialized locally. Both land in the export folder as
//! `<crop>_recommendation.<ext>`.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::api::{ApiClient, ApiError, PredictionInput, PredictionResult};
use crate::app_dirs;
use crate::http_client;
use crate::suggestions::Suggestions;

/// Cap on backend-rendered reports.
const MAX_REPORT_BYTES: usize = 16 * 1024 * 1024;
const EXPORT_PATH: &str = "/export";

/// What gets exported: the recommendation plus any loaded suggestions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub crop: String,
    pub prediction: String,
    #[serde(rename = "inputData")]
    pub input_data: PredictionInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Value>,
}

impl ExportSnapshot {
    pub fn new(result: &PredictionResult, suggestions: Option<&Suggestions>) -> Self {
        Self {
            crop: result.crop.clone(),
            prediction: result.crop.clone(),
            input_data: result.input_data,
            structured: suggestions.and_then(Suggestions::structured),
            suggestions: suggestions.and_then(Suggestions::free_text),
        }
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ExportError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text report",
            Self::Json => "JSON",
        }
    }

    fn query_value(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    fn media_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Json => "application/json",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export request failed: {}", .0.user_message("Export failed"))]
    Api(#[from] ApiError),
    #[error("Export folder unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// `<crop>_recommendation.<ext>`, with characters unsafe in file names replaced.
pub fn export_file_name(crop: &str, format: ExportFormat) -> String {
    let stem: String = crop
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();
    let stem = if stem.is_empty() { "crop" } else { stem.as_str() };
    format!("{stem}_recommendation.{}", format.extension())
}

/// Folder used for exports: the configured one, else the download folder.
pub fn resolve_export_dir(configured: Option<&Path>) -> Result<PathBuf, ExportError> {
    match configured {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(app_dirs::default_export_dir()?),
    }
}

/// Write `snapshot` in `format` into `dir` and return the file path.
///
/// The file appears only once complete.
pub fn export_snapshot(
    api: &ApiClient,
    snapshot: &ExportSnapshot,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(&snapshot.crop, format));
    let write_err = |source| ExportError::Write {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    match format {
        ExportFormat::Json => {
            temp.write_all(&snapshot.to_json_bytes()?)
                .map_err(write_err)?;
        }
        ExportFormat::Text => {
            let response = api.post_raw(
                EXPORT_PATH,
                &[("format", format.query_value())],
                format.media_type(),
                snapshot,
            )?;
            http_client::copy_response_to_writer(response, temp.as_file_mut(), MAX_REPORT_BYTES)
                .map_err(write_err)?;
        }
    }
    temp.flush().map_err(write_err)?;
    temp.persist(&path).map_err(|err| write_err(err.error))?;
    tracing::info!(path = %path.display(), format = format.extension(), "exported recommendation");
    Ok(path)
}
