use pdfpane_core::{PDF_MEDIA_TYPE, SubmittedFile};
use thiserror::Error;

/// Default extraction service base URL (local network service).
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file's declared media type is not `application/pdf`. Detected
    /// locally; no request is issued.
    #[error("unsupported file type (expected application/pdf)")]
    UnsupportedType,
    /// The remote call failed: transport error, non-success status, or an
    /// unreadable response body.
    #[error("extraction request failed: {0}")]
    RequestFailed(String),
}

/// Client for the remote extraction service.
///
/// Performs exactly one request/response exchange per submitted file: a
/// single multipart POST to `{base}/upload` with one form field named
/// `file`. No retries, no chunking, no streaming.
pub struct ExtractClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExtractClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send the file to the extraction service and resolve to the extracted
    /// text. Every failure path resolves to a tagged [`ExtractError`]; this
    /// never panics past its boundary.
    pub async fn extract_text(&self, file: &SubmittedFile) -> Result<String, ExtractError> {
        if !file.is_pdf() {
            return Err(ExtractError::UnsupportedType);
        }

        let url = format!("{}/upload", self.base_url);
        tracing::debug!(%url, name = %file.name, size = file.len(), "sending extraction request");

        let part = reqwest::multipart::Part::bytes(file.bytes.as_ref().clone())
            .file_name(file.name.clone())
            .mime_str(PDF_MEDIA_TYPE)
            .map_err(|e| ExtractError::RequestFailed(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ExtractError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExtractError::RequestFailed(format!("HTTP {}", status)));
        }

        let is_json = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        let body = resp
            .text()
            .await
            .map_err(|e| ExtractError::RequestFailed(e.to_string()))?;

        // The service returns the text as a JSON string scalar; unwrap that
        // case and pass any other body through verbatim.
        if is_json {
            if let Ok(serde_json::Value::String(text)) = serde_json::from_str(&body) {
                return Ok(text);
            }
        }
        Ok(body)
    }
}
