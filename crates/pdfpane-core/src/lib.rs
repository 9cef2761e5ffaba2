use std::path::Path;
use std::sync::Arc;

pub mod machine;
pub mod preview;

// Re-export for convenience
pub use machine::{Effect, SessionEvent, UploadMachine};
pub use preview::{PreviewRef, PreviewStore};

/// Media type accepted for submission.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Message shown when a non-PDF file is submitted.
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Please upload a PDF file";

/// Message shown when the extraction service fails.
pub const EXTRACTION_FAILED_MESSAGE: &str = "Error processing PDF file";

/// A file handed to the upload machine by the presentation layer.
///
/// Bytes are shared so the file can be cloned into the preview store and the
/// outbound request without copying.
#[derive(Debug, Clone)]
pub struct SubmittedFile {
    pub name: String,
    /// Declared media type (e.g. "application/pdf").
    pub media_type: String,
    pub bytes: Arc<Vec<u8>>,
}

impl SubmittedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: Arc::new(bytes),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Derive a declared media type from a file extension.
///
/// A terminal client has no browser-style MIME declaration, so the extension
/// stands in for it. Only the PDF mapping matters to the machine; everything
/// else just needs to be distinguishable from `application/pdf`.
pub fn media_type_for_path(path: &Path) -> String {
    let ext = path.extension().and_then(|e| e.to_str());
    match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("pdf") => PDF_MEDIA_TYPE.to_string(),
        Some("txt") | Some("md") => "text/plain".to_string(),
        Some("json") => "application/json".to_string(),
        Some("png") => "image/png".to_string(),
        Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

/// Status of the single upload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Previewing,
    Processing,
    Ready,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Ready | SessionStatus::Failed)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionStatus::Idle)
    }
}

/// The single mutable unit of state for one user interaction cycle.
///
/// Exactly one of `extracted_text` / `error_message` is set in a terminal
/// status; both are absent otherwise. `preview` is present in every
/// non-`Idle` status.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub status: SessionStatus,
    pub file_name: Option<String>,
    pub preview: Option<PreviewRef>,
    pub extracted_text: Option<String>,
    pub error_message: Option<String>,
}

impl UploadSession {
    pub fn idle() -> Self {
        Self {
            status: SessionStatus::Idle,
            file_name: None,
            preview: None,
            extracted_text: None,
            error_message: None,
        }
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn media_type_pdf_extension_case_insensitive() {
        assert_eq!(media_type_for_path(&PathBuf::from("a.pdf")), PDF_MEDIA_TYPE);
        assert_eq!(media_type_for_path(&PathBuf::from("A.PDF")), PDF_MEDIA_TYPE);
    }

    #[test]
    fn media_type_non_pdf_is_not_pdf() {
        assert_ne!(
            media_type_for_path(&PathBuf::from("notes.txt")),
            PDF_MEDIA_TYPE
        );
        assert_ne!(media_type_for_path(&PathBuf::from("no_ext")), PDF_MEDIA_TYPE);
    }

    #[test]
    fn submitted_file_pdf_predicate() {
        let f = SubmittedFile::new("a.pdf", PDF_MEDIA_TYPE, b"%PDF-1.4".to_vec());
        assert!(f.is_pdf());
        let f = SubmittedFile::new("a.txt", "text/plain", b"hello".to_vec());
        assert!(!f.is_pdf());
    }

    #[test]
    fn idle_session_has_nothing_set() {
        let s = UploadSession::idle();
        assert_eq!(s.status, SessionStatus::Idle);
        assert!(s.preview.is_none());
        assert!(s.extracted_text.is_none());
        assert!(s.error_message.is_none());
    }
}
