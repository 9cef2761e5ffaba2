use pdfpane_core::SubmittedFile;

/// Commands sent from the UI to the backend task.
pub enum BackendCommand {
    /// Issue one extraction request. The resolution is reported back with
    /// the same generation so stale results can be discarded.
    Extract {
        file: SubmittedFile,
        generation: u64,
    },
}

/// Events flowing from the backend task to the UI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// The extraction request for `generation` resolved.
    ExtractionResolved {
        generation: u64,
        outcome: Result<String, String>,
    },
}
