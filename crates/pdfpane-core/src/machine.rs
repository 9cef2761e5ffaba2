use std::sync::Arc;

use crate::preview::PreviewStore;
use crate::{
    EXTRACTION_FAILED_MESSAGE, SessionStatus, SubmittedFile, UNSUPPORTED_TYPE_MESSAGE,
    UploadSession,
};

/// Inputs to the upload machine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A file arrived via drop or picker.
    Submit(SubmittedFile),
    /// The extraction request for `generation` resolved.
    ExtractionResolved {
        generation: u64,
        outcome: Result<String, String>,
    },
    /// User requested "upload new file".
    Reset,
}

/// Side effects requested by a transition, executed by the caller.
///
/// The machine performs preview acquisition/release itself (it owns the
/// store); the network request is handed out so the presentation layer's
/// backend task can await it without blocking the UI.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Issue exactly one extraction request for this file. The resolution
    /// must be fed back as [`SessionEvent::ExtractionResolved`] carrying the
    /// same generation.
    StartExtraction { file: SubmittedFile, generation: u64 },
    /// Show a transient message without touching the session.
    Notice(String),
}

/// What a transition will do, decided purely from the current status and the
/// event. Resource acquisition happens afterwards in [`UploadMachine::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
    /// Tear down any existing session and start a new one for this file.
    Start,
    /// Invalid media type: leave everything untouched, emit a notice.
    Reject,
    /// Apply the extraction outcome to the current session.
    ApplyOutcome,
    /// The outcome belongs to a torn-down session: drop it.
    DiscardStale,
    /// Release the preview and return to idle.
    TearDown,
    Ignore,
}

fn plan(status: SessionStatus, event: &SessionEvent, current_generation: u64) -> Plan {
    match event {
        SessionEvent::Submit(file) => {
            if file.is_pdf() {
                Plan::Start
            } else {
                Plan::Reject
            }
        }
        SessionEvent::ExtractionResolved { generation, .. } => {
            if *generation == current_generation && status == SessionStatus::Processing {
                Plan::ApplyOutcome
            } else {
                Plan::DiscardStale
            }
        }
        SessionEvent::Reset => {
            if status.is_terminal() {
                Plan::TearDown
            } else {
                Plan::Ignore
            }
        }
    }
}

/// The orchestrator: owns the one [`UploadSession`] and the preview store,
/// sequences preview creation and the extraction request, and exposes the
/// session to the presentation layer.
pub struct UploadMachine {
    session: UploadSession,
    store: PreviewStore,
    /// Bumped on every accepted submission; stale extraction results carry
    /// an older value and are discarded.
    generation: u64,
}

impl UploadMachine {
    pub fn new() -> Self {
        Self {
            session: UploadSession::idle(),
            store: PreviewStore::new(),
            generation: 0,
        }
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Read-only access to the current preview's bytes, for rendering.
    pub fn preview_bytes(&self) -> Option<Arc<Vec<u8>>> {
        self.session
            .preview
            .as_ref()
            .and_then(|p| self.store.resolve(p))
    }

    /// Number of live preview resources (one while a session exists).
    pub fn live_previews(&self) -> usize {
        self.store.len()
    }

    /// Process one event and return the effects the caller must execute.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        match plan(self.session.status, &event, self.generation) {
            Plan::Start => {
                let SessionEvent::Submit(file) = event else {
                    unreachable!("Start is only planned for Submit");
                };
                self.start_session(file)
            }
            Plan::Reject => {
                tracing::debug!("rejected non-PDF submission");
                vec![Effect::Notice(UNSUPPORTED_TYPE_MESSAGE.to_string())]
            }
            Plan::ApplyOutcome => {
                let SessionEvent::ExtractionResolved { outcome, .. } = event else {
                    unreachable!("ApplyOutcome is only planned for ExtractionResolved");
                };
                self.apply_outcome(outcome);
                Vec::new()
            }
            Plan::DiscardStale => {
                tracing::debug!("discarded stale extraction result");
                Vec::new()
            }
            Plan::TearDown => {
                self.tear_down();
                Vec::new()
            }
            Plan::Ignore => Vec::new(),
        }
    }

    /// Tear down any previous session and begin a new one. The preview is
    /// created synchronously and reflected in the session strictly before
    /// the extraction effect is returned.
    fn start_session(&mut self, file: SubmittedFile) -> Vec<Effect> {
        if let Some(prev) = self.session.preview.take() {
            self.store.release(&prev);
        }
        self.generation += 1;

        let preview = self.store.create(&file);
        self.session = UploadSession {
            status: SessionStatus::Previewing,
            file_name: Some(file.name.clone()),
            preview: Some(preview),
            extracted_text: None,
            error_message: None,
        };
        tracing::debug!(name = %file.name, generation = self.generation, "session started");

        self.session.status = SessionStatus::Processing;
        vec![Effect::StartExtraction {
            file,
            generation: self.generation,
        }]
    }

    fn apply_outcome(&mut self, outcome: Result<String, String>) {
        match outcome {
            Ok(text) => {
                tracing::debug!(chars = text.len(), "extraction succeeded");
                self.session.status = SessionStatus::Ready;
                self.session.extracted_text = Some(text);
            }
            Err(detail) => {
                tracing::warn!(%detail, "extraction failed");
                self.session.status = SessionStatus::Failed;
                self.session.error_message = Some(EXTRACTION_FAILED_MESSAGE.to_string());
            }
        }
    }

    fn tear_down(&mut self) {
        if let Some(preview) = self.session.preview.take() {
            self.store.release(&preview);
        }
        self.session = UploadSession::idle();
        tracing::debug!("session reset");
    }
}

impl Default for UploadMachine {
    fn default() -> Self {
        Self::new()
    }
}
