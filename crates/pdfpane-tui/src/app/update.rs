use std::path::Path;

use pdfpane_core::{Effect, SessionEvent, SubmittedFile, media_type_for_path};

use super::{App, Screen, ViewTab};
use crate::action::Action;
use crate::tui_event::{BackendCommand, BackendEvent};

impl App {
    /// Process a user action and update state. Returns true if the app
    /// should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                if let Some(notice) = &self.notice
                    && self.tick >= notice.expires_at_tick
                {
                    self.notice = None;
                }
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_text_rows = h.saturating_sub(10).max(1);
                return false;
            }
            _ => {}
        }

        match self.screen {
            Screen::FilePicker => self.update_file_picker(action),
            Screen::Viewer => self.update_viewer(action),
        }
        false
    }

    fn update_file_picker(&mut self, action: Action) {
        let picker = &mut self.file_picker;
        match action {
            Action::MoveDown => {
                if !picker.entries.is_empty() {
                    picker.cursor = (picker.cursor + 1).min(picker.entries.len() - 1);
                }
            }
            Action::MoveUp => {
                picker.cursor = picker.cursor.saturating_sub(1);
            }
            Action::GoTop => {
                picker.cursor = 0;
            }
            Action::GoBottom => {
                picker.cursor = picker.entries.len().saturating_sub(1);
            }
            Action::DrillIn => {
                if !self.file_picker.enter_directory() {
                    if let Some(entry) = self.file_picker.entries.get(self.file_picker.cursor) {
                        let path = entry.path.clone();
                        self.submit_path(&path);
                    }
                }
            }
            Action::NavigateBack => {
                // A displayed session is never torn down by leaving the
                // picker; just return to it.
                if !self.machine.session().status.is_idle() {
                    self.screen = Screen::Viewer;
                }
            }
            _ => {}
        }
    }

    fn update_viewer(&mut self, action: Action) {
        match action {
            Action::MoveDown => {
                self.text_scroll = self.text_scroll.saturating_add(1).min(self.max_scroll());
            }
            Action::MoveUp => {
                self.text_scroll = self.text_scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.text_scroll = self
                    .text_scroll
                    .saturating_add(self.visible_text_rows)
                    .min(self.max_scroll());
            }
            Action::PageUp => {
                self.text_scroll = self.text_scroll.saturating_sub(self.visible_text_rows);
            }
            Action::GoTop => {
                self.text_scroll = 0;
            }
            Action::GoBottom => {
                self.text_scroll = self.max_scroll();
            }
            Action::ToggleTab => {
                self.view_tab = match self.view_tab {
                    ViewTab::Split => ViewTab::TextOnly,
                    ViewTab::TextOnly => ViewTab::Split,
                };
            }
            Action::NewUpload => {
                // Only offered once the session has resolved; the machine
                // ignores resets during Processing anyway.
                self.machine.handle(SessionEvent::Reset);
                if self.machine.session().status.is_idle() {
                    self.screen = Screen::FilePicker;
                    self.file_picker.refresh_entries();
                    self.text_scroll = 0;
                    self.view_tab = ViewTab::Split;
                }
            }
            _ => {}
        }
    }

    fn max_scroll(&self) -> u16 {
        let lines = self
            .machine
            .session()
            .extracted_text
            .as_deref()
            .map(|t| t.lines().count())
            .unwrap_or(0);
        (lines as u16).saturating_sub(self.visible_text_rows)
    }

    /// Read the file at `path` and submit it to the upload machine.
    ///
    /// This is the effect boundary between the filesystem and the machine:
    /// an unreadable file becomes a notice and never reaches the machine.
    pub fn submit_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = media_type_for_path(path);

        match std::fs::read(path) {
            Ok(bytes) => {
                let file = SubmittedFile::new(name, media_type, bytes);
                let effects = self.machine.handle(SessionEvent::Submit(file));
                self.run_effects(effects);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read file");
                self.show_notice(format!("Could not read {}: {}", name, e));
            }
        }
    }

    /// Execute effects returned by the machine.
    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartExtraction { file, generation } => {
                    self.screen = Screen::Viewer;
                    self.text_scroll = 0;
                    self.view_tab = ViewTab::Split;
                    if let Some(tx) = &self.backend_cmd_tx {
                        let _ = tx.send(BackendCommand::Extract { file, generation });
                    }
                }
                Effect::Notice(message) => self.show_notice(message),
            }
        }
    }

    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ExtractionResolved {
                generation,
                outcome,
            } => {
                let effects = self
                    .machine
                    .handle(SessionEvent::ExtractionResolved { generation, outcome });
                self.run_effects(effects);
            }
        }
    }
}
