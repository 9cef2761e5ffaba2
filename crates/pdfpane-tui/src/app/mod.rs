mod update;

use std::path::PathBuf;

use tokio::sync::mpsc;

use pdfpane_core::UploadMachine;

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// How long a transient notice stays on screen, in ticks (100ms each).
const NOTICE_TICKS: usize = 40;

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Drop-zone equivalent: pick a file to submit.
    FilePicker,
    /// Preview + extracted text for the active session.
    Viewer,
}

/// Tab selection on the viewer screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTab {
    Split,
    TextOnly,
}

/// A transient message with a tick-based expiry.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub expires_at_tick: usize,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_pdf: bool,
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
}

impl FilePickerState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut state = Self {
            current_dir,
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        // Parent directory entry
        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                is_pdf: false,
            });
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in read_dir.flatten() {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();

                // Skip hidden files/dirs
                if name.starts_with('.') {
                    continue;
                }

                if path.is_dir() {
                    dirs.push(FileEntry {
                        name,
                        path,
                        is_dir: true,
                        is_pdf: false,
                    });
                } else {
                    let is_pdf = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.eq_ignore_ascii_case("pdf"))
                        .unwrap_or(false);
                    files.push(FileEntry {
                        name,
                        path,
                        is_dir: false,
                        is_pdf,
                    });
                }
            }

            dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            entries.extend(dirs);
            entries.extend(files);
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }
}

impl Default for FilePickerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application state. Everything rendered derives from the upload
/// machine's session plus picker/scroll chrome.
pub struct App {
    pub machine: UploadMachine,
    pub screen: Screen,
    pub file_picker: FilePickerState,
    pub view_tab: ViewTab,
    /// Scroll offset for the extracted-text pane.
    pub text_scroll: u16,
    pub notice: Option<Notice>,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    /// Visible height of the text pane (set on render, used for paging).
    pub visible_text_rows: u16,
    /// Channel to send commands to the backend task.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            machine: UploadMachine::new(),
            screen: Screen::FilePicker,
            file_picker: FilePickerState::new(),
            view_tab: ViewTab::Split,
            text_scroll: 0,
            notice: None,
            tick: 0,
            theme,
            should_quit: false,
            visible_text_rows: 20,
            backend_cmd_tx: None,
        }
    }

    /// Show a transient message (expires after a few seconds of ticks).
    pub fn show_notice(&mut self, message: String) {
        self.notice = Some(Notice {
            message,
            expires_at_tick: self.tick + NOTICE_TICKS,
        });
    }

    pub fn active_notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.message.as_str())
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        match self.screen {
            Screen::FilePicker => crate::view::file_picker::render(f, self),
            Screen::Viewer => crate::view::viewer::render(f, self),
        }
    }
}

#[cfg(test)]
mod tests;
