use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use super::*;
use crate::action::Action;
use crate::tui_event::{BackendCommand, BackendEvent};
use pdfpane_core::{SessionStatus, UNSUPPORTED_TYPE_MESSAGE};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Write a scratch file and return its path.
fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("pdfpane_app_test_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Create a minimal App wired to a command channel for inspection.
fn test_app() -> (App, tokio::sync::mpsc::UnboundedReceiver<BackendCommand>) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(Theme::hacker());
    app.backend_cmd_tx = Some(tx);
    (app, rx)
}

// ── Submitting a PDF moves to the viewer and issues one command ─────

#[test]
fn pdf_submission_opens_viewer_and_sends_extract_command() {
    let (mut app, mut rx) = test_app();
    let path = scratch_file("doc.pdf", b"%PDF-1.4 hello");

    app.submit_path(&path);

    assert_eq!(app.screen, Screen::Viewer);
    assert_eq!(app.machine.session().status, SessionStatus::Processing);
    assert_eq!(app.machine.live_previews(), 1);

    let cmd = rx.try_recv().expect("one extract command");
    let BackendCommand::Extract { file, generation } = cmd;
    assert_eq!(file.name, "doc.pdf");
    assert_eq!(generation, app.machine.generation());
    assert!(rx.try_recv().is_err());
}

// ── Non-PDF submission: notice, no preview, no command ──────────────

#[test]
fn txt_submission_stays_in_picker_with_notice() {
    let (mut app, mut rx) = test_app();
    let path = scratch_file("notes.txt", b"plain text");

    app.submit_path(&path);

    assert_eq!(app.screen, Screen::FilePicker);
    assert_eq!(app.machine.session().status, SessionStatus::Idle);
    assert_eq!(app.machine.live_previews(), 0);
    assert_eq!(app.active_notice(), Some(UNSUPPORTED_TYPE_MESSAGE));
    assert!(rx.try_recv().is_err());
}

// ── Backend resolution lands in Ready; reset returns to picker ──────

#[test]
fn resolution_then_new_upload_resets_to_picker() {
    let (mut app, _rx) = test_app();
    let path = scratch_file("doc.pdf", b"%PDF-1.4 hello");
    app.submit_path(&path);

    app.handle_backend_event(BackendEvent::ExtractionResolved {
        generation: app.machine.generation(),
        outcome: Ok("Hello World".to_string()),
    });
    assert_eq!(app.machine.session().status, SessionStatus::Ready);
    assert_eq!(
        app.machine.session().extracted_text.as_deref(),
        Some("Hello World")
    );

    app.update(Action::NewUpload);
    assert_eq!(app.screen, Screen::FilePicker);
    assert_eq!(app.machine.session().status, SessionStatus::Idle);
    assert_eq!(app.machine.live_previews(), 0);
}

// ── Stale resolution after resubmission is ignored ──────────────────

#[test]
fn stale_backend_event_is_ignored() {
    let (mut app, mut rx) = test_app();
    let first = scratch_file("first.pdf", b"%PDF-1.4 a");
    let second = scratch_file("second.pdf", b"%PDF-1.4 b");

    app.submit_path(&first);
    let BackendCommand::Extract {
        generation: first_gen,
        ..
    } = rx.try_recv().unwrap();

    app.submit_path(&second);
    assert_eq!(app.machine.live_previews(), 1);

    app.handle_backend_event(BackendEvent::ExtractionResolved {
        generation: first_gen,
        outcome: Ok("stale".to_string()),
    });
    assert_eq!(app.machine.session().status, SessionStatus::Processing);
    assert!(app.machine.session().extracted_text.is_none());
}

// ── Notices expire after their tick deadline ────────────────────────

#[test]
fn notice_expires_on_tick() {
    let (mut app, _rx) = test_app();
    app.show_notice("Please upload a PDF file".to_string());
    assert!(app.active_notice().is_some());

    for _ in 0..=NOTICE_TICKS {
        app.update(Action::Tick);
    }
    assert!(app.active_notice().is_none());
}

// ── Esc in the picker returns to a live session's viewer ────────────

#[test]
fn esc_in_picker_returns_to_live_viewer() {
    let (mut app, _rx) = test_app();
    let path = scratch_file("doc.pdf", b"%PDF-1.4 hello");
    app.submit_path(&path);
    app.handle_backend_event(BackendEvent::ExtractionResolved {
        generation: app.machine.generation(),
        outcome: Ok("text".to_string()),
    });

    // User browses for another file, then backs out.
    app.screen = Screen::FilePicker;
    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::Viewer);
    assert_eq!(app.machine.session().status, SessionStatus::Ready);
}

#[test]
fn esc_in_picker_with_idle_session_stays() {
    let (mut app, _rx) = test_app();
    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::FilePicker);
}

// ── Viewer scrolling clamps to the text length ──────────────────────

#[test]
fn viewer_scroll_clamps_to_text() {
    let (mut app, _rx) = test_app();
    let path = scratch_file("doc.pdf", b"%PDF-1.4 hello");
    app.submit_path(&path);

    let text = (0..50).map(|i| format!("line {}", i)).collect::<Vec<_>>();
    app.handle_backend_event(BackendEvent::ExtractionResolved {
        generation: app.machine.generation(),
        outcome: Ok(text.join("\n")),
    });
    app.visible_text_rows = 10;

    app.update(Action::GoBottom);
    assert_eq!(app.text_scroll, 40);
    app.update(Action::MoveDown);
    assert_eq!(app.text_scroll, 40);
    app.update(Action::GoTop);
    assert_eq!(app.text_scroll, 0);
    app.update(Action::MoveUp);
    assert_eq!(app.text_scroll, 0);
}

// ── Tab toggles between split and text-only views ───────────────────

#[test]
fn toggle_tab_switches_views() {
    let (mut app, _rx) = test_app();
    let path = scratch_file("doc.pdf", b"%PDF-1.4 hello");
    app.submit_path(&path);

    assert_eq!(app.view_tab, ViewTab::Split);
    app.update(Action::ToggleTab);
    assert_eq!(app.view_tab, ViewTab::TextOnly);
    app.update(Action::ToggleTab);
    assert_eq!(app.view_tab, ViewTab::Split);
}
