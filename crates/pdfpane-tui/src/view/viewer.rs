use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use pdfpane_core::SessionStatus;

use crate::app::{App, ViewTab};
use crate::view::{format_size, spinner_char, truncate};

/// Render the viewer screen for the active session.
pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // notice / tab row
        Constraint::Min(5),    // panes
        Constraint::Length(1), // footer
    ])
    .split(area);

    app.visible_text_rows = chunks[2].height.saturating_sub(2).max(1);

    render_header(f, app, chunks[0]);
    render_status_row(f, app, chunks[1]);

    let session = app.machine.session();
    match session.status {
        SessionStatus::Ready if app.view_tab == ViewTab::TextOnly => {
            render_text_pane(f, app, chunks[2]);
        }
        _ => {
            let panes =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(chunks[2]);
            render_preview_pane(f, app, panes[0]);
            render_right_pane(f, app, panes[1]);
        }
    }

    render_footer(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = app.machine.session();
    let name = session.file_name.as_deref().unwrap_or("");
    let status_label = match session.status {
        SessionStatus::Idle => "idle",
        SessionStatus::Previewing => "previewing",
        SessionStatus::Processing => "processing",
        SessionStatus::Ready => "ready",
        SessionStatus::Failed => "failed",
    };

    let header = Line::from(vec![
        Span::styled(" PDF Text Extractor ", theme.header_style()),
        Span::styled(
            format!(" {} ", truncate(name, area.width.saturating_sub(30) as usize)),
            Style::default().fg(theme.text),
        ),
        Span::styled(
            format!("[{}]", status_label),
            Style::default().fg(theme.status_color(session.status)),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn render_status_row(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    // Transient notices take priority over the tab row.
    if let Some(message) = app.active_notice() {
        let notice = Line::from(Span::styled(
            format!(" ! {}", message),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(Paragraph::new(notice), area);
        return;
    }

    match app.machine.session().status {
        SessionStatus::Processing => {
            let line = Line::from(vec![
                Span::styled(
                    format!(" {} ", spinner_char(app.tick)),
                    Style::default().fg(theme.spinner),
                ),
                Span::styled("Processing PDF...", Style::default().fg(theme.text)),
            ]);
            f.render_widget(Paragraph::new(line), area);
        }
        SessionStatus::Ready => {
            let tab_style = |selected: bool| {
                if selected {
                    Style::default()
                        .fg(theme.header_fg)
                        .bg(theme.header_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.dim)
                }
            };
            let tabs = Line::from(vec![
                Span::styled(" Split View ", tab_style(app.view_tab == ViewTab::Split)),
                Span::raw(" "),
                Span::styled(" Text Only ", tab_style(app.view_tab == ViewTab::TextOnly)),
            ]);
            f.render_widget(Paragraph::new(tabs), area);
        }
        _ => {}
    }
}

/// Left pane: the locally rendered preview resource.
fn render_preview_pane(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(" PDF Preview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let mut lines = Vec::new();
    if let Some(bytes) = app.machine.preview_bytes() {
        let name = app
            .machine
            .session()
            .file_name
            .clone()
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            name,
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format_size(bytes.len()),
            Style::default().fg(theme.dim),
        )));
        // "%PDF-1.x" header line, when present
        if let Some(version) = pdf_version(&bytes) {
            lines.push(Line::from(Span::styled(
                format!("PDF {}", version),
                Style::default().fg(theme.dim),
            )));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Local preview (not transmitted)",
            Style::default().fg(theme.dim),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "No preview",
            Style::default().fg(theme.dim),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

/// Right pane: extracted text, an error card, or a processing placeholder.
fn render_right_pane(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = app.machine.session();

    match session.status {
        SessionStatus::Failed => {
            let block = Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error));
            let message = session.error_message.as_deref().unwrap_or("");
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    message,
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                )))
                .block(block)
                .alignment(Alignment::Center),
                area,
            );
        }
        SessionStatus::Ready => render_text_pane(f, app, area),
        _ => {
            let block = Block::default()
                .title(" Extracted Text ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border));
            let line = Line::from(vec![
                Span::styled(
                    format!("{} ", spinner_char(app.tick)),
                    Style::default().fg(theme.spinner),
                ),
                Span::styled("Processing PDF...", Style::default().fg(theme.dim)),
            ]);
            f.render_widget(
                Paragraph::new(line).block(block).alignment(Alignment::Center),
                area,
            );
        }
    }
}

fn render_text_pane(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let text = app
        .machine
        .session()
        .extracted_text
        .as_deref()
        .unwrap_or("");
    let block = Block::default()
        .title(" Extracted Text ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(theme.text))
            .scroll((app.text_scroll, 0))
            .block(block),
        area,
    );
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints = match app.machine.session().status {
        SessionStatus::Ready => " j/k scroll   Tab switch view   u upload new file   q quit",
        SessionStatus::Failed => " u upload new file   q quit",
        _ => " q quit",
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(theme.footer_fg),
        ))),
        area,
    );
}

/// Extract the version digits from a "%PDF-1.x" file header.
fn pdf_version(bytes: &[u8]) -> Option<String> {
    let header = bytes.get(..8)?;
    let header = std::str::from_utf8(header).ok()?;
    header.strip_prefix("%PDF-").map(|v| v.to_string())
}
