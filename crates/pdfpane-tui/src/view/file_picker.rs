use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::App;

/// Render the file picker screen (the drop-zone equivalent).
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let picker = &app.file_picker;
    let area = f.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // current dir
        Constraint::Min(5),    // file list
        Constraint::Length(1), // notice
        Constraint::Length(1), // footer
    ])
    .split(area);

    let header = Line::from(vec![
        Span::styled(" PDF Text Extractor ", theme.header_style()),
        Span::styled(
            " Select a PDF to extract and view its content",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    // Current directory
    let dir_line = Line::from(vec![
        Span::styled(" \u{1F4C1} ", Style::default().fg(theme.active)),
        Span::styled(
            picker.current_dir.display().to_string(),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(dir_line), chunks[1]);

    // File list with cursor-following scroll
    let visible_height = chunks[2].height.saturating_sub(2) as usize; // borders
    let scroll_offset = if picker.cursor >= visible_height && visible_height > 0 {
        picker.cursor - visible_height + 1
    } else {
        0
    };

    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height.max(1))
        .map(|(i, entry)| {
            let (icon, style) = if entry.is_dir {
                ("\u{1F4C1} ", Style::default().fg(theme.active))
            } else if entry.is_pdf {
                ("\u{1F4C4} ", Style::default().fg(theme.text))
            } else {
                ("   ", Style::default().fg(theme.dim))
            };
            let mut line_style = style;
            if i == picker.cursor {
                line_style = line_style.bg(theme.highlight_bg).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::raw(icon),
                Span::styled(entry.name.clone(), line_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(list, chunks[2]);

    // Transient notice (e.g. rejected file type)
    if let Some(message) = app.active_notice() {
        let notice = Line::from(Span::styled(
            format!(" ! {}", message),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(Paragraph::new(notice), chunks[3]);
    }

    let footer = Line::from(Span::styled(
        " \u{2191}\u{2193} navigate   Enter open/submit   Esc back   q quit",
        Style::default().fg(theme.footer_fg),
    ));
    f.render_widget(Paragraph::new(footer), chunks[4]);
}
