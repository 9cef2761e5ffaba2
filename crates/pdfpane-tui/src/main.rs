use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;

mod action;
mod app;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;
use pdfpane_extract::{DEFAULT_ENDPOINT, ExtractClient};
use tui_event::{BackendCommand, BackendEvent};

/// pdfpane — upload a PDF to a local extraction service and view the
/// extracted text next to the original.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF file to submit on startup
    pdf_path: Option<PathBuf>,

    /// Base URL of the extraction service
    #[arg(long)]
    endpoint: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long, default_value = "hacker")]
    theme: String,
}

/// Route tracing to a file when PDFPANE_LOG is set; stderr would corrupt the
/// raw-mode terminal.
fn init_tracing() {
    if let Ok(path) = std::env::var("PDFPANE_LOG")
        && let Ok(file) = std::fs::File::create(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing();

    if let Some(ref path) = args.pdf_path {
        if !path.exists() {
            anyhow::bail!("file not found: {}", path.display());
        }
    }

    // Resolve endpoint from CLI flag > env var > default
    let endpoint = args
        .endpoint
        .or_else(|| std::env::var("PDFPANE_ENDPOINT").ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let theme = match args.theme.as_str() {
        "modern" => theme::Theme::modern(),
        _ => theme::Theme::hacker(),
    };

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events from launching the command
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(theme);

    // Backend task: awaits extraction requests so the UI keeps rendering.
    // Each request runs in its own task; a resubmission can be serviced
    // while an earlier request is still in flight, and the machine's
    // generation guard discards the stale resolution.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<BackendEvent>();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<BackendCommand>();
    app.backend_cmd_tx = Some(cmd_tx);

    let client = Arc::new(ExtractClient::new(endpoint));
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                BackendCommand::Extract { file, generation } => {
                    let client = Arc::clone(&client);
                    let tx = event_tx.clone();
                    tokio::spawn(async move {
                        let outcome = client
                            .extract_text(&file)
                            .await
                            .map_err(|e| e.to_string());
                        let _ = tx.send(BackendEvent::ExtractionResolved {
                            generation,
                            outcome,
                        });
                    });
                }
            }
        }
    });

    // Submit an initial file if one was given on the command line
    if let Some(ref path) = args.pdf_path {
        app.submit_path(path);
    }

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        app.update(input::map_event(&evt));
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
