use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use color_eyre::eyre::eyre;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tuinav::auth::ProcessOpener;
use tuinav::catalog::Catalog;
use tuinav::interaction::ViewMode;

mod app;
mod ui;
mod widgets;

use app::{Action, App};

/// Longest wait between redraws when no auth poll is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Browse a component catalog as a navigation tree and print the chosen item's href
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON catalog file
    #[arg(long, required_unless_present = "usage")]
    catalog: Option<PathBuf>,

    /// Item of the main collection to select on startup
    #[arg(long)]
    select: Option<String>,

    /// Initial view mode: story or docs
    #[arg(long, value_parser = parse_view_mode, default_value_t = ViewMode::Story)]
    view_mode: ViewMode,

    /// Command used to open authentication URLs (e.g., "firefox --new-window")
    #[arg(long)]
    auth_cmd: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Generate usage spec for this tool
    #[arg(long)]
    usage: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Handle --usage flag to output usage spec
    if args.usage {
        let mut cmd = Args::command();
        let bin_name = std::env::args()
            .next()
            .unwrap_or_else(|| "tuinav".to_string());
        let mut buf = Vec::new();
        clap_usage::generate(&mut cmd, bin_name, &mut buf);
        print!("{}", String::from_utf8_lossy(&buf));
        return Ok(());
    }

    if let Some(ref log_file) = args.log_file {
        init_tracing(log_file)?;
    }

    let catalog_path = args
        .catalog
        .clone()
        .ok_or_else(|| eyre!("Must specify --catalog. Use --help for usage information."))?;
    let catalog = load_catalog(&catalog_path)?;

    let opener = match args.auth_cmd {
        Some(ref cmd) => ProcessOpener::new(cmd.clone()),
        None => ProcessOpener::platform_default(),
    };
    let mut app = App::with_opener(catalog, Box::new(opener))
        .map_err(|e| eyre!("Failed to build sidebar: {}", e))?;
    app.router.view_mode = args.view_mode;

    if let Some(ref id) = args.select {
        let revealed = app
            .reveal(id)
            .map_err(|e| eyre!("Failed to select '{}': {}", id, e))?;
        if !revealed {
            return Err(eyre!(
                "No item '{}' in catalog '{}'",
                id,
                catalog_path.display()
            ));
        }
    }

    // Enable mouse capture before initializing the terminal
    crossterm::execute!(std::io::stderr(), crossterm::event::EnableMouseCapture)?;

    let mut terminal = ratatui::init();
    let result = run_event_loop(&mut terminal, &mut app, &catalog_path);

    // Restore terminal and disable mouse capture
    ratatui::restore();
    crossterm::execute!(std::io::stderr(), crossterm::event::DisableMouseCapture)?;

    match result {
        Ok(Some(href)) => {
            println!("{href}");
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(e),
    }
}

fn parse_view_mode(value: &str) -> Result<ViewMode, String> {
    value.parse().map_err(|e: tuinav::NavError| e.to_string())
}

/// Send tracing output to `path`. The terminal belongs to the UI.
fn init_tracing(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)
        .map_err(|e| eyre!("Failed to open log file '{}': {}", path.display(), e))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn load_catalog(path: &Path) -> color_eyre::Result<Catalog> {
    let catalog = Catalog::load(path)
        .map_err(|e| eyre!("Failed to load catalog '{}': {}", path.display(), e))?;
    info!(path = %path.display(), refs = catalog.refs.len(), "catalog loaded");
    Ok(catalog)
}

fn run_event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    catalog_path: &Path,
) -> color_eyre::Result<Option<String>> {
    use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Wake up in time for the next auth poll
        let now = Instant::now();
        let timeout = app
            .next_poll_due()
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        if !event::poll(timeout)? {
            app.tick(Instant::now())?;
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Global quit shortcut
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    return Ok(None);
                }

                app.handle_key(key)?
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse)?,
            Event::Resize(_, _) => {
                // Terminal will be redrawn on next loop iteration
                Action::None
            }
            _ => Action::None,
        };

        match action {
            Action::None => {}
            Action::Quit => return Ok(None),
            Action::Accept => {
                if let Some(href) = app.current_href() {
                    return Ok(Some(href));
                }
            }
            Action::Reload => match Catalog::load(catalog_path) {
                Ok(catalog) => app.replace_catalog(catalog)?,
                Err(e) => warn!(path = %catalog_path.display(), error = %e, "reload failed"),
            },
        }
        app.tick(Instant::now())?;
    }
}
