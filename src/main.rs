use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
};

use costory::app::{App, ShortcutCapture};
use costory::client::StoryClient;
use costory::config::load_config;
use costory::error::CostoryError;
use costory::story::read_story_file;
use costory::worker::spawn_worker;

/// How long to wait for input before polling the worker again
const FRAME_TIMEOUT: Duration = Duration::from_millis(50);

/// Write stories with streaming AI suggestions and export them to PDF
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Story file to open
    file: Option<PathBuf>,

    /// Config file (default: <config dir>/costory/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Story service base URL
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Directory exported PDFs are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[cfg(debug_assertions)]
fn init_logging() {
    let path = std::env::temp_dir().join("costory.log");
    let Ok(file) = std::fs::File::create(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    log::debug!("Logging to {}", path.display());
}

fn main() -> Result<()> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    #[cfg(debug_assertions)]
    init_logging();

    let app = prepare(Args::parse())?;

    // Initialize terminal (handles raw mode, alternate screen, etc.)
    let terminal = ratatui::init();
    let capture = ShortcutCapture::begin();
    let _ = execute!(std::io::stdout(), EnableBracketedPaste);

    let result = run(terminal, app);

    let _ = execute!(std::io::stdout(), DisableBracketedPaste);
    drop(capture);
    ratatui::restore();

    result
}

/// Load config and story and start the worker, before the terminal is touched
fn prepare(args: Args) -> Result<App, CostoryError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(server) = args.server {
        config.server.base_url = server;
    }
    if let Some(dir) = args.output_dir {
        config.export.output_dir = dir;
    }

    let story = match &args.file {
        Some(path) => read_story_file(path)?,
        None => String::new(),
    };

    let worker = spawn_worker(StoryClient::new(config.server.base_url.clone()))?;
    Ok(App::new(&story, config.export, Some(worker)))
}

fn run(mut terminal: DefaultTerminal, mut app: App) -> Result<()> {
    loop {
        app.poll_worker();

        terminal.draw(|frame| app.render(frame))?;

        app.handle_events(FRAME_TIMEOUT)?;

        if app.should_quit() {
            break;
        }
    }

    // Dropping the app drops the worker handle, cancelling open streams
    Ok(())
}
