use clap::Parser;
use scribe::core::config::{self, CliOverrides};
use scribe::core::process::ShellExecutor;
use scribe::core::state::App;
use scribe::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scribe", about = "Tabbed terminal text editor with a built-in command runner")]
struct Args {
    /// Files to open in tabs
    files: Vec<PathBuf>,

    /// Start without reopening the last session's files
    #[arg(long)]
    no_restore: bool,

    /// Starting directory for the terminal panel
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Log verbosity (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "debug")]
    log_level: String,
}

/// `~/.scribe/scribe.log`, or `scribe.log` in the current directory when
/// there is no home directory.
fn log_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => {
            let dir = home.join(".scribe");
            let _ = fs::create_dir_all(&dir);
            dir.join("scribe.log")
        }
        None => PathBuf::from("scribe.log"),
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = args.log_level.parse().unwrap_or(LevelFilter::Debug);
    if let Ok(log_file) = File::create(log_path()) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Config error, using defaults: {}", e);
            config::ScribeConfig::default()
        }
    };
    let cli = CliOverrides {
        no_restore: args.no_restore,
    };
    let resolved = config::resolve(&file_config, &cli);

    let launch_dir = match args.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    log::info!(
        "Scribe starting up (shell: {}, cwd: {}, restore: {})",
        resolved.shell,
        launch_dir.display(),
        resolved.restore_session
    );

    let app = App::from_config(&resolved, launch_dir);
    let executor = Arc::new(ShellExecutor::new(resolved.shell.clone()));
    let result = tui::run(app, args.files, executor);
    log::info!("Scribe shutting down");
    result
}
