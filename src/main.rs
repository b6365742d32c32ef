use clap::Parser;
use std::path::PathBuf;
use track_edit::config::RcLoader;
use track_edit::controller::SessionController;
use track_edit::document_model::Document;
use track_edit::logging;
use track_edit::view::theme::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use tracing::{info, warn};

/// Text editor that shows edits in place: additions in green, deletions
/// struck through, bracketed text in grey.
#[derive(Parser, Debug)]
#[command(name = "track-edit", version, about)]
struct Args {
    /// Initial document content (kept in memory only)
    #[arg(long, default_value = "")]
    text: String,

    /// Start with track changes enabled
    #[arg(long)]
    track: bool,

    /// Start in light mode
    #[arg(long)]
    light: bool,

    /// Font size reported to the display
    #[arg(long)]
    font_size: Option<u16>,

    /// Read settings from this rc file instead of .trackeditrc
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file, or a directory for it
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let _log_guard = match logging::init(args.log_file.clone()) {
        Ok(guard) => {
            info!(log_file = %guard.log_file.display(), "logging initialized");
            Some(guard)
        }
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        }
    };

    // Load RC configuration, command line flags win
    let mut config = RcLoader::load_config(args.config.as_deref());
    if args.track {
        config.track_changes = true;
    }
    if args.light {
        config.dark_mode = false;
    }
    if let Some(size) = args.font_size {
        config.font_size = size;
    }
    if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&config.font_size) {
        warn!(font_size = config.font_size, "font size out of range, clamping");
    }
    info!(?config, "starting");

    let mut session = SessionController::new(Document::from_text(&args.text), &config);
    session.run()
}
