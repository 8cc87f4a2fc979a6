use clap::Parser;
use color_eyre::{Result, eyre::WrapErr};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;
use std::path::PathBuf;

use survivor::input::InputManager;
use survivor::{App, AudioManager, GameConfig, logging};

/// Survive the goblin horde in your terminal
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RON file overriding the default game settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible encounter
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable all sound
    #[arg(short, long)]
    mute: bool,

    /// Where log output is written
    #[arg(long, default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    logging::init(args.verbose, &args.log_file)
        .wrap_err_with(|| format!("cannot write log file {}", args.log_file.display()))?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.mute {
        config.audio.enabled = false;
    }
    let audio = AudioManager::from_config(&config.audio);

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    info!("keyboard enhancement supported: {supports_keyboard_enhancement}");

    // Setup terminal manually for full control
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if supports_keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let input = InputManager::new(supports_keyboard_enhancement);
    let result = App::new(config, args.seed, audio, input).run(&mut terminal);

    // Cleanup
    if supports_keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
