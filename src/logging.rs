use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::File;
use std::path::Path;

pub const DEFAULT_LOG_FILE: &str = "survivor.log";

pub fn level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes the global logger, writing to `path` because the terminal
/// belongs to the game.
///
/// When `verbose` is `true`, all debug messages are written. Otherwise only
/// info level and above. `RUST_LOG` overrides both.
pub fn init(verbose: bool, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;

    let env = Env::default().default_filter_or(level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.target(Target::Pipe(Box::new(file)));

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
    Ok(())
}
