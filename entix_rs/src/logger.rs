//! Global logger of the demo game.

use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, SecondsFormat};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;

/// Engine crates which get their own level.
const ENGINE_TARGETS: [&str; 2] = ["entix_core", "entix_ecs"];

/// Levels of records written by the logger.
#[derive(Debug, Copy, Clone)]
pub struct Levels {
    /// Level of the game itself and of third party crates.
    pub game: LevelFilter,
    /// Level of engine crates, which trace every event and component registration.
    pub engine: LevelFilter,
}

impl Default for Levels {
    fn default() -> Self {
        let engine = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        Self {
            game: LevelFilter::Debug,
            engine,
        }
    }
}

/// Path of the log file of this run.
fn log_file() -> PathBuf {
    let timestamp = Local::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    PathBuf::from("logs").join(format!("logfile_{}.log", timestamp))
}

/// Initializes the global logger for the game.
///
/// The console gets short records, the log file of this run gets
/// records with time and thread.
///
/// # Errors
/// An error is returned if log file cannot be created
/// or if logger has already been initialized.
///
pub fn init(levels: Levels) -> Result<Handle, Box<dyn Error + Send + Sync + 'static>> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{h({l:<5})} {t} >> {m}{n}")))
        .build();
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d:<35} [{T}] {l:<5} {t} >> {m}{n}",
        )))
        .build(log_file())?;

    let engine = ENGINE_TARGETS
        .into_iter()
        .map(|target| Logger::builder().build(target, levels.engine));
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .loggers(engine)
        .build(
            Root::builder()
                .appenders(["stdout", "file"])
                .build(levels.game),
        )?;
    let handle = log4rs::init_config(config)?;
    Ok(handle)
}
