use std::path::Path;

// Re-export logging functions for convenience.
pub use log::*;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("unable to create log file: {0}")]
    File(#[from] std::io::Error),
    #[error("invalid logging configuration: {0}")]
    Config(String),
    #[error("a logger is already installed")]
    AlreadyInitialized(#[from] SetLoggerError),
}

/// Initializes logging to the console and to a file inside of `dir` named after the current
/// time. Should be called before any other logging functions. Provided `LevelFilter` will
/// remove all logs below the provided level.
pub fn init(filter: LevelFilter, dir: impl AsRef<Path>) -> Result<(), InitError> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("[{l}] {t} - {m}{n}")))
        .build();

    let now = chrono::Local::now();
    let path = dir
        .as_ref()
        .join(format!("{}.txt", now.format("%Y-%m-%d %H-%M-%S")));
    let log_file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} [{l}] {t} - {m}{n}")))
        .build(path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("log_file", Box::new(log_file)))
        .logger(
            Logger::builder()
                .appender("log_file")
                .additive(false)
                .build("app::log_file", filter),
        )
        .build(
            Root::builder()
                .appender("log_file")
                .appender("stdout")
                .build(filter),
        )
        .map_err(|err| InitError::Config(err.to_string()))?;

    log4rs::init_config(config)?;
    log_panics::init();

    Ok(())
}
