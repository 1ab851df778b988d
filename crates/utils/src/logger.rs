use std::{
    fs::{OpenOptions, create_dir_all},
    path::Path,
};

use env_logger::{Builder, Target};
use log::LevelFilter;

#[derive(Debug)]
pub enum LoggerError {
    Io(std::io::Error),
    AlreadySet(log::SetLoggerError),
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(err) => write!(f, "failed to open log file: {err}"),
            LoggerError::AlreadySet(err) => write!(f, "logger already initialised: {err}"),
        }
    }
}

impl std::error::Error for LoggerError {}

pub fn parse_level(log_level: &str) -> Option<LevelFilter> {
    match log_level.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "off" => Some(LevelFilter::Off),
        _ => None,
    }
}

pub fn init_logger(log_level: &str, log_enabled: bool, log_file: &str) -> Result<(), LoggerError> {
    let level = parse_level(log_level).unwrap_or_else(|| {
        eprintln!("Invalid log level '{}', defaulting to 'info'", log_level);
        LevelFilter::Info
    });

    let mut builder = Builder::new();
    builder.filter_level(level).format_timestamp_secs();

    // only write to file if enabled
    if log_enabled {
        builder.target(Target::Pipe(Box::new(open_log_file(log_file)?)));
    }
    // else → default (stderr)

    builder.try_init().map_err(LoggerError::AlreadySet)
}

fn open_log_file(log_file: &str) -> Result<std::fs::File, LoggerError> {
    if let Some(parent) = Path::new(log_file).parent() {
        create_dir_all(parent).map_err(LoggerError::Io)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(LoggerError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(parse_level("INFO"), Some(LevelFilter::Info));
        assert_eq!(parse_level(" warn "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn creates_nested_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/switchyard.log");

        open_log_file(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
    }
}
