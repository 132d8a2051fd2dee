//! Global `tracing` subscriber setup.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use crate::error::{AppError, EXIT_INTERNAL};

/// `-q` wins over any number of `-v`.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install stderr logging, plus a plain-text file layer when `log_file` is set.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<(), AppError> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| AppError::io("create log file", path, e))?;
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_thread_ids(true);
            subscriber.with(file_layer).try_init()
        }
        None => subscriber.try_init(),
    };

    result.map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to install logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    fn unwritable_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("eqs.log");
        let err = setup_logging(0, false, Some(&path)).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }
}
