use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Programming-time problems raised by the field dispatcher.
///
/// These never reach the user; the dispatcher logs them and yields no update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("field '{0}' is not implemented")]
    UnknownField(String),

    #[error("field '{field}' expects {expected}")]
    PayloadMismatch {
        field: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config must list at least one country")]
    NoCountries,

    #[error("country '{0}' is listed more than once")]
    DuplicateCountry(String),
}

/// Failures that stop the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
