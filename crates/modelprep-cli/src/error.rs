use modelprep::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by the `modelprep` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Anything raised by the preparation library itself.
    #[error(transparent)]
    Core(#[from] EngineError),

    /// Invalid merged settings (file, `--set`, or dedicated flags).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An input file that exists but could not be understood.
    #[error("Could not read '{}': {source}", path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
