//! CLI error types.

use std::path::PathBuf;

use incl_config::ConfigError;
use incl_engine::ExpandError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Expand(#[from] ExpandError),

    #[error("{0}")]
    Validation(String),
}
