//! Expansion error types.

use std::io;
use std::path::PathBuf;

/// Fatal expansion error.
///
/// Malformed directives and unopenable include targets are never errors; they
/// are written through literally. Only failures of the streams themselves end
/// an expansion.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// Reading the source stream failed.
    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),
    /// Writing the destination stream failed.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
    /// Reading an included file failed part way through.
    #[error("in included file {}: {source}", path.display())]
    Include {
        /// Resolved path of the included file.
        path: PathBuf,
        #[source]
        source: Box<ExpandError>,
    },
}

impl ExpandError {
    /// Attach the included file to an error raised while expanding it.
    ///
    /// Write errors are returned unchanged since the destination is shared by
    /// every level.
    pub(crate) fn in_include(self, path: PathBuf) -> Self {
        match self {
            Self::Write(_) => self,
            other => Self::Include {
                path,
                source: Box::new(other),
            },
        }
    }
}
