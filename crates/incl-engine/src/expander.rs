//! The `@include` expander.
//!
//! Scans a source one byte at a time, writing everything through to the
//! destination except well-formed directives naming a file that can be opened.
//! Those are replaced by the recursively expanded file contents.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::ExpandError;
use crate::state::{Pending, State};
use crate::syntax::{Delimiter, TRIGGER, is_control, is_valid_filename};

/// Type alias for the file opening callback function.
pub type OpenFileFn = dyn Fn(&Path) -> io::Result<Box<dyn Read>> + Send;

/// Configuration for the expander.
pub struct ExpanderConfig {
    /// Directory include names are resolved against.
    ///
    /// Default: `.` (the process working directory)
    pub base_dir: PathBuf,
    /// Callback to open an included file for reading.
    ///
    /// Default: open the file with a buffered reader
    pub open_file: Option<Box<OpenFileFn>>,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpanderConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            open_file: None,
        }
    }

    /// Set the directory include names are resolved against.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Set the file opening callback.
    #[must_use]
    pub fn with_open_file<F>(mut self, open_file: F) -> Self
    where
        F: Fn(&Path) -> io::Result<Box<dyn Read>> + Send + 'static,
    {
        self.open_file = Some(Box::new(open_file));
        self
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        match &self.open_file {
            Some(open_file) => open_file(path),
            None => default_open_file(path),
        }
    }
}

/// Default file opening function.
fn default_open_file(path: &Path) -> io::Result<Box<dyn Read>> {
    Ok(Box::new(BufReader::new(File::open(path)?)))
}

/// Files touched by one expansion.
///
/// Purely informational: the expanded output is the same whether or not the
/// caller looks at it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpandReport {
    /// Resolved paths of included files, in the order they were opened.
    pub included: Vec<PathBuf>,
    /// Resolved paths of well-formed directives whose file could not be opened.
    /// Those directives were written through literally.
    pub unresolved: Vec<PathBuf>,
}

impl ExpandReport {
    /// True if every well-formed directive was replaced.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Streaming `@include` expander.
///
/// # Example
///
/// ```
/// use std::io::{self, Read};
/// use incl_engine::{Expander, ExpanderConfig};
///
/// let config = ExpanderConfig::new().with_open_file(|_path| {
///     Ok(Box::new(io::Cursor::new(b"world".to_vec())) as Box<dyn Read>)
/// });
/// let expander = Expander::with_config(config);
///
/// let mut output: Vec<u8> = Vec::new();
/// let report = expander
///     .expand(&b"hello @include \"name.txt\"!"[..], &mut output)
///     .unwrap();
///
/// assert_eq!(output, b"hello world!");
/// assert_eq!(report.included.len(), 1);
/// ```
pub struct Expander {
    config: ExpanderConfig,
}

impl Default for Expander {
    fn default() -> Self {
        Self::new()
    }
}

impl Expander {
    /// Create an expander resolving includes against the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExpanderConfig::default())
    }

    /// Create an expander with custom configuration.
    #[must_use]
    pub fn with_config(config: ExpanderConfig) -> Self {
        Self { config }
    }

    /// Expand `source` into `destination` until `source` is exhausted.
    ///
    /// Included files are expanded recursively into the same destination. There
    /// is no limit on nesting depth and no cycle detection.
    pub fn expand<R, W>(
        &self,
        source: R,
        destination: &mut W,
    ) -> Result<ExpandReport, ExpandError>
    where
        R: Read,
        W: Write + ?Sized,
    {
        let mut report = ExpandReport::default();
        self.expand_source(source, destination, &mut report)?;
        Ok(report)
    }

    /// Expand an in-memory input.
    pub fn expand_to_vec(&self, input: &[u8]) -> Result<Vec<u8>, ExpandError> {
        let mut output = Vec::with_capacity(input.len());
        self.expand(input, &mut output)?;
        Ok(output)
    }

    fn expand_source<R, W>(
        &self,
        source: R,
        destination: &mut W,
        report: &mut ExpandReport,
    ) -> Result<(), ExpandError>
    where
        R: Read,
        W: Write + ?Sized,
    {
        let mut input = source.bytes();
        let mut pending = Pending::default();
        let mut state = State::Scanning;

        loop {
            let byte = input.next().transpose().map_err(ExpandError::Read)?;

            state = match (state, byte) {
                (State::Scanning, Some(TRIGGER)) => {
                    pending.start();
                    State::SawTrigger
                }
                (State::Scanning, Some(b)) => {
                    emit(destination, &[b])?;
                    State::Scanning
                }
                (State::Scanning, None) => State::Scanning,

                (State::SawTrigger, Some(TRIGGER)) => {
                    emit(destination, &[TRIGGER, TRIGGER])?;
                    State::Scanning
                }
                (State::SawTrigger, Some(b)) if pending.expects(b) => {
                    pending.push(b);
                    State::MatchingKeyword
                }
                (State::SawTrigger, Some(b)) => {
                    emit(destination, &[TRIGGER, b])?;
                    State::Scanning
                }
                (State::SawTrigger, None) => {
                    emit(destination, &[TRIGGER])?;
                    State::Scanning
                }

                (State::MatchingKeyword, Some(b)) if pending.expects(b) => {
                    pending.push(b);
                    pending.keyword_state()
                }
                (State::MatchingKeyword, stop) => {
                    fall_back(destination, &pending, stop)?;
                    State::Scanning
                }

                (State::AwaitingOpener { spaced: false }, Some(b' ')) => {
                    pending.push(b' ');
                    State::AwaitingOpener { spaced: true }
                }
                (State::AwaitingOpener { .. }, Some(b)) => {
                    if let Some(delimiter) = Delimiter::from_opener(b) {
                        pending.open(delimiter);
                        State::ReadingFilename(delimiter)
                    } else {
                        fall_back(destination, &pending, Some(b))?;
                        State::Scanning
                    }
                }
                (State::AwaitingOpener { .. }, None) => {
                    fall_back(destination, &pending, None)?;
                    State::Scanning
                }

                (State::ReadingFilename(delimiter), Some(b)) if b == delimiter.closer() => {
                    self.include(&pending, b, destination, report)?;
                    State::Scanning
                }
                (State::ReadingFilename(_), Some(b)) if is_control(b) => {
                    fall_back(destination, &pending, Some(b))?;
                    State::Scanning
                }
                (State::ReadingFilename(delimiter), Some(b)) => {
                    pending.push(b);
                    if pending.filename_overflowed() {
                        fall_back(destination, &pending, None)?;
                        State::Scanning
                    } else {
                        State::ReadingFilename(delimiter)
                    }
                }
                (State::ReadingFilename(_), None) => {
                    fall_back(destination, &pending, None)?;
                    State::Scanning
                }
            };

            if byte.is_none() {
                return Ok(());
            }
        }
    }

    /// Handle a directive whose closer has just been read.
    ///
    /// Replaces it with the expanded file when the name is valid and the file
    /// opens, otherwise writes it through literally, closer included.
    fn include<W>(
        &self,
        pending: &Pending,
        closer: u8,
        destination: &mut W,
        report: &mut ExpandReport,
    ) -> Result<(), ExpandError>
    where
        W: Write + ?Sized,
    {
        let name = pending.filename();
        if is_valid_filename(name)
            && let Some(name) = filename_to_path(name)
        {
            let path = self.config.base_dir.join(name);
            match self.config.open(&path) {
                Ok(reader) => {
                    tracing::debug!(path = %path.display(), "Including file");
                    report.included.push(path.clone());
                    // The reader is dropped when this call returns, on every path.
                    return self
                        .expand_source(reader, destination, report)
                        .map_err(|e| e.in_include(path));
                }
                Err(e) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "Failed to open include, writing directive through"
                    );
                    report.unresolved.push(path);
                }
            }
        }
        fall_back(destination, pending, Some(closer))
    }
}

/// Write the bytes of a failed attempt, then the byte that stopped it.
fn fall_back<W>(
    destination: &mut W,
    pending: &Pending,
    stop: Option<u8>,
) -> Result<(), ExpandError>
where
    W: Write + ?Sized,
{
    tracing::trace!(consumed = pending.as_bytes().len(), "Directive not recognized");
    emit(destination, pending.as_bytes())?;
    if let Some(b) = stop {
        emit(destination, &[b])?;
    }
    Ok(())
}

fn emit<W>(destination: &mut W, bytes: &[u8]) -> Result<(), ExpandError>
where
    W: Write + ?Sized,
{
    destination.write_all(bytes).map_err(ExpandError::Write)
}

/// Filenames are raw bytes; Unix paths can hold them as-is.
#[cfg(unix)]
#[allow(clippy::unnecessary_wraps)]
fn filename_to_path(name: &[u8]) -> Option<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    Some(PathBuf::from(OsStr::from_bytes(name)))
}

/// Non-UTF-8 names cannot be represented and are treated as unopenable.
#[cfg(not(unix))]
fn filename_to_path(name: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(name).ok().map(PathBuf::from)
}
