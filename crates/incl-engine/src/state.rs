//! Recognition state and the pending-bytes accumulator.

use crate::syntax::{Delimiter, KEYWORD, MAX_FILENAME_LEN, TRIGGER};

/// Position of the scanner within a directive attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Copying bytes through until the next trigger.
    Scanning,
    /// A single `@` has been consumed.
    SawTrigger,
    /// `@i` consumed, comparing the remaining keyword bytes.
    MatchingKeyword,
    /// Keyword complete. `spaced` is set once the optional space is taken.
    AwaitingOpener { spaced: bool },
    /// Opener consumed, collecting filename bytes until the closer.
    ReadingFilename(Delimiter),
}

/// Bytes consumed by the current directive attempt, in read order.
///
/// Everything the scanner takes from the source while inside an attempt lands
/// here, so a failed attempt is undone by writing [`Pending::as_bytes`] followed
/// by the byte that stopped it.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    bytes: Vec<u8>,
    filename_start: Option<usize>,
}

impl Pending {
    /// Begin a new attempt with the trigger byte.
    pub(crate) fn start(&mut self) {
        self.bytes.clear();
        self.filename_start = None;
        self.bytes.push(TRIGGER);
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Whether `byte` is the next keyword byte. Only meaningful while matching.
    pub(crate) fn expects(&self, byte: u8) -> bool {
        KEYWORD.get(self.bytes.len()) == Some(&byte)
    }

    /// State after a keyword byte has been pushed.
    pub(crate) fn keyword_state(&self) -> State {
        if self.bytes.len() == KEYWORD.len() {
            State::AwaitingOpener { spaced: false }
        } else {
            State::MatchingKeyword
        }
    }

    /// Record the opener; subsequent pushes are filename bytes.
    pub(crate) fn open(&mut self, delimiter: Delimiter) {
        self.bytes.push(delimiter.opener());
        self.filename_start = Some(self.bytes.len());
    }

    pub(crate) fn filename(&self) -> &[u8] {
        match self.filename_start {
            Some(start) => &self.bytes[start..],
            None => &[],
        }
    }

    pub(crate) fn filename_overflowed(&self) -> bool {
        self.filename().len() > MAX_FILENAME_LEN
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
