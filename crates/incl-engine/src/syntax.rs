//! Directive syntax: `@include`, delimiter pairs and filename rules.

/// Byte that starts directive recognition.
pub const TRIGGER: u8 = b'@';

/// Keyword including the trigger byte.
pub(crate) const KEYWORD: &[u8] = b"@include";

/// Longest filename accepted between delimiters, in bytes.
pub const MAX_FILENAME_LEN: usize = 256;

/// Delimiter pair wrapping a filename.
///
/// ```text
/// "name"   'name'   <name>   (name)   [name]   {name}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    DoubleQuote,
    SingleQuote,
    Angle,
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    /// All six pairs, in table order.
    pub const ALL: [Self; 6] = [
        Self::DoubleQuote,
        Self::SingleQuote,
        Self::Angle,
        Self::Paren,
        Self::Bracket,
        Self::Brace,
    ];

    /// Look up the pair opened by `byte`.
    ///
    /// Returns `None` if `byte` is not one of the six openers.
    #[must_use]
    pub fn from_opener(byte: u8) -> Option<Self> {
        match byte {
            b'"' => Some(Self::DoubleQuote),
            b'\'' => Some(Self::SingleQuote),
            b'<' => Some(Self::Angle),
            b'(' => Some(Self::Paren),
            b'[' => Some(Self::Bracket),
            b'{' => Some(Self::Brace),
            _ => None,
        }
    }

    #[must_use]
    pub fn opener(self) -> u8 {
        match self {
            Self::DoubleQuote => b'"',
            Self::SingleQuote => b'\'',
            Self::Angle => b'<',
            Self::Paren => b'(',
            Self::Bracket => b'[',
            Self::Brace => b'{',
        }
    }

    #[must_use]
    pub fn closer(self) -> u8 {
        match self {
            Self::DoubleQuote => b'"',
            Self::SingleQuote => b'\'',
            Self::Angle => b'>',
            Self::Paren => b')',
            Self::Bracket => b']',
            Self::Brace => b'}',
        }
    }
}

/// Bytes below space end a filename without a closer.
pub(crate) fn is_control(byte: u8) -> bool {
    byte < b' '
}

/// Check whether a collected filename may be opened.
///
/// The first byte must be greater than space and must not be `.`, `/` or `\`.
/// Empty names and names longer than [`MAX_FILENAME_LEN`] are rejected.
#[must_use]
pub fn is_valid_filename(name: &[u8]) -> bool {
    if name.len() > MAX_FILENAME_LEN {
        return false;
    }
    match name.first() {
        Some(&first) => first > b' ' && !matches!(first, b'.' | b'/' | b'\\'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_opener_round_trips_to_its_pair() {
        for delimiter in Delimiter::ALL {
            assert_eq!(Delimiter::from_opener(delimiter.opener()), Some(delimiter));
        }
    }

    #[test]
    fn test_closers() {
        let pairs: Vec<(u8, u8)> = Delimiter::ALL
            .iter()
            .map(|d| (d.opener(), d.closer()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (b'"', b'"'),
                (b'\'', b'\''),
                (b'<', b'>'),
                (b'(', b')'),
                (b'[', b']'),
                (b'{', b'}'),
            ]
        );
    }

    #[test]
    fn test_unknown_openers() {
        for byte in [b'`', b'>', b')', b']', b'}', b' ', b'a', b'@'] {
            assert_eq!(Delimiter::from_opener(byte), None, "byte {byte:?}");
        }
    }

    #[test]
    fn test_valid_filenames() {
        assert!(is_valid_filename(b"b.txt"));
        assert!(is_valid_filename(b"dir/file"));
        assert!(is_valid_filename(b"x\\y"));
        assert!(is_valid_filename(b"a file with spaces"));
        assert!(is_valid_filename(&[0xC3, 0xA9]));
        assert!(is_valid_filename(&[b'a'; MAX_FILENAME_LEN]));
    }

    #[test]
    fn test_invalid_filenames() {
        assert!(!is_valid_filename(b""));
        assert!(!is_valid_filename(b".hidden"));
        assert!(!is_valid_filename(b"../escape"));
        assert!(!is_valid_filename(b"/etc/passwd"));
        assert!(!is_valid_filename(b"\\share"));
        assert!(!is_valid_filename(b" leading"));
        assert!(!is_valid_filename(&[b'a'; MAX_FILENAME_LEN + 1]));
    }

    #[test]
    fn test_control_bytes() {
        assert!(is_control(b'\n'));
        assert!(is_control(0));
        assert!(is_control(0x1F));
        assert!(!is_control(b' '));
        assert!(!is_control(0x80));
    }
}
