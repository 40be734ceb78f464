//! Error types for romreader-core
//!
//! Decoding never fails as a whole; a bad record line is reported as a
//! [`LineFormatError`] next to the image decoded from the good lines.

use core::fmt;

/// What was wrong with a record line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineErrorKind {
    /// Line does not begin with `:`
    MissingStartCode,
    /// Line ends before the header or payload is complete
    TooShort {
        /// Number of characters needed (including the start code)
        expected: usize,
        /// Number of characters present
        found: usize,
    },
    /// A character that should be a hex digit is not one
    InvalidHexDigit {
        /// Zero-based column of the offending character
        column: usize,
    },
    /// Extended linear address record without a 16-bit base in its payload
    MissingBaseAddress,
}

/// A record line that could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormatError {
    /// One-based line number in the transcript (0 when parsed standalone)
    pub line: usize,
    /// The failure
    pub kind: LineErrorKind,
}

impl LineFormatError {
    pub(crate) fn new(kind: LineErrorKind) -> Self {
        Self { line: 0, kind }
    }

    pub(crate) fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

impl fmt::Display for LineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartCode => write!(f, "missing ':' start code"),
            Self::TooShort { expected, found } => {
                write!(
                    f,
                    "record too short: expected {} characters, found {}",
                    expected, found
                )
            }
            Self::InvalidHexDigit { column } => {
                write!(f, "invalid hex digit at column {}", column)
            }
            Self::MissingBaseAddress => {
                write!(f, "extended linear address record has no base address")
            }
        }
    }
}

impl fmt::Display for LineFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LineFormatError {}
