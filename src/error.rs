use quick_xml::Error as XMLError;
use std::fmt;
use std::{str::Utf8Error, string::FromUtf8Error};

/// Wrapper around `std::Result`
pub type Result<T> = std::result::Result<T, Error>;

/// Line and column (both 1-based, column counted in bytes) of the event
/// that caused an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Locate a byte offset inside `text`.
    pub fn locate(text: &str, offset: usize) -> Position {
        let bytes = &text.as_bytes()[..offset.min(text.len())];
        let line_start = bytes
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |i| i + 1);
        Position {
            line: bytes.iter().filter(|b| **b == b'\n').count() + 1,
            column: bytes.len() - line_start + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Error types
#[derive(Debug)]
pub enum Error {
    /// [`std::io`] related error.
    Io(std::io::Error),
    /// Decoding related error.
    /// The input is not valid in the encoding announced by its BOM or
    /// XML declaration, or the declared encoding is unknown.
    CannotDecode,
    /// The tokenizer rejected the input, or the input has content
    /// outside of the root element.
    MalformedInput {
        message: String,
        position: Option<Position>,
    },
    /// An element mixes non-whitespace text with child elements.
    /// Such elements cannot be rendered without changing the document.
    UnsupportedShape {
        element: String,
        text: String,
        position: Option<Position>,
    },
    /// Start and end lines do not nest.
    ///
    /// `expected` is the element left open (if any), `found` the end tag
    /// that arrived (if any).
    StructuralMismatch {
        expected: Option<String>,
        found: Option<String>,
        position: Option<Position>,
    },
}

impl Error {
    pub(crate) fn malformed<S: Into<String>>(message: S) -> Error {
        Error::MalformedInput {
            message: message.into(),
            position: None,
        }
    }

    pub(crate) fn mismatch(expected: Option<&str>, found: Option<&str>) -> Error {
        Error::StructuralMismatch {
            expected: expected.map(str::to_owned),
            found: found.map(str::to_owned),
            position: None,
        }
    }

    /// Where in the input the error was detected, if known.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::MalformedInput { position, .. }
            | Error::UnsupportedShape { position, .. }
            | Error::StructuralMismatch { position, .. } => *position,
            _ => None,
        }
    }

    /// Attach `at` unless the error already carries a position.
    pub(crate) fn at(mut self, at: Position) -> Error {
        match &mut self {
            Error::MalformedInput { position, .. }
            | Error::UnsupportedShape { position, .. }
            | Error::StructuralMismatch { position, .. } => {
                position.get_or_insert(at);
            }
            _ => {}
        }
        self
    }
}

fn write_position(f: &mut fmt::Formatter<'_>, position: &Option<Position>) -> fmt::Result {
    match position {
        Some(position) => write!(f, " (at {})", position),
        None => Ok(()),
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO Error: {}", err),
            Error::CannotDecode => write!(f, "Cannot decode XML"),
            Error::MalformedInput { message, position } => {
                write!(f, "Malformed XML: {}", message)?;
                write_position(f, position)
            }
            Error::UnsupportedShape {
                element,
                text,
                position,
            } => {
                write!(
                    f,
                    "Unsupported mixed content in <{}>: text {:?} next to child elements",
                    element,
                    text.trim()
                )?;
                write_position(f, position)
            }
            Error::StructuralMismatch {
                expected,
                found,
                position,
            } => {
                match (expected, found) {
                    (Some(expected), Some(found)) => write!(
                        f,
                        "Closing tag mismatch. Expected </{}>, found </{}>",
                        expected, found
                    )?,
                    (Some(expected), None) => {
                        write!(f, "Element <{}> is never closed", expected)?
                    }
                    (None, Some(found)) => {
                        write!(f, "Closing tag </{}> has no open element", found)?
                    }
                    (None, None) => write!(f, "Unbalanced element nesting")?,
                }
                write_position(f, position)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<XMLError> for Error {
    fn from(err: XMLError) -> Error {
        match err {
            XMLError::EndEventMismatch { expected, found } => Error::malformed(format!(
                "Closing tag mismatch. Expected {}, found {}",
                expected, found,
            )),
            XMLError::Io(err) => Error::Io(err),
            XMLError::Utf8(_) => Error::CannotDecode,
            err => Error::malformed(err.to_string()),
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_: FromUtf8Error) -> Error {
        Error::CannotDecode
    }
}

impl From<Utf8Error> for Error {
    fn from(_: Utf8Error) -> Error {
        Error::CannotDecode
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
