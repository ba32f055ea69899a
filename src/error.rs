use quick_xml::Error as XMLError;
use std::{str::Utf8Error, string::FromUtf8Error};

/// Wrapper around `std::Result`
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tree does not have the shape an operation requires.
    ///
    /// Raised when a second root is created, when `text()` or `set_text()` is
    /// called on an element whose children are not a single text node,
    /// or when `child()` matches more than one element.
    #[error("Invalid tree state: {0}")]
    StructuralState(String),
    /// The DOM input contains a node kind this model cannot represent,
    /// such as a processing instruction or a DOCTYPE.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
    /// Assorted errors while parsing XML.
    #[error("Malformed XML: {0}")]
    MalformedXML(String),
    /// Decoding related error.
    /// Maybe the XML declaration has an encoding value that it doesn't recognize,
    /// or it doesn't match its actual encoding.
    #[error("Cannot decode XML")]
    CannotDecode,
    /// [`std::io`] related error.
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// The external DOM serializer failed.
    #[error("Cannot write DOM: {0}")]
    DomWrite(#[from] xmltree::Error),
}

/// Broad classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Precondition on tree shape was violated.
    StructuralState,
    /// External DOM had a node kind with no counterpart in this model.
    UnsupportedInput,
    /// The parser or the external serializer failed.
    ConversionFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::StructuralState(_) => ErrorKind::StructuralState,
            Error::UnsupportedInput(_) => ErrorKind::UnsupportedInput,
            Error::MalformedXML(_) | Error::CannotDecode | Error::Io(_) | Error::DomWrite(_) => {
                ErrorKind::ConversionFailure
            }
        }
    }
}

impl From<XMLError> for Error {
    fn from(err: XMLError) -> Error {
        match err {
            XMLError::EndEventMismatch { expected, found } => Error::MalformedXML(format!(
                "Closing tag mismatch. Expected {}, found {}",
                expected, found,
            )),
            XMLError::Io(err) => Error::Io(err),
            XMLError::Utf8(_) => Error::CannotDecode,
            err => Error::MalformedXML(err.to_string()),
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
