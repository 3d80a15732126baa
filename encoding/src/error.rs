//! Crate-level error types.
use dicom_core::error::CastValueError;
use dicom_core::Tag;
use snafu::{Backtrace, Snafu};
use std::borrow::Cow;
use std::fmt;
use std::io;

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// The main data type for errors in this crate.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Raised when the obtained data element tag was not the one expected.
    #[snafu(display("Unexpected DICOM tag {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },
    /// Raised when the obtained length is inconsistent.
    #[snafu(display("Inconsistent data value length in data element"))]
    UnexpectedDataValueLength { backtrace: Backtrace },
    /// Error related to a failed text encoding / decoding procedure.
    #[snafu(display("Failed text encoding/decoding: {}", source))]
    TextEncoding {
        source: TextEncodingError,
        backtrace: Backtrace,
    },
    /// A failed attempt to cast a value to an inappropriate format.
    #[snafu(display("Failed value cast: {}", source))]
    CastValue {
        source: CastValueError,
        backtrace: Backtrace,
    },
    /// Other I/O errors.
    #[snafu(display("I/O error: {}", source))]
    Io {
        source: io::Error,
        backtrace: Backtrace,
    },
}

/// An error type for text encoding issues.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEncodingError(Cow<'static, str>);

impl TextEncodingError {
    /// Build an error from a cause text, as provided by the
    /// `encoding` crate.
    pub fn new<E: Into<Cow<'static, str>>>(cause: E) -> Self {
        TextEncodingError(cause.into())
    }
}

impl fmt::Display for TextEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "encoding/decoding process failed: {}", self.0)
    }
}

impl ::std::error::Error for TextEncodingError {}
