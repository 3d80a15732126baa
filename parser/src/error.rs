//! Crate-level error types.
use dicom_core::error::{CastValueError, Error as CoreError};
use dicom_core::Tag;
use dicom_encoding::decode::Error as DecodeError;
use dicom_encoding::encode::Error as EncodeError;
use dicom_encoding::text::{DecodeTextError, EncodeTextError};
use snafu::{Backtrace, Snafu};
use std::io;

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// The main data type for errors in this crate.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Raised on plain I/O failures while reading or writing a data element.
    #[snafu(display("I/O error: {}", source))]
    Io { source: io::Error, backtrace: Backtrace },

    /// Raised when decoding a data element or item header fails.
    #[snafu(display("could not decode a data element header: {}", source))]
    Decode {
        source: DecodeError,
        backtrace: Backtrace,
    },

    /// Raised when encoding a data element or item header fails.
    #[snafu(display("could not encode a data element header: {}", source))]
    Encode {
        source: EncodeError,
        backtrace: Backtrace,
    },

    /// Raised when an operation on a core DICOM type fails, such as
    /// classifying a sequence item header.
    #[snafu(display("{}", source))]
    Core {
        source: CoreError,
        backtrace: Backtrace,
    },

    /// Raised when text decoding fails for a string-like value.
    #[snafu(display("could not decode text: {}", source))]
    TextDecode {
        source: DecodeTextError,
        backtrace: Backtrace,
    },

    /// Raised when text encoding fails for a string-like value.
    #[snafu(display("could not encode text: {}", source))]
    TextEncode {
        source: EncodeTextError,
        backtrace: Backtrace,
    },

    /// Raised when an `IS` value could not be parsed as an integer.
    #[snafu(display("could not parse `{}` as an integer for tag {}", text, tag))]
    ParseInteger {
        text: String,
        tag: Tag,
        backtrace: Backtrace,
    },

    /// Raised when a `DS` value could not be parsed as a real number.
    #[snafu(display("could not parse `{}` as a real number for tag {}", text, tag))]
    ParseReal {
        text: String,
        tag: Tag,
        backtrace: Backtrace,
    },

    /// Raised when a value was expected to have a defined length, but did not.
    #[snafu(display("element {} has an undefined length where one was required", tag))]
    UndefinedValueLength { tag: Tag, backtrace: Backtrace },

    /// Raised while reading a data set and an element tag was found out of place,
    /// such as a sequence item header appearing where none was expected.
    #[snafu(display("unexpected element tag {} while reading data set", tag))]
    UnexpectedElement { tag: Tag, backtrace: Backtrace },

    /// Raised when encoding a value whose in-memory representation does not
    /// match the category its VR requires (e.g. a binary value given for an
    /// `IS` element).
    #[snafu(display("could not encode value for tag {}: {}", tag, source))]
    EncodeValue {
        tag: Tag,
        source: CastValueError,
        backtrace: Backtrace,
    },
}

impl Error {
    /// Whether this error represents a clean end of stream, reached while
    /// attempting to decode the next data element header at the top level
    /// of a data set.
    pub fn is_eof(&self) -> bool {
        match self {
            Error::Io { source, .. } => source.kind() == io::ErrorKind::UnexpectedEof,
            Error::Decode { source, .. } => decode_error_is_eof(source),
            _ => false,
        }
    }
}

fn decode_error_is_eof(e: &DecodeError) -> bool {
    use std::error::Error as _;
    e.source()
        .and_then(|s| s.downcast_ref::<io::Error>())
        .map(|e| e.kind() == io::ErrorKind::UnexpectedEof)
        .unwrap_or(false)
}
