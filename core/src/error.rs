//! Error types shared across the core data model.
use crate::header::{Length, Tag};
use crate::value::ValueType;
use snafu::{Backtrace, Snafu};

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The main error type for the core data model.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// element tag {tag} did not carry the value category requested
    #[snafu(display("requested {requested} but value of tag {tag} is {got:?}"))]
    TypeMismatch {
        /// the category that was requested
        requested: &'static str,
        /// the tag of the offending element
        tag: Tag,
        /// the value's actual category
        got: ValueType,
        backtrace: Backtrace,
    },
    /// the item/sequence framing length is inconsistent with the data read
    #[snafu(display("unexpected data value length {len:?}"))]
    UnexpectedDataValueLength { len: Length, backtrace: Backtrace },
    /// a tag was read where a sentinel (item/delimiter) tag was expected
    #[snafu(display("unexpected element tag {tag}, expected a sequence sentinel"))]
    UnexpectedElement { tag: Tag, backtrace: Backtrace },
}

/// An error representing an invalid attempt to access a value
/// under an incompatible category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(display("requested {requested} but value is {got:?}"))]
pub struct CastValueError {
    /// the value category requested by the caller
    pub requested: &'static str,
    /// the value's actual category
    pub got: ValueType,
}
