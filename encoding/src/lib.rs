#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
#![allow(clippy::derive_partial_eq_without_eq)]
//! DICOM encoding and decoding primitives.
//!
//! This crate provides interfaces and data structures for reading and writing
//! the binary framing of DICOM data elements in accordance to the DICOM
//! standard, for each of the base transfer syntaxes (implicit/explicit VR,
//! little/big endian). It also provides character set codecs for the
//! string-based value representations.
//!
//! For the time being, all APIs are based on synchronous I/O.

pub mod decode;
pub mod encode;
pub mod error;
pub mod text;

pub use byteordered::Endianness;
pub use decode::Decode;
pub use encode::Encode;
pub use error::Error;
