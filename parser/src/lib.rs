//! This crate provides a middle-level abstraction for reading and writing
//! DICOM data sets: a stateful element-by-element codec built on top of
//! `dicom-encoding`'s primitive decoders and encoders, and a recursive
//! data set reader and writer built on top of that.
//!
//! For the time being, all APIs are based on synchronous I/O.
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

pub mod dataset;
pub mod error;
pub mod stateful;

pub use dataset::{read_data_set, write_data_set};
pub use error::{Error, Result};
pub use stateful::decode::StatefulDecoder;
pub use stateful::encode::StatefulEncoder;
