//! File-level reading and writing of DICOM data sets.
//!
//! A DICOM file is a 128-byte preamble, the literal `DICM` magic code, a
//! file meta information group (always Explicit VR Little Endian), and a
//! body whose encoding is named by the meta-info's Transfer Syntax UID
//! (0002,0010). The [`file`] module implements that format; [`meta`]
//! implements the meta-info group specifically.

pub mod file;
pub mod meta;

pub use file::{open_file, read_file, read_file_bytes, write_file, Error, FileDataSets, Result};
