#![crate_type = "lib"]
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

//! Core data model for DICOM compliant systems: tags, value
//! representations, the element value model, and data sets.

pub mod dictionary;
pub mod error;
pub mod header;
pub mod value;
pub mod prelude;

pub use dictionary::DataDictionary;
pub use error::{Error, Result};
pub use header::{Header, HasLength, Length, Tag, VR};
pub use value::{DataSet, Element, Value};
