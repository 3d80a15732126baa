//! Prelude module.
//!
//! Import all symbols within for convenient usage of this library.
//!
//! ```ignore
//! use dicom_core::prelude::*;
//! ```

pub use crate::dictionary::DataDictionary as _;
pub use crate::header::{HasLength as _, Header as _};
pub use crate::{DataSet, Element, Tag, Value, VR};
