//! Standard DICOM dictionaries and constants.
//!
//! - [`data_element`]: the standard attribute dictionary (tag → VR → alias),
//!   trimmed to the subset this workspace's codec and DIMSE layer exercise.
//! - [`tags`]: tag constants for that same subset.
//! - [`uids`]: well-known SOP class and transfer syntax UID constants.

pub mod data_element;
pub mod tags;
pub mod uids;

pub use data_element::StandardDataDictionary;

#[cfg(test)]
mod tests {
    use dicom_core::Tag;

    #[test]
    fn tags_constants_available() {
        use crate::tags::*;
        assert_eq!(PATIENT_NAME, Tag(0x0010, 0x0010));
        assert_eq!(MODALITY, Tag(0x0008, 0x0060));
        assert_eq!(PIXEL_DATA, Tag(0x7FE0, 0x0010));
        assert_eq!(STATUS, Tag(0x0000, 0x0900));
    }

    #[test]
    fn uids_constants_available() {
        use crate::uids::*;
        assert_eq!(EXPLICIT_VR_LITTLE_ENDIAN, "1.2.840.10008.1.2.1");
        assert_eq!(VERIFICATION, "1.2.840.10008.1.1");
    }
}
