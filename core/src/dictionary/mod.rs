//! The concept of a DICOM data dictionary: a static mapping from tag to
//! default VR and keyword. Concrete instances (standard, private) are
//! supplied by collaborator crates (see `dicom-dictionary-std`); this
//! module defines only the trait surface and the `asVR`/`findVR`
//! resolution functions built on top of it.

pub mod uid;

use crate::header::{Tag, VR};
use crate::value::DataSet;
use std::fmt::Debug;

/// Type trait for a dictionary of DICOM attributes. Dictionaries provide
/// the means to convert a tag to an alias and vice versa, as well as a
/// default VR for the tag.
pub trait DataDictionary: Debug {
    /// The type of the dictionary entry.
    type Entry: DictionaryEntry;

    /// Fetch an entry by its usual alias (e.g. "PatientName").
    fn by_name(&self, name: &str) -> Option<&Self::Entry>;

    /// Fetch an entry by its tag.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;
}

/// A dictionary entry, representing one known DICOM attribute.
pub trait DictionaryEntry {
    /// The attribute tag.
    fn tag(&self) -> Tag;
    /// The alias of the attribute, usually in UpperCamelCase.
    fn alias(&self) -> &str;
    /// The attribute's typical value representation.
    fn vr(&self) -> VR;
}

/// A borrowed-data dictionary entry.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntryRef<'a> {
    /// The attribute tag
    pub tag: Tag,
    /// The alias of the attribute
    pub alias: &'a str,
    /// The attribute's typical value representation
    pub vr: VR,
}

impl<'a> DictionaryEntry for DictionaryEntryRef<'a> {
    fn tag(&self) -> Tag {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn vr(&self) -> VR {
        self.vr
    }
}

/// Look up the default VR for `tag` in `dict`, or `VR::Unknown` if the
/// tag is not present. Pure function over the supplied dictionary; the
/// dictionary carries no state of its own here (§4.1).
pub fn as_vr<D: DataDictionary>(tag: Tag, dict: &D) -> VR {
    dict.by_tag(tag).map(|e| e.vr()).unwrap_or(VR::Unknown)
}

/// Resolve the VR to use for `tag` while decoding under implicit VR,
/// where the VR is not present on the wire.
///
/// Falls back to dataset inspection for tags whose VR depends on sibling
/// elements (namely pixel data, disambiguated via `BitsAllocated`), then
/// to the plain dictionary lookup, then finally to `VR::UN` (§4.1,
/// "Default VR resolution for private tags").
pub fn find_vr<D: DataDictionary>(tag: Tag, data_set: &DataSet, dict: &D) -> VR {
    // PixelData (7FE0,0010): OW if BitsAllocated (0028,0100) > 8, else OB.
    if tag == Tag(0x7FE0, 0x0010) {
        if let Some(bits_allocated) = data_set
            .get(Tag(0x0028, 0x0100))
            .and_then(|e| e.as_int().ok())
        {
            return if bits_allocated > 8 { VR::OW } else { VR::OB };
        }
        return VR::OW;
    }

    match as_vr(tag, dict) {
        VR::Unknown => VR::UN,
        vr => vr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use smallvec::smallvec;

    #[derive(Debug)]
    struct TinyDict;

    impl DataDictionary for TinyDict {
        type Entry = DictionaryEntryRef<'static>;

        fn by_name(&self, name: &str) -> Option<&Self::Entry> {
            const ENTRY: DictionaryEntryRef<'static> = DictionaryEntryRef {
                tag: Tag(0x0010, 0x0010),
                alias: "PatientName",
                vr: VR::PN,
            };
            if name == "PatientName" {
                Some(&ENTRY)
            } else {
                None
            }
        }

        fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
            const ENTRY: DictionaryEntryRef<'static> = DictionaryEntryRef {
                tag: Tag(0x0010, 0x0010),
                alias: "PatientName",
                vr: VR::PN,
            };
            if tag == Tag(0x0010, 0x0010) {
                Some(&ENTRY)
            } else {
                None
            }
        }
    }

    #[test]
    fn as_vr_resolves_known_and_unknown() {
        let dict = TinyDict;
        assert_eq!(as_vr(Tag(0x0010, 0x0010), &dict), VR::PN);
        assert_eq!(as_vr(Tag(0x0009, 0x0001), &dict), VR::Unknown);
    }

    #[test]
    fn find_vr_falls_back_to_un() {
        let dict = TinyDict;
        let ds = DataSet::new();
        assert_eq!(find_vr(Tag(0x0009, 0x0001), &ds, &dict), VR::UN);
        assert_eq!(find_vr(Tag(0x0010, 0x0010), &ds, &dict), VR::PN);
    }

    #[test]
    fn find_vr_disambiguates_pixel_data() {
        let dict = TinyDict;
        let mut ds = DataSet::new();
        ds.insert(
            Tag(0x0028, 0x0100),
            crate::value::Element::new(VR::US, Value::Integers(smallvec![16])),
        );
        assert_eq!(find_vr(Tag(0x7FE0, 0x0010), &ds, &dict), VR::OW);

        let mut ds8 = DataSet::new();
        ds8.insert(
            Tag(0x0028, 0x0100),
            crate::value::Element::new(VR::US, Value::Integers(smallvec![8])),
        );
        assert_eq!(find_vr(Tag(0x7FE0, 0x0010), &ds8, &dict), VR::OB);
    }
}
