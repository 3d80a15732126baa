//! Standard data element dictionary implementation.

use crate::tags;
use dicom_core::dictionary::{DataDictionary, DictionaryEntryRef};
use dicom_core::header::Tag;
use dicom_core::VR;
use once_cell::sync::Lazy;
use std::collections::HashMap;

macro_rules! entries {
    ($($tag:expr => ($alias:literal, $vr:ident)),+ $(,)?) => {
        &[$(
            DictionaryEntryRef { tag: $tag, alias: $alias, vr: VR::$vr },
        )+]
    };
}

static ENTRIES: &[DictionaryEntryRef<'static>] = entries! {
    tags::FILE_META_INFORMATION_GROUP_LENGTH => ("FileMetaInformationGroupLength", UL),
    tags::FILE_META_INFORMATION_VERSION => ("FileMetaInformationVersion", OB),
    tags::MEDIA_STORAGE_SOP_CLASS_UID => ("MediaStorageSOPClassUID", UI),
    tags::MEDIA_STORAGE_SOP_INSTANCE_UID => ("MediaStorageSOPInstanceUID", UI),
    tags::TRANSFER_SYNTAX_UID => ("TransferSyntaxUID", UI),
    tags::IMPLEMENTATION_CLASS_UID => ("ImplementationClassUID", UI),
    tags::IMPLEMENTATION_VERSION_NAME => ("ImplementationVersionName", SH),
    tags::COMMAND_GROUP_LENGTH => ("CommandGroupLength", UL),
    tags::AFFECTED_SOP_CLASS_UID => ("AffectedSOPClassUID", UI),
    tags::AFFECTED_SOP_INSTANCE_UID => ("AffectedSOPInstanceUID", UI),
    tags::COMMAND_FIELD => ("CommandField", US),
    tags::MESSAGE_ID => ("MessageID", US),
    tags::MESSAGE_ID_BEING_RESPONDED_TO => ("MessageIDBeingRespondedTo", US),
    tags::PRIORITY => ("Priority", US),
    tags::COMMAND_DATA_SET_TYPE => ("CommandDataSetType", US),
    tags::STATUS => ("Status", US),
    tags::MOVE_ORIGINATOR_APPLICATION_ENTITY_TITLE => ("MoveOriginatorApplicationEntityTitle", AE),
    tags::MOVE_ORIGINATOR_MESSAGE_ID => ("MoveOriginatorMessageID", US),
    tags::PATIENT_NAME => ("PatientName", PN),
    tags::PATIENT_ID => ("PatientID", LO),
    tags::PATIENT_BIRTH_DATE => ("PatientBirthDate", DA),
    tags::PATIENT_SEX => ("PatientSex", CS),
    tags::STUDY_INSTANCE_UID => ("StudyInstanceUID", UI),
    tags::SERIES_INSTANCE_UID => ("SeriesInstanceUID", UI),
    tags::SOP_INSTANCE_UID => ("SOPInstanceUID", UI),
    tags::SOP_CLASS_UID => ("SOPClassUID", UI),
    tags::MODALITY => ("Modality", CS),
    tags::SERIES_NUMBER => ("SeriesNumber", IS),
    tags::BITS_ALLOCATED => ("BitsAllocated", US),
    tags::PIXEL_REPRESENTATION => ("PixelRepresentation", US),
    tags::PIXEL_DATA => ("PixelData", OW),
    tags::SCHEDULED_PROCEDURE_STEP_SEQUENCE => ("ScheduledProcedureStepSequence", SQ),
    tags::SCHEDULED_PROCEDURE_STEP_ID => ("ScheduledProcedureStepID", SH),
};

static BY_NAME: Lazy<HashMap<&'static str, &'static DictionaryEntryRef<'static>>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.alias, e)).collect());

static BY_TAG: Lazy<HashMap<Tag, &'static DictionaryEntryRef<'static>>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.tag, e)).collect());

/// A data element dictionary consulting the standard attribute registry
/// carried by this crate.
///
/// Tags outside the representative subset resolve to `None`, in which
/// case callers fall back to `VR::UN` (see `dicom_core::dictionary::find_vr`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StandardDataDictionary;

impl DataDictionary for StandardDataDictionary {
    type Entry = DictionaryEntryRef<'static>;

    fn by_name(&self, name: &str) -> Option<&Self::Entry> {
        BY_NAME.get(name).copied()
    }

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        BY_TAG.get(&tag).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_tags() {
        let dict = StandardDataDictionary;
        assert_eq!(dict.by_tag(tags::PATIENT_NAME).unwrap().vr, VR::PN);
        assert_eq!(dict.by_name("Modality").unwrap().tag, tags::MODALITY);
        assert!(dict.by_tag(Tag(0x0009, 0x0001)).is_none());
    }
}
