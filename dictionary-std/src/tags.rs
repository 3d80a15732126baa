//! Tag constants for the representative subset of the standard data
//! dictionary carried by this crate (§4.12: patient/study/series
//! identifiers, the attributes consulted by `find_vr`, the DIMSE
//! command-set group, and the file meta-info group).

use dicom_core::Tag;

// --- File meta information (0002,xxxx) ---

/// File Meta Information Group Length
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// File Meta Information Version
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/// Media Storage SOP Class UID
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// Media Storage SOP Instance UID
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// Transfer Syntax UID
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// Implementation Class UID
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/// Implementation Version Name
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);

// --- DIMSE command set (0000,xxxx) ---

/// Command Group Length
pub const COMMAND_GROUP_LENGTH: Tag = Tag(0x0000, 0x0000);
/// Affected SOP Class UID
pub const AFFECTED_SOP_CLASS_UID: Tag = Tag(0x0000, 0x0002);
/// Affected SOP Instance UID
pub const AFFECTED_SOP_INSTANCE_UID: Tag = Tag(0x0000, 0x1000);
/// Command Field
pub const COMMAND_FIELD: Tag = Tag(0x0000, 0x0100);
/// Message ID
pub const MESSAGE_ID: Tag = Tag(0x0000, 0x0110);
/// Message ID Being Responded To
pub const MESSAGE_ID_BEING_RESPONDED_TO: Tag = Tag(0x0000, 0x0120);
/// Priority
pub const PRIORITY: Tag = Tag(0x0000, 0x0700);
/// Command Data Set Type
pub const COMMAND_DATA_SET_TYPE: Tag = Tag(0x0000, 0x0800);
/// Status
pub const STATUS: Tag = Tag(0x0000, 0x0900);
/// Move Originator Application Entity Title
pub const MOVE_ORIGINATOR_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0000, 0x1030);
/// Move Originator Message ID
pub const MOVE_ORIGINATOR_MESSAGE_ID: Tag = Tag(0x0000, 0x1031);
/// Requested SOP Instance UID
pub const REQUESTED_SOP_INSTANCE_UID: Tag = Tag(0x0000, 0x1001);
/// Requested SOP Class UID
pub const REQUESTED_SOP_CLASS_UID: Tag = Tag(0x0000, 0x1003);
/// Event Type ID
pub const EVENT_TYPE_ID: Tag = Tag(0x0000, 0x1002);
/// Attribute Identifier List
pub const ATTRIBUTE_IDENTIFIER_LIST: Tag = Tag(0x0000, 0x1005);
/// Action Type ID
pub const ACTION_TYPE_ID: Tag = Tag(0x0000, 0x1008);
/// Number of Remaining Sub-operations
pub const NUMBER_OF_REMAINING_SUBOPERATIONS: Tag = Tag(0x0000, 0x1020);
/// Number of Completed Sub-operations
pub const NUMBER_OF_COMPLETED_SUBOPERATIONS: Tag = Tag(0x0000, 0x1021);
/// Number of Failed Sub-operations
pub const NUMBER_OF_FAILED_SUBOPERATIONS: Tag = Tag(0x0000, 0x1022);
/// Number of Warning Sub-operations
pub const NUMBER_OF_WARNING_SUBOPERATIONS: Tag = Tag(0x0000, 0x1023);

// --- Patient / study / series identifiers ---

/// Patient's Name
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/// Patient ID
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/// Patient's Birth Date
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
/// Patient's Sex
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
/// Study Instance UID
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/// Series Instance UID
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
/// SOP Instance UID
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// SOP Class UID
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// Modality
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
/// Series Number
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);

// --- Pixel data and describing attributes (consulted by `find_vr`) ---

/// Bits Allocated
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// Pixel Representation
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
/// Pixel Data
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Scheduled Procedure Step (used by the undefined-length sequence scenario)
pub const SCHEDULED_PROCEDURE_STEP_SEQUENCE: Tag = Tag(0x0040, 0x0275);
/// Scheduled Procedure Step ID
pub const SCHEDULED_PROCEDURE_STEP_ID: Tag = Tag(0x0040, 0x0009);
