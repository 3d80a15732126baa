//! DIMSE messages (C10).
//!
//! A [`Message`] is a command data set (always Implicit VR Little Endian)
//! plus an optional payload data set. Concrete message types declare typed
//! fields through [`Mandatory`] and [`Optional`], each a lens onto one tag
//! of the command data set.

use dicom_core::value::{DataSet, Element, Value, C};
use dicom_core::{Tag, VR};
use dicom_dictionary_std::tags;
use dicom_parser::dataset::{read_data_set, write_data_set};
use dicom_parser::stateful::decode::StatefulDecoder;
use dicom_parser::stateful::encode::StatefulEncoder;
use dicom_transfer_syntax_registry::entries::IMPLICIT_VR_LITTLE_ENDIAN;
use snafu::Snafu;
use std::io::{Read, Write};
use std::marker::PhantomData;

/// Errors occurring while constructing, reading or validating a DIMSE
/// message.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("missing mandatory command field `{}`", name))]
    MissingField { name: &'static str },
    #[snafu(display("command field `{}` has an unexpected value representation", name))]
    UnexpectedValue { name: &'static str },
    #[snafu(display("unexpected command field {}, expected {}", found, expected))]
    WrongCommandField { found: u16, expected: u16 },
    #[snafu(display("payload data set is required for this command but missing"))]
    MissingPayload,
    #[snafu(display("payload data set is not allowed for this command but present"))]
    UnexpectedPayload,
    #[snafu(display("could not encode the command data set"))]
    Encode { source: dicom_parser::error::Error },
    #[snafu(display("could not decode the command data set"))]
    Decode { source: dicom_parser::error::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Priority of a C-* request. Wire encoding is non-monotonic: `Medium`
/// is the numerically lowest code, not `Low`.
#[repr(u16)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Priority {
    Medium = 0x0000,
    High = 0x0001,
    Low = 0x0002,
}

impl Priority {
    pub fn from(value: u16) -> Option<Self> {
        match value {
            0x0000 => Some(Self::Medium),
            0x0001 => Some(Self::High),
            0x0002 => Some(Self::Low),
            _ => None,
        }
    }
}

/// Whether a command PDU carries a data set payload.
#[repr(u16)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CommandDatasetType {
    Present = 0x0001,
    Absent = 0x0101,
}

/// The DIMSE operation a command data set performs.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CommandField {
    C_STORE_RQ = 0x0001,
    C_STORE_RSP = 0x8001,
    C_GET_RQ = 0x0010,
    C_GET_RSP = 0x8010,
    C_FIND_RQ = 0x0020,
    C_FIND_RSP = 0x8020,
    C_MOVE_RQ = 0x0021,
    C_MOVE_RSP = 0x8021,
    C_ECHO_RQ = 0x0030,
    C_ECHO_RSP = 0x8030,
    N_EVENT_REPORT_RQ = 0x0100,
    N_EVENT_REPORT_RSP = 0x8100,
    N_GET_RQ = 0x0110,
    N_GET_RSP = 0x8110,
    N_SET_RQ = 0x0120,
    N_SET_RSP = 0x8120,
    N_ACTION_RQ = 0x0130,
    N_ACTION_RSP = 0x8130,
    N_CREATE_RQ = 0x0140,
    N_CREATE_RSP = 0x8140,
    N_DELETE_RQ = 0x0150,
    N_DELETE_RSP = 0x8150,
    C_CANCEL_RQ = 0x0FFF,
}

impl CommandField {
    pub fn from(value: u16) -> Option<Self> {
        use CommandField::*;
        Some(match value {
            0x0001 => C_STORE_RQ,
            0x8001 => C_STORE_RSP,
            0x0010 => C_GET_RQ,
            0x8010 => C_GET_RSP,
            0x0020 => C_FIND_RQ,
            0x8020 => C_FIND_RSP,
            0x0021 => C_MOVE_RQ,
            0x8021 => C_MOVE_RSP,
            0x0030 => C_ECHO_RQ,
            0x8030 => C_ECHO_RSP,
            0x0100 => N_EVENT_REPORT_RQ,
            0x8100 => N_EVENT_REPORT_RSP,
            0x0110 => N_GET_RQ,
            0x8110 => N_GET_RSP,
            0x0120 => N_SET_RQ,
            0x8120 => N_SET_RSP,
            0x0130 => N_ACTION_RQ,
            0x8130 => N_ACTION_RSP,
            0x0140 => N_CREATE_RQ,
            0x8140 => N_CREATE_RSP,
            0x0150 => N_DELETE_RQ,
            0x8150 => N_DELETE_RSP,
            0x0FFF => C_CANCEL_RQ,
            _ => return None,
        })
    }

    /// Whether the payload data set is required, forbidden or optional for
    /// this command (§4.8's payload matrix).
    pub fn payload_rule(self) -> PayloadRule {
        match self {
            CommandField::C_STORE_RQ => PayloadRule::Required,
            CommandField::C_ECHO_RSP => PayloadRule::Forbidden,
            _ => PayloadRule::Optional,
        }
    }
}

/// Whether a command's payload data set is required, forbidden, or left to
/// the caller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PayloadRule {
    Required,
    Forbidden,
    Optional,
}

/// A value convertible to and from a single command data set element.
pub trait FieldValue: Sized {
    fn decode(element: &Element) -> Result<Self>;
    fn encode(self) -> Element;
}

impl FieldValue for u16 {
    fn decode(element: &Element) -> Result<Self> {
        element
            .as_int()
            .map(|v| v as u16)
            .map_err(|_| Error::UnexpectedValue { name: "<u16 field>" })
    }

    fn encode(self) -> Element {
        Element::new(VR::US, Value::Integers(C::from_vec(vec![self as i64])))
    }
}

impl FieldValue for u32 {
    fn decode(element: &Element) -> Result<Self> {
        element
            .as_int()
            .map(|v| v as u32)
            .map_err(|_| Error::UnexpectedValue { name: "<u32 field>" })
    }

    fn encode(self) -> Element {
        Element::new(VR::UL, Value::Integers(C::from_vec(vec![self as i64])))
    }
}

impl FieldValue for String {
    fn decode(element: &Element) -> Result<Self> {
        element
            .as_string()
            .map_err(|_| Error::UnexpectedValue { name: "<string field>" })
    }

    fn encode(self) -> Element {
        Element::new(VR::UI, Value::Strings(C::from_vec(vec![self])))
    }
}

/// A mandatory typed field: a lens onto a tag that must always be present.
pub struct Mandatory<T> {
    tag: Tag,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Mandatory<T> {
    pub const fn new(tag: Tag, name: &'static str) -> Self {
        Mandatory {
            tag,
            name,
            _marker: PhantomData,
        }
    }
}

impl<T: FieldValue> Mandatory<T> {
    pub fn get(&self, command: &DataSet) -> Result<T> {
        let element = command.get(self.tag).ok_or(Error::MissingField { name: self.name })?;
        T::decode(element)
    }

    pub fn set(&self, command: &mut DataSet, value: T) {
        command.insert(self.tag, value.encode());
    }
}

/// An optional typed field: a lens onto a tag that may be absent.
pub struct Optional<T> {
    tag: Tag,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Optional<T> {
    pub const fn new(tag: Tag, name: &'static str) -> Self {
        Optional {
            tag,
            name,
            _marker: PhantomData,
        }
    }
}

impl<T: FieldValue> Optional<T> {
    pub fn get(&self, command: &DataSet) -> Result<Option<T>> {
        command.get(self.tag).map(T::decode).transpose()
    }

    /// Set the field, or leave the command data set untouched when `value`
    /// is `None` (there is no way to retract a tag once inserted).
    pub fn set(&self, command: &mut DataSet, value: Option<T>) {
        if let Some(value) = value {
            command.insert(self.tag, value.encode());
        }
    }
}

/// Field lenses for the DIMSE command data set group (0000,xxxx).
pub mod fields {
    use super::{Mandatory, Optional};
    use dicom_dictionary_std::tags;

    pub const COMMAND_FIELD: Mandatory<u16> = Mandatory::new(tags::COMMAND_FIELD, "CommandField");
    pub const MESSAGE_ID: Mandatory<u16> = Mandatory::new(tags::MESSAGE_ID, "MessageID");
    pub const MESSAGE_ID_BEING_RESPONDED_TO: Mandatory<u16> =
        Mandatory::new(tags::MESSAGE_ID_BEING_RESPONDED_TO, "MessageIDBeingRespondedTo");
    pub const PRIORITY: Mandatory<u16> = Mandatory::new(tags::PRIORITY, "Priority");
    pub const COMMAND_DATA_SET_TYPE: Mandatory<u16> =
        Mandatory::new(tags::COMMAND_DATA_SET_TYPE, "CommandDataSetType");

    pub const AFFECTED_SOP_CLASS_UID: Optional<String> =
        Optional::new(tags::AFFECTED_SOP_CLASS_UID, "AffectedSOPClassUID");
    pub const AFFECTED_SOP_INSTANCE_UID: Optional<String> =
        Optional::new(tags::AFFECTED_SOP_INSTANCE_UID, "AffectedSOPInstanceUID");
    pub const REQUESTED_SOP_CLASS_UID: Optional<String> =
        Optional::new(tags::REQUESTED_SOP_CLASS_UID, "RequestedSOPClassUID");
    pub const REQUESTED_SOP_INSTANCE_UID: Optional<String> =
        Optional::new(tags::REQUESTED_SOP_INSTANCE_UID, "RequestedSOPInstanceUID");
    pub const STATUS: Optional<u16> = Optional::new(tags::STATUS, "Status");
    pub const EVENT_TYPE_ID: Optional<u16> = Optional::new(tags::EVENT_TYPE_ID, "EventTypeID");
    pub const ACTION_TYPE_ID: Optional<u16> = Optional::new(tags::ACTION_TYPE_ID, "ActionTypeID");
    pub const MOVE_ORIGINATOR_APPLICATION_ENTITY_TITLE: Optional<String> = Optional::new(
        tags::MOVE_ORIGINATOR_APPLICATION_ENTITY_TITLE,
        "MoveOriginatorApplicationEntityTitle",
    );
    pub const MOVE_ORIGINATOR_MESSAGE_ID: Optional<u16> =
        Optional::new(tags::MOVE_ORIGINATOR_MESSAGE_ID, "MoveOriginatorMessageID");
    pub const NUMBER_OF_REMAINING_SUBOPERATIONS: Optional<u16> =
        Optional::new(tags::NUMBER_OF_REMAINING_SUBOPERATIONS, "NumberOfRemainingSuboperations");
    pub const NUMBER_OF_COMPLETED_SUBOPERATIONS: Optional<u16> =
        Optional::new(tags::NUMBER_OF_COMPLETED_SUBOPERATIONS, "NumberOfCompletedSuboperations");
    pub const NUMBER_OF_FAILED_SUBOPERATIONS: Optional<u16> =
        Optional::new(tags::NUMBER_OF_FAILED_SUBOPERATIONS, "NumberOfFailedSuboperations");
    pub const NUMBER_OF_WARNING_SUBOPERATIONS: Optional<u16> =
        Optional::new(tags::NUMBER_OF_WARNING_SUBOPERATIONS, "NumberOfWarningSuboperations");
}

/// A DIMSE message: a command data set plus an optional payload data set.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    command: DataSet,
    payload: Option<DataSet>,
}

impl Message {
    pub fn new(command: DataSet, payload: Option<DataSet>) -> Self {
        Message { command, payload }
    }

    pub fn command_dataset(&self) -> &DataSet {
        &self.command
    }

    pub fn payload(&self) -> Option<&DataSet> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<DataSet> {
        self.payload
    }

    pub fn command_field(&self) -> Result<CommandField> {
        let raw = fields::COMMAND_FIELD.get(&self.command)?;
        CommandField::from(raw).ok_or(Error::UnexpectedValue { name: "CommandField" })
    }

    /// Check that `self` declares `expected` as its command field and that
    /// the presence of a payload matches `expected`'s payload rule.
    fn validate(&self, expected: CommandField) -> Result<()> {
        let found = fields::COMMAND_FIELD.get(&self.command)?;
        if found != expected as u16 {
            return Err(Error::WrongCommandField {
                found,
                expected: expected as u16,
            });
        }
        match (expected.payload_rule(), self.payload.is_some()) {
            (PayloadRule::Required, false) => Err(Error::MissingPayload),
            (PayloadRule::Forbidden, true) => Err(Error::UnexpectedPayload),
            _ => Ok(()),
        }
    }

    /// Encode the command data set (Implicit VR Little Endian, §4.8) to
    /// bytes.
    pub fn encode_command(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = StatefulEncoder::new(
                &mut out,
                IMPLICIT_VR_LITTLE_ENDIAN,
                dicom_encoding::text::SpecificCharacterSet::default(),
            );
            write_data_set(&mut encoder, &self.command).context_encode()?;
        }
        Ok(out)
    }

    /// Decode a command data set (Implicit VR Little Endian) from `source`.
    pub fn decode_command<S: Read>(source: S) -> Result<DataSet> {
        let mut decoder = StatefulDecoder::new(
            source,
            IMPLICIT_VR_LITTLE_ENDIAN,
            dicom_encoding::text::SpecificCharacterSet::default(),
        );
        read_data_set(&mut decoder).context_decode()
    }
}

trait ResultExt<T> {
    fn context_encode(self) -> Result<T>;
    fn context_decode(self) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, dicom_parser::error::Error> {
    fn context_encode(self) -> Result<T> {
        self.map_err(|source| Error::Encode { source })
    }

    fn context_decode(self) -> Result<T> {
        self.map_err(|source| Error::Decode { source })
    }
}

macro_rules! command_message {
    ($name:ident, $field:expr, requires_payload) => {
        command_message!(@impl $name, $field);
    };
    ($name:ident, $field:expr) => {
        command_message!(@impl $name, $field);
    };
    (@impl $name:ident, $field:expr) => {
        #[doc = concat!("A `", stringify!($field), "` DIMSE message.")]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(Message);

        impl $name {
            /// Wrap a generic [`Message`], validating its command field and
            /// payload presence against this type's rules.
            pub fn from_message(message: Message) -> Result<Self> {
                message.validate($field)?;
                Ok($name(message))
            }

            pub fn message_id(&self) -> Result<u16> {
                fields::MESSAGE_ID.get(self.0.command_dataset())
            }

            pub fn affected_sop_class_uid(&self) -> Result<Option<String>> {
                fields::AFFECTED_SOP_CLASS_UID.get(self.0.command_dataset())
            }

            pub fn into_message(self) -> Message {
                self.0
            }

            pub fn message(&self) -> &Message {
                &self.0
            }
        }
    };
}

command_message!(CEchoRq, CommandField::C_ECHO_RQ);
command_message!(CEchoRsp, CommandField::C_ECHO_RSP);
command_message!(CStoreRq, CommandField::C_STORE_RQ, requires_payload);
command_message!(CStoreRsp, CommandField::C_STORE_RSP);
command_message!(CFindRq, CommandField::C_FIND_RQ);
command_message!(CFindRsp, CommandField::C_FIND_RSP);
command_message!(CMoveRq, CommandField::C_MOVE_RQ);
command_message!(CMoveRsp, CommandField::C_MOVE_RSP);
command_message!(NSetRsp, CommandField::N_SET_RSP);
command_message!(NEventReportRsp, CommandField::N_EVENT_REPORT_RSP);

impl CEchoRq {
    /// Build a new C-ECHO-RQ for `sop_class_uid` (by convention the
    /// Verification SOP Class, "1.2.840.10008.1.1").
    pub fn new(message_id: u16, sop_class_uid: impl Into<String>) -> Self {
        let mut command = DataSet::new();
        fields::COMMAND_FIELD.set(&mut command, CommandField::C_ECHO_RQ as u16);
        fields::MESSAGE_ID.set(&mut command, message_id);
        fields::COMMAND_DATA_SET_TYPE.set(&mut command, CommandDatasetType::Absent as u16);
        fields::AFFECTED_SOP_CLASS_UID.set(&mut command, Some(sop_class_uid.into()));
        CEchoRq(Message::new(command, None))
    }
}

impl CStoreRq {
    /// Build a new C-STORE-RQ carrying `payload` under `sop_class_uid` /
    /// `sop_instance_uid`.
    pub fn new(
        message_id: u16,
        sop_class_uid: impl Into<String>,
        sop_instance_uid: impl Into<String>,
        priority: Priority,
        payload: DataSet,
    ) -> Self {
        let mut command = DataSet::new();
        fields::COMMAND_FIELD.set(&mut command, CommandField::C_STORE_RQ as u16);
        fields::MESSAGE_ID.set(&mut command, message_id);
        fields::PRIORITY.set(&mut command, priority as u16);
        fields::COMMAND_DATA_SET_TYPE.set(&mut command, CommandDatasetType::Present as u16);
        fields::AFFECTED_SOP_CLASS_UID.set(&mut command, Some(sop_class_uid.into()));
        fields::AFFECTED_SOP_INSTANCE_UID.set(&mut command, Some(sop_instance_uid.into()));
        CStoreRq(Message::new(command, Some(payload)))
    }

    pub fn affected_sop_instance_uid(&self) -> Result<Option<String>> {
        fields::AFFECTED_SOP_INSTANCE_UID.get(self.0.command_dataset())
    }
}

impl CStoreRsp {
    /// Build a new C-STORE-RSP answering `request_message_id` with `status`.
    pub fn new(message_id: u16, request_message_id: u16, status: u16) -> Self {
        let mut command = DataSet::new();
        fields::COMMAND_FIELD.set(&mut command, CommandField::C_STORE_RSP as u16);
        fields::MESSAGE_ID.set(&mut command, message_id);
        fields::MESSAGE_ID_BEING_RESPONDED_TO.set(&mut command, request_message_id);
        fields::COMMAND_DATA_SET_TYPE.set(&mut command, CommandDatasetType::Absent as u16);
        fields::STATUS.set(&mut command, Some(status));
        CStoreRsp(Message::new(command, None))
    }

    pub fn status(&self) -> Result<Option<u16>> {
        fields::STATUS.get(self.0.command_dataset())
    }
}

impl NSetRsp {
    /// Build a new N-SET-RSP answering `request_message_id` with `status`.
    pub fn new(message_id: u16, request_message_id: u16, status: u16) -> Self {
        let mut command = DataSet::new();
        fields::COMMAND_FIELD.set(&mut command, CommandField::N_SET_RSP as u16);
        fields::MESSAGE_ID.set(&mut command, message_id);
        fields::MESSAGE_ID_BEING_RESPONDED_TO.set(&mut command, request_message_id);
        fields::COMMAND_DATA_SET_TYPE.set(&mut command, CommandDatasetType::Absent as u16);
        fields::STATUS.set(&mut command, Some(status));
        NSetRsp(Message::new(command, None))
    }

    pub fn affected_sop_class(&self) -> Result<Option<String>> {
        fields::AFFECTED_SOP_CLASS_UID.get(self.0.command_dataset())
    }

    pub fn affected_sop_instance(&self) -> Result<Option<String>> {
        fields::AFFECTED_SOP_INSTANCE_UID.get(self.0.command_dataset())
    }

    pub fn status(&self) -> Result<Option<u16>> {
        fields::STATUS.get(self.0.command_dataset())
    }
}

impl NEventReportRsp {
    /// Build a new N-EVENT-REPORT-RSP answering `request_message_id` with
    /// `status`.
    pub fn new(message_id: u16, request_message_id: u16, status: u16) -> Self {
        let mut command = DataSet::new();
        fields::COMMAND_FIELD.set(&mut command, CommandField::N_EVENT_REPORT_RSP as u16);
        fields::MESSAGE_ID.set(&mut command, message_id);
        fields::MESSAGE_ID_BEING_RESPONDED_TO.set(&mut command, request_message_id);
        fields::COMMAND_DATA_SET_TYPE.set(&mut command, CommandDatasetType::Absent as u16);
        fields::STATUS.set(&mut command, Some(status));
        NEventReportRsp(Message::new(command, None))
    }

    pub fn affected_sop_class(&self) -> Result<Option<String>> {
        fields::AFFECTED_SOP_CLASS_UID.get(self.0.command_dataset())
    }

    pub fn affected_sop_instance(&self) -> Result<Option<String>> {
        fields::AFFECTED_SOP_INSTANCE_UID.get(self.0.command_dataset())
    }

    pub fn event_type_id(&self) -> Result<Option<u16>> {
        fields::EVENT_TYPE_ID.get(self.0.command_dataset())
    }

    pub fn status(&self) -> Result<Option<u16>> {
        fields::STATUS.get(self.0.command_dataset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_echo_rq_round_trips_through_message() {
        let rq = CEchoRq::new(1, "1.2.840.10008.1.1");
        let message = rq.into_message();
        assert_eq!(
            fields::COMMAND_FIELD.get(message.command_dataset()).unwrap(),
            CommandField::C_ECHO_RQ as u16
        );

        let rebuilt = CEchoRq::from_message(message).expect("should validate as C-ECHO-RQ");
        assert_eq!(rebuilt.message_id().unwrap(), 1);
        assert_eq!(
            rebuilt.affected_sop_class_uid().unwrap().as_deref(),
            Some("1.2.840.10008.1.1")
        );
    }

    #[test]
    fn c_store_rq_requires_payload() {
        let mut command = DataSet::new();
        fields::COMMAND_FIELD.set(&mut command, CommandField::C_STORE_RQ as u16);
        fields::MESSAGE_ID.set(&mut command, 1);
        fields::COMMAND_DATA_SET_TYPE.set(&mut command, CommandDatasetType::Absent as u16);
        let message = Message::new(command, None);

        let err = CStoreRq::from_message(message).unwrap_err();
        assert!(matches!(err, Error::MissingPayload));
    }

    #[test]
    fn c_echo_rsp_forbids_payload() {
        let mut command = DataSet::new();
        fields::COMMAND_FIELD.set(&mut command, CommandField::C_ECHO_RSP as u16);
        fields::MESSAGE_ID_BEING_RESPONDED_TO.set(&mut command, 1);
        fields::COMMAND_DATA_SET_TYPE.set(&mut command, CommandDatasetType::Present as u16);
        let message = Message::new(command, Some(DataSet::new()));

        let err = CEchoRsp::from_message(message).unwrap_err();
        assert!(matches!(err, Error::UnexpectedPayload));
    }

    #[test]
    fn wrong_command_field_is_rejected() {
        let rq = CEchoRq::new(1, "1.2.840.10008.1.1");
        let err = CStoreRq::from_message(rq.into_message()).unwrap_err();
        assert!(matches!(err, Error::WrongCommandField { .. }));
    }

    #[test]
    fn n_set_rsp_round_trips_through_message() {
        let rsp = NSetRsp::new(2, 1, 0x0000);
        let message = rsp.into_message();
        let rebuilt = NSetRsp::from_message(message).expect("should validate as N-SET-RSP");
        assert_eq!(rebuilt.status().unwrap(), Some(0));
    }

    #[test]
    fn n_event_report_rsp_carries_event_type_id() {
        let mut command = DataSet::new();
        fields::COMMAND_FIELD.set(&mut command, CommandField::N_EVENT_REPORT_RSP as u16);
        fields::MESSAGE_ID.set(&mut command, 2);
        fields::MESSAGE_ID_BEING_RESPONDED_TO.set(&mut command, 1);
        fields::COMMAND_DATA_SET_TYPE.set(&mut command, CommandDatasetType::Absent as u16);
        fields::STATUS.set(&mut command, Some(0));
        fields::AFFECTED_SOP_CLASS_UID.set(&mut command, Some("1.2.840.10008.5.1.1.1".to_string()));
        fields::EVENT_TYPE_ID.set(&mut command, Some(1));
        let message = Message::new(command, None);

        let rsp = NEventReportRsp::from_message(message).expect("should validate as N-EVENT-REPORT-RSP");
        assert_eq!(rsp.event_type_id().unwrap(), Some(1));
        assert_eq!(
            rsp.affected_sop_class().unwrap().as_deref(),
            Some("1.2.840.10008.5.1.1.1")
        );
    }

    #[test]
    fn command_round_trips_through_bytes() {
        let rq = CEchoRq::new(7, "1.2.840.10008.1.1");
        let bytes = rq.message().encode_command().expect("should encode");
        let command = Message::decode_command(&bytes[..]).expect("should decode");
        assert_eq!(fields::MESSAGE_ID.get(&command).unwrap(), 7);
    }
}
