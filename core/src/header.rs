//! Basic data types for interpreting DICOM data elements: tags, value
//! representations, lengths and the sequence item sentinels.

use std::cmp::Ordering;
use std::fmt;
use std::str::{from_utf8, FromStr};

/// A trait for a data type that carries a DICOM header (tag + length).
#[allow(clippy::len_without_is_empty)]
pub trait Header {
    /// Retrieve the element's tag.
    fn tag(&self) -> Tag;

    /// Retrieve the value data's length as specified by the data element.
    /// The length may be undefined, in the case of sequences and certain
    /// binary values.
    fn len(&self) -> Length;

    /// Check whether this is the header of an item.
    fn is_item(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE000)
    }

    /// Check whether this is the header of an item delimiter.
    fn is_item_delimiter(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE00D)
    }

    /// Check whether this is the header of a sequence delimiter.
    fn is_sequence_delimiter(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE0DD)
    }
}

/// A trait for any value type that can report its own encoded length.
pub trait HasLength {
    /// The length of the value, in bytes, as it would appear on the wire.
    /// `Length::UNDEFINED` for values without a fixed size (open sequences,
    /// encapsulated pixel data).
    fn length(&self) -> Length;

    /// Whether this value, once encoded, would carry no payload bytes.
    fn is_empty(&self) -> bool {
        self.length() == Length(0)
    }
}

/// A data structure for a data element header: tag, value representation
/// and declared length.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DataElementHeader {
    /// DICOM tag
    pub tag: Tag,
    /// Value Representation
    pub vr: VR,
    /// Element length, as declared on the wire
    pub len: Length,
}

impl Header for DataElementHeader {
    fn tag(&self) -> Tag {
        self.tag
    }

    fn len(&self) -> Length {
        self.len
    }
}

impl DataElementHeader {
    /// Create a new data element header with the given properties.
    pub fn new<T: Into<Tag>>(tag: T, vr: VR, len: Length) -> DataElementHeader {
        DataElementHeader {
            tag: tag.into(),
            vr,
            len,
        }
    }

    /// Retrieve the element's value representation.
    pub fn vr(&self) -> VR {
        self.vr
    }
}

impl From<SequenceItemHeader> for DataElementHeader {
    fn from(value: SequenceItemHeader) -> DataElementHeader {
        DataElementHeader {
            tag: value.tag(),
            vr: VR::UN,
            len: value.len(),
        }
    }
}

/// Data type for the header of a sequence item, item delimiter, or
/// sequence delimiter. These three sentinel tags share the (FFFE,xxxx)
/// group and always carry a plain 4-byte length regardless of transfer
/// syntax.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SequenceItemHeader {
    /// An item, with its declared length (may be undefined).
    Item {
        /// the length of the item in bytes (`Length::UNDEFINED` if open)
        len: Length,
    },
    /// An item delimiter: closes the current (undefined-length) item.
    ItemDelimiter,
    /// A sequence delimiter: closes the current (undefined-length) sequence.
    SequenceDelimiter,
}

impl SequenceItemHeader {
    /// Classify a raw (tag, length) pair read from the stream as one of
    /// the three sentinel headers.
    pub fn new<T: Into<Tag>>(tag: T, len: Length) -> crate::error::Result<SequenceItemHeader> {
        use crate::error::{UnexpectedDataValueLengthSnafu, UnexpectedElementSnafu};
        use snafu::ensure;

        match tag.into() {
            Tag(0xFFFE, 0xE000) => Ok(SequenceItemHeader::Item { len }),
            Tag(0xFFFE, 0xE00D) => {
                ensure!(len == Length(0), UnexpectedDataValueLengthSnafu { len });
                Ok(SequenceItemHeader::ItemDelimiter)
            }
            Tag(0xFFFE, 0xE0DD) => Ok(SequenceItemHeader::SequenceDelimiter),
            tag => UnexpectedElementSnafu { tag }.fail(),
        }
    }
}

impl Header for SequenceItemHeader {
    fn tag(&self) -> Tag {
        match *self {
            SequenceItemHeader::Item { .. } => Tag(0xFFFE, 0xE000),
            SequenceItemHeader::ItemDelimiter => Tag(0xFFFE, 0xE00D),
            SequenceItemHeader::SequenceDelimiter => Tag(0xFFFE, 0xE0DD),
        }
    }

    fn len(&self) -> Length {
        match *self {
            SequenceItemHeader::Item { len } => len,
            SequenceItemHeader::ItemDelimiter | SequenceItemHeader::SequenceDelimiter => {
                Length(0)
            }
        }
    }
}

/// An enumeration of the DICOM value representations in scope, grouped
/// into the categories that drive [`Value`](crate::value::Value) arm
/// selection.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity (string)
    AE,
    /// Age String (string)
    AS,
    /// Attribute Tag (integer, encoded as a packed tag pair)
    AT,
    /// Code String (string)
    CS,
    /// Date (string)
    DA,
    /// Decimal String (real)
    DS,
    /// Date Time (string)
    DT,
    /// Floating Point Single (real)
    FL,
    /// Floating Point Double (real)
    FD,
    /// Integer String (integer)
    IS,
    /// Long String (string)
    LO,
    /// Long Text (string)
    LT,
    /// Other Byte (binary)
    OB,
    /// Other Double (binary)
    OD,
    /// Other Float (binary)
    OF,
    /// Other Long (binary)
    OL,
    /// Other Word (binary)
    OW,
    /// Person Name (string)
    PN,
    /// Short String (string)
    SH,
    /// Signed Long (integer)
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short (integer)
    SS,
    /// Short Text (string)
    ST,
    /// Time (string)
    TM,
    /// Unlimited Characters (string)
    UC,
    /// Unique Identifier, UID (string)
    UI,
    /// Unsigned Long (integer)
    UL,
    /// Unknown (binary, opaque)
    UN,
    /// Universal Resource Identifier/Locator (string)
    UR,
    /// Unsigned Short (integer)
    US,
    /// Unlimited Text (string)
    UT,
    /// Not a real VR: marks a tag whose VR could not be determined.
    Unknown,
    /// Not a real VR: marks a decode failure that should not abort the read.
    Invalid,
}

/// The broad category a VR belongs to, which in turn selects the
/// [`Value`](crate::value::Value) arm used to hold decoded data.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum VrCategory {
    /// maps to `Value::Integers`
    Integer,
    /// maps to `Value::Reals`
    Real,
    /// maps to `Value::Strings`
    Str,
    /// maps to `Value::DataSets`
    Sequence,
    /// maps to `Value::Binaries`
    Binary,
}

impl VR {
    /// Obtain the value representation corresponding to two ASCII bytes.
    pub fn from_binary(chars: [u8; 2]) -> Option<Self> {
        from_utf8(chars.as_ref())
            .ok()
            .and_then(|s| VR::from_str(s).ok())
    }

    /// The category of this VR, which determines the arm of `Value` used
    /// to store a decoded element (§4.1/§3 of the data model).
    pub fn category(self) -> VrCategory {
        use VrCategory::*;
        use VR::*;
        match self {
            IS | SL | SS | UL | US | AT => Integer,
            DS | FD | FL => Real,
            AE | AS | CS | DA | DT | LO | LT | PN | SH | ST | TM | UC | UI | UR | UT => Str,
            SQ => Sequence,
            OB | OD | OF | OL | OW | UN | Unknown | Invalid => Binary,
        }
    }

    /// Whether this VR uses the 32-bit "long" length field (with two
    /// reserved bytes before it) in explicit VR encoding.
    pub fn has_explicit_long_length(self) -> bool {
        matches!(
            self,
            VR::OB | VR::OD | VR::OF | VR::OL | VR::OW | VR::SQ | VR::UC | VR::UR | VR::UT | VR::UN
        )
    }

    /// Retrieve a string representation of this VR.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
            Unknown => "??",
            Invalid => "!!",
        }
    }
}

impl FromStr for VR {
    type Err = &'static str;

    fn from_str(string: &str) -> std::result::Result<Self, Self::Err> {
        use VR::*;
        match string {
            "AE" => Ok(AE),
            "AS" => Ok(AS),
            "AT" => Ok(AT),
            "CS" => Ok(CS),
            "DA" => Ok(DA),
            "DS" => Ok(DS),
            "DT" => Ok(DT),
            "FL" => Ok(FL),
            "FD" => Ok(FD),
            "IS" => Ok(IS),
            "LO" => Ok(LO),
            "LT" => Ok(LT),
            "OB" => Ok(OB),
            "OD" => Ok(OD),
            "OF" => Ok(OF),
            "OL" => Ok(OL),
            "OW" => Ok(OW),
            "PN" => Ok(PN),
            "SH" => Ok(SH),
            "SL" => Ok(SL),
            "SQ" => Ok(SQ),
            "SS" => Ok(SS),
            "ST" => Ok(ST),
            "TM" => Ok(TM),
            "UC" => Ok(UC),
            "UI" => Ok(UI),
            "UL" => Ok(UL),
            "UN" => Ok(UN),
            "UR" => Ok(UR),
            "US" => Ok(US),
            "UT" => Ok(UT),
            _ => Err("no such value representation"),
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

/// Idiomatic alias for a tag's group number.
pub type GroupNumber = u16;
/// Idiomatic alias for a tag's element number.
pub type ElementNumber = u16;

/// A DICOM data element tag: a 16-bit group number and a 16-bit element
/// number. Ordered lexicographically on `(group, element)`.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub GroupNumber, pub ElementNumber);

impl Tag {
    /// Getter for the tag's group value.
    #[inline]
    pub fn group(self) -> GroupNumber {
        self.0
    }

    /// Getter for the tag's element value.
    #[inline]
    pub fn element(self) -> ElementNumber {
        self.1
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:#06X?}, {:#06X?})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl PartialEq<[u16; 2]> for Tag {
    fn eq(&self, other: &[u16; 2]) -> bool {
        self.0 == other[0] && self.1 == other[1]
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from(value: (u16, u16)) -> Tag {
        Tag(value.0, value.1)
    }
}

impl From<[u16; 2]> for Tag {
    #[inline]
    fn from(value: [u16; 2]) -> Tag {
        Tag(value[0], value[1])
    }
}

/// A type for representing data set content length, in bytes.
///
/// An internal value of `0xFFFF_FFFF` represents an undefined (unspecified)
/// length, which is determined by a traversal based on the content's
/// encoding (a sequence or item delimiter).
///
/// Numeric comparisons and arithmetic do not behave the same as a plain
/// integer when either side is undefined:
///
/// ```
/// # use dicom_core::Length;
/// assert_ne!(Length::UNDEFINED, Length::UNDEFINED);
/// assert!((Length::defined(64) + Length::UNDEFINED).is_undefined());
/// assert!(!(Length::UNDEFINED < Length::defined(64)));
/// ```
#[derive(Clone, Copy)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// A length that is undefined.
    pub const UNDEFINED: Self = Length(UNDEFINED_LEN);

    /// Create a new length value from its internal representation.
    pub fn new(len: u32) -> Self {
        Length(len)
    }

    /// Create a new length value with the given number of bytes.
    ///
    /// # Panics
    ///
    /// Panics if `len` is the reserved undefined-length sentinel.
    pub fn defined(len: u32) -> Self {
        assert_ne!(len, UNDEFINED_LEN);
        Length(len)
    }

    /// Check whether this length is undefined.
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined (not undefined).
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if available.
    #[inline]
    pub fn get(self) -> Option<u32> {
        match self.0 {
            UNDEFINED_LEN => None,
            v => Some(v),
        }
    }
}

impl From<u32> for Length {
    fn from(o: u32) -> Self {
        Length(o)
    }
}

impl PartialEq<Length> for Length {
    fn eq(&self, rhs: &Length) -> bool {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => false,
            (l1, l2) => l1 == l2,
        }
    }
}

impl PartialOrd<Length> for Length {
    fn partial_cmp(&self, rhs: &Length) -> Option<Ordering> {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => None,
            (l1, l2) => Some(l1.cmp(&l2)),
        }
    }
}

impl std::ops::Add<Length> for Length {
    type Output = Self;

    fn add(self, rhs: Length) -> Self::Output {
        match (self.0, rhs.0) {
            (UNDEFINED_LEN, _) | (_, UNDEFINED_LEN) => Length::UNDEFINED,
            (l1, l2) => Length(l1 + l2),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("Length(Undefined)"),
            l => f.debug_tuple("Length").field(&l).finish(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            UNDEFINED_LEN => f.write_str("U/L"),
            l => write!(f, "{}", &l),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_from_u16_pair() {
        let t = Tag::from((0x0010u16, 0x0020u16));
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
    }

    #[test]
    fn tag_from_u16_array() {
        let t = Tag::from([0x0010u16, 0x0020u16]);
        assert_eq!(0x0010u16, t.group());
        assert_eq!(0x0020u16, t.element());
    }

    #[test]
    fn vr_category_matches_data_model() {
        assert_eq!(VR::IS.category(), VrCategory::Integer);
        assert_eq!(VR::AT.category(), VrCategory::Integer);
        assert_eq!(VR::DS.category(), VrCategory::Real);
        assert_eq!(VR::LO.category(), VrCategory::Str);
        assert_eq!(VR::SQ.category(), VrCategory::Sequence);
        assert_eq!(VR::OB.category(), VrCategory::Binary);
        assert_eq!(VR::UN.category(), VrCategory::Binary);
    }

    #[test]
    fn long_length_vrs() {
        assert!(VR::OB.has_explicit_long_length());
        assert!(VR::SQ.has_explicit_long_length());
        assert!(!VR::CS.has_explicit_long_length());
        assert!(!VR::US.has_explicit_long_length());
    }

    #[test]
    fn sequence_item_header_classification() {
        assert!(matches!(
            SequenceItemHeader::new(Tag(0xFFFE, 0xE000), Length(12)),
            Ok(SequenceItemHeader::Item { len: Length(12) })
        ));
        assert!(matches!(
            SequenceItemHeader::new(Tag(0xFFFE, 0xE00D), Length(0)),
            Ok(SequenceItemHeader::ItemDelimiter)
        ));
        assert!(matches!(
            SequenceItemHeader::new(Tag(0xFFFE, 0xE0DD), Length(0)),
            Ok(SequenceItemHeader::SequenceDelimiter)
        ));
        assert!(SequenceItemHeader::new(Tag(0x0008, 0x0018), Length(8)).is_err());
    }
}
