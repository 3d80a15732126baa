//! The element value model: a tagged union over the five value categories
//! used throughout the data set codec, plus the `Element` and `DataSet`
//! types built on top of it.

use crate::error::{CastValueError, Result};
use crate::header::{HasLength, Length, Tag, VR};
use smallvec::SmallVec;
use std::sync::Arc;

/// An aggregation of zero or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// A reference-counted, immutable byte buffer together with a sub-range
/// view into it. Cloning a `BinaryView` never copies the underlying bytes;
/// it only bumps the buffer's reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryView {
    buffer: Arc<[u8]>,
    offset: usize,
    length: usize,
}

impl BinaryView {
    /// Build a view spanning the whole of `buffer`.
    pub fn whole(buffer: Arc<[u8]>) -> Self {
        let length = buffer.len();
        BinaryView {
            buffer,
            offset: 0,
            length,
        }
    }

    /// Build a view over `buffer[offset..offset + length]`.
    ///
    /// # Panics
    ///
    /// Panics if the requested range is out of bounds for `buffer`.
    pub fn new(buffer: Arc<[u8]>, offset: usize, length: usize) -> Self {
        assert!(offset + length <= buffer.len());
        BinaryView {
            buffer,
            offset,
            length,
        }
    }

    /// Construct a sub-view of `self`, relative to its own start.
    ///
    /// # Panics
    ///
    /// Panics if the requested sub-range falls outside of `self`.
    pub fn sub_view(&self, offset: usize, length: usize) -> Self {
        assert!(offset + length <= self.length);
        BinaryView {
            buffer: self.buffer.clone(),
            offset: self.offset + offset,
            length,
        }
    }

    /// The number of bytes covered by this view.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether this view covers zero bytes.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Borrow the bytes covered by this view.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.length]
    }
}

impl AsRef<[u8]> for BinaryView {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for BinaryView {
    fn from(bytes: Vec<u8>) -> Self {
        let buffer: Arc<[u8]> = Arc::from(bytes.into_boxed_slice());
        BinaryView::whole(buffer)
    }
}

/// The category of a decoded value, mirroring the five populated arms of
/// [`Value`] plus the empty arm. Used in error reporting when a caller
/// requests an incompatible accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueType {
    /// `Value::Integers`
    Integers,
    /// `Value::Reals`
    Reals,
    /// `Value::Strings`
    Strings,
    /// `Value::DataSets`
    DataSets,
    /// `Value::Binaries`
    Binaries,
    /// `Value::Empty`
    Empty,
}

/// The value held by a data element: a tagged union over five value
/// kinds, plus an "empty" arm for elements whose value has not been set.
/// Only one arm is ever populated; which arm is populated is determined
/// entirely by the element's VR category.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed 64-bit integers. Used for IS, SL, SS, UL, US and AT (AT's
    /// tag pairs are packed into a single integer here).
    Integers(C<i64>),
    /// 64-bit floating point numbers. Used for DS, FD, FL.
    Reals(C<f64>),
    /// Byte strings, already split on the `\` delimiter and padding-trimmed
    /// (except for LT/ST/UT, which are kept single-valued).
    Strings(C<String>),
    /// A sequence of nested data sets (VR SQ).
    DataSets(C<DataSet>),
    /// A sequence of byte-range views. Used for plain binary VRs (a single
    /// entry) and for encapsulated pixel data (the offset table followed
    /// by one entry per fragment).
    Binaries(C<BinaryView>),
    /// No value has been set.
    Empty,
}

impl Value {
    /// The category of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integers(_) => ValueType::Integers,
            Value::Reals(_) => ValueType::Reals,
            Value::Strings(_) => ValueType::Strings,
            Value::DataSets(_) => ValueType::DataSets,
            Value::Binaries(_) => ValueType::Binaries,
            Value::Empty => ValueType::Empty,
        }
    }

    /// The number of individual entries held by the populated arm (0 for
    /// `Empty`).
    pub fn multiplicity(&self) -> usize {
        match self {
            Value::Integers(v) => v.len(),
            Value::Reals(v) => v.len(),
            Value::Strings(v) => v.len(),
            Value::DataSets(v) => v.len(),
            Value::Binaries(v) => v.len(),
            Value::Empty => 0,
        }
    }
}

impl HasLength for Value {
    fn length(&self) -> Length {
        match self {
            Value::Binaries(frags) if frags.len() > 1 => Length::UNDEFINED,
            Value::DataSets(_) => Length::UNDEFINED,
            Value::Integers(v) => Length::defined((v.len() * 8) as u32),
            Value::Reals(v) => Length::defined((v.len() * 8) as u32),
            Value::Strings(v) => {
                let joined: usize = v.iter().map(|s| s.len()).sum::<usize>() + v.len().saturating_sub(1);
                Length::defined(joined as u32)
            }
            Value::Binaries(frags) => Length::defined(frags.get(0).map(|v| v.len()).unwrap_or(0) as u32),
            Value::Empty => Length(0),
        }
    }
}

macro_rules! accessor {
    ($name:ident, $variant:ident, $ret:ty) => {
        /// Access the populated arm as `
        #[doc = stringify!($variant)]
        /// `, or fail if the value holds a different category.
        pub fn $name(&self) -> Result<&[$ret], CastValueError> {
            match self {
                Value::$variant(v) => Ok(v),
                _ => Err(CastValueError {
                    requested: stringify!($name),
                    got: self.value_type(),
                }),
            }
        }
    };
}

impl Value {
    accessor!(integers, Integers, i64);
    accessor!(reals, Reals, f64);
    accessor!(strings, Strings, String);
    accessor!(data_sets, DataSets, DataSet);
    accessor!(binaries, Binaries, BinaryView);

    /// Join all string components with `\` into a single owned string.
    /// Fails if this value is not `Strings`.
    pub fn to_joined_string(&self) -> Result<String, CastValueError> {
        Ok(self.strings()?.join("\\"))
    }
}

/// A VR plus a [`Value`]. An element is empty iff its value is the empty
/// arm, or the populated container holds zero entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    vr: VR,
    value: Value,
}

impl Element {
    /// Build an element from a VR and a value. Does not validate that the
    /// value's arm matches the VR's category; callers that decode from the
    /// wire are expected to have already dispatched on VR category.
    pub fn new(vr: VR, value: Value) -> Self {
        Element { vr, value }
    }

    /// Build an element with no value.
    pub fn empty(vr: VR) -> Self {
        Element {
            vr,
            value: Value::Empty,
        }
    }

    /// The element's value representation.
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// The element's value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether this element carries no value.
    pub fn is_empty(&self) -> bool {
        matches!(self.value, Value::Empty) || self.value.multiplicity() == 0
    }

    /// Whether the value category is `Integers`.
    pub fn is_int(&self) -> bool {
        matches!(self.value, Value::Integers(_))
    }

    /// Whether the value category is `Reals`.
    pub fn is_real(&self) -> bool {
        matches!(self.value, Value::Reals(_))
    }

    /// Whether the value category is `Strings`.
    pub fn is_string(&self) -> bool {
        matches!(self.value, Value::Strings(_))
    }

    /// Whether the value category is `DataSets`.
    pub fn is_data_set(&self) -> bool {
        matches!(self.value, Value::DataSets(_))
    }

    /// Whether the value category is `Binaries`.
    pub fn is_binary(&self) -> bool {
        matches!(self.value, Value::Binaries(_))
    }

    /// Access the first integer, if this element holds `Integers`.
    pub fn as_int(&self) -> Result<i64, CastValueError> {
        self.value.integers()?.first().copied().ok_or(CastValueError {
            requested: "as_int",
            got: self.value.value_type(),
        })
    }

    /// Access the first real number, if this element holds `Reals`.
    pub fn as_real(&self) -> Result<f64, CastValueError> {
        self.value.reals()?.first().copied().ok_or(CastValueError {
            requested: "as_real",
            got: self.value.value_type(),
        })
    }

    /// Access the joined string representation, if this element holds
    /// `Strings`.
    pub fn as_string(&self) -> Result<String, CastValueError> {
        self.value.to_joined_string()
    }

    /// Access the nested data sets, if this element holds `DataSets`.
    pub fn as_data_set(&self) -> Result<&[DataSet], CastValueError> {
        self.value.data_sets()
    }

    /// Access the binary fragments, if this element holds `Binaries`.
    pub fn as_binary(&self) -> Result<&[BinaryView], CastValueError> {
        self.value.binaries()
    }
}

impl HasLength for Element {
    fn length(&self) -> Length {
        self.value.length()
    }
}

/// The provenance of a data set read from a buffer: which buffer, which
/// sub-range, and under which transfer syntax it was decoded. Stored as a
/// plain UID string rather than a `TransferSyntax` value so that this
/// crate does not need to depend on the transfer syntax registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Provenance {
    /// The view into the shared buffer this data set was decoded from,
    /// if any (data sets built programmatically have none).
    pub view: Option<BinaryView>,
    /// The transfer syntax UID this data set was decoded under, if any.
    pub transfer_syntax_uid: Option<String>,
}

/// An ordered mapping from [`Tag`] to [`Element`]. Insertion order is
/// preserved; inserting an already-present tag overwrites its element in
/// place rather than appending a second entry (DICOM forbids duplicate
/// tags within one data set).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
    entries: Vec<(Tag, Element)>,
    index: std::collections::HashMap<Tag, usize>,
    /// Provenance of the bytes this data set was built from, if known.
    pub provenance: Provenance,
}

impl DataSet {
    /// Build an empty data set with no provenance.
    pub fn new() -> Self {
        DataSet::default()
    }

    /// Build an empty data set carrying the given provenance.
    pub fn with_provenance(provenance: Provenance) -> Self {
        DataSet {
            provenance,
            ..Default::default()
        }
    }

    /// Insert an element under `tag`, overwriting any prior element under
    /// the same tag while keeping its original position.
    pub fn insert(&mut self, tag: Tag, element: Element) {
        if let Some(&i) = self.index.get(&tag) {
            self.entries[i].1 = element;
        } else {
            self.index.insert(tag, self.entries.len());
            self.entries.push((tag, element));
        }
    }

    /// Look up an element by tag.
    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.index.get(&tag).map(|&i| &self.entries[i].1)
    }

    /// The number of distinct tags in this data set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether this data set contains the given tag.
    pub fn contains_tag(&self, tag: Tag) -> bool {
        self.index.contains_key(&tag)
    }

    /// Iterate over `(tag, element)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &Element)> {
        self.entries.iter().map(|(t, e)| (*t, e))
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = (Tag, &'a Element);
    type IntoIter = Box<dyn Iterator<Item = (Tag, &'a Element)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl FromIterator<(Tag, Element)> for DataSet {
    fn from_iter<T: IntoIterator<Item = (Tag, Element)>>(iter: T) -> Self {
        let mut ds = DataSet::new();
        for (tag, element) in iter {
            ds.insert(tag, element);
        }
        ds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn element_predicates_and_accessors() {
        let e = Element::new(VR::IS, Value::Integers(smallvec![7, -3]));
        assert!(e.is_int());
        assert!(!e.is_string());
        assert_eq!(e.as_int().unwrap(), 7);
        assert_eq!(e.value.integers().unwrap(), &[7, -3][..]);
    }

    #[test]
    fn element_is_empty() {
        let e = Element::empty(VR::LO);
        assert!(e.is_empty());
        let e = Element::new(VR::LO, Value::Strings(smallvec![]));
        assert!(e.is_empty());
        let e = Element::new(VR::LO, Value::Strings(smallvec!["a".to_owned()]));
        assert!(!e.is_empty());
    }

    #[test]
    fn data_set_insert_overwrites_in_place() {
        let mut ds = DataSet::new();
        ds.insert(Tag(0x0010, 0x0010), Element::new(VR::PN, Value::Strings(smallvec!["A".into()])));
        ds.insert(Tag(0x0010, 0x0020), Element::new(VR::LO, Value::Strings(smallvec!["B".into()])));
        ds.insert(Tag(0x0010, 0x0010), Element::new(VR::PN, Value::Strings(smallvec!["C".into()])));

        let tags: Vec<_> = ds.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec![Tag(0x0010, 0x0010), Tag(0x0010, 0x0020)]);
        assert_eq!(ds.get(Tag(0x0010, 0x0010)).unwrap().as_string().unwrap(), "C");
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn binary_view_sub_view_shares_buffer() {
        let view = BinaryView::from(vec![1, 2, 3, 4, 5]);
        let sub = view.sub_view(1, 3);
        assert_eq!(sub.as_bytes(), &[2, 3, 4]);
    }
}
