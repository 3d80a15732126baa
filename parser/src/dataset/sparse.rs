//! Lazy, view-based reading of a data set (§3 `SparseDataSet`).
//!
//! Unlike [`super::read_data_set`], which materializes every element's
//! value up front, [`read_sparse_data_set`] only resolves each element's
//! tag, VR and byte extent during the scan, keeping a [`BinaryView`] onto
//! the (shared, reference-counted) source buffer for each one. An element's
//! value is decoded the first time it is looked up through
//! [`SparseDataSet::get`], and the result is cached from then on.
//!
//! Sequences and encapsulated pixel data are the exception: their extent
//! can only be found by recursing into their contents, so they are
//! decoded eagerly during the scan like [`super::read_data_set`] would,
//! and stored already materialized.

use super::{
    apply_character_set, read_encapsulated_pixel_data, read_sequence, PIXEL_DATA,
    SPECIFIC_CHARACTER_SET,
};
use crate::error::Result;
use crate::stateful::decode::StatefulDecoder;
use dicom_core::header::{DataElementHeader, Header, Length};
use dicom_core::value::{BinaryView, Element, Value};
use dicom_core::{Tag, VR};
use dicom_encoding::text::SpecificCharacterSet;
use dicom_transfer_syntax_registry::TransferSyntax;
use snafu::OptionExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum SparseSlot {
    /// Not yet decoded: a view onto the value bytes, the VR needed to
    /// interpret them, and the character set active at the time this
    /// element was scanned.
    Raw {
        vr: VR,
        view: BinaryView,
        charset: SpecificCharacterSet,
    },
    /// Already decoded, either from a previous `get()` or because this
    /// entry required eager recursion (sequences, encapsulated pixel data).
    Decoded(Element),
}

/// A data set whose elements are decoded from their source bytes lazily,
/// on first access, rather than all at once.
///
/// `sparse.get(tag)` always produces the same [`Element`] that
/// [`super::read_data_set`] would have produced for the same tag from the
/// same bytes: both paths decode a given VR's bytes through the identical
/// `StatefulDecoder` logic.
#[derive(Debug)]
pub struct SparseDataSet {
    ts: TransferSyntax,
    order: Vec<Tag>,
    slots: RefCell<HashMap<Tag, SparseSlot>>,
}

impl SparseDataSet {
    /// The number of elements present (decoded or not).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether this data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether an element with this tag was scanned.
    pub fn contains_tag(&self, tag: Tag) -> bool {
        self.slots.borrow().contains_key(&tag)
    }

    /// Tags present in this data set, in the order they were scanned.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.order.iter().copied()
    }

    /// Decode (or return the already-cached decode of) the element at
    /// `tag`. Returns `None` if no element with this tag was scanned.
    pub fn get(&self, tag: Tag) -> Option<Result<Element>> {
        let mut slots = self.slots.borrow_mut();
        let (vr, view, charset) = match slots.get(&tag)? {
            SparseSlot::Decoded(element) => return Some(Ok(element.clone())),
            SparseSlot::Raw { vr, view, charset } => (*vr, view.clone(), charset.clone()),
        };

        let mut decoder = StatefulDecoder::new(view.as_bytes(), self.ts, charset);
        let header = DataElementHeader::new(tag, vr, Length::defined(view.len() as u32));
        let result = decoder.read_value(&header).map(|value| Element::new(vr, value));
        if let Ok(element) = &result {
            slots.insert(tag, SparseSlot::Decoded(element.clone()));
        }
        Some(result)
    }

    /// Decode every entry and collect them into a plain, eager
    /// [`super::DataSet`]-equivalent map (§8 "SparseDataSet consistency").
    pub fn to_eager(&self) -> Result<dicom_core::value::DataSet> {
        let mut data_set = dicom_core::value::DataSet::new();
        for tag in &self.order {
            let element = self.get(*tag).expect("tag came from `order`")?;
            data_set.insert(*tag, element);
        }
        Ok(data_set)
    }
}

/// Scan `buffer` into a [`SparseDataSet`], never halting before EOF.
pub fn read_sparse_data_set(
    buffer: Arc<[u8]>,
    ts: TransferSyntax,
    charset: SpecificCharacterSet,
) -> Result<SparseDataSet> {
    let (sparse, _) = read_sparse_data_set_until(buffer, ts, charset, |_| false)?;
    Ok(sparse)
}

/// Scan `buffer` into a [`SparseDataSet`], stopping and rewinding to just
/// before the first tag for which `halt` returns `true` (§4.7's halt
/// predicate — used for the file meta-info group boundary). Returns the
/// sparse data set plus the byte offset in `buffer` at which a subsequent
/// reader should resume.
pub fn read_sparse_data_set_until(
    buffer: Arc<[u8]>,
    ts: TransferSyntax,
    charset: SpecificCharacterSet,
    mut halt: impl FnMut(Tag) -> bool,
) -> Result<(SparseDataSet, usize)> {
    let mut decoder = StatefulDecoder::new(&buffer[..], ts, charset);
    let mut order = Vec::new();
    let mut slots = HashMap::new();
    // Kept alongside the sparse entries only to resolve implicit VR's
    // Pixel Data disambiguation, which inspects BitsAllocated.
    let mut seen = dicom_core::value::DataSet::new();

    loop {
        let start = decoder.position() as usize;
        match decoder.decode_header(&seen) {
            Ok((header, _)) => {
                let tag = header.tag();
                if halt(tag) {
                    return Ok((
                        SparseDataSet {
                            ts,
                            order,
                            slots: RefCell::new(slots),
                        },
                        start,
                    ));
                }

                let entry_charset = decoder.character_set();
                if header.vr == VR::SQ {
                    let items = read_sequence(&mut decoder, header.len)?;
                    let element = Element::new(VR::SQ, Value::DataSets(items));
                    order.push(tag);
                    seen.insert(tag, element.clone());
                    slots.insert(tag, SparseSlot::Decoded(element));
                } else if tag == PIXEL_DATA && header.len.is_undefined() {
                    let fragments = read_encapsulated_pixel_data(&mut decoder)?;
                    let element = Element::new(header.vr, Value::Binaries(fragments));
                    order.push(tag);
                    seen.insert(tag, element.clone());
                    slots.insert(tag, SparseSlot::Decoded(element));
                } else if tag == SPECIFIC_CHARACTER_SET {
                    // Decoded eagerly (and applied immediately) so that
                    // later entries in this scan record the right active
                    // character set, rather than the one in effect before
                    // this element.
                    let value = decoder.read_value(&header)?;
                    let element = Element::new(header.vr, value);
                    apply_character_set(element.as_string().ok(), |cs| decoder.set_character_set(cs));
                    order.push(tag);
                    seen.insert(tag, element.clone());
                    slots.insert(tag, SparseSlot::Decoded(element));
                } else {
                    let len = header
                        .len
                        .get()
                        .context(crate::error::UndefinedValueLengthSnafu { tag })?;
                    let value_start = decoder.position() as usize;
                    decoder.skip_value(len)?;
                    let view = BinaryView::new(buffer.clone(), value_start, len as usize);
                    order.push(tag);
                    slots.insert(
                        tag,
                        SparseSlot::Raw {
                            vr: header.vr,
                            view,
                            charset: entry_charset,
                        },
                    );
                }
            }
            Err(e) if e.is_eof() => {
                return Ok((
                    SparseDataSet {
                        ts,
                        order,
                        slots: RefCell::new(slots),
                    },
                    decoder.position() as usize,
                ));
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_data_set;
    use dicom_encoding::text::SpecificCharacterSet;

    fn explicit_vr_le() -> TransferSyntax {
        dicom_transfer_syntax_registry::TransferSyntaxRegistry
            .get("1.2.840.10008.1.2.1")
            .expect("Explicit VR Little Endian should be registered")
    }

    fn sample_bytes() -> Arc<[u8]> {
        // (0010,0010) PatientName "Doe^John" (explicit VR, PN)
        #[rustfmt::skip]
        const RAW: &[u8] = &[
            0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x08, 0x00,
            b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
        ];
        Arc::from(RAW.to_vec().into_boxed_slice())
    }

    #[test]
    fn sparse_matches_eager_for_the_same_bytes() {
        let buffer = sample_bytes();
        let sparse = read_sparse_data_set(buffer.clone(), explicit_vr_le(), SpecificCharacterSet::default())
            .expect("should scan the sparse data set");

        let mut decoder =
            StatefulDecoder::new(&buffer[..], explicit_vr_le(), SpecificCharacterSet::default());
        let eager = read_data_set(&mut decoder).expect("should read the eager data set");

        assert_eq!(sparse.len(), eager.len());
        let tag = Tag(0x0010, 0x0010);
        let sparse_element = sparse.get(tag).expect("tag present").expect("should decode");
        let eager_element = eager.get(tag).expect("tag present");
        assert_eq!(&sparse_element, eager_element);
    }

    #[test]
    fn sparse_get_caches_after_first_access() {
        let buffer = sample_bytes();
        let sparse = read_sparse_data_set(buffer, explicit_vr_le(), SpecificCharacterSet::default())
            .expect("should scan the sparse data set");
        let tag = Tag(0x0010, 0x0010);

        let first = sparse.get(tag).unwrap().unwrap();
        let second = sparse.get(tag).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn halts_before_the_given_tag() {
        let buffer = sample_bytes();
        let (sparse, offset) = read_sparse_data_set_until(
            buffer.clone(),
            explicit_vr_le(),
            SpecificCharacterSet::default(),
            |tag| tag == Tag(0x0010, 0x0010),
        )
        .expect("should scan up to the halting tag");

        assert!(sparse.is_empty());
        assert_eq!(offset, 0);
    }
}
