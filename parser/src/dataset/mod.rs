//! Recursive reading and writing of whole DICOM data sets.
//!
//! Unlike a token-stream interpretation, this module turns a data set
//! directly into (and out of) [`DataSet`], recursing into nested items
//! for sequences and handling the special framing rules for undefined
//! lengths and encapsulated pixel data along the way.

mod sparse;

pub use sparse::{read_sparse_data_set, read_sparse_data_set_until, SparseDataSet};

use crate::error::{Error, Result, UndefinedValueLengthSnafu, UnexpectedElementSnafu};
use crate::stateful::decode::StatefulDecoder;
use crate::stateful::encode::StatefulEncoder;
use dicom_core::header::{DataElementHeader, Header, Length, SequenceItemHeader};
use dicom_core::value::{BinaryView, DataSet, Element, Value, C};
use dicom_core::{Tag, VR};
use dicom_encoding::text::SpecificCharacterSet;
use snafu::OptionExt;
use std::io::{Read, Write};

const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
const ITEM: Tag = Tag(0xFFFE, 0xE000);
const ITEM_DELIMITER: Tag = Tag(0xFFFE, 0xE00D);
const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Read a whole data set from `decoder`, stopping gracefully at the end
/// of the stream.
pub fn read_data_set<S>(decoder: &mut StatefulDecoder<S>) -> Result<DataSet>
where
    S: Read,
{
    let mut data_set = DataSet::new();
    loop {
        match decoder.decode_header(&data_set) {
            Ok((header, _)) => read_element(decoder, &mut data_set, header)?,
            Err(e) if e.is_eof() => break,
            Err(e) => return Err(e),
        }
    }
    Ok(data_set)
}

/// Write a whole data set to `encoder`, in insertion order.
pub fn write_data_set<W>(encoder: &mut StatefulEncoder<W>, data_set: &DataSet) -> Result<()>
where
    W: Write,
{
    for (tag, element) in data_set.iter() {
        write_element(encoder, tag, element)?;
    }
    Ok(())
}

fn read_element<S>(
    decoder: &mut StatefulDecoder<S>,
    data_set: &mut DataSet,
    header: DataElementHeader,
) -> Result<()>
where
    S: Read,
{
    let tag = header.tag();

    let element = if header.vr == VR::SQ {
        let items = read_sequence(decoder, header.len)?;
        Element::new(VR::SQ, Value::DataSets(items))
    } else if tag == PIXEL_DATA && header.len.is_undefined() {
        let fragments = read_encapsulated_pixel_data(decoder)?;
        Element::new(header.vr, Value::Binaries(fragments))
    } else {
        let value = decoder.read_value(&header)?;
        Element::new(header.vr, value)
    };

    if tag == SPECIFIC_CHARACTER_SET {
        apply_character_set(element.as_string().ok(), |cs| decoder.set_character_set(cs));
    }

    data_set.insert(tag, element);
    Ok(())
}

fn read_sequence<S>(decoder: &mut StatefulDecoder<S>, len: Length) -> Result<C<DataSet>>
where
    S: Read,
{
    let mut items = C::new();
    let end = len.get().map(|l| decoder.position() + l as u64);
    loop {
        if let Some(end) = end {
            if decoder.position() >= end {
                break;
            }
        }
        match decoder.decode_item_header()? {
            SequenceItemHeader::Item { len: item_len } => {
                items.push(read_item(decoder, item_len)?);
            }
            SequenceItemHeader::SequenceDelimiter => break,
            SequenceItemHeader::ItemDelimiter => {
                return UnexpectedElementSnafu { tag: ITEM_DELIMITER }.fail()
            }
        }
    }
    Ok(items)
}

fn read_item<S>(decoder: &mut StatefulDecoder<S>, len: Length) -> Result<DataSet>
where
    S: Read,
{
    match len.get() {
        Some(len) => read_item_defined(decoder, len),
        None => read_item_until_delimiter(decoder),
    }
}

fn read_item_defined<S>(decoder: &mut StatefulDecoder<S>, len: u32) -> Result<DataSet>
where
    S: Read,
{
    let mut item = DataSet::new();
    let end = decoder.position() + len as u64;
    while decoder.position() < end {
        let (header, _) = decoder.decode_header(&item)?;
        read_element(decoder, &mut item, header)?;
    }
    Ok(item)
}

fn read_item_until_delimiter<S>(decoder: &mut StatefulDecoder<S>) -> Result<DataSet>
where
    S: Read,
{
    let mut item = DataSet::new();
    loop {
        let (header, _) = decoder.decode_header(&item)?;
        if header.tag() == ITEM_DELIMITER {
            break;
        }
        if header.tag().group() == 0xFFFE {
            return UnexpectedElementSnafu { tag: header.tag() }.fail();
        }
        read_element(decoder, &mut item, header)?;
    }
    Ok(item)
}

fn read_encapsulated_pixel_data<S>(decoder: &mut StatefulDecoder<S>) -> Result<C<BinaryView>>
where
    S: Read,
{
    let mut fragments = C::new();
    loop {
        match decoder.decode_item_header()? {
            SequenceItemHeader::Item { len } => {
                let len = len.get().context(UndefinedValueLengthSnafu { tag: ITEM })?;
                fragments.push(decoder.read_raw_bytes(len)?);
            }
            SequenceItemHeader::SequenceDelimiter => break,
            SequenceItemHeader::ItemDelimiter => {
                return UnexpectedElementSnafu { tag: ITEM_DELIMITER }.fail()
            }
        }
    }
    Ok(fragments)
}

fn write_element<W>(encoder: &mut StatefulEncoder<W>, tag: Tag, element: &Element) -> Result<()>
where
    W: Write,
{
    if tag == SPECIFIC_CHARACTER_SET {
        apply_character_set(element.as_string().ok(), |cs| encoder.set_character_set(cs));
    }

    match element.value() {
        Value::DataSets(items) => write_sequence(encoder, tag, items),
        Value::Binaries(frags) if frags.len() > 1 => {
            write_encapsulated_pixel_data(encoder, tag, element.vr(), frags)
        }
        value => {
            let bytes = encoder.encode_value_bytes(tag, element.vr(), value)?;
            encoder.encode_header(tag, element.vr(), Length::defined(bytes.len() as u32))?;
            encoder.write_raw(&bytes)
        }
    }
}

fn write_sequence<W>(encoder: &mut StatefulEncoder<W>, tag: Tag, items: &[DataSet]) -> Result<()>
where
    W: Write,
{
    encoder.encode_header(tag, VR::SQ, Length::UNDEFINED)?;
    for item in items {
        write_item(encoder, item)?;
    }
    encoder.encode_sequence_delimiter()
}

fn write_item<W>(encoder: &mut StatefulEncoder<W>, item: &DataSet) -> Result<()>
where
    W: Write,
{
    encoder.encode_item_header(Length::UNDEFINED.0)?;
    for (tag, element) in item.iter() {
        write_element(encoder, tag, element)?;
    }
    encoder.encode_item_delimiter()
}

fn write_encapsulated_pixel_data<W>(
    encoder: &mut StatefulEncoder<W>,
    tag: Tag,
    vr: VR,
    frags: &[BinaryView],
) -> Result<()>
where
    W: Write,
{
    encoder.encode_header(tag, vr, Length::UNDEFINED)?;
    for frag in frags {
        encoder.encode_item_header(frag.len() as u32)?;
        encoder.write_raw(frag.as_bytes())?;
    }
    encoder.encode_sequence_delimiter()
}

fn apply_character_set(value: Option<String>, mut set: impl FnMut(SpecificCharacterSet)) {
    if let Some(code) = value {
        if let Some(charset) = SpecificCharacterSet::from_code(code.trim()) {
            set(charset);
        }
    }
}
