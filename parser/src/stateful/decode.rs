//! Module holding a stateful DICOM data decoding abstraction,
//! which also supports text decoding.

use crate::error::{
    CoreSnafu, DecodeSnafu, Error, IoSnafu, ParseIntegerSnafu, ParseRealSnafu, Result,
    TextDecodeSnafu, UndefinedValueLengthSnafu,
};
use dicom_core::dictionary::{find_vr, DataDictionary};
use dicom_core::header::{DataElementHeader, HasLength, Header, Length, SequenceItemHeader};
use dicom_core::value::{BinaryView, DataSet, Value, C};
use dicom_core::{Tag, VR};
use dicom_dictionary_std::StandardDataDictionary;
use dicom_encoding::decode::basic::BasicDecoder;
use dicom_encoding::decode::explicit_be::ExplicitVRBigEndianDecoder;
use dicom_encoding::decode::explicit_le::ExplicitVRLittleEndianDecoder;
use dicom_encoding::decode::{BasicDecode, Decode};
use dicom_encoding::text::SpecificCharacterSet;
use dicom_transfer_syntax_registry::TransferSyntax;
use snafu::{OptionExt, ResultExt};
use std::io::Read;

/// A stateful abstraction for reading the contents of a DICOM data set,
/// one data element at a time.
///
/// `S` is the type of the underlying reader.
#[derive(Debug)]
pub struct StatefulDecoder<S> {
    source: S,
    ts: TransferSyntax,
    basic: BasicDecoder,
    text: SpecificCharacterSet,
    /// the number of bytes read from the source so far
    position: u64,
}

impl<S> StatefulDecoder<S>
where
    S: Read,
{
    /// Create a new stateful decoder for the given transfer syntax and
    /// character set, starting at position 0.
    pub fn new(source: S, ts: TransferSyntax, text: SpecificCharacterSet) -> Self {
        let basic = BasicDecoder::new(if ts.is_little_endian() {
            dicom_encoding::Endianness::Little
        } else {
            dicom_encoding::Endianness::Big
        });
        StatefulDecoder {
            source,
            ts,
            basic,
            text,
            position: 0,
        }
    }

    /// The transfer syntax this decoder was built for.
    pub fn transfer_syntax(&self) -> TransferSyntax {
        self.ts
    }

    /// The active specific character set.
    pub fn character_set(&self) -> SpecificCharacterSet {
        self.text
    }

    /// Replace the active specific character set, used for string decoding
    /// from this point onward.
    pub fn set_character_set(&mut self, charset: SpecificCharacterSet) {
        self.text = charset;
    }

    /// The number of bytes read from the source so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.source.read_exact(buf).context(IoSnafu)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn decode_us(&mut self) -> Result<u16> {
        let v = self.basic.decode_us(&mut self.source).context(IoSnafu)?;
        self.position += 2;
        Ok(v)
    }

    fn decode_ul(&mut self) -> Result<u32> {
        let v = self.basic.decode_ul(&mut self.source).context(IoSnafu)?;
        self.position += 4;
        Ok(v)
    }

    fn decode_ss(&mut self) -> Result<i16> {
        let v = self.basic.decode_ss(&mut self.source).context(IoSnafu)?;
        self.position += 2;
        Ok(v)
    }

    fn decode_sl(&mut self) -> Result<i32> {
        let v = self.basic.decode_sl(&mut self.source).context(IoSnafu)?;
        self.position += 4;
        Ok(v)
    }

    fn decode_fl(&mut self) -> Result<f32> {
        let v = self.basic.decode_fl(&mut self.source).context(IoSnafu)?;
        self.position += 4;
        Ok(v)
    }

    fn decode_fd(&mut self) -> Result<f64> {
        let v = self.basic.decode_fd(&mut self.source).context(IoSnafu)?;
        self.position += 8;
        Ok(v)
    }

    /// Decode the next data element header, resolving its value
    /// representation against `data_set_so_far` when the transfer syntax is
    /// implicit VR (needed to disambiguate Pixel Data).
    pub fn decode_header(&mut self, data_set_so_far: &DataSet) -> Result<(DataElementHeader, usize)> {
        let (header, n) = if self.ts.is_explicit_vr() {
            if self.ts.is_little_endian() {
                ExplicitVRLittleEndianDecoder::default()
                    .decode_header(&mut self.source)
                    .context(DecodeSnafu)?
            } else {
                ExplicitVRBigEndianDecoder::default()
                    .decode_header(&mut self.source)
                    .context(DecodeSnafu)?
            }
        } else {
            self.implicit_decode_header(data_set_so_far)?
        };
        self.position += n as u64;
        Ok((header, n))
    }

    fn implicit_decode_header(&mut self, data_set_so_far: &DataSet) -> Result<(DataElementHeader, usize)> {
        let group = self.basic.decode_us(&mut self.source).context(IoSnafu)?;
        let element = self.basic.decode_us(&mut self.source).context(IoSnafu)?;
        let tag = Tag(group, element);
        let len = Length(self.basic.decode_ul(&mut self.source).context(IoSnafu)?);
        if tag.group() == 0xFFFE {
            return Ok((DataElementHeader::new(tag, VR::UN, len), 8));
        }
        let vr = find_vr(tag, data_set_so_far, &StandardDataDictionary);
        Ok((DataElementHeader::new(tag, vr, len), 8))
    }

    /// Decode the next sequence item header (an item, item delimiter, or
    /// sequence delimiter). These never carry a value representation.
    pub fn decode_item_header(&mut self) -> Result<SequenceItemHeader> {
        let tag = self.basic.decode_tag(&mut self.source).context(IoSnafu)?;
        let len = Length(self.basic.decode_ul(&mut self.source).context(IoSnafu)?);
        self.position += 8;
        SequenceItemHeader::new(tag, len).context(CoreSnafu)
    }

    fn defined_len(&self, header: &DataElementHeader) -> Result<u32> {
        header.len.get().context(UndefinedValueLengthSnafu {
            tag: header.tag(),
        })
    }

    /// Read the raw bytes of a value with a defined length into a single
    /// binary view, without any interpretation.
    pub fn read_raw_bytes(&mut self, len: u32) -> Result<BinaryView> {
        let buf = self.read_bytes(len as usize)?;
        Ok(BinaryView::from(buf))
    }

    /// Advance past `len` bytes of value data without interpreting them,
    /// for callers that already hold a view onto those bytes by other
    /// means (e.g. a sub-view of the original buffer).
    pub(crate) fn skip_value(&mut self, len: u32) -> Result<()> {
        self.read_bytes(len as usize)?;
        Ok(())
    }

    /// Read a primitive value following a previously decoded element header.
    ///
    /// Sequences (`VR::SQ`) and encapsulated pixel data (undefined length)
    /// are not handled here; they are the responsibility of the data set
    /// reader, which has the recursive context needed to parse them.
    pub fn read_value(&mut self, header: &DataElementHeader) -> Result<Value> {
        match header.vr {
            VR::AT => self.read_value_tags(header),
            VR::SL => self.read_value_sl(header),
            VR::SS => self.read_value_ss(header),
            VR::UL => self.read_value_ul(header),
            VR::US => self.read_value_us(header),
            VR::IS => self.read_value_is(header),
            VR::DS => self.read_value_ds(header),
            VR::FL => self.read_value_fl(header),
            VR::FD => self.read_value_fd(header),
            VR::LT | VR::ST | VR::UT => self.read_value_text(header),
            VR::SQ => unreachable!("sequences are read by the data set reader"),
            vr if vr.category() == dicom_core::header::VrCategory::Str => {
                self.read_value_strs(header, vr)
            }
            _ => self.read_value_binary(header),
        }
    }

    fn read_value_tags(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let count = (len / 4) as usize;
        let mut v = C::with_capacity(count);
        for _ in 0..count {
            let group = self.decode_us()?;
            let elem = self.decode_us()?;
            v.push(((group as i64) << 16) | elem as i64);
        }
        Ok(Value::Integers(v))
    }

    fn read_value_sl(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let count = (len / 4) as usize;
        let mut v = C::with_capacity(count);
        for _ in 0..count {
            v.push(self.decode_sl()? as i64);
        }
        Ok(Value::Integers(v))
    }

    fn read_value_ss(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let count = (len / 2) as usize;
        let mut v = C::with_capacity(count);
        for _ in 0..count {
            v.push(self.decode_ss()? as i64);
        }
        Ok(Value::Integers(v))
    }

    fn read_value_ul(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let count = (len / 4) as usize;
        let mut v = C::with_capacity(count);
        for _ in 0..count {
            v.push(self.decode_ul()? as i64);
        }
        Ok(Value::Integers(v))
    }

    fn read_value_us(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let count = (len / 2) as usize;
        let mut v = C::with_capacity(count);
        for _ in 0..count {
            v.push(self.decode_us()? as i64);
        }
        Ok(Value::Integers(v))
    }

    fn read_value_fl(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let count = (len / 4) as usize;
        let mut v = C::with_capacity(count);
        for _ in 0..count {
            v.push(self.decode_fl()? as f64);
        }
        Ok(Value::Reals(v))
    }

    fn read_value_fd(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let count = (len / 8) as usize;
        let mut v = C::with_capacity(count);
        for _ in 0..count {
            v.push(self.decode_fd()?);
        }
        Ok(Value::Reals(v))
    }

    fn read_value_is(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let bytes = self.read_bytes(len as usize)?;
        let text = self.text.decode(&bytes).context(TextDecodeSnafu)?;
        let text = trim_trailing_padding(&text);
        let mut v = C::new();
        for part in text.split('\\') {
            let part = part.trim();
            let n = part.parse::<i64>().context(ParseIntegerSnafu {
                text: part.to_string(),
                tag: header.tag(),
            })?;
            v.push(n);
        }
        Ok(Value::Integers(v))
    }

    fn read_value_ds(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let bytes = self.read_bytes(len as usize)?;
        let text = self.text.decode(&bytes).context(TextDecodeSnafu)?;
        let text = trim_trailing_padding(&text);
        let mut v = C::new();
        for part in text.split('\\') {
            let part = part.trim();
            let n = part.parse::<f64>().context(ParseRealSnafu {
                text: part.to_string(),
                tag: header.tag(),
            })?;
            v.push(n);
        }
        Ok(Value::Reals(v))
    }

    fn read_value_text(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let bytes = self.read_bytes(len as usize)?;
        let text = self.text.decode(&bytes).context(TextDecodeSnafu)?;
        let text = trim_trailing_padding(&text).to_string();
        Ok(Value::Strings(std::iter::once(text).collect()))
    }

    fn read_value_strs(&mut self, header: &DataElementHeader, _vr: VR) -> Result<Value> {
        let len = self.defined_len(header)?;
        let bytes = self.read_bytes(len as usize)?;
        let text = self.text.decode(&bytes).context(TextDecodeSnafu)?;
        let mut v = C::new();
        for part in text.split('\\') {
            v.push(trim_trailing_padding(part).to_string());
        }
        Ok(Value::Strings(v))
    }

    fn read_value_binary(&mut self, header: &DataElementHeader) -> Result<Value> {
        let len = self.defined_len(header)?;
        let view = self.read_raw_bytes(len)?;
        Ok(Value::Binaries(std::iter::once(view).collect()))
    }
}

/// Trim trailing space and NUL padding, common to every string VR.
fn trim_trailing_padding(text: &str) -> &str {
    text.trim_end_matches(|c| c == ' ' || c == '\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::header::Header;

    // manually crafting some DICOM data elements
    //  Tag: (0002,0002) Media Storage SOP Class UID
    //  VR: UI
    //  Length: 26
    //  Value: "1.2.840.10008.5.1.4.1.1.1\0"
    const RAW: &[u8; 34] = &[
        0x02, 0x00, 0x02, 0x00, 0x55, 0x49, 0x1a, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x38, 0x34, 0x30,
        0x2e, 0x31, 0x30, 0x30, 0x30, 0x38, 0x2e, 0x35, 0x2e, 0x31, 0x2e, 0x34, 0x2e, 0x31, 0x2e,
        0x31, 0x2e, 0x31, 0x00,
    ];

    fn explicit_vr_le() -> TransferSyntax {
        dicom_transfer_syntax_registry::TransferSyntaxRegistry
            .get("1.2.840.10008.1.2.1")
            .expect("Explicit VR Little Endian should be registered")
    }

    #[test]
    fn decode_data_element() {
        let cursor = &RAW[..];
        let mut decoder =
            StatefulDecoder::new(cursor, explicit_vr_le(), SpecificCharacterSet::default());

        let data_set = DataSet::new();
        let (header, bytes_read) = decoder.decode_header(&data_set).expect("should decode a header");
        assert_eq!(header.tag(), Tag(0x0002, 0x0002));
        assert_eq!(header.vr(), VR::UI);
        assert_eq!(header.length(), Length(26));
        assert_eq!(bytes_read, 8);
        assert_eq!(decoder.position(), 8);

        let value = decoder.read_value(&header).expect("should read a value");
        match value {
            Value::Strings(strs) => {
                assert_eq!(&strs[..], &["1.2.840.10008.5.1.4.1.1.1".to_string()]);
            }
            other => panic!("unexpected value {:?}", other),
        }
        assert_eq!(decoder.position(), 8 + 26);
    }

    #[test]
    fn trims_trailing_nul_from_non_ui_strings() {
        // (0008,0060) Modality, VR CS, length 4, value "CT\0\0"
        #[rustfmt::skip]
        const DATA: &[u8] = &[
            0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x04, 0x00,
            b'C', b'T', 0x00, 0x00,
        ];
        let mut decoder =
            StatefulDecoder::new(DATA, explicit_vr_le(), SpecificCharacterSet::default());
        let data_set = DataSet::new();
        let (header, _) = decoder.decode_header(&data_set).expect("should decode header");
        let value = decoder.read_value(&header).expect("should read a value");
        match value {
            Value::Strings(strs) => assert_eq!(&strs[..], &["CT".to_string()]),
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn decode_implicit_vr_pixel_data_disambiguation() {
        // (7FE0,0010) PixelData, length 4, implicit VR, no BitsAllocated present
        #[rustfmt::skip]
        const DATA: &[u8] = &[
            0xe0, 0x7f, 0x10, 0x00, // tag
            0x04, 0x00, 0x00, 0x00, // length: 4
            0x01, 0x02, 0x03, 0x04,
        ];
        let ts = dicom_transfer_syntax_registry::TransferSyntaxRegistry
            .get("1.2.840.10008.1.2")
            .expect("Implicit VR Little Endian should be registered");
        let mut decoder = StatefulDecoder::new(DATA, ts, SpecificCharacterSet::default());
        let data_set = DataSet::new();
        let (header, _) = decoder.decode_header(&data_set).expect("should decode header");
        assert_eq!(header.tag(), Tag(0x7FE0, 0x0010));
        // no BitsAllocated known, defaults to OW
        assert_eq!(header.vr(), VR::OW);
    }
}
