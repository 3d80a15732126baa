//! Module holding a stateful DICOM data encoding abstraction,
//! in a way which supports text encoding.

use crate::error::{EncodeSnafu, EncodeValueSnafu, Error, IoSnafu, Result, TextEncodeSnafu};
use dicom_core::header::{DataElementHeader, Header, Length};
use dicom_core::value::Value;
use dicom_core::{Tag, VR};
use dicom_encoding::encode::basic::{BasicEncoder, LittleEndianBasicEncoder, BigEndianBasicEncoder};
use dicom_encoding::encode::explicit_be::ExplicitVRBigEndianEncoder;
use dicom_encoding::encode::explicit_le::ExplicitVRLittleEndianEncoder;
use dicom_encoding::encode::{BasicEncode, Encode};
use dicom_encoding::text::SpecificCharacterSet;
use dicom_transfer_syntax_registry::TransferSyntax;
use snafu::ResultExt;
use std::io::Write;

/// A stateful abstraction for writing the contents of a DICOM data set,
/// one data element at a time.
///
/// `W` is the type of the underlying writer.
#[derive(Debug)]
pub struct StatefulEncoder<W> {
    to: W,
    ts: TransferSyntax,
    basic: BasicEncoder,
    text: SpecificCharacterSet,
    bytes_written: u64,
}

impl<W> StatefulEncoder<W>
where
    W: Write,
{
    /// Create a new stateful encoder for the given transfer syntax and
    /// character set.
    pub fn new(to: W, ts: TransferSyntax, text: SpecificCharacterSet) -> Self {
        let basic = if ts.is_little_endian() {
            BasicEncoder::LE(LittleEndianBasicEncoder)
        } else {
            BasicEncoder::BE(BigEndianBasicEncoder)
        };
        StatefulEncoder {
            to,
            ts,
            basic,
            text,
            bytes_written: 0,
        }
    }

    /// The transfer syntax this encoder was built for.
    pub fn transfer_syntax(&self) -> TransferSyntax {
        self.ts
    }

    /// Replace the active specific character set, used for string encoding
    /// from this point onward.
    pub fn set_character_set(&mut self, charset: SpecificCharacterSet) {
        self.text = charset;
    }

    /// The number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Write raw bytes directly to the underlying writer.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.to.write_all(bytes).context(IoSnafu)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Encode and write a data element header.
    pub fn encode_header(&mut self, tag: Tag, vr: VR, len: Length) -> Result<usize> {
        let n = if self.ts.is_explicit_vr() {
            let de = DataElementHeader::new(tag, vr, len);
            if self.ts.is_little_endian() {
                ExplicitVRLittleEndianEncoder::default()
                    .encode_element_header(&mut self.to, de)
                    .context(EncodeSnafu)?
            } else {
                ExplicitVRBigEndianEncoder::default()
                    .encode_element_header(&mut self.to, de)
                    .context(EncodeSnafu)?
            }
        } else {
            self.basic.encode_tag(&mut self.to, tag).context(IoSnafu)?;
            self.basic.encode_ul(&mut self.to, len.0).context(IoSnafu)?;
            8
        };
        self.bytes_written += n as u64;
        Ok(n)
    }

    /// Encode and write an item header.
    pub fn encode_item_header(&mut self, len: u32) -> Result<()> {
        self.basic
            .encode_tag(&mut self.to, Tag(0xFFFE, 0xE000))
            .context(IoSnafu)?;
        self.basic.encode_ul(&mut self.to, len).context(IoSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode and write an item delimiter.
    pub fn encode_item_delimiter(&mut self) -> Result<()> {
        self.basic
            .encode_tag(&mut self.to, Tag(0xFFFE, 0xE00D))
            .context(IoSnafu)?;
        self.basic.encode_ul(&mut self.to, 0).context(IoSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode and write a sequence delimiter.
    pub fn encode_sequence_delimiter(&mut self) -> Result<()> {
        self.basic
            .encode_tag(&mut self.to, Tag(0xFFFE, 0xE0DD))
            .context(IoSnafu)?;
        self.basic.encode_ul(&mut self.to, 0).context(IoSnafu)?;
        self.bytes_written += 8;
        Ok(())
    }

    /// Encode a primitive value to its wire-format bytes, without writing
    /// its header. The caller is expected to have already written a header
    /// whose length matches the returned buffer.
    pub fn encode_value_bytes(&mut self, tag: Tag, vr: VR, value: &Value) -> Result<Vec<u8>> {
        match vr {
            VR::AT => self.encode_value_tags(value),
            VR::SL => self.encode_value_sl(value),
            VR::SS => self.encode_value_ss(value),
            VR::UL => self.encode_value_ul(value),
            VR::US => self.encode_value_us(value),
            VR::FL => self.encode_value_fl(value),
            VR::FD => self.encode_value_fd(value),
            VR::IS => self.encode_value_is(tag, value),
            VR::DS => self.encode_value_ds(tag, value),
            vr if vr.category() == dicom_core::header::VrCategory::Str => {
                self.encode_value_strs(value, vr)
            }
            VR::SQ => unreachable!("sequences are written by the data set writer"),
            _ => self.encode_value_binary(tag, value),
        }
    }

    fn encode_value_tags(&mut self, value: &Value) -> Result<Vec<u8>> {
        let ints = value.integers().unwrap_or(&[]);
        let mut buf = Vec::with_capacity(ints.len() * 4);
        for &v in ints {
            let group = (v >> 16) as u16;
            let elem = (v & 0xFFFF) as u16;
            self.basic.encode_us(&mut buf, group).context(IoSnafu)?;
            self.basic.encode_us(&mut buf, elem).context(IoSnafu)?;
        }
        Ok(buf)
    }

    fn encode_value_sl(&mut self, value: &Value) -> Result<Vec<u8>> {
        let ints = value.integers().unwrap_or(&[]);
        let mut buf = Vec::with_capacity(ints.len() * 4);
        for &v in ints {
            self.basic.encode_sl(&mut buf, v as i32).context(IoSnafu)?;
        }
        Ok(buf)
    }

    fn encode_value_ss(&mut self, value: &Value) -> Result<Vec<u8>> {
        let ints = value.integers().unwrap_or(&[]);
        let mut buf = Vec::with_capacity(ints.len() * 2);
        for &v in ints {
            self.basic.encode_ss(&mut buf, v as i16).context(IoSnafu)?;
        }
        Ok(buf)
    }

    fn encode_value_ul(&mut self, value: &Value) -> Result<Vec<u8>> {
        let ints = value.integers().unwrap_or(&[]);
        let mut buf = Vec::with_capacity(ints.len() * 4);
        for &v in ints {
            self.basic.encode_ul(&mut buf, v as u32).context(IoSnafu)?;
        }
        Ok(buf)
    }

    fn encode_value_us(&mut self, value: &Value) -> Result<Vec<u8>> {
        let ints = value.integers().unwrap_or(&[]);
        let mut buf = Vec::with_capacity(ints.len() * 2);
        for &v in ints {
            self.basic.encode_us(&mut buf, v as u16).context(IoSnafu)?;
        }
        Ok(buf)
    }

    fn encode_value_fl(&mut self, value: &Value) -> Result<Vec<u8>> {
        let reals = value.reals().unwrap_or(&[]);
        let mut buf = Vec::with_capacity(reals.len() * 4);
        for &v in reals {
            self.basic.encode_fl(&mut buf, v as f32).context(IoSnafu)?;
        }
        Ok(buf)
    }

    fn encode_value_fd(&mut self, value: &Value) -> Result<Vec<u8>> {
        let reals = value.reals().unwrap_or(&[]);
        let mut buf = Vec::with_capacity(reals.len() * 8);
        for &v in reals {
            self.basic.encode_fd(&mut buf, v).context(IoSnafu)?;
        }
        Ok(buf)
    }

    fn encode_value_strs(&mut self, value: &Value, vr: VR) -> Result<Vec<u8>> {
        let strs = value.strings().unwrap_or(&[]);
        let joined = if vr == VR::LT || vr == VR::ST || vr == VR::UT {
            strs.first().cloned().unwrap_or_default()
        } else {
            strs.join("\\")
        };
        let mut bytes = self.text.encode(&joined).context(TextEncodeSnafu)?;
        if bytes.len() % 2 != 0 {
            let pad = if vr == VR::UI { 0u8 } else { b' ' };
            bytes.push(pad);
        }
        Ok(bytes)
    }

    /// Encode an `IS` (Integer String) value: its integers formatted as
    /// decimal ASCII text, multiple values joined by `\`, padded to an even
    /// length with a trailing space.
    fn encode_value_is(&mut self, tag: Tag, value: &Value) -> Result<Vec<u8>> {
        let ints = value.integers().context(EncodeValueSnafu { tag })?;
        let joined = ints
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\\");
        let mut bytes = self.text.encode(&joined).context(TextEncodeSnafu)?;
        if bytes.len() % 2 != 0 {
            bytes.push(b' ');
        }
        Ok(bytes)
    }

    /// Encode a `DS` (Decimal String) value: its reals formatted as decimal
    /// ASCII text, multiple values joined by `\`, padded to an even length
    /// with a trailing space.
    fn encode_value_ds(&mut self, tag: Tag, value: &Value) -> Result<Vec<u8>> {
        let reals = value.reals().context(EncodeValueSnafu { tag })?;
        let joined = reals
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\\");
        let mut bytes = self.text.encode(&joined).context(TextEncodeSnafu)?;
        if bytes.len() % 2 != 0 {
            bytes.push(b' ');
        }
        Ok(bytes)
    }

    fn encode_value_binary(&mut self, tag: Tag, value: &Value) -> Result<Vec<u8>> {
        let frags = value.binaries().context(EncodeValueSnafu { tag })?;
        match frags {
            [] => Ok(Vec::new()),
            [one] => Ok(one.as_bytes().to_vec()),
            _ => Ok(frags.iter().flat_map(|f| f.as_bytes().to_vec()).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::value::C;

    fn explicit_vr_le() -> TransferSyntax {
        dicom_transfer_syntax_registry::TransferSyntaxRegistry
            .get("1.2.840.10008.1.2.1")
            .expect("Explicit VR Little Endian should be registered")
    }

    #[test]
    fn encode_data_element() {
        let mut sink = Vec::new();
        let mut encoder =
            StatefulEncoder::new(&mut sink, explicit_vr_le(), SpecificCharacterSet::default());

        let tag = Tag(0x0002, 0x0002);
        let value = Value::Strings(C::from_vec(vec!["1.2.840.10008.5.1.4.1.1.1".to_string()]));
        let bytes = encoder.encode_value_bytes(tag, VR::UI, &value).unwrap();
        assert_eq!(bytes.len(), 26);
        encoder.encode_header(tag, VR::UI, Length(bytes.len() as u32)).unwrap();
        encoder.write_raw(&bytes).unwrap();

        assert_eq!(
            &sink[..],
            &[
                0x02, 0x00, 0x02, 0x00, 0x55, 0x49, 0x1a, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x38,
                0x34, 0x30, 0x2e, 0x31, 0x30, 0x30, 0x30, 0x38, 0x2e, 0x35, 0x2e, 0x31, 0x2e,
                0x34, 0x2e, 0x31, 0x2e, 0x31, 0x2e, 0x31, 0x00,
            ][..]
        );
    }

    #[test]
    fn encode_integers() {
        let mut sink = Vec::new();
        let mut encoder =
            StatefulEncoder::new(&mut sink, explicit_vr_le(), SpecificCharacterSet::default());
        let value = Value::Integers(C::from_vec(vec![1, 2]));
        let bytes = encoder
            .encode_value_bytes(Tag(0x0028, 0x0002), VR::US, &value)
            .unwrap();
        assert_eq!(bytes, vec![1, 0, 2, 0]);
    }

    #[test]
    fn encode_integer_string() {
        let mut sink = Vec::new();
        let mut encoder =
            StatefulEncoder::new(&mut sink, explicit_vr_le(), SpecificCharacterSet::default());
        let tag = Tag(0x0028, 0x0010);
        let value = Value::Integers(C::from_vec(vec![512, 1024]));
        let bytes = encoder.encode_value_bytes(tag, VR::IS, &value).unwrap();
        assert_eq!(bytes.len() % 2, 0);
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), "512\\1024");
    }

    #[test]
    fn encode_decimal_string_pads_to_even_length() {
        let mut sink = Vec::new();
        let mut encoder =
            StatefulEncoder::new(&mut sink, explicit_vr_le(), SpecificCharacterSet::default());
        let tag = Tag(0x0018, 0x0050);
        let value = Value::Reals(C::from_vec(vec![1.5]));
        let bytes = encoder.encode_value_bytes(tag, VR::DS, &value).unwrap();
        assert_eq!(bytes.len() % 2, 0);
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), "1.5 ");
    }

    #[test]
    fn encode_value_binary_rejects_wrong_value_kind() {
        let mut sink = Vec::new();
        let mut encoder =
            StatefulEncoder::new(&mut sink, explicit_vr_le(), SpecificCharacterSet::default());
        let tag = Tag(0x7fe0, 0x0010);
        let value = Value::Integers(C::from_vec(vec![1]));
        let err = encoder.encode_value_bytes(tag, VR::OB, &value).unwrap_err();
        assert!(matches!(err, Error::EncodeValue { .. }));
    }
}
