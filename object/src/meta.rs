//! Reading and writing of the file meta information group: the (0002,xxxx)
//! elements that precede every DICOM body and name its transfer syntax.

use dicom_core::value::{DataSet, Element};
use dicom_core::Tag;
use dicom_encoding::text::SpecificCharacterSet;
use dicom_parser::stateful::decode::StatefulDecoder;
use dicom_parser::stateful::encode::StatefulEncoder;
use dicom_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::Write;

/// Length of the opaque preamble at the start of a DICOM file.
pub const PREAMBLE_LEN: usize = 128;

const DICM_MAGIC_CODE: [u8; 4] = *b"DICM";

/// Errors that can occur while reading or writing a file meta group.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The source is shorter than a preamble, magic code, and at least
    /// one meta element.
    #[snafu(display("source is too short to hold a DICOM file header"))]
    Truncated { backtrace: Backtrace },

    /// The 4 bytes following the preamble were not `DICM`.
    #[snafu(display("invalid DICOM file: missing `DICM` prefix"))]
    NotDicom { backtrace: Backtrace },

    #[snafu(display("could not decode file meta group element"))]
    DecodeHeader {
        #[snafu(backtrace)]
        source: dicom_parser::error::Error,
    },

    #[snafu(display("could not decode the value of {}", tag))]
    DecodeValue {
        tag: Tag,
        #[snafu(backtrace)]
        source: dicom_parser::error::Error,
    },

    #[snafu(display("could not write the file meta group"))]
    WriteMeta {
        #[snafu(backtrace)]
        source: dicom_parser::error::Error,
    },

    #[snafu(display("could not write preamble or magic code"))]
    WriteHeader {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Validate the preamble and `DICM` prefix, then decode the file meta
/// group (group 0002) from `buf` as Explicit VR Little Endian, stopping
/// at the first element whose tag is not in group 0002.
///
/// Returns the meta-info data set and the byte offset in `buf` at which
/// the body (in whatever transfer syntax the meta-info names) begins.
pub fn read_meta(buf: &[u8]) -> Result<(DataSet, usize)> {
    if buf.len() < PREAMBLE_LEN + DICM_MAGIC_CODE.len() {
        return TruncatedSnafu.fail();
    }
    if buf[PREAMBLE_LEN..PREAMBLE_LEN + DICM_MAGIC_CODE.len()] != DICM_MAGIC_CODE {
        return NotDicomSnafu.fail();
    }
    let meta_start = PREAMBLE_LEN + DICM_MAGIC_CODE.len();

    let mut decoder = StatefulDecoder::new(
        &buf[meta_start..],
        EXPLICIT_VR_LITTLE_ENDIAN,
        SpecificCharacterSet::default(),
    );
    let mut meta = DataSet::new();
    loop {
        let before = decoder.position();
        match decoder.decode_header(&meta) {
            Ok((header, _)) => {
                if header.tag().group() != 0x0002 {
                    return Ok((meta, meta_start + before as usize));
                }
                let tag = header.tag();
                let value = decoder.read_value(&header).context(DecodeValueSnafu { tag })?;
                meta.insert(tag, Element::new(header.vr, value));
            }
            Err(e) if e.is_eof() => {
                return Ok((meta, meta_start + decoder.position() as usize));
            }
            Err(source) => return Err(source).context(DecodeHeaderSnafu),
        }
    }
}

/// Write the preamble, `DICM` prefix, and the file meta group (as Explicit
/// VR Little Endian) to `to`.
pub fn write_meta<W: Write>(mut to: W, meta: &DataSet) -> Result<()> {
    to.write_all(&[0u8; PREAMBLE_LEN]).context(WriteHeaderSnafu)?;
    to.write_all(&DICM_MAGIC_CODE).context(WriteHeaderSnafu)?;

    let mut encoder = StatefulEncoder::new(
        &mut to,
        EXPLICIT_VR_LITTLE_ENDIAN,
        SpecificCharacterSet::default(),
    );
    dicom_parser::dataset::write_data_set(&mut encoder, meta).context(WriteMetaSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::value::Value;
    use dicom_core::VR;
    use dicom_dictionary_std::tags;

    #[test]
    fn reads_the_minimal_file() {
        let mut buf = vec![0u8; PREAMBLE_LEN];
        buf.extend_from_slice(b"DICM");
        // (0002,0000) UL 4 0x00000000
        buf.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00]);
        buf.extend_from_slice(&0u32.to_le_bytes());
        // (0002,0010) UI "1.2.840.10008.1.2"
        let ts_uid = b"1.2.840.10008.1.2";
        buf.extend_from_slice(&[0x02, 0x00, 0x10, 0x00, b'U', b'I']);
        buf.extend_from_slice(&(ts_uid.len() as u16).to_le_bytes());
        buf.extend_from_slice(ts_uid);

        let (meta, body_start) = read_meta(&buf).expect("should read minimal meta group");
        assert_eq!(meta.len(), 2);
        assert!(meta.contains_tag(tags::FILE_META_INFORMATION_GROUP_LENGTH));
        let ts = meta.get(tags::TRANSFER_SYNTAX_UID).unwrap();
        assert_eq!(ts.as_string().unwrap(), "1.2.840.10008.1.2");
        assert_eq!(body_start, buf.len());
    }

    #[test]
    fn rejects_missing_magic_code() {
        let mut buf = vec![0u8; PREAMBLE_LEN];
        buf.extend_from_slice(b"NOPE");
        let err = read_meta(&buf).unwrap_err();
        assert!(matches!(err, Error::NotDicom { .. }));
    }

    #[test]
    fn round_trips_through_bytes() {
        let mut meta = DataSet::new();
        meta.insert(
            tags::TRANSFER_SYNTAX_UID,
            Element::new(
                VR::UI,
                Value::Strings(dicom_core::value::C::from_vec(vec![
                    "1.2.840.10008.1.2".to_string(),
                ])),
            ),
        );
        let mut out = Vec::new();
        write_meta(&mut out, &meta).expect("should write the meta group");
        let (read_back, _) = read_meta(&out).expect("should read the meta group back");
        let ts = read_back.get(tags::TRANSFER_SYNTAX_UID).unwrap();
        assert_eq!(ts.as_string().unwrap(), "1.2.840.10008.1.2");
    }
}
