//! Whole-file reading and writing: preamble, `DICM` prefix, meta-info
//! group, and body, tied together by the transfer syntax named in
//! (0002,0010).

use crate::meta::{self, PREAMBLE_LEN};
use dicom_core::value::DataSet;
use dicom_encoding::text::SpecificCharacterSet;
use dicom_parser::dataset::{read_data_set, write_data_set};
use dicom_parser::stateful::decode::StatefulDecoder;
use dicom_parser::stateful::encode::StatefulEncoder;
use dicom_transfer_syntax_registry::TransferSyntaxRegistry;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Errors that can occur while reading or writing a whole DICOM file.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("could not read from source"))]
    ReadSource {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("could not open file"))]
    OpenFile {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("could not read file meta group"))]
    ReadMeta {
        #[snafu(backtrace)]
        source: meta::Error,
    },

    #[snafu(display("could not write file meta group"))]
    WriteMeta {
        #[snafu(backtrace)]
        source: meta::Error,
    },

    #[snafu(display("missing data element `{}`", name))]
    MissingElement {
        name: &'static str,
        backtrace: Backtrace,
    },

    #[snafu(display("unsupported transfer syntax `{}`", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },

    #[snafu(display("could not decode the body data set"))]
    DecodeBody {
        #[snafu(backtrace)]
        source: dicom_parser::error::Error,
    },

    #[snafu(display("could not encode the body data set"))]
    EncodeBody {
        #[snafu(backtrace)]
        source: dicom_parser::error::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The pair of data sets decoded from (or destined for) a DICOM file: the
/// meta-info group and the body.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDataSets {
    pub meta: DataSet,
    pub body: DataSet,
}

fn transfer_syntax_uid(meta: &DataSet) -> Result<String> {
    let element = meta
        .get(dicom_dictionary_std::tags::TRANSFER_SYNTAX_UID)
        .context(MissingElementSnafu {
            name: "TransferSyntaxUID",
        })?;
    let uid = element.as_string().ok().context(MissingElementSnafu {
        name: "TransferSyntaxUID",
    })?;
    Ok(uid.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()).to_string())
}

/// Validate the preamble and `DICM` prefix, decode the meta-info group,
/// resolve its transfer syntax, and decode the body accordingly.
pub fn read_file_bytes(buf: &[u8]) -> Result<FileDataSets> {
    let (meta, body_start) = meta::read_meta(buf).context(ReadMetaSnafu)?;
    let ts_uid = transfer_syntax_uid(&meta)?;
    let ts = TransferSyntaxRegistry
        .get(&ts_uid)
        .context(UnsupportedTransferSyntaxSnafu { uid: ts_uid })?;

    let mut decoder =
        StatefulDecoder::new(&buf[body_start..], ts, SpecificCharacterSet::default());
    let body = read_data_set(&mut decoder).context(DecodeBodySnafu)?;

    Ok(FileDataSets { meta, body })
}

/// Read a whole DICOM file from any [`Read`] source.
pub fn read_file<R: Read>(mut source: R) -> Result<FileDataSets> {
    let mut buf = Vec::new();
    source.read_to_end(&mut buf).context(ReadSourceSnafu)?;
    read_file_bytes(&buf)
}

/// Read a whole DICOM file from the given path.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<FileDataSets> {
    let file = File::open(path).context(OpenFileSnafu)?;
    read_file(file)
}

/// Write the preamble, `DICM` prefix, meta-info group, and body to `to`,
/// using the transfer syntax named by (0002,0010) in `data.meta` for the
/// body.
pub fn write_file<W: Write>(mut to: W, data: &FileDataSets) -> Result<()> {
    meta::write_meta(&mut to, &data.meta).context(WriteMetaSnafu)?;

    let ts_uid = transfer_syntax_uid(&data.meta)?;
    let ts = TransferSyntaxRegistry
        .get(&ts_uid)
        .context(UnsupportedTransferSyntaxSnafu { uid: ts_uid })?;

    let mut encoder = StatefulEncoder::new(&mut to, ts, SpecificCharacterSet::default());
    write_data_set(&mut encoder, &data.body).context(EncodeBodySnafu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::value::{Element, Value, C};
    use dicom_core::{Tag, VR};
    use dicom_dictionary_std::tags;

    fn minimal_meta() -> DataSet {
        let mut meta = DataSet::new();
        meta.insert(
            tags::FILE_META_INFORMATION_GROUP_LENGTH,
            Element::new(VR::UL, Value::Integers(C::from_vec(vec![0]))),
        );
        meta.insert(
            tags::TRANSFER_SYNTAX_UID,
            Element::new(
                VR::UI,
                Value::Strings(C::from_vec(vec!["1.2.840.10008.1.2".to_string()])),
            ),
        );
        meta
    }

    #[test]
    fn reads_the_minimal_file_end_to_end() {
        let mut buf = vec![0u8; PREAMBLE_LEN];
        buf.extend_from_slice(b"DICM");
        buf.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00]);
        buf.extend_from_slice(&0u32.to_le_bytes());
        let ts_uid = b"1.2.840.10008.1.2";
        buf.extend_from_slice(&[0x02, 0x00, 0x10, 0x00, b'U', b'I']);
        buf.extend_from_slice(&(ts_uid.len() as u16).to_le_bytes());
        buf.extend_from_slice(ts_uid);

        let data = read_file_bytes(&buf).expect("should read the minimal file");
        assert_eq!(data.meta.len(), 2);
        assert!(data.body.is_empty());
    }

    #[test]
    fn unknown_transfer_syntax_is_rejected() {
        let mut meta = DataSet::new();
        meta.insert(
            tags::TRANSFER_SYNTAX_UID,
            Element::new(
                VR::UI,
                Value::Strings(C::from_vec(vec!["1.2.3.4.5.6.7.8.9".to_string()])),
            ),
        );
        let uid = transfer_syntax_uid(&meta).expect("uid should decode");
        assert!(TransferSyntaxRegistry.get(&uid).is_none());
    }

    #[test]
    fn round_trips_a_small_body_through_bytes() {
        let meta = minimal_meta();
        let mut body = DataSet::new();
        body.insert(
            Tag(0x0010, 0x0010),
            Element::new(
                VR::PN,
                Value::Strings(C::from_vec(vec!["Doe^John".to_string()])),
            ),
        );
        let data = FileDataSets { meta, body };

        let mut out = Vec::new();
        write_file(&mut out, &data).expect("should write the file");
        let read_back = read_file_bytes(&out).expect("should read the file back");

        let name = read_back.body.get(Tag(0x0010, 0x0010)).unwrap();
        assert_eq!(name.as_string().unwrap(), "Doe^John");
    }
}
