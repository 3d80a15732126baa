//! Built-in transfer syntax specifiers.
//!
//! Three transfer syntaxes are fully specified in wire terms: Implicit VR
//! Little Endian, Explicit VR Little Endian, Explicit VR Big Endian.
//! A handful of further UIDs are known by name only, flagged as carrying
//! encapsulated pixel data; decoding their pixel fragments into an image
//! is out of scope (§1 Non-goals) but the data set around them is not.

use crate::TransferSyntax;

pub const IMPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2",
    "Implicit VR Little Endian",
    false,
    true,
    false,
);

pub const EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.1",
    "Explicit VR Little Endian",
    true,
    true,
    false,
);

pub const EXPLICIT_VR_BIG_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.2",
    "Explicit VR Big Endian",
    true,
    false,
    false,
);

pub const JPEG_BASELINE: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.4.50",
    "JPEG Baseline (Process 1)",
    true,
    true,
    true,
);

pub const JPEG_LOSSLESS_NON_HIERARCHICAL: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.4.70",
    "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
    true,
    true,
    true,
);

pub const RLE_LOSSLESS: TransferSyntax =
    TransferSyntax::new("1.2.840.10008.1.2.5", "RLE Lossless", true, true, true);

/// All transfer syntaxes built into the registry, in no particular order.
pub const BUILT_IN: &[TransferSyntax] = &[
    IMPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_BIG_ENDIAN,
    JPEG_BASELINE,
    JPEG_LOSSLESS_NON_HIERARCHICAL,
    RLE_LOSSLESS,
];
