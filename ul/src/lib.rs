//! This crate contains the types and methods needed to interact with DICOM
//! nodes through the upper layer protocol.
//!
//! - The [`pdu`] module provides data structures representing _protocol
//!   data units_ and their typed, length-prefixed sub-item tree, along
//!   with the byte-level reader and writer for them.
//! - The [`association`] module holds `AssociationParameters`, a pure value
//!   object for negotiated association state, and the encoder/decoder
//!   functions converting it to and from A-ASSOCIATE-RQ/AC PDUs.
//! - The [`dimse`] module holds DIMSE command messages: a command data set
//!   plus an optional payload data set, with typed fields bound to specific
//!   command-group tags.
//!
//! This crate stops at PDU bytes in and out; carrying those bytes across a
//! socket (or any other transport) is the caller's responsibility.

pub mod association;
pub mod dimse;
pub mod pdu;

/// The default implementation class UID substituted for associations that
/// do not supply their own (§3 `AssociationParameters`).
pub const IMPLEMENTATION_CLASS_UID: &str = "1.2.250.1.119.1.1.1.1.1.1.36";

/// The default implementation version name substituted for associations
/// that do not supply their own (§3 `AssociationParameters`).
pub const IMPLEMENTATION_VERSION_NAME: &str = "EMDL 1.0";

/// The application context name carried by every A-ASSOCIATE-RQ/AC PDU
/// (§4.10 `Encode RQ`).
pub const APPLICATION_CONTEXT_NAME: &str = "1.2.840.10008.3.1.1.1";

/// The default maximum PDU length substituted by `AssociationParameters`.
pub const DEFAULT_MAX_PDU_LENGTH: u32 = 16384;

// re-exports

pub use association::AssociationParameters;
pub use pdu::read_pdu;
pub use pdu::write_pdu;
pub use pdu::Pdu;
