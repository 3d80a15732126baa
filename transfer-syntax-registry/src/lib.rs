#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(missing_debug_implementations, unused_qualifications, unused_import_braces)]

//! The DICOM transfer syntax registry.
//!
//! A transfer syntax is identified by a UID and carries three properties
//! that drive the rest of the codec: whether VRs are explicit on the
//! wire, the byte order, and whether pixel data is encapsulated (§4.2).
//! No other property is modeled here; decoding the pixel data of an
//! encapsulated transfer syntax into an image is out of scope.

pub mod entries;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// A transfer syntax specifier: UID plus the three wire-format booleans
/// that fully determine how a data set under it is read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSyntax {
    uid: &'static str,
    name: &'static str,
    explicit_vr: bool,
    little_endian: bool,
    encapsulated: bool,
}

impl TransferSyntax {
    /// Construct a new transfer syntax specifier.
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        explicit_vr: bool,
        little_endian: bool,
        encapsulated: bool,
    ) -> Self {
        TransferSyntax {
            uid,
            name,
            explicit_vr,
            little_endian,
            encapsulated,
        }
    }

    /// The transfer syntax UID.
    pub fn uid(&self) -> &'static str {
        self.uid
    }

    /// The transfer syntax' human-readable name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether VRs are explicit on the wire under this transfer syntax.
    pub fn is_explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Whether this transfer syntax is little endian.
    pub fn is_little_endian(&self) -> bool {
        self.little_endian
    }

    /// Whether pixel data under this transfer syntax is encapsulated
    /// (a sequence of `Item`-framed fragments) rather than a flat run.
    pub fn is_encapsulated(&self) -> bool {
        self.encapsulated
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.uid)
    }
}

/// Trim a trailing NUL, which some writers pad UID strings with to reach
/// an even length.
fn trim_uid(uid: &str) -> &str {
    uid.trim_end_matches('\0')
}

static REGISTRY: Lazy<HashMap<&'static str, TransferSyntax>> = Lazy::new(|| {
    entries::BUILT_IN
        .iter()
        .map(|ts| (ts.uid(), *ts))
        .collect()
});

/// A handle onto the built-in transfer syntax registry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransferSyntaxRegistry;

impl TransferSyntaxRegistry {
    /// Resolve a transfer syntax UID to its specifier, or `None` if the
    /// UID is not known to this registry (§4.2, `getTransferSyntax`).
    pub fn get(&self, uid: &str) -> Option<TransferSyntax> {
        REGISTRY.get(trim_uid(uid)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_uids() {
        let registry = TransferSyntaxRegistry;
        let ts = registry.get("1.2.840.10008.1.2").unwrap();
        assert!(!ts.is_explicit_vr());
        assert!(ts.is_little_endian());
        assert!(!ts.is_encapsulated());

        let ts = registry.get("1.2.840.10008.1.2.2").unwrap();
        assert!(ts.is_explicit_vr());
        assert!(!ts.is_little_endian());
    }

    #[test]
    fn trims_trailing_nul() {
        let registry = TransferSyntaxRegistry;
        assert!(registry.get("1.2.840.10008.1.2\0").is_some());
    }

    #[test]
    fn unknown_uid_resolves_to_none() {
        let registry = TransferSyntaxRegistry;
        assert!(registry.get("9.9.9.9").is_none());
    }
}
