//! Registry tests, to ensure that transfer syntaxes are properly
//! registered when linked together in a separate program.

use dicom_transfer_syntax_registry::TransferSyntaxRegistry;

fn assert_known(registry: TransferSyntaxRegistry, mut uid: &'static str, explicit_vr: bool, little_endian: bool) {
    let ts = registry.get(uid);
    assert!(ts.is_some());
    let ts = ts.unwrap();
    if uid.ends_with('\0') {
        uid = &uid[0..uid.len() - 1];
    }
    assert_eq!(ts.uid(), uid);
    assert_eq!(ts.is_explicit_vr(), explicit_vr);
    assert_eq!(ts.is_little_endian(), little_endian);
}

#[test]
fn contains_base_ts() {
    let registry = TransferSyntaxRegistry;

    // contains implicit VR little endian
    assert_known(registry, "1.2.840.10008.1.2", false, true);

    // should work the same for trailing null characters
    assert_known(registry, "1.2.840.10008.1.2\0", false, true);

    // contains explicit VR little endian
    assert_known(registry, "1.2.840.10008.1.2.1", true, true);

    // contains explicit VR big endian
    assert_known(registry, "1.2.840.10008.1.2.2", true, false);
}

#[test]
fn encapsulated_ts_are_known_but_flagged() {
    let registry = TransferSyntaxRegistry;
    let ts = registry.get("1.2.840.10008.1.2.5").unwrap();
    assert!(ts.is_encapsulated());
}

#[test]
fn unknown_ts_is_absent() {
    let registry = TransferSyntaxRegistry;
    assert!(registry.get("1.2.3.4.5.6.7.8.9").is_none());
}
