use crate::pdu::reader::*;
use crate::pdu::writer::*;
use crate::pdu::*;
use byteordered::byteorder::WriteBytesExt;
use std::io::Cursor;

#[test]
fn can_write_chunks_with_preceding_u32_length() {
    let mut bytes = vec![0u8; 0];
    write_chunk_u32(&mut bytes, |writer| {
        writer.write_u8(0x02).unwrap();
        write_chunk_u32(writer, |writer| {
            writer.write_u8(0x03).unwrap();
            Ok(())
        })
        .unwrap();
        Ok(())
    })
    .unwrap();

    assert_eq!(bytes.len(), 10);
    assert_eq!(bytes, &[0, 0, 0, 6, 2, 0, 0, 0, 1, 3]);
}

#[test]
fn can_write_chunks_with_preceding_u16_length() {
    let mut bytes = vec![0u8; 0];
    write_chunk_u16(&mut bytes, |writer| {
        writer.write_u8(0x02).unwrap();
        write_chunk_u16(writer, |writer| {
            writer.write_u8(0x03).unwrap();
            Ok(())
        })
        .unwrap();
        Ok(())
    })
    .unwrap();

    assert_eq!(bytes.len(), 6);
    assert_eq!(bytes, &[0, 4, 2, 0, 1, 3]);
}

#[test]
fn can_read_write_associate_rq() {
    let association_rq = Pdu::AssociationRQ(AssociationRQ {
        protocol_version: 2,
        calling_ae_title: "calling ae".to_string(),
        called_ae_title: "called ae".to_string(),
        application_context_name: "application context name".to_string(),
        presentation_contexts: vec![
            PresentationContextProposed {
                id: 1,
                abstract_syntax: "abstract 1".to_string(),
                transfer_syntaxes: vec!["transfer 1".to_string(), "transfer 2".to_string()],
            },
            PresentationContextProposed {
                id: 3,
                abstract_syntax: "abstract 2".to_string(),
                transfer_syntaxes: vec!["transfer 3".to_string(), "transfer 4".to_string()],
            },
        ],
        user_variables: vec![
            UserVariableItem::ImplementationClassUID("class uid".to_string()),
            UserVariableItem::ImplementationVersionName("version name".to_string()),
            UserVariableItem::MaxLength(23),
            UserVariableItem::RoleSelection {
                sop_class_uid: "1.2.3".to_string(),
                scu_role_support: true,
                scp_role_support: false,
            },
            UserVariableItem::AsynchronousOperationsWindow {
                max_operations_invoked: 1,
                max_operations_performed: 1,
            },
        ],
    });

    let mut bytes = vec![0u8; 0];
    write_pdu(&mut bytes, &association_rq).unwrap();

    let result = read_pdu(&mut Cursor::new(&bytes), DEFAULT_MAX_PDU, true).unwrap();

    match result {
        Pdu::AssociationRQ(AssociationRQ {
            protocol_version,
            calling_ae_title,
            called_ae_title,
            application_context_name,
            presentation_contexts,
            user_variables,
        }) => {
            assert_eq!(protocol_version, 2);
            assert_eq!(calling_ae_title, "calling ae");
            assert_eq!(called_ae_title, "called ae");
            assert_eq!(application_context_name, "application context name");
            assert_eq!(presentation_contexts.len(), 2);
            assert_eq!(presentation_contexts[0].abstract_syntax, "abstract 1");
            assert_eq!(presentation_contexts[0].transfer_syntaxes.len(), 2);
            assert_eq!(presentation_contexts[1].abstract_syntax, "abstract 2");
            assert_eq!(user_variables.len(), 5);
            assert!(matches!(
                user_variables[0],
                UserVariableItem::ImplementationClassUID(_)
            ));
            assert!(matches!(
                user_variables[3],
                UserVariableItem::RoleSelection { scu_role_support: true, scp_role_support: false, .. }
            ));
            assert!(matches!(
                user_variables[4],
                UserVariableItem::AsynchronousOperationsWindow { max_operations_invoked: 1, max_operations_performed: 1 }
            ));
        }
        other => panic!("unexpected PDU: {:?}", other),
    }
}

#[test]
fn can_read_write_pdata() {
    let pdata_rq = Pdu::PData {
        data: vec![PDataValue {
            presentation_context_id: 3,
            value_type: PDataValueType::Command,
            is_last: true,
            data: vec![0, 0, 0, 0],
        }],
    };

    let mut bytes = vec![0u8; 0];
    write_pdu(&mut bytes, &pdata_rq).unwrap();

    let result = read_pdu(&mut Cursor::new(&bytes), DEFAULT_MAX_PDU, true).unwrap();

    match result {
        Pdu::PData { data } => {
            assert_eq!(data.len(), 1);
            assert_eq!(data[0].presentation_context_id, 3);
            assert!(matches!(data[0].value_type, PDataValueType::Command));
            assert!(data[0].is_last);
            assert_eq!(data[0].data, vec![0, 0, 0, 0]);
        }
        other => panic!("unexpected PDU: {:?}", other),
    }
}
