//! Association parameters (C11) and their A-ASSOCIATE-RQ/AC codec (C13).
//!
//! `AssociationParameters` is a pure value object: it holds the negotiated
//! state of an association (AE titles, presentation contexts, user
//! information) without owning a socket or any other transport. Converting
//! it to and from [`Pdu`] values is the only thing this module does;
//! writing those PDUs to a wire, and reading the peer's reply back, is left
//! entirely to the caller (§6).

use crate::pdu::{
    AbortRQSource, AssociationAC, AssociationRJ, AssociationRQ, Pdu, PresentationContextProposed,
    PresentationContextResult, PresentationContextResultReason, UserIdentity, UserVariableItem,
};
use crate::{
    APPLICATION_CONTEXT_NAME, DEFAULT_MAX_PDU_LENGTH, IMPLEMENTATION_CLASS_UID,
    IMPLEMENTATION_VERSION_NAME,
};
use snafu::Snafu;
use std::collections::HashMap;

/// Errors occurring while converting between `AssociationParameters` and
/// PDUs.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("expected an A-ASSOCIATE-RQ PDU, got {}", found))]
    NotAssociateRq { found: &'static str },
    #[snafu(display("expected an A-ASSOCIATE-AC PDU, got {}", found))]
    NotAssociateAc { found: &'static str },
    #[snafu(display("association was rejected: {:?} / {:?}", result, source))]
    Rejected {
        result: crate::pdu::AssociationRJResult,
        source: crate::pdu::AssociationRJSource,
    },
    #[snafu(display("association was aborted by the peer: {:?}", source))]
    Aborted { source: AbortRQSource },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A negotiated (or about-to-be-negotiated) presentation context, folding
/// the wire-level RQ/AC split and the role-selection sub-item into a single
/// record (§3 `PresentationContext`).
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationContext {
    /// An 8-bit odd integer identifying the context within the
    /// association.
    pub id: u8,
    pub abstract_syntax: String,
    /// The proposed transfer syntaxes (RQ), or the single accepted one
    /// (AC, always of length 1).
    pub transfer_syntaxes: Vec<String>,
    pub scu_role_support: bool,
    pub scp_role_support: bool,
    /// Whether a Role Selection sub-item was present for this context's
    /// abstract syntax when it was proposed.
    pub role_selection_present: bool,
    /// `None` on the RQ side; `Some` once accepted or rejected.
    pub result: Option<PresentationContextResultReason>,
}

/// Pure value object holding the negotiated (or about-to-be-negotiated)
/// state of an association (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationParameters {
    pub calling_ae_title: String,
    pub called_ae_title: String,
    pub presentation_contexts: Vec<PresentationContext>,
    pub max_pdu_length: u32,
    pub implementation_class_uid: String,
    pub implementation_version_name: String,
    /// (invoked, performed), defaults (1, 1).
    pub async_ops_window: (u16, u16),
    /// SOP Class Extended Negotiation sub-items: (SOP class UID, opaque
    /// application-information bytes).
    pub extended_negotiations: Vec<(String, Vec<u8>)>,
    /// SOP Class Common Extended Negotiation sub-items. Only meaningful on
    /// the RQ side (§4.10 "not allowed in AC").
    pub common_extended_negotiations: Vec<(String, String, Vec<String>)>,
    pub user_identity: Option<UserIdentity>,
    /// The `serverResponse` bytes of a User Identity Negotiation response,
    /// set on the AC side only.
    pub user_identity_server_response: Option<Vec<u8>>,
}

impl Default for AssociationParameters {
    fn default() -> Self {
        AssociationParameters {
            calling_ae_title: String::new(),
            called_ae_title: String::new(),
            presentation_contexts: Vec::new(),
            max_pdu_length: DEFAULT_MAX_PDU_LENGTH,
            implementation_class_uid: IMPLEMENTATION_CLASS_UID.to_string(),
            implementation_version_name: IMPLEMENTATION_VERSION_NAME.to_string(),
            async_ops_window: (1, 1),
            extended_negotiations: Vec::new(),
            common_extended_negotiations: Vec::new(),
            user_identity: None,
            user_identity_server_response: None,
        }
    }
}

impl AssociationParameters {
    /// Decode an A-ASSOCIATE-RQ PDU into association parameters.
    ///
    /// Builds the SOP class → (scu, scp) role-selection map from the RQ's
    /// `RoleSelection` sub-items before building presentation contexts,
    /// matching `AssociationParameters.cpp`'s construction order (§3).
    pub fn from_request_pdu(pdu: &Pdu) -> Result<Self> {
        let rq = match pdu {
            Pdu::AssociationRQ(rq) => rq,
            other => return NotAssociateRqSnafu { found: pdu_kind(other) }.fail(),
        };

        let mut role_map: HashMap<&str, (bool, bool)> = HashMap::new();
        for item in &rq.user_variables {
            if let UserVariableItem::RoleSelection {
                sop_class_uid,
                scu_role_support,
                scp_role_support,
            } = item
            {
                role_map.insert(sop_class_uid.as_str(), (*scu_role_support, *scp_role_support));
            }
        }

        let presentation_contexts = rq
            .presentation_contexts
            .iter()
            .map(|pc| {
                let (scu_role_support, scp_role_support) = role_map
                    .get(pc.abstract_syntax.as_str())
                    .copied()
                    .unwrap_or((true, false));
                PresentationContext {
                    id: pc.id,
                    abstract_syntax: pc.abstract_syntax.clone(),
                    transfer_syntaxes: pc.transfer_syntaxes.clone(),
                    scu_role_support,
                    scp_role_support,
                    role_selection_present: role_map.contains_key(pc.abstract_syntax.as_str()),
                    result: None,
                }
            })
            .collect();

        let mut params = AssociationParameters {
            calling_ae_title: rq.calling_ae_title.clone(),
            called_ae_title: rq.called_ae_title.clone(),
            presentation_contexts,
            ..Default::default()
        };
        apply_user_variables(&mut params, &rq.user_variables, true);
        tracing::debug!(
            calling_ae_title = %params.calling_ae_title,
            called_ae_title = %params.called_ae_title,
            presentation_contexts = params.presentation_contexts.len(),
            "decoded A-ASSOCIATE-RQ",
        );
        Ok(params)
    }

    /// Decode an A-ASSOCIATE-AC PDU, recovering the abstract syntax and
    /// role defaults that the AC omits from `request` (§4.10 "Decode AC").
    pub fn from_accept_pdu(pdu: &Pdu, request: &AssociationParameters) -> Result<Self> {
        let ac = match pdu {
            Pdu::AssociationAC(ac) => ac,
            other => return NotAssociateAcSnafu { found: pdu_kind(other) }.fail(),
        };

        let presentation_contexts = ac
            .presentation_contexts
            .iter()
            .map(|pc| build_accepted_context(pc, request))
            .collect();

        let mut params = AssociationParameters {
            calling_ae_title: ac.calling_ae_title.clone(),
            called_ae_title: ac.called_ae_title.clone(),
            presentation_contexts,
            ..Default::default()
        };
        apply_user_variables(&mut params, &ac.user_variables, false);
        let accepted = params
            .presentation_contexts
            .iter()
            .filter(|pc| pc.result == Some(PresentationContextResultReason::Acceptance))
            .count();
        tracing::debug!(
            accepted,
            proposed = params.presentation_contexts.len(),
            "decoded A-ASSOCIATE-AC",
        );
        Ok(params)
    }

    /// Encode an A-ASSOCIATE-RQ PDU (§4.10 "Encode RQ").
    pub fn to_request_pdu(&self) -> Pdu {
        let mut user_variables = vec![
            UserVariableItem::MaxLength(self.max_pdu_length),
            UserVariableItem::ImplementationClassUID(self.implementation_class_uid_or_default()),
        ];

        let (invoked, performed) = self.async_ops_window;
        if invoked != 1 || performed != 1 {
            user_variables.push(UserVariableItem::AsynchronousOperationsWindow {
                max_operations_invoked: invoked,
                max_operations_performed: performed,
            });
        }

        for pc in &self.presentation_contexts {
            user_variables.push(UserVariableItem::RoleSelection {
                sop_class_uid: pc.abstract_syntax.clone(),
                scu_role_support: pc.scu_role_support,
                scp_role_support: pc.scp_role_support,
            });
        }

        user_variables.push(UserVariableItem::ImplementationVersionName(
            self.implementation_version_name_or_default(),
        ));

        for (uid, data) in &self.extended_negotiations {
            user_variables.push(UserVariableItem::SopClassExtendedNegotiationSubItem(
                uid.clone(),
                data.clone(),
            ));
        }

        for (sop_class_uid, service_class_uid, related_general_sop_classes) in
            &self.common_extended_negotiations
        {
            user_variables.push(UserVariableItem::SopClassCommonExtendedNegotiationSubItem {
                sop_class_uid: sop_class_uid.clone(),
                service_class_uid: service_class_uid.clone(),
                related_general_sop_classes: related_general_sop_classes.clone(),
            });
        }

        if let Some(identity) = &self.user_identity {
            user_variables.push(UserVariableItem::UserIdentityItem(identity.clone()));
        }

        Pdu::AssociationRQ(AssociationRQ {
            protocol_version: 1,
            calling_ae_title: self.calling_ae_title.clone(),
            called_ae_title: self.called_ae_title.clone(),
            application_context_name: APPLICATION_CONTEXT_NAME.to_string(),
            presentation_contexts: self
                .presentation_contexts
                .iter()
                .map(|pc| PresentationContextProposed {
                    id: pc.id,
                    abstract_syntax: pc.abstract_syntax.clone(),
                    transfer_syntaxes: pc.transfer_syntaxes.clone(),
                })
                .collect(),
            user_variables,
        })
    }

    /// Encode an A-ASSOCIATE-AC PDU answering `request` (§4.10 "Encode
    /// AC"). `self` carries one resolved transfer syntax and a `result`
    /// per presentation context; `request` supplies which contexts had a
    /// Role Selection sub-item, since role selection is only echoed back
    /// for those.
    pub fn to_accept_pdu(&self, request: &AssociationParameters) -> Pdu {
        let presentation_contexts = self
            .presentation_contexts
            .iter()
            .map(|pc| PresentationContextResult {
                id: pc.id,
                // A context reaching here without a decided `result` was
                // never run through `evaluate`/`accept`; fail closed rather
                // than silently accepting it.
                reason: pc.result.clone().unwrap_or(PresentationContextResultReason::UserRejection),
                transfer_syntax: pc.transfer_syntaxes.first().cloned().unwrap_or_default(),
            })
            .collect();

        let mut user_variables = vec![
            UserVariableItem::MaxLength(self.max_pdu_length),
            UserVariableItem::ImplementationClassUID(self.implementation_class_uid_or_default()),
        ];

        let (invoked, performed) = self.async_ops_window;
        if invoked != 1 || performed != 1 {
            user_variables.push(UserVariableItem::AsynchronousOperationsWindow {
                max_operations_invoked: invoked,
                max_operations_performed: performed,
            });
        }

        for pc in &self.presentation_contexts {
            let role_selection_present = request
                .presentation_contexts
                .iter()
                .find(|r| r.id == pc.id)
                .map(|r| r.role_selection_present)
                .unwrap_or(false);
            if role_selection_present {
                user_variables.push(UserVariableItem::RoleSelection {
                    sop_class_uid: pc.abstract_syntax.clone(),
                    scu_role_support: pc.scu_role_support,
                    scp_role_support: pc.scp_role_support,
                });
            }
        }

        user_variables.push(UserVariableItem::ImplementationVersionName(
            self.implementation_version_name_or_default(),
        ));

        if let Some(response) = &self.user_identity_server_response {
            user_variables.push(UserVariableItem::UserIdentityAC(response.clone()));
        }

        Pdu::AssociationAC(AssociationAC {
            protocol_version: 1,
            calling_ae_title: self.calling_ae_title.clone(),
            called_ae_title: self.called_ae_title.clone(),
            application_context_name: APPLICATION_CONTEXT_NAME.to_string(),
            presentation_contexts,
            user_variables,
        })
    }

    fn implementation_class_uid_or_default(&self) -> String {
        if self.implementation_class_uid.is_empty() {
            IMPLEMENTATION_CLASS_UID.to_string()
        } else {
            self.implementation_class_uid.clone()
        }
    }

    fn implementation_version_name_or_default(&self) -> String {
        if self.implementation_version_name.is_empty() {
            IMPLEMENTATION_VERSION_NAME.to_string()
        } else {
            self.implementation_version_name.clone()
        }
    }
}

/// Decide the outcome of evaluating a proposed presentation context against
/// the acceptor's locally supported abstract and transfer syntaxes (§4.10
/// "Transition on evaluate()").
///
/// Returns `Acceptance` together with the chosen transfer syntax (the first
/// proposed syntax that the acceptor also supports) when the abstract syntax
/// is supported and at least one proposed transfer syntax is supported;
/// otherwise `AbstractSyntaxNotSupported` or `TransferSyntaxesNotSupported`,
/// each paired with an empty transfer syntax.
pub fn evaluate(
    pc: &PresentationContext,
    supported_abstract_syntaxes: &[String],
    supported_transfer_syntaxes: &[String],
) -> (PresentationContextResultReason, String) {
    if !supported_abstract_syntaxes
        .iter()
        .any(|s| s == &pc.abstract_syntax)
    {
        return (PresentationContextResultReason::AbstractSyntaxNotSupported, String::new());
    }

    match pc
        .transfer_syntaxes
        .iter()
        .find(|ts| supported_transfer_syntaxes.iter().any(|s| s == *ts))
    {
        Some(ts) => (PresentationContextResultReason::Acceptance, ts.clone()),
        None => (PresentationContextResultReason::TransferSyntaxesNotSupported, String::new()),
    }
}

impl AssociationParameters {
    /// Build the acceptor-side association parameters answering `request`,
    /// running [`evaluate`] against `supported_abstract_syntaxes`/
    /// `supported_transfer_syntaxes` for each proposed presentation context.
    ///
    /// The result is ready to pass to [`AssociationParameters::to_accept_pdu`];
    /// callers that want to reject a context outright despite it being
    /// supported (user rejection, rather than a syntax mismatch) can
    /// overwrite its `result` to `UserRejection` afterwards.
    pub fn accept(
        request: &AssociationParameters,
        supported_abstract_syntaxes: &[String],
        supported_transfer_syntaxes: &[String],
    ) -> AssociationParameters {
        let presentation_contexts = request
            .presentation_contexts
            .iter()
            .map(|pc| {
                let (reason, transfer_syntax) =
                    evaluate(pc, supported_abstract_syntaxes, supported_transfer_syntaxes);
                PresentationContext {
                    id: pc.id,
                    abstract_syntax: pc.abstract_syntax.clone(),
                    transfer_syntaxes: if transfer_syntax.is_empty() {
                        Vec::new()
                    } else {
                        vec![transfer_syntax]
                    },
                    scu_role_support: pc.scu_role_support,
                    scp_role_support: pc.scp_role_support,
                    role_selection_present: pc.role_selection_present,
                    result: Some(reason),
                }
            })
            .collect();

        AssociationParameters {
            calling_ae_title: request.calling_ae_title.clone(),
            called_ae_title: request.called_ae_title.clone(),
            presentation_contexts,
            ..Default::default()
        }
    }
}

fn build_accepted_context(
    pc: &PresentationContextResult,
    request: &AssociationParameters,
) -> PresentationContext {
    let requested = request.presentation_contexts.iter().find(|r| r.id == pc.id);
    let (abstract_syntax, scu_role_support, scp_role_support, role_selection_present) = requested
        .map(|r| (r.abstract_syntax.clone(), r.scu_role_support, r.scp_role_support, r.role_selection_present))
        .unwrap_or_default();

    PresentationContext {
        id: pc.id,
        abstract_syntax,
        transfer_syntaxes: vec![pc.transfer_syntax.clone()],
        scu_role_support,
        scp_role_support,
        role_selection_present,
        result: Some(pc.reason.clone()),
    }
}

/// Shared decode logic for the singleton/collection user-information
/// sub-items of RQ and AC PDUs (§4.10).
fn apply_user_variables(
    params: &mut AssociationParameters,
    user_variables: &[UserVariableItem],
    is_request: bool,
) {
    for item in user_variables {
        match item {
            UserVariableItem::MaxLength(len) => params.max_pdu_length = *len,
            UserVariableItem::ImplementationClassUID(uid) => {
                params.implementation_class_uid = uid.clone()
            }
            UserVariableItem::ImplementationVersionName(name) => {
                params.implementation_version_name = name.clone()
            }
            UserVariableItem::AsynchronousOperationsWindow {
                max_operations_invoked,
                max_operations_performed,
            } => params.async_ops_window = (*max_operations_invoked, *max_operations_performed),
            UserVariableItem::SopClassExtendedNegotiationSubItem(uid, data) => {
                params.extended_negotiations.push((uid.clone(), data.clone()))
            }
            UserVariableItem::SopClassCommonExtendedNegotiationSubItem {
                sop_class_uid,
                service_class_uid,
                related_general_sop_classes,
            } if is_request => params.common_extended_negotiations.push((
                sop_class_uid.clone(),
                service_class_uid.clone(),
                related_general_sop_classes.clone(),
            )),
            UserVariableItem::UserIdentityItem(identity) => {
                params.user_identity = Some(identity.clone())
            }
            UserVariableItem::UserIdentityAC(response) => {
                params.user_identity_server_response = Some(response.clone())
            }
            _ => {}
        }
    }
}

fn pdu_kind(pdu: &Pdu) -> &'static str {
    match pdu {
        Pdu::Unknown { .. } => "Unknown",
        Pdu::AssociationRQ(_) => "AssociationRQ",
        Pdu::AssociationAC(_) => "AssociationAC",
        Pdu::AssociationRJ(_) => "AssociationRJ",
        Pdu::PData { .. } => "PData",
        Pdu::ReleaseRQ => "ReleaseRQ",
        Pdu::ReleaseRP => "ReleaseRP",
        Pdu::AbortRQ { .. } => "AbortRQ",
    }
}

/// Translate a received `AssociationRJ`/`AbortRQ` PDU into an error, for
/// callers that expect a successful negotiation.
pub fn check_response(pdu: &Pdu) -> Result<()> {
    match pdu {
        Pdu::AssociationRJ(AssociationRJ { result, source }) => {
            tracing::warn!(?result, ?source, "association rejected");
            RejectedSnafu {
                result: result.clone(),
                source: source.clone(),
            }
            .fail()
        }
        Pdu::AbortRQ { source } => {
            tracing::warn!(?source, "association aborted");
            AbortedSnafu { source: source.clone() }.fail()
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> AssociationParameters {
        AssociationParameters {
            calling_ae_title: "SCU".to_string(),
            called_ae_title: "SCP".to_string(),
            presentation_contexts: vec![PresentationContext {
                id: 1,
                abstract_syntax: "1.2.840.10008.1.1".to_string(),
                transfer_syntaxes: vec!["1.2.840.10008.1.2".to_string()],
                scu_role_support: true,
                scp_role_support: false,
                role_selection_present: true,
                result: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn request_round_trips_through_pdu() {
        let request = sample_request();
        let pdu = request.to_request_pdu();
        let decoded = AssociationParameters::from_request_pdu(&pdu).unwrap();

        assert_eq!(decoded.calling_ae_title, "SCU");
        assert_eq!(decoded.called_ae_title, "SCP");
        assert_eq!(decoded.presentation_contexts.len(), 1);
        let pc = &decoded.presentation_contexts[0];
        assert_eq!(pc.abstract_syntax, "1.2.840.10008.1.1");
        assert!(pc.scu_role_support);
        assert!(!pc.scp_role_support);
        assert!(pc.role_selection_present);
    }

    #[test]
    fn accept_recovers_abstract_syntax_from_request() {
        let request = sample_request();

        let mut response = request.clone();
        response.presentation_contexts[0].result = Some(PresentationContextResultReason::Acceptance);
        let ac_pdu = response.to_accept_pdu(&request);

        let decoded = AssociationParameters::from_accept_pdu(&ac_pdu, &request).unwrap();
        let pc = &decoded.presentation_contexts[0];
        assert_eq!(pc.abstract_syntax, "1.2.840.10008.1.1");
        assert_eq!(pc.transfer_syntaxes, vec!["1.2.840.10008.1.2".to_string()]);
        assert_eq!(pc.result, Some(PresentationContextResultReason::Acceptance));
        assert!(pc.role_selection_present);
    }

    #[test]
    fn decoding_a_non_rq_pdu_fails() {
        let err = AssociationParameters::from_request_pdu(&Pdu::ReleaseRQ).unwrap_err();
        assert!(matches!(err, Error::NotAssociateRq { .. }));
    }

    #[test]
    fn evaluate_accepts_when_both_syntaxes_are_supported() {
        let request = sample_request();
        let pc = &request.presentation_contexts[0];
        let (reason, ts) = evaluate(
            pc,
            &["1.2.840.10008.1.1".to_string()],
            &["1.2.840.10008.1.2".to_string()],
        );
        assert_eq!(reason, PresentationContextResultReason::Acceptance);
        assert_eq!(ts, "1.2.840.10008.1.2");
    }

    #[test]
    fn evaluate_rejects_unsupported_abstract_syntax() {
        let request = sample_request();
        let pc = &request.presentation_contexts[0];
        let (reason, ts) = evaluate(pc, &[], &["1.2.840.10008.1.2".to_string()]);
        assert_eq!(reason, PresentationContextResultReason::AbstractSyntaxNotSupported);
        assert!(ts.is_empty());
    }

    #[test]
    fn evaluate_rejects_unsupported_transfer_syntaxes() {
        let request = sample_request();
        let pc = &request.presentation_contexts[0];
        let (reason, ts) = evaluate(pc, &["1.2.840.10008.1.1".to_string()], &[]);
        assert_eq!(reason, PresentationContextResultReason::TransferSyntaxesNotSupported);
        assert!(ts.is_empty());
    }

    #[test]
    fn accept_builds_ac_side_results_from_supported_syntaxes() {
        let request = sample_request();
        let accepted = AssociationParameters::accept(
            &request,
            &["1.2.840.10008.1.1".to_string()],
            &["1.2.840.10008.1.2".to_string()],
        );
        assert_eq!(
            accepted.presentation_contexts[0].result,
            Some(PresentationContextResultReason::Acceptance)
        );

        let ac_pdu = accepted.to_accept_pdu(&request);
        let decoded = AssociationParameters::from_accept_pdu(&ac_pdu, &request).unwrap();
        assert_eq!(
            decoded.presentation_contexts[0].result,
            Some(PresentationContextResultReason::Acceptance)
        );
    }

    #[test]
    fn to_accept_pdu_fails_closed_when_result_was_never_decided() {
        let request = sample_request();
        let mut undecided = request.clone();
        undecided.presentation_contexts[0].result = None;

        let ac_pdu = undecided.to_accept_pdu(&request);
        let decoded = AssociationParameters::from_accept_pdu(&ac_pdu, &request).unwrap();
        assert_eq!(
            decoded.presentation_contexts[0].result,
            Some(PresentationContextResultReason::UserRejection)
        );
    }
}
