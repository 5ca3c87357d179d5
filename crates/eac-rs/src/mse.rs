// crates/eac-rs/src/mse.rs
//! `MANAGE SECURITY ENVIRONMENT: Set` for Authentication Template (MSE:Set AT).
//!
//! Builds the command data field of the `00 22 <P1> A4` APDU (§3) used to
//! select a protocol, key, and authorization template ahead of PACE, Chip
//! Authentication, or Terminal Authentication.

use crate::apdu::CommandApdu;
use crate::tlv::{
    encode_do, encode_do_long_tag, TAG_CHAT, TAG_EPHEMERAL_PUB_KEY, TAG_KEY_REF, TAG_OID,
    TAG_PRIVATE_KEY_REF,
};
use alloc::vec::Vec;

/// `P1` of the MSE:Set AT command, selecting which authentication template
/// the data objects below apply to (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTemplate {
    /// `C1`: PACE.
    Pace,
    /// `41`: Chip Authentication.
    ChipAuthentication,
    /// `81`: Terminal Authentication.
    TerminalAuthentication,
}

impl AuthTemplate {
    fn p1(self) -> u8 {
        match self {
            AuthTemplate::Pace => 0xC1,
            AuthTemplate::ChipAuthentication => 0x41,
            AuthTemplate::TerminalAuthentication => 0x81,
        }
    }
}

/// `P2` of the MSE:Set AT command: fixed regardless of template (§3.1, §6).
const MSE_SET_AT_P2: u8 = 0xA4;

/// Builds an MSE:Set AT command data field from the data objects relevant to
/// the chosen template.
///
/// Setters are infallible by design: nothing about accepting a protocol OID,
/// a key reference, or a public key can fail at this layer — the resulting
/// DOs are only byte strings until the card parses and validates them. The
/// builder's only job is canonical tag ordering (§3.2), not content
/// validation. `build()` itself never fails either: a builder with no
/// template set emits `P1 = 0x00` rather than rejecting the call — callers
/// should not do this, but the builder is permissive by design (§4.3).
#[derive(Debug, Clone, Default)]
pub struct MseSetAtBuilder {
    template: Option<AuthTemplate>,
    protocol_oid: Option<Vec<u8>>,
    key_reference_integer: Option<Vec<u8>>,
    key_reference_name: Option<Vec<u8>>,
    // Sequence numbers, not the field values themselves, record builder-set
    // order (§3): each is stamped from `next_seq` whenever its setter runs,
    // so `build()` can tell which of the two DO83 forms was set most
    // recently even though each setter is otherwise last-write-wins.
    key_reference_integer_seq: Option<u32>,
    key_reference_name_seq: Option<u32>,
    next_seq: u32,
    private_key_reference: Option<Vec<u8>>,
    ephemeral_public_key: Option<Vec<u8>>,
    chat: Option<Vec<u8>>,
}

impl MseSetAtBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the authentication template, fixing `P1` (§3.1).
    pub fn set_template(mut self, template: AuthTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Sets DO80: the protocol OID's content octets (already base-128
    /// encoded), without the ASN.1 universal OID tag — tag `0x80` stands in
    /// for it here.
    pub fn set_protocol(mut self, oid_bytes: &[u8]) -> Self {
        self.protocol_oid = Some(oid_bytes.to_vec());
        self
    }

    /// Sets DO83 to a reserved integer key reference (MRZ=1, CAN=2, PIN=3,
    /// PUK=4). Independent of [`Self::set_key_reference_name`]: if both are
    /// set, both DO83 fragments are emitted (§3's "at most one ... is
    /// meaningful; if both are set, both are emitted in builder-set
    /// order").
    pub fn set_key_reference_integer(mut self, reference: u8) -> Self {
        self.key_reference_integer = Some(alloc::vec![reference]);
        self.key_reference_integer_seq = Some(self.next_seq);
        self.next_seq += 1;
        self
    }

    /// Sets DO83 to a caller-encoded name (ISO-8859-1), instead of a
    /// reserved integer reference.
    pub fn set_key_reference_name(mut self, name: &[u8]) -> Self {
        self.key_reference_name = Some(name.to_vec());
        self.key_reference_name_seq = Some(self.next_seq);
        self.next_seq += 1;
        self
    }

    /// Sets DO84: a reference to a private key or a set of domain
    /// parameters.
    pub fn set_private_key_reference(mut self, reference: &[u8]) -> Self {
        self.private_key_reference = Some(reference.to_vec());
        self
    }

    /// Sets DO91: the terminal's compressed ephemeral public key, sent in
    /// step 3 of Chip Authentication (or the analogous PACE mapping step).
    pub fn set_ephemeral_public_key(mut self, public_key: &[u8]) -> Self {
        self.ephemeral_public_key = Some(public_key.to_vec());
        self
    }

    /// Sets the Certificate Holder Authorization Template (tag `7F 4C`).
    pub fn set_chat(mut self, chat: &[u8]) -> Self {
        self.chat = Some(chat.to_vec());
        self
    }

    /// Serializes the selected data objects in the canonical order
    /// `80, 83, 84, 91, 7F4C` (§3.2) and wraps them as the command data field
    /// of a `00 22 <P1> A4` APDU. If both integer and name key references are
    /// set, both DO83 fragments are emitted in builder-set order — whichever
    /// setter ran more recently comes second (§3).
    pub fn build(self) -> CommandApdu {
        let mut data = Vec::new();
        if let Some(oid) = &self.protocol_oid {
            data.extend(encode_do(TAG_OID, oid));
        }
        match (&self.key_reference_integer, &self.key_reference_name) {
            (Some(int_ref), Some(name_ref)) => {
                if self.key_reference_integer_seq <= self.key_reference_name_seq {
                    data.extend(encode_do(TAG_KEY_REF, int_ref));
                    data.extend(encode_do(TAG_KEY_REF, name_ref));
                } else {
                    data.extend(encode_do(TAG_KEY_REF, name_ref));
                    data.extend(encode_do(TAG_KEY_REF, int_ref));
                }
            }
            (Some(int_ref), None) => data.extend(encode_do(TAG_KEY_REF, int_ref)),
            (None, Some(name_ref)) => data.extend(encode_do(TAG_KEY_REF, name_ref)),
            (None, None) => {}
        }
        if let Some(priv_key_ref) = &self.private_key_reference {
            data.extend(encode_do(TAG_PRIVATE_KEY_REF, priv_key_ref));
        }
        if let Some(pub_key) = &self.ephemeral_public_key {
            data.extend(encode_do(TAG_EPHEMERAL_PUB_KEY, pub_key));
        }
        if let Some(chat) = &self.chat {
            data.extend(encode_do_long_tag(TAG_CHAT, chat));
        }

        let p1 = self.template.map(AuthTemplate::p1).unwrap_or(0x00);
        let mut cmd = CommandApdu::new(0x00, 0x22, p1, MSE_SET_AT_P2);
        if !data.is_empty() {
            cmd = cmd.with_data(data);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pace_scenario_matches_canonical_order() {
        // spec.md §8 scenario 1, verbatim: PACE, protocol OID
        // 0.4.0.127.0.7.2.2.4.2.2, key reference integer 1 (MRZ). Expected
        // header `00 22 C1 A4`; body begins `80 0A 04 00 7F 00 07 02 02 04
        // 02 02 83 01 01`.
        let oid = [0x04, 0x00, 0x7F, 0x00, 0x07, 0x02, 0x02, 0x04, 0x02, 0x02];
        let cmd = MseSetAtBuilder::new()
            .set_template(AuthTemplate::Pace)
            .set_protocol(&oid)
            .set_key_reference_integer(0x01)
            .build();

        assert_eq!(cmd.cla, 0x00);
        assert_eq!(cmd.ins, 0x22);
        assert_eq!(cmd.p1, 0xC1);
        assert_eq!(cmd.p2, 0xA4);

        assert_eq!(
            cmd.data,
            Some(alloc::vec![
                0x80, 0x0A, 0x04, 0x00, 0x7F, 0x00, 0x07, 0x02, 0x02, 0x04, 0x02, 0x02, 0x83,
                0x01, 0x01,
            ])
        );
    }

    #[test]
    fn orders_all_five_dos_regardless_of_setter_call_order() {
        let cmd = MseSetAtBuilder::new()
            .set_chat(&[0xAA])
            .set_ephemeral_public_key(&[0xBB])
            .set_private_key_reference(&[0xCC])
            .set_key_reference_integer(0xDD)
            .set_protocol(&[0xEE])
            .set_template(AuthTemplate::ChipAuthentication)
            .build();

        let data = cmd.data.unwrap();
        assert_eq!(
            data,
            alloc::vec![
                0x80, 0x01, 0xEE, 0x83, 0x01, 0xDD, 0x84, 0x01, 0xCC, 0x91, 0x01, 0xBB, 0x7F,
                0x4C, 0x01, 0xAA,
            ]
        );
        assert_eq!(cmd.p1, 0x41);
        assert_eq!(cmd.p2, 0xA4);
    }

    #[test]
    fn both_key_reference_forms_are_emitted_in_setter_order_when_both_are_set() {
        let cmd = MseSetAtBuilder::new()
            .set_key_reference_integer(0x01)
            .set_key_reference_name(b"CAN")
            .build();

        assert_eq!(
            cmd.data.unwrap(),
            alloc::vec![0x83, 0x01, 0x01, 0x83, 0x03, b'C', b'A', b'N']
        );
    }

    #[test]
    fn both_key_reference_forms_follow_reverse_setter_call_order_too() {
        // Same two fields as above, called in the opposite order: proves
        // `build()` tracks actual call order rather than a hardcoded
        // integer-then-name default.
        let cmd = MseSetAtBuilder::new()
            .set_key_reference_name(b"CAN")
            .set_key_reference_integer(0x01)
            .build();

        assert_eq!(
            cmd.data.unwrap(),
            alloc::vec![0x83, 0x03, b'C', b'A', b'N', 0x83, 0x01, 0x01]
        );
    }

    #[test]
    fn empty_builder_produces_case1_command_with_p1_zero() {
        let cmd = MseSetAtBuilder::new().build();
        assert_eq!(cmd.data, None);
        assert_eq!(cmd.p1, 0x00);
        assert_eq!(cmd.p2, 0xA4);
    }

    #[test]
    fn terminal_authentication_sets_p1_0x81() {
        let cmd = MseSetAtBuilder::new()
            .set_template(AuthTemplate::TerminalAuthentication)
            .build();
        assert_eq!(cmd.p1, 0x81);
        assert_eq!(cmd.p2, 0xA4);
    }
}
