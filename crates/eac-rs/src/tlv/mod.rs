// crates/eac-rs/src/tlv/mod.rs
//! BER-TLV data-object primitives shared by the MSE:Set AT builder and the
//! Secure Messaging engine.

pub mod do_objects;
pub mod length;

pub use do_objects::{
    do87_ciphertext, encode_do8e, encode_do85, encode_do87, encode_do97, encode_do99,
};
pub use length::{decode_length, encode_length};

use crate::error::EacError;
use alloc::vec::Vec;

/// Cryptographic Mechanism Reference (protocol OID), short tag.
pub const TAG_OID: u8 = 0x80;
/// Public/shared-secret key reference (by integer or by name), short tag.
pub const TAG_KEY_REF: u8 = 0x83;
/// Private key / domain parameter reference, short tag.
pub const TAG_PRIVATE_KEY_REF: u8 = 0x84;
/// Encrypted data, no padding-content indicator (odd INS), short tag.
pub const TAG_DO85: u8 = 0x85;
/// Encrypted data with padding-content indicator (even INS), short tag.
pub const TAG_DO87: u8 = 0x87;
/// Ephemeral public key (compressed), short tag.
pub const TAG_EPHEMERAL_PUB_KEY: u8 = 0x91;
/// Expected response length (Ne), short tag.
pub const TAG_DO97: u8 = 0x97;
/// Response status word, short tag.
pub const TAG_DO99: u8 = 0x99;
/// Cryptographic checksum (MAC), short tag.
pub const TAG_DO8E: u8 = 0x8E;
/// Certificate Holder Authorization Template, long (two-byte) tag.
pub const TAG_CHAT: [u8; 2] = [0x7F, 0x4C];

/// Encodes a short-tag BER-TLV object: `tag || length || value`.
pub fn encode_do(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + value.len());
    out.push(tag);
    length::encode_length_into(value.len(), &mut out);
    out.extend_from_slice(value);
    out
}

/// Encodes a long (two-byte) tag BER-TLV object, e.g. the CHAT's `7F 4C`.
pub fn encode_do_long_tag(tag: [u8; 2], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 + value.len());
    out.extend_from_slice(&tag);
    length::encode_length_into(value.len(), &mut out);
    out.extend_from_slice(value);
    out
}

/// Parses a single short-tag BER-TLV object at the start of `input`.
///
/// Returns `(tag, value_slice, bytes_consumed)`. Rejects declared lengths
/// that run past the end of `input`.
pub fn parse_do(input: &[u8]) -> Result<(u8, &[u8], usize), EacError> {
    let tag = *input.first().ok_or(EacError::TruncatedTlv)?;
    let (len, len_bytes) = length::decode_length(&input[1..])?;
    let header_len = 1 + len_bytes;
    if input.len() < header_len + len {
        return Err(EacError::TruncatedTlv);
    }
    Ok((tag, &input[header_len..header_len + len], header_len + len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn encode_do_round_trips_through_parse_do() {
        let encoded = encode_do(TAG_DO99, &[0x90, 0x00]);
        let (tag, value, consumed) = parse_do(&encoded).unwrap();
        assert_eq!(tag, TAG_DO99);
        assert_eq!(value, &[0x90, 0x00]);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn encode_do_long_tag_uses_two_tag_bytes() {
        let chat = encode_do_long_tag(TAG_CHAT, &[0x01, 0x02]);
        assert_eq!(chat, vec![0x7F, 0x4C, 0x02, 0x01, 0x02]);
    }

    #[test]
    fn parse_do_rejects_truncated_value() {
        let mut encoded = encode_do(TAG_DO97, &[0x01, 0x02, 0x03]);
        encoded.truncate(encoded.len() - 1);
        assert_eq!(parse_do(&encoded), Err(EacError::TruncatedTlv));
    }

    #[test]
    fn parse_do_rejects_empty_input() {
        assert_eq!(parse_do(&[]), Err(EacError::TruncatedTlv));
    }
}
