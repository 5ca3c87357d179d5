// crates/eac-rs/src/tlv/do_objects.rs
//! Encoders for the specific secure-messaging data objects (§4.1).

use super::{encode_do, TAG_DO85, TAG_DO87, TAG_DO8E, TAG_DO97, TAG_DO99};
use crate::error::EacError;
use alloc::vec;
use alloc::vec::Vec;

/// DO85: encrypted command data with no padding-content indicator, used for
/// odd-INS commands.
pub fn encode_do85(ciphertext: &[u8]) -> Vec<u8> {
    encode_do(TAG_DO85, ciphertext)
}

/// DO87: encrypted command data prefixed with the ISO/IEC 7816-4 padding-
/// content indicator `0x01` ("padded"), used for even-INS commands.
pub fn encode_do87(ciphertext: &[u8]) -> Vec<u8> {
    let mut value = Vec::with_capacity(1 + ciphertext.len());
    value.push(0x01);
    value.extend_from_slice(ciphertext);
    encode_do(TAG_DO87, &value)
}

/// Strips the leading padding-content indicator from a parsed DO87 value,
/// returning the ciphertext. Only indicator `0x01` ("padded") is supported.
pub fn do87_ciphertext(value: &[u8]) -> Result<&[u8], EacError> {
    match value.split_first() {
        Some((0x01, rest)) => Ok(rest),
        Some((_, _)) => Err(EacError::UnsupportedOperation(
            "DO87 padding-content indicator other than 0x01",
        )),
        None => Err(EacError::TruncatedTlv),
    }
}

/// DO97: expected response length `Ne`, encoded in the minimum width that
/// represents it (1, 2, or 3 bytes; `Ne = 65536` encodes as `00 00 00`).
pub fn encode_do97(ne: u32) -> Vec<u8> {
    let value: Vec<u8> = if ne == 65536 {
        vec![0x00, 0x00, 0x00]
    } else if ne <= 0xFF {
        vec![ne as u8]
    } else {
        vec![(ne >> 8) as u8, (ne & 0xFF) as u8]
    };
    encode_do(TAG_DO97, &value)
}

/// DO99: the two-byte response status word.
pub fn encode_do99(sw1: u8, sw2: u8) -> Vec<u8> {
    encode_do(TAG_DO99, &[sw1, sw2])
}

/// DO8E: the cryptographic checksum (MAC).
pub fn encode_do8e(mac: &[u8]) -> Vec<u8> {
    encode_do(TAG_DO8E, mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn do85_has_no_padding_indicator() {
        let do85 = encode_do85(&[0xAA, 0xBB]);
        assert_eq!(do85, vec![0x85, 0x02, 0xAA, 0xBB]);
    }

    #[test]
    fn do87_prefixes_padding_indicator() {
        let do87 = encode_do87(&[0xAA, 0xBB]);
        assert_eq!(do87, vec![0x87, 0x03, 0x01, 0xAA, 0xBB]);
        assert_eq!(do87_ciphertext(&do87[2..]).unwrap(), &[0xAA, 0xBB]);
    }

    #[test]
    fn do87_ciphertext_rejects_unknown_indicator() {
        assert_eq!(
            do87_ciphertext(&[0x02, 0xAA]),
            Err(EacError::UnsupportedOperation(
                "DO87 padding-content indicator other than 0x01"
            ))
        );
    }

    #[test]
    fn do97_uses_minimum_width() {
        assert_eq!(encode_do97(0x00), vec![0x97, 0x01, 0x00]);
        assert_eq!(encode_do97(0xFF), vec![0x97, 0x01, 0xFF]);
        assert_eq!(encode_do97(0x100), vec![0x97, 0x02, 0x01, 0x00]);
        assert_eq!(encode_do97(0xFFFF), vec![0x97, 0x02, 0xFF, 0xFF]);
        assert_eq!(encode_do97(65536), vec![0x97, 0x03, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn do99_is_two_bytes() {
        assert_eq!(encode_do99(0x90, 0x00), vec![0x99, 0x02, 0x90, 0x00]);
    }

    #[test]
    fn do8e_wraps_mac_verbatim() {
        let mac = [1u8, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(
            encode_do8e(&mac),
            vec![0x8E, 0x08, 1, 2, 3, 4, 5, 6, 7, 8]
        );
    }
}
