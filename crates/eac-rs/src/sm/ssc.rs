// crates/eac-rs/src/sm/ssc.rs
//! Send Sequence Counter: a fixed-width big-endian counter incremented
//! before every wrap and unwrap (§5).

use crate::sm::provider::BlockCipherKind;
use alloc::vec;
use alloc::vec::Vec;

/// A Send Sequence Counter whose width matches the session's block cipher
/// (8 bytes for 3DES, 16 bytes for AES).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ssc {
    bytes: Vec<u8>,
}

impl Ssc {
    /// Starts the counter at the given initial value (derived during key
    /// agreement), zero-padded or truncated on the left to `kind`'s width.
    pub fn new(kind: BlockCipherKind, initial_value: &[u8]) -> Self {
        let width = kind.block_size();
        let mut bytes = vec![0u8; width];
        let copy_len = initial_value.len().min(width);
        let src_start = initial_value.len() - copy_len;
        let dst_start = width - copy_len;
        bytes[dst_start..].copy_from_slice(&initial_value[src_start..]);
        Self { bytes }
    }

    /// Starts the counter at zero.
    pub fn zero(kind: BlockCipherKind) -> Self {
        Self {
            bytes: vec![0u8; kind.block_size()],
        }
    }

    /// The counter's current big-endian byte representation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Increments the counter by one, rippling the carry leftwards.
    pub fn increment(&mut self) {
        for byte in self.bytes.iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_without_carry() {
        let mut ssc = Ssc::new(BlockCipherKind::TripleDes, &[0, 0, 0, 0, 0, 0, 0, 0]);
        ssc.increment();
        assert_eq!(ssc.as_bytes(), &[0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn ripples_carry_across_a_single_boundary() {
        let mut ssc = Ssc::new(BlockCipherKind::TripleDes, &[0, 0, 0, 0, 0, 0, 0, 0xFF]);
        ssc.increment();
        assert_eq!(ssc.as_bytes(), &[0, 0, 0, 0, 0, 0, 1, 0x00]);
    }

    #[test]
    fn ripples_carry_across_multiple_boundaries() {
        let mut initial = vec![0u8; 13];
        initial.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        let mut ssc = Ssc::new(BlockCipherKind::Aes, &initial);
        ssc.increment();
        let mut expected = vec![0u8; 16];
        expected[12] = 1;
        assert_eq!(ssc.as_bytes(), expected.as_slice());
    }

    #[test]
    fn wraps_around_at_all_ff() {
        let mut ssc = Ssc::zero(BlockCipherKind::TripleDes);
        for _ in 0..8 {
            for byte in ssc.bytes.iter_mut() {
                *byte = 0xFF;
            }
        }
        ssc.increment();
        assert_eq!(ssc.as_bytes(), &[0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn new_zero_pads_a_short_initial_value_on_the_left() {
        let ssc = Ssc::new(BlockCipherKind::Aes, &[0x01, 0x02]);
        let mut expected = vec![0u8; 16];
        expected[14] = 0x01;
        expected[15] = 0x02;
        assert_eq!(ssc.as_bytes(), expected.as_slice());
    }
}
