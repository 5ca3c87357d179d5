// crates/eac-rs/src/sm/provider.rs
//! The cryptographic collaborator the Secure Messaging engine delegates to.
//!
//! Mirrors the crate's existing HAL pattern: core protocol logic stays
//! platform-agnostic and `no_std`, while the actual block cipher and MAC
//! primitives are supplied by whatever the embedder links in (a hardware
//! crypto accelerator, a software suite, a PC/SC wrapper, or a test double).

use crate::error::EacError;
use alloc::vec::Vec;

/// Which block cipher the session keys were derived for. Determines the
/// Send Sequence Counter width (§5) and the padding block size (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCipherKind {
    /// 3DES / DES, 8-byte blocks.
    TripleDes,
    /// AES-128/192/256, 16-byte blocks.
    Aes,
}

impl BlockCipherKind {
    /// Block size in bytes, which also fixes the SSC width (§5.1).
    pub fn block_size(self) -> usize {
        match self {
            BlockCipherKind::TripleDes => 8,
            BlockCipherKind::Aes => 16,
        }
    }
}

/// Abstracts the encryption and MAC primitives a Secure Messaging session
/// needs, so [`crate::sm::SmSession`] never touches key material or a
/// specific cipher implementation directly.
///
/// Implementations own the session keys (KSenc/KSmac) internally; they are
/// constructed with those keys already derived and are not expected to take
/// them as call arguments here.
pub trait CipherMacProvider {
    /// The cipher family this provider was initialized for; fixes SSC width
    /// and padding block size for the session using it.
    fn cipher_kind(&self) -> BlockCipherKind;

    /// Encrypts `plaintext` (already padded to a block multiple) under
    /// KSenc, using the IV derivation the protocol profile requires (for AES,
    /// `IV = KSenc encrypted with the SSC`; for 3DES, the zero IV).
    fn encrypt(&self, ssc: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, EacError>;

    /// Decrypts `ciphertext` (a whole number of blocks) under KSenc using the
    /// matching IV derivation.
    fn decrypt(&self, ssc: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, EacError>;

    /// Appends ISO/IEC 9797-1 padding method 2 (`80` then zero bytes) to
    /// bring `data` up to a multiple of the cipher's block size.
    fn add_padding(&self, data: &[u8]) -> Vec<u8> {
        let block_size = self.cipher_kind().block_size();
        let mut padded = Vec::with_capacity(data.len() + block_size);
        padded.extend_from_slice(data);
        padded.push(0x80);
        while padded.len() % block_size != 0 {
            padded.push(0x00);
        }
        padded
    }

    /// Computes the MAC (Retail MAC for 3DES, CMAC for AES) over
    /// `ssc || padded_input` under KSmac.
    fn get_mac(&self, ssc: &[u8], padded_input: &[u8]) -> Result<Vec<u8>, EacError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;
    impl CipherMacProvider for Probe {
        fn cipher_kind(&self) -> BlockCipherKind {
            BlockCipherKind::Aes
        }
        fn encrypt(&self, _ssc: &[u8], _plaintext: &[u8]) -> Result<Vec<u8>, EacError> {
            unimplemented!()
        }
        fn decrypt(&self, _ssc: &[u8], _ciphertext: &[u8]) -> Result<Vec<u8>, EacError> {
            unimplemented!()
        }
        fn get_mac(&self, _ssc: &[u8], _padded_input: &[u8]) -> Result<Vec<u8>, EacError> {
            unimplemented!()
        }
    }

    #[test]
    fn default_padding_pads_to_block_multiple() {
        let probe = Probe;
        let mut expected = alloc::vec![0x00; 16];
        expected[0] = 0x80;
        assert_eq!(probe.add_padding(&[]), expected);
        let padded = probe.add_padding(&[1, 2, 3]);
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[..3], &[1, 2, 3]);
        assert_eq!(padded[3], 0x80);
    }

    #[test]
    fn default_padding_adds_full_block_when_already_aligned() {
        let probe = Probe;
        let padded = probe.add_padding(&[0u8; 16]);
        assert_eq!(padded.len(), 32);
        assert_eq!(padded[16], 0x80);
    }
}
