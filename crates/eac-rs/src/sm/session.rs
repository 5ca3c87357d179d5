// crates/eac-rs/src/sm/session.rs
//! The Secure Messaging wrap/unwrap engine (§4, §6, §7).

use crate::apdu::{CommandApdu, ResponseApdu, StatusWord};
use crate::error::EacError;
use crate::log::{sm_error, sm_trace, sm_warn};
use crate::sm::provider::CipherMacProvider;
use crate::sm::ssc::Ssc;
use crate::tlv::{
    do87_ciphertext, encode_do, encode_do85, encode_do87, encode_do8e, encode_do97, parse_do,
    TAG_DO87, TAG_DO8E, TAG_DO97, TAG_DO99,
};
use alloc::boxed::Box;
use alloc::vec::Vec;

/// Lifecycle of a Secure Messaging session (§7).
///
/// `Failed` is terminal: only [`EacError::BadMac`] and
/// [`EacError::CipherFailure`] drive a session into it, since those are the
/// only failures that leave the SSC (and therefore all subsequent MACs) out
/// of sync between the two ends. Everything else — a malformed APDU, a
/// missing DO99 — is the caller's mistake and does not poison the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmState {
    Ready,
    Failed,
}

/// An established Secure Messaging session: the SSC, the keyed cipher/MAC
/// provider, and the current lifecycle state.
///
/// Holds no key material directly — that lives behind the
/// [`CipherMacProvider`] implementation — so there is no `Drop` impl here:
/// the SSC is a counter, not a secret, and leaving it in memory after the
/// session ends discloses nothing the `ssc()` accessor didn't already.
pub struct SmSession {
    provider: Box<dyn CipherMacProvider>,
    ssc: Ssc,
    state: SmState,
}

impl SmSession {
    /// Establishes a session with an already-derived provider and an
    /// initial SSC value (set during key agreement, §5.2).
    pub fn new(provider: Box<dyn CipherMacProvider>, initial_ssc: &[u8]) -> Self {
        let kind = provider.cipher_kind();
        Self {
            ssc: Ssc::new(kind, initial_ssc),
            provider,
            state: SmState::Ready,
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SmState {
        self.state
    }

    /// The current Send Sequence Counter value, exposed read-only for
    /// diagnostics and session resumption.
    pub fn ssc(&self) -> &[u8] {
        self.ssc.as_bytes()
    }

    fn fail_on(&mut self, err: EacError) -> EacError {
        if matches!(err, EacError::BadMac | EacError::CipherFailure(_)) {
            sm_error!("session transitioning to Failed: {}", err);
            self.state = SmState::Failed;
        }
        err
    }

    /// Protects `cmd` for transmission: encrypts any command data into
    /// DO87, encodes `Ne` into DO97 if present, and authenticates the whole
    /// header-plus-DOs under an incremented SSC into DO8E (§4.4.2).
    ///
    /// The plaintext command is classified before the SSC is touched: if
    /// this call returns before incrementing (session already `Failed`), the
    /// counter stays exactly where the peer last saw it, matching §4.4.5's
    /// invariant that a cancelled wrap leaves the SSC untouched.
    pub fn wrap(&mut self, cmd: &CommandApdu, extended: bool) -> Result<Vec<u8>, EacError> {
        if self.state == SmState::Failed {
            return Err(EacError::SessionFailed);
        }

        self.ssc.increment();
        sm_trace!("wrap: ssc incremented");

        let masked_header = [cmd.cla | 0x0C, cmd.ins, cmd.p1, cmd.p2];
        let padded_header = self.provider.add_padding(&masked_header);

        let mut protected_data = Vec::new();

        if let Some(data) = &cmd.data {
            let padded_plaintext = self.provider.add_padding(data);
            let ciphertext = self
                .provider
                .encrypt(self.ssc.as_bytes(), &padded_plaintext)
                .map_err(|e| self.fail_on(e))?;
            // Odd INS: no padding-content indicator (DO85). Even INS: DO87,
            // prefixed with the `01` ("padded") indicator (§4.4.2 step 4).
            if cmd.ins % 2 == 1 {
                protected_data.extend(encode_do85(&ciphertext));
            } else {
                protected_data.extend(encode_do87(&ciphertext));
            }
        }

        if let Some(ne) = cmd.ne {
            protected_data.extend(encode_do97(ne));
        }

        // §4.4.2 step 6: M = pad(header) || DOs, or just pad(header) alone
        // when there are no DOs (case1). The header is padded exactly once;
        // unlike unwrap's MAC input, this concatenation is not re-padded
        // afterwards (invariant §3.5).
        let mut mac_input = Vec::with_capacity(padded_header.len() + protected_data.len());
        mac_input.extend_from_slice(&padded_header);
        mac_input.extend_from_slice(&protected_data);

        let mac = self
            .provider
            .get_mac(self.ssc.as_bytes(), &mac_input)
            .map_err(|e| self.fail_on(e))?;
        protected_data.extend(encode_do8e(&mac));

        let ne = if extended { 65536 } else { 256 };
        let protected = CommandApdu {
            cla: masked_header[0],
            ins: cmd.ins,
            p1: cmd.p1,
            p2: cmd.p2,
            data: Some(protected_data),
            ne: Some(ne),
        };
        protected.to_bytes(extended)
    }

    /// Verifies and decrypts a protected response (§4.4.3).
    ///
    /// A response carrying no DO8E at all is treated as a MAC failure
    /// ([`EacError::BadMac`]) rather than silently accepted: there is
    /// nothing to check a session invariant against, and accepting it would
    /// let a stripped response through unnoticed.
    pub fn unwrap(&mut self, raw_response: &[u8]) -> Result<ResponseApdu, EacError> {
        if self.state == SmState::Failed {
            return Err(EacError::SessionFailed);
        }

        let response = ResponseApdu::from_bytes(raw_response)?;
        self.ssc.increment();
        sm_trace!("unwrap: ssc incremented");

        let mut do87_value: Option<Vec<u8>> = None;
        let mut do99_value: Option<Vec<u8>> = None;
        let mut do8e_value: Option<Vec<u8>> = None;
        let mut mac_input_end = None;

        let mut offset = 0;
        while offset < response.data.len() {
            let (tag, value, consumed) = parse_do(&response.data[offset..])?;
            match tag {
                TAG_DO87 => do87_value = Some(value.to_vec()),
                TAG_DO99 => do99_value = Some(value.to_vec()),
                TAG_DO8E => {
                    if mac_input_end.is_none() {
                        mac_input_end = Some(offset);
                    }
                    do8e_value = Some(value.to_vec());
                }
                _ => {}
            }
            offset += consumed;
        }

        // §4.4.3 step 3: DO99 is mandatory and is checked before the MAC is
        // even computed — a response missing it is the caller's/card's
        // mistake, not a MAC failure, and must not drive the session into
        // the terminal `Failed` state.
        let sw = match &do99_value {
            Some(v) if v.len() == 2 => StatusWord(v[0], v[1]),
            _ => return Err(EacError::MissingDo99),
        };

        let (mac_input_end, mac) = match (mac_input_end, &do8e_value) {
            (Some(end), Some(mac)) => (end, mac),
            _ => {
                sm_warn!("unwrap: response carries no DO8E");
                return Err(self.fail_on(EacError::BadMac));
            }
        };

        let padded_mac_input = self
            .provider
            .add_padding(&response.data[..mac_input_end]);
        let expected_mac = self
            .provider
            .get_mac(self.ssc.as_bytes(), &padded_mac_input)
            .map_err(|e| self.fail_on(e))?;

        if !constant_time_eq(&expected_mac, mac) {
            sm_warn!("unwrap: recomputed MAC does not match DO8E");
            return Err(self.fail_on(EacError::BadMac));
        }

        let data = match &do87_value {
            Some(value) => {
                let ciphertext = do87_ciphertext(value)?;
                let padded_plaintext = self
                    .provider
                    .decrypt(self.ssc.as_bytes(), ciphertext)
                    .map_err(|e| self.fail_on(e))?;
                strip_padding(&padded_plaintext)?.to_vec()
            }
            None => Vec::new(),
        };

        Ok(ResponseApdu { data, sw })
    }
}

fn strip_padding(padded: &[u8]) -> Result<&[u8], EacError> {
    match padded.iter().rposition(|&b| b != 0x00) {
        Some(idx) if padded[idx] == 0x80 => Ok(&padded[..idx]),
        _ => Err(EacError::CipherFailure("invalid ISO/IEC 9797-1 padding")),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
