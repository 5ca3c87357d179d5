// crates/eac-rs/src/apdu/mod.rs
//! Command/response APDU types built on the BER-TLV primitives in [`crate::tlv`].

pub mod case;

pub use case::{classify, ApduCase};

use crate::error::EacError;
use alloc::vec::Vec;
use core::fmt;

/// A command APDU: `CLA INS P1 P2 [data] [Ne]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandApdu {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Option<Vec<u8>>,
    /// Expected response length, if any. `256` and `65536` are the short-
    /// and extended-form ceilings respectively (an encoded `Le` of `0`).
    pub ne: Option<u32>,
}

impl CommandApdu {
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            ne: None,
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_ne(mut self, ne: u32) -> Self {
        self.ne = Some(ne);
        self
    }

    fn header(&self) -> [u8; 4] {
        [self.cla, self.ins, self.p1, self.p2]
    }

    /// Parses a raw command APDU buffer, classifying it along the way.
    pub fn from_bytes(buffer: &[u8]) -> Result<(Self, ApduCase), EacError> {
        let apdu_case = classify(buffer)?;
        let (cla, ins, p1, p2) = (buffer[0], buffer[1], buffer[2], buffer[3]);

        let (data, ne) = match apdu_case {
            ApduCase::Case1 => (None, None),
            ApduCase::Case2s => {
                let le = buffer[4];
                (None, Some(if le == 0 { 256 } else { le as u32 }))
            }
            ApduCase::Case3s => {
                let lc = buffer[4] as usize;
                (Some(buffer[5..5 + lc].to_vec()), None)
            }
            ApduCase::Case4s => {
                let lc = buffer[4] as usize;
                let data = buffer[5..5 + lc].to_vec();
                let le = buffer[5 + lc];
                (Some(data), Some(if le == 0 { 256 } else { le as u32 }))
            }
            ApduCase::Case2e => {
                let le = u16::from_be_bytes([buffer[5], buffer[6]]);
                (None, Some(if le == 0 { 65536 } else { le as u32 }))
            }
            ApduCase::Case3e => {
                let n = 256 * buffer[5] as usize + buffer[6] as usize;
                (Some(buffer[7..7 + n].to_vec()), None)
            }
            ApduCase::Case4e => {
                let n = 256 * buffer[5] as usize + buffer[6] as usize;
                let data = buffer[7..7 + n].to_vec();
                let le = u16::from_be_bytes([buffer[7 + n], buffer[8 + n]]);
                (Some(data), Some(if le == 0 { 65536 } else { le as u32 }))
            }
        };

        Ok((
            Self {
                cla,
                ins,
                p1,
                p2,
                data,
                ne,
            },
            apdu_case,
        ))
    }

    /// Serializes the command in short form (`extended = false`) or
    /// extended form (`extended = true`) per ISO/IEC 7816-3 §12.1.
    ///
    /// `extended` is caller-chosen rather than size-inferred: Secure
    /// Messaging's extended-length setting is a session property, not a
    /// function of how large any one command happens to be.
    pub fn to_bytes(&self, extended: bool) -> Result<Vec<u8>, EacError> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.header());

        match (&self.data, self.ne) {
            (None, None) => {}
            (None, Some(ne)) => {
                if extended {
                    out.push(0x00);
                    push_ne_two_bytes(&mut out, ne);
                } else {
                    out.push(encode_short_ne(ne)?);
                }
            }
            (Some(data), None) => {
                if extended {
                    push_extended_lc(&mut out, data.len())?;
                    out.extend_from_slice(data);
                } else {
                    out.push(encode_short_lc(data.len())?);
                    out.extend_from_slice(data);
                }
            }
            (Some(data), Some(ne)) => {
                if extended {
                    push_extended_lc(&mut out, data.len())?;
                    out.extend_from_slice(data);
                    push_ne_two_bytes(&mut out, ne);
                } else {
                    out.push(encode_short_lc(data.len())?);
                    out.extend_from_slice(data);
                    out.push(encode_short_ne(ne)?);
                }
            }
        }

        Ok(out)
    }
}

fn encode_short_lc(len: usize) -> Result<u8, EacError> {
    if len == 0 || len > 0xFF {
        return Err(EacError::UnsupportedOperation(
            "command data length does not fit a short-form Lc",
        ));
    }
    Ok(len as u8)
}

fn encode_short_ne(ne: u32) -> Result<u8, EacError> {
    if ne > 256 {
        return Err(EacError::UnsupportedOperation(
            "expected response length does not fit a short-form Le",
        ));
    }
    Ok(if ne == 256 { 0x00 } else { ne as u8 })
}

fn push_extended_lc(out: &mut Vec<u8>, len: usize) -> Result<(), EacError> {
    if len > 0xFFFF {
        return Err(EacError::UnsupportedOperation(
            "command data length does not fit an extended-form Lc",
        ));
    }
    out.push(0x00);
    out.push((len >> 8) as u8);
    out.push((len & 0xFF) as u8);
    Ok(())
}

fn push_ne_two_bytes(out: &mut Vec<u8>, ne: u32) {
    if ne == 65536 {
        out.push(0x00);
        out.push(0x00);
    } else {
        out.push((ne >> 8) as u8);
        out.push((ne & 0xFF) as u8);
    }
}

/// A two-byte ISO/IEC 7816-4 response status word (`SW1 SW2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusWord(pub u8, pub u8);

impl StatusWord {
    /// `90 00`: normal processing.
    pub fn is_success(&self) -> bool {
        *self == StatusWord(0x90, 0x00)
    }

    /// `61 xx` signals that `xx` more bytes of response data are available
    /// via `GET RESPONSE`.
    pub fn data_remaining(&self) -> Option<u8> {
        if self.0 == 0x61 {
            Some(self.1)
        } else {
            None
        }
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.0, self.1)
    }
}

/// A response APDU: `[data] SW1 SW2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseApdu {
    pub data: Vec<u8>,
    pub sw: StatusWord,
}

impl ResponseApdu {
    pub fn from_bytes(buffer: &[u8]) -> Result<Self, EacError> {
        if buffer.len() < 2 {
            return Err(EacError::BufferTooShort);
        }
        let (data, sw) = buffer.split_at(buffer.len() - 2);
        Ok(Self {
            data: data.to_vec(),
            sw: StatusWord(sw[0], sw[1]),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        out.push(self.sw.0);
        out.push(self.sw.1);
        out
    }
}
