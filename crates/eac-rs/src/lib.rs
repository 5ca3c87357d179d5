#![cfg_attr(not(feature = "std"), no_std)]

//! Platform-agnostic core for ICAO 9303 / BSI TR-03110 eMRTD access: BER-TLV
//! data objects, ISO/IEC 7816-3 APDU framing, `MANAGE SECURITY ENVIRONMENT:
//! Set AT` construction, and a Secure Messaging wrap/unwrap session.
//!
//! The crate never touches a smart card reader or a concrete cipher
//! implementation directly. Card transport is the caller's problem; the
//! cryptographic primitives are supplied through [`sm::CipherMacProvider`],
//! the same seam this codebase's sibling crates use for hardware access.

extern crate alloc;

pub mod apdu;
pub mod error;
pub(crate) mod log;
pub mod mse;
pub mod sm;
pub mod tlv;

pub use apdu::{classify, ApduCase, CommandApdu, ResponseApdu, StatusWord};
pub use error::EacError;
pub use mse::{AuthTemplate, MseSetAtBuilder};
pub use sm::{BlockCipherKind, CipherMacProvider, SmSession, SmState};
