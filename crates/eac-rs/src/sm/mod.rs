// crates/eac-rs/src/sm/mod.rs
//! Secure Messaging: the cipher/MAC provider seam, the Send Sequence
//! Counter, and the wrap/unwrap session engine built on top of them.

pub mod provider;
pub mod session;
pub mod ssc;

pub use provider::{BlockCipherKind, CipherMacProvider};
pub use session::{SmSession, SmState};
pub use ssc::Ssc;
