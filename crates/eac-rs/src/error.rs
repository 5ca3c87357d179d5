// crates/eac-rs/src/error.rs
use core::fmt;

/// Error type for the TLV/APDU/MSE/SM core.
///
/// Mirrors the flat, `Copy`-friendly error enum style used throughout this
/// crate's `no_std` surface: one variant per failure kind, a hand-written
/// `Display`, and a `std::error::Error` impl gated on the `std` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EacError {
    /// A command APDU byte buffer does not match any of the seven ISO 7816-3
    /// cases (§4.2 classifier fell through to "malformed").
    MalformedApdu,
    /// A declared BER-TLV length runs past the end of the input buffer.
    TruncatedTlv,
    /// The provided buffer is too small to hold a serialized APDU or DO.
    BufferTooShort,
    /// A response data field was parsed but did not contain a DO99.
    MissingDo99,
    /// The MAC recomputed over the protected input does not match DO8E.
    BadMac,
    /// The cipher/MAC provider reported a failure.
    CipherFailure(&'static str),
    /// An optional feature named by the spec (e.g. auxiliary authenticated
    /// data, tag 0x67) was requested but is not implemented.
    UnsupportedOperation(&'static str),
    /// A wrap/unwrap call was made on a session already in the `Failed`
    /// state. The session must be torn down; it will not recover.
    SessionFailed,
}

impl fmt::Display for EacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedApdu => write!(f, "command APDU does not match any ISO 7816-3 case"),
            Self::TruncatedTlv => write!(f, "declared TLV length exceeds remaining input"),
            Self::BufferTooShort => write!(f, "output buffer is too small"),
            Self::MissingDo99 => write!(f, "secure messaging response is missing DO99"),
            Self::BadMac => write!(f, "recomputed MAC does not match DO8E"),
            Self::CipherFailure(s) => write!(f, "cipher/MAC provider failure: {}", s),
            Self::UnsupportedOperation(s) => write!(f, "unsupported operation: {}", s),
            Self::SessionFailed => write!(f, "secure messaging session is in the Failed state"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EacError {}
