//! Error types.
//!
//! Operations that can fail on malformed input return `Result<T, Error>`.
//! Signature verification is different: a signature that does not verify
//! is a normal outcome, reported as `false`, and never as an `Err`. An
//! `Err` from a verification function means that the input could not even
//! be interpreted (e.g. a DER blob with a bad length).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("arithmetic error: {0}")]
    Arithmetic(&'static str),
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("signature value out of range")]
    InvalidSignature,
    #[error("no private key provided")]
    MissingPrivateKey,
    #[error("unknown curve: {0}")]
    UnknownCurve(String),
}

/// Failures related to points, keys and scalars.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point at infinity not allowed")]
    Infinity,
    #[error("point is not in the prime-order subgroup")]
    WrongSubgroup,
    #[error("scalar out of range")]
    ScalarOutOfRange,
    #[error("objects bound to different curves")]
    CurveMismatch,
    #[error("operation not supported on this curve")]
    Unsupported,
}

/// Structural decoding failures (DER, point encodings, fixed-size inputs).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected tag {0:#04x}")]
    BadTag(u8),
    #[error("indefinite length")]
    IndefiniteLength,
    #[error("non-minimal length encoding")]
    NonMinimalLength,
    #[error("length does not fit")]
    LengthOverflow,
    #[error("declared length does not match content")]
    LengthMismatch,
    #[error("trailing bytes after structure")]
    TrailingBytes,
    #[error("input truncated")]
    Truncated,
    #[error("non-minimal integer encoding")]
    NonMinimalInteger,
    #[error("negative integer")]
    NegativeInteger,
    #[error("empty integer")]
    EmptyInteger,
    #[error("input has wrong length")]
    BadLength,
    #[error("invalid hexadecimal string")]
    BadHex,
    #[error("invalid point encoding")]
    BadPointEncoding,
}
