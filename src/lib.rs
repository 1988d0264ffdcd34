//! Wecc is a Rust library for elliptic-curve cryptography over short
//! Weierstraß curves.
//!
//! This library implements arithmetic in prime fields and on curves of
//! equation `y^2 = x^3 + a*x + b`, for any curve parameters provided at
//! runtime, and the ECDSA and BIP-340 (Schnorr) signature algorithms on
//! top of them. Signatures can be encoded in DER (with a strict decoder)
//! or in a fixed-size format. The standard curves secp256k1, NIST P-224,
//! P-256, P-384 and P-521, and brainpoolP256r1 are predefined in the
//! `curves` module.
//!
//! Modules, from the bottom up:
//!
//!  - `field`: arithmetic modulo a prime (`PrimeField`, `FieldElement`),
//!    including inversion and square roots.
//!
//!  - `curve`: curve parameters (`CurveParameters`), points (`Point`) and
//!    the group law, scalar multiplication, and SEC1 point encoding.
//!
//!  - `curves`: named curves, and the `CurveRegistry` that maps names,
//!    aliases and OIDs to curves.
//!
//!  - `keys`: private and public keys (`PrivateKey`, `PublicKey`),
//!    key generation, encoding, validation, and ECDH.
//!
//!  - `hasher`: hash functions (`HashAlgorithm`), HMAC, and the conversion
//!    of messages into integers (`Hasher`), both with the ECDSA truncation
//!    rule and with BIP-340 tagged hashes.
//!
//!  - `rfc6979`: deterministic ECDSA nonces.
//!
//!  - `ecdsa`: ECDSA signatures (`Signature`), with deterministic or
//!    random nonces (`NonceSource`).
//!
//!  - `schnorr`: BIP-340 signatures, with x-only public keys.
//!
//!  - `der`: DER codec for (r, s) pairs.
//!
//!  - `error`: error types.
//!
//! # Usage
//!
//! Curve parameters are immutable; an application builds them once
//! (usually with `CurveRegistry::standard()`) and passes them by reference
//! to all operations. Keys keep a reference to their curve.
//!
//! ```
//! use wecc::curves::CurveRegistry;
//! use wecc::ecdsa::{self, NonceSource};
//! use wecc::hasher::HashAlgorithm;
//! use wecc::keys::PrivateKey;
//!
//! let registry = CurveRegistry::standard();
//! let curve = registry.lookup("P-256").unwrap();
//! let sk = PrivateKey::from_hex(curve,
//!     "C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721").unwrap();
//! let alg = HashAlgorithm::Sha256;
//! let sig = ecdsa::sign_message(&sk, b"sample", alg, NonceSource::Deterministic(alg));
//! let der = sig.to_der();
//! let pk = sk.public_key();
//! assert!(ecdsa::verify_der(&pk, &alg.digest(b"sample"), &der).unwrap());
//! ```
//!
//! # Conventions
//!
//! Functions that decode external data return a `Result`; the `Error`
//! type tells apart arithmetic errors, invalid points or scalars, and
//! malformed encodings. Signature verification functions return `bool`
//! (or `Result<bool>` when the signature must first be decoded): a
//! signature that does not verify is not an error. Rejections are
//! reported with `tracing` events at the debug level, with the reason;
//! no secret value is ever logged.
//!
//! Integers are handled with `num-bigint`. None of the functions are
//! constant-time; this library is not meant for use in contexts where
//! timing side channels matter.

pub mod error;
pub mod field;
pub mod curve;
pub mod curves;
pub mod keys;
pub mod hasher;
pub mod rfc6979;
pub mod ecdsa;
pub mod schnorr;
pub mod der;

pub use rand_core::{CryptoRng, CryptoRngCore, RngCore};
pub use error::{CurveError, Error, ParseError, Result};
