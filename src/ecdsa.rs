//! ECDSA signatures.
//!
//! This module implements ECDSA (FIPS 186-4, SEC1, ANSI X9.62) over any
//! curve described by a `CurveParameters` value. The message is first
//! hashed by the caller (`sign()` and `verify()` take the hash value) or
//! by the `*_message()` helpers, which hash with a given `HashAlgorithm`.
//! The hash value is converted to an integer with the FIPS 186-4 rule
//! (leftmost bits, up to the bit length of the curve order n); that
//! integer is not required to be lower than n.
//!
//! A signature is a pair of integers (r, s), both in the `1..n-1` range.
//! Two encodings are supported:
//!
//!  - DER (ASN.1 `SEQUENCE` of two `INTEGER`), as used in X.509, TLS
//!    and Bitcoin; see the `der` module. Decoding is strict.
//!
//!  - The fixed-size "raw" format of IEEE P1363 (also used by JOSE and
//!    WebAuthn): `r` and `s`, each over the byte length of the curve
//!    order, unsigned big-endian, concatenated.
//!
//! The per-signature secret nonce `k` is chosen according to a
//! `NonceSource`, provided at each call: either derived
//! deterministically from the private key and the hash value (RFC 6979),
//! or drawn from a caller-provided cryptographically secure RNG.
//!
//! Verification returns a plain `bool`; functions that first have to
//! decode a signature return a `Result<bool>`, where an error means that
//! the signature could not be decoded at all.

#![allow(non_snake_case)]

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::CryptoRngCore;
use tracing::debug;

use crate::curve::CurveParameters;
use crate::der;
use crate::error::{CurveError, ParseError, Result};
use crate::field::int_to_bytes;
use crate::hasher::{bits2int, HashAlgorithm, Hasher};
use crate::keys::{random_scalar, PrivateKey, PublicKey};
use crate::rfc6979::NonceGenerator;

/// An ECDSA signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

/// Source of the per-signature nonce.
pub enum NonceSource<'r> {
    /// Deterministic generation with RFC 6979, using HMAC over the given
    /// hash function. This should normally be the hash function that
    /// produced the signed hash value.
    Deterministic(HashAlgorithm),
    /// Uniform generation from a cryptographically secure RNG.
    Random(&'r mut dyn CryptoRngCore),
}

impl Signature {

    /// Builds a signature from its two integers. The values are not
    /// range-checked here; out-of-range values make verification fail.
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    /// Gets the `r` component.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// Gets the `s` component.
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Encodes this signature in DER.
    pub fn to_der(&self) -> Vec<u8> {
        der::encode(&self.r, &self.s)
    }

    /// Decodes a DER-encoded signature for the given curve. Encoding
    /// errors are reported as `Error::Parse`; values of r or s that are
    /// zero or not lower than the curve order are reported as
    /// `Error::InvalidSignature`.
    pub fn from_der(curve: &CurveParameters, buf: &[u8]) -> Result<Self> {
        let (r, s) = der::decode(buf, curve.n())?;
        Ok(Self { r, s })
    }

    /// Encodes this signature in the fixed-size format (`r || s`, each
    /// over the byte length of the curve order). A value that does not
    /// fit in that length (possible only for a signature built with
    /// `new()`) is reported as `CurveError::ScalarOutOfRange`.
    pub fn to_fixed(&self, curve: &CurveParameters) -> Result<Vec<u8>> {
        let len = curve.order_bytes();
        let limit = (len as u64) << 3;
        if self.r.bits() > limit || self.s.bits() > limit {
            return Err(CurveError::ScalarOutOfRange.into());
        }
        let mut out = int_to_bytes(&self.r, len);
        out.extend_from_slice(&int_to_bytes(&self.s, len));
        Ok(out)
    }

    /// Decodes a signature in the fixed-size format. The input length
    /// must be exactly twice the byte length of the curve order.
    pub fn from_fixed(curve: &CurveParameters, buf: &[u8]) -> Result<Self> {
        let len = curve.order_bytes();
        if buf.len() != len << 1 {
            return Err(ParseError::BadLength.into());
        }
        Ok(Self {
            r: BigUint::from_bytes_be(&buf[..len]),
            s: BigUint::from_bytes_be(&buf[len..]),
        })
    }
}

// Nonce candidates, in order.
enum Nonces<'r> {
    Drbg(NonceGenerator),
    Rng(&'r mut dyn CryptoRngCore),
}

impl Nonces<'_> {
    fn next(&mut self, curve: &CurveParameters) -> BigUint {
        match self {
            Nonces::Drbg(ng) => ng.next_nonce(),
            Nonces::Rng(rng) => random_scalar(curve, &mut **rng),
        }
    }
}

/// Signs a hash value with ECDSA.
///
/// The hash value `hv` MUST be the output of a hash function over the
/// message, not the message itself. If `hv` is longer than the curve
/// order, it is truncated.
pub fn sign(key: &PrivateKey, hv: &[u8], nonce: NonceSource) -> Signature {
    let curve = key.curve();
    let sf = curve.scalars();
    let d = sf.reduce(key.scalar());
    let e = sf.reduce(&bits2int(hv, curve.order_bits()));

    let mut nonces = match nonce {
        NonceSource::Deterministic(alg) => Nonces::Drbg(
            NonceGenerator::new(alg, curve.n(), key.scalar(), hv, &[])),
        NonceSource::Random(rng) => Nonces::Rng(rng),
    };

    // The loop is exited on the first iteration, except with negligible
    // probability.
    loop {
        let k = sf.reduce(&nonces.next(curve));
        let R = curve.mul_gen(k.value());
        let r = match R.x() {
            Some(x) => sf.reduce(x.value()),
            None => sf.zero(),
        };
        if r.is_zero() {
            debug!(reason = "r = 0", "retrying ECDSA nonce");
            continue;
        }
        let s = sf.mul(&sf.invert_or_zero(&k), &sf.add(&e, &sf.mul(&r, &d)));
        if s.is_zero() {
            debug!(reason = "s = 0", "retrying ECDSA nonce");
            continue;
        }
        return Signature { r: r.into_value(), s: s.into_value() };
    }
}

// Core verification, with the hash value already converted to an integer.
fn verify_int(key: &PublicKey, e: &BigUint, sig: &Signature) -> bool {
    let curve = key.curve();
    let n = curve.n();
    if sig.r.is_zero() || &sig.r >= n {
        debug!(reason = "r out of range", "ECDSA signature rejected");
        return false;
    }
    if sig.s.is_zero() || &sig.s >= n {
        debug!(reason = "s out of range", "ECDSA signature rejected");
        return false;
    }
    let sf = curve.scalars();
    let w = sf.invert_or_zero(&sf.reduce(&sig.s));
    let u1 = sf.mul(&sf.reduce(e), &w);
    let u2 = sf.mul(&sf.reduce(&sig.r), &w);
    let R = curve.mul_add(u1.value(), curve.generator(), u2.value(), key.point());
    match R.x() {
        None => {
            debug!(reason = "R is the point at infinity", "ECDSA signature rejected");
            false
        }
        Some(x) => {
            if x.value() % n == sig.r {
                true
            } else {
                debug!(reason = "r mismatch", "ECDSA signature rejected");
                false
            }
        }
    }
}

/// Verifies an ECDSA signature over a hash value.
///
/// Returns `false` for any invalid signature, including signatures whose
/// `r` or `s` is out of range.
pub fn verify(key: &PublicKey, hv: &[u8], sig: &Signature) -> bool {
    verify_int(key, &bits2int(hv, key.curve().order_bits()), sig)
}

/// Hashes a message with the provided hash function, then signs it.
pub fn sign_message(key: &PrivateKey, msg: &[u8], alg: HashAlgorithm, nonce: NonceSource) -> Signature {
    sign(key, &alg.digest(msg), nonce)
}

/// Verifies a signature over a message, which is hashed with the
/// provided hash function.
pub fn verify_message(key: &PublicKey, msg: &[u8], alg: HashAlgorithm, sig: &Signature) -> bool {
    let e = Hasher::Ecdsa(alg).hash_to_int(msg, key.curve().order_bits());
    verify_int(key, &e, sig)
}

/// Verifies a DER-encoded signature over a hash value.
///
/// Malformed DER, and r or s values outside of `1..n-1`, are reported as
/// errors; a well-formed signature that does not match yields `Ok(false)`.
pub fn verify_der(key: &PublicKey, hv: &[u8], sig: &[u8]) -> Result<bool> {
    let sig = Signature::from_der(key.curve(), sig)?;
    Ok(verify(key, hv, &sig))
}
