//! Private and public keys.
//!
//! A private key is a scalar `d` in the `1..n-1` range, and the matching
//! public key is the point `Q = d*G`. Both are bound, by reference, to
//! the `CurveParameters` of their curve, so that a key cannot be used on
//! the wrong curve by accident; keys are immutable once built.
//!
//! Encodings:
//!
//!  - Private keys are encoded as the unsigned big-endian representation
//!    of the scalar, over exactly as many bytes as the curve order needs
//!    (32 bytes for a 256-bit curve, 66 bytes for P-521). This is the
//!    format used by SEC1 and RFC 5915 inside their `OCTET STRING`.
//!
//!  - Public keys use the SEC1 point encoding (compressed or not). The
//!    BIP-340 "x-only" format (the X coordinate alone) is also provided,
//!    for output; see the `schnorr` module for its decoding rules.
//!
//! Public keys decoded from external data are always validated: the point
//! must be on the curve, not the point-at-infinity, and in the subgroup
//! generated by the conventional generator.

#![allow(non_snake_case)]

use core::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::curve::{CurveParameters, Point};
use crate::error::{CurveError, ParseError, Result};
use crate::field::{decode_hex, int_to_bytes};

/// A private key, bound to its curve.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey<'c> {
    curve: &'c CurveParameters,
    d: BigUint,   // secret scalar
}

/// A public key (a validated curve point), bound to its curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey<'c> {
    curve: &'c CurveParameters,
    point: Point,
}

// The secret scalar is not printed.
impl fmt::Debug for PrivateKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve.name())
            .finish_non_exhaustive()
    }
}

// Draws a uniform scalar in 1..n-1 by rejection sampling.
pub(crate) fn random_scalar<T: CryptoRng + RngCore + ?Sized>(curve: &CurveParameters, rng: &mut T) -> BigUint {
    let n = curve.n();
    let mut buf = vec![0u8; curve.order_bytes()];
    let excess = (buf.len() << 3) - curve.order_bits();
    loop {
        rng.fill_bytes(&mut buf);
        buf[0] &= 0xFFu8 >> excess;
        let d = BigUint::from_bytes_be(&buf);
        if !d.is_zero() && &d < n {
            return d;
        }
    }
}

pub(crate) fn same_curve(c1: &CurveParameters, c2: &CurveParameters) -> bool {
    core::ptr::eq(c1, c2) || c1 == c2
}

impl<'c> PrivateKey<'c> {

    /// Generates a new private key from a cryptographically secure RNG.
    ///
    /// Candidate scalars are drawn with the bit length of the curve order
    /// and rejected if zero or not lower than `n`, so that the output is
    /// uniform in `1..n-1`. Since all supported curves have an order
    /// close to a power of two (or at least above half of it), the
    /// expected number of draws is below 2.
    pub fn generate<T: CryptoRng + RngCore>(curve: &'c CurveParameters, rng: &mut T) -> Self {
        Self { curve, d: random_scalar(curve, rng) }
    }

    /// Builds a private key from its scalar, which must be in `1..n-1`.
    pub fn from_scalar(curve: &'c CurveParameters, d: BigUint) -> Result<Self> {
        if d.is_zero() || &d >= curve.n() {
            return Err(CurveError::ScalarOutOfRange.into());
        }
        Ok(Self { curve, d })
    }

    /// Decodes a private key from its fixed-width big-endian encoding.
    ///
    /// The input length must match the curve order length exactly, and
    /// the value must be in the proper range.
    pub fn decode(curve: &'c CurveParameters, buf: &[u8]) -> Result<Self> {
        if buf.len() != curve.order_bytes() {
            return Err(ParseError::BadLength.into());
        }
        Self::from_scalar(curve, BigUint::from_bytes_be(buf))
    }

    /// Decodes a private key from hexadecimal. Shorter inputs are
    /// accepted (leading zeros may be omitted), but not longer ones.
    pub fn from_hex(curve: &'c CurveParameters, s: &str) -> Result<Self> {
        let buf = decode_hex(s)?;
        if buf.len() > curve.order_bytes() {
            return Err(ParseError::BadLength.into());
        }
        Self::from_scalar(curve, BigUint::from_bytes_be(&buf))
    }

    /// Encodes this private key (unsigned big-endian, fixed width).
    pub fn encode(&self) -> Vec<u8> {
        int_to_bytes(&self.d, self.curve.order_bytes())
    }

    /// Gets the secret scalar.
    pub fn scalar(&self) -> &BigUint {
        &self.d
    }

    /// Gets the curve this key is bound to.
    pub fn curve(&self) -> &'c CurveParameters {
        self.curve
    }

    /// Gets the public key corresponding to this private key.
    pub fn public_key(&self) -> PublicKey<'c> {
        PublicKey { curve: self.curve, point: self.curve.mul_gen(&self.d) }
    }

    /// Performs an ECDH key exchange with the provided peer public key.
    ///
    /// The shared secret is the X coordinate of `d*Q`, encoded over the
    /// field length (unsigned big-endian), as specified in SEC1 (section
    /// 3.3.1). The peer key must be on the same curve as this key.
    pub fn diffie_hellman(&self, peer: &PublicKey) -> Result<Vec<u8>> {
        if !same_curve(self.curve, peer.curve) {
            return Err(CurveError::CurveMismatch.into());
        }
        let S = self.curve.mul(&self.d, &peer.point);
        match S.x() {
            Some(x) => Ok(self.curve.field().encode(x)),
            None => Err(CurveError::Infinity.into()),
        }
    }
}

impl<'c> PublicKey<'c> {

    /// Builds a public key from a point, after validation.
    pub fn from_point(curve: &'c CurveParameters, point: Point) -> Result<Self> {
        validate_public_key(curve, &point)?;
        Ok(Self { curve, point })
    }

    /// Decodes a public key from its SEC1 encoding (compressed or
    /// uncompressed). The point is validated.
    pub fn decode(curve: &'c CurveParameters, buf: &[u8]) -> Result<Self> {
        let point = curve.decode_point(buf)?;
        Self::from_point(curve, point)
    }

    /// Decodes a public key from the hexadecimal string of its SEC1
    /// encoding.
    pub fn from_hex(curve: &'c CurveParameters, s: &str) -> Result<Self> {
        Self::decode(curve, &decode_hex(s)?)
    }

    /// Encodes this public key in SEC1 format.
    pub fn encode(&self, compressed: bool) -> Vec<u8> {
        self.curve.encode_point(&self.point, compressed)
    }

    /// Encodes the X coordinate only, over the field length. For BIP-340
    /// keys, this is the 32-byte x-only public key.
    pub fn x_only(&self) -> Vec<u8> {
        match self.point.x() {
            Some(x) => self.curve.field().encode(x),
            None => vec![0u8; self.curve.field_bytes()],
        }
    }

    /// Gets the public point.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Gets the curve this key is bound to.
    pub fn curve(&self) -> &'c CurveParameters {
        self.curve
    }
}

/// Checks that a point is acceptable as a public key: not the
/// point-at-infinity, on the curve, and (for curves with a cofactor)
/// in the prime-order subgroup.
pub fn validate_public_key(curve: &CurveParameters, Q: &Point) -> Result<()> {
    curve.validate_point(Q)
}
