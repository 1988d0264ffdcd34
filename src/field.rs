//! Prime field arithmetic.
//!
//! A `PrimeField` holds an odd prime modulus `p`; it is the context in
//! which `FieldElement` values are combined. Elements are always kept in
//! canonical form (an integer in `0..p`), and every operation returns a
//! canonical element. The same type is used for the base field of a
//! curve (coordinates, modulo `p`) and for the scalars (integers modulo
//! the subgroup order `n`), since the latter is also prime for all the
//! curves handled by this crate.
//!
//! Unlike the fixed-modulus backends of dedicated curve libraries, the
//! modulus is a runtime value, and the operations are methods of the field
//! (`f.add(&a, &b)`) rather than operators on the elements. Big integers
//! are handled with `num-bigint`. None of the functions here are
//! constant-time.
//!
//! Inversion uses Fermat's little theorem and thus assumes that the
//! modulus is prime; inverting zero is reported as an
//! `Error::Arithmetic`. Square roots use the `(p+1)/4` exponent when
//! `p = 3 mod 4`, and Tonelli-Shanks otherwise; when a square root
//! exists, the returned root is the "even" one (least significant bit
//! equal to zero when normalized in `0..p-1`).

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Error, ParseError, Result};

/// An element of a prime field, in canonical form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldElement(BigUint);

impl FieldElement {

    /// Gets the canonical integer value of this element.
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Consumes the element and returns its canonical integer value.
    pub fn into_value(self) -> BigUint {
        self.0
    }

    /// Returns `true` if this element is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this element is odd (its canonical
    /// representative has least significant bit equal to 1).
    pub fn is_odd(&self) -> bool {
        self.0.bit(0)
    }
}

/// A prime field `GF(p)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
    bit_len: usize,
    byte_len: usize,
}

impl PrimeField {

    /// Creates a field for the provided modulus.
    ///
    /// The modulus MUST be an odd prime; this is not verified (only
    /// cheap sanity checks are done in debug builds).
    pub fn new(modulus: BigUint) -> Self {
        debug_assert!(modulus.bit(0) && modulus > BigUint::from(2u32));
        let bit_len = modulus.bits() as usize;
        Self { modulus, bit_len, byte_len: (bit_len + 7) >> 3 }
    }

    /// Gets the field modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Gets the modulus length, in bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Gets the length, in bytes, of a fixed-size encoding of an element.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn zero(&self) -> FieldElement {
        FieldElement(BigUint::zero())
    }

    pub fn one(&self) -> FieldElement {
        FieldElement(BigUint::one())
    }

    /// Reduces an arbitrary integer into the field.
    pub fn reduce(&self, x: &BigUint) -> FieldElement {
        FieldElement(x % &self.modulus)
    }

    /// Builds an element from a small integer.
    pub fn from_u64(&self, x: u64) -> FieldElement {
        self.reduce(&BigUint::from(x))
    }

    /// Builds an element from an integer, which must already be in the
    /// `0..p` range; `None` is returned otherwise.
    pub fn element(&self, x: &BigUint) -> Option<FieldElement> {
        if x < &self.modulus {
            Some(FieldElement(x.clone()))
        } else {
            None
        }
    }

    /// Decodes an element from unsigned big-endian bytes. The value must
    /// be lower than the modulus (leading zero bytes are tolerated).
    pub fn decode(&self, buf: &[u8]) -> Option<FieldElement> {
        self.element(&BigUint::from_bytes_be(buf))
    }

    /// Decodes unsigned big-endian bytes and reduces the value modulo `p`.
    pub fn decode_reduce(&self, buf: &[u8]) -> FieldElement {
        self.reduce(&BigUint::from_bytes_be(buf))
    }

    /// Encodes an element over exactly `byte_len()` bytes (unsigned
    /// big-endian).
    pub fn encode(&self, a: &FieldElement) -> Vec<u8> {
        int_to_bytes(&a.0, self.byte_len)
    }

    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let mut r = &a.0 + &b.0;
        if r >= self.modulus {
            r -= &self.modulus;
        }
        FieldElement(r)
    }

    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        if a.0 >= b.0 {
            FieldElement(&a.0 - &b.0)
        } else {
            FieldElement(&self.modulus - &b.0 + &a.0)
        }
    }

    pub fn neg(&self, a: &FieldElement) -> FieldElement {
        if a.0.is_zero() {
            self.zero()
        } else {
            FieldElement(&self.modulus - &a.0)
        }
    }

    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement((&a.0 * &b.0) % &self.modulus)
    }

    pub fn square(&self, a: &FieldElement) -> FieldElement {
        self.mul(a, a)
    }

    /// Multiplies an element by a small integer.
    pub fn mul_small(&self, a: &FieldElement, k: u32) -> FieldElement {
        FieldElement((&a.0 * k) % &self.modulus)
    }

    /// Raises an element to an arbitrary (non-negative) power.
    /// By convention, `0^0 = 1`.
    pub fn pow(&self, a: &FieldElement, e: &BigUint) -> FieldElement {
        FieldElement(a.0.modpow(e, &self.modulus))
    }

    /// Computes the inverse of an element. Zero has no inverse, and
    /// yields an `Error::Arithmetic`.
    pub fn invert(&self, a: &FieldElement) -> Result<FieldElement> {
        if a.0.is_zero() {
            return Err(Error::Arithmetic("inverse of zero"));
        }
        Ok(self.invert_or_zero(a))
    }

    /// Computes the inverse of an element; zero is mapped to zero. This
    /// is meant for internal callers which know that the operand is not
    /// zero, or for which a zero result is the correct answer (e.g. the
    /// `Z` coordinate of the point-at-infinity).
    pub(crate) fn invert_or_zero(&self, a: &FieldElement) -> FieldElement {
        let e = &self.modulus - 2u32;
        self.pow(a, &e)
    }

    /// Computes `a/b`; fails if `b` is zero.
    pub fn div(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement> {
        Ok(self.mul(a, &self.invert(b)?))
    }

    /// Legendre symbol: 0 for zero, 1 for a non-zero quadratic residue,
    /// -1 for a non-residue.
    pub fn legendre(&self, a: &FieldElement) -> i32 {
        if a.0.is_zero() {
            return 0;
        }
        let e = (&self.modulus - 1u32) >> 1;
        if self.pow(a, &e).0.is_one() {
            1
        } else {
            -1
        }
    }

    /// Computes a square root of `a`, if one exists. The returned root is
    /// the even one.
    pub fn sqrt(&self, a: &FieldElement) -> Option<FieldElement> {
        if a.0.is_zero() {
            return Some(self.zero());
        }
        if self.legendre(a) != 1 {
            return None;
        }
        let r = if self.modulus.bit(1) {
            // p = 3 mod 4: a^((p+1)/4) is a root.
            let e = (&self.modulus + 1u32) >> 2;
            self.pow(a, &e)
        } else {
            self.tonelli_shanks(a)
        };
        debug_assert!(self.square(&r) == *a);
        if r.is_odd() {
            Some(self.neg(&r))
        } else {
            Some(r)
        }
    }

    // Tonelli-Shanks; a MUST be a non-zero quadratic residue.
    fn tonelli_shanks(&self, a: &FieldElement) -> FieldElement {
        // p - 1 = q*2^s with q odd.
        let pm1 = &self.modulus - 1u32;
        let s = pm1.trailing_zeros().unwrap_or(0);
        let q = &pm1 >> s;

        // Smallest non-residue; it is found quickly for all primes.
        let mut z = self.from_u64(2);
        while self.legendre(&z) != -1 {
            z = self.add(&z, &self.one());
        }

        let mut m = s;
        let mut c = self.pow(&z, &q);
        let mut t = self.pow(a, &q);
        let mut r = self.pow(a, &((&q + 1u32) >> 1));
        while !t.0.is_one() {
            // Least i such that t^(2^i) = 1 (0 < i < m).
            let mut i = 0;
            let mut tt = t.clone();
            while !tt.0.is_one() {
                tt = self.square(&tt);
                i += 1;
            }
            let mut b = c.clone();
            for _ in 0..(m - i - 1) {
                b = self.square(&b);
            }
            m = i;
            c = self.square(&b);
            t = self.mul(&t, &c);
            r = self.mul(&r, &b);
        }
        r
    }
}

// Encodes an integer over `len` bytes, unsigned big-endian. An integer
// that does not fit keeps its full minimal encoding (longer than `len`);
// high bytes are never dropped.
pub(crate) fn int_to_bytes(x: &BigUint, len: usize) -> Vec<u8> {
    if x.is_zero() {
        return vec![0u8; len];
    }
    let bb = x.to_bytes_be();
    if bb.len() >= len {
        return bb;
    }
    let mut out = vec![0u8; len - bb.len()];
    out.extend_from_slice(&bb);
    out
}

/// Decodes a hexadecimal string (either case, optional `0x` prefix)
/// into bytes.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    hex::decode(s).map_err(|_| ParseError::BadHex.into())
}

/// Parses a big-endian hexadecimal integer.
pub fn int_from_hex(s: &str) -> Result<BigUint> {
    Ok(BigUint::from_bytes_be(&decode_hex(s)?))
}
