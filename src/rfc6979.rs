//! Deterministic nonce generation (RFC 6979).
//!
//! ECDSA needs, for each signature, a fresh secret scalar `k` in the
//! `1..n-1` range; reusing a value for two distinct messages, or merely
//! using a biased generator, reveals the private key. [RFC 6979] derives
//! `k` from the private key and the message hash with HMAC_DRBG, so that
//! signing needs no random source and is still safe.
//!
//! `NonceGenerator` implements section 3.2 of RFC 6979 for an arbitrary
//! curve order and any of the hash functions of `HashAlgorithm`. The
//! generator is an iterator-like object: `next_nonce()` returns the
//! first candidate, then, on subsequent calls, the next candidates (step
//! 3.2.h.3), which the signer uses when a candidate yields `r = 0` or
//! `s = 0`. Optional extra input (`k'` in section 3.6) can be mixed in.
//!
//! [RFC 6979]: https://datatracker.ietf.org/doc/html/rfc6979

#![allow(non_snake_case)]

use num_bigint::BigUint;
use num_traits::Zero;

use crate::field::int_to_bytes;
use crate::hasher::{bits2int, HashAlgorithm};

/// HMAC_DRBG state for nonce generation.
#[derive(Clone, Debug)]
pub struct NonceGenerator {
    alg: HashAlgorithm,
    n: BigUint,
    qlen: usize,
    K: Vec<u8>,
    V: Vec<u8>,
    started: bool,
}

/// Encodes an integer over `rlen = ceil(qlen/8)` bytes (RFC 6979,
/// section 2.3.3).
pub fn int2octets(x: &BigUint, qlen: usize) -> Vec<u8> {
    int_to_bytes(x, (qlen + 7) >> 3)
}

/// Converts a hash value into a sequence of `rlen` bytes, after
/// reduction modulo `n` (RFC 6979, section 2.3.4).
pub fn bits2octets(hv: &[u8], n: &BigUint) -> Vec<u8> {
    let qlen = n.bits() as usize;
    let z1 = bits2int(hv, qlen);
    let z2 = if &z1 >= n { z1 - n } else { z1 };
    int2octets(&z2, qlen)
}

impl NonceGenerator {

    /// Initializes the generator with the private scalar `x` (in `1..n-1`),
    /// the message hash `hv`, and an optional extra input (empty slice
    /// for the plain RFC 6979 process).
    pub fn new(alg: HashAlgorithm, n: &BigUint, x: &BigUint, hv: &[u8], extra: &[u8]) -> Self {
        let qlen = n.bits() as usize;
        let xb = int2octets(x, qlen);
        let hb = bits2octets(hv, n);
        let hlen = alg.output_len();

        // 3.2.b and 3.2.c
        let V = vec![0x01u8; hlen];
        let K = vec![0x00u8; hlen];

        // 3.2.d
        let K = alg.hmac(&K, &[&V, &[0x00], &xb, &hb, extra]);
        // 3.2.e
        let V = alg.hmac(&K, &[&V]);
        // 3.2.f
        let K = alg.hmac(&K, &[&V, &[0x01], &xb, &hb, extra]);
        // 3.2.g
        let V = alg.hmac(&K, &[&V]);

        Self { alg, n: n.clone(), qlen, K, V, started: false }
    }

    // 3.2.h.3: K = HMAC_K(V || 0x00), V = HMAC_K(V)
    fn reseed(&mut self) {
        self.K = self.alg.hmac(&self.K, &[&self.V, &[0x00]]);
        self.V = self.alg.hmac(&self.K, &[&self.V]);
    }

    /// Gets the next nonce candidate; it is always in `1..n-1`.
    pub fn next_nonce(&mut self) -> BigUint {
        if self.started {
            self.reseed();
        }
        self.started = true;
        loop {
            // 3.2.h.1 and 3.2.h.2
            let mut T = Vec::with_capacity((self.qlen >> 3) + self.V.len());
            while (T.len() << 3) < self.qlen {
                self.V = self.alg.hmac(&self.K, &[&self.V]);
                T.extend_from_slice(&self.V);
            }
            let k = bits2int(&T, self.qlen);
            if !k.is_zero() && k < self.n {
                return k;
            }
            self.reseed();
        }
    }
}
