//! Message hashing for signatures.
//!
//! Signature schemes never sign raw messages; they sign an integer
//! derived from a hash of the message. This module provides:
//!
//!  - `HashAlgorithm`: the supported hash functions (SHA-2 and SHA-3
//!    families), selected at runtime, with plain digest and HMAC
//!    computations. The hash functions themselves come from the `sha2`
//!    and `sha3` crates.
//!
//!  - `bits2int()`: the ECDSA conversion rule of FIPS 186-4 (and RFC 6979,
//!    section 2.3.2): the leftmost `qlen` bits of the hash output are
//!    interpreted as an unsigned big-endian integer, `qlen` being the bit
//!    length of the curve order. The result may exceed the curve order;
//!    modular reduction is left to the signature algorithm.
//!
//!  - `tagged_hash()`: the BIP-340 domain-separated hash,
//!    `SHA256(SHA256(tag) || SHA256(tag) || data)`.
//!
//!  - `Hasher`: a strategy value combining the above, which maps a message
//!    and a curve order length to an integer.

use num_bigint::BigUint;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

/// A hash function usable for message hashing and nonce derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

fn run<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut sh = D::new();
    for p in parts {
        sh.update(p);
    }
    sh.finalize().to_vec()
}

impl HashAlgorithm {

    /// Gets an algorithm by name. The names used in test vector files
    /// (e.g. "SHA-256", "SHA3-512", "SHA-512/256") are recognized, as
    /// well as the same names without the dash, in any case.
    pub fn from_name(name: &str) -> Option<Self> {
        let norm: String = name.chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        Some(match norm.as_str() {
            "SHA224" => Self::Sha224,
            "SHA256" => Self::Sha256,
            "SHA384" => Self::Sha384,
            "SHA512" => Self::Sha512,
            "SHA512/224" => Self::Sha512_224,
            "SHA512/256" => Self::Sha512_256,
            "SHA3224" => Self::Sha3_224,
            "SHA3256" => Self::Sha3_256,
            "SHA3384" => Self::Sha3_384,
            "SHA3512" => Self::Sha3_512,
            _ => return None,
        })
    }

    /// Gets the standard name of this algorithm.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
            Self::Sha512_224 => "SHA-512/224",
            Self::Sha512_256 => "SHA-512/256",
            Self::Sha3_224 => "SHA3-224",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_384 => "SHA3-384",
            Self::Sha3_512 => "SHA3-512",
        }
    }

    /// Gets the output length, in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha224 | Self::Sha512_224 | Self::Sha3_224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 => 32,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }

    /// Gets the internal block length (in bytes), as used by HMAC.
    pub fn block_len(self) -> usize {
        match self {
            Self::Sha224 | Self::Sha256 => 64,
            Self::Sha384 | Self::Sha512
                | Self::Sha512_224 | Self::Sha512_256 => 128,
            Self::Sha3_224 => 144,
            Self::Sha3_256 => 136,
            Self::Sha3_384 => 104,
            Self::Sha3_512 => 72,
        }
    }

    /// Hashes a message.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        self.digest_parts(&[data])
    }

    /// Hashes the concatenation of several byte slices.
    pub fn digest_parts(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Sha224 => run::<Sha224>(parts),
            Self::Sha256 => run::<Sha256>(parts),
            Self::Sha384 => run::<Sha384>(parts),
            Self::Sha512 => run::<Sha512>(parts),
            Self::Sha512_224 => run::<Sha512_224>(parts),
            Self::Sha512_256 => run::<Sha512_256>(parts),
            Self::Sha3_224 => run::<Sha3_224>(parts),
            Self::Sha3_256 => run::<Sha3_256>(parts),
            Self::Sha3_384 => run::<Sha3_384>(parts),
            Self::Sha3_512 => run::<Sha3_512>(parts),
        }
    }

    /// Computes HMAC (RFC 2104) over the concatenation of `parts`.
    pub fn hmac(self, key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
        let blen = self.block_len();
        let mut k = if key.len() > blen {
            self.digest(key)
        } else {
            key.to_vec()
        };
        k.resize(blen, 0);

        let ipad: Vec<u8> = k.iter().map(|b| b ^ 0x36).collect();
        let opad: Vec<u8> = k.iter().map(|b| b ^ 0x5C).collect();
        let mut inner_parts: Vec<&[u8]> = Vec::with_capacity(parts.len() + 1);
        inner_parts.push(&ipad);
        inner_parts.extend_from_slice(parts);
        let inner = self.digest_parts(&inner_parts);
        self.digest_parts(&[&opad, &inner])
    }
}

/// Converts a hash value into an integer, keeping only the leftmost
/// `qlen` bits (FIPS 186-4, RFC 6979 `bits2int`).
pub fn bits2int(hv: &[u8], qlen: usize) -> BigUint {
    let x = BigUint::from_bytes_be(hv);
    let vlen = hv.len() << 3;
    if vlen > qlen {
        x >> (vlen - qlen)
    } else {
        x
    }
}

/// BIP-340 tagged hash over the concatenation of `parts`.
pub fn tagged_hash(tag: &str, parts: &[&[u8]]) -> [u8; 32] {
    let th = Sha256::digest(tag.as_bytes());
    let mut sh = Sha256::new();
    sh.update(th);
    sh.update(th);
    for p in parts {
        sh.update(p);
    }
    sh.finalize().into()
}

/// Digest-to-integer strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hasher {
    /// Hash with the given function, then truncate to the curve order
    /// length (ECDSA).
    Ecdsa(HashAlgorithm),
    /// BIP-340 tagged hash with the given tag; no truncation.
    Tagged(&'static str),
}

impl Hasher {

    /// Maps a message to an integer, for a curve whose order has length
    /// `order_bits` bits. The result is NOT reduced modulo the order.
    pub fn hash_to_int(&self, msg: &[u8], order_bits: usize) -> BigUint {
        match self {
            Hasher::Ecdsa(alg) => bits2int(&alg.digest(msg), order_bits),
            Hasher::Tagged(tag) => BigUint::from_bytes_be(&tagged_hash(tag, &[msg])),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn digests() {
        assert!(hex::encode(HashAlgorithm::Sha256.digest(b"abc"))
            == "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert!(hex::encode(HashAlgorithm::Sha3_256.digest(b"abc"))
            == "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532");
        assert!(hex::encode(HashAlgorithm::Sha512_256.digest(b"abc"))
            == "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23");
        assert!(HashAlgorithm::Sha256.digest_parts(&[b"a", b"", b"bc"])
            == HashAlgorithm::Sha256.digest(b"abc"));
        for name in ["SHA-224", "SHA-256", "SHA-384", "SHA-512", "SHA-512/224",
            "SHA-512/256", "SHA3-224", "SHA3-256", "SHA3-384", "SHA3-512"]
        {
            let alg = HashAlgorithm::from_name(name).unwrap();
            assert!(alg.name() == name);
            assert!(alg.digest(b"").len() == alg.output_len());
        }
        assert!(HashAlgorithm::from_name("sha256") == Some(HashAlgorithm::Sha256));
        assert!(HashAlgorithm::from_name("MD5").is_none());
    }

    #[test]
    fn hmac() {
        // RFC 4231, test cases 2 and 6.
        let msg = b"what do ya want for nothing?";
        assert!(hex::encode(HashAlgorithm::Sha256.hmac(b"Jefe", &[msg]))
            == "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
        assert!(hex::encode(HashAlgorithm::Sha512.hmac(b"Jefe", &[msg]))
            == "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737");
        assert!(hex::encode(HashAlgorithm::Sha256.hmac(&[0xAA; 131],
            &[b"Test Using Larger Than Block-Size Key - Hash Key First"]))
            == "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54");
        assert!(hex::encode(HashAlgorithm::Sha3_256.hmac(b"Jefe", &[&msg[..4], &msg[4..]]))
            == "c7d4072e788877ae3596bbb0da73b887c9171f93095b294ae857fbe2645e1ba5");
    }

    #[test]
    fn truncation() {
        let hv = [0xFFu8; 32];
        assert!(bits2int(&hv, 256) == BigUint::from_bytes_be(&hv));
        assert!(bits2int(&hv, 224) == BigUint::from_bytes_be(&hv[..28]));
        assert!(bits2int(&hv, 521) == BigUint::from_bytes_be(&hv));
        assert!(bits2int(&[0x80, 0x01], 9) == BigUint::from(0x100u32));

        let h = Hasher::Ecdsa(HashAlgorithm::Sha512);
        let full = BigUint::from_bytes_be(&HashAlgorithm::Sha512.digest(b"abc"));
        assert!(h.hash_to_int(b"abc", 256) == (&full >> 256));
        assert!(h.hash_to_int(b"abc", 521) == full);
    }

    #[test]
    fn tagged() {
        assert!(hex::encode(tagged_hash("BIP0340/challenge", &[b"abc"]))
            == "770a5b7e7c304bbcc3ea107343ff951dd404312ef418db0c3b94e2ebfbb50087");
        assert!(Hasher::Tagged("BIP0340/challenge").hash_to_int(b"abc", 256)
            == BigUint::from_bytes_be(&tagged_hash("BIP0340/challenge", &[b"a", b"bc"])));

        // The tag digest is prepended twice.
        let th = Sha256::digest(b"BIP0340/aux");
        let double = Sha256::digest([&th[..], &th[..], &b"data"[..]].concat());
        let single = Sha256::digest([&th[..], &b"data"[..]].concat());
        assert!(tagged_hash("BIP0340/aux", &[b"data"])[..] == double[..]);
        assert!(tagged_hash("BIP0340/aux", &[b"data"])[..] != single[..]);
    }
}
