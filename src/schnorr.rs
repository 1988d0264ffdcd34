//! BIP-340 Schnorr signatures.
//!
//! This module implements the Schnorr signature scheme of [BIP-340], as
//! used by Bitcoin (Taproot). It is defined over secp256k1, but the code
//! works on any curve with 32-byte field elements and scalars; other
//! curves are rejected with `CurveError::Unsupported`.
//!
//! Conventions:
//!
//!  - Public keys are "x-only": only the 32-byte X coordinate is
//!    transmitted, and the Y coordinate is implicitly the even square
//!    root. A private key `d` whose public point `d*G` has an odd Y is
//!    used as `n - d` when signing.
//!
//!  - A signature is 64 bytes: the X coordinate of the nonce point R
//!    (which has an even Y), then the scalar s, both big-endian.
//!
//!  - All hashes are BIP-340 tagged hashes (`BIP0340/aux`,
//!    `BIP0340/nonce` and `BIP0340/challenge`).
//!
//! Messages may have any length. The auxiliary randomness used when
//! signing has length exactly 32 bytes; it may be all-zeros, in which
//! case signing is deterministic.
//!
//! [BIP-340]: https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki

#![allow(non_snake_case)]

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use crate::curve::{CurveParameters, Point};
use crate::error::{CurveError, Error, ParseError, Result};
use crate::field::int_to_bytes;
use crate::hasher::{tagged_hash, Hasher};

pub const TAG_AUX: &str = "BIP0340/aux";
pub const TAG_NONCE: &str = "BIP0340/nonce";
pub const TAG_CHALLENGE: &str = "BIP0340/challenge";

fn check_curve(curve: &CurveParameters) -> Result<()> {
    if curve.field_bytes() != 32 || curve.order_bytes() != 32 {
        return Err(CurveError::Unsupported.into());
    }
    Ok(())
}

// Decodes the secret scalar; it must be in 1..n-1.
fn secret_scalar(curve: &CurveParameters, secret: &[u8]) -> Result<BigUint> {
    if secret.is_empty() {
        return Err(Error::MissingPrivateKey);
    }
    if secret.len() != 32 {
        return Err(ParseError::BadLength.into());
    }
    let d = BigUint::from_bytes_be(secret);
    if d.is_zero() || &d >= curve.n() {
        return Err(CurveError::ScalarOutOfRange.into());
    }
    Ok(d)
}

// e = H_challenge(R.x || P.x || m) mod n
fn challenge(curve: &CurveParameters, rx: &[u8], px: &[u8], msg: &[u8]) -> BigUint {
    let mut data = Vec::with_capacity(64 + msg.len());
    data.extend_from_slice(rx);
    data.extend_from_slice(px);
    data.extend_from_slice(msg);
    Hasher::Tagged(TAG_CHALLENGE).hash_to_int(&data, curve.order_bits()) % curve.n()
}

/// Computes the x-only public key (32 bytes) for a secret key (32 bytes,
/// big-endian).
pub fn public_key(curve: &CurveParameters, secret: &[u8]) -> Result<[u8; 32]> {
    check_curve(curve)?;
    let d = secret_scalar(curve, secret)?;
    let P = curve.mul_gen(&d);
    let mut pk = [0u8; 32];
    if let Some(x) = P.x() {
        pk.copy_from_slice(&curve.field().encode(x));
    }
    Ok(pk)
}

/// Signs a message.
///
/// The secret key is the 32-byte big-endian encoding of a scalar in
/// `1..n-1`. An empty secret is reported as `Error::MissingPrivateKey`.
/// The auxiliary randomness `aux` must have length 32 bytes.
pub fn sign(curve: &CurveParameters, secret: &[u8], msg: &[u8], aux: &[u8]) -> Result<[u8; 64]> {
    check_curve(curve)?;
    let d0 = secret_scalar(curve, secret)?;
    if aux.len() != 32 {
        return Err(ParseError::BadLength.into());
    }
    let n = curve.n();

    // Normalize the key so that the public point has an even Y.
    let P = curve.mul_gen(&d0);
    let (px, py) = P.coordinates().ok_or(CurveError::Infinity)?;
    let d = if py.is_odd() { n - &d0 } else { d0 };
    let pkx = curve.field().encode(px);

    // t = bytes(d) xor H_aux(a)
    let mut t = int_to_bytes(&d, 32);
    for (tb, hb) in t.iter_mut().zip(tagged_hash(TAG_AUX, &[aux]).iter()) {
        *tb ^= *hb;
    }

    // k0 = H_nonce(t || P.x || m) mod n
    let k0 = BigUint::from_bytes_be(&tagged_hash(TAG_NONCE, &[&t, &pkx, msg])) % n;
    if k0.is_zero() {
        return Err(Error::Arithmetic("zero nonce"));
    }
    let R = curve.mul_gen(&k0);
    let (rx, ry) = R.coordinates().ok_or(CurveError::Infinity)?;
    let k = if ry.is_odd() { n - &k0 } else { k0 };
    let rxb = curve.field().encode(rx);

    let e = challenge(curve, &rxb, &pkx, msg);
    let s = (k + e * &d) % n;

    let mut sig = [0u8; 64];
    sig[..32].copy_from_slice(&rxb);
    sig[32..].copy_from_slice(&int_to_bytes(&s, 32));
    Ok(sig)
}

/// Verifies a signature.
///
/// The public key must have length 32 bytes, and the signature 64 bytes;
/// other lengths are reported as `ParseError::BadLength`. Otherwise, the
/// result is `Ok(true)` or `Ok(false)`; an x-only key that does not match
/// a curve point, or out-of-range signature values, yield `Ok(false)`.
pub fn verify(curve: &CurveParameters, pk: &[u8], msg: &[u8], sig: &[u8]) -> Result<bool> {
    check_curve(curve)?;
    if pk.len() != 32 || sig.len() != 64 {
        return Err(ParseError::BadLength.into());
    }
    let P = match lift_x_even(curve, pk) {
        Some(P) => P,
        None => {
            debug!(reason = "public key is not a curve point", "BIP-340 signature rejected");
            return Ok(false);
        }
    };
    let r = BigUint::from_bytes_be(&sig[..32]);
    if &r >= curve.p() {
        debug!(reason = "r out of range", "BIP-340 signature rejected");
        return Ok(false);
    }
    let s = BigUint::from_bytes_be(&sig[32..]);
    if &s >= curve.n() {
        debug!(reason = "s out of range", "BIP-340 signature rejected");
        return Ok(false);
    }

    let e = challenge(curve, &sig[..32], pk, msg);
    let R = curve.mul_add(&s, curve.generator(), &(curve.n() - e), &P);
    let (rx, ry) = match R.coordinates() {
        Some(c) => c,
        None => {
            debug!(reason = "R is the point at infinity", "BIP-340 signature rejected");
            return Ok(false);
        }
    };
    if ry.is_odd() {
        debug!(reason = "R has an odd Y", "BIP-340 signature rejected");
        return Ok(false);
    }
    if rx.value() != &r {
        debug!(reason = "r mismatch", "BIP-340 signature rejected");
        return Ok(false);
    }
    Ok(true)
}

// Gets the point with the provided X coordinate and an even Y, if it
// exists.
fn lift_x_even(curve: &CurveParameters, xb: &[u8]) -> Option<Point> {
    let x = BigUint::from_bytes_be(xb);
    if &x >= curve.p() {
        return None;
    }
    curve.lift_x(&x, false)
}

/// Formats a signature (or any byte string) as uppercase hexadecimal,
/// the form used by the BIP-340 test vectors.
pub fn to_hex_upper(buf: &[u8]) -> String {
    hex::encode_upper(buf)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::curves;

    // Official BIP-340 test vectors (test-vectors.csv):
    // (secret key, public key, aux_rand, message, signature, result)
    static VECTORS: [(&str, &str, &str, &str, &str, bool); 15] = [
        ("0000000000000000000000000000000000000000000000000000000000000003",
         "F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9",
         "0000000000000000000000000000000000000000000000000000000000000000",
         "0000000000000000000000000000000000000000000000000000000000000000",
         "E907831F80848D1069A5371B402410364BDF1C5F8307B0084C55F1CE2DCA821525F66A4A85EA8B71E482A74F382D2CE5EBEEE8FDB2172F477DF4900D310536C0",
         true),
        ("B7E151628AED2A6ABF7158809CF4F3C762E7160F38B4DA56A784D9045190CFEF",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "0000000000000000000000000000000000000000000000000000000000000001",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "6896BD60EEAE296DB48A229FF71DFE071BDE413E6D43F917DC8DCF8C78DE33418906D11AC976ABCCB20B091292BFF4EA897EFCB639EA871CFA95F6DE339E4B0A",
         true),
        ("C90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74020BBEA63B14E5C9",
         "DD308AFEC5777E13121FA72B9CC1B7CC0139715309B086C960E18FD969774EB8",
         "C87AA53824B4D7AE2EB035A2B5BBBCCC080E76CDC6D1692C4B0B62D798E6D906",
         "7E2D58D8B3BCDF1ABADEC7829054F90DDA9805AAB56C77333024B9D0A508B75C",
         "5831AAEED7B44BB74E5EAB94BA9D4294C49BCF2A60728D8B4C200F50DD313C1BAB745879A5AD954A72C45A91C3A51D3C7ADEA98D82F8481E0E1E03674A6F3FB7",
         true),
        ("0B432B2677937381AEF05BB02A66ECD012773062CF3FA2549E44F58ED2401710",
         "25D1DFF95105F5253C4022F628A996AD3A0D95FBF21D468A1B33F8C160D8F517",
         "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
         "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
         "7EB0509757E246F19449885651611CB965ECC1A187DD51B64FDA1EDC9637D5EC97582B9CB13DB3933705B32BA982AF5AF25FD78881EBB32771FC5922EFC66EA3",
         true),
        ("",
         "D69C3509BB99E412E68B0FE8544E72837DFA30746D8BE2AA65975F29D22DC7B9",
         "",
         "4DF3C3F68FCC83B27E9D42C90431A72499F17875C81A599B566C9889B9696703",
         "00000000000000000000003B78CE563F89A0ED9414F5AA28AD0D96D6795F9C6376AFB1548AF603B3EB45C9F8207DEE1060CB71C04E80F593060B07D28308D7F4",
         true),
        // public key not on the curve
        ("",
         "EEFDEA4CDB677750A420FEE807EACF21EB9898AE79B9768766E4FAA04A2D4A34",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E17776969E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B",
         false),
        // has_even_y(R) is false
        ("",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "FFF97BD5755EEEA420453A14355235D382F6472F8568A18B2F057A14602975563CC27944640AC607CD107AE10923D9EF7A73C643E166BE5EBEAFA34B1AC553E2",
         false),
        // negated message
        ("",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "1FA62E331EDBC21C394792D2AB1100A7B432B013DF3F6FF4F99FCB33E0E1515F28890B3EDB6E7189B630448B515CE4F8622A954CFE545735AAEA5134FCCDB2BD",
         false),
        // negated s value
        ("",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E177769961764B3AA9B2FFCB6EF947B6887A226E8D7C93E00C5ED0C1834FF0D0C2E6DA6",
         false),
        // sG - eP is infinite (x(inf) = 0)
        ("",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "0000000000000000000000000000000000000000000000000000000000000000123DDA8328AF9C23A94C1FEECFD123BA4FB73476F0D594DCB65C6425BD186051",
         false),
        // sG - eP is infinite (x(inf) = 1)
        ("",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "00000000000000000000000000000000000000000000000000000000000000017615FBAF5AE28864013C099742DEADB4DBA87F11AC6754F93780D5A1837CF197",
         false),
        // sig[0:32] is not an X coordinate on the curve
        ("",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "4A298DACAE57395A15D0795DDBFD1DCB564DA82B0F269BC70A74F8220429BA1D69E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B",
         false),
        // sig[0:32] is equal to the field size
        ("",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F69E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B",
         false),
        // sig[32:64] is equal to the curve order
        ("",
         "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E177769FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
         false),
        // public key exceeds the field size
        ("",
         "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC30",
         "",
         "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
         "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E17776969E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B",
         false),
    ];

    #[test]
    fn bip340_vectors() {
        let curve = curves::secp256k1();
        for (sk, pk, aux, msg, sig, result) in VECTORS.iter() {
            let pk = hex::decode(pk).unwrap();
            let msg = hex::decode(msg).unwrap();
            let sig = hex::decode(sig).unwrap();
            if !sk.is_empty() {
                let skb = hex::decode(sk).unwrap();
                let auxb = hex::decode(aux).unwrap();
                assert!(public_key(&curve, &skb).unwrap()[..] == pk[..]);
                let s = sign(&curve, &skb, &msg, &auxb).unwrap();
                assert!(to_hex_upper(&s) == to_hex_upper(&sig));
            }
            assert!(verify(&curve, &pk, &msg, &sig).unwrap() == *result);
        }
    }

    #[test]
    fn sign_verify() {
        let curve = curves::secp256k1();
        let mut sk = [0u8; 32];
        for i in 1..30u8 {
            sk[0] = i;
            sk[31] = i.wrapping_mul(37);
            let pk = public_key(&curve, &sk).unwrap();
            let aux = tagged_hash("test aux", &[&[i]]);
            // Messages of various lengths, including empty.
            let msg = vec![i; i as usize];
            let sig = sign(&curve, &sk, &msg, &aux).unwrap();
            assert!(verify(&curve, &pk, &msg, &sig).unwrap());
            assert!(!verify(&curve, &pk, &msg[1..], &sig).unwrap());
            let mut bad = sig;
            bad[40] ^= 0x80;
            assert!(!verify(&curve, &pk, &msg, &bad).unwrap());
        }
    }

    #[test]
    fn errors() {
        let curve = curves::secp256k1();
        let aux = [0u8; 32];
        assert!(sign(&curve, &[], b"msg", &aux) == Err(Error::MissingPrivateKey));
        assert!(sign(&curve, &[0u8; 32], b"msg", &aux)
            == Err(Error::Curve(CurveError::ScalarOutOfRange)));
        let n = curve.n().to_bytes_be();
        assert!(sign(&curve, &n, b"msg", &aux)
            == Err(Error::Curve(CurveError::ScalarOutOfRange)));
        assert!(sign(&curve, &[1u8; 31], b"msg", &aux)
            == Err(Error::Parse(ParseError::BadLength)));
        assert!(sign(&curve, &[1u8; 32], b"msg", &aux[..16])
            == Err(Error::Parse(ParseError::BadLength)));
        assert!(public_key(&curve, &[]) == Err(Error::MissingPrivateKey));

        let pk = public_key(&curve, &[1u8; 32]).unwrap();
        let sig = sign(&curve, &[1u8; 32], b"msg", &aux).unwrap();
        assert!(verify(&curve, &pk[..31], b"msg", &sig)
            == Err(Error::Parse(ParseError::BadLength)));
        assert!(verify(&curve, &pk, b"msg", &sig[..63])
            == Err(Error::Parse(ParseError::BadLength)));

        let p384 = curves::nist_p384();
        assert!(verify(&p384, &pk, b"msg", &sig)
            == Err(Error::Curve(CurveError::Unsupported)));
    }

    #[test]
    fn hex_upper() {
        assert!(to_hex_upper(&[0x00, 0xAB, 0x3c]) == "00AB3C");
        assert!(to_hex_upper(&[]) == "");
        let sig = sign(&curves::secp256k1(), &[7u8; 32], b"hex", &[0u8; 32]).unwrap();
        let h = to_hex_upper(&sig);
        assert!(h.len() == 128 && h == h.to_ascii_uppercase());
        assert!(hex::decode(h.to_ascii_lowercase()).unwrap() == sig);
    }
}
