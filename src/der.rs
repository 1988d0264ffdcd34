//! Strict DER codec for ECDSA signatures.
//!
//! An ECDSA signature (r, s) is conventionally transported as the DER
//! encoding of the ASN.1 structure:
//!
//! ```text
//!     ECDSA-Sig-Value ::= SEQUENCE {
//!         r  INTEGER,
//!         s  INTEGER
//!     }
//! ```
//!
//! i.e. `30 <len> 02 <lenR> R 02 <lenS> S`. DER is a canonical encoding:
//! each value has exactly one valid representation. The decoder enforces
//! this and rejects, with a `ParseError`, every deviation:
//!
//!  - a tag other than SEQUENCE (0x30) or INTEGER (0x02);
//!  - an indefinite length (0x80), or a long-form length that would fit
//!    in the short form, or that has a leading zero byte;
//!  - a declared length that disagrees with the actual content (missing
//!    bytes, extra bytes within the sequence, or bytes after it);
//!  - an empty integer, a negative integer (high bit set with no leading
//!    0x00), or an integer with an unnecessary leading 0x00.
//!
//! `decode()` additionally checks that r and s are in the `1..n-1` range
//! for the curve order `n`; values outside that range are reported as
//! `Error::InvalidSignature`, since the encoding itself is well-formed.
//! `parse()` performs only the structural checks.

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use crate::error::{Error, ParseError, Result};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

// Appends a DER length (short form below 128, long form otherwise).
fn push_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bb = len.to_be_bytes();
    let skip = bb.iter().take_while(|b| **b == 0).count();
    out.push(0x80 | (bb.len() - skip) as u8);
    out.extend_from_slice(&bb[skip..]);
}

// Appends a non-negative INTEGER.
fn push_integer(out: &mut Vec<u8>, x: &BigUint) {
    let mut bb = x.to_bytes_be();
    if bb[0] & 0x80 != 0 {
        bb.insert(0, 0x00);
    }
    out.push(TAG_INTEGER);
    push_length(out, bb.len());
    out.extend_from_slice(&bb);
}

/// Encodes (r, s) in DER.
pub fn encode(r: &BigUint, s: &BigUint) -> Vec<u8> {
    let mut body = Vec::new();
    push_integer(&mut body, r);
    push_integer(&mut body, s);
    let mut out = Vec::with_capacity(body.len() + 4);
    out.push(TAG_SEQUENCE);
    push_length(&mut out, body.len());
    out.extend_from_slice(&body);
    out
}

// A cursor over DER input.
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {

    fn byte(&mut self) -> Result<u8> {
        let (b, rest) = self.buf.split_first().ok_or(ParseError::Truncated)?;
        self.buf = rest;
        Ok(*b)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.buf.len() < len {
            return Err(ParseError::Truncated.into());
        }
        let (v, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(v)
    }

    fn length(&mut self) -> Result<usize> {
        let b = self.byte()?;
        if b < 0x80 {
            return Ok(b as usize);
        }
        if b == 0x80 {
            return Err(ParseError::IndefiniteLength.into());
        }
        let k = (b & 0x7F) as usize;
        if k > core::mem::size_of::<usize>() {
            return Err(ParseError::LengthOverflow.into());
        }
        let lb = self.take(k)?;
        if lb[0] == 0 {
            return Err(ParseError::NonMinimalLength.into());
        }
        let len = lb.iter().fold(0usize, |acc, b| (acc << 8) | (*b as usize));
        if len < 0x80 {
            return Err(ParseError::NonMinimalLength.into());
        }
        Ok(len)
    }

    fn tlv(&mut self, tag: u8) -> Result<&'a [u8]> {
        let t = self.byte()?;
        if t != tag {
            return Err(ParseError::BadTag(t).into());
        }
        let len = self.length()?;
        self.take(len)
    }

    fn integer(&mut self) -> Result<BigUint> {
        let v = self.tlv(TAG_INTEGER)?;
        if v.is_empty() {
            return Err(ParseError::EmptyInteger.into());
        }
        if v[0] & 0x80 != 0 {
            return Err(ParseError::NegativeInteger.into());
        }
        if v.len() > 1 && v[0] == 0x00 && v[1] & 0x80 == 0 {
            return Err(ParseError::NonMinimalInteger.into());
        }
        Ok(BigUint::from_bytes_be(v))
    }
}

/// Decodes a DER-encoded (r, s) pair, with structural checks only.
pub fn parse(buf: &[u8]) -> Result<(BigUint, BigUint)> {
    let mut outer = Reader { buf };
    let t = outer.byte()?;
    if t != TAG_SEQUENCE {
        return Err(ParseError::BadTag(t).into());
    }
    let len = outer.length()?;
    if len > outer.buf.len() {
        return Err(ParseError::Truncated.into());
    }
    if len < outer.buf.len() {
        return Err(ParseError::TrailingBytes.into());
    }
    let mut inner = Reader { buf: outer.buf };
    let r = inner.integer()?;
    let s = inner.integer()?;
    if !inner.buf.is_empty() {
        return Err(ParseError::LengthMismatch.into());
    }
    Ok((r, s))
}

/// Decodes a DER-encoded (r, s) pair, and checks that both values are
/// in the `1..n-1` range.
pub fn decode(buf: &[u8], n: &BigUint) -> Result<(BigUint, BigUint)> {
    let (r, s) = parse(buf).map_err(|e| {
        debug!(error = %e, "rejected DER signature");
        e
    })?;
    if r.is_zero() || &r >= n || s.is_zero() || &s >= n {
        debug!(reason = "r or s out of range", "rejected DER signature");
        return Err(Error::InvalidSignature);
    }
    Ok((r, s))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::curves;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn err(buf: &[u8]) -> ParseError {
        match parse(buf) {
            Err(Error::Parse(e)) => e,
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn encode_small() {
        let r = BigUint::from(1u32);
        let s = BigUint::from(0x80u32);
        let buf = encode(&r, &s);
        assert!(buf == [0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x80]);
        assert!(parse(&buf).unwrap() == (r, s));
    }

    #[test]
    fn roundtrip() {
        let mut rng = StdRng::seed_from_u64(6979);
        for curve in curves::CurveRegistry::standard().iter() {
            let n = curve.n();
            let mut buf = vec![0u8; curve.order_bytes()];
            for _ in 0..20 {
                rng.fill(&mut buf[..]);
                let r = BigUint::from_bytes_be(&buf) % n;
                rng.fill(&mut buf[..]);
                // Exercise short values too.
                let s = BigUint::from_bytes_be(&buf[..rng.gen_range(1..buf.len())]) % n;
                if r.is_zero() || s.is_zero() {
                    continue;
                }
                let der = encode(&r, &s);
                assert!(decode(&der, n).unwrap() == (r, s));
            }
            let nm1 = n - 1u32;
            let der = encode(&nm1, &nm1);
            assert!(decode(&der, n).unwrap() == (nm1.clone(), nm1));
        }
    }

    #[test]
    fn long_form() {
        let curve = curves::nist_p521();
        let nm1 = curve.n() - 1u32;
        let der = encode(&nm1, &nm1);
        // Two integers of 66 bytes each: the content length is 136.
        assert!(der[0] == 0x30 && der[1] == 0x81 && der[2] == 136);
        assert!(der.len() == 139);
        assert!(decode(&der, curve.n()).unwrap().0 == nm1);

        // Long form for a short length is rejected.
        let der = encode(&BigUint::from(1u32), &BigUint::from(2u32));
        let mut bad = vec![0x30, 0x81];
        bad.extend_from_slice(&der[1..]);
        assert!(err(&bad) == ParseError::NonMinimalLength);
        let mut bad = vec![0x30, 0x82, 0x00];
        bad.extend_from_slice(&der[1..]);
        assert!(err(&bad) == ParseError::NonMinimalLength);
        let mut bad = vec![0x30, 0x80];
        bad.extend_from_slice(&der[2..]);
        bad.extend_from_slice(&[0x00, 0x00]);
        assert!(err(&bad) == ParseError::IndefiniteLength);
        let bad = [0x30, 0x89, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        assert!(err(&bad) == ParseError::LengthOverflow);
    }

    #[test]
    fn malformed() {
        // 30 06 02 01 01 02 01 02
        let good = encode(&BigUint::from(1u32), &BigUint::from(2u32));
        assert!(good == [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);

        assert!(err(&[]) == ParseError::Truncated);
        assert!(err(&[0x31, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02])
            == ParseError::BadTag(0x31));
        assert!(err(&[0x30, 0x06, 0x03, 0x01, 0x01, 0x02, 0x01, 0x02])
            == ParseError::BadTag(0x03));

        // Trailing garbage after the sequence.
        let mut bad = good.clone();
        bad.push(0x00);
        assert!(err(&bad) == ParseError::TrailingBytes);

        // Appended bytes accounted for in the sequence length.
        assert!(err(&[0x30, 0x08, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x00, 0x00])
            == ParseError::LengthMismatch);

        // Truncations.
        for i in 0..good.len() {
            assert!(parse(&good[..i]).is_err());
        }
        assert!(err(&[0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02])
            == ParseError::Truncated);
        assert!(err(&[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x02, 0x02])
            == ParseError::Truncated);

        // Integer encodings.
        assert!(err(&[0x30, 0x06, 0x02, 0x01, 0x81, 0x02, 0x01, 0x02])
            == ParseError::NegativeInteger);
        assert!(err(&[0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x02])
            == ParseError::NonMinimalInteger);
        assert!(err(&[0x30, 0x05, 0x02, 0x00, 0x02, 0x01, 0x02])
            == ParseError::EmptyInteger);
        // A single 0x00 byte is the minimal encoding of zero.
        assert!(parse(&[0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x02]).is_ok());
    }

    #[test]
    fn range() {
        let curve = curves::secp256k1();
        let n = curve.n();
        let one = BigUint::from(1u32);
        let zero = BigUint::from(0u32);
        assert!(decode(&encode(&zero, &one), n) == Err(Error::InvalidSignature));
        assert!(decode(&encode(&one, &zero), n) == Err(Error::InvalidSignature));
        assert!(decode(&encode(n, &one), n) == Err(Error::InvalidSignature));
        assert!(decode(&encode(&one, n), n) == Err(Error::InvalidSignature));
        assert!(decode(&encode(&one, &one), n).is_ok());
    }
}
