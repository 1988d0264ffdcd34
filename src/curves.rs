//! Named curves.
//!
//! Each function in this module returns a fresh `CurveParameters` value
//! for a standard curve. The `CurveRegistry` type gathers all of them in
//! a single immutable table, that applications build once and keep for
//! the lifetime of the process; curves are then looked up by name, by
//! common alias, or by object identifier (dotted-decimal OID string), and
//! handed by reference to the functions that need them.
//!
//! Supported curves:
//!
//! | name              | aliases                          | OID                   |
//! |-------------------|----------------------------------|-----------------------|
//! | `secp256k1`       |                                  | 1.3.132.0.10          |
//! | `secp224r1`       | `P-224`, `nistp224`              | 1.3.132.0.33          |
//! | `secp256r1`       | `P-256`, `prime256v1`, `nistp256`| 1.2.840.10045.3.1.7   |
//! | `secp384r1`       | `P-384`, `nistp384`              | 1.3.132.0.34          |
//! | `secp521r1`       | `P-521`, `nistp521`              | 1.3.132.0.35          |
//! | `brainpoolP256r1` |                                  | 1.3.36.3.3.2.8.1.1.7  |

use tracing::debug;

use crate::curve::CurveParameters;
use crate::error::{Error, Result};

/// secp256k1 (SEC 2).
pub fn secp256k1() -> CurveParameters {
    CurveParameters::builtin("secp256k1", "1.3.132.0.10",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
        "0",
        "7",
        "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
        "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        1)
}

/// NIST P-224 (FIPS 186-4), also known as secp224r1.
pub fn nist_p224() -> CurveParameters {
    CurveParameters::builtin("secp224r1", "1.3.132.0.33",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF000000000000000000000001",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFE",
        "B4050A850C04B3ABF54132565044B0B7D7BFD8BA270B39432355FFB4",
        "B70E0CBD6BB4BF7F321390B94A03C1D356C21122343280D6115C1D21",
        "BD376388B5F723FB4C22DFE6CD4375A05A07476444D5819985007E34",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFF16A2E0B8F03E13DD29455C5C2A3D",
        1)
}

/// NIST P-256 (FIPS 186-4), also known as secp256r1 and prime256v1.
pub fn nist_p256() -> CurveParameters {
    CurveParameters::builtin("secp256r1", "1.2.840.10045.3.1.7",
        "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF",
        "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC",
        "5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B",
        "6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296",
        "4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5",
        "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551",
        1)
}

/// NIST P-384 (FIPS 186-4), also known as secp384r1.
pub fn nist_p384() -> CurveParameters {
    CurveParameters::builtin("secp384r1", "1.3.132.0.34",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFF",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFC",
        "B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875AC656398D8A2ED19D2A85C8EDD3EC2AEF",
        "AA87CA22BE8B05378EB1C71EF320AD746E1D3B628BA79B9859F741E082542A385502F25DBF55296C3A545E3872760AB7",
        "3617DE4A96262C6F5D9E98BF9292DC29F8F41DBD289A147CE9DA3113B5F0B8C00A60B1CE1D7E819D7A431D7C90EA0E5F",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF581A0DB248B0A77AECEC196ACCC52973",
        1)
}

/// NIST P-521 (FIPS 186-4), also known as secp521r1.
pub fn nist_p521() -> CurveParameters {
    CurveParameters::builtin("secp521r1", "1.3.132.0.35",
        "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
        "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC",
        "0051953EB9618E1C9A1F929A21A0B68540EEA2DA725B99B315F3B8B489918EF109E156193951EC7E937B1652C0BD3BB1BF073573DF883D2C34F1EF451FD46B503F00",
        "00C6858E06B70404E9CD9E3ECB662395B4429C648139053FB521F828AF606B4D3DBAA14B5E77EFE75928FE1DC127A2FFA8DE3348B3C1856A429BF97E7E31C2E5BD66",
        "011839296A789A3BC0045C8A5FB42C7D1BD998F54449579B446817AFBD17273E662C97EE72995EF42640C550B9013FAD0761353C7086A272C24088BE94769FD16650",
        "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFA51868783BF2F966B7FCC0148F709A5D03BB5C9B8899C47AEBB6FB71E91386409",
        1)
}

/// brainpoolP256r1 (RFC 5639).
pub fn brainpool_p256r1() -> CurveParameters {
    CurveParameters::builtin("brainpoolP256r1", "1.3.36.3.3.2.8.1.1.7",
        "A9FB57DBA1EEA9BC3E660A909D838D726E3BF623D52620282013481D1F6E5377",
        "7D5A0975FC2C3057EEF67530417AFFE7FB8055C126DC5C6CE94A4B44F330B5D9",
        "26DC5C6CE94A4B44F330B5D9BBD77CBF958416295CF7E1CE6BCCDC18FF8C07B6",
        "8BD2AEB9CB7E57CB2C4B482FFC81B7AFB9DE27E1E3BD23C23A4453BD9ACE3262",
        "547EF835C3DAC4FD97F8461A14611DC9C27745132DED8E545C1D54C72F046997",
        "A9FB57DBA1EEA9BC3E660A909D838D718C397AA3B561A6F7901E0E82974856A7",
        1)
}

/// An immutable table of curves, with lookup by name, alias or OID.
#[derive(Clone, Debug)]
pub struct CurveRegistry {
    curves: Vec<CurveParameters>,
}

// Extra names under which some curves are known.
const ALIASES: [(&str, &str); 12] = [
    ("P-224", "secp224r1"),
    ("nistp224", "secp224r1"),
    ("P-256", "secp256r1"),
    ("prime256v1", "secp256r1"),
    ("nistp256", "secp256r1"),
    ("P-384", "secp384r1"),
    ("nistp384", "secp384r1"),
    ("P-521", "secp521r1"),
    ("nistp521", "secp521r1"),
    ("secp256k1", "secp256k1"),
    ("brainpoolp256r1", "brainpoolP256r1"),
    ("bp256r1", "brainpoolP256r1"),
];

impl CurveRegistry {

    /// Builds the registry of all built-in curves.
    pub fn standard() -> Self {
        Self::from_curves(vec![
            secp256k1(),
            nist_p224(),
            nist_p256(),
            nist_p384(),
            nist_p521(),
            brainpool_p256r1(),
        ])
    }

    /// Builds a registry from an explicit list of curves.
    pub fn from_curves(curves: Vec<CurveParameters>) -> Self {
        Self { curves }
    }

    /// Looks up a curve by canonical name, alias (case-insensitive) or
    /// dotted-decimal OID.
    pub fn get(&self, id: &str) -> Option<&CurveParameters> {
        let id = id.trim();
        let name = ALIASES.iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(id))
            .map(|(_, name)| *name)
            .unwrap_or(id);
        self.curves.iter().find(|c| {
            c.name().eq_ignore_ascii_case(name) || c.oid() == name
        })
    }

    /// Like `get()`, but reports an unknown identifier as an error.
    pub fn lookup(&self, id: &str) -> Result<&CurveParameters> {
        match self.get(id) {
            Some(c) => Ok(c),
            None => {
                debug!(id, "curve not found in registry");
                Err(Error::UnknownCurve(id.to_string()))
            }
        }
    }

    /// Iterates over the registered curves.
    pub fn iter(&self) -> impl Iterator<Item = &CurveParameters> {
        self.curves.iter()
    }
}
