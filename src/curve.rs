//! Short Weierstraß curves over prime fields.
//!
//! A `CurveParameters` instance describes a curve with equation
//! `y^2 = x^3 + a*x + b` over the field of integers modulo a prime `p`,
//! along with a conventional generator `G` of a subgroup of prime order
//! `n`, and the cofactor `h` (the curve order is `h*n`). Instances are
//! immutable; they are normally created once (see `curves::CurveRegistry`)
//! and then shared by reference with all the functions that need them.
//! There is no global state: every operation on points takes the curve
//! parameters explicitly, as the `self` argument of the methods below.
//!
//! A point on the curve is represented by the `Point` structure, which is
//! either the point-at-infinity (the neutral element of the group) or a
//! pair of affine coordinates. A `Point` with coordinates can only be
//! obtained from a curve method (`point()`, `decode_point()`, `lift_x()`,
//! or one of the group operations), and these methods guarantee that the
//! point is on the curve; hence, a `Point` value is always valid _for the
//! curve that produced it_. Mixing points from different curves is a
//! caller error that is not detected.
//!
//! Group operations:
//!
//!  - `add()` and `double()` use the textbook affine formulas (one field
//!    inversion each).
//!
//!  - `mul()` computes `k*P` for a big integer `k`, which is first reduced
//!    modulo `n`. Internally, a double-and-add loop over Jacobian
//!    coordinates is used, so that a single inversion is needed at the
//!    end. `mul_add()` computes `u*P + v*Q` with a joint loop (Shamir's
//!    trick); it is used for signature verification.
//!
//! Points are encoded with the SEC1 conventions: compressed (`0x02` or
//! `0x03` followed by X), uncompressed (`0x04` followed by X and Y), and a
//! single byte `0x00` for the point-at-infinity. Decoding is strict: the
//! coordinates must be canonical (lower than `p`), and the point must be on
//! the curve.
//!
//! None of these functions is constant-time.

// Projective/fractional coordinates traditionally use uppercase letters,
// using lowercase only for affine coordinates.
#![allow(non_snake_case)]

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{CurveError, Error, ParseError, Result};
use crate::field::{FieldElement, PrimeField};

/// A point on a short Weierstraß curve, in affine coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    xy: Option<(FieldElement, FieldElement)>,
}

impl Point {

    /// The point-at-infinity.
    pub fn infinity() -> Self {
        Self { xy: None }
    }

    // Points with coordinates are only built by curve methods, which
    // check that the coordinates are valid.
    fn affine(x: FieldElement, y: FieldElement) -> Self {
        Self { xy: Some((x, y)) }
    }

    pub fn is_infinity(&self) -> bool {
        self.xy.is_none()
    }

    /// Gets the affine X coordinate (`None` for the point-at-infinity).
    pub fn x(&self) -> Option<&FieldElement> {
        self.xy.as_ref().map(|(x, _)| x)
    }

    /// Gets the affine Y coordinate (`None` for the point-at-infinity).
    pub fn y(&self) -> Option<&FieldElement> {
        self.xy.as_ref().map(|(_, y)| y)
    }

    pub fn coordinates(&self) -> Option<(&FieldElement, &FieldElement)> {
        self.xy.as_ref().map(|(x, y)| (x, y))
    }

    /// Returns `true` if this point is not the point-at-infinity and its
    /// Y coordinate is even.
    pub fn has_even_y(&self) -> bool {
        match self.y() {
            Some(y) => !y.is_odd(),
            None => false,
        }
    }
}

// Jacobian coordinates: (X:Y:Z) stands for affine (X/Z^2, Y/Z^3); Z = 0
// for the point-at-infinity.
#[derive(Clone, Debug)]
struct Jacobian {
    X: FieldElement,
    Y: FieldElement,
    Z: FieldElement,
}

/// Parameters of a short Weierstraß curve `y^2 = x^3 + a*x + b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveParameters {
    name: &'static str,
    oid: &'static str,
    field: PrimeField,
    scalars: PrimeField,
    a: FieldElement,
    b: FieldElement,
    generator: Point,
    cofactor: u32,
}

impl CurveParameters {

    /// Creates a new curve from its parameters.
    ///
    /// The field modulus `p` and the subgroup order `n` MUST be prime
    /// (this is not verified). Coefficients `a` and `b` are reduced
    /// modulo `p`. The generator coordinates are verified to designate
    /// a point on the curve; if the cofactor is not 1, the generator is
    /// also verified to have order `n`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(name: &'static str, oid: &'static str,
        p: BigUint, a: BigUint, b: BigUint,
        gx: BigUint, gy: BigUint, n: BigUint, cofactor: u32)
        -> Result<Self>
    {
        let field = PrimeField::new(p);
        let a = field.reduce(&a);
        let b = field.reduce(&b);
        let mut curve = Self {
            name,
            oid,
            scalars: PrimeField::new(n),
            field,
            a,
            b,
            generator: Point::infinity(),
            cofactor,
        };
        let G = curve.point(&gx, &gy)?;
        if !curve.in_subgroup(&G) {
            return Err(CurveError::WrongSubgroup.into());
        }
        curve.generator = G;
        Ok(curve)
    }

    // Builds a curve from trusted hexadecimal constants, without the
    // point validation of new(); the built-in curves are checked by the
    // test suite. A malformed constant is a bug and panics.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn builtin(name: &'static str, oid: &'static str,
        p: &str, a: &str, b: &str, gx: &str, gy: &str, n: &str,
        cofactor: u32) -> Self
    {
        fn int(s: &str) -> BigUint {
            match BigUint::parse_bytes(s.as_bytes(), 16) {
                Some(x) => x,
                None => panic!("malformed built-in curve constant: {}", s),
            }
        }
        let field = PrimeField::new(int(p));
        let a = field.reduce(&int(a));
        let b = field.reduce(&int(b));
        let generator = Point::affine(field.reduce(&int(gx)), field.reduce(&int(gy)));
        Self {
            name,
            oid,
            scalars: PrimeField::new(int(n)),
            field,
            a,
            b,
            generator,
            cofactor,
        }
    }

    /// Gets the curve canonical name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the curve object identifier, in dotted-decimal notation.
    pub fn oid(&self) -> &'static str {
        self.oid
    }

    /// Gets the base field (integers modulo `p`).
    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// Gets the scalar field (integers modulo `n`).
    pub fn scalars(&self) -> &PrimeField {
        &self.scalars
    }

    pub fn p(&self) -> &BigUint {
        self.field.modulus()
    }

    pub fn n(&self) -> &BigUint {
        self.scalars.modulus()
    }

    pub fn a(&self) -> &FieldElement {
        &self.a
    }

    pub fn b(&self) -> &FieldElement {
        &self.b
    }

    pub fn generator(&self) -> &Point {
        &self.generator
    }

    pub fn cofactor(&self) -> u32 {
        self.cofactor
    }

    /// Gets the length of the subgroup order `n`, in bits.
    pub fn order_bits(&self) -> usize {
        self.scalars.bit_len()
    }

    /// Gets the length of the subgroup order `n`, in bytes.
    pub fn order_bytes(&self) -> usize {
        self.scalars.byte_len()
    }

    /// Gets the length of the field modulus `p`, in bytes.
    pub fn field_bytes(&self) -> usize {
        self.field.byte_len()
    }

    // Right-hand side of the curve equation: x^3 + a*x + b.
    fn rhs(&self, x: &FieldElement) -> FieldElement {
        let f = &self.field;
        let x3 = f.mul(&f.square(x), x);
        f.add(&f.add(&x3, &f.mul(&self.a, x)), &self.b)
    }

    /// Builds a point from its affine coordinates. The coordinates must
    /// be lower than `p` and fulfill the curve equation.
    pub fn point(&self, x: &BigUint, y: &BigUint) -> Result<Point> {
        let (x, y) = match (self.field.element(x), self.field.element(y)) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(CurveError::NotOnCurve.into()),
        };
        let P = Point::affine(x, y);
        if !self.is_on_curve(&P) {
            return Err(CurveError::NotOnCurve.into());
        }
        Ok(P)
    }

    /// Tests whether a point is on the curve. The point-at-infinity is
    /// considered to be on the curve.
    pub fn is_on_curve(&self, P: &Point) -> bool {
        match P.coordinates() {
            None => true,
            Some((x, y)) => {
                x.value() < self.p() && y.value() < self.p()
                    && self.field.square(y) == self.rhs(x)
            }
        }
    }

    /// Tests whether a point is in the subgroup of order `n`. For curves
    /// with cofactor 1, this is true of all points on the curve.
    pub fn in_subgroup(&self, P: &Point) -> bool {
        if self.cofactor == 1 {
            return true;
        }
        self.mul_unreduced(self.n(), P).is_infinity()
    }

    /// Verifies that a point is usable as a public key: it must not be
    /// the point-at-infinity, it must be on the curve, and it must be in
    /// the subgroup generated by `G`.
    pub fn validate_point(&self, P: &Point) -> Result<()> {
        if P.is_infinity() {
            return Err(CurveError::Infinity.into());
        }
        if !self.is_on_curve(P) {
            return Err(CurveError::NotOnCurve.into());
        }
        if !self.in_subgroup(P) {
            return Err(CurveError::WrongSubgroup.into());
        }
        Ok(())
    }

    /// Returns the point with X coordinate `x` and a Y coordinate of the
    /// requested parity, if such a point exists.
    pub fn lift_x(&self, x: &BigUint, odd: bool) -> Option<Point> {
        let x = self.field.element(x)?;
        let y = self.field.sqrt(&self.rhs(&x))?;
        // sqrt() returns the even root; the other root is -y, which is
        // odd unless y = 0 (in which case there is no odd solution).
        let y = if odd {
            if y.is_zero() {
                return None;
            }
            self.field.neg(&y)
        } else {
            y
        };
        Some(Point::affine(x, y))
    }

    /// Negates a point.
    pub fn neg(&self, P: &Point) -> Point {
        match P.coordinates() {
            None => Point::infinity(),
            Some((x, y)) => Point::affine(x.clone(), self.field.neg(y)),
        }
    }

    /// Adds two points.
    pub fn add(&self, P: &Point, Q: &Point) -> Point {
        let f = &self.field;
        let (x1, y1) = match P.coordinates() {
            None => return Q.clone(),
            Some(c) => c,
        };
        let (x2, y2) = match Q.coordinates() {
            None => return P.clone(),
            Some(c) => c,
        };
        if x1 == x2 {
            // Same X: either Q = P or Q = -P.
            if y1 == y2 {
                return self.double(P);
            }
            return Point::infinity();
        }

        // x2 - x1 != 0 here.
        let lambda = f.mul(&f.sub(y2, y1), &f.invert_or_zero(&f.sub(x2, x1)));
        let x3 = f.sub(&f.sub(&f.square(&lambda), x1), x2);
        let y3 = f.sub(&f.mul(&lambda, &f.sub(x1, &x3)), y1);
        Point::affine(x3, y3)
    }

    /// Subtracts point `Q` from point `P`.
    pub fn sub(&self, P: &Point, Q: &Point) -> Point {
        self.add(P, &self.neg(Q))
    }

    /// Doubles a point.
    pub fn double(&self, P: &Point) -> Point {
        let f = &self.field;
        let (x, y) = match P.coordinates() {
            None => return Point::infinity(),
            Some(c) => c,
        };

        // A point with y = 0 has order 2; its double is the neutral.
        if y.is_zero() {
            return Point::infinity();
        }
        let num = f.add(&f.mul_small(&f.square(x), 3), &self.a);
        let lambda = f.mul(&num, &f.invert_or_zero(&f.mul_small(y, 2)));
        let x3 = f.sub(&f.square(&lambda), &f.mul_small(x, 2));
        let y3 = f.sub(&f.mul(&lambda, &f.sub(x, &x3)), y);
        Point::affine(x3, y3)
    }

    /// Multiplies a point by an integer. The multiplier is first reduced
    /// modulo the subgroup order `n`; thus, `k = 0` and `k = n` both
    /// yield the point-at-infinity.
    pub fn mul(&self, k: &BigUint, P: &Point) -> Point {
        let k = k % self.n();
        self.mul_unreduced(&k, P)
    }

    /// Multiplies the conventional generator by an integer.
    pub fn mul_gen(&self, k: &BigUint) -> Point {
        self.mul(k, &self.generator)
    }

    /// Computes `u*P + v*Q`. Multipliers are reduced modulo `n`.
    pub fn mul_add(&self, u: &BigUint, P: &Point, v: &BigUint, Q: &Point) -> Point {
        let u = u % self.n();
        let v = v % self.n();
        let Pj = self.to_jacobian(P);
        let Qj = self.to_jacobian(Q);
        let PQ = self.jadd(&Pj, &Qj);
        let mut R = self.jinfinity();
        for i in (0..u.bits().max(v.bits())).rev() {
            R = self.jdouble(&R);
            match (u.bit(i), v.bit(i)) {
                (true, true) => R = self.jadd(&R, &PQ),
                (true, false) => R = self.jadd(&R, &Pj),
                (false, true) => R = self.jadd(&R, &Qj),
                (false, false) => {}
            }
        }
        self.to_affine(&R)
    }

    // Double-and-add, most significant bit first, with no reduction of
    // the multiplier (needed for subgroup checks).
    fn mul_unreduced(&self, k: &BigUint, P: &Point) -> Point {
        if k.is_zero() || P.is_infinity() {
            return Point::infinity();
        }
        let Pj = self.to_jacobian(P);
        let mut R = self.jinfinity();
        for i in (0..k.bits()).rev() {
            R = self.jdouble(&R);
            if k.bit(i) {
                R = self.jadd(&R, &Pj);
            }
        }
        self.to_affine(&R)
    }

    fn jinfinity(&self) -> Jacobian {
        Jacobian {
            X: self.field.one(),
            Y: self.field.one(),
            Z: self.field.zero(),
        }
    }

    fn to_jacobian(&self, P: &Point) -> Jacobian {
        match P.coordinates() {
            None => self.jinfinity(),
            Some((x, y)) => Jacobian {
                X: x.clone(),
                Y: y.clone(),
                Z: self.field.one(),
            },
        }
    }

    fn to_affine(&self, P: &Jacobian) -> Point {
        if P.Z.is_zero() {
            return Point::infinity();
        }
        let f = &self.field;
        let iZ = f.invert_or_zero(&P.Z);
        let iZ2 = f.square(&iZ);
        let x = f.mul(&P.X, &iZ2);
        let y = f.mul(&P.Y, &f.mul(&iZ2, &iZ));
        Point::affine(x, y)
    }

    fn jdouble(&self, P: &Jacobian) -> Jacobian {
        if P.Z.is_zero() || P.Y.is_zero() {
            return self.jinfinity();
        }
        let f = &self.field;

        // S = 4*X*Y^2, M = 3*X^2 + a*Z^4
        // X' = M^2 - 2*S, Y' = M*(S - X') - 8*Y^4, Z' = 2*Y*Z
        let YY = f.square(&P.Y);
        let S = f.mul_small(&f.mul(&P.X, &YY), 4);
        let ZZ = f.square(&P.Z);
        let M = f.add(&f.mul_small(&f.square(&P.X), 3),
            &f.mul(&self.a, &f.square(&ZZ)));
        let X3 = f.sub(&f.square(&M), &f.mul_small(&S, 2));
        let Y3 = f.sub(&f.mul(&M, &f.sub(&S, &X3)),
            &f.mul_small(&f.square(&YY), 8));
        let Z3 = f.mul_small(&f.mul(&P.Y, &P.Z), 2);
        Jacobian { X: X3, Y: Y3, Z: Z3 }
    }

    fn jadd(&self, P: &Jacobian, Q: &Jacobian) -> Jacobian {
        if P.Z.is_zero() {
            return Q.clone();
        }
        if Q.Z.is_zero() {
            return P.clone();
        }
        let f = &self.field;
        let Z1Z1 = f.square(&P.Z);
        let Z2Z2 = f.square(&Q.Z);
        let U1 = f.mul(&P.X, &Z2Z2);
        let U2 = f.mul(&Q.X, &Z1Z1);
        let S1 = f.mul(&P.Y, &f.mul(&Q.Z, &Z2Z2));
        let S2 = f.mul(&Q.Y, &f.mul(&P.Z, &Z1Z1));
        if U1 == U2 {
            if S1 == S2 {
                return self.jdouble(P);
            }
            return self.jinfinity();
        }
        let H = f.sub(&U2, &U1);
        let R = f.sub(&S2, &S1);
        let HH = f.square(&H);
        let HHH = f.mul(&H, &HH);
        let V = f.mul(&U1, &HH);
        let X3 = f.sub(&f.sub(&f.square(&R), &HHH), &f.mul_small(&V, 2));
        let Y3 = f.sub(&f.mul(&R, &f.sub(&V, &X3)), &f.mul(&S1, &HHH));
        let Z3 = f.mul(&H, &f.mul(&P.Z, &Q.Z));
        Jacobian { X: X3, Y: Y3, Z: Z3 }
    }

    /// Decodes a point from its SEC1 encoding (compressed, uncompressed,
    /// or the single-byte encoding of the point-at-infinity).
    pub fn decode_point(&self, buf: &[u8]) -> Result<Point> {
        let flen = self.field_bytes();
        if buf.len() == 1 && buf[0] == 0x00 {
            return Ok(Point::infinity());
        }
        if buf.len() == 1 + flen && (buf[0] == 0x02 || buf[0] == 0x03) {
            let x = BigUint::from_bytes_be(&buf[1..]);
            if &x >= self.p() {
                return Err(ParseError::BadPointEncoding.into());
            }
            return self.lift_x(&x, buf[0] == 0x03)
                .ok_or(Error::Curve(CurveError::NotOnCurve));
        }
        if buf.len() == 1 + (flen << 1) && buf[0] == 0x04 {
            let x = BigUint::from_bytes_be(&buf[1..(1 + flen)]);
            let y = BigUint::from_bytes_be(&buf[(1 + flen)..]);
            if &x >= self.p() || &y >= self.p() {
                return Err(ParseError::BadPointEncoding.into());
            }
            return self.point(&x, &y);
        }
        Err(ParseError::BadPointEncoding.into())
    }

    /// Encodes a point in SEC1 format. The point-at-infinity is encoded
    /// as a single byte of value 0x00, regardless of `compressed`.
    pub fn encode_point(&self, P: &Point, compressed: bool) -> Vec<u8> {
        let (x, y) = match P.coordinates() {
            None => return vec![0x00],
            Some(c) => c,
        };
        let mut out = Vec::with_capacity(1 + 2 * self.field_bytes());
        if compressed {
            out.push(if y.is_odd() { 0x03 } else { 0x02 });
            out.extend_from_slice(&self.field.encode(x));
        } else {
            out.push(0x04);
            out.extend_from_slice(&self.field.encode(x));
            out.extend_from_slice(&self.field.encode(y));
        }
        out
    }
}
