//! Affine arithmetic on the embedded curve ("Grumpkin").
//!
//! The curve is `y² = x³ - 17` over the BN254 scalar field, chosen so that
//! point operations are cheap to re-verify inside the paired proving
//! circuit. No curve library covers it, so the group law is implemented
//! here from first principles.
//!
//! The point at infinity is represented by the sentinel affine pair
//! `(0, 0)`. No real point can collide with it: `x = 0` would require a
//! square root of -17, which is a quadratic non-residue mod P.

use std::sync::OnceLock;

use crate::error::{Result, StealthError};
use crate::field::{FieldElement, Scalar};

/// Compressed point encoding: 1 prefix byte + 32-byte big-endian x.
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Uncompressed point encoding: raw 32-byte big-endian x ‖ y.
pub const UNCOMPRESSED_POINT_SIZE: usize = 64;

const PREFIX_EVEN_Y: u8 = 0x02;
const PREFIX_ODD_Y: u8 = 0x03;

/// Generator y coordinate (even square root of -16), little-endian limbs.
const GENERATOR_Y_LIMBS: [u64; 4] = [
    0x833fc48d823f272c,
    0x2d270d45f1181294,
    0xcf135e7506a45d63,
    0x0000000000000002,
];

/// Curve constant B = -17 mod P.
fn curve_b() -> &'static FieldElement {
    static B: OnceLock<FieldElement> = OnceLock::new();
    B.get_or_init(|| FieldElement::from_u64(17).neg())
}

/// A point on the curve in affine coordinates, or the infinity sentinel.
///
/// Every constructor that accepts external data re-checks the curve
/// equation; values built through the group law stay on the curve by
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffinePoint {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl AffinePoint {
    /// The point at infinity (group identity).
    pub fn infinity() -> Self {
        AffinePoint {
            x: FieldElement::zero(),
            y: FieldElement::zero(),
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// The fixed group generator `G = (1, sqrt(-16))`.
    pub fn generator() -> &'static Self {
        static G: OnceLock<AffinePoint> = OnceLock::new();
        G.get_or_init(|| AffinePoint {
            x: FieldElement::one(),
            y: FieldElement::from_limbs(&GENERATOR_Y_LIMBS),
        })
    }

    /// Construct from affine coordinates, rejecting off-curve pairs.
    pub fn new(x: FieldElement, y: FieldElement) -> Result<Self> {
        let point = AffinePoint { x, y };
        if !point.is_on_curve() {
            return Err(StealthError::InvalidPoint);
        }
        Ok(point)
    }

    /// Curve-equation check. The infinity sentinel is always valid.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity() {
            return true;
        }
        let lhs = self.y.square();
        let rhs = self.x.square().mul(&self.x).add(curve_b());
        lhs == rhs
    }

    /// Group addition, covering all four cases: identity operands, inverse
    /// operands (`P + (-P) = ∞`), doubling, and the generic chord formula.
    pub fn add(&self, other: &Self) -> Self {
        if self.is_infinity() {
            return other.clone();
        }
        if other.is_infinity() {
            return self.clone();
        }
        if self.x == other.x {
            if self.y.add(&other.y).is_zero() {
                return Self::infinity();
            }
            // Same point: the chord formula would divide by zero.
            return self.double();
        }

        let lambda = other
            .y
            .sub(&self.y)
            .mul(&other.x.sub(&self.x).inv0());
        let x3 = lambda.square().sub(&self.x).sub(&other.x);
        let y3 = lambda.mul(&self.x.sub(&x3)).sub(&self.y);
        AffinePoint { x: x3, y: y3 }
    }

    /// Point doubling with the tangent slope `λ = 3x² / 2y`.
    pub fn double(&self) -> Self {
        if self.is_infinity() {
            return self.clone();
        }
        // y = 0 cannot occur: the curve has prime order, so no 2-torsion.
        let three_x_sq = self
            .x
            .square()
            .mul(&FieldElement::from_u64(3));
        let lambda = three_x_sq.mul(&self.y.add(&self.y).inv0());
        let x3 = lambda.square().sub(&self.x).sub(&self.x);
        let y3 = lambda.mul(&self.x.sub(&x3)).sub(&self.y);
        AffinePoint { x: x3, y: y3 }
    }

    pub fn negate(&self) -> Self {
        if self.is_infinity() {
            return self.clone();
        }
        AffinePoint {
            x: self.x.clone(),
            y: self.y.neg(),
        }
    }

    /// Scalar multiplication by double-and-add. The scalar type is already
    /// reduced mod N; `0·P` and `k·∞` yield infinity, not errors.
    pub fn mul(&self, k: &Scalar) -> Self {
        if self.is_infinity() || k.is_zero() {
            return Self::infinity();
        }
        let n = k.as_biguint();
        let mut acc = Self::infinity();
        for i in (0..n.bits()).rev() {
            acc = acc.double();
            if n.bit(i) {
                acc = acc.add(self);
            }
        }
        acc
    }

    /// 33-byte compressed encoding: parity prefix + big-endian x.
    /// Infinity is the reserved all-zero string.
    pub fn compress(&self) -> [u8; COMPRESSED_POINT_SIZE] {
        let mut out = [0u8; COMPRESSED_POINT_SIZE];
        if self.is_infinity() {
            return out;
        }
        out[0] = if self.y.is_even() {
            PREFIX_EVEN_Y
        } else {
            PREFIX_ODD_Y
        };
        out[1..].copy_from_slice(&self.x.to_bytes_be());
        out
    }

    /// Decode a compressed point, recovering y by modular square root and
    /// re-verifying the curve equation on the result.
    pub fn decompress(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_POINT_SIZE {
            return Err(StealthError::InvalidLength {
                expected: COMPRESSED_POINT_SIZE,
                got: bytes.len(),
            });
        }
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::infinity());
        }
        let prefix = bytes[0];
        if prefix != PREFIX_EVEN_Y && prefix != PREFIX_ODD_Y {
            return Err(StealthError::InvalidPointPrefix(prefix));
        }

        let mut x_bytes = [0u8; 32];
        x_bytes.copy_from_slice(&bytes[1..]);
        let x = FieldElement::from_bytes_be(&x_bytes)?;

        let rhs = x.square().mul(&x).add(curve_b());
        let mut y = rhs.sqrt().ok_or(StealthError::InvalidPoint)?;
        let want_even = prefix == PREFIX_EVEN_Y;
        if y.is_even() != want_even {
            y = y.neg();
        }

        // Defense in depth: sqrt already guarantees membership, but a
        // decode path must never hand out an unchecked point.
        Self::new(x, y)
    }

    /// 64-byte uncompressed encoding, big-endian `x ‖ y`. The format
    /// implies nothing about validity.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_POINT_SIZE] {
        let mut out = [0u8; UNCOMPRESSED_POINT_SIZE];
        out[..32].copy_from_slice(&self.x.to_bytes_be());
        out[32..].copy_from_slice(&self.y.to_bytes_be());
        out
    }

    /// Parse an uncompressed point; always performs the on-curve check.
    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != UNCOMPRESSED_POINT_SIZE {
            return Err(StealthError::InvalidLength {
                expected: UNCOMPRESSED_POINT_SIZE,
                got: bytes.len(),
            });
        }
        let mut x_bytes = [0u8; 32];
        let mut y_bytes = [0u8; 32];
        x_bytes.copy_from_slice(&bytes[..32]);
        y_bytes.copy_from_slice(&bytes[32..]);
        let x = FieldElement::from_bytes_be(&x_bytes)?;
        let y = FieldElement::from_bytes_be(&y_bytes)?;
        Self::new(x, y)
    }
}
