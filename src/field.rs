//! Modular arithmetic for the embedded curve.
//!
//! Two distinct prime moduli are in play and must never be mixed up:
//!
//! - the **base field** prime `P` (point coordinates, hash inputs/outputs),
//!   equal to the scalar field of BN254;
//! - the **group order** `N` (private keys, ECDH-derived blinding factors),
//!   a different prime slightly larger than `P`.
//!
//! Values are always kept reduced into `[0, modulus)`. Arithmetic is built
//! on `num-bigint` and is *not* constant-time; see the crate-level notes on
//! the threat model.

use std::sync::OnceLock;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::error::{Result, StealthError};

/// Base-field prime P (BN254 scalar field), 254 bits.
const BASE_FIELD_HEX: &str = "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001";

/// Curve group order N (BN254 base field), 254 bits.
const GROUP_ORDER_HEX: &str = "30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47";

/// Smallest quadratic non-residue mod P, used by Tonelli-Shanks.
const SQRT_NONRESIDUE: u32 = 5;

fn parse_modulus(hex_str: &str) -> BigUint {
    let mut n = BigUint::zero();
    for b in hex_str.bytes() {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            _ => continue,
        };
        n = (n << 4u8) + BigUint::from(digit);
    }
    n
}

/// The base-field prime P.
pub fn base_field_modulus() -> &'static BigUint {
    static P: OnceLock<BigUint> = OnceLock::new();
    P.get_or_init(|| parse_modulus(BASE_FIELD_HEX))
}

/// The curve group order N.
pub fn group_order() -> &'static BigUint {
    static N: OnceLock<BigUint> = OnceLock::new();
    N.get_or_init(|| parse_modulus(GROUP_ORDER_HEX))
}

/// Decomposition P - 1 = q * 2^s with q odd, for Tonelli-Shanks.
fn two_adic_decomposition() -> &'static (BigUint, u64) {
    static QS: OnceLock<(BigUint, u64)> = OnceLock::new();
    QS.get_or_init(|| {
        let mut q = base_field_modulus() - 1u8;
        let mut s = 0u64;
        while !q.bit(0) {
            q >>= 1;
            s += 1;
        }
        (q, s)
    })
}

/// Reduce an arbitrary signed integer into `[0, m)`.
///
/// Unlike the `%` operator this always returns the non-negative
/// representative, also for negative input.
pub fn mod_reduce(n: &BigInt, m: &BigUint) -> BigUint {
    let modulus = BigInt::from(m.clone());
    let mut r = n % &modulus;
    if r.sign() == Sign::Minus {
        r += &modulus;
    }
    r.magnitude().clone()
}

/// Modular inverse via the extended Euclidean algorithm.
///
/// Fails with [`StealthError::InverseOfZero`] when `a ≡ 0 (mod m)`; for a
/// prime modulus that is the only failure case, and it indicates a caller
/// bug rather than a user error.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if (a % m).is_zero() {
        return Err(StealthError::InverseOfZero);
    }

    let mut old_r = BigInt::from(a % m);
    let mut r = BigInt::from(m.clone());
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = r;
        r = next_r;
        let next_s = &old_s - &q * &s;
        old_s = s;
        s = next_s;
    }

    // gcd != 1 is unreachable for a prime modulus and non-zero input.
    if !old_r.is_one() {
        return Err(StealthError::InverseOfZero);
    }
    Ok(mod_reduce(&old_s, m))
}

/// An element of the curve's base field, always reduced into `[0, P)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldElement(BigUint);

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement(BigUint::zero())
    }

    pub fn one() -> Self {
        FieldElement(BigUint::one())
    }

    /// Wrap a big integer, reducing mod P.
    pub fn new(n: BigUint) -> Self {
        FieldElement(n % base_field_modulus())
    }

    pub fn from_u64(n: u64) -> Self {
        FieldElement(BigUint::from(n))
    }

    /// Interpret 32 big-endian bytes, reducing mod P. Used for hash outputs
    /// and other inputs where reduction is the defined behavior.
    pub fn from_bytes_be_reduced(bytes: &[u8; 32]) -> Self {
        FieldElement(BigUint::from_bytes_be(bytes) % base_field_modulus())
    }

    /// Interpret 32 big-endian bytes, rejecting non-canonical values
    /// (>= P). Used for wire coordinates where silent reduction would
    /// corrupt commitments.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> Result<Self> {
        let n = BigUint::from_bytes_be(bytes);
        if &n >= base_field_modulus() {
            return Err(StealthError::InvalidPoint);
        }
        Ok(FieldElement(n))
    }

    /// 32-byte big-endian encoding, zero-padded on the left.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    /// Build from four little-endian u64 limbs. Internal, for the Poseidon
    /// constant tables; inputs are trusted to be reduced.
    pub(crate) fn from_limbs(limbs: &[u64; 4]) -> Self {
        let mut bytes = [0u8; 32];
        for (i, limb) in limbs.iter().enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
        }
        FieldElement(BigUint::from_bytes_le(&bytes))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    /// True when the canonical representative is even. Drives the
    /// compressed-point prefix byte.
    pub fn is_even(&self) -> bool {
        !self.0.bit(0)
    }

    pub fn add(&self, other: &Self) -> Self {
        FieldElement((&self.0 + &other.0) % base_field_modulus())
    }

    pub fn sub(&self, other: &Self) -> Self {
        let p = base_field_modulus();
        FieldElement((&self.0 + p - &other.0) % p)
    }

    pub fn mul(&self, other: &Self) -> Self {
        FieldElement((&self.0 * &other.0) % base_field_modulus())
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    pub fn neg(&self) -> Self {
        if self.0.is_zero() {
            return self.clone();
        }
        FieldElement(base_field_modulus() - &self.0)
    }

    pub fn pow(&self, exp: &BigUint) -> Self {
        FieldElement(self.0.modpow(exp, base_field_modulus()))
    }

    /// Multiplicative inverse; errors on zero.
    pub fn inverse(&self) -> Result<Self> {
        Ok(FieldElement(mod_inverse(&self.0, base_field_modulus())?))
    }

    /// Inverse with the convention `inv0(0) = 0`.
    ///
    /// Used inside point addition where a zero denominator is unreachable
    /// by case analysis over valid points; the convention keeps the group
    /// law total without an error path.
    pub(crate) fn inv0(&self) -> Self {
        let p = base_field_modulus();
        FieldElement(self.0.modpow(&(p - 2u8), p))
    }

    /// Square root via Tonelli-Shanks (P ≡ 1 mod 4, 2-adicity 28).
    ///
    /// Returns `None` when `self` is a quadratic non-residue. Which of the
    /// two roots is returned is unspecified; callers select by parity.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }

        let p = base_field_modulus();
        // Euler criterion first: rejects non-residues up front.
        let legendre = self.0.modpow(&((p - 1u8) >> 1), p);
        if !legendre.is_one() {
            return None;
        }

        let (q, s) = two_adic_decomposition();
        let mut m = *s;
        let mut c = FieldElement::from_u64(u64::from(SQRT_NONRESIDUE)).pow(q);
        let mut t = self.pow(q);
        let mut r = self.pow(&((q + 1u8) >> 1));

        while !t.is_one() {
            let mut i = 0u64;
            let mut probe = t.clone();
            while !probe.is_one() {
                probe = probe.square();
                i += 1;
                if i == m {
                    return None;
                }
            }
            let b = c.pow(&(BigUint::one() << (m - i - 1)));
            m = i;
            c = b.square();
            t = t.mul(&c);
            r = r.mul(&b);
        }
        Some(r)
    }
}

/// A scalar modulo the curve group order N, always reduced into `[0, N)`.
///
/// Private keys and blinding factors live here, never in the base field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scalar(BigUint);

impl Scalar {
    pub fn zero() -> Self {
        Scalar(BigUint::zero())
    }

    pub fn new(n: BigUint) -> Self {
        Scalar(n % group_order())
    }

    pub fn from_u64(n: u64) -> Self {
        Scalar(BigUint::from(n) % group_order())
    }

    /// Interpret 32 big-endian bytes mod N. Reduction is always applied:
    /// every 256-bit hash output maps onto a valid scalar.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> Self {
        Scalar(BigUint::from_bytes_be(bytes) % group_order())
    }

    /// 32-byte big-endian encoding, zero-padded on the left.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: &Self) -> Self {
        Scalar((&self.0 + &other.0) % group_order())
    }

    /// Uniform non-zero scalar from a cryptographically secure RNG.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            let s = Self::from_bytes_be(&bytes);
            if !s.is_zero() {
                return s;
            }
        }
    }

    /// Embed into the base field, reducing mod P. Needed because N > P:
    /// scalars in `[P, N)` wrap when used as circuit-hash inputs.
    pub fn to_field(&self) -> FieldElement {
        FieldElement::new(self.0.clone())
    }

    pub(crate) fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moduli_are_254_bits_and_distinct() {
        assert_eq!(base_field_modulus().bits(), 254);
        assert_eq!(group_order().bits(), 254);
        assert!(group_order() > base_field_modulus());
    }

    #[test]
    fn mod_reduce_handles_negative_input() {
        let m = BigUint::from(7u8);
        assert_eq!(mod_reduce(&BigInt::from(-1), &m), BigUint::from(6u8));
        assert_eq!(mod_reduce(&BigInt::from(-15), &m), BigUint::from(6u8));
        assert_eq!(mod_reduce(&BigInt::from(9), &m), BigUint::from(2u8));
    }

    #[test]
    fn mod_inverse_round_trips() {
        let p = base_field_modulus();
        let a = BigUint::from(123456789u64);
        let inv = mod_inverse(&a, p).unwrap();
        assert_eq!((a * inv) % p, BigUint::one());
    }

    #[test]
    fn mod_inverse_of_zero_is_an_error() {
        let p = base_field_modulus();
        assert_eq!(
            mod_inverse(&BigUint::zero(), p),
            Err(StealthError::InverseOfZero)
        );
        // Multiples of p reduce to zero as well.
        assert_eq!(mod_inverse(p, p), Err(StealthError::InverseOfZero));
    }

    #[test]
    fn sqrt_round_trips_on_squares() {
        for n in [2u64, 3, 17, 123456789, 987654321] {
            let fe = FieldElement::from_u64(n);
            let sq = fe.square();
            let root = sq.sqrt().expect("square must have a root");
            assert!(root == fe || root == fe.neg());
        }
    }

    #[test]
    fn sqrt_rejects_non_residues() {
        // 5 is the smallest non-residue mod P.
        assert!(FieldElement::from_u64(5).sqrt().is_none());
        // -17 has no root either; this is what keeps the (0,0) infinity
        // sentinel off the curve.
        assert!(FieldElement::from_u64(17).neg().sqrt().is_none());
    }

    #[test]
    fn field_bytes_round_trip() {
        let fe = FieldElement::from_u64(0xdead_beef);
        let bytes = fe.to_bytes_be();
        assert_eq!(FieldElement::from_bytes_be(&bytes).unwrap(), fe);
    }

    #[test]
    fn non_canonical_field_bytes_rejected() {
        let bytes = [0xffu8; 32];
        assert_eq!(
            FieldElement::from_bytes_be(&bytes),
            Err(StealthError::InvalidPoint)
        );
        // The reducing constructor accepts the same bytes.
        let _ = FieldElement::from_bytes_be_reduced(&bytes);
    }

    #[test]
    fn scalar_reduction_wraps_mod_n() {
        let n = group_order();
        let s = Scalar::new(n + 5u8);
        assert_eq!(s, Scalar::from_u64(5));
    }

    #[test]
    fn scalar_field_embedding_reduces_mod_p() {
        // A scalar in [P, N) must wrap when embedded into the field.
        let p = base_field_modulus();
        let s = Scalar::new(p + 3u8);
        assert_eq!(s.to_field(), FieldElement::from_u64(3));
    }
}
