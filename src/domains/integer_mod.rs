//! The ring `Z / nZ` of integers modulo a word-sized modulus.
//!
//! Elements are stored as `u64` in the range `[0, n)`. The ring is a field if and only if
//! `n` is prime, which is decided once when the ring is created. The modulus `1` gives the
//! zero ring, in which `0 == 1`.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rand::Rng;

use crate::dispatch::MethodImpl;
use crate::settings::LinalgSettings;
use crate::status::Status;
use crate::truth::Truth;

use super::Ring;

/// The ring of integers modulo `n`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntegerMod {
    modulus: u64,
    prime: bool,
}

impl IntegerMod {
    /// Create the ring `Z / nZ`. Panics if `n` is zero.
    pub fn new(modulus: u64) -> IntegerMod {
        assert!(modulus > 0, "The modulus must be positive");
        IntegerMod {
            modulus,
            prime: is_prime_u64(modulus),
        }
    }

    #[inline]
    pub fn get_modulus(&self) -> u64 {
        self.modulus
    }

    /// Map an integer into the ring.
    #[inline]
    pub fn to_element(&self, a: i64) -> u64 {
        (a as i128).rem_euclid(self.modulus as i128) as u64
    }

    /// The symmetric representative of `a`, in `(-n/2, n/2]`.
    pub fn to_symmetric(&self, a: u64) -> i128 {
        if a > self.modulus / 2 {
            a as i128 - self.modulus as i128
        } else {
            a as i128
        }
    }

    #[inline]
    fn mul_mod(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.modulus as u128) as u64
    }

    fn pow_mod(&self, mut b: u64, mut e: u64) -> u64 {
        let mut res = 1 % self.modulus;
        while e > 0 {
            if e & 1 == 1 {
                res = self.mul_mod(res, b);
            }
            b = self.mul_mod(b, b);
            e >>= 1;
        }
        res
    }
}

impl Display for IntegerMod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Z/{}Z", self.modulus)
    }
}

/// Deterministic Miller-Rabin test for 64-bit integers.
pub fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    if n < 9 {
        return true;
    }

    let mut s = 0;
    let mut d = n - 1;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    let f = IntegerMod {
        modulus: n,
        prime: false,
    };

    // shortest SPRP basis from Jim Sinclair for testing primality of u64
    'test: for a in [2u64, 325, 9375, 28178, 450775, 9780504, 1795265022] {
        let a = a % n;
        if a == 0 {
            continue;
        }

        let mut x = f.pow_mod(a, d);
        if x == 1 || x == n - 1 {
            continue;
        }

        for _ in 1..s {
            x = f.mul_mod(x, x);
            if x == n - 1 {
                continue 'test;
            }
        }

        return false;
    }

    true
}

/// Compute the inverse with the extended Euclidean algorithm.
/// Elements that share a factor with the modulus are not units.
fn integer_mod_inv(ring: &IntegerMod, a: &u64) -> Result<u64, Status> {
    if ring.modulus == 1 {
        return Ok(0);
    }
    if *a == 0 {
        return Err(Status::DOMAIN);
    }

    let (mut r0, mut r1) = (ring.modulus as i128, *a as i128);
    let (mut t0, mut t1) = (0i128, 1i128);
    while r1 != 0 {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (t0, t1) = (t1, t0 - q * t1);
    }

    if r0 != 1 {
        return Err(Status::DOMAIN);
    }

    Ok(t0.rem_euclid(ring.modulus as i128) as u64)
}

fn integer_mod_div(ring: &IntegerMod, a: &u64, b: &u64) -> Result<u64, Status> {
    let i = integer_mod_inv(ring, b)?;
    Ok(ring.mul_mod(*a, i))
}

fn integer_mod_pow(ring: &IntegerMod, b: &u64, e: i64) -> Result<u64, Status> {
    if e.unsigned_abs() > LinalgSettings::get().pow_exponent_limit {
        return Err(Status::UNABLE);
    }

    let b = if e < 0 {
        integer_mod_inv(ring, b)?
    } else {
        *b
    };
    Ok(ring.pow_mod(b, e.unsigned_abs()))
}

fn integer_mod_cmp_abs(ring: &IntegerMod, a: &u64, b: &u64) -> Result<Ordering, Status> {
    Ok(ring
        .to_symmetric(*a)
        .unsigned_abs()
        .cmp(&ring.to_symmetric(*b).unsigned_abs()))
}

impl Ring for IntegerMod {
    type Element = u64;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let s = *a as u128 + *b as u128;
        (s % self.modulus as u128) as u64
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if a >= b {
            a - b
        } else {
            self.modulus - (b - a)
        }
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul_mod(*a, *b)
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        if *a == 0 {
            0
        } else {
            self.modulus - a
        }
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = ((*a as u128 + *b as u128 * *c as u128) % self.modulus as u128) as u64;
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        0
    }

    #[inline]
    fn one(&self) -> Self::Element {
        1 % self.modulus
    }

    #[inline]
    fn nth(&self, n: i64) -> Self::Element {
        self.to_element(n)
    }

    #[inline]
    fn is_zero(&self, a: &Self::Element) -> Truth {
        (*a == 0).into()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> Truth {
        (*a == self.one()).into()
    }

    #[inline]
    fn equal(&self, a: &Self::Element, b: &Self::Element) -> Truth {
        (a == b).into()
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        self.to_element(rng.gen_range(range.0..range.1))
    }

    fn format<W: std::fmt::Write>(&self, element: &Self::Element, f: &mut W) -> std::fmt::Result {
        write!(f, "{}", element)
    }

    fn is_field(&self) -> Truth {
        self.prime.into()
    }

    fn is_integral_domain(&self) -> Truth {
        self.prime.into()
    }

    fn is_exact(&self) -> Truth {
        Truth::True
    }

    fn is_finite(&self) -> Truth {
        Truth::True
    }

    fn is_canonical(&self) -> Truth {
        Truth::True
    }

    fn method_overrides() -> Vec<MethodImpl<Self>> {
        vec![
            MethodImpl::Inv(integer_mod_inv),
            MethodImpl::Div(integer_mod_div),
            MethodImpl::DivExact(integer_mod_div),
            MethodImpl::Pow(integer_mod_pow),
            MethodImpl::CmpAbs(integer_mod_cmp_abs),
        ]
    }
}
