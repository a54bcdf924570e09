//! The field of rational numbers, backed by GMP rationals.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rand::Rng;
use rug::{Integer, Rational};

use crate::dispatch::MethodImpl;
use crate::status::Status;
use crate::truth::Truth;

use super::Ring;

/// The field of rational numbers.
pub type Q = RationalField;
/// The field of rational numbers.
pub const Q: RationalField = RationalField::new();

/// The field of rational numbers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RationalField;

impl Default for RationalField {
    fn default() -> Self {
        Self::new()
    }
}

impl RationalField {
    pub const fn new() -> RationalField {
        RationalField
    }

    /// Create the rational `num / den` from arbitrary precision integers.
    pub fn to_element(&self, num: Integer, den: Integer) -> Result<Rational, Status> {
        if den == 0 {
            return Err(Status::DOMAIN);
        }
        Ok(Rational::from((num, den)))
    }
}

impl Display for RationalField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Q")
    }
}

fn rational_inv(_: &RationalField, a: &Rational) -> Result<Rational, Status> {
    if *a == 0 {
        return Err(Status::DOMAIN);
    }
    Ok(Rational::from(a.recip_ref()))
}

fn rational_div(_: &RationalField, a: &Rational, b: &Rational) -> Result<Rational, Status> {
    if *b == 0 {
        return Err(Status::DOMAIN);
    }
    Ok(Rational::from(a / b))
}

fn rational_cmp_abs(_: &RationalField, a: &Rational, b: &Rational) -> Result<Ordering, Status> {
    Ok(a.cmp_abs(b))
}

impl Ring for RationalField {
    type Element = Rational;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational::from(a + b)
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational::from(a - b)
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational::from(a * b)
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        Rational::from(-a)
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a += b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a -= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a *= b;
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Rational::new()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Rational::from(1)
    }

    #[inline]
    fn nth(&self, n: i64) -> Self::Element {
        Rational::from(n)
    }

    #[inline]
    fn is_zero(&self, a: &Self::Element) -> Truth {
        (*a == 0).into()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> Truth {
        (*a == 1).into()
    }

    #[inline]
    fn is_neg_one(&self, a: &Self::Element) -> Truth {
        (*a == -1).into()
    }

    #[inline]
    fn equal(&self, a: &Self::Element, b: &Self::Element) -> Truth {
        (a == b).into()
    }

    /// Sample a numerator from `range` and a positive denominator bounded by
    /// the largest magnitude in `range`.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let num = rng.gen_range(range.0..range.1);
        let max_den = range.0.unsigned_abs().max(range.1.unsigned_abs()).max(1);
        let den = rng.gen_range(1..=max_den);
        Rational::from((num, den))
    }

    fn format<W: std::fmt::Write>(&self, element: &Self::Element, f: &mut W) -> std::fmt::Result {
        write!(f, "{}", element)
    }

    fn is_field(&self) -> Truth {
        Truth::True
    }

    fn is_integral_domain(&self) -> Truth {
        Truth::True
    }

    fn is_exact(&self) -> Truth {
        Truth::True
    }

    fn is_finite(&self) -> Truth {
        Truth::False
    }

    fn is_canonical(&self) -> Truth {
        Truth::True
    }

    fn method_overrides() -> Vec<MethodImpl<Self>> {
        vec![
            MethodImpl::Inv(rational_inv),
            MethodImpl::Div(rational_div),
            MethodImpl::DivExact(rational_div),
            MethodImpl::CmpAbs(rational_cmp_abs),
        ]
    }
}
