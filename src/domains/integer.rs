//! The ring of integers, backed by GMP integers.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rand::Rng;
use rug::{ops::Pow, Integer};

use crate::dispatch::MethodImpl;
use crate::generic;
use crate::settings::LinalgSettings;
use crate::status::Status;
use crate::truth::Truth;

use super::Ring;

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The integer ring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntegerRing;

impl Default for IntegerRing {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

impl Display for IntegerRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Z")
    }
}

/// Only `1` and `-1` are units.
fn integer_inv(_: &IntegerRing, a: &Integer) -> Result<Integer, Status> {
    if *a == 1 || *a == -1 {
        Ok(a.clone())
    } else {
        Err(Status::DOMAIN)
    }
}

/// The quotient `a / b`, if `b` divides `a`.
fn integer_div(_: &IntegerRing, a: &Integer, b: &Integer) -> Result<Integer, Status> {
    if *b == 0 || !a.is_divisible(b) {
        return Err(Status::DOMAIN);
    }
    Ok(Integer::from(a.div_exact_ref(b)))
}

fn integer_div_exact(_: &IntegerRing, a: &Integer, b: &Integer) -> Result<Integer, Status> {
    if *b == 0 {
        return Err(Status::DOMAIN);
    }
    debug_assert!(a.is_divisible(b), "{} is not divisible by {}", a, b);
    Ok(Integer::from(a.div_exact_ref(b)))
}

fn integer_pow(ring: &IntegerRing, b: &Integer, e: i64) -> Result<Integer, Status> {
    if e < 0 || e > u32::MAX as i64 || e as u64 > LinalgSettings::get().pow_exponent_limit {
        return generic::pow(ring, b, e);
    }
    Ok(Integer::from(b.pow(e as u32)))
}

fn integer_cmp_abs(_: &IntegerRing, a: &Integer, b: &Integer) -> Result<Ordering, Status> {
    Ok(a.cmp_abs(b))
}

impl Ring for IntegerRing {
    type Element = Integer;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Integer::from(a + b)
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Integer::from(a - b)
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Integer::from(a * b)
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        Integer::from(-a)
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

    #[inline(always)]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        // prevent the creation of a temporary GMP integer b * c
        *a += b * c;
    }

    #[inline(always)]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a -= b * c;
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Integer::new()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Integer::from(1)
    }

    #[inline]
    fn nth(&self, n: i64) -> Self::Element {
        Integer::from(n)
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

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        Integer::from(rng.gen_range(range.0..range.1))
    }

    fn format<W: std::fmt::Write>(&self, element: &Self::Element, f: &mut W) -> std::fmt::Result {
        write!(f, "{}", element)
    }

    fn is_field(&self) -> Truth {
        Truth::False
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
            MethodImpl::Inv(integer_inv),
            MethodImpl::Div(integer_div),
            MethodImpl::DivExact(integer_div_exact),
            MethodImpl::Pow(integer_pow),
            MethodImpl::CmpAbs(integer_cmp_abs),
        ]
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use rug::Integer;

    use crate::domains::{integer::Z, Ring};
    use crate::status::Status;
    use crate::truth::Truth;

    #[test]
    fn units() {
        assert_eq!(Z.inv(&Integer::from(-1)), Ok(Integer::from(-1)));
        assert_eq!(Z.inv(&Integer::from(2)), Err(Status::DOMAIN));
        assert_eq!(Z.inv(&Integer::from(0)), Err(Status::DOMAIN));
    }

    #[test]
    fn division() {
        assert_eq!(Z.div(&Integer::from(12), &Integer::from(-4)), Ok(Integer::from(-3)));
        assert_eq!(Z.div(&Integer::from(12), &Integer::from(5)), Err(Status::DOMAIN));
        assert_eq!(Z.div_exact(&Integer::from(12), &Integer::from(3)), Ok(Integer::from(4)));
        assert_eq!(Z.from_fraction(6, 3), Ok(Integer::from(2)));
        assert_eq!(Z.from_fraction(1, 0), Err(Status::DOMAIN));
    }

    #[test]
    fn powers() {
        assert_eq!(Z.pow(&Integer::from(-2), 65), Ok(-Integer::from(Integer::from(1) << 65)));
        assert_eq!(Z.pow(&Integer::from(-1), -7), Ok(Integer::from(-1)));
        assert_eq!(Z.pow(&Integer::from(2), i64::MAX), Err(Status::UNABLE));
    }

    #[test]
    fn predicates() {
        assert_eq!(Z.is_zero(&Integer::new()), Truth::True);
        assert_eq!(Z.is_neg_one(&Integer::from(-1)), Truth::True);
        assert_eq!(Z.is_field(), Truth::False);
        assert_eq!(
            Z.cmp_abs(&Integer::from(-5), &Integer::from(3)),
            Ok(Ordering::Greater)
        );
        assert_eq!(format!("{}", Z.printer(&Integer::from(-12))), "-12");
    }
}
