//! The field of double precision floating point numbers.
//!
//! Arithmetic rounds, so the field is not exact. Zero tests are nevertheless exact
//! comparisons with `0.0`, and pivots are chosen by largest magnitude for stability.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rand::Rng;

use crate::dispatch::MethodImpl;
use crate::linalg::pivot::find_pivot_large_abs;
use crate::status::Status;
use crate::truth::Truth;

use super::Ring;

/// The field of `f64` values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct FloatField;

impl FloatField {
    pub const fn new() -> FloatField {
        FloatField
    }
}

impl Display for FloatField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("RR")
    }
}

fn float_inv(_: &FloatField, a: &f64) -> Result<f64, Status> {
    if *a == 0. {
        return Err(Status::DOMAIN);
    }
    if a.is_nan() {
        return Err(Status::UNABLE);
    }
    Ok(1. / a)
}

fn float_div(_: &FloatField, a: &f64, b: &f64) -> Result<f64, Status> {
    if *b == 0. {
        return Err(Status::DOMAIN);
    }
    if b.is_nan() {
        return Err(Status::UNABLE);
    }
    Ok(a / b)
}

fn float_pow(_: &FloatField, b: &f64, e: i64) -> Result<f64, Status> {
    if e < 0 && *b == 0. {
        return Err(Status::DOMAIN);
    }
    if let Ok(e) = i32::try_from(e) {
        Ok(b.powi(e))
    } else {
        Ok(b.powf(e as f64))
    }
}

fn float_cmp_abs(_: &FloatField, a: &f64, b: &f64) -> Result<Ordering, Status> {
    a.abs().partial_cmp(&b.abs()).ok_or(Status::UNABLE)
}

impl Ring for FloatField {
    type Element = f64;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -a
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = b.mul_add(*c, *a);
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = (-b).mul_add(*c, *a);
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        0.
    }

    #[inline]
    fn one(&self) -> Self::Element {
        1.
    }

    #[inline]
    fn nth(&self, n: i64) -> Self::Element {
        n as f64
    }

    /// Exact comparison with zero. `NaN` cannot be decided.
    #[inline]
    fn is_zero(&self, a: &Self::Element) -> Truth {
        if a.is_nan() {
            Truth::Unknown
        } else {
            (*a == 0.).into()
        }
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> Truth {
        if a.is_nan() {
            Truth::Unknown
        } else {
            (*a == 1.).into()
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        rng.gen_range(range.0 as f64..range.1 as f64)
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
        Truth::False
    }

    fn is_finite(&self) -> Truth {
        Truth::False
    }

    fn is_canonical(&self) -> Truth {
        Truth::False
    }

    fn method_overrides() -> Vec<MethodImpl<Self>> {
        vec![
            MethodImpl::Inv(float_inv),
            MethodImpl::Div(float_div),
            MethodImpl::DivExact(float_div),
            MethodImpl::Pow(float_pow),
            MethodImpl::CmpAbs(float_cmp_abs),
            MethodImpl::FindPivot(find_pivot_large_abs),
        ]
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::FloatField;
    use crate::domains::Ring;
    use crate::status::Status;
    use crate::truth::Truth;

    #[test]
    fn division() {
        let f = FloatField::new();
        assert_eq!(f.inv(&4.), Ok(0.25));
        assert_eq!(f.inv(&0.), Err(Status::DOMAIN));
        assert_eq!(f.div(&1., &f64::NAN), Err(Status::UNABLE));
        assert_eq!(f.pow(&2., -2), Ok(0.25));
        assert_eq!(f.pow(&0., -1), Err(Status::DOMAIN));
    }

    #[test]
    fn predicates() {
        let f = FloatField::new();
        assert_eq!(f.is_zero(&1e-300), Truth::False);
        assert_eq!(f.is_zero(&f64::NAN), Truth::Unknown);
        assert_eq!(f.cmp_abs(&-3., &2.), Ok(Ordering::Greater));
        assert_eq!(f.cmp_abs(&f64::NAN, &2.), Err(Status::UNABLE));
        assert_eq!(f.is_exact(), Truth::False);
    }
}
