//! Defines the core algebraic trait and the concrete rings shipped with the crate.
//!
//! The core trait is [Ring]. Each ring has an associated element type, that should not be
//! confused with the ring type itself. For example:
//! - The ring of integers [Z](type@integer::Z) has elements of type [rug::Integer].
//! - The field of rational numbers [Q](type@rational::Q) has elements of type [rug::Rational].
//! - The ring [IntegerMod](integer_mod::IntegerMod) of integers modulo `n` has elements of type `u64`.
//! - The field of double precision floats [FloatField](float::FloatField) has elements of type `f64`.
//! - The field of real balls [BallField](ball::BallField) has elements of type [Ball](ball::Ball).
//!
//! In general, the ring elements do not implement operations such as addition or multiplication,
//! but rather the ring itself does. All matrix algorithms are generic over the ring type.
//!
//! Predicates that a ring may be unable to decide, such as zero tests on balls,
//! return a [Truth]. Operations that may fail, such as inversion, return a [Status] error.
//! Composite operations (inversion, division, powers, dot products and all matrix-level algorithms)
//! are dispatched through the [MethodTable] of the ring kind, so that a ring can replace
//! the generic implementation by listing an override in [Ring::method_overrides].
pub mod ball;
pub mod float;
pub mod integer;
pub mod integer_mod;
pub mod rational;

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

use crate::dispatch::{MethodImpl, MethodTable};
use crate::status::Status;
use crate::truth::Truth;

/// A ring is a set with two binary operations, addition and multiplication.
///
/// Implementors must provide the primitive arithmetic, the zero and one tests and the
/// element sampler. Everything else has a generic default.
pub trait Ring: Clone + PartialEq + Debug + Display + Send + Sync + 'static {
    /// The element of a ring. For example, the elements of the ring of integers [Z](type@integer::Z), `Z::Element`, are [rug::Integer].
    type Element: Clone + PartialEq + Debug + Send + Sync;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: i64) -> Self::Element;

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    /// Compute `a += b * c`.
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        let t = self.mul(b, c);
        self.add_assign(a, &t);
    }

    /// Compute `a -= b * c`.
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        let t = self.mul(b, c);
        self.sub_assign(a, &t);
    }

    fn is_zero(&self, a: &Self::Element) -> Truth;
    fn is_one(&self, a: &Self::Element) -> Truth;

    fn is_neg_one(&self, a: &Self::Element) -> Truth {
        self.is_one(&self.neg(a))
    }

    fn equal(&self, a: &Self::Element, b: &Self::Element) -> Truth {
        self.is_zero(&self.sub(a, b))
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element;

    /// Write a human-readable representation of `element`.
    fn format<W: std::fmt::Write>(&self, element: &Self::Element, f: &mut W) -> std::fmt::Result;

    /// Create a new printer for the given ring element that
    /// can be used in a [format!] macro.
    fn printer<'a>(&'a self, element: &'a Self::Element) -> RingPrinter<'a, Self> {
        RingPrinter {
            ring: self,
            element,
        }
    }

    fn is_ring(&self) -> Truth {
        Truth::True
    }

    fn is_commutative(&self) -> Truth {
        Truth::True
    }

    fn is_field(&self) -> Truth {
        Truth::Unknown
    }

    fn is_integral_domain(&self) -> Truth {
        Truth::Unknown
    }

    /// Returns `True` if arithmetic is carried out without rounding.
    fn is_exact(&self) -> Truth {
        Truth::Unknown
    }

    fn is_finite(&self) -> Truth {
        Truth::Unknown
    }

    /// Returns `True` if equal elements have a unique representation.
    fn is_canonical(&self) -> Truth {
        Truth::Unknown
    }

    /// The methods of this ring kind that replace the generic implementations.
    /// Called once per ring type, so the overrides may not depend on the ring instance.
    fn method_overrides() -> Vec<MethodImpl<Self>> {
        vec![]
    }

    /// The method table of this ring kind.
    #[inline]
    fn methods(&self) -> &'static MethodTable<Self> {
        MethodTable::get()
    }

    /// Compute the multiplicative inverse of `a`.
    fn inv(&self, a: &Self::Element) -> Result<Self::Element, Status> {
        (self.methods().inv())(self, a)
    }

    /// Compute `a / b`.
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, Status> {
        (self.methods().div())(self, a, b)
    }

    /// Compute `a / b`, where the caller guarantees that the division is exact.
    fn div_exact(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, Status> {
        (self.methods().div_exact())(self, a, b)
    }

    fn pow(&self, b: &Self::Element, e: i64) -> Result<Self::Element, Status> {
        (self.methods().pow())(self, b, e)
    }

    /// Compare the magnitudes of `a` and `b`.
    fn cmp_abs(&self, a: &Self::Element, b: &Self::Element) -> Result<Ordering, Status> {
        (self.methods().cmp_abs())(self, a, b)
    }

    /// Compute `initial + sum(a_i * b_i)`, or `initial - sum(a_i * b_i)` if `subtract` is set.
    fn dot(
        &self,
        initial: Option<&Self::Element>,
        subtract: bool,
        a: &[Self::Element],
        b: &[Self::Element],
    ) -> Self::Element {
        (self.methods().dot())(self, initial, subtract, a, b)
    }

    /// Create the element `num / den`.
    fn from_fraction(&self, num: i64, den: i64) -> Result<Self::Element, Status> {
        if den == 0 {
            return Err(Status::DOMAIN);
        }
        self.div(&self.nth(num), &self.nth(den))
    }
}

/// Provides an interface for printing elements of a ring,
/// suitable as an argument to [format!]. Internally, it will call [Ring::format].
pub struct RingPrinter<'a, R: Ring> {
    pub ring: &'a R,
    pub element: &'a R::Element,
}

impl<'a, R: Ring> Display for RingPrinter<'a, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.ring.format(self.element, f)
    }
}
