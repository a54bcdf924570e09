//! Real ball arithmetic: a midpoint with a rigorous radius bound.
//!
//! Every operation widens the radius by the propagated error of its inputs and the
//! rounding error of the midpoint computation. As a consequence, a ball that contains zero
//! cannot be proven zero or nonzero, and its zero test answers [Truth::Unknown].

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rand::Rng;

use crate::dispatch::MethodImpl;
use crate::linalg::pivot::find_pivot_large_abs;
use crate::status::Status;
use crate::truth::Truth;

use super::Ring;

/// A real number known to lie in `[mid - rad, mid + rad]`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ball {
    pub mid: f64,
    pub rad: f64,
}

impl Ball {
    pub fn new(mid: f64, rad: f64) -> Ball {
        Ball {
            mid,
            rad: rad.abs(),
        }
    }

    /// An exact ball with radius zero.
    pub fn exact(mid: f64) -> Ball {
        Ball { mid, rad: 0. }
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        self.rad == 0.
    }

    /// Returns `true` if `x` lies inside the ball.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        (self.mid - x).abs() <= self.rad
    }

    /// Returns `true` if the ball overlaps `other`.
    pub fn overlaps(&self, other: &Ball) -> bool {
        (self.mid - other.mid).abs() <= self.rad + other.rad
    }

    #[inline]
    fn rounding(mid: f64) -> f64 {
        f64::EPSILON * mid.abs()
    }
}

impl Display for Ball {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.rad == 0. {
            write!(f, "{}", self.mid)
        } else {
            write!(f, "[{} +/- {:.3e}]", self.mid, self.rad)
        }
    }
}

/// The field of real balls.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct BallField;

impl BallField {
    pub const fn new() -> BallField {
        BallField
    }
}

impl Display for BallField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("RB")
    }
}

/// Invert a ball. A ball that is exactly zero has no inverse, while a ball
/// that merely contains zero cannot be inverted reliably.
fn ball_inv(_: &BallField, a: &Ball) -> Result<Ball, Status> {
    if a.mid == 0. && a.rad == 0. {
        return Err(Status::DOMAIN);
    }

    let m = a.mid.abs();
    if m <= a.rad || a.mid.is_nan() {
        return Err(Status::UNABLE);
    }

    let mid = 1. / a.mid;
    Ok(Ball {
        mid,
        rad: a.rad / (m * (m - a.rad)) + Ball::rounding(mid),
    })
}

/// Order by the magnitude of the midpoints.
fn ball_cmp_abs(_: &BallField, a: &Ball, b: &Ball) -> Result<Ordering, Status> {
    a.mid.abs().partial_cmp(&b.mid.abs()).ok_or(Status::UNABLE)
}

impl Ring for BallField {
    type Element = Ball;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let mid = a.mid + b.mid;
        Ball {
            mid,
            rad: a.rad + b.rad + Ball::rounding(mid),
        }
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let mid = a.mid - b.mid;
        Ball {
            mid,
            rad: a.rad + b.rad + Ball::rounding(mid),
        }
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let mid = a.mid * b.mid;
        Ball {
            mid,
            rad: a.mid.abs() * b.rad + b.mid.abs() * a.rad + a.rad * b.rad + Ball::rounding(mid),
        }
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        Ball {
            mid: -a.mid,
            rad: a.rad,
        }
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Ball::exact(0.)
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Ball::exact(1.)
    }

    fn nth(&self, n: i64) -> Self::Element {
        let mid = n as f64;
        if mid as i64 == n {
            Ball::exact(mid)
        } else {
            Ball::new(mid, Ball::rounding(mid))
        }
    }

    fn is_zero(&self, a: &Self::Element) -> Truth {
        if a.mid == 0. && a.rad == 0. {
            Truth::True
        } else if a.mid.abs() > a.rad {
            Truth::False
        } else {
            Truth::Unknown
        }
    }

    fn is_one(&self, a: &Self::Element) -> Truth {
        if a.mid == 1. && a.rad == 0. {
            Truth::True
        } else if !a.contains(1.) && !a.mid.is_nan() {
            Truth::False
        } else {
            Truth::Unknown
        }
    }

    fn is_neg_one(&self, a: &Self::Element) -> Truth {
        if a.mid == -1. && a.rad == 0. {
            Truth::True
        } else if !a.contains(-1.) && !a.mid.is_nan() {
            Truth::False
        } else {
            Truth::Unknown
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let mid: f64 = rng.gen_range(range.0 as f64..range.1 as f64);
        Ball::new(mid, Ball::rounding(mid))
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
            MethodImpl::Inv(ball_inv),
            MethodImpl::CmpAbs(ball_cmp_abs),
            MethodImpl::FindPivot(find_pivot_large_abs),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::{Ball, BallField};
    use crate::domains::Ring;
    use crate::status::Status;
    use crate::truth::Truth;

    #[test]
    fn zero_tests() {
        let b = BallField::new();
        assert_eq!(b.is_zero(&Ball::exact(0.)), Truth::True);
        assert_eq!(b.is_zero(&Ball::new(0.5, 0.1)), Truth::False);
        assert_eq!(b.is_zero(&Ball::new(0.05, 0.1)), Truth::Unknown);
        assert_eq!(b.is_one(&Ball::new(1., 0.1)), Truth::Unknown);
    }

    #[test]
    fn enclosure() {
        let b = BallField::new();
        let x = Ball::new(1. / 3., 1e-10);
        let y = b.mul(&x, &b.nth(3));
        assert!(y.contains(1.));
        assert!(y.rad >= 3e-10);

        let z = b.sub(&x, &x);
        assert_eq!(b.is_zero(&z), Truth::Unknown);
    }

    #[test]
    fn inverses() {
        let b = BallField::new();
        assert_eq!(b.inv(&b.zero()), Err(Status::DOMAIN));
        assert_eq!(b.inv(&Ball::new(0.1, 0.2)), Err(Status::UNABLE));

        let i = b.inv(&Ball::new(4., 0.01)).unwrap();
        assert!(i.contains(1. / 3.99) && i.contains(1. / 4.01));

        let q = b.div(&b.one(), &Ball::exact(2.)).unwrap();
        assert!(q.contains(0.5));
        assert_eq!(b.is_zero(&q), Truth::False);
    }
}
