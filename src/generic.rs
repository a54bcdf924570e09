//! Generic implementations of the composite ring operations, valid for any [Ring].
//!
//! These fill the [MethodTable](crate::dispatch::MethodTable) slots of a ring kind
//! that does not provide a specialized version. The vector helpers are used by the
//! matrix algorithms on contiguous row slices.

use crate::domains::Ring;
use crate::settings::LinalgSettings;
use crate::status::Status;
use crate::truth::Truth;

/// Compute `b^e` by binary exponentiation. A negative exponent inverts `b` first.
///
/// `b^0` is one, also in the zero ring. Exponents larger in magnitude than
/// [LinalgSettings::pow_exponent_limit] yield [Status::UNABLE].
pub fn pow<R: Ring>(ring: &R, b: &R::Element, e: i64) -> Result<R::Element, Status> {
    if e == 0 {
        return Ok(ring.one());
    }

    let mut exp = e.unsigned_abs();
    if exp > LinalgSettings::get().pow_exponent_limit {
        return Err(Status::UNABLE);
    }

    let mut base = if e < 0 { ring.inv(b)? } else { b.clone() };
    if exp == 1 {
        return Ok(base);
    }

    let mut res = ring.one();
    while exp > 0 {
        if exp & 1 == 1 {
            ring.mul_assign(&mut res, &base);
        }
        exp >>= 1;
        if exp > 0 {
            base = ring.mul(&base, &base);
        }
    }
    Ok(res)
}

/// Compute `initial + a·b`, or `initial - a·b` if `subtract` is set.
pub fn dot<R: Ring>(
    ring: &R,
    initial: Option<&R::Element>,
    subtract: bool,
    a: &[R::Element],
    b: &[R::Element],
) -> R::Element {
    debug_assert_eq!(a.len(), b.len());

    let mut res = match initial {
        Some(i) => i.clone(),
        None => ring.zero(),
    };

    if subtract {
        for (x, y) in a.iter().zip(b) {
            ring.sub_mul_assign(&mut res, x, y);
        }
    } else {
        for (x, y) in a.iter().zip(b) {
            ring.add_mul_assign(&mut res, x, y);
        }
    }
    res
}

/// Invert the units `1` and `-1`. Zero is a domain error and everything else
/// is left to rings that know more about their units.
pub fn inv<R: Ring>(ring: &R, a: &R::Element) -> Result<R::Element, Status> {
    if ring.is_one(a).is_true() {
        return Ok(ring.one());
    }
    if ring.is_neg_one(a).is_true() {
        return Ok(ring.neg(&ring.one()));
    }
    if ring.is_zero(a).is_true() {
        return Err(Status::DOMAIN);
    }
    Err(Status::UNABLE)
}

/// Compute `a / b = a * b^-1`.
pub fn div<R: Ring>(ring: &R, a: &R::Element, b: &R::Element) -> Result<R::Element, Status> {
    let i = ring.inv(b)?;
    Ok(ring.mul(a, &i))
}

pub fn vec_add<R: Ring>(ring: &R, res: &mut [R::Element], a: &[R::Element]) {
    for (r, x) in res.iter_mut().zip(a) {
        ring.add_assign(r, x);
    }
}

pub fn vec_sub<R: Ring>(ring: &R, res: &mut [R::Element], a: &[R::Element]) {
    for (r, x) in res.iter_mut().zip(a) {
        ring.sub_assign(r, x);
    }
}

pub fn vec_neg<R: Ring>(ring: &R, res: &mut [R::Element]) {
    for r in res {
        *r = ring.neg(r);
    }
}

pub fn vec_mul_scalar<R: Ring>(ring: &R, res: &mut [R::Element], c: &R::Element) {
    for r in res {
        ring.mul_assign(r, c);
    }
}

/// Compute `res += c * a`.
pub fn vec_addmul_scalar<R: Ring>(
    ring: &R,
    res: &mut [R::Element],
    a: &[R::Element],
    c: &R::Element,
) {
    for (r, x) in res.iter_mut().zip(a) {
        ring.add_mul_assign(r, x, c);
    }
}

/// Compute `res -= c * a`.
pub fn vec_submul_scalar<R: Ring>(
    ring: &R,
    res: &mut [R::Element],
    a: &[R::Element],
    c: &R::Element,
) {
    for (r, x) in res.iter_mut().zip(a) {
        ring.sub_mul_assign(r, x, c);
    }
}

pub fn vec_is_zero<R: Ring>(ring: &R, a: &[R::Element]) -> Truth {
    Truth::all(a.iter().map(|x| ring.is_zero(x)))
}

pub fn vec_equal<R: Ring>(ring: &R, a: &[R::Element], b: &[R::Element]) -> Truth {
    if a.len() != b.len() {
        return Truth::False;
    }
    Truth::all(a.iter().zip(b).map(|(x, y)| ring.equal(x, y)))
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use crate::domains::{
        ball::{Ball, BallField},
        integer::Z,
        integer_mod::IntegerMod,
        Ring,
    };
    use crate::status::Status;
    use crate::truth::Truth;

    #[test]
    fn pow_small() {
        assert_eq!(super::pow(&Z, &Integer::from(3), 5), Ok(Integer::from(243)));
        assert_eq!(super::pow(&Z, &Integer::from(0), 0), Ok(Integer::from(1)));
        assert_eq!(super::pow(&Z, &Integer::from(-1), -3), Ok(Integer::from(-1)));
        assert_eq!(super::pow(&Z, &Integer::from(2), -1), Err(Status::DOMAIN));
        assert_eq!(super::pow(&Z, &Integer::from(0), -1), Err(Status::DOMAIN));
    }

    #[test]
    fn pow_zero_ring() {
        let r = IntegerMod::new(1);
        assert_eq!(super::pow(&r, &0, 0), Ok(0));
        assert_eq!(r.pow(&0, 3), Ok(0));
    }

    #[test]
    fn pow_exponent_limit() {
        assert_eq!(
            super::pow(&Z, &Integer::from(2), i64::MAX),
            Err(Status::UNABLE)
        );
        assert_eq!(
            super::pow(&Z, &Integer::from(2), i64::MIN),
            Err(Status::UNABLE)
        );
    }

    #[test]
    fn generic_inverse() {
        let f = IntegerMod::new(7);
        assert_eq!(super::inv(&f, &1), Ok(1));
        assert_eq!(super::inv(&f, &6), Ok(6));
        assert_eq!(super::inv(&f, &0), Err(Status::DOMAIN));
        assert_eq!(super::inv(&f, &3), Err(Status::UNABLE));

        let b = BallField::new();
        assert_eq!(super::inv(&b, &Ball::new(0., 1.)), Err(Status::UNABLE));
    }

    #[test]
    fn dot_product() {
        let a = [Integer::from(1), Integer::from(2), Integer::from(3)];
        let b = [Integer::from(4), Integer::from(5), Integer::from(6)];
        assert_eq!(super::dot(&Z, None, false, &a, &b), 32);
        assert_eq!(
            super::dot(&Z, Some(&Integer::from(2)), true, &a, &b),
            -30
        );
        assert_eq!(super::dot(&Z, Some(&Integer::from(2)), false, &[], &[]), 2);
    }

    #[test]
    fn vectors() {
        let mut v = vec![Integer::from(1), Integer::from(2)];
        super::vec_addmul_scalar(&Z, &mut v, &[Integer::from(1), Integer::from(1)], &3.into());
        assert_eq!(v, [4, 5]);
        super::vec_submul_scalar(&Z, &mut v, &[Integer::from(1), Integer::from(1)], &4.into());
        assert_eq!(v, [0, 1]);
        assert_eq!(super::vec_is_zero(&Z, &v), Truth::False);
        super::vec_neg(&Z, &mut v);
        assert_eq!(super::vec_equal(&Z, &v, &[0.into(), (-1).into()]), Truth::True);

        let b = BallField::new();
        assert_eq!(
            super::vec_is_zero(&b, &[Ball::new(0., 0.), Ball::new(0., 1.)]),
            Truth::Unknown
        );
    }
}
