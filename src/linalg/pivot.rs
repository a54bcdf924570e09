//! Pivot selection for elimination.
//!
//! A pivot search looks at `column` in the rows `start..end` and returns the row of a
//! provably nonzero entry. If every entry is provably zero (or the range is empty) the
//! result is [Status::DOMAIN]. If no entry is provably nonzero but some could not be
//! decided, the result is [Status::UNABLE], so that an elimination never treats an
//! undecided entry as zero.

use std::cmp::Ordering;

use crate::domains::Ring;
use crate::status::Status;
use crate::tensors::matrix::MatrixView;
use crate::truth::Truth;

/// Pick the first provably nonzero entry.
pub fn find_pivot_first<R: Ring>(
    a: MatrixView<'_, R>,
    start: usize,
    end: usize,
    column: usize,
) -> Result<usize, Status> {
    let ring = a.ring();
    let mut undecided = false;

    for i in start..end {
        match ring.is_zero(&a[(i, column)]) {
            Truth::False => return Ok(i),
            Truth::Unknown => undecided = true,
            Truth::True => {}
        }
    }

    if undecided {
        Err(Status::UNABLE)
    } else {
        Err(Status::DOMAIN)
    }
}

/// Pick the provably nonzero entry of largest magnitude, using the
/// ring's absolute value comparison. The first of equally large entries wins.
pub fn find_pivot_large_abs<R: Ring>(
    a: MatrixView<'_, R>,
    start: usize,
    end: usize,
    column: usize,
) -> Result<usize, Status> {
    let ring = a.ring();
    let mut undecided = false;
    let mut best: Option<usize> = None;

    for i in start..end {
        let e = &a[(i, column)];
        match ring.is_zero(e) {
            Truth::True => continue,
            Truth::Unknown => {
                undecided = true;
                continue;
            }
            Truth::False => {}
        }

        best = match best {
            None => Some(i),
            Some(b) => {
                if ring.cmp_abs(e, &a[(b, column)])? == Ordering::Greater {
                    Some(i)
                } else {
                    Some(b)
                }
            }
        };
    }

    match best {
        Some(b) => Ok(b),
        None if undecided => Err(Status::UNABLE),
        None => Err(Status::DOMAIN),
    }
}

#[cfg(test)]
mod test {
    use super::{find_pivot_first, find_pivot_large_abs};
    use crate::domains::{
        ball::{Ball, BallField},
        float::FloatField,
        integer::Z,
        Ring,
    };
    use crate::status::Status;
    use crate::tensors::matrix::Matrix;

    #[test]
    fn first_nonzero() {
        let a = Matrix::from_i64(&[0, 1, 0, 2, 3, 4, 0, 5], 4, 2, Z).unwrap();
        assert_eq!(find_pivot_first(a.as_view(), 0, 4, 0), Ok(2));
        assert_eq!(find_pivot_first(a.as_view(), 3, 4, 0), Err(Status::DOMAIN));
        assert_eq!(find_pivot_first(a.as_view(), 2, 2, 0), Err(Status::DOMAIN));
        assert_eq!(find_pivot_first(a.as_view(), 1, 4, 1), Ok(1));
    }

    #[test]
    fn largest_magnitude() {
        let a = Matrix::from_linear(vec![1., -7., 0., 7., 3.], 5, 1, FloatField::new()).unwrap();
        assert_eq!(find_pivot_large_abs(a.as_view(), 0, 5, 0), Ok(1));
        assert_eq!(find_pivot_large_abs(a.as_view(), 2, 3, 0), Err(Status::DOMAIN));

        let n = Matrix::from_linear(vec![1., f64::NAN], 2, 1, FloatField::new()).unwrap();
        assert_eq!(find_pivot_large_abs(n.as_view(), 0, 2, 0), Ok(0));
        assert_eq!(find_pivot_large_abs(n.as_view(), 1, 2, 0), Err(Status::UNABLE));

        // the dispatched pivot search of floats chooses by magnitude
        let f = FloatField::new();
        assert_eq!((f.methods().find_pivot())(a.as_view(), 0, 5, 0), Ok(1));
    }

    #[test]
    fn undecided_entries() {
        let b = BallField::new();
        let unknown = Ball::new(0., 1e-3);

        let a = Matrix::from_linear(vec![unknown, b.zero(), unknown], 3, 1, b).unwrap();
        assert_eq!(find_pivot_first(a.as_view(), 0, 3, 0), Err(Status::UNABLE));
        assert_eq!(find_pivot_large_abs(a.as_view(), 0, 3, 0), Err(Status::UNABLE));

        let a = Matrix::from_linear(vec![unknown, b.zero(), Ball::new(2., 0.1)], 3, 1, b).unwrap();
        assert_eq!(find_pivot_first(a.as_view(), 0, 3, 0), Ok(2));
        assert_eq!(find_pivot_large_abs(a.as_view(), 0, 3, 0), Ok(2));

        let a = Matrix::from_linear(vec![b.zero(), b.zero()], 2, 1, b).unwrap();
        assert_eq!(find_pivot_large_abs(a.as_view(), 0, 2, 0), Err(Status::DOMAIN));
    }
}
