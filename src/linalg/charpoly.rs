//! The characteristic polynomial `det(xI - A)`.

use tracing::instrument;

use crate::domains::Ring;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView};

/// Compute the characteristic polynomial with the division-free algorithm of Berkowitz.
/// The coefficients are returned in ascending order, so that the last one is `1`.
///
/// The polynomial of the leading `(r+1) x (r+1)` submatrix is obtained from that of the
/// leading `r x r` submatrix `A_r` by a Toeplitz product with the vector
/// `(1, -a_rr, -R S, -R A_r S, ..., -R A_r^(r-1) S)`, where `R` and `S` are the
/// row and column that extend `A_r`.
#[instrument(level = "trace", skip_all, fields(n = a.nrows()))]
pub fn charpoly_berkowitz<R: Ring>(a: MatrixView<'_, R>) -> Result<Vec<R::Element>, Status> {
    if !a.is_square() {
        return Err(Status::DOMAIN);
    }

    let n = a.nrows();
    let ring = a.ring();

    // descending coefficients
    let mut p = vec![ring.one()];
    let mut v = Vec::with_capacity(n);
    let mut w = Vec::with_capacity(n);
    for r in 0..n {
        let row = &a.row(r)[..r];

        let mut t = Vec::with_capacity(r + 2);
        t.push(ring.one());
        t.push(ring.neg(&a[(r, r)]));

        v.clear();
        v.extend((0..r).map(|i| a[(i, r)].clone()));
        for k in 0..r {
            t.push(ring.dot(None, true, row, &v));

            if k + 1 < r {
                w.clear();
                w.extend((0..r).map(|i| ring.dot(None, false, &a.row(i)[..r], &v)));
                std::mem::swap(&mut v, &mut w);
            }
        }

        let mut q = Vec::with_capacity(r + 2);
        for i in 0..r + 2 {
            let mut c = ring.zero();
            for j in i.saturating_sub(r + 1)..=i.min(r) {
                ring.add_mul_assign(&mut c, &t[i - j], &p[j]);
            }
            q.push(c);
        }
        p = q;
    }

    p.reverse();
    Ok(p)
}

impl<R: Ring> Matrix<R> {
    /// Compute the characteristic polynomial `det(xI - A)`, with ascending coefficients.
    pub fn charpoly(&self) -> Result<Vec<R::Element>, Status> {
        (self.ring.methods().charpoly())(self.as_view())
    }
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use crate::domains::{integer::Z, integer_mod::IntegerMod, Ring};
    use crate::status::Status;
    use crate::tensors::matrix::Matrix;

    #[test]
    fn small() {
        assert_eq!(Matrix::new(0, 0, Z).charpoly().unwrap(), [Integer::from(1)]);

        let a = Matrix::from_i64(&[5], 1, 1, Z).unwrap();
        assert_eq!(a.charpoly().unwrap(), [Integer::from(-5), Integer::from(1)]);

        let a = Matrix::from_i64(&[1, 2, 3, 4], 2, 2, Z).unwrap();
        assert_eq!(
            a.charpoly().unwrap(),
            [Integer::from(-2), Integer::from(-5), Integer::from(1)]
        );

        let a = Matrix::from_i64(&[2, 0, 1, 1, 3, 0, 0, 1, 4], 3, 3, Z).unwrap();
        // x^3 - 9x^2 + 26x - 25
        assert_eq!(
            a.charpoly().unwrap(),
            [-25, 26, -9, 1].map(Integer::from)
        );

        assert_eq!(Matrix::new(2, 3, Z).charpoly().err(), Some(Status::DOMAIN));
    }

    #[test]
    fn cayley_hamilton() {
        let r = IntegerMod::new(12);
        let a = Matrix::from_i64(
            &[3, 7, 1, 0, 2, 2, 5, 9, 11, 4, 6, 1, 8, 0, 3, 10],
            4,
            4,
            r,
        )
        .unwrap();

        let c = a.charpoly().unwrap();
        assert_eq!(c.len(), 5);

        let mut sum = Matrix::new(4, 4, r);
        let mut power = Matrix::identity(4, r);
        for coeff in &c {
            sum = &sum + &power.mul_scalar(coeff);
            power = &power * &a;
        }
        assert!(sum.is_zero().is_true());
        assert!(r.is_one(&c[4]).is_true());
    }
}
