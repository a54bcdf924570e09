//! Matrix multiplication.
//!
//! The classical product transposes the right factor once so that every entry of the result
//! is the dot product of two contiguous rows. Large products fan out over the rows of the
//! result with rayon; every entry is still computed by a single sequential dot product, so
//! the result does not depend on the number of threads.
//!
//! Over exact rings, large products use the Strassen-Winograd scheme, which trades one of
//! the eight block products for a handful of additions.

use rayon::prelude::*;
use tracing::debug;

use crate::domains::Ring;
use crate::settings::LinalgSettings;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView};
use crate::truth::Truth;

/// Multiply `a` and `b`, picking Strassen multiplication for large products over exact rings.
pub fn mul_generic<R: Ring>(a: MatrixView<'_, R>, b: MatrixView<'_, R>) -> Result<Matrix<R>, Status> {
    if a.ncols() != b.nrows() {
        return Err(Status::DOMAIN);
    }

    let cutoff = LinalgSettings::get().mul_strassen_cutoff;
    if a.nrows().min(a.ncols()).min(b.ncols()) >= cutoff && a.ring().is_exact() == Truth::True {
        debug!(
            "Strassen multiplication of ({},{}) by ({},{})",
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols()
        );
        mul_strassen(a, b, cutoff)
    } else {
        mul_classical(a, b)
    }
}

/// Multiply `a` and `b` with dot products of rows.
pub fn mul_classical<R: Ring>(
    a: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
) -> Result<Matrix<R>, Status> {
    if a.ncols() != b.nrows() {
        return Err(Status::DOMAIN);
    }

    let (m, k, n) = (a.nrows(), a.ncols(), b.ncols());
    let ring = a.ring();
    let mut c = Matrix::new(m, n, ring.clone());
    if m == 0 || n == 0 {
        return Ok(c);
    }

    let bt = b.transpose();

    let fill_row = |(i, row): (usize, &mut [R::Element])| {
        let ar = a.row(i);
        for (j, e) in row.iter_mut().enumerate() {
            *e = ring.dot(None, false, ar, bt.row(j));
        }
    };

    // the buffer of a new matrix is in row order
    if m.saturating_mul(n).saturating_mul(k) > LinalgSettings::get().parallel_mul_cutoff {
        c.data.par_chunks_mut(n).enumerate().for_each(fill_row);
    } else {
        c.data.chunks_mut(n).enumerate().for_each(fill_row);
    }

    Ok(c)
}

fn add_views<R: Ring>(a: MatrixView<'_, R>, b: MatrixView<'_, R>) -> Matrix<R> {
    let mut c = a.to_matrix();
    let ring = a.ring();
    for i in 0..c.nrows() {
        for (x, y) in c.row_mut(i).iter_mut().zip(b.row(i)) {
            ring.add_assign(x, y);
        }
    }
    c
}

fn sub_views<R: Ring>(a: MatrixView<'_, R>, b: MatrixView<'_, R>) -> Matrix<R> {
    let mut c = a.to_matrix();
    c.as_view_mut().sub_assign(b);
    c
}

/// Multiply `a` and `b` with the Strassen-Winograd scheme, recursing until one of the
/// dimensions drops below `cutoff`. Odd rows and columns are peeled off and handled
/// classically.
pub fn mul_strassen<R: Ring>(
    a: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
    cutoff: usize,
) -> Result<Matrix<R>, Status> {
    if a.ncols() != b.nrows() {
        return Err(Status::DOMAIN);
    }

    let (m, k, n) = (a.nrows(), a.ncols(), b.ncols());
    if m.min(k).min(n) < cutoff.max(2) {
        return mul_classical(a, b);
    }

    let (m2, k2, n2) = (m / 2, k / 2, n / 2);

    let a11 = a.window(0, 0, m2, k2);
    let a12 = a.window(0, k2, m2, 2 * k2);
    let a21 = a.window(m2, 0, 2 * m2, k2);
    let a22 = a.window(m2, k2, 2 * m2, 2 * k2);
    let b11 = b.window(0, 0, k2, n2);
    let b12 = b.window(0, n2, k2, 2 * n2);
    let b21 = b.window(k2, 0, 2 * k2, n2);
    let b22 = b.window(k2, n2, 2 * k2, 2 * n2);

    let s1 = add_views(a21, a22);
    let s2 = sub_views(s1.as_view(), a11);
    let s3 = sub_views(a11, a21);
    let s4 = sub_views(a12, s2.as_view());
    let t1 = sub_views(b12, b11);
    let t2 = sub_views(b22, t1.as_view());
    let t3 = sub_views(b22, b12);
    let t4 = sub_views(t2.as_view(), b21);

    let p1 = mul_strassen(a11, b11, cutoff)?;
    let p2 = mul_strassen(a12, b21, cutoff)?;
    let p3 = mul_strassen(s4.as_view(), b22, cutoff)?;
    let p4 = mul_strassen(a22, t4.as_view(), cutoff)?;
    let p5 = mul_strassen(s1.as_view(), t1.as_view(), cutoff)?;
    let p6 = mul_strassen(s2.as_view(), t2.as_view(), cutoff)?;
    let p7 = mul_strassen(s3.as_view(), t3.as_view(), cutoff)?;

    let c11 = add_views(p1.as_view(), p2.as_view());
    let u2 = add_views(p1.as_view(), p6.as_view());
    let u3 = add_views(u2.as_view(), p7.as_view());
    let u4 = add_views(u2.as_view(), p5.as_view());
    let c12 = add_views(u4.as_view(), p3.as_view());
    let c21 = sub_views(u3.as_view(), p4.as_view());
    let c22 = add_views(u3.as_view(), p5.as_view());

    let mut c = Matrix::new(m, n, a.ring().clone());
    c.window_mut(0, 0, m2, n2).assign(c11.as_view());
    c.window_mut(0, n2, m2, 2 * n2).assign(c12.as_view());
    c.window_mut(m2, 0, 2 * m2, n2).assign(c21.as_view());
    c.window_mut(m2, n2, 2 * m2, 2 * n2).assign(c22.as_view());

    // odd inner dimension: add the outer product of the last column and the last row
    if k % 2 == 1 {
        let t = mul_classical(a.window(0, k - 1, 2 * m2, k), b.window(k - 1, 0, k, 2 * n2))?;
        let mut w = c.window_mut(0, 0, 2 * m2, 2 * n2);
        for i in 0..2 * m2 {
            for (x, y) in w.row_mut(i).iter_mut().zip(t.row(i)) {
                a.ring().add_assign(x, y);
            }
        }
    }

    if n % 2 == 1 {
        let t = mul_classical(a.window(0, 0, 2 * m2, k), b.window(0, n - 1, k, n))?;
        c.window_mut(0, n - 1, 2 * m2, n).assign(t.as_view());
    }

    if m % 2 == 1 {
        let t = mul_classical(a.window(m - 1, 0, m, k), b)?;
        c.window_mut(m - 1, 0, m, n).assign(t.as_view());
    }

    Ok(c)
}

impl<R: Ring> Matrix<R> {
    /// Multiply two matrices with the multiplication of the ring kind.
    pub fn mul(&self, rhs: &Matrix<R>) -> Result<Matrix<R>, Status> {
        (self.ring.methods().mat_mul())(self.as_view(), rhs.as_view())
    }

    /// Replace `self` by `self * rhs`.
    pub fn mul_assign(&mut self, rhs: &Matrix<R>) -> Result<(), Status> {
        *self = self.mul(rhs)?;
        Ok(())
    }

    pub fn mul_classical(&self, rhs: &Matrix<R>) -> Result<Matrix<R>, Status> {
        mul_classical(self.as_view(), rhs.as_view())
    }

    /// Multiply with the Strassen-Winograd scheme down to the configured cutoff.
    pub fn mul_strassen(&self, rhs: &Matrix<R>) -> Result<Matrix<R>, Status> {
        mul_strassen(
            self.as_view(),
            rhs.as_view(),
            LinalgSettings::get().mul_strassen_cutoff,
        )
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{mul_classical, mul_strassen};
    use crate::domains::{float::FloatField, integer::Z, integer_mod::IntegerMod, rational::Q};
    use crate::status::Status;
    use crate::tensors::matrix::Matrix;

    #[test]
    fn small() {
        let a = Matrix::from_i64(&[1, 2, 3, 4, 5, 6], 2, 3, Z).unwrap();
        let b = Matrix::from_i64(&[1, 0, 0, 1, 2, -1], 3, 2, Z).unwrap();
        assert_eq!(&a * &b, Matrix::from_i64(&[7, -1, 16, -1], 2, 2, Z).unwrap());

        assert_eq!(a.mul(&a).err(), Some(Status::DOMAIN));

        let mut c = a.clone();
        c.mul_assign(&b).unwrap();
        assert_eq!(c, &a * &b);
    }

    #[test]
    fn empty_inner_dimension() {
        let a = Matrix::new(3, 0, Q);
        let b = Matrix::new(0, 2, Q);
        assert_eq!(&a * &b, Matrix::new(3, 2, Q));
        assert_eq!(&b * &Matrix::new(2, 0, Q), Matrix::new(0, 0, Q));
    }

    #[test]
    fn windows() {
        let a = Matrix::from_i64(&(0..16).collect::<Vec<_>>(), 4, 4, Z).unwrap();
        let c = mul_classical(a.window(1, 1, 3, 3), a.window(0, 2, 2, 4)).unwrap();
        assert_eq!(c, Matrix::from_i64(&[46, 57, 78, 97], 2, 2, Z).unwrap());
    }

    #[test]
    fn strassen_matches_classical() {
        let mut rng = StdRng::seed_from_u64(5);

        for (m, k, n) in [(4, 4, 4), (5, 7, 9), (8, 3, 8), (17, 16, 15), (33, 31, 30)] {
            let a = Matrix::randtest(&mut rng, m, k, Z, (-100, 100));
            let b = Matrix::randtest(&mut rng, k, n, Z, (-100, 100));
            let c = a.mul_classical(&b).unwrap();
            assert_eq!(mul_strassen(a.as_view(), b.as_view(), 2).unwrap(), c);
            assert_eq!(mul_strassen(a.as_view(), b.as_view(), 4).unwrap(), c);

            let f = IntegerMod::new(65537);
            let a = Matrix::randtest(&mut rng, m, k, f, (0, 65537));
            let b = Matrix::randtest(&mut rng, k, n, f, (0, 65537));
            assert_eq!(
                mul_strassen(a.as_view(), b.as_view(), 3).unwrap(),
                a.mul_classical(&b).unwrap()
            );
        }
    }

    #[test]
    fn parallel_rows() {
        let mut rng = StdRng::seed_from_u64(8);
        let a = Matrix::randtest(&mut rng, 70, 65, FloatField::new(), (-10, 10));
        let b = Matrix::randtest(&mut rng, 65, 68, FloatField::new(), (-10, 10));

        // the product has 70 * 65 * 68 > 2^18 multiply-adds
        let c = a.mul_classical(&b).unwrap();
        for i in [0, 33, 69] {
            for j in [0, 40, 67] {
                let mut s = 0.;
                for l in 0..65 {
                    s = a[(i, l)].mul_add(b[(l, j)], s);
                }
                assert_eq!(c[(i, j)], s);
            }
        }
    }
}
