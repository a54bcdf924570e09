//! Fraction-free LU decomposition (Bareiss elimination).
//!
//! Every division is exact: after a step with pivot `p`, each entry of the remaining submatrix
//! is divided by the previous pivot. The entries stay in the ring, which makes this the
//! elimination of choice for integral domains that are not fields, such as the integers.

use tracing::instrument;

use crate::domains::Ring;
use crate::linalg::lu::permutation_sign;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView, MatrixViewMut};
use crate::truth::Truth;

/// Compute the fraction-free LU decomposition of `a` in place and return the rank and the
/// denominator, which is the last pivot.
///
/// The empty matrix has rank 0 and denominator 1. With `rank_check`, a column without a
/// pivot gives rank 0 and denominator 0. Requires a ring that is provably an integral domain.
#[instrument(level = "trace", skip_all, fields(m = a.nrows(), n = a.ncols(), rank_check))]
pub fn fflu<R: Ring>(
    a: &mut MatrixViewMut<'_, R>,
    perm: &mut [usize],
    rank_check: bool,
) -> Result<(usize, R::Element), Status> {
    let (m, n) = (a.nrows(), a.ncols());
    let ring = a.ring().clone();

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    if ring.is_integral_domain() != Truth::True {
        return Err(Status::UNABLE);
    }

    if m == 0 || n == 0 {
        return Ok((0, ring.one()));
    }

    let find_pivot = ring.methods().find_pivot();

    let mut den = ring.one();
    let mut rank = 0;
    let mut row = 0;
    let mut col = 0;
    while row < m && col < n {
        let r = match find_pivot(a.as_view(), row, m, col) {
            Ok(r) => r,
            Err(s) if s == Status::DOMAIN => {
                if rank_check {
                    return Ok((0, ring.zero()));
                }
                col += 1;
                continue;
            }
            Err(s) => return Err(s),
        };

        rank += 1;
        if r != row {
            a.swap_rows(r, row);
            perm.swap(r, row);
        }

        for j in row + 1..m {
            let (dst, src) = a.row_pair(j, row);
            for k in col + 1..n {
                let mut t = ring.mul(&dst[k], &src[col]);
                ring.sub_mul_assign(&mut t, &dst[col], &src[k]);
                dst[k] = if row > 0 { ring.div_exact(&t, &den)? } else { t };
            }
        }

        den = a[(row, col)].clone();
        row += 1;
        col += 1;
    }

    Ok((rank, den))
}

/// Solve `A X = den B` given the fraction-free decomposition of a nonsingular `A`,
/// where `den` is the denominator returned by [fflu].
pub fn fflu_solve<R: Ring>(
    perm: &[usize],
    lu: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
) -> Result<Matrix<R>, Status> {
    let n = lu.nrows();
    let ring = lu.ring();

    let mut x = b.to_matrix();
    x.permute_rows(perm);
    if n == 0 {
        return Ok(x);
    }

    for k in 0..x.ncols() {
        // forward elimination
        for i in 0..n - 1 {
            for j in i + 1..n {
                let mut t = ring.mul(&x[(j, k)], &lu[(i, i)]);
                ring.sub_mul_assign(&mut t, &lu[(j, i)], &x[(i, k)]);
                x[(j, k)] = if i > 0 {
                    ring.div_exact(&t, &lu[(i - 1, i - 1)])?
                } else {
                    t
                };
            }
        }

        // back substitution
        let last = &lu[(n - 1, n - 1)];
        for i in (0..n - 1).rev() {
            let mut t = ring.mul(&x[(i, k)], last);
            for j in i + 1..n {
                ring.sub_mul_assign(&mut t, &x[(j, k)], &lu[(i, j)]);
            }
            x[(i, k)] = ring.div_exact(&t, &lu[(i, i)])?;
        }
    }

    Ok(x)
}

/// The result of a fraction-free LU decomposition.
#[derive(Clone, Debug)]
pub struct FfluDecomposition<R: Ring> {
    pub rank: usize,
    pub permutation: Vec<usize>,
    pub lu: Matrix<R>,
    /// The last pivot. For a nonsingular matrix this is the determinant up to the sign of
    /// the permutation.
    pub den: R::Element,
}

impl<R: Ring> FfluDecomposition<R> {
    /// The sign of the row permutation, as `1` or `-1` in the ring.
    pub fn permutation_sign(&self) -> R::Element {
        permutation_sign(self.lu.ring(), &self.permutation)
    }
}

impl<R: Ring> Matrix<R> {
    /// Compute the fraction-free LU decomposition of the matrix.
    pub fn fflu(&self) -> Result<FfluDecomposition<R>, Status> {
        let mut lu = self.clone();
        let mut permutation = vec![0; self.nrows];
        let (rank, den) =
            (self.ring.methods().fflu())(&mut lu.as_view_mut(), &mut permutation, false)?;
        Ok(FfluDecomposition {
            rank,
            permutation,
            lu,
            den,
        })
    }
}
