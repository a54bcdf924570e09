//! Reduced row echelon forms.
//!
//! Both algorithms factor the matrix first, then bring the nonzero rows of the upper
//! triangular factor `U` into the form `[I | X]` (up to a column permutation) by solving
//! `U_p X = U_f`, where `U_p` holds the pivot columns and `U_f` the free columns.

use tracing::debug;

use crate::domains::Ring;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView};
use crate::truth::Truth;

/// Find the pivot columns of the first `rank` rows of a compact LU or FFLU factorization.
///
/// The pivot of row `i` is the first entry after the pivot of row `i - 1` that is not
/// provably zero. Entries to the left of it belong to `L` or are zero.
fn pivot_columns<R: Ring>(lu: &Matrix<R>, rank: usize) -> Vec<usize> {
    let ring = lu.ring();
    let mut pivots = Vec::with_capacity(rank);
    let mut start = 0;
    for i in 0..rank {
        let mut j = start.max(i);
        while j + 1 < lu.ncols() && ring.is_zero(&lu[(i, j)]) == Truth::True {
            j += 1;
        }
        pivots.push(j);
        start = j + 1;
    }
    pivots
}

/// Split the first `rank` rows of `lu` into the square upper triangular matrix of
/// the pivot columns and the matrix of the free columns.
fn split_pivots<R: Ring>(
    lu: &Matrix<R>,
    rank: usize,
    pivots: &[usize],
) -> (Matrix<R>, Matrix<R>, Vec<usize>) {
    let ring = lu.ring();
    let n = lu.ncols();
    let free: Vec<usize> = (0..n).filter(|j| !pivots.contains(j)).collect();

    let mut u = Matrix::new(rank, rank, ring.clone());
    let mut v = Matrix::new(rank, free.len(), ring.clone());
    for i in 0..rank {
        for (k, &p) in pivots.iter().enumerate().skip(i) {
            u[(i, k)] = lu[(i, p)].clone();
        }
        for (k, &f) in free.iter().enumerate() {
            if f > pivots[i] {
                v[(i, k)] = lu[(i, f)].clone();
            }
        }
    }

    (u, v, free)
}

/// Assemble the echelon form with `diag` on the pivots and `x` in the free columns.
fn assemble<R: Ring>(
    a: MatrixView<'_, R>,
    rank: usize,
    pivots: &[usize],
    free: &[usize],
    x: &Matrix<R>,
    diag: &R::Element,
) -> Matrix<R> {
    let mut r = Matrix::new(a.nrows(), a.ncols(), a.ring().clone());
    for i in 0..rank {
        r[(i, pivots[i])] = diag.clone();
        for (k, &f) in free.iter().enumerate() {
            r[(i, f)] = x[(i, k)].clone();
        }
    }
    r
}

/// Compute the reduced row echelon form by LU decomposition. Requires that the pivots
/// can be inverted, so it is meant for fields.
pub fn rref_lu<R: Ring>(a: MatrixView<'_, R>) -> Result<(usize, Matrix<R>), Status> {
    let ring = a.ring();
    if a.is_empty() {
        return Ok((0, a.to_matrix()));
    }

    let mut lu = a.to_matrix();
    let mut perm = vec![0; a.nrows()];
    let rank = (ring.methods().lu())(&mut lu.as_view_mut(), &mut perm, false)?;
    if rank == 0 {
        return Ok((0, Matrix::new(a.nrows(), a.ncols(), ring.clone())));
    }

    let pivots = pivot_columns(&lu, rank);
    let (u, v, free) = split_pivots(&lu, rank, &pivots);
    let x = (ring.methods().solve_triu())(u.as_view(), v.as_view(), false)?;

    Ok((rank, assemble(a, rank, &pivots, &free, &x, &ring.one())))
}

/// Compute the reduced row echelon form up to a common denominator with fraction-free
/// elimination. The result `(rank, R, den)` satisfies that `R / den` is the reduced row
/// echelon form.
pub fn rref_den_fflu<R: Ring>(
    a: MatrixView<'_, R>,
) -> Result<(usize, Matrix<R>, R::Element), Status> {
    let ring = a.ring();
    if a.is_empty() {
        return Ok((0, a.to_matrix(), ring.one()));
    }

    let mut lu = a.to_matrix();
    let mut perm = vec![0; a.nrows()];
    let (rank, den) = (ring.methods().fflu())(&mut lu.as_view_mut(), &mut perm, false)?;
    if rank == 0 {
        return Ok((
            0,
            Matrix::new(a.nrows(), a.ncols(), ring.clone()),
            ring.one(),
        ));
    }

    let pivots = pivot_columns(&lu, rank);
    let (u, v, free) = split_pivots(&lu, rank, &pivots);

    // fraction-free back substitution of U X = den V
    let mut x = Matrix::new(rank, free.len(), ring.clone());
    for k in 0..free.len() {
        for i in (0..rank).rev() {
            let mut t = ring.mul(&den, &v[(i, k)]);
            for j in i + 1..rank {
                ring.sub_mul_assign(&mut t, &u[(i, j)], &x[(j, k)]);
            }
            x[(i, k)] = ring.div_exact(&t, &u[(i, i)])?;
        }
    }

    Ok((rank, assemble(a, rank, &pivots, &free, &x, &den), den))
}

/// Compute the reduced row echelon form with LU decomposition over fields and with
/// fraction-free elimination over other integral domains. In the latter case, the
/// final division by the denominator fails with [Status::DOMAIN] if the echelon form
/// does not lie in the ring.
pub fn rref_generic<R: Ring>(a: MatrixView<'_, R>) -> Result<(usize, Matrix<R>), Status> {
    let ring = a.ring();
    if ring.is_field() == Truth::True {
        debug!("Reduced row echelon form over {} by LU", ring);
        return rref_lu(a);
    }

    match ring.is_integral_domain() {
        Truth::True => {
            debug!("Reduced row echelon form over {} by FFLU", ring);
            let (rank, r, den) = rref_den_fflu(a)?;
            Ok((rank, r.div_scalar(&den)?))
        }
        Truth::False => Err(Status::DOMAIN),
        Truth::Unknown => Err(Status::UNABLE),
    }
}

impl<R: Ring> Matrix<R> {
    /// Compute the rank and the reduced row echelon form of the matrix.
    pub fn rref(&self) -> Result<(usize, Matrix<R>), Status> {
        (self.ring.methods().rref())(self.as_view())
    }

    pub fn rref_lu(&self) -> Result<(usize, Matrix<R>), Status> {
        rref_lu(self.as_view())
    }

    /// Compute the rank, the reduced row echelon form multiplied by a denominator, and the
    /// denominator.
    pub fn rref_den(&self) -> Result<(usize, Matrix<R>, R::Element), Status> {
        rref_den_fflu(self.as_view())
    }
}
