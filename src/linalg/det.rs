//! Determinants.

use smallvec::SmallVec;
use tracing::debug;

use crate::domains::Ring;
use crate::linalg::lu::permutation_sign;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView};
use crate::truth::Truth;

/// Compute the determinant, choosing the algorithm from the properties of the ring:
/// cofactor expansion up to `4 x 4`, LU decomposition over finite fields, fraction-free LU
/// over exact integral domains, LU over other fields and Berkowitz otherwise.
pub fn det_generic<R: Ring>(a: MatrixView<'_, R>) -> Result<R::Element, Status> {
    if !a.is_square() {
        return Err(Status::DOMAIN);
    }

    let ring = a.ring();
    let n = a.nrows();
    if n <= 4 {
        return det_cofactor(a);
    }

    if ring.is_finite() == Truth::True && ring.is_field() == Truth::True {
        debug!("Determinant of a {}x{} matrix over {} by LU", n, n, ring);
        det_lu(a)
    } else if ring.is_exact() == Truth::True && ring.is_integral_domain() == Truth::True {
        debug!("Determinant of a {}x{} matrix over {} by FFLU", n, n, ring);
        det_fflu(a)
    } else if ring.is_field() == Truth::True {
        debug!("Determinant of a {}x{} matrix over {} by LU", n, n, ring);
        det_lu(a)
    } else {
        debug!("Determinant of a {}x{} matrix over {} by Berkowitz", n, n, ring);
        det_berkowitz(a)
    }
}

/// Compute the determinant as the signed product of the pivots of an LU decomposition.
pub fn det_lu<R: Ring>(a: MatrixView<'_, R>) -> Result<R::Element, Status> {
    if !a.is_square() {
        return Err(Status::DOMAIN);
    }

    let ring = a.ring();
    let n = a.nrows();
    if n == 0 {
        return Ok(ring.one());
    }

    let mut lu = a.to_matrix();
    let mut perm = vec![0; n];
    let rank = (ring.methods().lu())(&mut lu.as_view_mut(), &mut perm, true)?;
    if rank == 0 {
        return Ok(ring.zero());
    }

    let mut det = permutation_sign(ring, &perm);
    for i in 0..n {
        ring.mul_assign(&mut det, &lu[(i, i)]);
    }
    Ok(det)
}

/// Compute the determinant as the signed last pivot of a fraction-free LU decomposition.
pub fn det_fflu<R: Ring>(a: MatrixView<'_, R>) -> Result<R::Element, Status> {
    if !a.is_square() {
        return Err(Status::DOMAIN);
    }

    let ring = a.ring();
    let n = a.nrows();
    if n == 0 {
        return Ok(ring.one());
    }

    let mut lu = a.to_matrix();
    let mut perm = vec![0; n];
    let (rank, den) = (ring.methods().fflu())(&mut lu.as_view_mut(), &mut perm, true)?;
    if rank == 0 {
        return Ok(ring.zero());
    }

    Ok(ring.mul(&permutation_sign(ring, &perm), &den))
}

/// Compute the determinant from the constant coefficient of the characteristic polynomial.
/// This works over any commutative ring.
pub fn det_berkowitz<R: Ring>(a: MatrixView<'_, R>) -> Result<R::Element, Status> {
    if !a.is_square() {
        return Err(Status::DOMAIN);
    }

    let ring = a.ring();
    let mut cp = (ring.methods().charpoly())(a)?;
    let c0 = cp.swap_remove(0);
    if a.nrows() % 2 == 1 {
        Ok(ring.neg(&c0))
    } else {
        Ok(c0)
    }
}

/// Compute the determinant of a matrix of at most `4 x 4` by cofactor expansion.
/// Larger matrices give [Status::UNABLE].
pub fn det_cofactor<R: Ring>(a: MatrixView<'_, R>) -> Result<R::Element, Status> {
    if !a.is_square() {
        return Err(Status::DOMAIN);
    }

    let ring = a.ring();
    match a.nrows() {
        0 => Ok(ring.one()),
        1 => Ok(a[(0, 0)].clone()),
        2 => Ok(det2(ring, a, 0, 1, 0, 1)),
        3 => {
            let mut det = ring.mul(&a[(0, 0)], &det2(ring, a, 1, 2, 1, 2));
            ring.sub_mul_assign(&mut det, &a[(0, 1)], &det2(ring, a, 1, 2, 0, 2));
            ring.add_mul_assign(&mut det, &a[(0, 2)], &det2(ring, a, 1, 2, 0, 1));
            Ok(det)
        }
        4 => {
            // the 2x2 minors of the last two rows, for the column pairs
            // (0,1), (0,2), (0,3), (1,2), (1,3) and (2,3)
            const PAIRS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
            // expansion of the minor of column c along row 1: (column, index in PAIRS)
            const COFACTORS: [[(usize, usize); 3]; 4] = [
                [(1, 5), (2, 4), (3, 3)],
                [(0, 5), (2, 2), (3, 1)],
                [(0, 4), (1, 2), (3, 0)],
                [(0, 3), (1, 1), (2, 0)],
            ];

            let minors: SmallVec<[R::Element; 6]> = PAIRS
                .iter()
                .map(|&(j, k)| det2(ring, a, 2, 3, j, k))
                .collect();

            let mut det = ring.zero();
            for (c, [(p, mp), (q, mq), (r, mr)]) in COFACTORS.iter().copied().enumerate() {
                let mut m = ring.mul(&a[(1, p)], &minors[mp]);
                ring.sub_mul_assign(&mut m, &a[(1, q)], &minors[mq]);
                ring.add_mul_assign(&mut m, &a[(1, r)], &minors[mr]);

                if c % 2 == 0 {
                    ring.add_mul_assign(&mut det, &a[(0, c)], &m);
                } else {
                    ring.sub_mul_assign(&mut det, &a[(0, c)], &m);
                }
            }
            Ok(det)
        }
        _ => Err(Status::UNABLE),
    }
}

/// The minor of the rows `i0, i1` and columns `j0, j1`.
#[inline]
fn det2<R: Ring>(
    ring: &R,
    a: MatrixView<'_, R>,
    i0: usize,
    i1: usize,
    j0: usize,
    j1: usize,
) -> R::Element {
    let mut d = ring.mul(&a[(i0, j0)], &a[(i1, j1)]);
    ring.sub_mul_assign(&mut d, &a[(i0, j1)], &a[(i1, j0)]);
    d
}

impl<R: Ring> Matrix<R> {
    /// Compute the determinant of the matrix.
    pub fn det(&self) -> Result<R::Element, Status> {
        (self.ring.methods().det())(self.as_view())
    }

    pub fn det_lu(&self) -> Result<R::Element, Status> {
        det_lu(self.as_view())
    }

    pub fn det_fflu(&self) -> Result<R::Element, Status> {
        det_fflu(self.as_view())
    }

    pub fn det_berkowitz(&self) -> Result<R::Element, Status> {
        det_berkowitz(self.as_view())
    }

    pub fn det_cofactor(&self) -> Result<R::Element, Status> {
        det_cofactor(self.as_view())
    }
}
