//! LU decomposition with row pivoting.
//!
//! All variants work in place on a mutable window and write the row permutation into
//! `perm`, where `perm[i]` is the original row that ended up at row `i`. The result is stored
//! compactly: rows `0..rank` hold `U` (entries at columns `>= i`), and the strictly lower part of
//! columns `0..rank` holds the multipliers of `L`, whose unit diagonal is implicit.
//!
//! If `rank_check` is set, the decomposition stops with rank 0 as soon as a column
//! without a pivot is found. This is used for solving nonsingular systems.

use tracing::{debug, instrument};

use crate::dispatch::LuFn;
use crate::domains::Ring;
use crate::generic;
use crate::settings::LinalgSettings;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixViewMut};
use crate::truth::Truth;

/// Gaussian elimination, pivoting with the ring's pivot search.
///
/// A column without a provable pivot is skipped (or ends the decomposition with rank 0 if
/// `rank_check` is set). An undecided pivot search or a pivot that cannot be inverted aborts.
/// Outside fields a non-invertible pivot gives [Status::UNABLE], as the matrix may still be
/// nonsingular.
#[instrument(level = "trace", skip_all, fields(m = a.nrows(), n = a.ncols(), rank_check))]
pub fn lu_classical<R: Ring>(
    a: &mut MatrixViewMut<'_, R>,
    perm: &mut [usize],
    rank_check: bool,
) -> Result<usize, Status> {
    let (m, n) = (a.nrows(), a.ncols());
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let ring = a.ring().clone();
    let find_pivot = ring.methods().find_pivot();

    let mut rank = 0;
    let mut row = 0;
    let mut col = 0;
    while row < m && col < n {
        let r = match find_pivot(a.as_view(), row, m, col) {
            Ok(r) => r,
            Err(s) if s == Status::DOMAIN => {
                if rank_check {
                    return Ok(0);
                }
                col += 1;
                continue;
            }
            Err(s) => return Err(s),
        };

        if r != row {
            a.swap_rows(r, row);
            perm.swap(r, row);
        }

        // a nonzero pivot that is not a unit does not make the matrix singular
        let d = match ring.inv(&a[(row, col)]) {
            Ok(d) => d,
            Err(s) if s == Status::DOMAIN && ring.is_field() != Truth::True => {
                return Err(Status::UNABLE)
            }
            Err(s) => return Err(s),
        };

        for j in row + 1..m {
            let (dst, src) = a.row_pair(j, row);
            let e = ring.mul(&dst[col], &d);
            generic::vec_submul_scalar(&ring, &mut dst[col + 1..], &src[col + 1..], &e);
            dst[col] = ring.zero();
            dst[rank] = e;
        }

        rank += 1;
        row += 1;
        col += 1;
    }

    Ok(rank)
}

/// Block recursive LU decomposition. The columns are split in half, the left half
/// is factored recursively, and the Schur complement of the right half is factored next.
#[instrument(level = "trace", skip_all, fields(m = a.nrows(), n = a.ncols(), rank_check))]
pub fn lu_recursive<R: Ring>(
    a: &mut MatrixViewMut<'_, R>,
    perm: &mut [usize],
    rank_check: bool,
) -> Result<usize, Status> {
    let (m, n) = (a.nrows(), a.ncols());
    if m <= 1 || n <= 1 {
        return lu_classical(a, perm, rank_check);
    }

    let methods = a.ring().methods();
    let n1 = n / 2;

    let mut p1 = vec![0; m];
    let r1 = (methods.lu())(&mut a.window_mut(0, 0, m, n1), &mut p1, rank_check)?;
    if rank_check && r1 < n1 {
        return Ok(0);
    }

    a.window_mut(0, n1, m, n).permute_rows(&p1);
    perm.copy_from_slice(&p1);

    debug!("Recursive LU: {}x{} split at column {}, rank {}", m, n, n1, r1);

    if r1 > 0 {
        // A01 <- L00^-1 A01
        let a01 = (methods.solve_tril())(a.window(0, 0, r1, r1), a.window(0, n1, r1, n), true)?;
        a.window_mut(0, n1, r1, n).assign(a01.as_view());

        // A11 <- A11 - A10 A01
        let t = (methods.mat_mul())(a.window(r1, 0, m, r1), a.window(0, n1, r1, n))?;
        a.window_mut(r1, n1, m, n).sub_assign(t.as_view());
    }

    let mut p2 = vec![0; m - r1];
    let r2 = (methods.lu())(&mut a.window_mut(r1, n1, m, n), &mut p2, rank_check)?;
    if rank_check && r1 + r2 < m.min(n) {
        return Ok(0);
    }

    a.window_mut(r1, 0, m, n1).permute_rows(&p2);
    let tail: Vec<usize> = p2.iter().map(|i| perm[r1 + i]).collect();
    perm[r1..].copy_from_slice(&tail);

    // move the multipliers of the second factorization next to those of the first
    if r1 != n1 {
        let zero = a.ring().zero();
        for i in 0..m - r1 {
            let row = a.row_mut(r1 + i);
            for j in 0..i.min(r2) {
                row[r1 + j] = std::mem::replace(&mut row[n1 + j], zero.clone());
            }
        }
    }

    Ok(r1 + r2)
}

/// The default LU: classical for small matrices and recursive otherwise.
pub fn lu_generic<R: Ring>(
    a: &mut MatrixViewMut<'_, R>,
    perm: &mut [usize],
    rank_check: bool,
) -> Result<usize, Status> {
    if a.nrows().min(a.ncols()) < LinalgSettings::get().lu_recursive_cutoff {
        lu_classical(a, perm, rank_check)
    } else {
        lu_recursive(a, perm, rank_check)
    }
}

/// The result of an LU decomposition `P A = L U`.
#[derive(Clone, Debug)]
pub struct LuDecomposition<R: Ring> {
    pub rank: usize,
    /// Row `i` of `P A` is row `permutation[i]` of `A`.
    pub permutation: Vec<usize>,
    /// The compact representation of `L` and `U`.
    pub lu: Matrix<R>,
}

impl<R: Ring> LuDecomposition<R> {
    /// The `m x rank` lower triangular factor with unit diagonal.
    pub fn l(&self) -> Matrix<R> {
        let ring = self.lu.ring();
        let mut l = Matrix::new(self.lu.nrows(), self.rank, ring.clone());
        for i in 0..self.lu.nrows() {
            for j in 0..i.min(self.rank) {
                l[(i, j)] = self.lu[(i, j)].clone();
            }
            if i < self.rank {
                l[(i, i)] = ring.one();
            }
        }
        l
    }

    /// The `rank x n` upper triangular factor.
    pub fn u(&self) -> Matrix<R> {
        let mut u = Matrix::new(self.rank, self.lu.ncols(), self.lu.ring().clone());
        for i in 0..self.rank {
            for j in i..self.lu.ncols() {
                u[(i, j)] = self.lu[(i, j)].clone();
            }
        }
        u
    }

    /// The sign of the row permutation, as `1` or `-1` in the ring.
    pub fn permutation_sign(&self) -> R::Element {
        permutation_sign(self.lu.ring(), &self.permutation)
    }
}

/// The sign of a permutation, computed from its cycle decomposition.
pub(crate) fn permutation_sign<R: Ring>(ring: &R, perm: &[usize]) -> R::Element {
    let mut seen = vec![false; perm.len()];
    let mut odd = false;
    for i in 0..perm.len() {
        if seen[i] {
            continue;
        }
        let mut j = i;
        let mut len = 0;
        while !seen[j] {
            seen[j] = true;
            j = perm[j];
            len += 1;
        }
        if len % 2 == 0 {
            odd = !odd;
        }
    }

    if odd {
        ring.neg(&ring.one())
    } else {
        ring.one()
    }
}

impl<R: Ring> Matrix<R> {
    /// Compute the LU decomposition `P A = L U` of the matrix, with the ring's LU method.
    pub fn lu(&self) -> Result<LuDecomposition<R>, Status> {
        self.lu_with(self.ring.methods().lu())
    }

    pub fn lu_classical(&self) -> Result<LuDecomposition<R>, Status> {
        self.lu_with(lu_classical)
    }

    pub fn lu_recursive(&self) -> Result<LuDecomposition<R>, Status> {
        self.lu_with(lu_recursive)
    }

    fn lu_with(&self, f: LuFn<R>) -> Result<LuDecomposition<R>, Status> {
        let mut lu = self.clone();
        let mut permutation = vec![0; self.nrows];
        let rank = f(&mut lu.as_view_mut(), &mut permutation, false)?;
        Ok(LuDecomposition {
            rank,
            permutation,
            lu,
        })
    }

    /// Factor the matrix in place, returning the rank.
    pub fn lu_in_place(&mut self, perm: &mut [usize], rank_check: bool) -> Result<usize, Status> {
        assert_eq!(perm.len(), self.nrows, "Permutation has the wrong length");
        let f = self.ring.methods().lu();
        f(&mut self.as_view_mut(), perm, rank_check)
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{lu_classical, lu_recursive};
    use crate::domains::{integer_mod::IntegerMod, rational::Q, Ring};
    use crate::status::Status;
    use crate::tensors::matrix::Matrix;
    use crate::truth::Truth;

    fn check_reconstruction<R: Ring>(a: &Matrix<R>, lu: &super::LuDecomposition<R>) {
        let mut pa = a.clone();
        pa.permute_rows(&lu.permutation);
        let prod = &lu.l() * &lu.u();
        assert_eq!(prod.equal(&pa), Truth::True, "{} != {}", prod, pa);
    }

    #[test]
    fn small_rational() {
        let a = Matrix::from_i64(&[0, 2, 1, 1, 1, 1, 2, 4, 5], 3, 3, Q).unwrap();
        let lu = a.lu_classical().unwrap();
        assert_eq!(lu.rank, 3);
        assert_eq!(lu.permutation, [1, 0, 2]);
        check_reconstruction(&a, &lu);
    }

    #[test]
    fn empty_and_zero() {
        let a = Matrix::new(0, 0, Q);
        let lu = a.lu().unwrap();
        assert_eq!(lu.rank, 0);
        assert!(lu.permutation.is_empty());

        let z = Matrix::new(3, 2, Q);
        let lu = z.lu().unwrap();
        assert_eq!(lu.rank, 0);
        check_reconstruction(&z, &lu);
    }

    #[test]
    fn rank_check() {
        let mut a = Matrix::from_i64(&[1, 2, 3, 2, 4, 6, 1, 0, 1], 3, 3, Q).unwrap();
        let b = a.clone();

        let mut perm = vec![0; 3];
        assert_eq!(a.lu_in_place(&mut perm, true), Ok(0));

        let lu = b.lu().unwrap();
        assert_eq!(lu.rank, 2);
        check_reconstruction(&b, &lu);
    }

    #[test]
    fn non_unit_pivot() {
        // the determinant is 1, so a pivot that cannot be inverted proves nothing
        let a = Matrix::from_i64(&[2, 1, 1, 1], 2, 2, IntegerMod::new(4)).unwrap();
        assert_eq!(a.lu_classical().err(), Some(Status::UNABLE));
        assert_eq!(a.lu_recursive().err(), Some(Status::UNABLE));

        let a = Matrix::from_i64(&[2, 1, 1, 0], 2, 2, IntegerMod::new(12)).unwrap();
        assert_eq!(a.det(), Ok(11));
        assert_eq!(a.inv().err(), Some(Status::UNABLE));
        let b = Matrix::from_i64(&[1, 1], 2, 1, IntegerMod::new(12)).unwrap();
        assert_eq!(a.nonsingular_solve(&b).err(), Some(Status::UNABLE));

        // unit pivots followed by a zero column do prove singularity
        let s = Matrix::from_i64(&[1, 2, 2, 4], 2, 2, IntegerMod::new(12)).unwrap();
        assert_eq!(s.inv().err(), Some(Status::DOMAIN));
    }

    #[test]
    fn classical_and_recursive_agree() {
        let mut rng = StdRng::seed_from_u64(11);
        let f = IntegerMod::new(17);

        for (m, n, r) in [(8, 8, 8), (8, 8, 5), (9, 12, 4), (12, 7, 6), (10, 10, 0), (16, 9, 3)] {
            let a = Matrix::randrank(&mut rng, m, n, r, f, (0, 17));

            let c = a.lu_classical().unwrap();
            let rec = a.lu_recursive().unwrap();
            assert_eq!(c.rank, r);
            assert_eq!(rec.rank, r);
            check_reconstruction(&a, &c);
            check_reconstruction(&a, &rec);

            let d = a.lu().unwrap();
            check_reconstruction(&a, &d);
        }
    }

    #[test]
    fn window_factorization() {
        let mut a = Matrix::from_i64(&(0..30).map(|x| (x * x) % 7).collect::<Vec<_>>(), 5, 6, Q)
            .unwrap();
        let orig = a.window(1, 1, 5, 5).to_matrix();

        let mut perm = vec![0; 4];
        let rank = lu_recursive(&mut a.window_mut(1, 1, 5, 5), &mut perm, false).unwrap();
        let lu = super::LuDecomposition {
            rank,
            permutation: perm,
            lu: a.window(1, 1, 5, 5).to_matrix(),
        };
        check_reconstruction(&orig, &lu);

        // entries outside the window are untouched
        assert_eq!(a[(0, 3)], (9 % 7));
        assert_eq!(a[(4, 5)], (29 * 29) % 7);

        let mut b = orig.clone();
        let mut perm = vec![0; 4];
        assert_eq!(
            lu_classical(&mut b.as_view_mut(), &mut perm, false),
            Ok(rank)
        );
    }
}
