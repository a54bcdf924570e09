//! Random matrices for testing.

use rand::{Rng, RngCore};

use crate::domains::Ring;
use crate::tensors::matrix::Matrix;
use crate::truth::Truth;

impl<R: Ring> Matrix<R> {
    /// Create a matrix with entries sampled from the ring with coefficients in `range`.
    pub fn randtest(
        rng: &mut impl RngCore,
        nrows: usize,
        ncols: usize,
        ring: R,
        range: (i64, i64),
    ) -> Matrix<R> {
        let data = (0..nrows * ncols).map(|_| ring.sample(rng, range)).collect();
        Matrix {
            data,
            rows: (0..nrows).map(|i| i * ncols).collect(),
            nrows,
            ncols,
            ring,
        }
    }

    /// Apply `count` random elementary operations, each adding or subtracting one row
    /// (or column) to another. These operations preserve the rank and the determinant.
    pub fn randops(&mut self, rng: &mut impl RngCore, count: usize) {
        let (m, n) = (self.nrows, self.ncols);
        if m < 2 && n < 2 {
            return;
        }

        let ring = self.ring.clone();
        for _ in 0..count {
            let subtract = rng.gen_bool(0.5);
            let use_rows = n < 2 || (m >= 2 && rng.gen_bool(0.5));
            let len = if use_rows { m } else { n };

            let i = rng.gen_range(0..len);
            let mut j = rng.gen_range(0..len - 1);
            if j >= i {
                j += 1;
            }

            if use_rows {
                let mut view = self.as_view_mut();
                let (dst, src) = view.row_pair(i, j);
                for (d, s) in dst.iter_mut().zip(src) {
                    if subtract {
                        ring.sub_assign(d, s);
                    } else {
                        ring.add_assign(d, s);
                    }
                }
            } else {
                for r in 0..m {
                    let s = self[(r, j)].clone();
                    let d = &mut self[(r, i)];
                    if subtract {
                        ring.sub_assign(d, &s);
                    } else {
                        ring.add_assign(d, &s);
                    }
                }
            }
        }
    }

    /// Create a random matrix of the given rank, by scrambling a diagonal matrix of
    /// random nonzero entries with [Matrix::randops]. The rank is exact over integral domains.
    pub fn randrank(
        rng: &mut impl RngCore,
        nrows: usize,
        ncols: usize,
        rank: usize,
        ring: R,
        range: (i64, i64),
    ) -> Matrix<R> {
        assert!(
            rank <= nrows.min(ncols),
            "Rank {} is too large for a {}x{} matrix",
            rank,
            nrows,
            ncols
        );

        let mut a = Matrix::new(nrows, ncols, ring.clone());
        for i in 0..rank {
            let mut e = ring.one();
            for _ in 0..16 {
                let s = ring.sample(rng, range);
                if ring.is_zero(&s) == Truth::False {
                    e = s;
                    break;
                }
            }
            a[(i, i)] = e;
        }

        a.randops(rng, 2 * (nrows + ncols) + nrows * ncols / 2);
        a
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};
    use rug::Integer;

    use crate::domains::{integer::Z, rational::Q};
    use crate::tensors::matrix::Matrix;

    #[test]
    fn shapes_and_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = Matrix::randtest(&mut rng, 4, 7, Z, (-3, 3));
        assert_eq!((a.nrows(), a.ncols()), (4, 7));
        assert!(a.row_iter().flatten().all(|e| *e >= -3 && *e < 3));

        let e = Matrix::randtest(&mut rng, 0, 3, Q, (0, 1));
        assert!(e.is_empty());
    }

    #[test]
    fn operations_preserve_determinant() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut a = Matrix::from_i64(&[3, 1, 0, 2, 5, 1, 1, 0, 4], 3, 3, Z).unwrap();
        let det = a.det().unwrap();
        a.randops(&mut rng, 50);
        assert_eq!(a.det().unwrap(), det);

        let mut v = Matrix::from_i64(&[7], 1, 1, Z).unwrap();
        v.randops(&mut rng, 10);
        assert_eq!(v[(0, 0)], Integer::from(7));

        let mut row = Matrix::from_i64(&[1, 2, 3], 1, 3, Z).unwrap();
        row.randops(&mut rng, 10);
        assert_eq!(row.rank(), Ok(1));
    }

    #[test]
    fn given_rank() {
        let mut rng = StdRng::seed_from_u64(6);
        for r in 0..=4 {
            let a = Matrix::randrank(&mut rng, 4, 6, r, Q, (-5, 5));
            assert_eq!(a.rank(), Ok(r));
        }
    }
}
