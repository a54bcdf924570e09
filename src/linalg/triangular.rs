//! Triangular solves `L X = B` and `U X = B` for square `L` and `U`.
//!
//! Only the relevant triangle of the system matrix is read, so the compact output of an
//! LU decomposition can be passed directly. With `unit` set, the diagonal is taken to be
//! one and is not read either.

use tracing::{debug, instrument};

use crate::domains::Ring;
use crate::settings::LinalgSettings;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView};

fn check_shape<R: Ring>(a: MatrixView<'_, R>, b: MatrixView<'_, R>) -> Result<(), Status> {
    if !a.is_square() || a.nrows() != b.nrows() {
        return Err(Status::DOMAIN);
    }
    Ok(())
}

/// Invert the diagonal of `a`, or return `None` if one of the inverses does not exist
/// or cannot be computed.
fn diagonal_inverses<R: Ring>(a: MatrixView<'_, R>) -> Option<Vec<R::Element>> {
    let ring = a.ring();
    (0..a.nrows()).map(|i| ring.inv(&a[(i, i)]).ok()).collect()
}

/// Divide `s` by the diagonal entry `i`, using a precomputed inverse if there is one.
#[inline]
fn scale_by_diagonal<R: Ring>(
    a: MatrixView<'_, R>,
    inverses: &Option<Vec<R::Element>>,
    i: usize,
    s: R::Element,
) -> Result<R::Element, Status> {
    match inverses {
        Some(inv) => Ok(a.ring().mul(&s, &inv[i])),
        None => a.ring().div(&s, &a[(i, i)]),
    }
}

/// Forward substitution.
#[instrument(level = "trace", skip_all, fields(n = l.nrows(), m = b.ncols(), unit))]
pub fn solve_tril_classical<R: Ring>(
    l: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
    unit: bool,
) -> Result<Matrix<R>, Status> {
    check_shape(l, b)?;
    let (n, m) = (b.nrows(), b.ncols());
    let ring = l.ring();

    let inverses = if unit { None } else { diagonal_inverses(l) };

    let mut x = Matrix::new(n, m, ring.clone());
    let mut col = Vec::with_capacity(n);
    for k in 0..m {
        col.clear();
        for i in 0..n {
            let s = ring.dot(Some(&b[(i, k)]), true, &l.row(i)[..i], &col[..i]);
            let s = if unit {
                s
            } else {
                scale_by_diagonal(l, &inverses, i, s)?
            };
            col.push(s);
        }

        for (i, e) in col.drain(..).enumerate() {
            x[(i, k)] = e;
        }
    }

    Ok(x)
}

/// Back substitution.
#[instrument(level = "trace", skip_all, fields(n = u.nrows(), m = b.ncols(), unit))]
pub fn solve_triu_classical<R: Ring>(
    u: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
    unit: bool,
) -> Result<Matrix<R>, Status> {
    check_shape(u, b)?;
    let (n, m) = (b.nrows(), b.ncols());
    let ring = u.ring();

    let inverses = if unit { None } else { diagonal_inverses(u) };

    let mut x = Matrix::new(n, m, ring.clone());
    let mut col = vec![ring.zero(); n];
    for k in 0..m {
        for i in (0..n).rev() {
            let s = ring.dot(Some(&b[(i, k)]), true, &u.row(i)[i + 1..], &col[i + 1..]);
            col[i] = if unit {
                s
            } else {
                scale_by_diagonal(u, &inverses, i, s)?
            };
        }

        for (i, e) in col.iter().enumerate() {
            x[(i, k)] = e.clone();
        }
    }

    Ok(x)
}

/// Split `L = [A 0; C D]` and solve `A X0 = B0` followed by `D X1 = B1 - C X0`.
pub fn solve_tril_recursive<R: Ring>(
    l: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
    unit: bool,
) -> Result<Matrix<R>, Status> {
    check_shape(l, b)?;
    let (n, m) = (b.nrows(), b.ncols());
    if n <= 1 {
        return solve_tril_classical(l, b, unit);
    }

    let methods = l.ring().methods();
    let r = n / 2;
    debug!("Recursive lower triangular solve: {}x{} split at row {}", n, m, r);

    let x0 = (methods.solve_tril())(l.window(0, 0, r, r), b.window(0, 0, r, m), unit)?;

    let mut b1 = b.window(r, 0, n, m).to_matrix();
    let t = (methods.mat_mul())(l.window(r, 0, n, r), x0.as_view())?;
    b1.as_view_mut().sub_assign(t.as_view());

    let x1 = (methods.solve_tril())(l.window(r, r, n, n), b1.as_view(), unit)?;
    x0.concat_vertical(&x1)
}

/// Split `U = [A B; 0 D]` and solve `D X1 = B1` followed by `A X0 = B0 - B X1`.
pub fn solve_triu_recursive<R: Ring>(
    u: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
    unit: bool,
) -> Result<Matrix<R>, Status> {
    check_shape(u, b)?;
    let (n, m) = (b.nrows(), b.ncols());
    if n <= 1 {
        return solve_triu_classical(u, b, unit);
    }

    let methods = u.ring().methods();
    let r = n / 2;
    debug!("Recursive upper triangular solve: {}x{} split at row {}", n, m, r);

    let x1 = (methods.solve_triu())(u.window(r, r, n, n), b.window(r, 0, n, m), unit)?;

    let mut b0 = b.window(0, 0, r, m).to_matrix();
    let t = (methods.mat_mul())(u.window(0, r, r, n), x1.as_view())?;
    b0.as_view_mut().sub_assign(t.as_view());

    let x0 = (methods.solve_triu())(u.window(0, 0, r, r), b0.as_view(), unit)?;
    x0.concat_vertical(&x1)
}

fn use_classical(n: usize, m: usize) -> bool {
    let cutoff = LinalgSettings::get().triangular_recursive_cutoff;
    n < cutoff || m < cutoff
}

/// Solve a lower triangular system, recursively for large systems with many right-hand sides.
pub fn solve_tril_generic<R: Ring>(
    l: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
    unit: bool,
) -> Result<Matrix<R>, Status> {
    check_shape(l, b)?;
    if b.is_empty() {
        return Ok(b.to_matrix());
    }

    if use_classical(b.nrows(), b.ncols()) {
        solve_tril_classical(l, b, unit)
    } else {
        solve_tril_recursive(l, b, unit)
    }
}

/// Solve an upper triangular system, recursively for large systems with many right-hand sides.
pub fn solve_triu_generic<R: Ring>(
    u: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
    unit: bool,
) -> Result<Matrix<R>, Status> {
    check_shape(u, b)?;
    if b.is_empty() {
        return Ok(b.to_matrix());
    }

    if use_classical(b.nrows(), b.ncols()) {
        solve_triu_classical(u, b, unit)
    } else {
        solve_triu_recursive(u, b, unit)
    }
}

impl<R: Ring> Matrix<R> {
    /// Solve `L X = B`, where `L` is the lower triangle of `self`.
    pub fn solve_tril(&self, b: &Matrix<R>, unit: bool) -> Result<Matrix<R>, Status> {
        (self.ring.methods().solve_tril())(self.as_view(), b.as_view(), unit)
    }

    /// Solve `U X = B`, where `U` is the upper triangle of `self`.
    pub fn solve_triu(&self, b: &Matrix<R>, unit: bool) -> Result<Matrix<R>, Status> {
        (self.ring.methods().solve_triu())(self.as_view(), b.as_view(), unit)
    }

    pub fn solve_tril_classical(&self, b: &Matrix<R>, unit: bool) -> Result<Matrix<R>, Status> {
        solve_tril_classical(self.as_view(), b.as_view(), unit)
    }

    pub fn solve_triu_classical(&self, b: &Matrix<R>, unit: bool) -> Result<Matrix<R>, Status> {
        solve_triu_classical(self.as_view(), b.as_view(), unit)
    }

    pub fn solve_tril_recursive(&self, b: &Matrix<R>, unit: bool) -> Result<Matrix<R>, Status> {
        solve_tril_recursive(self.as_view(), b.as_view(), unit)
    }

    pub fn solve_triu_recursive(&self, b: &Matrix<R>, unit: bool) -> Result<Matrix<R>, Status> {
        solve_triu_recursive(self.as_view(), b.as_view(), unit)
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng as _, SeedableRng};

    use crate::domains::{
        ball::BallField, integer::Z, integer_mod::IntegerMod, rational::Q, Ring,
    };
    use crate::status::Status;
    use crate::tensors::matrix::Matrix;
    use crate::truth::Truth;

    /// A random triangular matrix with a nonzero diagonal and garbage in the other triangle.
    fn triangular<R: Ring>(rng: &mut StdRng, n: usize, lower: bool, ring: R) -> Matrix<R> {
        let mut a = Matrix::new(n, n, ring.clone());
        for i in 0..n {
            for j in 0..n {
                a[(i, j)] = if i == j {
                    ring.nth(rng.gen_range(1..5))
                } else {
                    ring.sample(rng, (-10, 10))
                };
            }
        }
        for i in 0..n {
            for j in 0..n {
                let outside = if lower { j > i } else { j < i };
                if outside {
                    a[(i, j)] = ring.nth(1000);
                }
            }
        }
        a
    }

    fn only_triangle<R: Ring>(a: &Matrix<R>, lower: bool, unit: bool) -> Matrix<R> {
        let ring = a.ring();
        let mut t = a.clone();
        for i in 0..a.nrows() {
            for j in 0..a.ncols() {
                if (lower && j > i) || (!lower && j < i) {
                    t[(i, j)] = ring.zero();
                } else if unit && i == j {
                    t[(i, j)] = ring.one();
                }
            }
        }
        t
    }

    #[test]
    fn forward_and_back_substitution() {
        let l = Matrix::from_i64(&[2, 0, 0, 1, 3, 0, -1, 2, 4], 3, 3, Q).unwrap();
        let b = Matrix::from_i64(&[2, 4, 5, 3, 7, 1], 3, 2, Q).unwrap();

        let x = l.solve_tril(&b, false).unwrap();
        assert_eq!(&l * &x, b);

        let u = l.transpose();
        let x = u.solve_triu(&b, false).unwrap();
        assert_eq!(&u * &x, b);
    }

    #[test]
    fn unit_diagonal_is_not_read() {
        let l = Matrix::from_i64(&[0, 9, 9, 2, 0, 9, 3, 4, 0], 3, 3, Z).unwrap();
        let b = Matrix::from_i64(&[1, 2, 3], 3, 1, Z).unwrap();

        let x = l.solve_tril_classical(&b, true).unwrap();
        assert_eq!(x, Matrix::from_i64(&[1, 0, 0], 3, 1, Z).unwrap());
        assert_eq!(&only_triangle(&l, true, true) * &x, b);

        assert_eq!(l.solve_tril(&b, false).err(), Some(Status::DOMAIN));
    }

    #[test]
    fn division_fallback() {
        // 2 is not a unit in Z, but the divisions are exact
        let u = Matrix::from_i64(&[2, 1, 0, 3], 2, 2, Z).unwrap();
        let b = Matrix::from_i64(&[4, 6], 2, 1, Z).unwrap();
        let x = u.solve_triu(&b, false).unwrap();
        assert_eq!(x, Matrix::from_i64(&[1, 2], 2, 1, Z).unwrap());

        let b = Matrix::from_i64(&[1, 4], 2, 1, Z).unwrap();
        assert_eq!(u.solve_triu(&b, false).err(), Some(Status::DOMAIN));
    }

    #[test]
    fn undecided_diagonal() {
        let ball = BallField::new();
        let l = Matrix::from_linear(
            vec![crate::domains::ball::Ball::new(0., 0.5), ball.zero(), ball.one(), ball.one()],
            2,
            2,
            ball,
        )
        .unwrap();
        let b = Matrix::identity(2, ball);
        assert_eq!(l.solve_tril(&b, false).err(), Some(Status::UNABLE));
    }

    #[test]
    fn shapes() {
        let l = Matrix::identity(3, Q);
        assert_eq!(
            l.solve_tril(&Matrix::new(2, 2, Q), false).err(),
            Some(Status::DOMAIN)
        );
        assert_eq!(
            Matrix::new(2, 3, Q).solve_triu(&Matrix::new(2, 1, Q), true).err(),
            Some(Status::DOMAIN)
        );

        let x = l.solve_tril(&Matrix::new(3, 0, Q), false).unwrap();
        assert_eq!((x.nrows(), x.ncols()), (3, 0));
        let x = Matrix::new(0, 0, Q)
            .solve_triu(&Matrix::new(0, 4, Q), false)
            .unwrap();
        assert_eq!((x.nrows(), x.ncols()), (0, 4));
    }

    #[test]
    fn classical_and_recursive_agree() {
        let mut rng = StdRng::seed_from_u64(3);

        for (n, m) in [(1, 1), (2, 3), (7, 12), (12, 12), (15, 20), (20, 11)] {
            for lower in [true, false] {
                for unit in [true, false] {
                    let a = triangular(&mut rng, n, lower, Q);
                    let b = Matrix::randtest(&mut rng, n, m, Q, (-20, 20));

                    let (c, r, d) = if lower {
                        (
                            a.solve_tril_classical(&b, unit).unwrap(),
                            a.solve_tril_recursive(&b, unit).unwrap(),
                            a.solve_tril(&b, unit).unwrap(),
                        )
                    } else {
                        (
                            a.solve_triu_classical(&b, unit).unwrap(),
                            a.solve_triu_recursive(&b, unit).unwrap(),
                            a.solve_triu(&b, unit).unwrap(),
                        )
                    };

                    assert_eq!(c, r);
                    assert_eq!(c, d);
                    let t = only_triangle(&a, lower, unit);
                    assert_eq!((&t * &c).equal(&b), Truth::True);
                }
            }
        }

        let f = IntegerMod::new(101);
        let a = triangular(&mut rng, 16, true, f);
        let b = Matrix::randtest(&mut rng, 16, 16, f, (0, 101));
        assert_eq!(
            a.solve_tril_classical(&b, false).unwrap(),
            a.solve_tril_recursive(&b, false).unwrap()
        );
    }

    #[test]
    fn ball_solutions_overlap() {
        let mut rng = StdRng::seed_from_u64(5);
        let b = BallField::new();

        for (n, m) in [(3, 12), (12, 12), (25, 12), (16, 20)] {
            for lower in [true, false] {
                for unit in [true, false] {
                    let mut a = Matrix::new(n, n, b);
                    for i in 0..n {
                        for j in 0..n {
                            let inside = if lower { j <= i } else { j >= i };
                            a[(i, j)] = if i == j {
                                b.nth(rng.gen_range(4..8))
                            } else if inside {
                                b.sample(&mut rng, (-2, 2))
                            } else {
                                b.nth(1000)
                            };
                        }
                    }
                    let rhs = Matrix::randtest(&mut rng, n, m, b, (-5, 5));

                    let (c, r) = if lower {
                        (
                            a.solve_tril_classical(&rhs, unit).unwrap(),
                            a.solve_tril_recursive(&rhs, unit).unwrap(),
                        )
                    } else {
                        (
                            a.solve_triu_classical(&rhs, unit).unwrap(),
                            a.solve_triu_recursive(&rhs, unit).unwrap(),
                        )
                    };

                    assert_eq!((r.nrows(), r.ncols()), (n, m));
                    for i in 0..n {
                        for j in 0..m {
                            assert!(
                                c[(i, j)].overlaps(&r[(i, j)]),
                                "{} and {} are disjoint",
                                c[(i, j)],
                                r[(i, j)]
                            );
                            assert!(c[(i, j)].mid.is_finite() && r[(i, j)].mid.is_finite());
                        }
                    }
                }
            }
        }
    }
}
