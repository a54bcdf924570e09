//! Solving nonsingular linear systems `A X = B`.
//!
//! All solvers report a provably singular `A` as [Status::DOMAIN]. If the ring cannot decide
//! whether `A` is singular, the result is [Status::UNABLE].

use tracing::debug;

use crate::domains::Ring;
use crate::linalg::fflu::fflu_solve;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView};
use crate::truth::Truth;

fn check_shape<R: Ring>(a: MatrixView<'_, R>, b: MatrixView<'_, R>) -> Result<(), Status> {
    if !a.is_square() || a.nrows() != b.nrows() {
        return Err(Status::DOMAIN);
    }
    Ok(())
}

/// Solve the system using LU decomposition followed by two triangular solves.
pub fn nonsingular_solve_lu<R: Ring>(
    a: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
) -> Result<Matrix<R>, Status> {
    check_shape(a, b)?;
    let n = a.nrows();
    if n == 0 {
        return Ok(b.to_matrix());
    }

    let methods = a.ring().methods();
    let mut lu = a.to_matrix();
    let mut perm = vec![0; n];
    if (methods.lu())(&mut lu.as_view_mut(), &mut perm, true)? == 0 {
        return Err(Status::DOMAIN);
    }

    let mut pb = b.to_matrix();
    pb.permute_rows(&perm);

    let y = (methods.solve_tril())(lu.as_view(), pb.as_view(), true)?;
    (methods.solve_triu())(lu.as_view(), y.as_view(), false)
}

/// Solve `A X = den B` with fraction-free elimination and return `X` and `den`.
///
/// All intermediate results stay in the ring. Over the integers, `X` and `den` are integral
/// and `X / den` is the rational solution.
pub fn nonsingular_solve_den<R: Ring>(
    a: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
) -> Result<(Matrix<R>, R::Element), Status> {
    check_shape(a, b)?;
    let n = a.nrows();
    let ring = a.ring();
    if n == 0 {
        return Ok((b.to_matrix(), ring.one()));
    }

    let mut lu = a.to_matrix();
    let mut perm = vec![0; n];
    let (rank, den) = (ring.methods().fflu())(&mut lu.as_view_mut(), &mut perm, true)?;
    if rank == 0 {
        return Err(Status::DOMAIN);
    }

    let x = fflu_solve(&perm, lu.as_view(), b)?;
    Ok((x, den))
}

/// Solve the system with fraction-free elimination, dividing by the common
/// denominator at the end. The division fails with [Status::DOMAIN] if the
/// solution does not lie in the ring.
pub fn nonsingular_solve_fflu<R: Ring>(
    a: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
) -> Result<Matrix<R>, Status> {
    let (x, den) = nonsingular_solve_den(a, b)?;
    x.div_scalar(&den)
}

/// Solve the system with LU decomposition over finite and inexact rings, with
/// fraction-free elimination over other exact integral domains and with LU otherwise.
pub fn nonsingular_solve_generic<R: Ring>(
    a: MatrixView<'_, R>,
    b: MatrixView<'_, R>,
) -> Result<Matrix<R>, Status> {
    check_shape(a, b)?;

    let ring = a.ring();
    if ring.is_finite() == Truth::True || ring.is_exact() != Truth::True {
        debug!("Solving a {}x{} system over {} by LU", a.nrows(), a.ncols(), ring);
        nonsingular_solve_lu(a, b)
    } else if ring.is_integral_domain() == Truth::True {
        debug!("Solving a {}x{} system over {} by FFLU", a.nrows(), a.ncols(), ring);
        nonsingular_solve_fflu(a, b)
    } else {
        debug!("Solving a {}x{} system over {} by LU", a.nrows(), a.ncols(), ring);
        nonsingular_solve_lu(a, b)
    }
}

impl<R: Ring> Matrix<R> {
    /// Solve `A X = B` for a nonsingular square matrix `A`.
    pub fn nonsingular_solve(&self, b: &Matrix<R>) -> Result<Matrix<R>, Status> {
        (self.ring.methods().nonsingular_solve())(self.as_view(), b.as_view())
    }

    pub fn nonsingular_solve_lu(&self, b: &Matrix<R>) -> Result<Matrix<R>, Status> {
        nonsingular_solve_lu(self.as_view(), b.as_view())
    }

    pub fn nonsingular_solve_fflu(&self, b: &Matrix<R>) -> Result<Matrix<R>, Status> {
        nonsingular_solve_fflu(self.as_view(), b.as_view())
    }

    /// Solve `A X = den B` fraction-free, returning `X` and `den`.
    pub fn nonsingular_solve_den(&self, b: &Matrix<R>) -> Result<(Matrix<R>, R::Element), Status> {
        nonsingular_solve_den(self.as_view(), b.as_view())
    }

    /// Compute the inverse of a nonsingular square matrix.
    pub fn inv(&self) -> Result<Matrix<R>, Status> {
        if !self.is_square() {
            return Err(Status::DOMAIN);
        }

        self.nonsingular_solve(&Matrix::identity(self.nrows, self.ring.clone()))
    }
}
