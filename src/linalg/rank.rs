use tracing::debug;

use crate::domains::Ring;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView};
use crate::truth::Truth;

/// Compute the rank by LU decomposition over finite fields and by fraction-free
/// LU decomposition over other integral domains.
///
/// Over rings that are not integral domains the rank is not well-defined by elimination,
/// giving [Status::DOMAIN], or [Status::UNABLE] if the ring cannot tell.
pub fn rank_generic<R: Ring>(a: MatrixView<'_, R>) -> Result<usize, Status> {
    let ring = a.ring();
    if a.is_empty() {
        return Ok(0);
    }

    let mut lu = a.to_matrix();
    let mut perm = vec![0; a.nrows()];

    if ring.is_finite() == Truth::True && ring.is_field() == Truth::True {
        debug!("Rank of a {}x{} matrix over {} by LU", a.nrows(), a.ncols(), ring);
        return (ring.methods().lu())(&mut lu.as_view_mut(), &mut perm, false);
    }

    match ring.is_integral_domain() {
        Truth::True => {
            debug!("Rank of a {}x{} matrix over {} by FFLU", a.nrows(), a.ncols(), ring);
            let (rank, _) = (ring.methods().fflu())(&mut lu.as_view_mut(), &mut perm, false)?;
            Ok(rank)
        }
        Truth::False => Err(Status::DOMAIN),
        Truth::Unknown => Err(Status::UNABLE),
    }
}

impl<R: Ring> Matrix<R> {
    /// Compute the rank of the matrix.
    pub fn rank(&self) -> Result<usize, Status> {
        (self.ring.methods().rank())(self.as_view())
    }
}
