//! Dense matrices with entries in a generic [Ring].
//!
//! A [Matrix] owns one contiguous buffer together with a table of row offsets.
//! Swapping two rows only swaps their offsets. A [MatrixView] or [MatrixViewMut] is a
//! rectangular window into a matrix: it borrows the parent and addresses its rows through
//! the parent's row table, so that a write through a mutable window is visible in the parent.
//!
//! The linear algebra routines are implemented in [crate::linalg] and are available as
//! methods on [Matrix], for example [Matrix::det] and [Matrix::nonsingular_solve].

use std::{
    fmt::{Debug, Display},
    ops::{Add, Index, IndexMut, Mul, Neg, Sub},
};

use crate::{domains::Ring, generic, status::Status, truth::Truth};

/// A matrix with entries that are elements of a ring `R`.
/// A vector can be represented as a matrix with one row or one column.
#[derive(Clone)]
pub struct Matrix<R: Ring> {
    pub(crate) data: Vec<R::Element>,
    /// The offset of every logical row in `data`.
    pub(crate) rows: Vec<usize>,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) ring: R,
}

impl<R: Ring> Matrix<R> {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: usize, ncols: usize, ring: R) -> Matrix<R> {
        Matrix {
            data: (0..nrows * ncols).map(|_| ring.zero()).collect(),
            rows: (0..nrows).map(|i| i * ncols).collect(),
            nrows,
            ncols,
            ring,
        }
    }

    /// Create a new square matrix with `nrows` rows and ones on the main diagonal and zeroes elsewhere.
    pub fn identity(nrows: usize, ring: R) -> Matrix<R> {
        let mut m = Matrix::new(nrows, nrows, ring);
        for i in 0..nrows {
            m[(i, i)] = m.ring.one();
        }
        m
    }

    /// Create a new matrix with the scalars `diag` on the main diagonal and zeroes elsewhere.
    pub fn eye(diag: &[R::Element], ring: R) -> Matrix<R> {
        let mut m = Matrix::new(diag.len(), diag.len(), ring);
        for (i, e) in diag.iter().enumerate() {
            m[(i, i)] = e.clone();
        }
        m
    }

    /// Convert a linear representation of a matrix to a `Matrix`.
    pub fn from_linear(
        data: Vec<R::Element>,
        nrows: usize,
        ncols: usize,
        ring: R,
    ) -> Result<Matrix<R>, String> {
        if data.len() == nrows * ncols {
            Ok(Matrix {
                data,
                rows: (0..nrows).map(|i| i * ncols).collect(),
                nrows,
                ncols,
                ring,
            })
        } else {
            Err(format!(
                "Data length does not match matrix dimensions: {} vs ({},{})",
                data.len(),
                nrows,
                ncols
            ))
        }
    }

    /// Create a new matrix from a 2-dimensional vector of scalars.
    pub fn from_nested_vec(matrix: Vec<Vec<R::Element>>, ring: R) -> Result<Matrix<R>, String> {
        let nrows = matrix.len();
        let ncols = matrix.first().map(|r| r.len()).unwrap_or(0);

        let mut data = Vec::with_capacity(nrows * ncols);
        for d in matrix {
            if d.len() != ncols {
                return Err("Matrix is not rectangular".to_string());
            }

            data.extend(d);
        }

        Matrix::from_linear(data, nrows, ncols, ring)
    }

    /// Create a matrix from small integers in row-major order, mapped into the ring.
    pub fn from_i64(data: &[i64], nrows: usize, ncols: usize, ring: R) -> Result<Matrix<R>, String> {
        let data = data.iter().map(|x| ring.nth(*x)).collect();
        Matrix::from_linear(data, nrows, ncols, ring)
    }

    /// Return the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Return the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Return the distance between two rows in the underlying buffer.
    #[inline]
    pub fn stride(&self) -> usize {
        self.ncols
    }

    /// Return the ring of the matrix entries.
    #[inline]
    pub fn ring(&self) -> &R {
        &self.ring
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    /// Get the `i`th row.
    #[inline]
    pub fn row(&self, i: usize) -> &[R::Element] {
        let o = self.rows[i];
        &self.data[o..o + self.ncols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [R::Element] {
        let o = self.rows[i];
        &mut self.data[o..o + self.ncols]
    }

    /// Return an iterator over the rows of the matrix.
    pub fn row_iter(&self) -> impl Iterator<Item = &[R::Element]> + '_ {
        (0..self.nrows).map(move |i| self.row(i))
    }

    /// Consume the matrix and return its entries in row-major order.
    pub fn into_linear(mut self) -> Vec<R::Element> {
        self.compact();
        self.data
    }

    /// Rewrite the buffer so that the rows are stored in their logical order.
    pub fn compact(&mut self) {
        if self.rows.iter().enumerate().all(|(i, o)| *o == i * self.ncols) {
            return;
        }

        let mut data = Vec::with_capacity(self.data.len());
        for i in 0..self.nrows {
            let o = self.rows[i];
            for j in 0..self.ncols {
                data.push(std::mem::replace(&mut self.data[o + j], self.ring.zero()));
            }
        }
        self.data = data;
        for (i, o) in self.rows.iter_mut().enumerate() {
            *o = i * self.ncols;
        }
    }

    /// Get a view on the entire matrix.
    #[inline]
    pub fn as_view(&self) -> MatrixView<'_, R> {
        MatrixView {
            parent: self,
            r0: 0,
            c0: 0,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    #[inline]
    pub fn as_view_mut(&mut self) -> MatrixViewMut<'_, R> {
        let (nrows, ncols) = (self.nrows, self.ncols);
        MatrixViewMut {
            parent: self,
            r0: 0,
            c0: 0,
            nrows,
            ncols,
        }
    }

    /// Get a view on the rows `r1..r2` and the columns `c1..c2`.
    pub fn window(&self, r1: usize, c1: usize, r2: usize, c2: usize) -> MatrixView<'_, R> {
        self.as_view().window(r1, c1, r2, c2)
    }

    /// Get a mutable view on the rows `r1..r2` and the columns `c1..c2`.
    pub fn window_mut(&mut self, r1: usize, c1: usize, r2: usize, c2: usize) -> MatrixViewMut<'_, R> {
        check_window(r1, c1, r2, c2, self.nrows, self.ncols);
        MatrixViewMut {
            parent: self,
            r0: r1,
            c0: c1,
            nrows: r2 - r1,
            ncols: c2 - c1,
        }
    }

    /// Swap the rows `i` and `j`, and the corresponding entries of the permutation.
    #[inline]
    pub fn swap_rows(&mut self, i: usize, j: usize, perm: Option<&mut [usize]>) {
        if i != j {
            self.rows.swap(i, j);
            if let Some(p) = perm {
                p.swap(i, j);
            }
        }
    }

    /// Swap the columns `i` and `j`, and the corresponding entries of the permutation.
    pub fn swap_cols(&mut self, i: usize, j: usize, perm: Option<&mut [usize]>) {
        if i != j {
            for r in 0..self.nrows {
                self.row_mut(r).swap(i, j);
            }
            if let Some(p) = perm {
                p.swap(i, j);
            }
        }
    }

    /// Reverse the order of the rows.
    pub fn invert_rows(&mut self, perm: Option<&mut [usize]>) {
        self.rows.reverse();
        if let Some(p) = perm {
            p.reverse();
        }
    }

    /// Reverse the order of the columns.
    pub fn invert_cols(&mut self, perm: Option<&mut [usize]>) {
        for r in 0..self.nrows {
            self.row_mut(r).reverse();
        }
        if let Some(p) = perm {
            p.reverse();
        }
    }

    /// Reorder the rows so that row `i` of the result is row `perm[i]` of the input.
    pub fn permute_rows(&mut self, perm: &[usize]) {
        assert_eq!(perm.len(), self.nrows, "Permutation has the wrong length");
        self.rows = perm.iter().map(|p| self.rows[*p]).collect();
    }

    /// Transpose the matrix.
    pub fn transpose(&self) -> Matrix<R> {
        self.as_view().transpose()
    }

    /// Transpose a square matrix in place.
    pub fn transpose_in_place(&mut self) -> Result<(), Status> {
        if !self.is_square() {
            return Err(Status::DOMAIN);
        }

        for i in 0..self.nrows {
            for j in 0..i {
                let (a, b) = (self.rows[i] + j, self.rows[j] + i);
                self.data.swap(a, b);
            }
        }
        Ok(())
    }

    /// Write the transpose into `dest`, which must have the transposed shape.
    pub fn transpose_into(&self, dest: &mut Matrix<R>) -> Result<(), Status> {
        if dest.nrows != self.ncols || dest.ncols != self.nrows {
            return Err(Status::DOMAIN);
        }

        for i in 0..self.nrows {
            for (j, e) in self.row(i).iter().enumerate() {
                dest[(j, i)] = e.clone();
            }
        }
        Ok(())
    }

    /// Place `other` to the right of `self`.
    pub fn concat_horizontal(&self, other: &Matrix<R>) -> Result<Matrix<R>, Status> {
        if self.nrows != other.nrows {
            return Err(Status::DOMAIN);
        }

        let mut data = Vec::with_capacity(self.nrows * (self.ncols + other.ncols));
        for i in 0..self.nrows {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }

        Ok(Matrix {
            data,
            rows: (0..self.nrows).map(|i| i * (self.ncols + other.ncols)).collect(),
            nrows: self.nrows,
            ncols: self.ncols + other.ncols,
            ring: self.ring.clone(),
        })
    }

    /// Place `other` below `self`.
    pub fn concat_vertical(&self, other: &Matrix<R>) -> Result<Matrix<R>, Status> {
        if self.ncols != other.ncols {
            return Err(Status::DOMAIN);
        }

        let mut data = Vec::with_capacity((self.nrows + other.nrows) * self.ncols);
        for r in self.row_iter().chain(other.row_iter()) {
            data.extend_from_slice(r);
        }

        let nrows = self.nrows + other.nrows;
        Ok(Matrix {
            data,
            rows: (0..nrows).map(|i| i * self.ncols).collect(),
            nrows,
            ncols: self.ncols,
            ring: self.ring.clone(),
        })
    }

    /// Add two matrices of the same shape.
    pub fn add(&self, rhs: &Matrix<R>) -> Result<Matrix<R>, Status> {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(Status::DOMAIN);
        }

        let mut res = self.clone();
        for i in 0..self.nrows {
            generic::vec_add(&self.ring, res.row_mut(i), rhs.row(i));
        }
        Ok(res)
    }

    /// Subtract two matrices of the same shape.
    pub fn sub(&self, rhs: &Matrix<R>) -> Result<Matrix<R>, Status> {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            return Err(Status::DOMAIN);
        }

        let mut res = self.clone();
        for i in 0..self.nrows {
            generic::vec_sub(&self.ring, res.row_mut(i), rhs.row(i));
        }
        Ok(res)
    }

    /// Negate each entry of the matrix.
    pub fn neg(&self) -> Matrix<R> {
        let mut res = self.clone();
        generic::vec_neg(&self.ring, &mut res.data);
        res
    }

    /// Multiply the scalar `e` to each entry of the matrix.
    pub fn mul_scalar(&self, e: &R::Element) -> Matrix<R> {
        let mut res = self.clone();
        generic::vec_mul_scalar(&self.ring, &mut res.data, e);
        res
    }

    /// Divide each entry of the matrix by `e`, failing if any division fails.
    pub fn div_scalar(&self, e: &R::Element) -> Result<Matrix<R>, Status> {
        let mut res = self.clone();
        for x in &mut res.data {
            *x = self.ring.div(x, e)?;
        }
        Ok(res)
    }

    /// Apply a function `f` to each entry of the matrix.
    pub fn map<G: Ring>(&self, f: impl Fn(&R::Element) -> G::Element, ring: G) -> Matrix<G> {
        let data = self.row_iter().flat_map(|r| r.iter().map(&f)).collect();
        Matrix {
            data,
            rows: (0..self.nrows).map(|i| i * self.ncols).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
            ring,
        }
    }

    /// Test if every entry is zero.
    pub fn is_zero(&self) -> Truth {
        Truth::all(self.row_iter().map(|r| generic::vec_is_zero(&self.ring, r)))
    }

    /// Test if the matrix has ones on the main diagonal and zeroes elsewhere.
    pub fn is_one(&self) -> Truth {
        Truth::all(self.row_iter().enumerate().flat_map(|(i, r)| {
            r.iter().enumerate().map(move |(j, e)| {
                if i == j {
                    self.ring.is_one(e)
                } else {
                    self.ring.is_zero(e)
                }
            })
        }))
    }

    /// Test if two matrices are equal. Matrices of different shape are never equal.
    pub fn equal(&self, other: &Matrix<R>) -> Truth {
        if self.nrows != other.nrows || self.ncols != other.ncols {
            return Truth::False;
        }

        Truth::all(
            (0..self.nrows).map(|i| generic::vec_equal(&self.ring, self.row(i), other.row(i))),
        )
    }
}

#[inline]
fn check_window(r1: usize, c1: usize, r2: usize, c2: usize, nrows: usize, ncols: usize) {
    assert!(
        r1 <= r2 && r2 <= nrows && c1 <= c2 && c2 <= ncols,
        "Window [{},{}) x [{},{}) out of bounds for a {}x{} matrix",
        r1,
        r2,
        c1,
        c2,
        nrows,
        ncols
    );
}

impl<R: Ring> PartialEq for Matrix<R> {
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && self.ring == other.ring
            && (0..self.nrows).all(|i| self.row(i) == other.row(i))
    }
}

impl<R: Ring> Debug for Matrix<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matrix")
            .field("ring", &self.ring)
            .field("nrows", &self.nrows)
            .field("ncols", &self.ncols)
            .field("rows", &self.row_iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<R: Ring> Index<usize> for Matrix<R> {
    type Output = [R::Element];

    /// Get the `index`th row of the matrix.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.row(index)
    }
}

impl<R: Ring> Index<(usize, usize)> for Matrix<R> {
    type Output = R::Element;

    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        debug_assert!(index.1 < self.ncols);
        &self.data[self.rows[index.0] + index.1]
    }
}

impl<R: Ring> IndexMut<(usize, usize)> for Matrix<R> {
    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut R::Element {
        debug_assert!(index.1 < self.ncols);
        &mut self.data[self.rows[index.0] + index.1]
    }
}

impl<R: Ring> Display for Matrix<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_view().fmt(f)
    }
}

impl<R: Ring> Add<&Matrix<R>> for &Matrix<R> {
    type Output = Matrix<R>;

    /// Add two matrices.
    fn add(self, rhs: &Matrix<R>) -> Self::Output {
        Matrix::add(self, rhs).unwrap_or_else(|_| {
            panic!(
                "Cannot add matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            )
        })
    }
}

impl<R: Ring> Sub<&Matrix<R>> for &Matrix<R> {
    type Output = Matrix<R>;

    /// Subtract two matrices.
    fn sub(self, rhs: &Matrix<R>) -> Self::Output {
        Matrix::sub(self, rhs).unwrap_or_else(|_| {
            panic!(
                "Cannot subtract matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            )
        })
    }
}

impl<R: Ring> Mul<&Matrix<R>> for &Matrix<R> {
    type Output = Matrix<R>;

    /// Multiply two matrices.
    fn mul(self, rhs: &Matrix<R>) -> Self::Output {
        Matrix::mul(self, rhs).unwrap_or_else(|e| {
            panic!(
                "Cannot multiply ({},{}) by ({},{}): {}",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols, e
            )
        })
    }
}

impl<R: Ring> Neg for Matrix<R> {
    type Output = Matrix<R>;

    /// Negate each entry of the matrix.
    fn neg(mut self) -> Self::Output {
        generic::vec_neg(&self.ring, &mut self.data);
        self
    }
}

/// A read-only window into a [Matrix].
pub struct MatrixView<'a, R: Ring> {
    parent: &'a Matrix<R>,
    r0: usize,
    c0: usize,
    nrows: usize,
    ncols: usize,
}

impl<'a, R: Ring> Clone for MatrixView<'a, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R: Ring> Copy for MatrixView<'a, R> {}

impl<'a, R: Ring> MatrixView<'a, R> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn ring(&self) -> &'a R {
        &self.parent.ring
    }

    /// The row stride of the parent matrix.
    #[inline]
    pub fn stride(&self) -> usize {
        self.parent.stride()
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    /// Get the `i`th row of the window.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [R::Element] {
        debug_assert!(i < self.nrows);
        let o = self.parent.rows[self.r0 + i] + self.c0;
        &self.parent.data[o..o + self.ncols]
    }

    /// The position of entry `(i, j)` in the buffer of the parent matrix.
    #[inline]
    pub fn offset(&self, i: usize, j: usize) -> usize {
        self.parent.rows[self.r0 + i] + self.c0 + j
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &'a [R::Element]> + 'a {
        let s = *self;
        (0..s.nrows).map(move |i| s.row(i))
    }

    /// Get a window on the rows `r1..r2` and columns `c1..c2` of this window.
    pub fn window(&self, r1: usize, c1: usize, r2: usize, c2: usize) -> MatrixView<'a, R> {
        check_window(r1, c1, r2, c2, self.nrows, self.ncols);
        MatrixView {
            parent: self.parent,
            r0: self.r0 + r1,
            c0: self.c0 + c1,
            nrows: r2 - r1,
            ncols: c2 - c1,
        }
    }

    /// Copy the window into a new matrix.
    pub fn to_matrix(&self) -> Matrix<R> {
        let mut data = Vec::with_capacity(self.nrows * self.ncols);
        for r in self.row_iter() {
            data.extend_from_slice(r);
        }

        Matrix {
            data,
            rows: (0..self.nrows).map(|i| i * self.ncols).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
            ring: self.ring().clone(),
        }
    }

    pub fn transpose(&self) -> Matrix<R> {
        let mut data = Vec::with_capacity(self.nrows * self.ncols);
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                data.push(self[(i, j)].clone());
            }
        }

        Matrix {
            data,
            rows: (0..self.ncols).map(|i| i * self.nrows).collect(),
            nrows: self.ncols,
            ncols: self.nrows,
            ring: self.ring().clone(),
        }
    }
}

impl<'a, R: Ring> Index<(usize, usize)> for MatrixView<'a, R> {
    type Output = R::Element;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        debug_assert!(index.0 < self.nrows && index.1 < self.ncols);
        &self.parent.data[self.offset(index.0, index.1)]
    }
}

impl<'a, R: Ring> Display for MatrixView<'a, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (ri, r) in self.row_iter().enumerate() {
            if ri > 0 {
                f.write_str(",")?;
            }
            f.write_str("{")?;
            for (i, e) in r.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                self.ring().format(e, f)?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}

/// A mutable window into a [Matrix].
pub struct MatrixViewMut<'a, R: Ring> {
    parent: &'a mut Matrix<R>,
    r0: usize,
    c0: usize,
    nrows: usize,
    ncols: usize,
}

impl<'a, R: Ring> MatrixViewMut<'a, R> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn ring(&self) -> &R {
        &self.parent.ring
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    #[inline]
    fn spans_parent_width(&self) -> bool {
        self.c0 == 0 && self.ncols == self.parent.ncols
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[R::Element] {
        debug_assert!(i < self.nrows);
        let o = self.parent.rows[self.r0 + i] + self.c0;
        &self.parent.data[o..o + self.ncols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [R::Element] {
        debug_assert!(i < self.nrows);
        let o = self.parent.rows[self.r0 + i] + self.c0;
        &mut self.parent.data[o..o + self.ncols]
    }

    /// Get the row `dst` mutably together with the distinct row `src`.
    pub fn row_pair(&mut self, dst: usize, src: usize) -> (&mut [R::Element], &[R::Element]) {
        assert_ne!(dst, src, "Rows must be distinct");
        let n = self.ncols;
        let d = self.parent.rows[self.r0 + dst] + self.c0;
        let s = self.parent.rows[self.r0 + src] + self.c0;

        if d < s {
            let (lo, hi) = self.parent.data.split_at_mut(s);
            (&mut lo[d..d + n], &hi[..n])
        } else {
            let (lo, hi) = self.parent.data.split_at_mut(d);
            (&mut hi[..n], &lo[s..s + n])
        }
    }

    /// Swap the rows `i` and `j` of the window. If the window covers entire rows of the parent,
    /// only the row offsets are swapped. Otherwise the entries inside the window are exchanged
    /// and the parent's columns outside the window are left in place.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }

        if self.spans_parent_width() {
            self.parent.rows.swap(self.r0 + i, self.r0 + j);
        } else {
            let n = self.ncols;
            let oi = self.parent.rows[self.r0 + i] + self.c0;
            let oj = self.parent.rows[self.r0 + j] + self.c0;
            for k in 0..n {
                self.parent.data.swap(oi + k, oj + k);
            }
        }
    }

    /// Reorder the rows of the window so that row `i` becomes the row that was at `perm[i]`.
    pub fn permute_rows(&mut self, perm: &[usize]) {
        assert_eq!(perm.len(), self.nrows, "Permutation has the wrong length");

        // pos[r] is the current position of original row r, cur[i] the original row at i
        let mut pos: Vec<usize> = (0..self.nrows).collect();
        let mut cur: Vec<usize> = (0..self.nrows).collect();
        for (i, p) in perm.iter().enumerate() {
            let src = pos[*p];
            if src != i {
                self.swap_rows(i, src);
                let displaced = cur[i];
                cur.swap(i, src);
                pos[*p] = i;
                pos[displaced] = src;
            }
        }
    }

    /// Get an immutable view on the window.
    #[inline]
    pub fn as_view(&self) -> MatrixView<'_, R> {
        MatrixView {
            parent: &*self.parent,
            r0: self.r0,
            c0: self.c0,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    pub fn window(&self, r1: usize, c1: usize, r2: usize, c2: usize) -> MatrixView<'_, R> {
        self.as_view().window(r1, c1, r2, c2)
    }

    /// Get a mutable window on the rows `r1..r2` and columns `c1..c2` of this window.
    pub fn window_mut(&mut self, r1: usize, c1: usize, r2: usize, c2: usize) -> MatrixViewMut<'_, R> {
        check_window(r1, c1, r2, c2, self.nrows, self.ncols);
        MatrixViewMut {
            parent: &mut *self.parent,
            r0: self.r0 + r1,
            c0: self.c0 + c1,
            nrows: r2 - r1,
            ncols: c2 - c1,
        }
    }

    #[inline]
    pub fn reborrow(&mut self) -> MatrixViewMut<'_, R> {
        MatrixViewMut {
            parent: &mut *self.parent,
            r0: self.r0,
            c0: self.c0,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Overwrite the window with the entries of `src`, which must have the same shape.
    pub fn assign(&mut self, src: MatrixView<'_, R>) {
        assert!(
            src.nrows() == self.nrows && src.ncols() == self.ncols,
            "Shape mismatch: ({},{}) vs ({},{})",
            src.nrows(),
            src.ncols(),
            self.nrows,
            self.ncols
        );

        for i in 0..self.nrows {
            self.row_mut(i).clone_from_slice(src.row(i));
        }
    }

    /// Subtract `src` from the window.
    pub fn sub_assign(&mut self, src: MatrixView<'_, R>) {
        assert!(src.nrows() == self.nrows && src.ncols() == self.ncols);

        let ring = self.parent.ring.clone();
        for i in 0..self.nrows {
            generic::vec_sub(&ring, self.row_mut(i), src.row(i));
        }
    }

    /// Set every entry of the window to zero.
    pub fn zero(&mut self) {
        let z = self.parent.ring.zero();
        for i in 0..self.nrows {
            for e in self.row_mut(i) {
                *e = z.clone();
            }
        }
    }

    pub fn to_matrix(&self) -> Matrix<R> {
        self.as_view().to_matrix()
    }
}

impl<'a, R: Ring> Index<(usize, usize)> for MatrixViewMut<'a, R> {
    type Output = R::Element;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        debug_assert!(index.0 < self.nrows && index.1 < self.ncols);
        &self.parent.data[self.parent.rows[self.r0 + index.0] + self.c0 + index.1]
    }
}

impl<'a, R: Ring> IndexMut<(usize, usize)> for MatrixViewMut<'a, R> {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        debug_assert!(index.0 < self.nrows && index.1 < self.ncols);
        let o = self.parent.rows[self.r0 + index.0] + self.c0 + index.1;
        &mut self.parent.data[o]
    }
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use crate::{
        domains::{integer::Z, integer_mod::IntegerMod, rational::Q, Ring},
        status::Status,
        tensors::matrix::Matrix,
        truth::Truth,
    };

    #[test]
    fn basics() {
        let a = Matrix::from_linear(
            vec![
                1.into(),
                2.into(),
                3.into(),
                4.into(),
                5.into(),
                6.into(),
            ],
            2,
            3,
            Z,
        )
        .unwrap();

        assert_eq!(a.transpose().into_linear(), vec![1, 4, 2, 5, 3, 6]);
        assert_eq!((-a.clone()).into_linear(), vec![-1, -2, -3, -4, -5, -6]);
        assert_eq!((&a - &a).is_zero(), Truth::True);

        let b = Matrix::from_nested_vec(
            vec![
                vec![7.into(), 8.into()],
                vec![9.into(), 10.into()],
                vec![11.into(), 12.into()],
            ],
            Z,
        )
        .unwrap();

        let c = &a * &b;
        assert_eq!(&c[1], &[139, 154]);
        assert_eq!(c[(0, 1)], 64);
        assert_eq!(format!("{}", c), "{{58,64},{139,154}}");

        let d = &a + &a;
        assert_eq!(d.into_linear(), vec![2, 4, 6, 8, 10, 12]);
        assert_eq!(a.add(&b), Err(Status::DOMAIN));

        assert!(Matrix::from_nested_vec(vec![vec![Integer::from(1)], vec![]], Z).is_err());
        assert!(Matrix::from_linear(vec![Integer::from(1)], 2, 1, Z).is_err());
    }

    #[test]
    fn empty() {
        let a = Matrix::new(0, 3, Q);
        assert!(a.is_empty());
        assert_eq!(a.is_zero(), Truth::True);
        assert_eq!(a.transpose().nrows(), 3);
        assert_eq!(format!("{}", Matrix::new(0, 0, Q)), "{}");
    }

    #[test]
    fn window_aliasing() {
        let mut a = Matrix::from_i64(&(0..20).collect::<Vec<_>>(), 4, 5, Z).unwrap();

        let w = a.window(1, 2, 4, 4);
        assert_eq!((w.nrows(), w.ncols(), w.stride()), (3, 2, 5));
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(w.offset(i, j), (1 + i) * 5 + 2 + j);
                assert_eq!(w[(i, j)], (1 + i as i64) * 5 + 2 + j as i64);
            }
        }

        let inner = w.window(1, 1, 3, 2);
        assert_eq!(inner[(0, 0)], 13);
        assert_eq!(inner.offset(1, 0), 3 * 5 + 3);

        {
            let mut wm = a.window_mut(1, 2, 4, 4);
            wm[(0, 0)] = Integer::from(-1);
            let mut sub = wm.window_mut(2, 1, 3, 2);
            sub[(0, 0)] = Integer::from(-2);
        }
        assert_eq!(a[(1, 2)], -1);
        assert_eq!(a[(3, 3)], -2);
        assert_eq!(a.data[7], -1);
        assert_eq!(a.data[18], -2);
    }

    #[test]
    fn window_row_swaps() {
        let mut a = Matrix::from_i64(&[1, 2, 3, 4, 5, 6, 7, 8, 9], 3, 3, Z).unwrap();

        // a partial-width window exchanges entries only inside the window
        a.window_mut(0, 0, 3, 2).swap_rows(0, 2);
        assert_eq!(a.clone().into_linear(), vec![7, 8, 3, 4, 5, 6, 1, 2, 9]);

        // a full-width window swaps row offsets
        a.window_mut(1, 0, 3, 3).swap_rows(0, 1);
        assert_eq!(a.row(1), &[1, 2, 9]);
        assert_eq!(a.row(2), &[4, 5, 6]);

        let mut b = Matrix::from_i64(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12], 4, 3, Z).unwrap();
        b.window_mut(0, 1, 4, 3).permute_rows(&[2, 0, 3, 1]);
        assert_eq!(
            b.into_linear(),
            vec![1, 8, 9, 4, 2, 3, 7, 11, 12, 10, 5, 6]
        );
    }

    #[test]
    fn row_and_column_operations() {
        let mut a = Matrix::from_i64(&[1, 2, 3, 4, 5, 6], 2, 3, IntegerMod::new(7)).unwrap();
        let mut perm = vec![0, 1];
        a.swap_rows(0, 1, Some(&mut perm));
        assert_eq!(perm, [1, 0]);
        assert_eq!(a.row(0), &[4, 5, 6]);

        let mut cperm = vec![0, 1, 2];
        a.swap_cols(0, 2, Some(&mut cperm));
        assert_eq!(a.row(0), &[6, 5, 4]);
        assert_eq!(cperm, [2, 1, 0]);

        a.invert_cols(None);
        a.invert_rows(Some(&mut perm));
        assert_eq!(a.clone().into_linear(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(perm, [0, 1]);

        a.permute_rows(&[1, 0]);
        assert_eq!(a.row(0), &[4, 5, 6]);
        a.compact();
        assert_eq!(a.data, vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn transposition() {
        let mut a = Matrix::from_i64(&[1, 2, 3, 4], 2, 2, Q).unwrap();
        a.swap_rows(0, 1, None);
        a.transpose_in_place().unwrap();
        assert_eq!(a, Matrix::from_i64(&[3, 1, 4, 2], 2, 2, Q).unwrap());

        let mut b = Matrix::new(2, 3, Q);
        assert_eq!(b.transpose_in_place(), Err(Status::DOMAIN));

        let mut dest = Matrix::new(3, 2, Q);
        b[(0, 2)] = Q.nth(5);
        b.transpose_into(&mut dest).unwrap();
        assert_eq!(dest[(2, 0)], 5);
        assert_eq!(a.transpose_into(&mut dest), Err(Status::DOMAIN));
    }

    #[test]
    fn concatenation() {
        let a = Matrix::from_i64(&[1, 2, 3, 4], 2, 2, Z).unwrap();
        let b = Matrix::identity(2, Z);

        let h = a.concat_horizontal(&b).unwrap();
        assert_eq!(h.into_linear(), vec![1, 2, 1, 0, 3, 4, 0, 1]);

        let v = a.concat_vertical(&b).unwrap();
        assert_eq!(v.window(2, 0, 4, 2).to_matrix().is_one(), Truth::True);
        assert_eq!(
            a.concat_vertical(&Matrix::new(1, 3, Z)),
            Err(Status::DOMAIN)
        );
    }
}
