//! Method tables: per ring kind dispatch of composite operations.
//!
//! Every [Ring] kind owns one [MethodTable], a dense array with one slot per [Method].
//! The table is built the first time it is requested: every slot is filled with the generic
//! implementation (or [MethodImpl::NotImplemented] if there is none), after which the
//! overrides listed by [Ring::method_overrides] are written on top.
//!
//! Tables are keyed by the ring *type*, not by the ring instance. For example, all
//! [IntegerMod](crate::domains::integer_mod::IntegerMod) rings share one table,
//! regardless of their modulus. Building is idempotent: if two threads race to build the
//! same table, the first one to publish it wins and the other copy is dropped.
//!
//! Calling a slot that holds [MethodImpl::NotImplemented] panics, as it indicates that a ring
//! was configured without an operation that an algorithm requires.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::sync::{PoisonError, RwLock};

use ahash::HashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::domains::Ring;
use crate::generic;
use crate::linalg;
use crate::status::Status;
use crate::tensors::matrix::{Matrix, MatrixView, MatrixViewMut};

/// The identifiers of the operations that can be overridden per ring kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Method {
    Inv,
    Div,
    DivExact,
    Pow,
    CmpAbs,
    Dot,
    FindPivot,
    MatMul,
    Lu,
    Fflu,
    Det,
    Rank,
    NonsingularSolve,
    SolveTril,
    SolveTriu,
    Rref,
    Charpoly,
}

impl Method {
    pub const COUNT: usize = 17;

    pub const ALL: [Method; Method::COUNT] = [
        Method::Inv,
        Method::Div,
        Method::DivExact,
        Method::Pow,
        Method::CmpAbs,
        Method::Dot,
        Method::FindPivot,
        Method::MatMul,
        Method::Lu,
        Method::Fflu,
        Method::Det,
        Method::Rank,
        Method::NonsingularSolve,
        Method::SolveTril,
        Method::SolveTriu,
        Method::Rref,
        Method::Charpoly,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

type Elem<R> = <R as Ring>::Element;

pub type InvFn<R> = fn(&R, &Elem<R>) -> Result<Elem<R>, Status>;
pub type DivFn<R> = fn(&R, &Elem<R>, &Elem<R>) -> Result<Elem<R>, Status>;
pub type PowFn<R> = fn(&R, &Elem<R>, i64) -> Result<Elem<R>, Status>;
pub type CmpAbsFn<R> = fn(&R, &Elem<R>, &Elem<R>) -> Result<Ordering, Status>;
pub type DotFn<R> = fn(&R, Option<&Elem<R>>, bool, &[Elem<R>], &[Elem<R>]) -> Elem<R>;
/// Find a pivot in `column` among the rows `start..end`.
pub type FindPivotFn<R> = fn(MatrixView<'_, R>, usize, usize, usize) -> Result<usize, Status>;
pub type MatMulFn<R> = fn(MatrixView<'_, R>, MatrixView<'_, R>) -> Result<Matrix<R>, Status>;
/// Factor the window in place, writing the row permutation. The flag requests a rank check.
pub type LuFn<R> = fn(&mut MatrixViewMut<'_, R>, &mut [usize], bool) -> Result<usize, Status>;
pub type FfluFn<R> =
    fn(&mut MatrixViewMut<'_, R>, &mut [usize], bool) -> Result<(usize, Elem<R>), Status>;
pub type DetFn<R> = fn(MatrixView<'_, R>) -> Result<Elem<R>, Status>;
pub type RankFn<R> = fn(MatrixView<'_, R>) -> Result<usize, Status>;
pub type SolveFn<R> = fn(MatrixView<'_, R>, MatrixView<'_, R>) -> Result<Matrix<R>, Status>;
/// Solve a triangular system. The flag indicates a unit diagonal.
pub type SolveTriangularFn<R> =
    fn(MatrixView<'_, R>, MatrixView<'_, R>, bool) -> Result<Matrix<R>, Status>;
pub type RrefFn<R> = fn(MatrixView<'_, R>) -> Result<(usize, Matrix<R>), Status>;
pub type CharpolyFn<R> = fn(MatrixView<'_, R>) -> Result<Vec<Elem<R>>, Status>;

/// One slot of a method table.
pub enum MethodImpl<R: Ring> {
    Inv(InvFn<R>),
    Div(DivFn<R>),
    DivExact(DivFn<R>),
    Pow(PowFn<R>),
    CmpAbs(CmpAbsFn<R>),
    Dot(DotFn<R>),
    FindPivot(FindPivotFn<R>),
    MatMul(MatMulFn<R>),
    Lu(LuFn<R>),
    Fflu(FfluFn<R>),
    Det(DetFn<R>),
    Rank(RankFn<R>),
    NonsingularSolve(SolveFn<R>),
    SolveTril(SolveTriangularFn<R>),
    SolveTriu(SolveTriangularFn<R>),
    Rref(RrefFn<R>),
    Charpoly(CharpolyFn<R>),
    NotImplemented(Method),
}

impl<R: Ring> Clone for MethodImpl<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Ring> Copy for MethodImpl<R> {}

impl<R: Ring> MethodImpl<R> {
    /// The slot this implementation belongs in.
    pub fn method(&self) -> Method {
        match self {
            MethodImpl::Inv(_) => Method::Inv,
            MethodImpl::Div(_) => Method::Div,
            MethodImpl::DivExact(_) => Method::DivExact,
            MethodImpl::Pow(_) => Method::Pow,
            MethodImpl::CmpAbs(_) => Method::CmpAbs,
            MethodImpl::Dot(_) => Method::Dot,
            MethodImpl::FindPivot(_) => Method::FindPivot,
            MethodImpl::MatMul(_) => Method::MatMul,
            MethodImpl::Lu(_) => Method::Lu,
            MethodImpl::Fflu(_) => Method::Fflu,
            MethodImpl::Det(_) => Method::Det,
            MethodImpl::Rank(_) => Method::Rank,
            MethodImpl::NonsingularSolve(_) => Method::NonsingularSolve,
            MethodImpl::SolveTril(_) => Method::SolveTril,
            MethodImpl::SolveTriu(_) => Method::SolveTriu,
            MethodImpl::Rref(_) => Method::Rref,
            MethodImpl::Charpoly(_) => Method::Charpoly,
            MethodImpl::NotImplemented(m) => *m,
        }
    }

    pub fn is_implemented(&self) -> bool {
        !matches!(self, MethodImpl::NotImplemented(_))
    }

    /// The generic implementation of `method`.
    pub fn generic(method: Method) -> MethodImpl<R> {
        match method {
            Method::Inv => MethodImpl::Inv(generic::inv),
            Method::Div => MethodImpl::Div(generic::div),
            Method::DivExact => MethodImpl::DivExact(generic::div),
            Method::Pow => MethodImpl::Pow(generic::pow),
            Method::CmpAbs => MethodImpl::NotImplemented(Method::CmpAbs),
            Method::Dot => MethodImpl::Dot(generic::dot),
            Method::FindPivot => MethodImpl::FindPivot(linalg::pivot::find_pivot_first),
            Method::MatMul => MethodImpl::MatMul(linalg::mul::mul_generic),
            Method::Lu => MethodImpl::Lu(linalg::lu::lu_generic),
            Method::Fflu => MethodImpl::Fflu(linalg::fflu::fflu),
            Method::Det => MethodImpl::Det(linalg::det::det_generic),
            Method::Rank => MethodImpl::Rank(linalg::rank::rank_generic),
            Method::NonsingularSolve => {
                MethodImpl::NonsingularSolve(linalg::solve::nonsingular_solve_generic)
            }
            Method::SolveTril => MethodImpl::SolveTril(linalg::triangular::solve_tril_generic),
            Method::SolveTriu => MethodImpl::SolveTriu(linalg::triangular::solve_triu_generic),
            Method::Rref => MethodImpl::Rref(linalg::rref::rref_generic),
            Method::Charpoly => MethodImpl::Charpoly(linalg::charpoly::charpoly_berkowitz),
        }
    }
}

static METHOD_TABLES: Lazy<RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>> =
    Lazy::new(|| RwLock::new(HashMap::default()));

/// The dense method table of a ring kind.
pub struct MethodTable<R: Ring> {
    slots: [MethodImpl<R>; Method::COUNT],
}

macro_rules! slot_accessor {
    ($name: ident, $variant: ident, $ty: ty) => {
        #[inline]
        pub fn $name(&self) -> $ty {
            match self.slots[Method::$variant.index()] {
                MethodImpl::$variant(f) => f,
                _ => self.not_implemented(Method::$variant),
            }
        }
    };
}

impl<R: Ring> MethodTable<R> {
    /// Build a table from the generic implementations and the given overrides.
    pub fn build(overrides: &[MethodImpl<R>]) -> MethodTable<R> {
        let mut slots = Method::ALL.map(MethodImpl::generic);
        for o in overrides {
            slots[o.method().index()] = *o;
        }
        MethodTable { slots }
    }

    /// Get the table of the ring kind `R`, building and publishing it on first use.
    pub fn get() -> &'static MethodTable<R> {
        let id = TypeId::of::<R>();

        if let Some(t) = METHOD_TABLES
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Self::downcast(*t);
        }

        let overrides = R::method_overrides();
        debug!(
            "Building method table for {} with {} overrides",
            std::any::type_name::<R>(),
            overrides.len()
        );
        let table = MethodTable::build(&overrides);

        let mut tables = METHOD_TABLES
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let t = *tables.entry(id).or_insert_with(|| {
            let leaked: &'static (dyn Any + Send + Sync) = Box::leak(Box::new(table));
            leaked
        });
        Self::downcast(t)
    }

    fn downcast(t: &'static (dyn Any + Send + Sync)) -> &'static MethodTable<R> {
        match t.downcast_ref::<MethodTable<R>>() {
            Some(t) => t,
            None => panic!(
                "Method table registered for {} has the wrong type",
                std::any::type_name::<R>()
            ),
        }
    }

    /// Look up the raw slot of `method`.
    #[inline]
    pub fn lookup(&self, method: Method) -> MethodImpl<R> {
        self.slots[method.index()]
    }

    #[cold]
    fn not_implemented(&self, method: Method) -> ! {
        panic!(
            "Method {} is not implemented for ring {}",
            method,
            std::any::type_name::<R>()
        )
    }

    slot_accessor!(inv, Inv, InvFn<R>);
    slot_accessor!(div, Div, DivFn<R>);
    slot_accessor!(div_exact, DivExact, DivFn<R>);
    slot_accessor!(pow, Pow, PowFn<R>);
    slot_accessor!(cmp_abs, CmpAbs, CmpAbsFn<R>);
    slot_accessor!(dot, Dot, DotFn<R>);
    slot_accessor!(find_pivot, FindPivot, FindPivotFn<R>);
    slot_accessor!(mat_mul, MatMul, MatMulFn<R>);
    slot_accessor!(lu, Lu, LuFn<R>);
    slot_accessor!(fflu, Fflu, FfluFn<R>);
    slot_accessor!(det, Det, DetFn<R>);
    slot_accessor!(rank, Rank, RankFn<R>);
    slot_accessor!(nonsingular_solve, NonsingularSolve, SolveFn<R>);
    slot_accessor!(solve_tril, SolveTril, SolveTriangularFn<R>);
    slot_accessor!(solve_triu, SolveTriu, SolveTriangularFn<R>);
    slot_accessor!(rref, Rref, RrefFn<R>);
    slot_accessor!(charpoly, Charpoly, CharpolyFn<R>);
}

#[cfg(test)]
mod test {
    use super::{Method, MethodImpl, MethodTable};
    use crate::domains::{
        float::FloatField,
        integer::{IntegerRing, Z},
        integer_mod::IntegerMod,
        Ring,
    };

    #[test]
    fn method_order() {
        for (i, m) in Method::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn generic_fill_and_override() {
        let t = MethodTable::<IntegerRing>::build(&[]);
        assert!(!t.lookup(Method::CmpAbs).is_implemented());
        assert!(t.lookup(Method::Pow).is_implemented());

        let t = MethodTable::<IntegerRing>::get();
        assert!(t.lookup(Method::CmpAbs).is_implemented());
        assert_eq!(t.lookup(Method::Div).method(), Method::Div);
    }

    #[test]
    fn shared_per_kind() {
        let a = IntegerMod::new(7).methods() as *const _;
        let b = IntegerMod::new(12).methods() as *const _;
        assert_eq!(a, b);
        assert!(std::ptr::eq(Z.methods(), Z.methods()));
    }

    #[test]
    fn concurrent_first_use() {
        let ptrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| FloatField::new().methods() as *const _ as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    #[should_panic(expected = "not implemented")]
    fn missing_method_panics() {
        let t = MethodTable::<IntegerRing>::build(&[MethodImpl::NotImplemented(Method::Pow)]);
        let _ = (t.pow())(&Z, &1.into(), 2);
    }
}
