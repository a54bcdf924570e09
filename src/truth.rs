//! Three-valued logic for predicates that a ring cannot always decide.
//!
//! Exact rings such as the [integers](crate::domains::integer::Z) always answer
//! [Truth::True] or [Truth::False], but a ball that contains zero
//! cannot be proven zero or nonzero, so its zero test yields [Truth::Unknown].

use std::fmt::{Display, Formatter};
use std::ops::{BitAnd, BitOr, Not};

/// A truth value in `{True, False, Unknown}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    /// Returns `true` iff the value is provably true.
    #[inline]
    pub fn is_true(self) -> bool {
        self == Truth::True
    }

    /// Returns `true` iff the value is provably false.
    #[inline]
    pub fn is_false(self) -> bool {
        self == Truth::False
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self == Truth::Unknown
    }

    /// Kleene conjunction: `False` dominates, then `Unknown`.
    #[inline]
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    /// Kleene disjunction: `True` dominates, then `Unknown`.
    #[inline]
    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// The conjunction of all values. The empty conjunction is `True`.
    pub fn all<I: IntoIterator<Item = Truth>>(iter: I) -> Truth {
        let mut res = Truth::True;
        for t in iter {
            res = res.and(t);
            if res == Truth::False {
                break;
            }
        }
        res
    }

    /// The disjunction of all values. The empty disjunction is `False`.
    pub fn any<I: IntoIterator<Item = Truth>>(iter: I) -> Truth {
        let mut res = Truth::False;
        for t in iter {
            res = res.or(t);
            if res == Truth::True {
                break;
            }
        }
        res
    }
}

impl From<bool> for Truth {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Truth::True
        } else {
            Truth::False
        }
    }
}

impl Not for Truth {
    type Output = Truth;

    #[inline]
    fn not(self) -> Self::Output {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

impl BitAnd for Truth {
    type Output = Truth;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Truth {
    type Output = Truth;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Display for Truth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Truth::True => f.write_str("true"),
            Truth::False => f.write_str("false"),
            Truth::Unknown => f.write_str("unknown"),
        }
    }
}
