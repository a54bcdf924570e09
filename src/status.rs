//! Status codes shared by every fallible ring and matrix operation.
//!
//! A [Status] is a small bit set. [Status::DOMAIN] means that the operation is provably
//! undefined for its input (a singular matrix, a non-square determinant), while
//! [Status::UNABLE] means that the ring could not decide something the operation
//! needed. Several sub-results can be accumulated with `|=`; the combination is
//! [Status::SUCCESS] only if every part succeeded.

use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[must_use]
pub struct Status(u8);

impl Status {
    pub const SUCCESS: Status = Status(0);
    pub const DOMAIN: Status = Status(1);
    pub const UNABLE: Status = Status(2);

    #[inline]
    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_domain(self) -> bool {
        self.0 & Status::DOMAIN.0 != 0
    }

    #[inline]
    pub fn is_unable(self) -> bool {
        self.0 & Status::UNABLE.0 != 0
    }

    /// Convert into a `Result`, so that the status can be propagated with `?`.
    #[inline]
    pub fn into_result(self) -> Result<(), Status> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Extract the status of a result, discarding the value.
    #[inline]
    pub fn of<T>(r: &Result<T, Status>) -> Status {
        match r {
            Ok(_) => Status::SUCCESS,
            Err(s) => *s,
        }
    }
}

impl BitOr for Status {
    type Output = Status;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Status(self.0 | rhs.0)
    }
}

impl BitOrAssign for Status {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Debug for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.is_domain(), self.is_unable()) {
            (false, false) => f.write_str("success"),
            (true, false) => f.write_str("domain error"),
            (false, true) => f.write_str("unable to decide"),
            (true, true) => f.write_str("domain error | unable to decide"),
        }
    }
}

impl std::error::Error for Status {}

#[cfg(test)]
mod test {
    use super::Status;

    #[test]
    fn accumulate() {
        let mut s = Status::SUCCESS;
        s |= Status::SUCCESS;
        assert!(s.is_success());
        s |= Status::UNABLE;
        assert!(s.is_unable() && !s.is_domain());
        s |= Status::DOMAIN;
        assert!(s.is_unable() && s.is_domain());
        assert_eq!(Status::DOMAIN | Status::SUCCESS, Status::DOMAIN);
        assert_eq!(Status::UNABLE.into_result(), Err(Status::UNABLE));
        assert_eq!(Status::SUCCESS.into_result(), Ok(()));
    }
}
