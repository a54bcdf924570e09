//! Tunable thresholds of the linear algebra layer.
//!
//! The settings are global and read-mostly. They are initialized once from the
//! environment and can be replaced at runtime with [LinalgSettings::set]:
//!
//! | variable                    | field                           | default       |
//! |-----------------------------|---------------------------------|---------------|
//! | `GENRING_LU_CUTOFF`         | `lu_recursive_cutoff`           | 4             |
//! | `GENRING_TRIANGULAR_CUTOFF` | `triangular_recursive_cutoff`   | 10            |
//! | `GENRING_STRASSEN_CUTOFF`   | `mul_strassen_cutoff`           | 64            |
//! | `GENRING_PARALLEL_CUTOFF`   | `parallel_mul_cutoff`           | 262144        |
//! | `GENRING_POW_LIMIT`         | `pow_exponent_limit`            | 2^32          |

use std::env;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::warn;

static SETTINGS: Lazy<RwLock<LinalgSettings>> =
    Lazy::new(|| RwLock::new(LinalgSettings::from_env()));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinalgSettings {
    /// The generic LU uses classical elimination when the matrix has fewer rows or columns.
    pub lu_recursive_cutoff: usize,
    /// Triangular solves are classical when the system or the right-hand side is smaller.
    pub triangular_recursive_cutoff: usize,
    /// Exact rings switch to Strassen multiplication when all dimensions reach this size.
    pub mul_strassen_cutoff: usize,
    /// The number of multiply-adds above which the classical product fans out over rows.
    pub parallel_mul_cutoff: usize,
    /// The largest exponent magnitude accepted by the generic power.
    pub pow_exponent_limit: u64,
}

impl Default for LinalgSettings {
    fn default() -> Self {
        LinalgSettings {
            lu_recursive_cutoff: 4,
            triangular_recursive_cutoff: 10,
            mul_strassen_cutoff: 64,
            parallel_mul_cutoff: 1 << 18,
            pow_exponent_limit: 1 << 32,
        }
    }
}

impl LinalgSettings {
    /// Get a copy of the current settings.
    pub fn get() -> LinalgSettings {
        *SETTINGS.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the current settings.
    pub fn set(settings: LinalgSettings) {
        *SETTINGS.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Read the settings from the environment, falling back to the defaults.
    pub fn from_env() -> LinalgSettings {
        let d = LinalgSettings::default();
        LinalgSettings {
            lu_recursive_cutoff: env_or("GENRING_LU_CUTOFF", d.lu_recursive_cutoff),
            triangular_recursive_cutoff: env_or(
                "GENRING_TRIANGULAR_CUTOFF",
                d.triangular_recursive_cutoff,
            ),
            mul_strassen_cutoff: env_or("GENRING_STRASSEN_CUTOFF", d.mul_strassen_cutoff),
            parallel_mul_cutoff: env_or("GENRING_PARALLEL_CUTOFF", d.parallel_mul_cutoff),
            pow_exponent_limit: env_or("GENRING_POW_LIMIT", d.pow_exponent_limit),
        }
    }
}

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => match v.trim().parse() {
            Ok(x) => x,
            Err(_) => {
                warn!("Ignoring invalid value {:?} for {}", v, key);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod test {
    use super::{env_or, LinalgSettings};

    #[test]
    fn defaults() {
        let s = LinalgSettings::default();
        assert_eq!(s.lu_recursive_cutoff, 4);
        assert_eq!(s.triangular_recursive_cutoff, 10);
    }

    #[test]
    fn missing_variable() {
        assert_eq!(env_or("GENRING_SURELY_NOT_SET_ANYWHERE", 17usize), 17);
    }
}
