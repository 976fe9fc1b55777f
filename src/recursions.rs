//! # Recursions
//!
//! $$
//! \sigma_t^2 = \omega + \sum_i a_i\,g(\varepsilon_{t-i}) + \sum_j b_j\,\sigma_{t-j}^2
//! $$
//!
//! Each submodule exposes a stateless `*_recursion` entry point that fills a caller-owned
//! buffer left to right, plus a model struct implementing
//! [`VarianceRecursionExt`](crate::traits::VarianceRecursionExt).
//!
pub mod arch;
pub mod egarch;
pub mod garch;
pub mod harch;
pub mod midas;

pub use arch::arch_recursion;
pub use egarch::egarch_recursion;
pub use garch::garch_recursion;
pub use harch::harch_recursion;
pub use midas::midas_recursion;

pub(crate) fn assert_same_len(len: usize, nobs: usize, name: &str) {
  assert_eq!(len, nobs, "{name} must have the same length as the residuals");
}
