//! # Volatility Recursions
//!
//! $$
//! \sigma_t^2 = f\bigl(\theta, \varepsilon_{t-1}, \varepsilon_{t-2}, \ldots, \sigma_{t-1}^2, \ldots\bigr)
//! $$
//!
//! `volatility_recursions` computes the conditional variance paths implied by a family of
//! volatility models, given a parameter vector and a residual series. It is meant to sit
//! under a likelihood evaluator, so every recursion writes into caller-owned buffers and
//! keeps each step inside a per-period admissible range.
//!
//! ## Modules
//!
//! | Module          | Description                                                                                  |
//! |-----------------|----------------------------------------------------------------------------------------------|
//! | [`bounds`]      | Logarithmic-penalty clamp shared by every recursion and the default bounds table builder.   |
//! | [`init`]        | Warm-start values: weighted backcast and the EWMA variance used to size bounds.             |
//! | [`params`]      | Structured views over the flat positional parameter vectors.                                 |
//! | [`recursions`]  | The HARCH, ARCH, GARCH, EGARCH and MIDAS recursions and their model specifications.          |
//! | [`traits`]      | `FloatExt` and the `VarianceRecursionExt` model interface.                                   |
//!
//! ## Parallelism
//!
//! A single recursion is strictly sequential. `compute_variance_par()` evaluates many
//! candidate parameter vectors with `rayon`, each on its own output buffer.
//!
//! ## Example Usage
//!
//! ```rust
//! use ndarray::array;
//! use volatility_recursions::recursions::garch::GARCH;
//! use volatility_recursions::traits::VarianceRecursionExt;
//!
//! let resids = array![0.3, -1.2, 0.4, 0.9, -0.1];
//! let model = GARCH::new(1, 0, 1, 2.0);
//! let backcast = model.backcast(resids.view());
//! let bounds = model.variance_bounds(resids.view());
//! let mut sigma2 = ndarray::Array1::<f64>::zeros(resids.len());
//! model
//!   .compute_variance(
//!     array![0.05, 0.1, 0.85].view(),
//!     resids.view(),
//!     sigma2.view_mut(),
//!     backcast,
//!     bounds.view(),
//!   )
//!   .unwrap();
//! ```

pub mod bounds;
pub mod init;
pub mod params;
pub mod recursions;
pub mod traits;

pub use crate::traits::FloatExt;
pub use crate::traits::VarianceRecursionExt;

impl FloatExt for f64 {
  fn from_usize_(n: usize) -> Self {
    n as f64
  }

  fn from_f64_fast(v: f64) -> Self {
    v
  }

  fn to_f64_fast(self) -> f64 {
    self
  }
}

impl FloatExt for f32 {
  fn from_usize_(n: usize) -> Self {
    n as f32
  }

  fn from_f64_fast(v: f64) -> Self {
    v as f32
  }

  fn to_f64_fast(self) -> f64 {
    self as f64
  }
}
