//! # Traits
//!
//! $$
//! \text{Model contract: }(\theta, \varepsilon, \hat\sigma^2_0, B)\mapsto\sigma^2_{0:n}
//! $$
//!
use std::fmt::Debug;
use std::iter::Sum;
use std::ops::AddAssign;
use std::ops::SubAssign;

use anyhow::Result;
use ndarray::parallel::prelude::*;
use ndarray::stack;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::ArrayViewMut1;
use ndarray::Axis;
use ndarray::ScalarOperand;

use crate::bounds;
use crate::init;

pub trait FloatExt:
  num_traits::Float
  + num_traits::FromPrimitive
  + Sum
  + Default
  + Debug
  + Send
  + Sync
  + ScalarOperand
  + AddAssign
  + SubAssign
  + 'static
{
  fn from_usize_(n: usize) -> Self;
  fn from_f64_fast(v: f64) -> Self;
  fn to_f64_fast(self) -> f64;
}

/// A volatility model whose conditional variance is produced by one of the recursions.
///
/// Implementors own the lag-order configuration; the parameter vector, residuals and
/// output buffer are supplied per call so a single model value can serve every
/// likelihood evaluation of an optimizer run.
pub trait VarianceRecursionExt<T: FloatExt>: Send + Sync {
  /// Number of entries the flat parameter vector must carry.
  fn num_params(&self) -> usize;

  /// Short model label used in log events.
  fn name(&self) -> &'static str;

  /// Value substituted for every lag that reaches before the first observation.
  fn backcast(&self, resids: ArrayView1<T>) -> T {
    init::backcast(resids, T::from_f64_fast(2.0))
  }

  /// Per-period `(lower, upper)` admissible variance range, shape `(nobs, 2)`.
  fn variance_bounds(&self, resids: ArrayView1<T>) -> Array2<T> {
    bounds::variance_bounds(resids, T::from_f64_fast(2.0))
  }

  fn check_parameters(&self, parameters: ArrayView1<T>) -> Result<()> {
    anyhow::ensure!(
      parameters.len() == self.num_params(),
      "{} expects {} parameters, got {}",
      self.name(),
      self.num_params(),
      parameters.len()
    );
    anyhow::ensure!(
      parameters.iter().all(|p| p.is_finite()),
      "{} parameters must be finite",
      self.name()
    );
    Ok(())
  }

  /// Writes the conditional variance path into `sigma2`.
  fn compute_variance(
    &self,
    parameters: ArrayView1<T>,
    resids: ArrayView1<T>,
    sigma2: ArrayViewMut1<T>,
    backcast: T,
    var_bounds: ArrayView2<T>,
  ) -> Result<()>;

  /// Evaluates every row of `candidates` as a parameter vector.
  ///
  /// Returns a `(candidates.nrows(), nobs)` array; row `i` is the variance path for
  /// candidate `i`. Fails if any candidate fails.
  fn compute_variance_par(
    &self,
    candidates: ArrayView2<T>,
    resids: ArrayView1<T>,
    backcast: T,
    var_bounds: ArrayView2<T>,
  ) -> Result<Array2<T>> {
    let nobs = resids.len();
    if candidates.nrows() == 0 {
      return Ok(Array2::zeros((0, nobs)));
    }

    let paths = candidates
      .axis_iter(Axis(0))
      .into_par_iter()
      .map(|parameters| -> Result<Array1<T>> {
        let mut sigma2 = Array1::<T>::zeros(nobs);
        self.compute_variance(parameters, resids, sigma2.view_mut(), backcast, var_bounds)?;
        Ok(sigma2)
      })
      .collect::<Result<Vec<_>>>()?;

    let views = paths.iter().map(|p| p.view()).collect::<Vec<_>>();
    Ok(stack(Axis(0), &views)?)
  }
}
