//! # Init
//!
//! $$
//! \hat\sigma^2_0=\frac{\sum_{i=0}^{\tau-1}\lambda^i\lvert\varepsilon_i\rvert^{\delta}}{\sum_{i=0}^{\tau-1}\lambda^i},
//! \qquad \tau=\min(75,n),\ \lambda=0.94
//! $$
//!
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayViewMut1;

use crate::recursions::garch::garch_recursion;
use crate::traits::FloatExt;

/// RiskMetrics decay used for the backcast weights and the EWMA bounds variance.
pub const EWMA_LAMBDA: f64 = 0.94;
/// Number of leading observations that enter the backcast.
pub const BACKCAST_TAU: usize = 75;

/// Exponentially weighted mean of `|resids|^power` over the first `min(75, nobs)` points.
///
/// # Panics
/// Panics if `resids` is empty.
pub fn backcast<T: FloatExt>(resids: ArrayView1<T>, power: T) -> T {
  assert!(!resids.is_empty(), "backcast requires at least one residual");

  let lambda = T::from_f64_fast(EWMA_LAMBDA);
  let mut weight = T::one();
  let mut total = T::zero();
  let mut acc = T::zero();
  for &r in resids.iter().take(BACKCAST_TAU) {
    acc += weight * r.abs().powf(power);
    total += weight;
    weight = weight * lambda;
  }

  acc / total
}

/// EWMA variance `sigma2[t] = (1 - lambda) * resids[t-1]^2 + lambda * sigma2[t-1]`.
///
/// Runs through [`garch_recursion`] as a GARCH(1,0,1) with zero intercept and bounds wide
/// enough to never bind, so `sigma2[0] = backcast`.
pub fn ewma_recursion<T: FloatExt>(
  lambda: T,
  resids: ArrayView1<T>,
  sigma2: ArrayViewMut1<T>,
  backcast: T,
) {
  let nobs = resids.len();
  let parameters = Array1::from_vec(vec![T::zero(), T::one() - lambda, lambda]);
  let fresids = resids.mapv(|r| r * r);

  let mut var_bounds = Array2::<T>::zeros((nobs, 2));
  var_bounds.column_mut(0).fill(-T::one());
  var_bounds.column_mut(1).fill(T::max_value());

  garch_recursion(
    parameters.view(),
    fresids.view(),
    resids,
    sigma2,
    1,
    0,
    1,
    backcast,
    var_bounds.view(),
  );
}
