//! # Bounds
//!
//! $$
//! \tilde\sigma^2=\begin{cases}
//! \underline b & \sigma^2<\underline b\\
//! \bar b+\ln(\sigma^2/\bar b) & \sigma^2>\bar b,\ \sigma^2<\infty\\
//! \bar b+1000 & \sigma^2=\infty\\
//! \sigma^2 & \text{otherwise}
//! \end{cases}
//! $$
//!
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;

use crate::init;
use crate::init::EWMA_LAMBDA;
use crate::traits::FloatExt;

/// Fixed penalty added to the upper bound when the raw variance is infinite.
pub const INFINITE_PENALTY: f64 = 1000.0;

/// Ceiling for a log-variance so that `exp` stays finite.
pub fn lnsigma_max<T: FloatExt>() -> T {
  T::max_value().ln() - T::from_f64_fast(0.1)
}

/// Clamps a raw variance into `[lower, upper]`, penalising logarithmically above `upper`.
///
/// Values below `lower` are raised to `lower`. Finite values above `upper` map to
/// `upper + ln(sigma2 / upper)`, which keeps ordering and grows slowly. Infinite values
/// map to `upper + 1000`.
#[inline]
pub fn bounds_check<T: FloatExt>(sigma2: T, lower: T, upper: T) -> T {
  if sigma2 < lower {
    lower
  } else if sigma2 > upper {
    if sigma2.is_infinite() {
      upper + T::from_f64_fast(INFINITE_PENALTY)
    } else {
      upper + (sigma2 / upper).ln()
    }
  } else {
    sigma2
  }
}

/// Asserts that `var_bounds` has one `(lower, upper)` row per observation.
pub(crate) fn assert_var_bounds<T: FloatExt>(var_bounds: ArrayView2<T>, nobs: usize) {
  assert_eq!(
    var_bounds.dim(),
    (nobs, 2),
    "var_bounds must have shape (nobs, 2)"
  );
  debug_assert!(
    var_bounds.rows().into_iter().all(|b| b[0] <= b[1]),
    "var_bounds lower must not exceed upper"
  );
}

/// Builds the default `(nobs, 2)` bounds table for a residual series.
///
/// Bounds track an EWMA variance (`lambda = 0.94`) seeded with the weighted backcast:
/// `ewma / 1e6` below and `ewma * 1e6` above. Lower bounds are floored at
/// `var(resids) / 1e8`; upper bounds are kept within
/// `[1 + max(resids^2), 1e7 * (1 + max(resids^2))]`. For `power != 2` each entry is
/// raised to `power / 2` so the table applies to the transformed variance.
///
/// # Panics
/// Panics if `resids` is empty.
pub fn variance_bounds<T: FloatExt>(resids: ArrayView1<T>, power: T) -> Array2<T> {
  let nobs = resids.len();
  assert!(nobs > 0, "variance bounds require at least one residual");

  let two = T::from_f64_fast(2.0);
  let initial = init::backcast(resids, two);
  let mut ewma = Array1::<T>::zeros(nobs);
  init::ewma_recursion(
    T::from_f64_fast(EWMA_LAMBDA),
    resids,
    ewma.view_mut(),
    initial,
  );

  let n = T::from_usize_(nobs);
  let mean = resids.iter().copied().sum::<T>() / n;
  let var = resids.iter().map(|&r| (r - mean) * (r - mean)).sum::<T>() / n;
  let max_sq = resids
    .iter()
    .map(|&r| r * r)
    .fold(T::neg_infinity(), |acc, r2| acc.max(r2));

  let scale = T::from_f64_fast(1e6);
  let lower_bound = var / T::from_f64_fast(1e8);
  let min_upper_bound = T::one() + max_sq;
  let upper_bound = T::from_f64_fast(1e7) * min_upper_bound;
  let exponent = power / two;

  let mut var_bounds = Array2::<T>::zeros((nobs, 2));
  for (mut row, &v) in var_bounds.rows_mut().into_iter().zip(ewma.iter()) {
    let mut lower = v / scale;
    let mut upper = v * scale;
    if lower < lower_bound {
      lower = lower_bound;
    }
    if upper < min_upper_bound {
      upper = min_upper_bound;
    }
    if upper > upper_bound {
      upper = upper_bound;
    }
    if power != two {
      lower = lower.powf(exponent);
      upper = upper.powf(exponent);
    }
    row[0] = lower;
    row[1] = upper;
  }

  var_bounds
}
