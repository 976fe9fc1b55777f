use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::ArrayViewMut1;

use crate::bounds::assert_var_bounds;
use crate::bounds::lnsigma_max;
use crate::init;
use crate::params::GarchParams;
use crate::recursions::assert_same_len;
use crate::traits::FloatExt;
use crate::traits::VarianceRecursionExt;

/// `E|z|` for `z ~ N(0, 1)`, i.e. `sqrt(2 / pi)`.
pub const NORM_CONST: f64 = 0.79788456080286541;

/// EGARCH(p, o, q) recursion in log-variance.
///
/// \[
///   \ln\sigma_t^2
///     = \omega
///       + \sum_{i=1}^p \alpha_i \bigl(\lvert z_{t-i}\rvert - E\lvert z\rvert\bigr)
///       + \sum_{i=1}^o \gamma_i \, z_{t-i}
///       + \sum_{j=1}^q \beta_j \ln\sigma_{t-j}^2,
///   \quad z_t = \varepsilon_t / \sigma_t
/// \]
///
/// Shock terms that reach before the sample are dropped; log-variance lags use
/// `backcast`, which is already on the log scale. `ln sigma2` is capped at
/// [`lnsigma_max`] before exponentiating, then the level is clamped: below `lower` it is
/// raised to `lower`, above `upper` it becomes `upper + ln(sigma2) - ln(upper)`. After a
/// clamp `lnsigma2[t]` is recomputed so that `exp(lnsigma2[t]) == sigma2[t]`.
///
/// `lnsigma2`, `std_resids` and `abs_std_resids` are overwritten; the standardized
/// residuals written at step `t` feed every later step.
///
/// # Panics
/// Panics if any series length differs from `resids.len()`, `var_bounds` is not
/// `(nobs, 2)`, or `parameters.len() != 1 + p + o + q`.
#[allow(clippy::too_many_arguments)]
pub fn egarch_recursion<T: FloatExt>(
  parameters: ArrayView1<T>,
  resids: ArrayView1<T>,
  mut sigma2: ArrayViewMut1<T>,
  p: usize,
  o: usize,
  q: usize,
  backcast: T,
  var_bounds: ArrayView2<T>,
  mut lnsigma2: ArrayViewMut1<T>,
  mut std_resids: ArrayViewMut1<T>,
  mut abs_std_resids: ArrayViewMut1<T>,
) {
  let nobs = resids.len();
  assert_same_len(sigma2.len(), nobs, "sigma2");
  assert_same_len(lnsigma2.len(), nobs, "lnsigma2");
  assert_same_len(std_resids.len(), nobs, "std_resids");
  assert_same_len(abs_std_resids.len(), nobs, "abs_std_resids");
  assert_var_bounds(var_bounds, nobs);
  let params = GarchParams::from_flat(parameters, p, o, q);
  let norm_const = T::from_f64_fast(NORM_CONST);
  let ln_max = lnsigma_max::<T>();

  for t in 0..nobs {
    let mut ln = params.omega;
    for j in 0..p {
      if t > j {
        ln += params.alpha[j] * (abs_std_resids[t - 1 - j] - norm_const);
      }
    }
    for j in 0..o {
      if t > j {
        ln += params.gamma[j] * std_resids[t - 1 - j];
      }
    }
    for j in 0..q {
      if t > j {
        ln += params.beta[j] * lnsigma2[t - 1 - j];
      } else {
        ln += params.beta[j] * backcast;
      }
    }
    if ln > ln_max {
      ln = ln_max;
    }

    let mut s = ln.exp();
    let lower = var_bounds[[t, 0]];
    let upper = var_bounds[[t, 1]];
    if s < lower {
      s = lower;
      ln = s.ln();
    } else if s > upper {
      s = upper + s.ln() - upper.ln();
      ln = s.ln();
    }

    sigma2[t] = s;
    lnsigma2[t] = ln;
    let z = resids[t] / s.sqrt();
    std_resids[t] = z;
    abs_std_resids[t] = z.abs();
  }
}

/// Exponential GARCH model.
///
/// # Parameters
/// - `p`: Magnitude (`|z|`) lags.
/// - `o`: Sign (`z`) lags.
/// - `q`: Log-variance lags.
#[derive(ImplNew, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EGARCH {
  pub p: usize,
  pub o: usize,
  pub q: usize,
}

impl Default for EGARCH {
  fn default() -> Self {
    Self { p: 1, o: 0, q: 1 }
  }
}

impl<T: FloatExt> VarianceRecursionExt<T> for EGARCH {
  fn num_params(&self) -> usize {
    1 + self.p + self.o + self.q
  }

  fn name(&self) -> &'static str {
    "EGARCH"
  }

  /// Log of the weighted squared-residual backcast.
  fn backcast(&self, resids: ArrayView1<T>) -> T {
    let level = init::backcast(resids, T::from_f64_fast(2.0));
    let backcast = level.ln();
    if !backcast.is_finite() {
      tracing::warn!(level = ?level, "EGARCH backcast is not finite");
    }
    backcast
  }

  fn compute_variance(
    &self,
    parameters: ArrayView1<T>,
    resids: ArrayView1<T>,
    sigma2: ArrayViewMut1<T>,
    backcast: T,
    var_bounds: ArrayView2<T>,
  ) -> anyhow::Result<()> {
    self.check_parameters(parameters)?;
    let nobs = resids.len();
    tracing::debug!(
      model = "EGARCH",
      p = self.p,
      o = self.o,
      q = self.q,
      nobs,
      "computing variance"
    );

    let mut lnsigma2 = Array1::<T>::zeros(nobs);
    let mut std_resids = Array1::<T>::zeros(nobs);
    let mut abs_std_resids = Array1::<T>::zeros(nobs);
    egarch_recursion(
      parameters,
      resids,
      sigma2,
      self.p,
      self.o,
      self.q,
      backcast,
      var_bounds,
      lnsigma2.view_mut(),
      std_resids.view_mut(),
      abs_std_resids.view_mut(),
    );
    Ok(())
  }
}
