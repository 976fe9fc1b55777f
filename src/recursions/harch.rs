use impl_new_derive::ImplNew;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::ArrayViewMut1;

use crate::bounds::assert_var_bounds;
use crate::bounds::bounds_check;
use crate::params::ArchParams;
use crate::recursions::assert_same_len;
use crate::traits::FloatExt;
use crate::traits::VarianceRecursionExt;

/// HARCH conditional variance recursion.
///
/// \[
///   \sigma_t^2 = \omega + \sum_{i=1}^{k} \frac{\alpha_i}{l_i} \sum_{j=1}^{l_i} \varepsilon_{t-j}^2
/// \]
///
/// Squared residuals before the start of the sample are replaced by `backcast`.
/// `parameters` is `[omega, alpha_1, ..., alpha_k]` with one coefficient per entry of `lags`.
///
/// # Panics
/// Panics if the series lengths differ, `var_bounds` is not `(nobs, 2)`, a lag is zero,
/// or `parameters.len() != 1 + lags.len()`.
pub fn harch_recursion<T: FloatExt>(
  parameters: ArrayView1<T>,
  resids: ArrayView1<T>,
  mut sigma2: ArrayViewMut1<T>,
  lags: &[usize],
  backcast: T,
  var_bounds: ArrayView2<T>,
) {
  let nobs = resids.len();
  assert_same_len(sigma2.len(), nobs, "sigma2");
  assert_var_bounds(var_bounds, nobs);
  assert!(lags.iter().all(|&l| l > 0), "HARCH lag windows must be positive");
  let params = ArchParams::from_flat(parameters, lags.len());

  for t in 0..nobs {
    let mut s = params.omega;
    for (i, &lag) in lags.iter().enumerate() {
      let param = params.alpha[i] / T::from_usize_(lag);
      for j in 0..lag {
        if t > j {
          let r = resids[t - j - 1];
          s += param * r * r;
        } else {
          s += param * backcast;
        }
      }
    }
    sigma2[t] = bounds_check(s, var_bounds[[t, 0]], var_bounds[[t, 1]]);
  }
}

/// Heterogeneous ARCH model over averaged lag windows.
///
/// # Parameters
/// - `lags`: Window lengths, e.g. `[1, 5, 22]` for daily, weekly and monthly components.
#[derive(ImplNew, Debug, Clone, PartialEq, Eq)]
pub struct HARCH {
  pub lags: Vec<usize>,
}

impl Default for HARCH {
  fn default() -> Self {
    Self {
      lags: vec![1, 5, 22],
    }
  }
}

impl<T: FloatExt> VarianceRecursionExt<T> for HARCH {
  fn num_params(&self) -> usize {
    1 + self.lags.len()
  }

  fn name(&self) -> &'static str {
    "HARCH"
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
    anyhow::ensure!(
      self.lags.iter().all(|&l| l > 0),
      "HARCH lag windows must be positive, got {:?}",
      self.lags
    );
    tracing::debug!(model = "HARCH", lags = ?self.lags, nobs = resids.len(), "computing variance");
    harch_recursion(parameters, resids, sigma2, &self.lags, backcast, var_bounds);
    Ok(())
  }
}
