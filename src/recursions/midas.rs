use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::ArrayViewMut1;
use statrs::function::gamma::ln_gamma;

use crate::bounds::assert_var_bounds;
use crate::bounds::bounds_check;
use crate::params::MidasParams;
use crate::recursions::assert_same_len;
use crate::traits::FloatExt;
use crate::traits::VarianceRecursionExt;

/// MIDAS conditional variance recursion with a fixed weight kernel.
///
/// \[
///   \sigma_t^2 = \omega + \sum_{i=1}^{m} \phi_i \bigl(\alpha + \gamma \mathbf{1}_{\{\varepsilon_{t-i}<0\}}\bigr)\varepsilon_{t-i}^2
/// \]
///
/// `parameters` is `(omega, alpha, gamma)` and `weights` holds `phi_1..phi_m`, which
/// should sum to one. Lags before the sample contribute
/// `(alpha + 0.5 * gamma) * phi_i * backcast`.
///
/// # Panics
/// Panics if the series lengths differ, `var_bounds` is not `(nobs, 2)`, or
/// `parameters.len() != 3`.
pub fn midas_recursion<T: FloatExt>(
  parameters: ArrayView1<T>,
  weights: ArrayView1<T>,
  resids: ArrayView1<T>,
  mut sigma2: ArrayViewMut1<T>,
  backcast: T,
  var_bounds: ArrayView2<T>,
) {
  let nobs = resids.len();
  assert_same_len(sigma2.len(), nobs, "sigma2");
  assert_var_bounds(var_bounds, nobs);
  let params = MidasParams::from_flat(parameters);
  let half = T::from_f64_fast(0.5);

  let aw = weights.mapv(|w| params.alpha * w);
  let gw = weights.mapv(|w| params.gamma * w);
  let m = weights.len();

  for t in 0..nobs {
    let mut s = params.omega;
    for i in 0..m {
      if t > i {
        let r = resids[t - i - 1];
        let indicator = if r < T::zero() { T::one() } else { T::zero() };
        s += (aw[i] + gw[i] * indicator) * (r * r);
      } else {
        s += (aw[i] + half * gw[i]) * backcast;
      }
    }
    sigma2[t] = bounds_check(s, var_bounds[[t, 0]], var_bounds[[t, 1]]);
  }
}

/// Normalized hyperbolic lag weights.
///
/// \[
///   \phi_j \propto \frac{\Gamma(j+\theta)}{\Gamma(j+1)\Gamma(\theta)}, \quad j = 1, \ldots, m
/// \]
///
/// `theta` is floored at machine epsilon. Evaluated through log-gamma so large `m` does not
/// overflow.
pub fn hyperbolic_weights<T: FloatExt>(m: usize, theta: T) -> Array1<T> {
  let theta = theta.to_f64_fast().max(f64::EPSILON);
  let ln_gamma_theta = ln_gamma(theta);
  let raw = (1..=m)
    .map(|j| {
      let j = j as f64;
      (ln_gamma(j + theta) - ln_gamma(j + 1.0) - ln_gamma_theta).exp()
    })
    .collect::<Vec<f64>>();
  let total = raw.iter().sum::<f64>();
  raw
    .into_iter()
    .map(|w| T::from_f64_fast(w / total))
    .collect()
}

/// MIDAS model with hyperbolic weights.
///
/// Parameters are `(omega, alpha, theta)` or, when `asym` is set,
/// `(omega, alpha, gamma, theta)`.
///
/// # Parameters
/// - `m`: Number of lags in the kernel.
/// - `asym`: Include the negative-shock loading `gamma`.
#[derive(ImplNew, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MIDAS {
  pub m: usize,
  pub asym: bool,
}

impl Default for MIDAS {
  fn default() -> Self {
    Self { m: 22, asym: false }
  }
}

impl<T: FloatExt> VarianceRecursionExt<T> for MIDAS {
  fn num_params(&self) -> usize {
    3 + usize::from(self.asym)
  }

  fn name(&self) -> &'static str {
    "MIDAS"
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
    anyhow::ensure!(self.m > 0, "MIDAS needs at least one lag");
    tracing::debug!(
      model = "MIDAS",
      m = self.m,
      asym = self.asym,
      nobs = resids.len(),
      "computing variance"
    );

    let omega = parameters[0];
    let alpha = parameters[1];
    let gamma = if self.asym { parameters[2] } else { T::zero() };
    let theta = parameters[parameters.len() - 1];
    let weights = hyperbolic_weights(self.m, theta);
    let recursion_params = Array1::from_vec(vec![omega, alpha, gamma]);

    midas_recursion(
      recursion_params.view(),
      weights.view(),
      resids,
      sigma2,
      backcast,
      var_bounds,
    );
    Ok(())
  }
}
