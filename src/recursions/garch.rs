use impl_new_derive::ImplNew;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::ArrayViewMut1;

use crate::bounds;
use crate::bounds::assert_var_bounds;
use crate::bounds::bounds_check;
use crate::init;
use crate::params::GarchParams;
use crate::recursions::assert_same_len;
use crate::traits::FloatExt;
use crate::traits::VarianceRecursionExt;

/// GARCH / GJR-GARCH / TARCH recursion on a power-transformed variance.
///
/// \[
///   \sigma_t^{\delta}
///     = \omega
///       + \sum_{i=1}^p \alpha_i \lvert\varepsilon_{t-i}\rvert^{\delta}
///       + \sum_{i=1}^o \gamma_i \lvert\varepsilon_{t-i}\rvert^{\delta} \mathbf{1}_{\{\varepsilon_{t-i}<0\}}
///       + \sum_{j=1}^q \beta_j \, \sigma_{t-j}^{\delta}
/// \]
///
/// # Parameters
/// - `fresids`: `|resids|^power`.
/// - `sresids`: sign of the residuals (`-1`, `0` or `1`); only `< 0` is tested.
///
/// Before the start of the sample the symmetric and variance lags use `backcast` and the
/// asymmetric lags use `0.5 * backcast`, half of the missing shocks being negative in
/// expectation.
///
/// # Panics
/// Panics if the series lengths differ, `var_bounds` is not `(nobs, 2)`, or
/// `parameters.len() != 1 + p + o + q`.
#[allow(clippy::too_many_arguments)]
pub fn garch_recursion<T: FloatExt>(
  parameters: ArrayView1<T>,
  fresids: ArrayView1<T>,
  sresids: ArrayView1<T>,
  mut sigma2: ArrayViewMut1<T>,
  p: usize,
  o: usize,
  q: usize,
  backcast: T,
  var_bounds: ArrayView2<T>,
) {
  let nobs = fresids.len();
  assert_same_len(sresids.len(), nobs, "sresids");
  assert_same_len(sigma2.len(), nobs, "sigma2");
  assert_var_bounds(var_bounds, nobs);
  let params = GarchParams::from_flat(parameters, p, o, q);
  let half = T::from_f64_fast(0.5);

  for t in 0..nobs {
    let mut s = params.omega;
    for j in 0..p {
      if t > j {
        s += params.alpha[j] * fresids[t - 1 - j];
      } else {
        s += params.alpha[j] * backcast;
      }
    }
    for j in 0..o {
      if t > j {
        let indicator = if sresids[t - 1 - j] < T::zero() {
          T::one()
        } else {
          T::zero()
        };
        s += params.gamma[j] * fresids[t - 1 - j] * indicator;
      } else {
        s += params.gamma[j] * half * backcast;
      }
    }
    for j in 0..q {
      if t > j {
        s += params.beta[j] * sigma2[t - 1 - j];
      } else {
        s += params.beta[j] * backcast;
      }
    }
    sigma2[t] = bounds_check(s, var_bounds[[t, 0]], var_bounds[[t, 1]]);
  }
}

/// `-1`, `0` or `1`; unlike `signum`, zero of either sign maps to `0`.
fn sign<T: FloatExt>(x: T) -> T {
  if x > T::zero() {
    T::one()
  } else if x < T::zero() {
    -T::one()
  } else {
    T::zero()
  }
}

/// GARCH(p, o, q) family with power `power`.
///
/// `power = 2` gives GARCH (`o = 0`) and GJR-GARCH (`o > 0`); `power = 1` gives
/// AVGARCH / TARCH. The recursion runs on `sigma^power` and the output is mapped back
/// to the variance.
///
/// # Parameters
/// - `p`: Symmetric innovation lags.
/// - `o`: Asymmetric innovation lags.
/// - `q`: Lagged variance terms.
/// - `power`: Exponent applied to `|resids|`.
#[derive(ImplNew, Debug, Clone, Copy, PartialEq)]
pub struct GARCH {
  pub p: usize,
  pub o: usize,
  pub q: usize,
  pub power: f64,
}

impl Default for GARCH {
  fn default() -> Self {
    Self {
      p: 1,
      o: 0,
      q: 1,
      power: 2.0,
    }
  }
}

impl<T: FloatExt> VarianceRecursionExt<T> for GARCH {
  fn num_params(&self) -> usize {
    1 + self.p + self.o + self.q
  }

  fn name(&self) -> &'static str {
    "GARCH"
  }

  fn backcast(&self, resids: ArrayView1<T>) -> T {
    init::backcast(resids, T::from_f64_fast(self.power))
  }

  fn variance_bounds(&self, resids: ArrayView1<T>) -> Array2<T> {
    bounds::variance_bounds(resids, T::from_f64_fast(self.power))
  }

  fn compute_variance(
    &self,
    parameters: ArrayView1<T>,
    resids: ArrayView1<T>,
    mut sigma2: ArrayViewMut1<T>,
    backcast: T,
    var_bounds: ArrayView2<T>,
  ) -> anyhow::Result<()> {
    self.check_parameters(parameters)?;
    anyhow::ensure!(
      self.power > 0.0,
      "GARCH power must be positive, got {}",
      self.power
    );
    tracing::debug!(
      model = "GARCH",
      p = self.p,
      o = self.o,
      q = self.q,
      power = self.power,
      nobs = resids.len(),
      "computing variance"
    );

    let power = T::from_f64_fast(self.power);
    let fresids = resids.mapv(|r| r.abs().powf(power));
    let sresids = resids.mapv(sign);
    garch_recursion(
      parameters,
      fresids.view(),
      sresids.view(),
      sigma2.view_mut(),
      self.p,
      self.o,
      self.q,
      backcast,
      var_bounds,
    );

    if self.power != 2.0 {
      let inv_power = T::from_f64_fast(2.0 / self.power);
      sigma2.mapv_inplace(|s| s.powf(inv_power));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;
  use ndarray::Array1;

  use super::garch_recursion;
  use super::sign;
  use super::GARCH;
  use crate::recursions::tests::wide_bounds;
  use crate::traits::VarianceRecursionExt;

  #[test]
  fn garch11_has_unit_fixed_point() {
    let fresids = Array1::<f64>::ones(5);
    let sresids = Array1::<f64>::zeros(5);
    let mut sigma2 = Array1::<f64>::zeros(5);
    garch_recursion(
      array![0.05, 0.1, 0.85].view(),
      fresids.view(),
      sresids.view(),
      sigma2.view_mut(),
      1,
      0,
      1,
      1.0,
      wide_bounds(5).view(),
    );
    for s in sigma2.iter() {
      assert_relative_eq!(*s, 1.0, epsilon = 1e-14);
    }
  }

  #[test]
  fn asymmetric_term_uses_half_backcast_and_negative_shocks_only() {
    let fresids = array![4.0_f64, 9.0, 1.0];
    let sresids = array![1.0_f64, -1.0, 0.0];
    let mut sigma2 = Array1::<f64>::zeros(3);
    garch_recursion(
      array![0.1, 0.2].view(),
      fresids.view(),
      sresids.view(),
      sigma2.view_mut(),
      0,
      1,
      0,
      2.0,
      wide_bounds(3).view(),
    );
    assert_relative_eq!(sigma2[0], 0.1 + 0.2 * 0.5 * 2.0, epsilon = 1e-15);
    // positive shock at t = 0 is filtered out
    assert_relative_eq!(sigma2[1], 0.1, epsilon = 1e-15);
    assert_relative_eq!(sigma2[2], 0.1 + 0.2 * 9.0, epsilon = 1e-15);
  }

  #[test]
  fn variance_lags_read_clamped_values() {
    let fresids = Array1::<f64>::zeros(3);
    let sresids = Array1::<f64>::zeros(3);
    let mut sigma2 = Array1::<f64>::zeros(3);
    let mut bounds = wide_bounds(3);
    bounds[[0, 1]] = 2.0;
    garch_recursion(
      array![0.0, 1.0].view(),
      fresids.view(),
      sresids.view(),
      sigma2.view_mut(),
      0,
      0,
      1,
      8.0,
      bounds.view(),
    );
    let clamped = 2.0 + 4.0_f64.ln();
    assert_relative_eq!(sigma2[0], clamped, epsilon = 1e-15);
    assert_relative_eq!(sigma2[1], clamped, epsilon = 1e-15);
  }

  #[test]
  fn sign_maps_negative_zero_to_zero() {
    assert_eq!(sign(-0.0_f64), 0.0);
    assert_eq!(sign(-2.5_f64), -1.0);
    assert_eq!(sign(0.1_f64), 1.0);
  }

  #[test]
  fn gjr_model_matches_raw_recursion() {
    let resids = array![0.4_f64, -1.3, 0.2, -0.6, 1.8, -0.05];
    let params = array![0.02_f64, 0.05, 0.1, 0.85];
    let model = GARCH::new(1, 1, 1, 2.0);
    let bounds = model.variance_bounds(resids.view());
    let backcast = model.backcast(resids.view());

    let mut from_model = Array1::<f64>::zeros(6);
    model
      .compute_variance(
        params.view(),
        resids.view(),
        from_model.view_mut(),
        backcast,
        bounds.view(),
      )
      .unwrap();

    let fresids = resids.mapv(|r| r * r);
    let sresids = resids.mapv(sign);
    let mut raw = Array1::<f64>::zeros(6);
    garch_recursion(
      params.view(),
      fresids.view(),
      sresids.view(),
      raw.view_mut(),
      1,
      1,
      1,
      backcast,
      bounds.view(),
    );

    for (m, r) in from_model.iter().zip(raw.iter()) {
      assert_relative_eq!(*m, *r, max_relative = 1e-12);
    }
  }

  #[test]
  fn absolute_value_model_returns_variance() {
    let resids = array![0.4_f64, -1.3, 0.2, -0.6, 1.8];
    let params = array![0.05_f64, 0.1, 0.8];
    let model = GARCH::new(1, 0, 1, 1.0);
    let backcast: f64 = model.backcast(resids.view());
    let bounds = model.variance_bounds(resids.view());

    let mut sigma2 = Array1::<f64>::zeros(5);
    model
      .compute_variance(params.view(), resids.view(), sigma2.view_mut(), backcast, bounds.view())
      .unwrap();

    let mut sigma = backcast;
    sigma = 0.05 + 0.1 * backcast + 0.8 * sigma;
    assert_relative_eq!(sigma2[0], sigma * sigma, max_relative = 1e-12);
    sigma = 0.05 + 0.1 * 0.4 + 0.8 * sigma;
    assert_relative_eq!(sigma2[1], sigma * sigma, max_relative = 1e-12);
  }
}
