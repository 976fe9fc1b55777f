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

/// ARCH(p) conditional variance recursion.
///
/// \[
///   \sigma_t^2 = \omega + \sum_{i=1}^p \alpha_i \, \varepsilon_{t-i}^2
/// \]
///
/// Lags before the first observation contribute `alpha_i * backcast`.
///
/// # Panics
/// Panics if the series lengths differ, `var_bounds` is not `(nobs, 2)`, or
/// `parameters.len() != 1 + p`.
pub fn arch_recursion<T: FloatExt>(
  parameters: ArrayView1<T>,
  resids: ArrayView1<T>,
  mut sigma2: ArrayViewMut1<T>,
  p: usize,
  backcast: T,
  var_bounds: ArrayView2<T>,
) {
  let nobs = resids.len();
  assert_same_len(sigma2.len(), nobs, "sigma2");
  assert_var_bounds(var_bounds, nobs);
  let params = ArchParams::from_flat(parameters, p);

  for t in 0..nobs {
    let mut s = params.omega;
    for i in 0..p {
      if t > i {
        let r = resids[t - i - 1];
        s += params.alpha[i] * (r * r);
      } else {
        s += params.alpha[i] * backcast;
      }
    }
    sigma2[t] = bounds_check(s, var_bounds[[t, 0]], var_bounds[[t, 1]]);
  }
}

/// ARCH(p) model.
///
/// # Parameters
/// - `p`: Number of lagged squared residuals.
#[derive(ImplNew, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ARCH {
  pub p: usize,
}

impl Default for ARCH {
  fn default() -> Self {
    Self { p: 1 }
  }
}

impl<T: FloatExt> VarianceRecursionExt<T> for ARCH {
  fn num_params(&self) -> usize {
    1 + self.p
  }

  fn name(&self) -> &'static str {
    "ARCH"
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
    tracing::debug!(model = "ARCH", p = self.p, nobs = resids.len(), "computing variance");
    arch_recursion(parameters, resids, sigma2, self.p, backcast, var_bounds);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;
  use ndarray::Array1;

  use super::arch_recursion;
  use super::ARCH;
  use crate::recursions::harch::harch_recursion;
  use crate::recursions::tests::wide_bounds;
  use crate::traits::VarianceRecursionExt;

  #[test]
  fn arch1_is_steady_for_unit_residuals() {
    let resids = Array1::<f64>::ones(5);
    let mut sigma2 = Array1::<f64>::zeros(5);
    arch_recursion(
      array![0.1, 0.2].view(),
      resids.view(),
      sigma2.view_mut(),
      1,
      1.0,
      wide_bounds(5).view(),
    );
    for s in sigma2.iter() {
      assert_relative_eq!(*s, 0.3, epsilon = 1e-15);
    }
  }

  #[test]
  fn lags_switch_from_backcast_to_residuals() {
    let resids = array![2.0_f64, -3.0, 0.5];
    let mut sigma2 = Array1::<f64>::zeros(3);
    arch_recursion(
      array![0.1, 0.2, 0.3].view(),
      resids.view(),
      sigma2.view_mut(),
      2,
      1.5,
      wide_bounds(3).view(),
    );
    assert_relative_eq!(sigma2[0], 0.1 + 0.2 * 1.5 + 0.3 * 1.5, epsilon = 1e-14);
    assert_relative_eq!(sigma2[1], 0.1 + 0.2 * 4.0 + 0.3 * 1.5, epsilon = 1e-14);
    assert_relative_eq!(sigma2[2], 0.1 + 0.2 * 9.0 + 0.3 * 4.0, epsilon = 1e-14);
  }

  #[test]
  fn matches_harch_with_one_unit_window() {
    let resids = array![0.3_f64, -1.1, 0.7, 2.2, -0.4, 0.05];
    let params = array![0.02_f64, 0.15];
    let bounds = wide_bounds(6);

    let mut arch = Array1::<f64>::zeros(6);
    arch_recursion(params.view(), resids.view(), arch.view_mut(), 1, 0.8, bounds.view());
    let mut harch = Array1::<f64>::zeros(6);
    harch_recursion(params.view(), resids.view(), harch.view_mut(), &[1], 0.8, bounds.view());

    for (a, h) in arch.iter().zip(harch.iter()) {
      assert_relative_eq!(*a, *h, epsilon = 1e-14);
    }
  }

  #[test]
  fn repeated_unit_windows_collapse_to_arch1() {
    // every length-one window reads resids[t - 1], so the loadings add up
    let resids = array![0.3_f64, -1.1, 0.7, 2.2, -0.4, 0.05];
    let bounds = wide_bounds(6);

    let mut arch = Array1::<f64>::zeros(6);
    arch_recursion(
      array![0.02, 0.3].view(),
      resids.view(),
      arch.view_mut(),
      1,
      0.8,
      bounds.view(),
    );
    let mut harch = Array1::<f64>::zeros(6);
    harch_recursion(
      array![0.02, 0.15, 0.1, 0.05].view(),
      resids.view(),
      harch.view_mut(),
      &[1, 1, 1],
      0.8,
      bounds.view(),
    );

    for (a, h) in arch.iter().zip(harch.iter()) {
      assert_relative_eq!(*a, *h, epsilon = 1e-14);
    }
  }

  #[test]
  fn model_rejects_non_finite_parameters() {
    let model = ARCH::new(1);
    let resids = Array1::<f64>::ones(4);
    let mut sigma2 = Array1::<f64>::zeros(4);
    let result = model.compute_variance(
      array![0.1, f64::NAN].view(),
      resids.view(),
      sigma2.view_mut(),
      1.0,
      wide_bounds(4).view(),
    );
    assert!(result.is_err());
  }

  #[test]
  fn mismatched_output_length_panics() {
    let result = std::panic::catch_unwind(|| {
      let resids = Array1::<f64>::ones(4);
      let mut sigma2 = Array1::<f64>::zeros(3);
      arch_recursion(
        array![0.1, 0.2].view(),
        resids.view(),
        sigma2.view_mut(),
        1,
        1.0,
        wide_bounds(4).view(),
      );
    });
    assert!(result.is_err());
  }
}
