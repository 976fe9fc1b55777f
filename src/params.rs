//! # Params
//!
//! $$
//! \theta=(\omega,\ \alpha_{1:p},\ \gamma_{1:o},\ \beta_{1:q})
//! $$
//!
//! Structured, borrowed views over the flat positional parameter vectors handed in by
//! an optimizer. Parsing happens once per recursion call.
//!
use ndarray::s;
use ndarray::ArrayView1;

use crate::traits::FloatExt;

/// Intercept plus one coefficient per lag (ARCH) or per lag window (HARCH).
#[derive(Debug, Clone, Copy)]
pub struct ArchParams<'a, T> {
  pub omega: T,
  pub alpha: ArrayView1<'a, T>,
}

impl<'a, T: FloatExt> ArchParams<'a, T> {
  /// # Panics
  /// Panics if `parameters.len() != 1 + p`.
  pub fn from_flat(parameters: ArrayView1<'a, T>, p: usize) -> Self {
    assert_eq!(
      parameters.len(),
      1 + p,
      "parameter vector must hold an intercept and {p} lag coefficients"
    );
    Self {
      omega: parameters[0],
      alpha: parameters.slice_move(s![1..]),
    }
  }
}

/// Layout shared by the GARCH and EGARCH recursions.
#[derive(Debug, Clone, Copy)]
pub struct GarchParams<'a, T> {
  /// Intercept
  pub omega: T,
  /// Symmetric innovation coefficients, one per lag (`p`)
  pub alpha: ArrayView1<'a, T>,
  /// Asymmetric innovation coefficients, one per lag (`o`)
  pub gamma: ArrayView1<'a, T>,
  /// Lagged (log-)variance coefficients (`q`)
  pub beta: ArrayView1<'a, T>,
}

impl<'a, T: FloatExt> GarchParams<'a, T> {
  /// # Panics
  /// Panics if `parameters.len() != 1 + p + o + q`.
  pub fn from_flat(parameters: ArrayView1<'a, T>, p: usize, o: usize, q: usize) -> Self {
    assert_eq!(
      parameters.len(),
      1 + p + o + q,
      "parameter vector must have length 1 + p + o + q"
    );
    let alpha_end = 1 + p;
    let gamma_end = alpha_end + o;
    Self {
      omega: parameters[0],
      alpha: parameters.slice_move(s![1..alpha_end]),
      gamma: parameters.slice_move(s![alpha_end..gamma_end]),
      beta: parameters.slice_move(s![gamma_end..]),
    }
  }
}

/// `(omega, alpha, gamma)` for the MIDAS recursion. `gamma` is zero for symmetric models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidasParams<T> {
  pub omega: T,
  pub alpha: T,
  pub gamma: T,
}

impl<T: FloatExt> MidasParams<T> {
  /// # Panics
  /// Panics if `parameters.len() != 3`.
  pub fn from_flat(parameters: ArrayView1<T>) -> Self {
    assert_eq!(
      parameters.len(),
      3,
      "MIDAS recursion parameters are (omega, alpha, gamma)"
    );
    Self {
      omega: parameters[0],
      alpha: parameters[1],
      gamma: parameters[2],
    }
  }
}
