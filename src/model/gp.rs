//! Gaussian-process regression with a constant × RBF kernel.
//!
//! The GP has a zero prior mean and the kernel
//!
//! `k(x1, x2) = c · exp(-‖x1 - x2‖² / (2 l²))`
//!
//! with a signal scale `c` and an isotropic length scale `l`. A small
//! `alpha` is added to the kernel diagonal for numerical stability.
//!
//! # Fitting
//!
//! 1. **Hyperparameters**: `(log c, log l)` maximize the log marginal
//!    likelihood. A bounded Nelder–Mead search runs from the configured
//!    initial point and from `n_restarts` further points drawn log-uniformly
//!    inside the bounds; the best optimum wins. Restarts that exhaust their
//!    iteration budget are expected and only logged at debug level.
//! 2. **Posterior**: the kernel matrix is factorised by Cholesky; if that
//!    fails, `alpha` is raised tenfold up to `1e-4` before giving up with
//!    [`Error::ModelFit`].
//!
//! Predictions return the posterior mean `k*ᵀ K⁻¹ y` and the posterior
//! standard deviation `sqrt(max(0, c - k*ᵀ K⁻¹ k*))`.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `constant` | 1.0 | Initial signal scale `c` |
//! | `constant_bounds` | (1e-3, 1e3) | Search bounds for `c` |
//! | `length_scale` | 10.0 | Initial length scale `l` |
//! | `length_scale_bounds` | (1e-2, 1e2) | Search bounds for `l` |
//! | `n_restarts` | 9 | Extra random starts for the hyperparameter search |
//! | `alpha` | 1e-10 | Value added to the kernel diagonal |
//! | `max_iterations` | 200 | Nelder–Mead iterations per start |
//! | `seed` | 42 | RNG seed for the restart points |
//!
//! # Examples
//!
//! ```
//! use sequential_learning::model::gp::GaussianProcess;
//!
//! let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
//! let y = vec![0.0, 0.8, 0.9, 0.1];
//!
//! let fitted = GaussianProcess::default().fit(&x, &y).unwrap();
//! let (mean, std) = fitted.predict(&[1.0]).unwrap();
//! assert!((mean - 0.8).abs() < 1e-3);
//! assert!(std < 1e-2);
//! ```

use core::f64::consts::PI;

use nalgebra::linalg::Cholesky;
use nalgebra::{DMatrix, DVector, Dyn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::nelder_mead::{self, Options};
use super::{Prediction, Surrogate, check_row_width, check_training_data};
use crate::error::{Error, Result};
use crate::rng_util;

/// Largest diagonal jitter tried before factorisation is reported as failed.
const MAX_JITTER: f64 = 1e-4;
/// Jitter used when the configured `alpha` is zero and factorisation fails.
const MIN_JITTER: f64 = 1e-10;

/// Gaussian-process settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaussianProcessConfig {
    /// Initial signal scale (default: 1.0).
    pub constant: f64,
    /// Bounds for the signal scale (default: `(1e-3, 1e3)`).
    pub constant_bounds: (f64, f64),
    /// Initial length scale (default: 10.0).
    pub length_scale: f64,
    /// Bounds for the length scale (default: `(1e-2, 1e2)`).
    pub length_scale_bounds: (f64, f64),
    /// Random restarts of the hyperparameter search (default: 9).
    pub n_restarts: usize,
    /// Value added to the kernel diagonal (default: 1e-10).
    pub alpha: f64,
    /// Nelder–Mead iterations per start (default: 200).
    pub max_iterations: usize,
    /// Seed for restart points (default: 42).
    pub seed: u64,
}

impl Default for GaussianProcessConfig {
    fn default() -> Self {
        Self {
            constant: 1.0,
            constant_bounds: (1e-3, 1e3),
            length_scale: 10.0,
            length_scale_bounds: (1e-2, 1e2),
            n_restarts: 9,
            alpha: 1e-10,
            max_iterations: 200,
            seed: 42,
        }
    }
}

/// Constant × RBF kernel hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Kernel {
    /// Signal scale `c`.
    pub constant: f64,
    /// Isotropic length scale `l`.
    pub length_scale: f64,
}

impl Kernel {
    /// Evaluates `k(a, b)`.
    #[must_use]
    pub fn eval(&self, a: &[f64], b: &[f64]) -> f64 {
        let sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
        self.constant * (-0.5 * sq / (self.length_scale * self.length_scale)).exp()
    }

    fn from_log(theta: &[f64]) -> Self {
        Self {
            constant: theta[0].exp(),
            length_scale: theta[1].exp(),
        }
    }
}

/// Gaussian-process surrogate. See the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct GaussianProcess {
    config: GaussianProcessConfig,
}

impl GaussianProcess {
    #[must_use]
    pub fn new(config: GaussianProcessConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GaussianProcessConfig {
        &self.config
    }

    /// Fits hyperparameters and the posterior on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for malformed training data
    /// and [`Error::ModelFit`] if the kernel matrix cannot be factorised.
    pub fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<FittedGp> {
        check_training_data(x, y)?;
        let kernel = self.optimize_kernel(x, y);
        let cholesky = factorize(x, kernel, self.config.alpha).ok_or_else(|| {
            Error::ModelFit(format!(
                "kernel matrix is not positive definite (c = {}, l = {})",
                kernel.constant, kernel.length_scale
            ))
        })?;
        let y_vec = DVector::from_column_slice(y);
        let weights = cholesky.solve(&y_vec);
        let log_marginal_likelihood = log_likelihood_from(&cholesky, &y_vec, &weights);
        Ok(FittedGp {
            kernel,
            x_train: x.to_vec(),
            cholesky,
            weights,
            log_marginal_likelihood,
        })
    }

    fn log_bounds(&self) -> [(f64, f64); 2] {
        let (c_lo, c_hi) = self.config.constant_bounds;
        let (l_lo, l_hi) = self.config.length_scale_bounds;
        [(c_lo.ln(), c_hi.ln()), (l_lo.ln(), l_hi.ln())]
    }

    /// Multi-start maximization of the log marginal likelihood.
    fn optimize_kernel(&self, x: &[Vec<f64>], y: &[f64]) -> Kernel {
        let bounds = self.log_bounds();
        let initial = Kernel {
            constant: self.config.constant,
            length_scale: self.config.length_scale,
        };
        let objective = |theta: &[f64]| {
            log_marginal_likelihood(x, y, Kernel::from_log(theta), self.config.alpha)
                .map_or(f64::INFINITY, |lml| -lml)
        };
        let options = Options {
            max_iter: self.config.max_iterations,
            x_tol: 1e-6,
            f_tol: 1e-8,
        };

        let mut rng = fastrand::Rng::with_seed(self.config.seed);
        let mut starts = vec![vec![initial.constant.ln(), initial.length_scale.ln()]];
        starts.extend((0..self.config.n_restarts).map(|_| {
            bounds
                .iter()
                .map(|&(lo, hi)| rng_util::f64_range(&mut rng, lo, hi))
                .collect()
        }));

        let mut best: Option<nelder_mead::Minimum> = None;
        for start in &starts {
            let minimum = nelder_mead::minimize(&objective, start, &bounds, options);
            trace_debug!(
                neg_log_likelihood = minimum.value,
                converged = minimum.converged,
                "gp hyperparameter search"
            );
            if best.as_ref().is_none_or(|b| minimum.value < b.value) {
                best = Some(minimum);
            }
        }

        match best {
            Some(m) if m.value.is_finite() => Kernel::from_log(&m.point),
            _ => initial,
        }
    }
}

impl Surrogate for GaussianProcess {
    fn fit_predict(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[f64],
        x_test: &[Vec<f64>],
    ) -> Result<Prediction> {
        let fitted = self.fit(x_train, y_train)?;
        let (mean, std) = x_test
            .iter()
            .map(|row| fitted.predict(row))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();
        Ok(Prediction { mean, std })
    }
}

/// A fitted Gaussian-process posterior.
pub struct FittedGp {
    kernel: Kernel,
    x_train: Vec<Vec<f64>>,
    /// Cholesky factor of `K + alpha I`.
    cholesky: Cholesky<f64, Dyn>,
    /// `(K + alpha I)^{-1} y`.
    weights: DVector<f64>,
    log_marginal_likelihood: f64,
}

impl core::fmt::Debug for FittedGp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FittedGp")
            .field("kernel", &self.kernel)
            .field("n_train", &self.x_train.len())
            .field("log_marginal_likelihood", &self.log_marginal_likelihood)
            .finish_non_exhaustive()
    }
}

impl FittedGp {
    /// The fitted kernel hyperparameters.
    #[must_use]
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    #[must_use]
    pub fn log_marginal_likelihood(&self) -> f64 {
        self.log_marginal_likelihood
    }

    /// Number of features the posterior was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.x_train.first().map_or(0, Vec::len)
    }

    /// Returns the posterior `(mean, std)` at one point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `x` does not have
    /// [`n_features`](Self::n_features) values.
    pub fn predict(&self, x: &[f64]) -> Result<(f64, f64)> {
        check_row_width(x, self.n_features())?;
        let k_star = DVector::from_fn(self.x_train.len(), |i, _| {
            self.kernel.eval(x, &self.x_train[i])
        });
        let mean = k_star.dot(&self.weights);
        let v = self.cholesky.solve(&k_star);
        let var = (self.kernel.constant - k_star.dot(&v)).max(0.0);
        Ok((mean, var.sqrt()))
    }
}

/// Build the kernel matrix `K + alpha I`.
fn kernel_matrix(x: &[Vec<f64>], kernel: Kernel, alpha: f64) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| {
        let k = kernel.eval(&x[i], &x[j]);
        if i == j { k + alpha } else { k }
    })
}

/// Cholesky factorisation with jitter escalation.
#[allow(clippy::float_cmp)]
fn factorize(x: &[Vec<f64>], kernel: Kernel, alpha: f64) -> Option<Cholesky<f64, Dyn>> {
    let mut jitter = alpha;
    loop {
        if let Some(cholesky) = Cholesky::new(kernel_matrix(x, kernel, jitter)) {
            return Some(cholesky);
        }
        if jitter >= MAX_JITTER {
            return None;
        }
        jitter = if jitter == 0.0 { MIN_JITTER } else { jitter * 10.0 };
    }
}

/// `log p(y | X, θ) = -½ yᵀα - Σ log Lᵢᵢ - n/2 log 2π`
fn log_marginal_likelihood(x: &[Vec<f64>], y: &[f64], kernel: Kernel, alpha: f64) -> Option<f64> {
    let cholesky = factorize(x, kernel, alpha)?;
    let y_vec = DVector::from_column_slice(y);
    let weights = cholesky.solve(&y_vec);
    let lml = log_likelihood_from(&cholesky, &y_vec, &weights);
    lml.is_finite().then_some(lml)
}

#[allow(clippy::cast_precision_loss)]
fn log_likelihood_from(
    cholesky: &Cholesky<f64, Dyn>,
    y: &DVector<f64>,
    weights: &DVector<f64>,
) -> f64 {
    let n = y.len() as f64;
    let log_det: f64 = cholesky.l_dirty().diagonal().iter().map(|d| d.ln()).sum();
    -0.5 * y.dot(weights) - log_det - 0.5 * n * (2.0 * PI).ln()
}
