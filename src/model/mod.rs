//! Surrogate models: fit on labeled rows, predict mean and uncertainty on
//! unlabeled rows.
//!
//! Two interchangeable regressors implement the [`Surrogate`] trait:
//!
//! | Model | Uncertainty | Module |
//! |-------|-------------|--------|
//! | [`RandomForest`] | Std across trees | [`forest`] |
//! | [`GaussianProcess`] | Posterior std | [`gp`] |
//!
//! [`Regressor`] selects one of them from an [`Experiment`], and
//! [`fit_and_predict`] runs it once per target, returning a [`ModelOutput`]
//! whose tables are indexed by the experiment's unlabeled rows.

pub mod forest;
pub mod gp;
mod nelder_mead;

pub use forest::{FittedForest, RandomForest, RandomForestConfig};
pub use gp::{FittedGp, GaussianProcess, GaussianProcessConfig, Kernel};

use crate::error::{Error, Result};
use crate::experiment::Experiment;
use crate::table::Table;
use crate::types::{ModelKind, RowId};

/// Per-row predictive mean and standard deviation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prediction {
    /// Predicted value per query row.
    pub mean: Vec<f64>,
    /// Predictive standard deviation per query row.
    pub std: Vec<f64>,
}

/// A regression model that reports an uncertainty with every prediction.
///
/// Implementations must be deterministic: fitting the same data twice
/// yields bit-identical predictions.
pub trait Surrogate {
    /// Fits on `(x_train, y_train)` and predicts every row of `x_test`.
    ///
    /// # Errors
    ///
    /// Returns an error if the training data is malformed or the model
    /// cannot be fitted.
    fn fit_predict(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[f64],
        x_test: &[Vec<f64>],
    ) -> Result<Prediction>;
}

pub(crate) fn check_training_data(x: &[Vec<f64>], y: &[f64]) -> Result<()> {
    if x.is_empty() {
        return Err(Error::config("cannot fit a model without training rows"));
    }
    if x.len() != y.len() {
        return Err(Error::config(format!(
            "{} training rows but {} target values",
            x.len(),
            y.len()
        )));
    }
    let width = x[0].len();
    if x.iter().any(|row| row.len() != width) {
        return Err(Error::config("training rows have different lengths"));
    }
    Ok(())
}

pub(crate) fn check_row_width(row: &[f64], n_features: usize) -> Result<()> {
    if row.len() != n_features {
        return Err(Error::config(format!(
            "model was fitted on {n_features} features but the row has {}",
            row.len()
        )));
    }
    Ok(())
}

/// The regressor selected by an experiment.
#[derive(Clone, Debug)]
pub enum Regressor {
    RandomForest(RandomForest),
    GaussianProcess(GaussianProcess),
}

impl Regressor {
    /// Builds the regressor named by [`Experiment::model`] with the
    /// experiment's model settings.
    #[must_use]
    pub fn for_experiment(experiment: &Experiment) -> Self {
        match experiment.model() {
            ModelKind::RandomForest => {
                Self::RandomForest(RandomForest::new(experiment.random_forest_config().clone()))
            }
            ModelKind::GaussianProcess => Self::GaussianProcess(GaussianProcess::new(
                experiment.gaussian_process_config().clone(),
            )),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::RandomForest(_) => ModelKind::RandomForest,
            Self::GaussianProcess(_) => ModelKind::GaussianProcess,
        }
    }
}

impl Surrogate for Regressor {
    fn fit_predict(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[f64],
        x_test: &[Vec<f64>],
    ) -> Result<Prediction> {
        match self {
            Self::RandomForest(m) => m.fit_predict(x_train, y_train, x_test),
            Self::GaussianProcess(m) => m.fit_predict(x_train, y_train, x_test),
        }
    }
}

/// Predictions and uncertainties for the unlabeled rows, one column per
/// target.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelOutput {
    prediction: Table,
    uncertainty: Table,
}

impl ModelOutput {
    /// Pairs two tables that must share the same row index and columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the tables are not aligned.
    pub fn new(prediction: Table, uncertainty: Table) -> Result<Self> {
        if prediction.index() != uncertainty.index()
            || prediction.column_names() != uncertainty.column_names()
        {
            return Err(Error::config(
                "prediction and uncertainty tables must share rows and columns",
            ));
        }
        Ok(Self {
            prediction,
            uncertainty,
        })
    }

    #[must_use]
    pub fn prediction(&self) -> &Table {
        &self.prediction
    }

    #[must_use]
    pub fn uncertainty(&self) -> &Table {
        &self.uncertainty
    }

    /// The unlabeled rows the tables are indexed by.
    #[must_use]
    pub fn index(&self) -> &[RowId] {
        self.prediction.index()
    }
}

/// Fits the experiment's regressor once per target and predicts every
/// unlabeled row.
///
/// Each target is trained on the feature rows at
/// [`label_index`](Experiment::label_index) against that target's values
/// at the same rows.
///
/// # Errors
///
/// Propagates model errors, e.g. [`Error::ModelFit`] when a Gaussian
/// process cannot factorise its kernel matrix.
///
/// # Examples
///
/// ```
/// use sequential_learning::dataset::Dataset;
/// use sequential_learning::model::fit_and_predict;
/// use sequential_learning::preprocess::preprocess;
/// use sequential_learning::request::ExperimentRequest;
///
/// let dataset = Dataset::new("mixes")
///     .with_column("water", [0.40, 0.45, 0.50, 0.55])
///     .unwrap()
///     .with_column("Target: strength", [Some(48.0), Some(41.0), None, None])
///     .unwrap();
/// let request = ExperimentRequest::builder()
///     .features(["water"])
///     .target("Target: strength", 1.0, "max", None)
///     .build();
/// let experiment = preprocess(&dataset, &request).unwrap();
///
/// let output = fit_and_predict(&experiment).unwrap();
/// assert_eq!(output.index(), experiment.nolabel_index());
/// assert_eq!(output.prediction().column_names(), ["Target: strength"]);
/// ```
pub fn fit_and_predict(experiment: &Experiment) -> Result<ModelOutput> {
    let regressor = Regressor::for_experiment(experiment);
    let x_train = experiment.features().rows(experiment.label_index())?;
    let x_test = experiment.features().rows(experiment.nolabel_index())?;

    let mut prediction = Table::new(experiment.nolabel_index().to_vec())?;
    let mut uncertainty = Table::new(experiment.nolabel_index().to_vec())?;
    for target in experiment.target_names() {
        let y_train = experiment
            .targets()
            .column_at(target, experiment.label_index())?;
        let Prediction { mean, std } = regressor.fit_predict(&x_train, &y_train, &x_test)?;
        trace_debug!(
            column = target,
            model = regressor.kind().label(),
            train_rows = y_train.len(),
            "surrogate fitted"
        );
        prediction.push_column(target, mean)?;
        uncertainty.push_column(target, std)?;
    }
    ModelOutput::new(prediction, uncertainty)
}
