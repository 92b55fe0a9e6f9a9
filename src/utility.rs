//! Utility scores: exploitation, exploration and prior knowledge in one
//! number per candidate.
//!
//! For every target `t` the predictions are clipped at the target's
//! threshold, normalized by the mean and sample standard deviation of the
//! labeled values, and weighted:
//!
//! ```text
//! pred_t = weight_t · (clip(prediction_t) - mean_t) / std_t
//! unc_t  = weight_t · uncertainty_t / std_t
//! ```
//!
//! and the utility of an unlabeled row is
//!
//! ```text
//! utility = apriori + Σ_t pred_t + curiosity · Σ_t unc_t
//! ```
//!
//! where `apriori` is the weighted row sum of the a-priori columns (zero
//! without any). A zero standard deviation is replaced by `1`.
//!
//! The feature table, z-scored over every row with complete features, is
//! computed alongside and returned in [`UtilityScores::normalized_features`].
//! It does not enter the utility.

use crate::error::Result;
use crate::experiment::Experiment;
use crate::model::ModelOutput;
use crate::stats;
use crate::table::Table;
use crate::types::Direction;

/// Mean and divisor used to normalize one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStats {
    /// Mean of the labeled values.
    pub mean: f64,
    /// Sample standard deviation of the labeled values, `1.0` if zero.
    pub std: f64,
}

/// Output of [`compute_utility`].
#[derive(Clone, Debug, PartialEq)]
pub struct UtilityScores {
    /// One score per unlabeled row, in `nolabel_index` order.
    pub values: Vec<f64>,
    /// Feature table z-scored over every row with complete features.
    pub normalized_features: Table,
}

/// Clips each target's predictions at its threshold.
///
/// A `min` target is clamped from below (`max(value, threshold)`), a `max`
/// target from above (`min(value, threshold)`). Targets without a
/// threshold are copied unchanged.
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`](crate::Error::UnknownColumn) if
/// `prediction` lacks a target column.
pub fn clip_prediction(experiment: &Experiment, prediction: &Table) -> Result<Table> {
    let mut clipped = Table::new(prediction.index().to_vec())?;
    for spec in experiment.target_specs() {
        let values = prediction.column_at(&spec.name, prediction.index())?;
        let values = match (spec.threshold, spec.direction) {
            (None, _) => values,
            (Some(threshold), Direction::Min) => {
                values.into_iter().map(|v| v.max(threshold)).collect()
            }
            (Some(threshold), Direction::Max) => {
                values.into_iter().map(|v| v.min(threshold)).collect()
            }
        };
        clipped.push_column(spec.name.clone(), values)?;
    }
    Ok(clipped)
}

/// Mean and standard deviation of each target over the labeled rows, in
/// target order.
///
/// # Errors
///
/// Returns an error if a target column or labeled row is missing from the
/// experiment's target table.
pub fn label_stats(experiment: &Experiment) -> Result<Vec<LabelStats>> {
    experiment
        .target_names()
        .map(|name| {
            let labels = experiment
                .targets()
                .column_at(name, experiment.label_index())?;
            Ok(LabelStats {
                mean: stats::mean(&labels),
                std: stats::nonzero(stats::sample_std(&labels)),
            })
        })
        .collect()
}

/// Z-scores every column over all rows of `features`.
///
/// # Errors
///
/// Propagates table construction errors.
pub fn normalize_features(features: &Table) -> Result<Table> {
    let mut normalized = Table::new(features.index().to_vec())?;
    for (name, values) in features.columns() {
        let mean = stats::mean(values);
        let std = stats::nonzero(stats::sample_std(values));
        normalized.push_column(name, values.iter().map(|v| (v - mean) / std).collect())?;
    }
    Ok(normalized)
}

/// Weighted row sum of the a-priori columns over the unlabeled rows.
///
/// All zeros when the experiment has no a-priori columns.
///
/// # Errors
///
/// Returns an error if an a-priori column or unlabeled row is missing from
/// the experiment's a-priori table.
pub fn apriori_contribution(experiment: &Experiment) -> Result<Vec<f64>> {
    let rows = experiment.nolabel_index();
    let mut total = vec![0.0; rows.len()];
    for spec in experiment.apriori_specs() {
        let values = experiment.apriori().column_at(&spec.name, rows)?;
        for (sum, v) in total.iter_mut().zip(values) {
            *sum += spec.weight * v;
        }
    }
    Ok(total)
}

/// Computes the utility of every unlabeled row. See the
/// [module docs](self) for the formula.
///
/// # Errors
///
/// Returns an error if `output` is not indexed by the experiment's
/// unlabeled rows or lacks a target column.
///
/// # Examples
///
/// ```
/// use sequential_learning::dataset::Dataset;
/// use sequential_learning::model::fit_and_predict;
/// use sequential_learning::preprocess::preprocess;
/// use sequential_learning::request::ExperimentRequest;
/// use sequential_learning::utility::compute_utility;
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
/// let output = fit_and_predict(&experiment).unwrap();
///
/// let scores = compute_utility(&experiment, &output).unwrap();
/// assert_eq!(scores.values.len(), 2);
/// assert!(scores.values.iter().all(|u| u.is_finite()));
/// ```
pub fn compute_utility(experiment: &Experiment, output: &ModelOutput) -> Result<UtilityScores> {
    let rows = experiment.nolabel_index();
    let clipped = clip_prediction(experiment, output.prediction())?;
    let per_target = label_stats(experiment)?;

    let mut predicted = vec![0.0; rows.len()];
    let mut uncertain = vec![0.0; rows.len()];
    for (spec, s) in experiment.target_specs().iter().zip(&per_target) {
        let prediction = clipped.column_at(&spec.name, rows)?;
        let uncertainty = output.uncertainty().column_at(&spec.name, rows)?;
        for (sum, p) in predicted.iter_mut().zip(prediction) {
            *sum += spec.weight * (p - s.mean) / s.std;
        }
        for (sum, u) in uncertain.iter_mut().zip(uncertainty) {
            *sum += spec.weight * u / s.std;
        }
    }

    let normalized_features = normalize_features(experiment.features())?;
    let apriori = apriori_contribution(experiment)?;

    let curiosity = experiment.curiosity();
    let values = apriori
        .iter()
        .zip(&predicted)
        .zip(&uncertain)
        .map(|((a, p), u)| a + p + curiosity * u)
        .collect();
    Ok(UtilityScores {
        values,
        normalized_features,
    })
}
