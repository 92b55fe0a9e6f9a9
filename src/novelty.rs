//! Novelty: how far each candidate lies from the rows already measured.
//!
//! For every unlabeled row the Euclidean distance to its nearest labeled
//! row is taken, and all such distances are divided by the largest one.
//! The most novel candidate therefore scores exactly `1` and the others
//! fall in `(0, 1]` proportionally.
//!
//! # Boundary case
//!
//! If every unlabeled row coincides with some labeled row, all nearest
//! distances are zero and the scores are `0 / 0 = NaN`. This is returned
//! as is.

use crate::error::Result;
use crate::experiment::Experiment;
use crate::stats;

/// Pairwise Euclidean distances: `result[i][j] = ‖from[i] - to[j]‖`.
#[must_use]
pub fn distance_matrix(from: &[Vec<f64>], to: &[Vec<f64>]) -> Vec<Vec<f64>> {
    from.iter()
        .map(|a| to.iter().map(|b| stats::euclidean(a, b)).collect())
        .collect()
}

/// Nearest-neighbor distance of each unlabeled row to the labeled rows,
/// normalized by the largest such distance. Aligned with
/// [`Experiment::nolabel_index`].
///
/// Features are compared as encoded by preprocessing, without scaling.
///
/// # Errors
///
/// Returns an error if a partition row is missing from the feature table.
///
/// # Examples
///
/// ```
/// use sequential_learning::dataset::Dataset;
/// use sequential_learning::novelty::compute_novelty;
/// use sequential_learning::preprocess::preprocess;
/// use sequential_learning::request::ExperimentRequest;
///
/// let dataset = Dataset::new("mixes")
///     .with_column("water", [0.0, 1.0, 3.0, 5.0])
///     .unwrap()
///     .with_column("Target: strength", [Some(48.0), Some(41.0), None, None])
///     .unwrap();
/// let request = ExperimentRequest::builder()
///     .features(["water"])
///     .target("Target: strength", 1.0, "max", None)
///     .build();
/// let experiment = preprocess(&dataset, &request).unwrap();
///
/// // Nearest distances are 2 and 4.
/// assert_eq!(compute_novelty(&experiment).unwrap(), vec![0.5, 1.0]);
/// ```
pub fn compute_novelty(experiment: &Experiment) -> Result<Vec<f64>> {
    let candidates = experiment.features().rows(experiment.nolabel_index())?;
    let known = experiment.features().rows(experiment.label_index())?;

    let nearest: Vec<f64> = distance_matrix(&candidates, &known)
        .into_iter()
        .map(|row| row.into_iter().fold(f64::INFINITY, f64::min))
        .collect();
    let max_nearest = nearest.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(nearest.into_iter().map(|d| d / max_nearest).collect())
}
