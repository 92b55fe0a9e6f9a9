//! End-to-end experiment runs.
//!
//! ```text
//! Dataset + ExperimentRequest
//!   └─ preprocess ─▶ Experiment
//!        ├─ fit_and_predict ─▶ ModelOutput
//!        │    └─ compute_utility ─▶ UtilityScores
//!        ├─ compute_novelty ─▶ novelty
//!        └─ postprocess ─▶ ExperimentResult
//! ```
//!
//! Every stage takes its inputs by reference and returns a new value; the
//! [`Experiment`] is never modified after preprocessing. Runs share no
//! state, so independent experiments may run on separate threads.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::experiment::Experiment;
use crate::model::fit_and_predict;
use crate::novelty::compute_novelty;
use crate::postprocess::{ExperimentResult, postprocess};
use crate::preprocess::preprocess;
use crate::request::ExperimentRequest;
use crate::utility::compute_utility;

/// Runs the sequential-learning pipeline.
///
/// # Examples
///
/// ```
/// use sequential_learning::ExperimentConductor;
/// use sequential_learning::dataset::Dataset;
/// use sequential_learning::request::ExperimentRequest;
///
/// let dataset = Dataset::new("mixes")
///     .with_column("water", [0.40, 0.45, 0.50, 0.55, 0.60])
///     .unwrap()
///     .with_column("cement", [300.0, 320.0, 340.0, 360.0, 380.0])
///     .unwrap()
///     .with_column("Target: strength", [Some(48.0), Some(41.0), None, None, None])
///     .unwrap();
/// let request = ExperimentRequest::builder()
///     .features(["water", "cement"])
///     .target("Target: strength", 1.0, "max", None)
///     .curiosity(1.0)
///     .build();
///
/// let result = ExperimentConductor::run(&dataset, &request).unwrap();
/// assert_eq!(result.len(), 3);
/// assert_eq!(result.best().unwrap().rank, 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExperimentConductor;

impl ExperimentConductor {
    /// Validates `request` against `dataset` and scores every unlabeled row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration),
    /// [`Error::UnsupportedModel`](crate::Error::UnsupportedModel) or
    /// [`Error::InvalidDirection`](crate::Error::InvalidDirection) for a
    /// rejected request, and [`Error::ModelFit`](crate::Error::ModelFit) if
    /// the surrogate cannot be fitted.
    pub fn run(dataset: &Dataset, request: &ExperimentRequest) -> Result<ExperimentResult> {
        let experiment = preprocess(dataset, request)?;
        Self::conduct(&experiment)
    }

    /// Scores an already validated experiment.
    ///
    /// # Errors
    ///
    /// Returns an error if the surrogate cannot be fitted.
    pub fn conduct(experiment: &Experiment) -> Result<ExperimentResult> {
        trace_info!(
            labeled = experiment.label_index().len(),
            unlabeled = experiment.nolabel_index().len(),
            targets = experiment.target_specs().len(),
            model = experiment.model().label(),
            "experiment started"
        );
        let output = fit_and_predict(experiment)?;
        let utility = compute_utility(experiment, &output)?;
        let novelty = compute_novelty(experiment)?;
        postprocess(experiment, &output, utility, novelty)
    }
}
