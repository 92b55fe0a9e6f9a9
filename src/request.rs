//! Raw experiment requests as submitted by the discovery page.
//!
//! A request carries the user's selections unvalidated: parallel arrays of
//! target settings, the model selector and directions as strings. The
//! [`preprocess`](crate::preprocess::preprocess) step turns it into a typed
//! [`Experiment`](crate::experiment::Experiment) or rejects it.

use crate::model::forest::RandomForestConfig;
use crate::model::gp::GaussianProcessConfig;
use crate::types::{ModelKind, RowId};

/// Default exploration weight applied to prediction uncertainty.
const DEFAULT_CURIOSITY: f64 = 1.0;

/// An explicit labeled/unlabeled split of dataset rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    /// Rows used for training.
    pub labeled: Vec<RowId>,
    /// Rows to score.
    pub unlabeled: Vec<RowId>,
}

/// An unvalidated experiment request.
///
/// Construct with [`ExperimentRequest::builder`].
#[derive(Clone, Debug)]
pub struct ExperimentRequest {
    pub(crate) feature_names: Vec<String>,
    pub(crate) target_names: Vec<String>,
    pub(crate) target_weights: Vec<f64>,
    pub(crate) target_max_or_min: Vec<String>,
    pub(crate) target_thresholds: Vec<Option<f64>>,
    pub(crate) apriori_names: Vec<String>,
    pub(crate) apriori_weights: Vec<f64>,
    pub(crate) model: String,
    pub(crate) curiosity: f64,
    pub(crate) partition: Option<Partition>,
    pub(crate) random_forest: RandomForestConfig,
    pub(crate) gaussian_process: GaussianProcessConfig,
}

impl ExperimentRequest {
    /// Creates a builder for an experiment request.
    #[must_use]
    pub fn builder() -> ExperimentRequestBuilder {
        ExperimentRequestBuilder::new()
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    #[must_use]
    pub fn apriori_names(&self) -> &[String] {
        &self.apriori_names
    }

    /// The raw model selector.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn curiosity(&self) -> f64 {
        self.curiosity
    }
}

/// Builder for [`ExperimentRequest`].
///
/// Target and a-priori settings can be given either one target at a time
/// ([`target`](Self::target), [`apriori`](Self::apriori)) or as the
/// parallel arrays a web form produces ([`target_names`](Self::target_names),
/// [`target_weights`](Self::target_weights), ...). Nothing is validated
/// here; mismatched arrays are reported by the preprocessor.
///
/// Defaults:
/// - `model`: `"Random Forest"`
/// - `curiosity`: 1.0
/// - partition: derived from which rows have measured targets
///
/// # Examples
///
/// ```
/// use sequential_learning::request::ExperimentRequest;
///
/// let request = ExperimentRequest::builder()
///     .features(["fly_ash", "water"])
///     .target("Target: strength", 1.0, "max", None)
///     .target("Target: co2", 0.5, "min", Some(120.0))
///     .apriori("cost_score", 0.2)
///     .model("Gaussian Process")
///     .curiosity(0.5)
///     .build();
/// assert_eq!(request.target_names().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExperimentRequestBuilder {
    feature_names: Vec<String>,
    target_names: Vec<String>,
    target_weights: Vec<f64>,
    target_max_or_min: Vec<String>,
    target_thresholds: Vec<Option<f64>>,
    apriori_names: Vec<String>,
    apriori_weights: Vec<f64>,
    model: Option<String>,
    curiosity: Option<f64>,
    partition: Option<Partition>,
    random_forest: Option<RandomForestConfig>,
    gaussian_process: Option<GaussianProcessConfig>,
}

impl ExperimentRequestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the feature (input) columns.
    #[must_use]
    pub fn features<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.feature_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one target with all of its settings at once.
    #[must_use]
    pub fn target(
        mut self,
        name: impl Into<String>,
        weight: f64,
        max_or_min: impl Into<String>,
        threshold: Option<f64>,
    ) -> Self {
        self.target_names.push(name.into());
        self.target_weights.push(weight);
        self.target_max_or_min.push(max_or_min.into());
        self.target_thresholds.push(threshold);
        self
    }

    #[must_use]
    pub fn target_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.target_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn target_weights(mut self, weights: impl IntoIterator<Item = f64>) -> Self {
        self.target_weights = weights.into_iter().collect();
        self
    }

    #[must_use]
    pub fn target_max_or_min<S: Into<String>>(
        mut self,
        directions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.target_max_or_min = directions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn target_thresholds(mut self, thresholds: impl IntoIterator<Item = Option<f64>>) -> Self {
        self.target_thresholds = thresholds.into_iter().collect();
        self
    }

    /// Adds one a-priori column with its weight.
    #[must_use]
    pub fn apriori(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.apriori_names.push(name.into());
        self.apriori_weights.push(weight);
        self
    }

    #[must_use]
    pub fn apriori_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.apriori_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn apriori_weights(mut self, weights: impl IntoIterator<Item = f64>) -> Self {
        self.apriori_weights = weights.into_iter().collect();
        self
    }

    /// Sets the raw model selector, e.g. `"Random Forest"` or
    /// `"gaussian_process"`.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the exploration weight on prediction uncertainty.
    ///
    /// Default: 1.0.
    #[must_use]
    pub fn curiosity(mut self, curiosity: f64) -> Self {
        self.curiosity = Some(curiosity);
        self
    }

    /// Supplies an explicit labeled/unlabeled split instead of deriving it
    /// from measured target values.
    #[must_use]
    pub fn partition(
        mut self,
        labeled: impl IntoIterator<Item = RowId>,
        unlabeled: impl IntoIterator<Item = RowId>,
    ) -> Self {
        self.partition = Some(Partition {
            labeled: labeled.into_iter().collect(),
            unlabeled: unlabeled.into_iter().collect(),
        });
        self
    }

    /// Overrides the random-forest settings.
    #[must_use]
    pub fn random_forest(mut self, config: RandomForestConfig) -> Self {
        self.random_forest = Some(config);
        self
    }

    /// Overrides the Gaussian-process settings.
    #[must_use]
    pub fn gaussian_process(mut self, config: GaussianProcessConfig) -> Self {
        self.gaussian_process = Some(config);
        self
    }

    /// Builds the request. Validation is deferred to preprocessing.
    #[must_use]
    pub fn build(self) -> ExperimentRequest {
        ExperimentRequest {
            feature_names: self.feature_names,
            target_names: self.target_names,
            target_weights: self.target_weights,
            target_max_or_min: self.target_max_or_min,
            target_thresholds: self.target_thresholds,
            apriori_names: self.apriori_names,
            apriori_weights: self.apriori_weights,
            model: self
                .model
                .unwrap_or_else(|| ModelKind::default().label().to_owned()),
            curiosity: self.curiosity.unwrap_or(DEFAULT_CURIOSITY),
            partition: self.partition,
            random_forest: self.random_forest.unwrap_or_default(),
            gaussian_process: self.gaussian_process.unwrap_or_default(),
        }
    }
}
