//! The validated, immutable input of one experiment run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::forest::RandomForestConfig;
use crate::model::gp::GaussianProcessConfig;
use crate::table::Table;
use crate::types::{Direction, ModelKind, RowId};

/// Settings for one target column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetSpec {
    /// Column name of the target.
    pub name: String,
    /// Multiplier applied to the normalized prediction and uncertainty.
    pub weight: f64,
    /// Whether smaller or larger values are better.
    pub direction: Direction,
    /// Optional clipping threshold for the prediction.
    pub threshold: Option<f64>,
}

/// Settings for one a-priori column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AprioriSpec {
    /// Column name of the a-priori value.
    pub name: String,
    /// Multiplier applied to the raw column value.
    pub weight: f64,
}

/// A validated experiment: tables, partition and settings.
///
/// Built by [`preprocess`](crate::preprocess::preprocess). All tables share
/// the row index `labeled ∪ unlabeled`; the two partitions are disjoint and
/// non-empty. An `Experiment` is never mutated by the pipeline; fitted
/// predictions travel separately as [`ModelOutput`](crate::model::ModelOutput).
#[derive(Clone, Debug)]
pub struct Experiment {
    pub(crate) features: Table,
    pub(crate) targets: Table,
    pub(crate) apriori: Table,
    pub(crate) label_index: Vec<RowId>,
    pub(crate) nolabel_index: Vec<RowId>,
    pub(crate) target_specs: Vec<TargetSpec>,
    pub(crate) apriori_specs: Vec<AprioriSpec>,
    pub(crate) model: ModelKind,
    pub(crate) curiosity: f64,
    pub(crate) random_forest: RandomForestConfig,
    pub(crate) gaussian_process: GaussianProcessConfig,
}

impl Experiment {
    /// Encoded numeric feature table over every row with complete feature
    /// values, whether or not it belongs to a partition.
    #[must_use]
    pub fn features(&self) -> &Table {
        &self.features
    }

    /// Target table over all used rows; unmeasured cells are NaN.
    #[must_use]
    pub fn targets(&self) -> &Table {
        &self.targets
    }

    /// A-priori table over all used rows. Has no columns when no a-priori
    /// values were selected.
    #[must_use]
    pub fn apriori(&self) -> &Table {
        &self.apriori
    }

    /// Rows with measured targets (training rows).
    #[must_use]
    pub fn label_index(&self) -> &[RowId] {
        &self.label_index
    }

    /// Rows to be scored.
    #[must_use]
    pub fn nolabel_index(&self) -> &[RowId] {
        &self.nolabel_index
    }

    #[must_use]
    pub fn target_specs(&self) -> &[TargetSpec] {
        &self.target_specs
    }

    /// Target names in request order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.target_specs.iter().map(|t| t.name.as_str())
    }

    #[must_use]
    pub fn apriori_specs(&self) -> &[AprioriSpec] {
        &self.apriori_specs
    }

    #[must_use]
    pub fn model(&self) -> ModelKind {
        self.model
    }

    #[must_use]
    pub fn curiosity(&self) -> f64 {
        self.curiosity
    }

    #[must_use]
    pub fn random_forest_config(&self) -> &RandomForestConfig {
        &self.random_forest
    }

    #[must_use]
    pub fn gaussian_process_config(&self) -> &GaussianProcessConfig {
        &self.gaussian_process
    }
}
