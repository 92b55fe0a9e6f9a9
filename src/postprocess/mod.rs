//! Assembly of the ranked result handed to presentation code.
//!
//! [`postprocess`] joins the utility and novelty scores with the per-target
//! predictions and uncertainties and the a-priori values of every
//! unlabeled row. No score is transformed; rows are only ordered by
//! utility, best first, and numbered with a 1-based rank.

mod export;

use core::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::experiment::Experiment;
use crate::model::ModelOutput;
use crate::table::Table;
use crate::types::RowId;
use crate::utility::UtilityScores;

/// One scored candidate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateRow {
    /// Row of the source dataset.
    pub row: RowId,
    /// 1-based position after sorting by utility.
    pub rank: usize,
    /// Utility score; candidates are ordered by it.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nan_from_null"))]
    pub utility: f64,
    /// Scaled distance to the nearest labeled row, NaN if every candidate
    /// coincides with one.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nan_from_null"))]
    pub novelty: f64,
    /// Predicted value per target, in target order.
    pub predictions: Vec<f64>,
    /// Predictive standard deviation per target, in target order.
    pub uncertainties: Vec<f64>,
    /// A-priori values in a-priori column order.
    pub apriori: Vec<f64>,
}

/// JSON writes NaN as `null`; read it back as NaN.
#[cfg(feature = "serde")]
fn nan_from_null<'de, D>(deserializer: D) -> core::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Scored candidates of one experiment, best first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExperimentResult {
    target_names: Vec<String>,
    apriori_names: Vec<String>,
    rows: Vec<CandidateRow>,
    #[cfg_attr(feature = "serde", serde(skip))]
    normalized_features: Table,
}

impl ExperimentResult {
    #[must_use]
    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    #[must_use]
    pub fn apriori_names(&self) -> &[String] {
        &self.apriori_names
    }

    /// Candidates sorted by utility, highest first.
    #[must_use]
    pub fn rows(&self) -> &[CandidateRow] {
        &self.rows
    }

    /// The candidate with the highest utility.
    #[must_use]
    pub fn best(&self) -> Option<&CandidateRow> {
        self.rows.first()
    }

    /// Looks a candidate up by its dataset row.
    #[must_use]
    pub fn row(&self, row: RowId) -> Option<&CandidateRow> {
        self.rows.iter().find(|c| c.row == row)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feature table z-scored over all used rows. Not part of the utility;
    /// empty after deserialization.
    #[must_use]
    pub fn normalized_features(&self) -> &Table {
        &self.normalized_features
    }
}

/// Combines the scores of one run into an [`ExperimentResult`].
///
/// `utility` and `novelty` must be aligned with the experiment's
/// `nolabel_index`, as returned by
/// [`compute_utility`](crate::utility::compute_utility) and
/// [`compute_novelty`](crate::novelty::compute_novelty). Ties in utility
/// keep their `nolabel_index` order; NaN utilities compare as equal.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if a score vector has the wrong
/// length or `output` does not cover an unlabeled row or target.
pub fn postprocess(
    experiment: &Experiment,
    output: &ModelOutput,
    utility: UtilityScores,
    novelty: Vec<f64>,
) -> Result<ExperimentResult> {
    let rows = experiment.nolabel_index();
    if utility.values.len() != rows.len() || novelty.len() != rows.len() {
        return Err(Error::config(format!(
            "expected {} scores, got {} utilities and {} novelties",
            rows.len(),
            utility.values.len(),
            novelty.len()
        )));
    }

    let mut candidates = Vec::with_capacity(rows.len());
    for ((&row, utility), novelty) in rows.iter().zip(utility.values).zip(novelty) {
        let predictions = experiment
            .target_names()
            .map(|t| cell(output.prediction(), row, t))
            .collect::<Result<Vec<_>>>()?;
        let uncertainties = experiment
            .target_names()
            .map(|t| cell(output.uncertainty(), row, t))
            .collect::<Result<Vec<_>>>()?;
        let apriori = experiment
            .apriori_specs()
            .iter()
            .map(|a| cell(experiment.apriori(), row, &a.name))
            .collect::<Result<Vec<_>>>()?;
        candidates.push(CandidateRow {
            row,
            rank: 0,
            utility,
            novelty,
            predictions,
            uncertainties,
            apriori,
        });
    }

    candidates.sort_by(|a, b| b.utility.partial_cmp(&a.utility).unwrap_or(Ordering::Equal));
    for (i, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = i + 1;
    }

    trace_info!(
        candidates = candidates.len(),
        best_row = candidates.first().map(|c| c.row.index()),
        best_utility = candidates.first().map(|c| c.utility),
        "experiment ranked"
    );

    Ok(ExperimentResult {
        target_names: experiment.target_names().map(str::to_owned).collect(),
        apriori_names: experiment
            .apriori_specs()
            .iter()
            .map(|a| a.name.clone())
            .collect(),
        rows: candidates,
        normalized_features: utility.normalized_features,
    })
}

fn cell(table: &Table, row: RowId, column: &str) -> Result<f64> {
    table
        .get(row, column)
        .ok_or_else(|| Error::config(format!("no value for row {row} in column '{column}'")))
}
