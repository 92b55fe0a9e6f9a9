//! Validation and shaping of an [`ExperimentRequest`] into an [`Experiment`].
//!
//! Preprocessing is the only place where raw request values are checked.
//! It rejects the request with [`Error::InvalidConfiguration`],
//! [`Error::UnsupportedModel`] or [`Error::InvalidDirection`] before any
//! model is fitted, and otherwise produces tables that every later stage
//! can rely on:
//!
//! 1. Setting arrays are aligned with their name arrays.
//! 2. Every selected column exists; targets and a-priori columns are numeric.
//! 3. Text feature columns are one-hot encoded (`<column>_<category>`).
//! 4. Rows with a missing feature value are dropped. The feature table
//!    keeps every other row, including rows outside both partitions.
//! 5. The labeled/unlabeled partition is taken from the request or derived
//!    from which rows have measured targets. The partitions are disjoint
//!    and non-empty.

use std::collections::{BTreeSet, HashSet};

use crate::dataset::{Dataset, Value};
use crate::error::{Error, Result};
use crate::experiment::{AprioriSpec, Experiment, TargetSpec};
use crate::request::{ExperimentRequest, Partition};
use crate::table::Table;
use crate::types::{Direction, ModelKind, RowId};

/// A numeric column with missing cells as `None`.
type Column = Vec<Option<f64>>;

/// Validates `request` against `dataset` and builds the experiment.
///
/// # Errors
///
/// - [`Error::InvalidConfiguration`] for mismatched setting arrays, unknown
///   or non-numeric columns, non-finite weights or thresholds, negative
///   curiosity, overlapping or empty partitions, labeled rows without
///   measured targets and unlabeled rows without a-priori values.
/// - [`Error::UnsupportedModel`] for an unknown model selector.
/// - [`Error::InvalidDirection`] for a direction other than `min`/`max`.
///
/// # Examples
///
/// ```
/// use sequential_learning::dataset::Dataset;
/// use sequential_learning::preprocess::preprocess;
/// use sequential_learning::request::ExperimentRequest;
/// use sequential_learning::RowId;
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
///
/// let experiment = preprocess(&dataset, &request).unwrap();
/// assert_eq!(experiment.label_index(), &[RowId(0), RowId(1)]);
/// assert_eq!(experiment.nolabel_index(), &[RowId(2), RowId(3)]);
/// ```
pub fn preprocess(dataset: &Dataset, request: &ExperimentRequest) -> Result<Experiment> {
    check_aligned(request)?;
    let model: ModelKind = request.model.parse()?;
    let target_specs = target_specs(request)?;
    let apriori_specs = apriori_specs(request)?;
    if !request.curiosity.is_finite() || request.curiosity < 0.0 {
        return Err(Error::config(format!(
            "curiosity must be a non-negative number, got {}",
            request.curiosity
        )));
    }
    check_selection(request)?;

    let features = encode_features(dataset, &request.feature_names)?;
    let targets = numeric_columns(dataset, &request.target_names)?;
    let apriori = numeric_columns(dataset, &request.apriori_names)?;

    let complete: Vec<bool> = (0..dataset.n_rows())
        .map(|i| features.iter().all(|(_, col)| col[i].is_some()))
        .collect();

    let (label_index, nolabel_index) = match &request.partition {
        Some(partition) => explicit_partition(dataset, partition, &complete)?,
        None => derived_partition(&targets, &complete),
    };
    if label_index.is_empty() {
        return Err(Error::config("no labeled rows: measure at least one target value"));
    }
    if nolabel_index.is_empty() {
        return Err(Error::config("no unlabeled rows left to predict"));
    }

    for &row in &label_index {
        for (name, col) in request.target_names.iter().zip(&targets) {
            if col[row.index()].is_none() {
                return Err(Error::config(format!(
                    "labeled row {row} has no value for target '{name}'"
                )));
            }
        }
    }
    for &row in &nolabel_index {
        for (name, col) in request.apriori_names.iter().zip(&apriori) {
            if col[row.index()].is_none() {
                return Err(Error::config(format!(
                    "row {row} has no value for a-priori column '{name}'"
                )));
            }
        }
    }

    let mut used: Vec<RowId> = label_index.iter().chain(&nolabel_index).copied().collect();
    used.sort_unstable();

    let complete_rows: Vec<RowId> = complete
        .iter()
        .enumerate()
        .filter(|&(_, &ok)| ok)
        .map(|(i, _)| RowId(i))
        .collect();
    let features = build_table(&complete_rows, features)?;
    let targets = build_table(&used, request.target_names.iter().cloned().zip(targets).collect())?;
    let apriori = build_table(&used, request.apriori_names.iter().cloned().zip(apriori).collect())?;

    trace_info!(
        dataset = dataset.name(),
        labeled = label_index.len(),
        unlabeled = nolabel_index.len(),
        dropped = dataset.n_rows() - used.len(),
        features = features.n_columns(),
        model = model.label(),
        "experiment preprocessed"
    );

    Ok(Experiment {
        features,
        targets,
        apriori,
        label_index,
        nolabel_index,
        target_specs,
        apriori_specs,
        model,
        curiosity: request.curiosity,
        random_forest: request.random_forest.clone(),
        gaussian_process: request.gaussian_process.clone(),
    })
}

fn check_aligned(request: &ExperimentRequest) -> Result<()> {
    let n = request.target_names.len();
    let arrays = [
        ("target weights", request.target_weights.len()),
        ("target directions", request.target_max_or_min.len()),
        ("target thresholds", request.target_thresholds.len()),
    ];
    for (what, len) in arrays {
        if len != n {
            return Err(Error::config(format!("got {len} {what} for {n} targets")));
        }
    }
    let m = request.apriori_names.len();
    if request.apriori_weights.len() != m {
        return Err(Error::config(format!(
            "got {} a-priori weights for {m} a-priori columns",
            request.apriori_weights.len()
        )));
    }
    Ok(())
}

fn target_specs(request: &ExperimentRequest) -> Result<Vec<TargetSpec>> {
    request
        .target_names
        .iter()
        .zip(&request.target_weights)
        .zip(&request.target_max_or_min)
        .zip(&request.target_thresholds)
        .map(|(((name, &weight), max_or_min), &threshold)| -> Result<TargetSpec> {
            let direction: Direction = max_or_min.parse()?;
            if !weight.is_finite() {
                return Err(Error::config(format!("weight of target '{name}' is not finite")));
            }
            if threshold.is_some_and(|t| !t.is_finite()) {
                return Err(Error::config(format!("threshold of target '{name}' is not finite")));
            }
            Ok(TargetSpec {
                name: name.clone(),
                weight,
                direction,
                threshold,
            })
        })
        .collect()
}

fn apriori_specs(request: &ExperimentRequest) -> Result<Vec<AprioriSpec>> {
    request
        .apriori_names
        .iter()
        .zip(&request.apriori_weights)
        .map(|(name, &weight)| {
            if weight.is_finite() {
                Ok(AprioriSpec {
                    name: name.clone(),
                    weight,
                })
            } else {
                Err(Error::config(format!("weight of a-priori column '{name}' is not finite")))
            }
        })
        .collect()
}

fn check_selection(request: &ExperimentRequest) -> Result<()> {
    if request.feature_names.is_empty() {
        return Err(Error::config("select at least one feature column"));
    }
    if request.target_names.is_empty() {
        return Err(Error::config("select at least one target column"));
    }
    let mut seen = HashSet::new();
    let all = request
        .feature_names
        .iter()
        .chain(&request.target_names)
        .chain(&request.apriori_names);
    for name in all {
        if !seen.insert(name.as_str()) {
            return Err(Error::config(format!("column '{name}' is selected more than once")));
        }
    }
    Ok(())
}

fn lookup<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a [Value]> {
    dataset.column(name).map_err(|_| {
        Error::config(format!(
            "column '{name}' is not in dataset '{}'",
            dataset.name()
        ))
    })
}

fn numeric_columns(dataset: &Dataset, names: &[String]) -> Result<Vec<Column>> {
    names
        .iter()
        .map(|name| {
            lookup(dataset, name)?
                .iter()
                .map(|cell| match cell {
                    Value::Text(s) => Err(Error::config(format!(
                        "column '{name}' holds non-numeric value '{s}'"
                    ))),
                    other => Ok(other.as_number()),
                })
                .collect::<Result<Column>>()
        })
        .collect()
}

/// Encodes feature columns: numeric columns pass through, columns holding
/// any text become one indicator column per category (sorted).
fn encode_features(dataset: &Dataset, names: &[String]) -> Result<Vec<(String, Column)>> {
    let mut encoded = Vec::with_capacity(names.len());
    for name in names {
        let cells = lookup(dataset, name)?;
        if !cells.iter().any(|c| matches!(c, Value::Text(_))) {
            encoded.push((name.clone(), cells.iter().map(Value::as_number).collect()));
            continue;
        }
        let categories: BTreeSet<String> = cells
            .iter()
            .filter(|c| !c.is_missing())
            .map(ToString::to_string)
            .collect();
        for category in categories {
            let column = cells
                .iter()
                .map(|c| {
                    if c.is_missing() {
                        None
                    } else if c.to_string() == category {
                        Some(1.0)
                    } else {
                        Some(0.0)
                    }
                })
                .collect();
            encoded.push((format!("{name}_{category}"), column));
        }
    }
    Ok(encoded)
}

fn explicit_partition(
    dataset: &Dataset,
    partition: &Partition,
    complete: &[bool],
) -> Result<(Vec<RowId>, Vec<RowId>)> {
    let mut seen = HashSet::new();
    for &row in partition.labeled.iter().chain(&partition.unlabeled) {
        if !dataset.contains_row(row) {
            return Err(Error::config(format!(
                "row {row} is outside dataset '{}' ({} rows)",
                dataset.name(),
                dataset.n_rows()
            )));
        }
        if !seen.insert(row) {
            return Err(Error::config(format!(
                "row {row} appears more than once in the labeled/unlabeled partition"
            )));
        }
        if !complete[row.index()] {
            return Err(Error::config(format!("row {row} has missing feature values")));
        }
    }
    Ok((partition.labeled.clone(), partition.unlabeled.clone()))
}

/// Labeled rows have every target measured, unlabeled rows none. Rows
/// with only some targets measured, or with missing features, are unused.
fn derived_partition(targets: &[Column], complete: &[bool]) -> (Vec<RowId>, Vec<RowId>) {
    let mut labeled = Vec::new();
    let mut unlabeled = Vec::new();
    for (i, &ok) in complete.iter().enumerate() {
        if !ok {
            trace_debug!(row = i, "row dropped: missing feature values");
            continue;
        }
        let measured = targets.iter().filter(|col| col[i].is_some()).count();
        if measured == targets.len() {
            labeled.push(RowId(i));
        } else if measured == 0 {
            unlabeled.push(RowId(i));
        } else {
            trace_debug!(row = i, measured, "row dropped: partially measured targets");
        }
    }
    (labeled, unlabeled)
}

fn build_table(rows: &[RowId], columns: Vec<(String, Column)>) -> Result<Table> {
    let mut table = Table::new(rows.to_vec())?;
    for (name, column) in columns {
        let values = rows
            .iter()
            .map(|row| column[row.index()].unwrap_or(f64::NAN))
            .collect();
        table.push_column(name, values)?;
    }
    Ok(table)
}
