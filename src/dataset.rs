//! Uploaded tabular datasets: mixed numeric/text cells with missing values.
//!
//! This is the minimal surface the experiment engine needs from dataset
//! upload and storage: named columns, row identifiers, target columns that
//! are filled in as lab measurements arrive, and short row previews for
//! the target-entry page.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::RowId;

/// Prefix that marks a column as a target (measured property).
pub const TARGET_PREFIX: &str = "Target: ";

/// Returns the column name under which a target called `name` is stored.
///
/// ```
/// use sequential_learning::dataset::target_column_name;
///
/// assert_eq!(target_column_name("Compressive strength"), "Target: Compressive strength");
/// ```
#[must_use]
pub fn target_column_name(name: &str) -> String {
    format!("{TARGET_PREFIX}{name}")
}

/// A single dataset cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Interprets raw uploaded text: empty means missing, numbers with a
    /// `.` or `,` decimal separator become [`Value::Number`], anything else
    /// stays text.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Self::Missing;
        }
        parse_number(trimmed).map_or_else(|| Self::Text(trimmed.to_owned()), Self::Number)
    }

    /// Returns the numeric value, if any. NaN numbers count as missing.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(v) => v.is_nan(),
            Self::Text(_) => false,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v:?}"),
            Self::Text(s) => f.write_str(s),
            Self::Missing => f.write_str("nan"),
        }
    }
}

/// Parses a plain decimal number written with either `.` or `,` as the
/// decimal separator. Signs, exponents and thousands separators are rejected.
///
/// ```
/// use sequential_learning::dataset::parse_number;
///
/// assert_eq!(parse_number("12,5"), Some(12.5));
/// assert_eq!(parse_number("-3.25"), Some(-3.25));
/// assert_eq!(parse_number("1.000.000"), None);
/// assert_eq!(parse_number("CEM I"), None);
/// ```
#[must_use]
pub fn parse_number(input: &str) -> Option<f64> {
    let unsigned = input.strip_prefix('-').unwrap_or(input);
    let separator = if unsigned.contains(',') { ',' } else { '.' };
    let mut pieces = unsigned.split(separator);
    let whole = pieces.next()?;
    let fraction = pieces.next();
    if pieces.next().is_some() {
        return None;
    }
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || fraction.is_some_and(|f| !digits(f)) {
        return None;
    }
    let normalized = match fraction {
        Some(f) => format!("{whole}.{f}"),
        None => whole.to_owned(),
    };
    let value: f64 = normalized.parse().ok()?;
    Some(if unsigned.len() == input.len() { value } else { -value })
}

/// A named table of uploaded cells. Rows are identified by their position,
/// exposed as [`RowId`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dataset {
    name: String,
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    n_rows: usize,
}

impl Dataset {
    /// Creates an empty dataset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            names: Vec::new(),
            columns: Vec::new(),
            n_rows: 0,
        }
    }

    /// Builder-style variant of [`push_column`](Self::push_column).
    ///
    /// # Errors
    ///
    /// See [`push_column`](Self::push_column).
    ///
    /// # Examples
    ///
    /// ```
    /// use sequential_learning::dataset::Dataset;
    ///
    /// let dataset = Dataset::new("mixes")
    ///     .with_column("fly_ash", [0.1, 0.3])
    ///     .unwrap()
    ///     .with_column("Target: strength", [Some(40.0), None])
    ///     .unwrap();
    /// assert_eq!(dataset.n_rows(), 2);
    /// assert_eq!(dataset.target_columns(), vec!["Target: strength"]);
    /// ```
    pub fn with_column<V: Into<Value>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.push_column(name, values.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    /// Appends a column. The first column fixes the number of rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the name is already taken
    /// or the length differs from the existing columns.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(Error::config(format!("duplicate column '{name}'")));
        }
        if self.columns.is_empty() {
            self.n_rows = values.len();
        } else if values.len() != self.n_rows {
            return Err(Error::config(format!(
                "column '{name}' has {} values but the dataset has {} rows",
                values.len(),
                self.n_rows
            )));
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Iterates over every row identifier.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + use<> {
        (0..self.n_rows).map(RowId)
    }

    /// Returns `true` if `row` exists in this dataset.
    #[must_use]
    pub fn contains_row(&self, row: RowId) -> bool {
        row.index() < self.n_rows
    }

    /// Looks up a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if no such column exists.
    pub fn column(&self, name: &str) -> Result<&[Value]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| Error::UnknownColumn(name.to_owned()))
    }

    /// Names of all target columns, in column order.
    #[must_use]
    pub fn target_columns(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|n| n.starts_with(TARGET_PREFIX))
            .map(String::as_str)
            .collect()
    }

    /// Adds an empty target column for `name` and returns its column name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the target already exists.
    pub fn add_target(&mut self, name: &str) -> Result<String> {
        let column = target_column_name(name);
        self.push_column(column.clone(), vec![Value::Missing; self.n_rows])?;
        Ok(column)
    }

    /// Overwrites one cell, e.g. to record a measured target value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for a missing column and
    /// [`Error::InvalidConfiguration`] for a row outside the dataset.
    pub fn set_value(&mut self, column: &str, row: RowId, value: impl Into<Value>) -> Result<()> {
        if !self.contains_row(row) {
            return Err(Error::config(format!(
                "row {row} is outside dataset '{}' ({} rows)",
                self.name, self.n_rows
            )));
        }
        let i = self
            .names
            .iter()
            .position(|n| n == column)
            .ok_or_else(|| Error::UnknownColumn(column.to_owned()))?;
        self.columns[i][row.index()] = value.into();
        Ok(())
    }

    /// One-line preview of a row: `"col:value, col:value"`, with `nan` for
    /// missing cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a row outside the dataset.
    pub fn row_preview(&self, row: RowId) -> Result<String> {
        if !self.contains_row(row) {
            return Err(Error::config(format!("row {row} is outside dataset '{}'", self.name)));
        }
        Ok(self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, values)| format!("{name}:{}", values[row.index()]))
            .collect::<Vec<_>>()
            .join(", "))
    }
}
