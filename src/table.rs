//! Column-oriented numeric table keyed by [`RowId`].

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::RowId;

/// A numeric table whose rows are addressed by [`RowId`], not by position.
///
/// Feature, target, a-priori, prediction and uncertainty tables are all
/// `Table`s. Selecting rows by id keeps differently-indexed tables aligned:
/// asking for a row the table does not contain is an error, never a silent
/// positional mismatch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    index: Vec<RowId>,
    positions: HashMap<RowId, usize>,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Creates a table with the given row index and no columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the index repeats a row.
    pub fn new(index: Vec<RowId>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(index.len());
        for (pos, &row) in index.iter().enumerate() {
            if positions.insert(row, pos).is_some() {
                return Err(Error::config(format!("row {row} appears twice in table index")));
            }
        }
        Ok(Self {
            index,
            positions,
            names: Vec::new(),
            columns: Vec::new(),
        })
    }

    /// Creates a table from named columns sharing one row index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a column length differs
    /// from the index length, a column name repeats, or the index repeats
    /// a row.
    ///
    /// # Examples
    ///
    /// ```
    /// use sequential_learning::{RowId, Table};
    ///
    /// let table = Table::from_columns(
    ///     vec![RowId(3), RowId(7)],
    ///     vec![("strength".to_string(), vec![41.0, 38.5])],
    /// )
    /// .unwrap();
    /// assert_eq!(table.get(RowId(7), "strength"), Some(38.5));
    /// ```
    pub fn from_columns(index: Vec<RowId>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let mut table = Self::new(index)?;
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] on a length mismatch or a
    /// duplicate column name.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(Error::config(format!(
                "column '{name}' has {} values but the table has {} rows",
                values.len(),
                self.index.len()
            )));
        }
        if self.names.contains(&name) {
            return Err(Error::config(format!("duplicate column '{name}'")));
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// Row identifiers in table order.
    #[must_use]
    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    /// Column names in table order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the table contains the row.
    #[must_use]
    pub fn contains(&self, row: RowId) -> bool {
        self.positions.contains_key(&row)
    }

    /// Returns a whole column in table order.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterates over `(name, values)` pairs in table order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Returns a single cell.
    #[must_use]
    pub fn get(&self, row: RowId, column: &str) -> Option<f64> {
        let pos = *self.positions.get(&row)?;
        self.column(column).map(|values| values[pos])
    }

    /// Returns the values of one column for the given rows, in the order
    /// the rows are listed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for a missing column and
    /// [`Error::InvalidConfiguration`] for a row the table does not hold.
    pub fn column_at(&self, column: &str, rows: &[RowId]) -> Result<Vec<f64>> {
        let values = self
            .column(column)
            .ok_or_else(|| Error::UnknownColumn(column.to_owned()))?;
        rows.iter()
            .map(|row| self.position(*row).map(|pos| values[pos]))
            .collect()
    }

    /// Returns full feature vectors for the given rows, one `Vec` per row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a row the table does not hold.
    pub fn rows(&self, rows: &[RowId]) -> Result<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                let pos = self.position(*row)?;
                Ok(self.columns.iter().map(|col| col[pos]).collect())
            })
            .collect()
    }

    /// Returns a new table restricted to the given rows, in the order listed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a row the table does not hold.
    pub fn select_rows(&self, rows: &[RowId]) -> Result<Self> {
        let positions = rows
            .iter()
            .map(|row| self.position(*row))
            .collect::<Result<Vec<_>>>()?;
        let mut table = Self::new(rows.to_vec())?;
        for (name, values) in self.columns() {
            table.push_column(name, positions.iter().map(|&p| values[p]).collect())?;
        }
        Ok(table)
    }

    fn position(&self, row: RowId) -> Result<usize> {
        self.positions
            .get(&row)
            .copied()
            .ok_or_else(|| Error::config(format!("row {row} is not part of the table")))
    }
}
