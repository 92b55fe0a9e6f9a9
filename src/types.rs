//! Core value types shared by every stage of an experiment.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Stable identifier of a row in the uploaded dataset.
///
/// Tables built from the same dataset share the identifier space, so rows
/// are always looked up by id rather than by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowId(pub usize);

impl RowId {
    /// Returns the zero-based position of the row in its dataset.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for RowId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a target should be minimized or maximized.
///
/// Parsed from the raw form values `"min"` and `"max"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Smaller values are better; predictions are clipped from below.
    Min,
    /// Larger values are better; predictions are clipped from above.
    Max,
}

impl Direction {
    /// Returns the raw form value for this direction.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(Error::InvalidDirection(other.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The surrogate regression backend used to predict unlabeled rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModelKind {
    /// Bootstrap-aggregated regression trees; uncertainty is the spread
    /// across trees.
    #[default]
    RandomForest,
    /// Gaussian process with a constant × RBF kernel; uncertainty is the
    /// posterior standard deviation.
    GaussianProcess,
}

impl ModelKind {
    /// Returns the display label used by the presentation layer.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::RandomForest => "Random Forest",
            Self::GaussianProcess => "Gaussian Process",
        }
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    /// Accepts the display label or its snake-case key, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match key.as_str() {
            "random_forest" => Ok(Self::RandomForest),
            "gaussian_process" => Ok(Self::GaussianProcess),
            _ => Err(Error::UnsupportedModel(s.to_owned())),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
