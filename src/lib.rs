#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Sequential learning for materials discovery: rank untested candidate
//! formulations by how promising and how informative they are to measure
//! next.
//!
//! A surrogate regressor is fitted on the rows whose targets have been
//! measured and predicts every other row. Each candidate then receives a
//! **utility** (normalized, weighted predictions, plus `curiosity` times
//! the normalized uncertainty, plus weighted a-priori values) and a
//! **novelty** (distance to the nearest measured row, scaled into `(0, 1]`).
//!
//! # Getting Started
//!
//! ```
//! use sequential_learning::prelude::*;
//!
//! let dataset = Dataset::new("concrete")
//!     .with_column("water", [0.40, 0.45, 0.50, 0.55, 0.60])
//!     .unwrap()
//!     .with_column("Target: strength", [Some(48.0), Some(41.0), None, None, None])
//!     .unwrap();
//!
//! let request = ExperimentRequest::builder()
//!     .features(["water"])
//!     .target("Target: strength", 1.0, "max", None)
//!     .model("Random Forest")
//!     .curiosity(1.0)
//!     .build();
//!
//! let result = ExperimentConductor::run(&dataset, &request).unwrap();
//! let best = result.best().unwrap();
//! println!("measure row {} next (utility {:.3})", best.row, best.utility);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Dataset`](dataset::Dataset) | Uploaded table of features, targets and a-priori values. |
//! | [`ExperimentRequest`](request::ExperimentRequest) | Raw selection and settings from the user. |
//! | [`Experiment`](experiment::Experiment) | Validated, immutable input built by [`preprocess`](preprocess::preprocess). |
//! | [`ModelOutput`](model::ModelOutput) | Per-target prediction and uncertainty for the unlabeled rows. |
//! | [`ExperimentResult`](postprocess::ExperimentResult) | Candidates ranked by utility, with novelty. |
//!
//! # Models
//!
//! | Selector | Model | Uncertainty |
//! |----------|-------|-------------|
//! | `"Random Forest"` (default) | [`RandomForest`](model::RandomForest) | Std across trees |
//! | `"Gaussian Process"` | [`GaussianProcess`](model::GaussianProcess) | Posterior std |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on public types; `save`/`load`/`to_json` on [`ExperimentResult`](postprocess::ExperimentResult) | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at each pipeline stage | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod conductor;
pub mod dataset;
mod error;
pub mod experiment;
pub mod model;
pub mod novelty;
pub mod postprocess;
pub mod preprocess;
pub mod request;
mod rng_util;
mod stats;
mod table;
mod types;
pub mod utility;

pub use conductor::ExperimentConductor;
pub use error::{Error, Result};
pub use table::Table;
pub use types::{Direction, ModelKind, RowId};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use sequential_learning::prelude::*;
/// ```
pub mod prelude {
    pub use crate::conductor::ExperimentConductor;
    pub use crate::dataset::{Dataset, Value};
    pub use crate::error::{Error, Result};
    pub use crate::experiment::{AprioriSpec, Experiment, TargetSpec};
    pub use crate::model::{
        GaussianProcess, GaussianProcessConfig, ModelOutput, RandomForest, RandomForestConfig,
        Regressor, Surrogate, fit_and_predict,
    };
    pub use crate::novelty::compute_novelty;
    pub use crate::postprocess::{CandidateRow, ExperimentResult, postprocess};
    pub use crate::preprocess::preprocess;
    pub use crate::request::ExperimentRequest;
    pub use crate::table::Table;
    pub use crate::types::{Direction, ModelKind, RowId};
    pub use crate::utility::{UtilityScores, compute_utility};
}
