//! Random-forest regression with tree-spread uncertainty.
//!
//! A bootstrap-aggregated ensemble of regression trees. Each tree is grown
//! on a bootstrap sample of the training rows by greedy variance-reduction
//! splits; a query row is predicted by every tree, and the forest reports
//! the **mean** of those predictions as the estimate and their
//! **population standard deviation** as the uncertainty.
//!
//! All randomness (bootstrap samples and feature subsets) comes from one
//! `fastrand::Rng` seeded from [`RandomForestConfig::seed`], so fitting the
//! same data twice yields bit-identical predictions.
//!
//! # Examples
//!
//! ```
//! use sequential_learning::model::forest::{RandomForest, RandomForestConfig};
//!
//! let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
//! let y = vec![0.0, 1.0, 2.0, 3.0];
//! let forest = RandomForest::new(RandomForestConfig { n_trees: 20, ..Default::default() });
//!
//! let fitted = forest.fit(&x, &y).unwrap();
//! let (mean, std) = fitted.predict(&[1.5]).unwrap();
//! assert!((0.0..=3.0).contains(&mean));
//! assert!(std >= 0.0);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Prediction, Surrogate, check_row_width, check_training_data};
use crate::error::Result;
use crate::rng_util;
use crate::stats;

/// Random-forest settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RandomForestConfig {
    /// Number of trees (default: 100).
    pub n_trees: usize,
    /// Maximum depth of each tree. `None` for unlimited (default: `None`).
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node (default: 2).
    pub min_samples_split: usize,
    /// Minimum samples required in a leaf node (default: 1).
    pub min_samples_leaf: usize,
    /// Features considered per split. `None` for all features (default: `None`).
    pub max_features: Option<usize>,
    /// Random seed (default: 42).
    pub seed: u64,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

/// Random-forest surrogate. See the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct RandomForest {
    config: RandomForestConfig,
}

impl RandomForest {
    #[must_use]
    pub fn new(config: RandomForestConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RandomForestConfig {
        &self.config
    }

    /// Grows the forest on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// if `x` is empty, ragged, or not as long as `y`.
    pub fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<FittedForest> {
        check_training_data(x, y)?;
        let mut rng = fastrand::Rng::with_seed(self.config.seed);
        let trees = (0..self.config.n_trees.max(1))
            .map(|_| {
                let sample = rng_util::bootstrap(&mut rng, x.len());
                RegressionTree::grow(x, y, &sample, &self.config, &mut rng)
            })
            .collect();
        Ok(FittedForest {
            trees,
            n_features: x[0].len(),
        })
    }
}

impl Surrogate for RandomForest {
    fn fit_predict(
        &self,
        x_train: &[Vec<f64>],
        y_train: &[f64],
        x_test: &[Vec<f64>],
    ) -> Result<Prediction> {
        let fitted = self.fit(x_train, y_train)?;
        let (mean, std) = x_test
            .iter()
            .map(|row| fitted.predict(row))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();
        Ok(Prediction { mean, std })
    }
}

/// A grown forest.
#[derive(Debug, Clone)]
pub struct FittedForest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl FittedForest {
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of features the forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Returns `(mean, std)` of the per-tree predictions for one row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// if `row` does not have [`n_features`](Self::n_features) values.
    pub fn predict(&self, row: &[f64]) -> Result<(f64, f64)> {
        check_row_width(row, self.n_features)?;
        let per_tree: Vec<f64> = self.trees.iter().map(|t| t.predict(row)).collect();
        Ok((stats::mean(&per_tree), stats::population_std(&per_tree)))
    }
}

// --- Regression tree ---

/// A node in the regression tree (arena-allocated).
#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct RegressionTree {
    nodes: Vec<TreeNode>,
}

/// Best split found at a node.
struct Split {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl RegressionTree {
    fn grow(
        data: &[Vec<f64>],
        targets: &[f64],
        sample: &[usize],
        config: &RandomForestConfig,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(data, targets, sample, 0, config, rng);
        tree
    }

    fn leaf(&mut self, value: f64) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(TreeNode::Leaf { value });
        idx
    }

    fn grow_node(
        &mut self,
        data: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        config: &RandomForestConfig,
        rng: &mut fastrand::Rng,
    ) -> usize {
        let values: Vec<f64> = indices.iter().map(|&i| targets[i]).collect();
        let mean = stats::mean(&values);

        if indices.len() < config.min_samples_split.max(2)
            || config.max_depth.is_some_and(|d| depth >= d)
        {
            return self.leaf(mean);
        }

        // Pure node check (all targets identical)
        #[allow(clippy::float_cmp)]
        if values.iter().all(|&v| v == values[0]) {
            return self.leaf(mean);
        }

        let n_features = data[indices[0]].len();
        let candidates = match config.max_features {
            Some(k) if k < n_features => rng_util::partial_shuffle(rng, n_features, k.max(1)),
            _ => (0..n_features).collect(),
        };

        let Some(split) = best_split(data, targets, indices, &candidates, config.min_samples_leaf)
        else {
            return self.leaf(mean);
        };
        if split.score <= 0.0 {
            return self.leaf(mean);
        }

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| data[i][split.feature] <= split.threshold);

        if left_indices.is_empty() || right_indices.is_empty() {
            return self.leaf(mean);
        }

        // Reserve slot for this split node (placeholder replaced below)
        let node_idx = self.leaf(0.0);
        let left = self.grow_node(data, targets, &left_indices, depth + 1, config, rng);
        let right = self.grow_node(data, targets, &right_indices, depth + 1, config, rng);
        self.nodes[node_idx] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

/// Finds the variance-reducing split with the highest score among the
/// candidate features, sweeping each feature's sorted values once.
///
/// Thresholds sit at the midpoint between consecutive distinct values.
#[allow(clippy::cast_precision_loss)]
fn best_split(
    data: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    candidates: &[usize],
    min_samples_leaf: usize,
) -> Option<Split> {
    let n = indices.len();
    let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
    let total_var = total_sq - total_sum * total_sum / n as f64;

    let mut best: Option<Split> = None;
    for &feature in candidates {
        let mut pairs: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (data[i][feature], targets[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (mut l_sum, mut l_sq) = (0.0, 0.0);
        for k in 0..n - 1 {
            let (x, y) = pairs[k];
            l_sum += y;
            l_sq += y * y;

            let next = pairs[k + 1].0;
            if next <= x {
                continue;
            }
            let l_n = k + 1;
            let r_n = n - l_n;
            if l_n < min_samples_leaf || r_n < min_samples_leaf {
                continue;
            }

            let r_sum = total_sum - l_sum;
            let r_sq = total_sq - l_sq;
            let l_var = l_sq - l_sum * l_sum / l_n as f64;
            let r_var = r_sq - r_sum * r_sum / r_n as f64;
            let score = total_var - l_var - r_var;

            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(Split {
                    feature,
                    threshold: f64::midpoint(x, next),
                    score,
                });
            }
        }
    }
    best
}
