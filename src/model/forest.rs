// Random forest inference
// Iterative traversal of embedded decision trees, averaged into one probability

use thiserror::Error;

use crate::audio::features::{FeatureVector, FEATURE_COUNT};
use crate::model::scaler::Scaler;

/// Child index marking a leaf node
pub const LEAF: i32 = -1;

/// Errors found when checking a model artifact for well-formedness
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Model has no trees")]
    EmptyForest,

    #[error("Tree {0} has no nodes")]
    EmptyTree(usize),

    #[error("Tree {tree} node {node}: child index {child} out of range")]
    ChildOutOfRange { tree: usize, node: usize, child: i32 },

    #[error("Tree {tree} node {node}: feature index {feature} out of range")]
    FeatureOutOfRange { tree: usize, node: usize, feature: i32 },

    #[error("Tree {tree} node {node}: leaf probability {prob} outside [0, 1]")]
    InvalidProbability { tree: usize, node: usize, prob: f64 },

    #[error("Scaler entry {0} has a zero or non-finite scale")]
    InvalidScale(usize),

    #[error("Window duration must be positive, got {0}")]
    InvalidWindow(f64),
}

/// One node of a binary decision tree.
///
/// Layout is the contract with the offline training export: split nodes
/// route on `scaled[feature] <= threshold`, leaves have `left == -1` and
/// carry the positive-class fraction in `prob`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeNode {
    pub feature: i32,
    pub threshold: f64,
    pub left: i32,
    pub right: i32,
    pub prob: f64,
}

impl TreeNode {
    /// Internal node
    pub const fn split(feature: i32, threshold: f64, left: i32, right: i32) -> Self {
        TreeNode {
            feature,
            threshold,
            left,
            right,
            prob: 0.0,
        }
    }

    /// Terminal node
    pub const fn leaf(prob: f64) -> Self {
        TreeNode {
            feature: -2,
            threshold: -2.0,
            left: LEAF,
            right: LEAF,
            prob,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left == LEAF
    }
}

/// Read-only ensemble plus the preprocessing it was trained with.
/// Instances are `static` tables shared by every detector.
#[derive(Debug)]
pub struct ForestModel {
    /// Artifact version from the training export
    pub version: &'static str,

    /// Analysis window duration the features were computed over
    pub window_seconds: f64,

    pub scaler: Scaler,

    pub trees: &'static [&'static [TreeNode]],
}

impl ForestModel {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Ensemble probability for an already standardized feature vector
    pub fn predict_scaled(&self, scaled: &[f64; FEATURE_COUNT]) -> f64 {
        let sum: f64 = self
            .trees
            .iter()
            .map(|nodes| leaf_probability(nodes, scaled))
            .sum();
        sum / self.trees.len() as f64
    }

    /// Standardize raw features, then run the forest
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let scaled = self.scaler.transform(&features.to_array());
        self.predict_scaled(&scaled)
    }

    /// Check structural invariants of the artifact. Not called on the
    /// detection path; embedded tables are checked by tests.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.window_seconds > 0.0 && self.window_seconds.is_finite()) {
            return Err(ModelError::InvalidWindow(self.window_seconds));
        }

        for (i, &scale) in self.scaler.scale.iter().enumerate() {
            if scale == 0.0 || !scale.is_finite() {
                return Err(ModelError::InvalidScale(i));
            }
        }

        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }

        for (tree, nodes) in self.trees.iter().enumerate() {
            if nodes.is_empty() {
                return Err(ModelError::EmptyTree(tree));
            }

            for (node, n) in nodes.iter().enumerate() {
                if n.is_leaf() {
                    if !(0.0..=1.0).contains(&n.prob) {
                        return Err(ModelError::InvalidProbability {
                            tree,
                            node,
                            prob: n.prob,
                        });
                    }
                    continue;
                }

                if n.feature < 0 || n.feature as usize >= FEATURE_COUNT {
                    return Err(ModelError::FeatureOutOfRange {
                        tree,
                        node,
                        feature: n.feature,
                    });
                }

                // Children must point forward to keep traversal finite
                for child in [n.left, n.right] {
                    if child <= node as i32 || child as usize >= nodes.len() {
                        return Err(ModelError::ChildOutOfRange { tree, node, child });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Walk one tree from the root to a leaf: left on `<=`, right on `>`
#[inline]
fn leaf_probability(nodes: &[TreeNode], scaled: &[f64; FEATURE_COUNT]) -> f64 {
    let mut index = 0usize;
    loop {
        let node = &nodes[index];
        if node.is_leaf() {
            return node.prob;
        }
        index = if scaled[node.feature as usize] <= node.threshold {
            node.left as usize
        } else {
            node.right as usize
        };
    }
}
