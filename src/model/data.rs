// Embedded touch model
// Exported from the offline training run; regenerate rather than hand-edit

use crate::model::forest::{ForestModel, TreeNode};
use crate::model::scaler::Scaler;

/// Number of trees in the ensemble
pub const N_TREES: usize = 8;

/// Duration of the analysis window the model was trained on
pub const WINDOW_SIZE_SECONDS: f64 = 2.0;

pub const SCALER_MEAN: [f64; 5] = [0.0124, 0.1093, 0.0124, 0.0197, 0.0098];
pub const SCALER_SCALE: [f64; 5] = [0.0151, 0.1187, 0.0151, 0.0243, 0.0121];

static TREE_0: [TreeNode; 7] = [
    TreeNode::split(0, 0.412, 1, 4),
    TreeNode::split(3, -0.287, 2, 3),
    TreeNode::leaf(0.012),
    TreeNode::leaf(0.208),
    TreeNode::split(1, 1.083, 5, 6),
    TreeNode::leaf(0.781),
    TreeNode::leaf(0.953),
];

static TREE_1: [TreeNode; 5] = [
    TreeNode::split(4, 0.357, 1, 2),
    TreeNode::leaf(0.041),
    TreeNode::split(2, 2.214, 3, 4),
    TreeNode::leaf(0.816),
    TreeNode::leaf(0.972),
];

static TREE_2: [TreeNode; 7] = [
    TreeNode::split(1, 0.264, 1, 4),
    TreeNode::split(0, -0.118, 2, 3),
    TreeNode::leaf(0.006),
    TreeNode::leaf(0.157),
    TreeNode::split(3, 0.905, 5, 6),
    TreeNode::leaf(0.624),
    TreeNode::leaf(0.918),
];

static TREE_3: [TreeNode; 5] = [
    TreeNode::split(3, 0.533, 1, 2),
    TreeNode::leaf(0.035),
    TreeNode::split(4, 1.472, 3, 4),
    TreeNode::leaf(0.742),
    TreeNode::leaf(0.937),
];

static TREE_4: [TreeNode; 7] = [
    TreeNode::split(2, 0.298, 1, 4),
    TreeNode::split(4, -0.402, 2, 3),
    TreeNode::leaf(0.0),
    TreeNode::leaf(0.121),
    TreeNode::split(0, 3.105, 5, 6),
    TreeNode::leaf(0.857),
    TreeNode::leaf(0.989),
];

static TREE_5: [TreeNode; 7] = [
    TreeNode::split(0, 0.377, 1, 2),
    TreeNode::split(1, -0.511, 3, 4),
    TreeNode::split(3, 1.266, 5, 6),
    TreeNode::leaf(0.018),
    TreeNode::leaf(0.094),
    TreeNode::leaf(0.703),
    TreeNode::leaf(0.925),
];

static TREE_6: [TreeNode; 7] = [
    TreeNode::split(4, 0.441, 1, 4),
    TreeNode::split(3, -0.196, 2, 3),
    TreeNode::leaf(0.024),
    TreeNode::leaf(0.183),
    TreeNode::split(2, 0.977, 5, 6),
    TreeNode::leaf(0.688),
    TreeNode::leaf(0.904),
];

static TREE_7: [TreeNode; 5] = [
    TreeNode::split(1, 0.192, 1, 2),
    TreeNode::leaf(0.052),
    TreeNode::split(0, 1.638, 3, 4),
    TreeNode::leaf(0.764),
    TreeNode::leaf(0.961),
];

/// The touch / no-touch forest linked into every detector
pub static TOUCH_MODEL: ForestModel = ForestModel {
    version: "touch-rf-2024.06-r3",
    window_seconds: WINDOW_SIZE_SECONDS,
    scaler: Scaler {
        mean: SCALER_MEAN,
        scale: SCALER_SCALE,
    },
    trees: &[
        &TREE_0,
        &TREE_1,
        &TREE_2,
        &TREE_3,
        &TREE_4,
        &TREE_5,
        &TREE_6,
        &TREE_7,
    ],
};
