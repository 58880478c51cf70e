// Model module
// Embedded random-forest artifact, feature standardization and inference

pub mod data;
pub mod forest;
pub mod scaler;

pub use data::{N_TREES, TOUCH_MODEL, WINDOW_SIZE_SECONDS};
pub use forest::{ForestModel, ModelError, TreeNode, LEAF};
pub use scaler::Scaler;
