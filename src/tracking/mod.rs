//! Running cost state for one or many models.

mod multi;
mod stream;
mod tracker;

pub use multi::{AddUsageOptions, CostHook, HookError, ModelCostSummary, MultiModelTracker};
pub use stream::{StreamCost, StreamCostHook, StreamCostOptions, calculate_stream_cost};
pub use tracker::CostTracker;
