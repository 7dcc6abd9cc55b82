//! Prelude module for convenient imports.
//!
//! ```rust
//! use llm_cost::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

// Usage
pub use crate::usage::{Usage, UsageSource};

// Pricing
pub use crate::pricing::{LongContextPricing, PricePolicy, PriceTable, global_price_table};

// Cost
pub use crate::cost::{CostBreakdown, CostRequest, RequestCounts, calculate_cost};

// Tracking
pub use crate::tracking::{AddUsageOptions, CostTracker, MultiModelTracker};
