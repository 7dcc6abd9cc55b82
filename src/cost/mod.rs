//! Cost engine, breakdown algebra and formatting.

mod breakdown;
mod calculator;
mod format;

pub use breakdown::{CostBreakdown, Currency, round_micro};
pub use calculator::{CostRequest, RequestCounts, calculate_cost, cost_for_policy};
pub use format::{DEFAULT_DECIMALS, format_breakdown, format_cost};
