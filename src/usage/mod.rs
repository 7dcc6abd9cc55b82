mod record;
mod totals;

pub use record::{InputTokenDetails, OutputTokenDetails, Usage, UsageDetails, UsageSource};
pub use totals::UsageTotals;
