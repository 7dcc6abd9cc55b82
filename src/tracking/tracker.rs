//! Cost tracking for a single model.

use std::sync::Arc;

use crate::Result;
use crate::cost::{CostBreakdown, RequestCounts, cost_for_policy};
use crate::pricing::{PricePolicy, PriceTable, global_price_table};
use crate::usage::{Usage, UsageTotals};

/// Running usage totals for one model.
///
/// Cost is never accumulated call by call. [`CostTracker::total_cost`]
/// prices the summed token counts, so N small calls cost exactly what one
/// call with the same total would.
#[derive(Debug, Clone)]
pub struct CostTracker {
    model: String,
    pricing: Option<PricePolicy>,
    table: Arc<PriceTable>,
    totals: UsageTotals,
    requests: RequestCounts,
    image_size: Option<String>,
    request_count: u64,
}

impl CostTracker {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            pricing: None,
            table: global_price_table(),
            totals: UsageTotals::default(),
            requests: RequestCounts::default(),
            image_size: None,
            request_count: 0,
        }
    }

    /// Prices with `policy` instead of the table entry.
    pub fn with_pricing(mut self, policy: PricePolicy) -> Self {
        self.pricing = Some(policy);
        self
    }

    pub fn with_table(mut self, table: Arc<PriceTable>) -> Self {
        self.table = table;
        self
    }

    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = Some(size.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn add_usage(&mut self, usage: &Usage) {
        self.add_usage_with(usage, &RequestCounts::default());
    }

    /// Records one call together with its auxiliary requests.
    pub fn add_usage_with(&mut self, usage: &Usage, requests: &RequestCounts) {
        self.totals.add_usage(usage);
        self.requests.add(requests);
        self.request_count += 1;
    }

    pub fn total_usage(&self) -> Usage {
        self.totals.to_usage()
    }

    pub fn totals(&self) -> &UsageTotals {
        &self.totals
    }

    pub fn total_requests(&self) -> &RequestCounts {
        &self.requests
    }

    /// Prices the accumulated totals; fails only for an unknown model.
    pub fn total_cost(&self) -> Result<CostBreakdown> {
        let policy = match &self.pricing {
            Some(policy) => policy,
            None => self.table.policy_for(&self.model)?,
        };
        Ok(cost_for_policy(
            policy,
            &self.total_usage(),
            &self.requests,
            self.image_size.as_deref(),
        ))
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn reset(&mut self) {
        self.totals = UsageTotals::default();
        self.requests = RequestCounts::default();
        self.request_count = 0;
    }
}
