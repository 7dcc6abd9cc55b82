//! Pricing for results that are still being produced.

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::multi::HookError;
use crate::cost::{CostBreakdown, CostRequest};
use crate::pricing::{PricePolicy, PriceTable, global_price_table};
use crate::usage::{Usage, UsageSource};

pub type StreamCostHook =
    Box<dyn Fn(&CostBreakdown, &Usage) -> std::result::Result<(), HookError> + Send + Sync>;

pub struct StreamCostOptions {
    pub model: String,
    pub pricing: Option<PricePolicy>,
    table: Arc<PriceTable>,
    on_cost: Option<StreamCostHook>,
}

impl fmt::Debug for StreamCostOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamCostOptions")
            .field("model", &self.model)
            .field("pricing", &self.pricing)
            .field("has_on_cost", &self.on_cost.is_some())
            .finish()
    }
}

impl StreamCostOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            pricing: None,
            table: global_price_table(),
            on_cost: None,
        }
    }

    pub fn pricing(mut self, policy: PricePolicy) -> Self {
        self.pricing = Some(policy);
        self
    }

    pub fn table(mut self, table: Arc<PriceTable>) -> Self {
        self.table = table;
        self
    }

    pub fn on_cost<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CostBreakdown, &Usage) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_cost = Some(Box::new(hook));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamCost {
    pub cost: CostBreakdown,
    pub usage: Usage,
}

/// Awaits `pending` and prices its usage.
///
/// An error from `pending` is returned as is; pricing errors convert into
/// the caller's error type.
pub async fn calculate_stream_cost<P, T, E>(
    pending: P,
    options: &StreamCostOptions,
) -> std::result::Result<StreamCost, E>
where
    P: IntoFuture<Output = std::result::Result<T, E>>,
    T: UsageSource,
    E: From<crate::Error>,
{
    let result = pending.await?;
    let usage = *result.usage();

    let mut request = CostRequest::new(options.model.clone(), usage);
    request.pricing = options.pricing.clone();
    let cost = options.table.calculate(&request)?;

    if let Some(hook) = &options.on_cost
        && let Err(e) = hook(&cost, &usage)
    {
        tracing::warn!(model = %options.model, error = %e, "stream cost hook failed");
    }

    Ok(StreamCost { cost, usage })
}
