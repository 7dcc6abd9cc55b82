//! Cost tracking across many models.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cost::{CostBreakdown, RequestCounts, cost_for_policy};
use crate::detect::{
    GenerationResult, NameListClassifier, RequestClassifier, RequestOverrides, detect_requests,
};
use crate::options::{coalesce, coalesce_with};
use crate::pricing::{PricePolicy, PriceTable, global_price_table};
use crate::usage::{Usage, UsageTotals};

pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Called with `(model, cost)` after every successful [`MultiModelTracker::add`].
pub type CostHook =
    Box<dyn Fn(&str, &CostBreakdown) -> std::result::Result<(), HookError> + Send + Sync>;

/// Per-call options for [`MultiModelTracker::add`].
#[derive(Debug, Clone, Default)]
pub struct AddUsageOptions {
    pub requests: RequestCounts,
    /// Remembered for the model until another size is given
    pub image_size: Option<String>,
    /// Remembered for the model until another policy is given
    pub pricing: Option<PricePolicy>,
}

impl AddUsageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(mut self, requests: RequestCounts) -> Self {
        self.requests = requests;
        self
    }

    pub fn image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = Some(size.into());
        self
    }

    pub fn pricing(mut self, policy: PricePolicy) -> Self {
        self.pricing = Some(policy);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCostSummary {
    pub model: String,
    pub request_count: u64,
    pub usage: Usage,
    pub requests: RequestCounts,
    pub cost: CostBreakdown,
}

#[derive(Debug, Clone, Default)]
struct ModelState {
    totals: UsageTotals,
    requests: RequestCounts,
    request_count: u64,
    image_size: Option<String>,
    pricing: Option<PricePolicy>,
}

pub struct MultiModelTracker {
    table: Arc<PriceTable>,
    custom_pricing: HashMap<String, PricePolicy>,
    default_image_size: Option<String>,
    classifier: Arc<dyn RequestClassifier>,
    on_cost: Option<CostHook>,
    models: HashMap<String, ModelState>,
    /// Model ids in first-seen order
    order: Vec<String>,
}

impl Default for MultiModelTracker {
    fn default() -> Self {
        Self {
            table: global_price_table(),
            custom_pricing: HashMap::new(),
            default_image_size: None,
            classifier: Arc::new(NameListClassifier::default()),
            on_cost: None,
            models: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl fmt::Debug for MultiModelTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiModelTracker")
            .field("models", &self.order)
            .field("custom_pricing", &self.custom_pricing.keys().collect::<Vec<_>>())
            .field("default_image_size", &self.default_image_size)
            .field("has_on_cost", &self.on_cost.is_some())
            .finish()
    }
}

impl MultiModelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: Arc<PriceTable>) -> Self {
        self.table = table;
        self
    }

    /// Prices `model` with `policy` instead of the table entry.
    pub fn with_pricing(mut self, model: impl Into<String>, policy: PricePolicy) -> Self {
        self.custom_pricing.insert(model.into(), policy);
        self
    }

    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.default_image_size = Some(size.into());
        self
    }

    pub fn with_classifier(mut self, classifier: impl RequestClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn on_cost<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &CostBreakdown) -> std::result::Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_cost = Some(Box::new(hook));
        self
    }

    /// Records one call and returns the model's recomputed cost.
    ///
    /// The call is recorded even when pricing fails, so a later
    /// [`with_pricing`](Self::with_pricing) can still price it.
    pub fn add(
        &mut self,
        model: &str,
        usage: &Usage,
        options: &AddUsageOptions,
    ) -> Result<CostBreakdown> {
        let state = self.state_mut(model);
        state.totals.add_usage(usage);
        state.requests.add(&options.requests);
        state.request_count += 1;
        if let Some(size) = &options.image_size {
            state.image_size = Some(size.clone());
        }
        if let Some(policy) = &options.pricing {
            state.pricing = Some(policy.clone());
        }

        let cost = self.model_cost(model)?;

        if let Some(hook) = &self.on_cost
            && let Err(e) = hook(model, &cost)
        {
            tracing::warn!(model = %model, error = %e, "cost hook failed");
        }

        Ok(cost)
    }

    /// Like [`add`](Self::add), counting auxiliary requests from the
    /// generation's tool calls. Explicit counts in `overrides` win.
    pub fn add_detected(
        &mut self,
        model: &str,
        result: &GenerationResult,
        overrides: &RequestOverrides,
    ) -> Result<CostBreakdown> {
        let detected = detect_requests(result, self.classifier.as_ref());
        let options = AddUsageOptions::new().requests(overrides.merge_detected(&detected));
        self.add(model, &result.usage, &options)
    }

    fn state_mut(&mut self, model: &str) -> &mut ModelState {
        if !self.models.contains_key(model) {
            self.order.push(model.to_string());
        }
        self.models.entry(model.to_string()).or_default()
    }

    fn policy_for<'a>(&'a self, model: &str, state: &'a ModelState) -> Result<&'a PricePolicy> {
        coalesce_with(
            state.pricing.as_ref().map(Ok),
            self.custom_pricing.get(model).map(Ok),
            || self.table.policy_for(model),
        )
    }

    fn cost_of(&self, model: &str, state: &ModelState) -> Result<CostBreakdown> {
        let policy = self.policy_for(model, state)?;
        let image_size = coalesce(
            state.image_size.as_deref(),
            self.default_image_size.as_deref(),
            None,
        );
        Ok(cost_for_policy(
            policy,
            &state.totals.to_usage(),
            &state.requests,
            image_size,
        ))
    }

    fn model_cost(&self, model: &str) -> Result<CostBreakdown> {
        match self.models.get(model) {
            Some(state) => self.cost_of(model, state),
            None => Ok(CostBreakdown::empty()),
        }
    }

    fn summary(&self, model: &str, state: &ModelState) -> Result<ModelCostSummary> {
        Ok(ModelCostSummary {
            model: model.to_string(),
            request_count: state.request_count,
            usage: state.totals.to_usage(),
            requests: state.requests,
            cost: self.cost_of(model, state)?,
        })
    }

    /// `Ok(None)` when `model` has not been tracked.
    pub fn model(&self, model: &str) -> Result<Option<ModelCostSummary>> {
        self.models
            .get(model)
            .map(|state| self.summary(model, state))
            .transpose()
    }

    pub fn models(&self) -> &[String] {
        &self.order
    }

    pub fn all_costs(&self) -> Result<Vec<ModelCostSummary>> {
        self.order
            .iter()
            .filter_map(|model| self.models.get(model).map(|state| (model, state)))
            .map(|(model, state)| self.summary(model, state))
            .collect()
    }

    /// Sum of every model's recomputed cost, rounded once.
    pub fn total(&self) -> Result<CostBreakdown> {
        let mut total = CostBreakdown::empty();
        for model in &self.order {
            if let Some(state) = self.models.get(model) {
                total += self.cost_of(model, state)?;
            }
        }
        Ok(total.rounded())
    }

    pub fn total_request_count(&self) -> u64 {
        self.models.values().map(|s| s.request_count).sum()
    }

    /// Drops all state for `model`; it no longer appears in [`models`](Self::models).
    pub fn reset_model(&mut self, model: &str) {
        if self.models.remove(model).is_some() {
            self.order.retain(|m| m != model);
        }
    }

    pub fn reset(&mut self) {
        self.models.clear();
        self.order.clear();
    }
}
