//! Cost engine: usage plus policy to a rounded breakdown.

use serde::{Deserialize, Serialize};

use super::breakdown::CostBreakdown;
use crate::Result;
use crate::pricing::{PricePolicy, PriceTable, global_price_table, resolve};
use crate::usage::Usage;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;
const REQUESTS_PER_THOUSAND: f64 = 1_000.0;

/// Auxiliary requests made alongside a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCounts {
    #[serde(default)]
    pub web_search: u64,
    #[serde(default)]
    pub google_maps: u64,
    #[serde(default)]
    pub x_search: u64,
    #[serde(default)]
    pub code_execution: u64,
    #[serde(default)]
    pub document_search: u64,
    #[serde(default)]
    pub collections_search: u64,
    #[serde(default)]
    pub image_generations: u64,
}

impl RequestCounts {
    pub fn add(&mut self, other: &RequestCounts) {
        self.web_search = self.web_search.saturating_add(other.web_search);
        self.google_maps = self.google_maps.saturating_add(other.google_maps);
        self.x_search = self.x_search.saturating_add(other.x_search);
        self.code_execution = self.code_execution.saturating_add(other.code_execution);
        self.document_search = self.document_search.saturating_add(other.document_search);
        self.collections_search = self
            .collections_search
            .saturating_add(other.collections_search);
        self.image_generations = self
            .image_generations
            .saturating_add(other.image_generations);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Inputs to a single cost calculation.
#[derive(Debug, Clone)]
pub struct CostRequest {
    pub model: String,
    pub usage: Usage,
    /// Used instead of the price table when set
    pub pricing: Option<PricePolicy>,
    pub requests: RequestCounts,
    pub image_size: Option<String>,
}

impl CostRequest {
    pub fn new(model: impl Into<String>, usage: Usage) -> Self {
        Self {
            model: model.into(),
            usage,
            pricing: None,
            requests: RequestCounts::default(),
            image_size: None,
        }
    }

    pub fn pricing(mut self, policy: PricePolicy) -> Self {
        self.pricing = Some(policy);
        self
    }

    pub fn requests(mut self, requests: RequestCounts) -> Self {
        self.requests = requests;
        self
    }

    pub fn web_search(mut self, count: u64) -> Self {
        self.requests.web_search = count;
        self
    }

    pub fn google_maps(mut self, count: u64) -> Self {
        self.requests.google_maps = count;
        self
    }

    pub fn x_search(mut self, count: u64) -> Self {
        self.requests.x_search = count;
        self
    }

    pub fn code_execution(mut self, count: u64) -> Self {
        self.requests.code_execution = count;
        self
    }

    pub fn document_search(mut self, count: u64) -> Self {
        self.requests.document_search = count;
        self
    }

    pub fn collections_search(mut self, count: u64) -> Self {
        self.requests.collections_search = count;
        self
    }

    pub fn images(mut self, count: u64) -> Self {
        self.requests.image_generations = count;
        self
    }

    pub fn image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = Some(size.into());
        self
    }
}

impl PriceTable {
    /// Prices `request` with its override policy, else this table's entry.
    pub fn calculate(&self, request: &CostRequest) -> Result<CostBreakdown> {
        let policy = match &request.pricing {
            Some(policy) => policy,
            None => self.policy_for(&request.model)?,
        };
        let breakdown = cost_for_policy(
            policy,
            &request.usage,
            &request.requests,
            request.image_size.as_deref(),
        );
        tracing::trace!(model = %request.model, total = breakdown.total, "calculated cost");
        Ok(breakdown)
    }
}

/// Prices `request` against the global price table.
pub fn calculate_cost(request: &CostRequest) -> Result<CostBreakdown> {
    global_price_table().calculate(request)
}

/// Rounded breakdown for one call under `policy`.
pub fn cost_for_policy(
    policy: &PricePolicy,
    usage: &Usage,
    requests: &RequestCounts,
    image_size: Option<&str>,
) -> CostBreakdown {
    let details = usage.details();
    let rates = resolve(policy, details.total_input_tokens);

    // phantom search tokens are billed at the input rate of the selected tier,
    // and only alongside a non-zero request fee
    let web_search = match policy.web_search_per_1k {
        Some(rate) if rate > 0.0 && requests.web_search > 0 => {
            let phantom = requests
                .web_search
                .saturating_mul(policy.web_search_tokens_per_request.unwrap_or(0));
            requests.web_search as f64 / REQUESTS_PER_THOUSAND * rate
                + per_million(phantom, rates.input_per_mtok)
        }
        _ => 0.0,
    };

    let image_generation = if requests.image_generations > 0 {
        requests.image_generations as f64 * policy.image_price(image_size)
    } else {
        0.0
    };

    let mut raw = CostBreakdown {
        input: per_million(details.no_cache_tokens, rates.input_per_mtok),
        output: per_million(details.text_tokens, rates.output_per_mtok),
        cache_read: per_million(details.cache_read_tokens, rates.cache_read_per_mtok),
        cache_write: per_million(details.cache_write_tokens, rates.cache_write_per_mtok),
        reasoning: per_million(details.reasoning_tokens, rates.reasoning_per_mtok),
        web_search,
        google_maps: per_thousand(requests.google_maps, policy.google_maps_per_1k),
        x_search: per_thousand(requests.x_search, policy.x_search_per_1k),
        code_execution: per_thousand(requests.code_execution, policy.code_execution_per_1k),
        document_search: per_thousand(requests.document_search, policy.document_search_per_1k),
        collections_search: per_thousand(
            requests.collections_search,
            policy.collections_search_per_1k,
        ),
        image_generation,
        is_long_context: rates.is_long_context(),
        ..CostBreakdown::empty()
    };
    raw.total = raw.category_sum();
    raw.rounded()
}

fn per_million(tokens: u64, rate: f64) -> f64 {
    tokens as f64 / TOKENS_PER_MILLION * rate
}

fn per_thousand(count: u64, rate: Option<f64>) -> f64 {
    match rate {
        Some(rate) if count > 0 => count as f64 / REQUESTS_PER_THOUSAND * rate,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::LongContextPricing;
    use crate::usage::{InputTokenDetails, OutputTokenDetails};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_basic_categories() {
        let policy = PricePolicy::new(2.0, 8.0).cache_read(0.5);
        let usage = Usage::new(1_500_000, 200_000).with_input_details(InputTokenDetails {
            no_cache_tokens: Some(1_000_000),
            cache_read_tokens: Some(500_000),
            cache_write_tokens: None,
        });

        let cost = cost_for_policy(&policy, &usage, &RequestCounts::default(), None);
        assert!(close(cost.input, 2.0));
        assert!(close(cost.cache_read, 0.25));
        assert!(close(cost.output, 1.6));
        assert!(close(cost.total, 3.85));
        assert!(!cost.is_long_context);
    }

    #[test]
    fn test_reasoning_falls_back_to_output_rate() {
        let usage = Usage::new(0, 1_000_000).with_output_details(OutputTokenDetails {
            text_tokens: Some(0),
            reasoning_tokens: Some(1_000_000),
        });
        let cost = cost_for_policy(
            &PricePolicy::new(1.0, 4.0),
            &usage,
            &RequestCounts::default(),
            None,
        );
        assert!(close(cost.reasoning, 4.0));
        assert!(close(cost.output, 0.0));
    }

    #[test]
    fn test_long_context_switch() {
        let policy = PricePolicy::new(3.0, 15.0)
            .long_context(LongContextPricing::new(6.0).output(22.5));
        let none = RequestCounts::default();

        let at = cost_for_policy(&policy, &Usage::new(200_000, 0), &none, None);
        assert!(!at.is_long_context);
        assert!(close(at.input, 0.6));

        let over = cost_for_policy(&policy, &Usage::new(200_001, 1_000), &none, None);
        assert!(over.is_long_context);
        assert!(close(over.input, 1.200006));
        assert!(close(over.output, 0.0225));
    }

    #[test]
    fn test_web_search_with_phantom_tokens() {
        let policy = PricePolicy::new(0.15, 0.6).web_search(25.0).web_search_tokens(8_000);
        let requests = RequestCounts {
            web_search: 2,
            ..Default::default()
        };
        let cost = cost_for_policy(&policy, &Usage::default(), &requests, None);
        // 2/1000 * 25 + 16000 tokens at 0.15/M
        assert!(close(cost.web_search, 0.0524));
        assert!(close(cost.total, 0.0524));
    }

    #[test]
    fn test_web_search_five_requests() {
        let policy = PricePolicy::new(0.15, 0.6).web_search(10.0).web_search_tokens(8_000);
        let requests = RequestCounts {
            web_search: 5,
            ..Default::default()
        };
        let cost = cost_for_policy(&policy, &Usage::default(), &requests, None);
        // 5/1000 * 10 + 40000 tokens at 0.15/M
        assert!(close(cost.web_search, 0.056));
    }

    #[test]
    fn test_zero_web_search_rate_skips_phantom_tokens() {
        let policy = PricePolicy::new(0.15, 0.6).web_search(0.0).web_search_tokens(8_000);
        let requests = RequestCounts {
            web_search: 5,
            ..Default::default()
        };
        let cost = cost_for_policy(&policy, &Usage::default(), &requests, None);
        assert_eq!(cost.web_search, 0.0);
        assert!(cost.is_zero());
    }

    #[test]
    fn test_surcharge_requires_rate_and_count() {
        let policy = PricePolicy::new(1.0, 1.0).web_search(10.0);
        let requests = RequestCounts {
            google_maps: 100,
            ..Default::default()
        };
        let cost = cost_for_policy(&policy, &Usage::default(), &requests, None);
        assert_eq!(cost.google_maps, 0.0);
        assert_eq!(cost.web_search, 0.0);
        assert!(cost.is_zero());
    }

    #[test]
    fn test_xai_tool_surcharges() {
        let policy = PricePolicy::new(3.0, 15.0)
            .x_search(5.0)
            .code_execution(5.0)
            .document_search(5.0)
            .collections_search(2.5);
        let requests = RequestCounts {
            x_search: 10,
            code_execution: 2,
            document_search: 4,
            collections_search: 8,
            ..Default::default()
        };
        let cost = cost_for_policy(&policy, &Usage::default(), &requests, None);
        assert!(close(cost.x_search, 0.05));
        assert!(close(cost.code_execution, 0.01));
        assert!(close(cost.document_search, 0.02));
        assert!(close(cost.collections_search, 0.02));
        assert!(close(cost.total, 0.1));
    }

    #[test]
    fn test_image_pricing() {
        let policy = PricePolicy::new(0.0, 0.0)
            .image(0.04)
            .image_size("hd-1024x1024", 0.08);
        let three = RequestCounts {
            image_generations: 3,
            ..Default::default()
        };
        let two = RequestCounts {
            image_generations: 2,
            ..Default::default()
        };

        let hd = cost_for_policy(&policy, &Usage::default(), &three, Some("hd-1024x1024"));
        assert!(close(hd.image_generation, 0.24));

        let unlisted = cost_for_policy(&policy, &Usage::default(), &two, Some("256x256"));
        assert!(close(unlisted.image_generation, 0.08));

        let unpriced = cost_for_policy(&PricePolicy::new(1.0, 1.0), &Usage::default(), &two, None);
        assert_eq!(unpriced.image_generation, 0.0);
    }

    #[test]
    fn test_fields_rounded_independently() {
        let policy = PricePolicy::new(1.0, 1.0);
        // 1 token at $1/M is exactly one micro-dollar; 0.4 micro rounds away
        let cost = cost_for_policy(&policy, &Usage::new(1, 0), &RequestCounts::default(), None);
        assert_eq!(cost.input, 0.000001);

        let policy = PricePolicy::new(0.4, 0.4);
        let cost = cost_for_policy(&policy, &Usage::new(1, 1), &RequestCounts::default(), None);
        assert_eq!(cost.input, 0.0);
        assert_eq!(cost.output, 0.0);
        // total is rounded from the raw sum, not from rounded parts
        assert_eq!(cost.total, 0.000001);
    }

    #[test]
    fn test_table_calculate_with_override() {
        let table = PriceTable::new();
        let request = CostRequest::new("in-house-model", Usage::new(1_000_000, 0));

        let err = table.calculate(&request).unwrap_err();
        assert!(err.is_unknown_model());

        let cost = table
            .calculate(&request.clone().pricing(PricePolicy::new(2.0, 8.0)))
            .unwrap();
        assert!(close(cost.total, 2.0));
    }

    #[test]
    fn test_calculate_cost_builtin() {
        let request = CostRequest::new(
            "claude-sonnet-4-5-20250929",
            Usage::new(100_000, 1_000_000),
        );
        let cost = calculate_cost(&request).unwrap();
        assert!(!cost.is_long_context);
        assert!(close(cost.total, 15.3));
    }

    #[test]
    fn test_calculate_cost_unknown_model() {
        let err = calculate_cost(&CostRequest::new("not-a-real-model", Usage::new(10, 10)))
            .unwrap_err();
        assert!(err.is_unknown_model());
    }

    #[test]
    fn test_request_counts_add() {
        let mut counts = RequestCounts {
            web_search: 1,
            ..Default::default()
        };
        counts.add(&RequestCounts {
            web_search: 2,
            image_generations: u64::MAX,
            ..Default::default()
        });
        counts.add(&RequestCounts {
            image_generations: 1,
            ..Default::default()
        });
        assert_eq!(counts.web_search, 3);
        assert_eq!(counts.image_generations, u64::MAX);
        assert!(!counts.is_empty());
        assert!(RequestCounts::default().is_empty());
    }
}
