//! Effective rate resolution: tier selection and optional-rate fallbacks.

use serde::{Deserialize, Serialize};

use super::policy::{LONG_CONTEXT_THRESHOLD, LongContextPricing, PricePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingTier {
    Standard,
    Extended,
}

impl PricingTier {
    /// Strictly above the threshold is extended; equal stays standard.
    pub fn for_input(total_input_tokens: u64, threshold: u64) -> Self {
        if total_input_tokens <= threshold {
            Self::Standard
        } else {
            Self::Extended
        }
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, Self::Extended)
    }
}

/// Per-million-token rates actually applied to a call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRates {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
    pub cache_read_per_mtok: f64,
    pub cache_write_per_mtok: f64,
    pub reasoning_per_mtok: f64,
    pub tier: PricingTier,
    /// Threshold the input size was compared against
    pub threshold: u64,
}

impl EffectiveRates {
    pub fn is_long_context(&self) -> bool {
        self.tier.is_extended()
    }
}

/// Selects the tier for `total_input_tokens` and fills every unset rate.
pub fn resolve(policy: &PricePolicy, total_input_tokens: u64) -> EffectiveRates {
    let rates = match &policy.long_context {
        Some(lc)
            if PricingTier::for_input(total_input_tokens, lc.effective_threshold())
                .is_extended() =>
        {
            EffectiveRates {
                input_per_mtok: lc.input_per_mtok,
                output_per_mtok: long_output(policy, lc),
                cache_read_per_mtok: long_cache_read(policy, lc),
                cache_write_per_mtok: long_cache_write(policy, lc),
                reasoning_per_mtok: long_reasoning(policy, lc),
                tier: PricingTier::Extended,
                threshold: lc.effective_threshold(),
            }
        }
        _ => EffectiveRates {
            input_per_mtok: policy.input_per_mtok,
            output_per_mtok: policy.output_per_mtok,
            cache_read_per_mtok: standard_cache_read(policy),
            cache_write_per_mtok: standard_cache_write(policy),
            reasoning_per_mtok: standard_reasoning(policy),
            tier: PricingTier::Standard,
            threshold: policy
                .long_context
                .as_ref()
                .map_or(LONG_CONTEXT_THRESHOLD, |lc| lc.effective_threshold()),
        },
    };

    tracing::trace!(
        total_input_tokens,
        tier = ?rates.tier,
        "resolved effective rates"
    );

    rates
}

fn standard_cache_read(policy: &PricePolicy) -> f64 {
    policy.cache_read_per_mtok.unwrap_or(policy.input_per_mtok)
}

fn standard_cache_write(policy: &PricePolicy) -> f64 {
    policy.cache_write_per_mtok.unwrap_or(0.0)
}

fn standard_reasoning(policy: &PricePolicy) -> f64 {
    policy.reasoning_per_mtok.unwrap_or(policy.output_per_mtok)
}

fn long_output(policy: &PricePolicy, lc: &LongContextPricing) -> f64 {
    lc.output_per_mtok.unwrap_or(policy.output_per_mtok)
}

fn long_cache_read(policy: &PricePolicy, lc: &LongContextPricing) -> f64 {
    lc.cache_read_per_mtok
        .or(policy.cache_read_per_mtok)
        .unwrap_or(lc.input_per_mtok)
}

fn long_cache_write(policy: &PricePolicy, lc: &LongContextPricing) -> f64 {
    lc.cache_write_per_mtok
        .or(policy.cache_write_per_mtok)
        .unwrap_or(0.0)
}

fn long_reasoning(policy: &PricePolicy, lc: &LongContextPricing) -> f64 {
    lc.reasoning_per_mtok
        .or(policy.reasoning_per_mtok)
        .or(lc.output_per_mtok)
        .unwrap_or(policy.output_per_mtok)
}
