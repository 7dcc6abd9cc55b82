//! # llm-cost
//!
//! Cost calculation and tracking for LLM API usage.
//!
//! Prices a usage report against a per-model policy: standard and
//! long-context tiers, cache and reasoning rates, per-request surcharges for
//! search and tool features, and image generation.
//!
//! ## Quick Start
//!
//! ```rust
//! use llm_cost::{CostRequest, Usage, calculate_cost};
//!
//! let request = CostRequest::new("claude-sonnet-4-5", Usage::new(12_000, 800));
//! let cost = calculate_cost(&request)?;
//! println!("{}", cost);
//! # Ok::<(), llm_cost::Error>(())
//! ```
//!
//! ## Tracking Many Calls
//!
//! ```rust
//! use llm_cost::{AddUsageOptions, MultiModelTracker, Usage};
//!
//! let mut tracker = MultiModelTracker::new();
//! tracker.add("gpt-4o", &Usage::new(1_000, 200), &AddUsageOptions::default())?;
//! tracker.add("claude-haiku-4-5", &Usage::new(5_000, 100), &AddUsageOptions::default())?;
//!
//! let total = tracker.total()?;
//! assert!(total.total > 0.0);
//! # Ok::<(), llm_cost::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cost;
pub mod detect;
pub mod options;
pub mod prelude;
pub mod pricing;
pub mod tracking;
pub mod usage;

pub use cost::{
    CostBreakdown, CostRequest, Currency, DEFAULT_DECIMALS, RequestCounts, calculate_cost,
    cost_for_policy, format_breakdown, format_cost, round_micro,
};
pub use detect::{
    GenerationResult, GroundingMetadata, NameListClassifier, RequestClassifier, RequestKind,
    RequestOverrides, Step, ToolCall, detect_requests,
};
pub use pricing::{
    EffectiveRates, LONG_CONTEXT_THRESHOLD, LongContextPricing, PricePolicy, PriceTable,
    PriceTableBuilder, PricingTier, global_price_table,
};
pub use tracking::{
    AddUsageOptions, CostHook, CostTracker, HookError, ModelCostSummary, MultiModelTracker,
    StreamCost, StreamCostHook, StreamCostOptions, calculate_stream_cost,
};
pub use usage::{
    InputTokenDetails, OutputTokenDetails, Usage, UsageDetails, UsageSource, UsageTotals,
};

/// Error type for llm-cost operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No price policy for the model, even after id normalization.
    #[error("Unknown model: {model} (pass a price policy or add the model to the price table)")]
    UnknownModel { model: String },

    /// Invalid price table configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml_bw::Error),
}

impl Error {
    pub fn unknown_model(model: impl Into<String>) -> Self {
        Error::UnknownModel {
            model: model.into(),
        }
    }

    pub fn is_unknown_model(&self) -> bool {
        matches!(self, Error::UnknownModel { .. })
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Json(_) | Error::Yaml(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
