//! Token usage records as reported by a model call.

use serde::{Deserialize, Serialize};

/// Input token breakdown by cache behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokenDetails {
    /// Tokens billed at the full input rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_cache_tokens: Option<u64>,
    /// Tokens served from the prompt cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_tokens: Option<u64>,
    /// Tokens written to the prompt cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write_tokens: Option<u64>,
}

/// Output token breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTokenDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,
}

/// Usage report for a single call.
///
/// Every field is optional: providers differ in what they report. When a
/// breakdown is missing, the aggregate is billed as no-cache input or text
/// output respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_details: Option<InputTokenDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_token_details: Option<OutputTokenDetails>,
}

impl Usage {
    /// Aggregate-only usage, without category breakdowns.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
            total_tokens: Some(input_tokens.saturating_add(output_tokens)),
            ..Default::default()
        }
    }

    /// Usage with full category breakdowns; aggregates are derived.
    pub fn detailed(
        no_cache_tokens: u64,
        cache_read_tokens: u64,
        cache_write_tokens: u64,
        text_tokens: u64,
        reasoning_tokens: u64,
    ) -> Self {
        let input = no_cache_tokens
            .saturating_add(cache_read_tokens)
            .saturating_add(cache_write_tokens);
        let output = text_tokens.saturating_add(reasoning_tokens);
        Self {
            input_tokens: Some(input),
            output_tokens: Some(output),
            total_tokens: Some(input.saturating_add(output)),
            input_token_details: Some(InputTokenDetails {
                no_cache_tokens: Some(no_cache_tokens),
                cache_read_tokens: Some(cache_read_tokens),
                cache_write_tokens: Some(cache_write_tokens),
            }),
            output_token_details: Some(OutputTokenDetails {
                text_tokens: Some(text_tokens),
                reasoning_tokens: Some(reasoning_tokens),
            }),
        }
    }

    pub fn with_input_details(mut self, details: InputTokenDetails) -> Self {
        self.input_token_details = Some(details);
        self
    }

    pub fn with_output_details(mut self, details: OutputTokenDetails) -> Self {
        self.output_token_details = Some(details);
        self
    }

    /// Resolves the per-category counts billed by the cost engine.
    pub fn details(&self) -> UsageDetails {
        let (no_cache_tokens, cache_read_tokens, cache_write_tokens) =
            match self.input_token_details {
                Some(d) => (
                    d.no_cache_tokens.unwrap_or(0),
                    d.cache_read_tokens.unwrap_or(0),
                    d.cache_write_tokens.unwrap_or(0),
                ),
                None => (self.input_tokens.unwrap_or(0), 0, 0),
            };

        let (text_tokens, reasoning_tokens) = match self.output_token_details {
            Some(d) => (d.text_tokens.unwrap_or(0), d.reasoning_tokens.unwrap_or(0)),
            None => (self.output_tokens.unwrap_or(0), 0),
        };

        let total_input_tokens = self.input_tokens.unwrap_or_else(|| {
            no_cache_tokens
                .saturating_add(cache_read_tokens)
                .saturating_add(cache_write_tokens)
        });

        UsageDetails {
            no_cache_tokens,
            cache_read_tokens,
            cache_write_tokens,
            text_tokens,
            reasoning_tokens,
            total_input_tokens,
        }
    }
}

/// Category counts derived from a [`Usage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDetails {
    pub no_cache_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_write_tokens: u64,
    pub text_tokens: u64,
    pub reasoning_tokens: u64,
    /// Input size used for long-context tier selection
    pub total_input_tokens: u64,
}

/// Anything that carries a usage report, e.g. a finished generation.
pub trait UsageSource {
    fn usage(&self) -> &Usage;
}

impl UsageSource for Usage {
    fn usage(&self) -> &Usage {
        self
    }
}
