use serde::{Deserialize, Serialize};

use super::record::{InputTokenDetails, OutputTokenDetails, Usage};

/// Running sums of raw token counts, by billing category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    pub no_cache_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_write_tokens: u64,
    pub text_tokens: u64,
    pub reasoning_tokens: u64,
}

impl UsageTotals {
    #[inline]
    pub fn input_tokens(&self) -> u64 {
        self.no_cache_tokens
            .saturating_add(self.cache_read_tokens)
            .saturating_add(self.cache_write_tokens)
    }

    #[inline]
    pub fn output_tokens(&self) -> u64 {
        self.text_tokens.saturating_add(self.reasoning_tokens)
    }

    /// Merges one usage report, with the same aggregate fallback as the
    /// cost engine.
    pub fn add_usage(&mut self, usage: &Usage) {
        self.add(&Self::from(usage));
    }

    pub fn add(&mut self, other: &UsageTotals) {
        self.no_cache_tokens = self.no_cache_tokens.saturating_add(other.no_cache_tokens);
        self.cache_read_tokens = self
            .cache_read_tokens
            .saturating_add(other.cache_read_tokens);
        self.cache_write_tokens = self
            .cache_write_tokens
            .saturating_add(other.cache_write_tokens);
        self.text_tokens = self.text_tokens.saturating_add(other.text_tokens);
        self.reasoning_tokens = self.reasoning_tokens.saturating_add(other.reasoning_tokens);
    }

    pub fn is_empty(&self) -> bool {
        self.input_tokens() == 0 && self.output_tokens() == 0
    }

    /// Rebuilds a fully detailed usage report from the sums.
    pub fn to_usage(&self) -> Usage {
        let input = self.input_tokens();
        let output = self.output_tokens();
        Usage {
            input_tokens: Some(input),
            output_tokens: Some(output),
            total_tokens: Some(input.saturating_add(output)),
            input_token_details: Some(InputTokenDetails {
                no_cache_tokens: Some(self.no_cache_tokens),
                cache_read_tokens: Some(self.cache_read_tokens),
                cache_write_tokens: Some(self.cache_write_tokens),
            }),
            output_token_details: Some(OutputTokenDetails {
                text_tokens: Some(self.text_tokens),
                reasoning_tokens: Some(self.reasoning_tokens),
            }),
        }
    }
}

impl From<&Usage> for UsageTotals {
    fn from(usage: &Usage) -> Self {
        let details = usage.details();
        Self {
            no_cache_tokens: details.no_cache_tokens,
            cache_read_tokens: details.cache_read_tokens,
            cache_write_tokens: details.cache_write_tokens,
            text_tokens: details.text_tokens,
            reasoning_tokens: details.reasoning_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_usage_accumulates() {
        let mut totals = UsageTotals::default();
        totals.add_usage(&Usage::detailed(100, 50, 25, 200, 10));
        totals.add_usage(&Usage::new(1_000, 300));

        assert_eq!(totals.no_cache_tokens, 1_100);
        assert_eq!(totals.cache_read_tokens, 50);
        assert_eq!(totals.cache_write_tokens, 25);
        assert_eq!(totals.text_tokens, 500);
        assert_eq!(totals.reasoning_tokens, 10);
        assert_eq!(totals.input_tokens(), 1_175);
        assert_eq!(totals.output_tokens(), 510);
    }

    #[test]
    fn test_to_usage_round_trips_details() {
        let totals = UsageTotals {
            no_cache_tokens: 10,
            cache_read_tokens: 20,
            cache_write_tokens: 30,
            text_tokens: 40,
            reasoning_tokens: 50,
        };
        let usage = totals.to_usage();
        assert_eq!(usage.input_tokens, Some(60));
        assert_eq!(usage.output_tokens, Some(90));
        assert_eq!(usage.total_tokens, Some(150));
        assert_eq!(UsageTotals::from(&usage), totals);
    }

    #[test]
    fn test_is_empty() {
        assert!(UsageTotals::default().is_empty());
        let mut totals = UsageTotals::default();
        totals.add_usage(&Usage::new(0, 1));
        assert!(!totals.is_empty());
    }
}
