//! Per-model price policies.
//!
//! Token rates are expressed per one million tokens, request surcharges per
//! one thousand requests, images per image. All amounts are USD.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Input size above which long-context rates apply, unless a policy says otherwise.
pub const LONG_CONTEXT_THRESHOLD: u64 = 200_000;

/// Alternate rates for requests whose input exceeds the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongContextPricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u64>,
    pub input_per_mtok: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_per_mtok: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_per_mtok: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write_per_mtok: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_per_mtok: Option<f64>,
}

impl LongContextPricing {
    pub fn new(input_per_mtok: f64) -> Self {
        Self {
            threshold: None,
            input_per_mtok,
            output_per_mtok: None,
            cache_read_per_mtok: None,
            cache_write_per_mtok: None,
            reasoning_per_mtok: None,
        }
    }

    pub fn threshold(mut self, tokens: u64) -> Self {
        self.threshold = Some(tokens);
        self
    }

    pub fn output(mut self, per_mtok: f64) -> Self {
        self.output_per_mtok = Some(per_mtok);
        self
    }

    pub fn cache_read(mut self, per_mtok: f64) -> Self {
        self.cache_read_per_mtok = Some(per_mtok);
        self
    }

    pub fn cache_write(mut self, per_mtok: f64) -> Self {
        self.cache_write_per_mtok = Some(per_mtok);
        self
    }

    pub fn reasoning(mut self, per_mtok: f64) -> Self {
        self.reasoning_per_mtok = Some(per_mtok);
        self
    }

    pub fn effective_threshold(&self) -> u64 {
        self.threshold.unwrap_or(LONG_CONTEXT_THRESHOLD)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePolicy {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_per_mtok: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write_per_mtok: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_per_mtok: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_context: Option<LongContextPricing>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search_per_1k: Option<f64>,
    /// Input tokens billed per web search on top of the request fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search_tokens_per_request: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_per_1k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_search_per_1k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_execution_per_1k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_search_per_1k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections_search_per_1k: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_per_image: Option<f64>,
    /// Per-image prices keyed by size/quality, e.g. `"hd-1024x1024"`
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub image_by_size: HashMap<String, f64>,
}

impl PricePolicy {
    pub fn new(input_per_mtok: f64, output_per_mtok: f64) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
            cache_read_per_mtok: None,
            cache_write_per_mtok: None,
            reasoning_per_mtok: None,
            long_context: None,
            web_search_per_1k: None,
            web_search_tokens_per_request: None,
            google_maps_per_1k: None,
            x_search_per_1k: None,
            code_execution_per_1k: None,
            document_search_per_1k: None,
            collections_search_per_1k: None,
            image_per_image: None,
            image_by_size: HashMap::new(),
        }
    }

    pub fn cache_read(mut self, per_mtok: f64) -> Self {
        self.cache_read_per_mtok = Some(per_mtok);
        self
    }

    pub fn cache_write(mut self, per_mtok: f64) -> Self {
        self.cache_write_per_mtok = Some(per_mtok);
        self
    }

    pub fn reasoning(mut self, per_mtok: f64) -> Self {
        self.reasoning_per_mtok = Some(per_mtok);
        self
    }

    pub fn long_context(mut self, pricing: LongContextPricing) -> Self {
        self.long_context = Some(pricing);
        self
    }

    pub fn web_search(mut self, per_1k: f64) -> Self {
        self.web_search_per_1k = Some(per_1k);
        self
    }

    pub fn web_search_tokens(mut self, tokens_per_request: u64) -> Self {
        self.web_search_tokens_per_request = Some(tokens_per_request);
        self
    }

    pub fn google_maps(mut self, per_1k: f64) -> Self {
        self.google_maps_per_1k = Some(per_1k);
        self
    }

    pub fn x_search(mut self, per_1k: f64) -> Self {
        self.x_search_per_1k = Some(per_1k);
        self
    }

    pub fn code_execution(mut self, per_1k: f64) -> Self {
        self.code_execution_per_1k = Some(per_1k);
        self
    }

    pub fn document_search(mut self, per_1k: f64) -> Self {
        self.document_search_per_1k = Some(per_1k);
        self
    }

    pub fn collections_search(mut self, per_1k: f64) -> Self {
        self.collections_search_per_1k = Some(per_1k);
        self
    }

    pub fn image(mut self, per_image: f64) -> Self {
        self.image_per_image = Some(per_image);
        self
    }

    pub fn image_size(mut self, size: impl Into<String>, per_image: f64) -> Self {
        self.image_by_size.insert(size.into(), per_image);
        self
    }

    /// Price of one image at `size`; unknown sizes use the default price.
    pub fn image_price(&self, size: Option<&str>) -> f64 {
        size.and_then(|s| self.image_by_size.get(s).copied())
            .or(self.image_per_image)
            .unwrap_or(0.0)
    }

    /// Rejects negative or non-finite amounts.
    pub fn validate(&self) -> Result<()> {
        let mut amounts: Vec<(&str, f64)> = vec![
            ("input_per_mtok", self.input_per_mtok),
            ("output_per_mtok", self.output_per_mtok),
        ];
        let optional = [
            ("cache_read_per_mtok", self.cache_read_per_mtok),
            ("cache_write_per_mtok", self.cache_write_per_mtok),
            ("reasoning_per_mtok", self.reasoning_per_mtok),
            ("web_search_per_1k", self.web_search_per_1k),
            ("google_maps_per_1k", self.google_maps_per_1k),
            ("x_search_per_1k", self.x_search_per_1k),
            ("code_execution_per_1k", self.code_execution_per_1k),
            ("document_search_per_1k", self.document_search_per_1k),
            ("collections_search_per_1k", self.collections_search_per_1k),
            ("image_per_image", self.image_per_image),
        ];
        amounts.extend(optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));

        if let Some(lc) = &self.long_context {
            amounts.push(("long_context.input_per_mtok", lc.input_per_mtok));
            let optional = [
                ("long_context.output_per_mtok", lc.output_per_mtok),
                ("long_context.cache_read_per_mtok", lc.cache_read_per_mtok),
                ("long_context.cache_write_per_mtok", lc.cache_write_per_mtok),
                ("long_context.reasoning_per_mtok", lc.reasoning_per_mtok),
            ];
            amounts.extend(optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));
        }

        for (key, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative amount, got {}",
                    key, value
                )));
            }
        }

        for (size, value) in &self.image_by_size {
            if !value.is_finite() || *value < 0.0 {
                return Err(Error::Config(format!(
                    "image_by_size[{}] must be a non-negative amount, got {}",
                    size, value
                )));
            }
        }

        Ok(())
    }
}
