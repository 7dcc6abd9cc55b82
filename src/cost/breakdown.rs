//! Cost breakdowns and their algebra.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

const MICRO_DOLLARS: f64 = 1_000_000.0;

/// Rounds to the nearest millionth of a dollar.
pub fn round_micro(value: f64) -> f64 {
    (value * MICRO_DOLLARS).round() / MICRO_DOLLARS
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
        }
    }
}

/// Per-category cost of one or more calls, in USD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub input: f64,
    pub output: f64,
    pub cache_read: f64,
    pub cache_write: f64,
    pub reasoning: f64,
    pub web_search: f64,
    pub google_maps: f64,
    pub x_search: f64,
    pub code_execution: f64,
    pub document_search: f64,
    pub collections_search: f64,
    pub image_generation: f64,
    pub total: f64,
    #[serde(default)]
    pub currency: Currency,
    /// Whether any contributing call was billed at long-context rates
    #[serde(default)]
    pub is_long_context: bool,
}

impl CostBreakdown {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Field-wise `f` over both operands; the flag is handled by callers.
    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            input: f(self.input, other.input),
            output: f(self.output, other.output),
            cache_read: f(self.cache_read, other.cache_read),
            cache_write: f(self.cache_write, other.cache_write),
            reasoning: f(self.reasoning, other.reasoning),
            web_search: f(self.web_search, other.web_search),
            google_maps: f(self.google_maps, other.google_maps),
            x_search: f(self.x_search, other.x_search),
            code_execution: f(self.code_execution, other.code_execution),
            document_search: f(self.document_search, other.document_search),
            collections_search: f(self.collections_search, other.collections_search),
            image_generation: f(self.image_generation, other.image_generation),
            total: f(self.total, other.total),
            currency: self.currency,
            is_long_context: self.is_long_context,
        }
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        self.zip_with(self, |a, _| f(a))
    }

    /// Pairwise sum; long-context if either side is.
    fn combine(&self, other: &Self) -> Self {
        Self {
            is_long_context: self.is_long_context || other.is_long_context,
            ..self.zip_with(other, |a, b| a + b)
        }
    }

    /// Multiplies every amount by `factor`, keeping the flag.
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// Every amount rounded to 1e-6. Idempotent.
    pub fn rounded(&self) -> Self {
        self.map(round_micro)
    }

    /// Sum of the category fields, independent of `total`.
    pub fn category_sum(&self) -> f64 {
        self.input
            + self.output
            + self.cache_read
            + self.cache_write
            + self.reasoning
            + self.web_search
            + self.google_maps
            + self.x_search
            + self.code_execution
            + self.document_search
            + self.collections_search
            + self.image_generation
    }

    pub fn is_zero(&self) -> bool {
        self.total == 0.0 && self.category_sum() == 0.0
    }
}

impl Add for CostBreakdown {
    type Output = CostBreakdown;

    fn add(self, rhs: Self) -> Self::Output {
        self.combine(&rhs)
    }
}

impl AddAssign for CostBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.combine(&rhs);
    }
}

impl Mul<f64> for CostBreakdown {
    type Output = CostBreakdown;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Sum for CostBreakdown {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(CostBreakdown::empty(), |acc, b| acc.combine(&b))
    }
}

impl<'a> Sum<&'a CostBreakdown> for CostBreakdown {
    fn sum<I: Iterator<Item = &'a CostBreakdown>>(iter: I) -> Self {
        iter.fold(CostBreakdown::empty(), |acc, b| acc.combine(b))
    }
}
