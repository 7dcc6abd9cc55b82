//! Price table store keyed by provider and model id.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use super::builtin;
use super::loader;
use super::normalize;
use super::policy::PricePolicy;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    providers: HashMap<String, HashMap<String, PricePolicy>>,
    /// Flat view across providers; the latest insert wins on duplicate ids.
    models: HashMap<String, PricePolicy>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PriceTableBuilder {
        PriceTableBuilder::new()
    }

    /// Built-in price data without environment overrides.
    pub fn builtins() -> Self {
        let mut table = Self::new();
        builtin::register_all(&mut table);
        table
    }

    pub fn insert(
        &mut self,
        provider: impl Into<String>,
        model: impl Into<String>,
        policy: PricePolicy,
    ) {
        let provider = provider.into().to_lowercase();
        let model = model.into();
        self.models.insert(model.clone(), policy.clone());
        self.providers
            .entry(provider)
            .or_default()
            .insert(model, policy);
    }

    /// Copies every entry of `other` over this table.
    pub fn merge(&mut self, other: &PriceTable) {
        let mut providers: Vec<_> = other.providers.iter().collect();
        providers.sort_by(|a, b| a.0.cmp(b.0));
        for (provider, models) in providers {
            for (model, policy) in models {
                self.insert(provider.clone(), model.clone(), policy.clone());
            }
        }
    }

    /// Exact lookup within one provider namespace.
    pub fn get(&self, provider: &str, model: &str) -> Option<&PricePolicy> {
        self.providers.get(&provider.to_lowercase())?.get(model)
    }

    /// Looks up `model` across providers, falling back to normalized ids.
    pub fn resolve(&self, model: &str) -> Option<&PricePolicy> {
        for candidate in normalize::candidates(model) {
            if let Some(policy) = self.models.get(&candidate) {
                if candidate != model {
                    tracing::debug!(
                        input = model,
                        resolved = %candidate,
                        "model priced via normalized id"
                    );
                }
                return Some(policy);
            }
        }
        None
    }

    pub fn policy_for(&self, model: &str) -> Result<&PricePolicy> {
        self.resolve(model).ok_or_else(|| Error::UnknownModel {
            model: model.to_string(),
        })
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Every `(provider, model)` pair in the table.
    pub fn models(&self) -> impl Iterator<Item = (&str, &str)> {
        self.providers.iter().flat_map(|(provider, models)| {
            models
                .keys()
                .map(move |model| (provider.as_str(), model.as_str()))
        })
    }

    pub(crate) fn policies_mut(&mut self) -> impl Iterator<Item = (&str, &mut PricePolicy)> {
        let flat = self.models.iter_mut().map(|(m, p)| (m.as_str(), p));
        let nested = self
            .providers
            .values_mut()
            .flat_map(|models| models.iter_mut().map(|(m, p)| (m.as_str(), p)));
        flat.chain(nested)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct PriceTableBuilder {
    table: PriceTable,
    env: bool,
}

impl PriceTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins(mut self) -> Self {
        builtin::register_all(&mut self.table);
        self
    }

    pub fn model(
        mut self,
        provider: impl Into<String>,
        model: impl Into<String>,
        policy: PricePolicy,
    ) -> Self {
        self.table.insert(provider, model, policy);
        self
    }

    pub fn merge(mut self, other: &PriceTable) -> Self {
        self.table.merge(other);
        self
    }

    /// Applies `LLM_COST_<MODEL>_*` overrides at build time.
    pub fn from_env(mut self) -> Self {
        self.env = true;
        self
    }

    pub fn build(self) -> Result<PriceTable> {
        let mut table = self.table;
        if self.env {
            loader::apply_env_overrides(&mut table, |key| std::env::var(key).ok())?;
        }
        Ok(table)
    }
}

static GLOBAL_PRICING: LazyLock<Arc<PriceTable>> = LazyLock::new(|| {
    let table = PriceTableBuilder::new()
        .with_builtins()
        .from_env()
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring invalid pricing environment overrides");
            PriceTable::builtins()
        });
    Arc::new(table)
});

/// Shared table of built-in prices plus environment overrides.
pub fn global_price_table() -> Arc<PriceTable> {
    Arc::clone(&GLOBAL_PRICING)
}
