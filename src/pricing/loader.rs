//! Price table loading from files and environment overrides.
//!
//! Files map provider to model id to policy:
//!
//! ```yaml
//! anthropic:
//!   claude-sonnet-4-5:
//!     input_per_mtok: 3.0
//!     output_per_mtok: 15.0
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::policy::PricePolicy;
use super::table::PriceTable;
use crate::{Error, Result};

type ProviderMap = BTreeMap<String, BTreeMap<String, PricePolicy>>;

const ENV_PREFIX: &str = "LLM_COST_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateField {
    Input,
    Output,
    CacheRead,
    CacheWrite,
    Reasoning,
}

impl RateField {
    const ALL: [RateField; 5] = [
        RateField::Input,
        RateField::Output,
        RateField::CacheRead,
        RateField::CacheWrite,
        RateField::Reasoning,
    ];

    fn suffix(self) -> &'static str {
        match self {
            RateField::Input => "INPUT",
            RateField::Output => "OUTPUT",
            RateField::CacheRead => "CACHE_READ",
            RateField::CacheWrite => "CACHE_WRITE",
            RateField::Reasoning => "REASONING",
        }
    }

    fn apply(self, policy: &mut PricePolicy, value: f64) {
        match self {
            RateField::Input => policy.input_per_mtok = value,
            RateField::Output => policy.output_per_mtok = value,
            RateField::CacheRead => policy.cache_read_per_mtok = Some(value),
            RateField::CacheWrite => policy.cache_write_per_mtok = Some(value),
            RateField::Reasoning => policy.reasoning_per_mtok = Some(value),
        }
    }
}

impl PriceTable {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let map: ProviderMap = serde_json::from_str(content)?;
        from_provider_map(map)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let map: ProviderMap = serde_yaml_bw::from_str(content)?;
        from_provider_map(map)
    }

    /// Reads a `.json`, `.yaml` or `.yml` price file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let content = tokio::fs::read_to_string(path).await?;
        match extension.as_deref() {
            Some("json") => Self::from_json_str(&content),
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Err(Error::Config(format!(
                "Unsupported price file extension: {}",
                path.display()
            ))),
        }
    }
}

fn from_provider_map(map: ProviderMap) -> Result<PriceTable> {
    let mut table = PriceTable::new();
    for (provider, models) in map {
        for (model, policy) in models {
            if let Err(e) = policy.validate() {
                tracing::warn!(
                    provider = %provider,
                    model = %model,
                    error = %e,
                    "rejected price entry"
                );
                return Err(Error::Config(format!("{}/{}: {}", provider, model, e)));
            }
            table.insert(provider.clone(), model, policy);
        }
    }
    Ok(table)
}

/// `gpt-4o-mini` becomes `LLM_COST_GPT_4O_MINI_`.
pub(crate) fn env_prefix(model: &str) -> String {
    let key: String = model
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}_", ENV_PREFIX, key)
}

/// Overrides rates of models already in `table` from `lookup`.
pub(crate) fn apply_env_overrides<F>(table: &mut PriceTable, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let mut ids: Vec<String> = table.models().map(|(_, model)| model.to_string()).collect();
    ids.sort();
    ids.dedup();

    let mut overrides: HashMap<String, Vec<(RateField, f64)>> = HashMap::new();
    for id in ids {
        let prefix = env_prefix(&id);
        for field in RateField::ALL {
            let key = format!("{}{}", prefix, field.suffix());
            let Some(raw) = lookup(&key) else {
                continue;
            };
            let value = parse_rate(&key, &raw)?;
            tracing::debug!(model = %id, key = %key, value, "applying pricing override");
            overrides.entry(id.clone()).or_default().push((field, value));
        }
    }

    if overrides.is_empty() {
        return Ok(());
    }

    for (model, policy) in table.policies_mut() {
        if let Some(fields) = overrides.get(model) {
            for (field, value) in fields {
                field.apply(policy, *value);
            }
        }
    }
    Ok(())
}

fn parse_rate(key: &str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(Error::Config(format!(
            "{} must be a non-negative number, got '{}'",
            key, raw
        ))),
    }
}
