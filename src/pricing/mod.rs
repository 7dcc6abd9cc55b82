//! Price policies, the price table store and rate resolution.

mod builtin;
mod loader;
pub mod normalize;
mod policy;
mod resolver;
mod table;

pub use policy::{LONG_CONTEXT_THRESHOLD, LongContextPricing, PricePolicy};
pub use resolver::{EffectiveRates, PricingTier, resolve};
pub use table::{PriceTable, PriceTableBuilder, global_price_table};
