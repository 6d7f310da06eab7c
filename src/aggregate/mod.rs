//! Weighted aggregation of per-requirement matches.
//!
//! Required and optional requirements are averaged separately over valid
//! matches (profile item present, score > 0) and blended 70/30 when both
//! groups exist. Category scores average the valid matches whose profile item
//! sits in that CV section and whose requirement category bridges to it.

mod aggregator;
mod suggestions;


pub use aggregator::{Aggregator, AggregatorConfig};
pub use suggestions::{GENERIC_SUGGESTION, MAX_NAMED_REQUIREMENTS};
