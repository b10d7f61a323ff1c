// extract/mod.rs - extraction pipeline: normalization, pattern matching,
// structured/DOM tiers and the resolver that orders them.
pub mod normalize;
pub mod parse;
pub mod resolve;
pub mod scrape;
pub mod structured;
pub mod types;

pub use resolve::resolve;
pub use types::{MetadataCandidate, Resolution};
