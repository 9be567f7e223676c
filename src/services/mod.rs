//! Business logic services.
//!
//! Services sit between the store and the surfaces that consume patterns
//! (in-page menu, popup listing, CLI).

mod custom_patterns;
mod pattern_index;

pub use custom_patterns::CustomPatternService;
pub use pattern_index::{DEFAULT_CACHE_CAPACITY, PatternIndex, QueryCache};
