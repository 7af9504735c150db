// Core algorithm exports
pub mod matcher;
pub mod scoring;
pub mod sectors;
pub mod tiers;

pub use matcher::{Matcher, RankedMatches};
pub use scoring::{compose_scores, effective_god_score, score_match, ComposedScore};
pub use sectors::{calculate_sector_bonus, sector_weight, shared_sectors};
pub use tiers::{classify_investor, tier_profile, TierProfile};
