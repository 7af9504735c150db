use crate::core::scoring::score_match;
use crate::models::{Investor, InvestorMatch, RankQuery, ScoringParams, Startup};
use std::cmp::Ordering;

/// Result of a ranking pass
#[derive(Debug, Clone)]
pub struct RankedMatches {
    pub matches: Vec<InvestorMatch>,
    pub total_candidates: usize,
}

/// Ranks startup/investor pairs by tier-adjusted match score
///
/// # Pipeline
/// 1. Score every candidate pair
/// 2. Drop pairs below `min_score` (and non-good-fits when requested)
/// 3. Sort best first
/// 4. Truncate to `limit`
#[derive(Debug, Clone)]
pub struct Matcher {
    params: ScoringParams,
}

impl Matcher {
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    pub fn with_default_params() -> Self {
        Self {
            params: ScoringParams::default(),
        }
    }

    /// Rank investors for one startup
    pub fn rank_investors(
        &self,
        startup: &Startup,
        investors: &[Investor],
        query: &RankQuery,
    ) -> RankedMatches {
        let scored = investors
            .iter()
            .map(|investor| score_match(startup, investor, &self.params))
            .collect();

        self.finish(scored, investors.len(), query)
    }

    /// Rank startups for one investor
    pub fn rank_startups(
        &self,
        investor: &Investor,
        startups: &[Startup],
        query: &RankQuery,
    ) -> RankedMatches {
        let scored = startups
            .iter()
            .map(|startup| score_match(startup, investor, &self.params))
            .collect();

        self.finish(scored, startups.len(), query)
    }

    fn finish(
        &self,
        scored: Vec<InvestorMatch>,
        total_candidates: usize,
        query: &RankQuery,
    ) -> RankedMatches {
        let mut matches: Vec<InvestorMatch> = scored
            .into_iter()
            .filter(|m| !query.good_fit_only || m.is_good_fit)
            .filter(|m| query.min_score.map_or(true, |min| m.tier_adjusted_match >= min))
            .collect();

        matches.sort_by(compare_matches);
        matches.truncate(query.limit);

        tracing::debug!(
            "Ranked {} of {} candidates (limit {})",
            matches.len(),
            total_candidates,
            query.limit
        );

        RankedMatches {
            matches,
            total_candidates,
        }
    }
}

/// Best first: tier-adjusted, then tier-1 score, then higher tier, then ids
fn compare_matches(a: &InvestorMatch, b: &InvestorMatch) -> Ordering {
    b.tier_adjusted_match
        .cmp(&a.tier_adjusted_match)
        .then_with(|| b.tier1_match.cmp(&a.tier1_match))
        .then_with(|| a.investor_tier.cmp(&b.investor_tier))
        .then_with(|| a.investor_id.cmp(&b.investor_id))
        .then_with(|| a.startup_id.cmp(&b.startup_id))
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_params()
    }
}
