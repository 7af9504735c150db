use crate::core::{
    sectors::{calculate_sector_bonus, shared_sectors},
    tiers::{classify_investor, tier_profile},
};
use crate::models::{Investor, InvestorMatch, InvestorTier, ScoringParams, Startup};

/// Scores for one startup/investor pair, before identity is attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposedScore {
    pub god_score: f64,
    pub tier_bonus: f64,
    pub tier_fit_penalty: f64,
    pub raw_match: f64,
    pub tier1_match: u8,
    pub tier_adjusted_match: u8,
    pub is_good_fit: bool,
}

/// GOD score to score with: the startup's own, or the configured default
#[inline]
pub fn effective_god_score(god_score: Option<f64>, params: &ScoringParams) -> f64 {
    god_score
        .filter(|g| g.is_finite())
        .unwrap_or(params.default_god_score)
}

/// Combine a GOD score, sector bonus and investor tier into match scores.
///
/// ```text
/// penalty        = max(0, (expected_god - god) * penalty_multiplier)
/// raw            = god + sector_bonus + base_offset
/// tier1          = clamp(round(raw - penalty))
/// tier_adjusted  = clamp(round(raw + bonus - max(0, penalty - bonus)))
/// ```
///
/// Both published scores are clamped to `[min_match, max_match]`.
pub fn compose_scores(
    god_score: f64,
    sector_bonus: f64,
    tier: InvestorTier,
    params: &ScoringParams,
) -> ComposedScore {
    let profile = tier_profile(tier);

    let tier_fit_penalty =
        ((profile.expected_god - god_score) * params.penalty_multiplier).max(0.0);
    let raw_match = god_score + sector_bonus + params.base_offset;

    let tier1_match = clamp_score(raw_match - tier_fit_penalty, params);
    let excess_penalty = (tier_fit_penalty - profile.bonus).max(0.0);
    let tier_adjusted_match = clamp_score(raw_match + profile.bonus - excess_penalty, params);

    ComposedScore {
        god_score,
        tier_bonus: profile.bonus,
        tier_fit_penalty,
        raw_match,
        tier1_match,
        tier_adjusted_match,
        is_good_fit: tier_adjusted_match >= params.good_fit_threshold,
    }
}

/// Round half-up and clamp into the published score range
#[inline]
fn clamp_score(value: f64, params: &ScoringParams) -> u8 {
    let lo = params.min_match as f64;
    let hi = params.max_match as f64;
    if value.is_nan() {
        return params.min_match;
    }
    (value + 0.5).floor().clamp(lo, hi) as u8
}

/// Score a startup against an investor
pub fn score_match(startup: &Startup, investor: &Investor, params: &ScoringParams) -> InvestorMatch {
    let tier = classify_investor(investor);
    let god_score = effective_god_score(startup.total_god_score, params);
    let sector_bonus = calculate_sector_bonus(&startup.sectors, &investor.sectors, params);
    let composed = compose_scores(god_score, sector_bonus, tier, params);

    InvestorMatch {
        startup_id: startup.id.clone(),
        startup_name: startup.name.clone(),
        investor_id: investor.id.clone(),
        investor_name: investor.name.clone(),
        firm: investor.firm.clone(),
        investor_tier: tier,
        god_score,
        sector_bonus,
        tier_bonus: composed.tier_bonus,
        shared_sectors: shared_sectors(&startup.sectors, &investor.sectors),
        tier1_match: composed.tier1_match,
        tier_adjusted_match: composed.tier_adjusted_match,
        is_good_fit: composed.is_good_fit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        let params = ScoringParams::default();
        let s = compose_scores(50.0, 16.0, InvestorTier::Strong, &params);

        assert_eq!(s.raw_match, 76.0);
        assert_eq!(s.tier_fit_penalty, 0.0);
        assert_eq!(s.tier_adjusted_match, 86);
        assert_eq!(s.tier1_match, 76);
        assert!(s.is_good_fit);
    }

    #[test]
    fn test_penalty_partially_offset_by_bonus() {
        let params = ScoringParams::default();
        // Angel: expected 30, bonus 25. god 10 -> penalty 30, excess 5
        let s = compose_scores(10.0, 0.0, InvestorTier::Angel, &params);
        assert_eq!(s.tier_fit_penalty, 30.0);
        assert_eq!(s.raw_match, 20.0);
        // 20 + 25 - 5 = 40
        assert_eq!(s.tier_adjusted_match, 40);
        // 20 - 30 -> clamped
        assert_eq!(s.tier1_match, 25);
        assert!(!s.is_good_fit);
    }

    #[test]
    fn test_scores_never_reach_bounds() {
        let params = ScoringParams::default();
        let high = compose_scores(100.0, 32.0, InvestorTier::Angel, &params);
        assert_eq!(high.tier1_match, 99);
        assert_eq!(high.tier_adjusted_match, 99);

        let low = compose_scores(0.0, 0.0, InvestorTier::Elite, &params);
        assert_eq!(low.tier1_match, 25);
        assert_eq!(low.tier_adjusted_match, 25);
    }

    #[test]
    fn test_rounds_half_up() {
        let params = ScoringParams::default();
        // Elite, god 54.5: penalty 0.75, raw 64.5 -> 63.75 -> 64
        let s = compose_scores(54.5, 0.0, InvestorTier::Elite, &params);
        assert_eq!(s.tier1_match, 64);
        // Elite, god 55.5: raw 65.5 -> 66
        let s = compose_scores(55.5, 0.0, InvestorTier::Elite, &params);
        assert_eq!(s.tier1_match, 66);
    }

    #[test]
    fn test_missing_god_score_uses_default() {
        let params = ScoringParams::default();
        assert_eq!(effective_god_score(None, &params), 40.0);
        assert_eq!(effective_god_score(Some(f64::NAN), &params), 40.0);
        assert_eq!(effective_god_score(Some(72.0), &params), 72.0);
    }

    #[test]
    fn test_score_match_attaches_identity() {
        let params = ScoringParams::default();
        let startup = Startup {
            id: "s1".to_string(),
            name: "LedgerLoop".to_string(),
            sectors: vec!["Fintech".to_string()],
            total_god_score: Some(50.0),
        };
        let investor = Investor {
            id: "i1".to_string(),
            name: "Dana Wu".to_string(),
            firm: Some("Felicis".to_string()),
            sectors: vec!["Fintech".to_string()],
            stage: vec!["seed".to_string()],
            check_size_min: None,
            check_size_max: None,
        };

        let m = score_match(&startup, &investor, &params);
        assert_eq!(m.investor_tier, InvestorTier::Strong);
        assert_eq!(m.sector_bonus, 16.0);
        assert_eq!(m.tier_adjusted_match, 86);
        assert_eq!(m.tier1_match, 76);
        assert_eq!(m.shared_sectors, vec!["Fintech"]);
    }
}
