use crate::models::{Investor, InvestorTier};

/// Firms treated as tier 1 regardless of stated check size
const TIER1_FIRMS: &[&str] = &[
    "sequoia",
    "andreessen",
    "a16z",
    "benchmark",
    "accel partners",
    "greylock",
    "kleiner",
    "lightspeed",
    "index ventures",
    "founders fund",
    "general catalyst",
    "tiger global",
    "insight partners",
    "khosla",
    "y combinator",
    "thrive capital",
];

const TIER2_FIRMS: &[&str] = &[
    "first round",
    "felicis",
    "bessemer",
    "union square",
    "spark capital",
    "redpoint",
    "ggv",
    "battery ventures",
    "initialized",
    "lux capital",
    "matrix partners",
    "ivp",
    "craft ventures",
    "8vc",
];

const TIER3_FIRMS: &[&str] = &[
    "precursor",
    "hustle fund",
    "pear vc",
    "afore",
    "boldstart",
    "soma capital",
    "village global",
    "1517 fund",
    "backstage capital",
    "m13",
    "techstars",
    "500 global",
];

const TIER1_CHECK_SIZE: f64 = 5_000_000.0;
const TIER2_CHECK_SIZE: f64 = 1_000_000.0;
const TIER3_CHECK_SIZE: f64 = 250_000.0;

/// Baseline a tier judges startups against, and the flat bonus it grants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    pub expected_god: f64,
    pub bonus: f64,
}

/// Expected GOD score and optics bonus for a tier
pub fn tier_profile(tier: InvestorTier) -> TierProfile {
    match tier {
        InvestorTier::Elite => TierProfile { expected_god: 55.0, bonus: 0.0 },
        InvestorTier::Strong => TierProfile { expected_god: 45.0, bonus: 10.0 },
        InvestorTier::Emerging => TierProfile { expected_god: 38.0, bonus: 18.0 },
        InvestorTier::Angel => TierProfile { expected_god: 30.0, bonus: 25.0 },
    }
}

/// Classify an investor into a tier.
///
/// Known firm names win (tier 1 list checked first), otherwise the check
/// size ladder decides. Missing data falls through to tier 4.
pub fn classify_investor(investor: &Investor) -> InvestorTier {
    let name = investor.name.to_lowercase();
    let firm = investor
        .firm
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let keyword_tiers = [
        (InvestorTier::Elite, TIER1_FIRMS),
        (InvestorTier::Strong, TIER2_FIRMS),
        (InvestorTier::Emerging, TIER3_FIRMS),
    ];

    for (tier, keywords) in keyword_tiers {
        if keywords
            .iter()
            .any(|k| name.contains(k) || firm.contains(k))
        {
            return tier;
        }
    }

    tier_for_check_size(investor.check_size())
}

#[inline]
fn tier_for_check_size(check_size: f64) -> InvestorTier {
    if check_size >= TIER1_CHECK_SIZE {
        InvestorTier::Elite
    } else if check_size >= TIER2_CHECK_SIZE {
        InvestorTier::Strong
    } else if check_size >= TIER3_CHECK_SIZE {
        InvestorTier::Emerging
    } else {
        InvestorTier::Angel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn investor(name: &str, firm: Option<&str>, check_max: Option<f64>) -> Investor {
        Investor {
            id: name.to_string(),
            name: name.to_string(),
            firm: firm.map(str::to_string),
            sectors: vec![],
            stage: vec![],
            check_size_min: None,
            check_size_max: check_max,
        }
    }

    #[test]
    fn test_firm_keyword_wins_over_check_size() {
        let inv = investor("Pat Doe", Some("Sequoia Capital"), Some(10_000.0));
        assert_eq!(classify_investor(&inv), InvestorTier::Elite);

        let inv = investor("Pat Doe", Some("Hustle Fund"), Some(50_000_000.0));
        assert_eq!(classify_investor(&inv), InvestorTier::Emerging);
    }

    #[test]
    fn test_keyword_matches_name_too() {
        let inv = investor("First Round Capital", None, None);
        assert_eq!(classify_investor(&inv), InvestorTier::Strong);
    }

    #[test]
    fn test_check_size_ladder() {
        assert_eq!(classify_investor(&investor("A", None, Some(5_000_000.0))), InvestorTier::Elite);
        assert_eq!(classify_investor(&investor("B", None, Some(4_999_999.0))), InvestorTier::Strong);
        assert_eq!(classify_investor(&investor("C", None, Some(1_000_000.0))), InvestorTier::Strong);
        assert_eq!(classify_investor(&investor("D", None, Some(250_000.0))), InvestorTier::Emerging);
        assert_eq!(classify_investor(&investor("E", None, Some(100_000.0))), InvestorTier::Angel);
    }

    #[test]
    fn test_missing_data_is_angel() {
        assert_eq!(classify_investor(&investor("Someone", None, None)), InvestorTier::Angel);
    }

    #[test]
    fn test_tier_profiles() {
        assert_eq!(tier_profile(InvestorTier::Elite), TierProfile { expected_god: 55.0, bonus: 0.0 });
        assert_eq!(tier_profile(InvestorTier::Strong).bonus, 10.0);
        assert_eq!(tier_profile(InvestorTier::Emerging).expected_god, 38.0);
        assert_eq!(tier_profile(InvestorTier::Angel).bonus, 25.0);
    }
}
