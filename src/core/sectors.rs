use crate::models::ScoringParams;

/// Per-sector multiplier applied to each overlapping sector.
/// Sectors not listed weigh 1.0.
const SECTOR_WEIGHTS: &[(&str, f64)] = &[
    ("fintech", 2.0),
    ("ai", 2.0),
    ("ai/ml", 2.0),
    ("artificial intelligence", 2.0),
    ("machine learning", 1.8),
    ("climate", 1.8),
    ("climate tech", 1.8),
    ("healthtech", 1.5),
    ("biotech", 1.5),
    ("saas", 1.5),
    ("enterprise", 1.4),
    ("cybersecurity", 1.4),
    ("developer tools", 1.3),
    ("deep tech", 1.3),
    ("robotics", 1.2),
    ("edtech", 1.0),
    ("marketplace", 1.0),
    ("proptech", 0.9),
    ("consumer", 0.8),
    ("media", 0.7),
    ("e-commerce", 0.7),
    ("ecommerce", 0.7),
    ("food", 0.6),
    ("gaming", 0.5),
];

const DEFAULT_SECTOR_WEIGHT: f64 = 1.0;

/// Weight for a (lower-cased) sector name
#[inline]
pub fn sector_weight(sector: &str) -> f64 {
    SECTOR_WEIGHTS
        .iter()
        .find(|(name, _)| *name == sector)
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_SECTOR_WEIGHT)
}

fn normalize(sectors: &[String]) -> Vec<String> {
    sectors
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[inline]
fn overlaps(startup_sector: &str, investor_sectors: &[String]) -> bool {
    investor_sectors
        .iter()
        .any(|inv| startup_sector.contains(inv.as_str()) || inv.contains(startup_sector))
}

/// Startup sectors (as given) that overlap any investor sector
pub fn shared_sectors(startup_sectors: &[String], investor_sectors: &[String]) -> Vec<String> {
    let investor = normalize(investor_sectors);

    startup_sectors
        .iter()
        .filter(|s| {
            let lower = s.trim().to_lowercase();
            !lower.is_empty() && overlaps(&lower, &investor)
        })
        .cloned()
        .collect()
}

/// Sector overlap bonus (0 to `sector_bonus_cap`)
///
/// Each startup sector that substring-matches an investor sector in
/// either direction contributes `sector_points * weight`.
pub fn calculate_sector_bonus(
    startup_sectors: &[String],
    investor_sectors: &[String],
    params: &ScoringParams,
) -> f64 {
    let investor = normalize(investor_sectors);
    if investor.is_empty() {
        return 0.0;
    }

    let total: f64 = normalize(startup_sectors)
        .iter()
        .filter(|s| overlaps(s, &investor))
        .map(|s| params.sector_points * sector_weight(s))
        .sum();

    total.min(params.sector_bonus_cap).max(0.0)
}
