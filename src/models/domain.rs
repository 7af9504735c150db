use serde::{Deserialize, Serialize};

/// Startup record as produced by upstream ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Startup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(rename = "totalGodScore", alias = "total_god_score", default)]
    pub total_god_score: Option<f64>,
}

/// Investor record (person or firm)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub firm: Option<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub stage: Vec<String>,
    #[serde(rename = "checkSizeMin", alias = "check_size_min", default)]
    pub check_size_min: Option<f64>,
    #[serde(rename = "checkSizeMax", alias = "check_size_max", default)]
    pub check_size_max: Option<f64>,
}

impl Investor {
    /// Largest known check size in dollars, 0 when neither bound is set
    pub fn check_size(&self) -> f64 {
        self.check_size_max
            .or(self.check_size_min)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// Coarse investor prestige classification, 1 (Elite) through 4 (Angel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum InvestorTier {
    Elite = 1,
    Strong = 2,
    Emerging = 3,
    Angel = 4,
}

impl InvestorTier {
    pub const ALL: [InvestorTier; 4] = [
        InvestorTier::Elite,
        InvestorTier::Strong,
        InvestorTier::Emerging,
        InvestorTier::Angel,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            InvestorTier::Elite => "Elite",
            InvestorTier::Strong => "Strong",
            InvestorTier::Emerging => "Emerging",
            InvestorTier::Angel => "Angel",
        }
    }
}

impl From<InvestorTier> for u8 {
    fn from(tier: InvestorTier) -> Self {
        tier.number()
    }
}

impl TryFrom<u8> for InvestorTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(InvestorTier::Elite),
            2 => Ok(InvestorTier::Strong),
            3 => Ok(InvestorTier::Emerging),
            4 => Ok(InvestorTier::Angel),
            other => Err(format!("investor tier must be 1-4, got {}", other)),
        }
    }
}

/// Scored startup/investor pair. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorMatch {
    pub startup_id: String,
    pub startup_name: String,
    pub investor_id: String,
    pub investor_name: String,
    pub firm: Option<String>,
    pub investor_tier: InvestorTier,
    pub god_score: f64,
    pub sector_bonus: f64,
    pub tier_bonus: f64,
    pub shared_sectors: Vec<String>,
    #[serde(rename = "tier1Match")]
    pub tier1_match: u8,
    pub tier_adjusted_match: u8,
    pub is_good_fit: bool,
}

/// Tunable constants of the match score heuristic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Points per overlapping sector, before the sector weight
    pub sector_points: f64,
    pub sector_bonus_cap: f64,
    pub penalty_multiplier: f64,
    pub base_offset: f64,
    /// Used when a startup has no GOD score yet
    pub default_god_score: f64,
    pub good_fit_threshold: u8,
    pub min_match: u8,
    pub max_match: u8,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            sector_points: 8.0,
            sector_bonus_cap: 32.0,
            penalty_multiplier: 1.5,
            base_offset: 10.0,
            default_god_score: 40.0,
            good_fit_threshold: 60,
            min_match: 25,
            max_match: 99,
        }
    }
}

/// Filtering and paging options for a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankQuery {
    pub limit: usize,
    pub min_score: Option<u8>,
    pub good_fit_only: bool,
}

impl Default for RankQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            min_score: None,
            good_fit_only: false,
        }
    }
}

/// Server-side status of a match run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRunStatus {
    Created,
    Queued,
    Processing,
    Ready,
    Error,
}

impl MatchRunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchRunStatus::Ready | MatchRunStatus::Error)
    }
}

/// A match row produced by the match-run API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(alias = "investorId")]
    pub investor_id: String,
    #[serde(alias = "investorName", default)]
    pub investor_name: Option<String>,
    #[serde(default)]
    pub firm: Option<String>,
    #[serde(alias = "matchScore", default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Match run as reported by the match-run API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRun {
    #[serde(alias = "runId")]
    pub run_id: String,
    pub status: MatchRunStatus,
    #[serde(alias = "startupId", default)]
    pub startup_id: Option<String>,
    #[serde(alias = "matchCount", default)]
    pub match_count: Option<u64>,
    #[serde(default)]
    pub matches: Vec<MatchResult>,
    #[serde(alias = "errorMessage", default)]
    pub error_message: Option<String>,
    #[serde(alias = "errorCode", default)]
    pub error_code: Option<String>,
    #[serde(alias = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl MatchRun {
    /// Reported match count, falling back to the number of rows returned
    pub fn count(&self) -> u64 {
        self.match_count.unwrap_or(self.matches.len() as u64)
    }

    /// Error text for a failed run: message first, then code
    pub fn failure_reason(&self) -> String {
        self.error_message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error_code.clone())
            .unwrap_or_else(|| "Match run failed".to_string())
    }
}
