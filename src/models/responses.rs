use crate::models::domain::{InvestorMatch, InvestorTier};
use serde::{Deserialize, Serialize};

/// Ranked matches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesResponse {
    pub matches: Vec<InvestorMatch>,
    pub total_candidates: usize,
    pub good_fit_count: usize,
}

impl MatchesResponse {
    pub fn new(matches: Vec<InvestorMatch>, total_candidates: usize) -> Self {
        let good_fit_count = matches.iter().filter(|m| m.is_good_fit).count();
        Self {
            matches,
            total_candidates,
            good_fit_count,
        }
    }
}

/// Tier classification of one investor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResponse {
    pub investor_id: String,
    pub tier: InvestorTier,
    pub label: String,
    pub expected_god: f64,
    pub bonus: f64,
}

/// Match cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: CacheStats,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
