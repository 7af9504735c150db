use crate::models::{Investor, RankQuery, Startup};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Score a startup against an ad-hoc list of investors
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreMatchesRequest {
    pub startup: Startup,
    #[validate(length(min = 1, max = 1000))]
    pub investors: Vec<Investor>,
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
    #[serde(alias = "min_score", rename = "minScore", default)]
    #[validate(range(max = 100))]
    pub min_score: Option<u8>,
    #[serde(alias = "good_fit_only", rename = "goodFitOnly", default)]
    pub good_fit_only: bool,
}

/// Query string for stored rankings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankParams {
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
    #[serde(alias = "min_score", rename = "minScore", default)]
    #[validate(range(max = 100))]
    pub min_score: Option<u8>,
    #[serde(alias = "good_fit_only", rename = "goodFitOnly", default)]
    pub good_fit_only: bool,
}

/// Resolve a URL into investor matches through a match run
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartRunRequest {
    #[validate(url)]
    pub url: String,
}

/// Build a rank query, applying the service default and cap on `limit`
pub fn rank_query(
    limit: Option<u16>,
    min_score: Option<u8>,
    good_fit_only: bool,
    default_limit: usize,
    max_limit: usize,
) -> RankQuery {
    RankQuery {
        limit: limit.map(usize::from).unwrap_or(default_limit).min(max_limit),
        min_score,
        good_fit_only,
    }
}

impl ScoreMatchesRequest {
    pub fn query(&self, default_limit: usize, max_limit: usize) -> RankQuery {
        rank_query(self.limit, self.min_score, self.good_fit_only, default_limit, max_limit)
    }
}

impl RankParams {
    pub fn query(&self, default_limit: usize, max_limit: usize) -> RankQuery {
        rank_query(self.limit, self.min_score, self.good_fit_only, default_limit, max_limit)
    }
}
