// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Investor, InvestorMatch, InvestorTier, MatchResult, MatchRun, MatchRunStatus, RankQuery,
    ScoringParams, Startup,
};
pub use requests::{RankParams, ScoreMatchesRequest, StartRunRequest};
pub use responses::{CacheStats, ErrorResponse, HealthResponse, MatchesResponse, TierResponse};
