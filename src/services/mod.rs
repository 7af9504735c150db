// Service exports
pub mod cache;
pub mod directory;
pub mod fallback;
pub mod match_api;
pub mod postgres;

pub use cache::{CacheError, CacheKey, MatchCache};
pub use directory::{DirectoryError, InvestorDirectory};
pub use match_api::{MatchApiClient, MatchApiError, MatchRunApi};
pub use postgres::{PostgresClient, PostgresError};
