//! Hot Honey Match - startup/investor match scoring service
//!
//! This library provides the tier-adjusted match scoring used to rank
//! investors for a startup, the client-side state machine that resolves
//! asynchronous match runs, and the request-id guard that keeps stale
//! responses from reaching the screen.

pub mod config;
pub mod core;
pub mod guard;
pub mod models;
pub mod routes;
pub mod run;
pub mod services;

// Re-export commonly used types
pub use crate::core::{classify_investor, compose_scores, calculate_sector_bonus, score_match, Matcher};
pub use crate::guard::{DisplayState, ResultsController};
pub use crate::models::{Investor, InvestorMatch, InvestorTier, ScoringParams, Startup};
pub use crate::run::{MatchRunMachine, MatchRunPoller, PollSchedule};
