use crate::core::{classify_investor, tier_profile, Matcher};
use crate::models::{
    ErrorResponse, HealthResponse, MatchesResponse, RankParams, ScoreMatchesRequest,
    StartRunRequest, TierResponse,
};
use crate::run::{MatchRunPoller, PollSchedule, RunState};
use crate::services::{CacheKey, DirectoryError, InvestorDirectory, MatchApiClient, MatchCache};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: InvestorDirectory,
    pub cache: Arc<MatchCache>,
    pub match_api: Arc<MatchApiClient>,
    pub matcher: Matcher,
    pub poll_schedule: PollSchedule,
    pub default_limit: usize,
    pub max_limit: usize,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/score", web::post().to(score_matches))
        .route("/matches/startup/{id}", web::get().to(startup_matches))
        .route("/matches/investor/{id}", web::get().to(investor_matches))
        .route("/investors/{id}/tier", web::get().to(investor_tier))
        .route("/runs", web::post().to(start_run));
}

fn error_response(status: u16, error: &str, message: String) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    };
    match status {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        502 => HttpResponse::BadGateway().json(body),
        503 => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn directory_error(what: &str, err: DirectoryError) -> HttpResponse {
    match err {
        DirectoryError::NotFound(msg) => error_response(404, &format!("{} not found", what), msg),
        DirectoryError::InvalidInput(msg) => error_response(400, "Invalid input", msg),
        DirectoryError::NoDataSource => {
            error_response(503, "No data source", "No data source configured".to_string())
        }
        DirectoryError::Store(e) => {
            tracing::error!("Failed to load {}: {}", what, e);
            error_response(500, &format!("Failed to load {}", what), e.to_string())
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match state.directory.store() {
        Some(store) => match store.health_check().await {
            Ok(true) => "healthy",
            _ => "degraded",
        },
        None if state.directory.uses_fallback() => "demo",
        None => "degraded",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.cache.stats(),
    })
}

/// Score a startup against investors supplied in the body
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "startup": {"id": "s1", "name": "LedgerLoop", "sectors": ["Fintech"], "totalGodScore": 50},
///   "investors": [{"id": "i1", "name": "Dana Wu", "firm": "Felicis", "sectors": ["Fintech"]}],
///   "limit": 20,
///   "minScore": 60,
///   "goodFitOnly": false
/// }
/// ```
async fn score_matches(
    state: web::Data<AppState>,
    req: web::Json<ScoreMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score request: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    let query = req.query(state.default_limit, state.max_limit);
    let result = state.matcher.rank_investors(&req.startup, &req.investors, &query);

    tracing::info!(
        "Scored startup {} against {} investors, returning {}",
        req.startup.id,
        result.total_candidates,
        result.matches.len()
    );

    HttpResponse::Ok().json(MatchesResponse::new(result.matches, result.total_candidates))
}

/// Investors ranked for a stored startup
///
/// GET /api/v1/matches/startup/{id}?limit=20&minScore=60&goodFitOnly=true
async fn startup_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<RankParams>,
) -> impl Responder {
    if let Err(errors) = params.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let startup_id = path.into_inner();
    let query = params.query(state.default_limit, state.max_limit);
    let cache_key = CacheKey::startup_matches(&startup_id, &query);

    if let Ok(cached) = state.cache.get::<MatchesResponse>(&cache_key).await {
        tracing::debug!("Serving cached matches for startup {}", startup_id);
        return HttpResponse::Ok().json(cached);
    }

    let startup = match state.directory.startup(&startup_id).await {
        Ok(startup) => startup,
        Err(e) => return directory_error("startup", e),
    };
    let investors = match state.directory.investors().await {
        Ok(investors) => investors,
        Err(e) => return directory_error("investors", e),
    };

    let result = state.matcher.rank_investors(&startup, &investors, &query);
    let response = MatchesResponse::new(result.matches, result.total_candidates);

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache matches for {}: {}", startup_id, e);
    }

    tracing::info!(
        "Returning {} matches for startup {} (from {} investors)",
        response.matches.len(),
        startup_id,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Startups ranked for a stored investor
///
/// GET /api/v1/matches/investor/{id}?limit=20
async fn investor_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<RankParams>,
) -> impl Responder {
    if let Err(errors) = params.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let investor_id = path.into_inner();
    let query = params.query(state.default_limit, state.max_limit);
    let cache_key = CacheKey::investor_matches(&investor_id, &query);

    if let Ok(cached) = state.cache.get::<MatchesResponse>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    let investor = match state.directory.investor(&investor_id).await {
        Ok(investor) => investor,
        Err(e) => return directory_error("investor", e),
    };
    let startups = match state.directory.startups().await {
        Ok(startups) => startups,
        Err(e) => return directory_error("startups", e),
    };

    let result = state.matcher.rank_startups(&investor, &startups, &query);
    let response = MatchesResponse::new(result.matches, result.total_candidates);

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache matches for {}: {}", investor_id, e);
    }

    HttpResponse::Ok().json(response)
}

/// Tier classification of a stored investor
///
/// GET /api/v1/investors/{id}/tier
async fn investor_tier(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let investor = match state.directory.investor(&path).await {
        Ok(investor) => investor,
        Err(e) => return directory_error("investor", e),
    };

    let tier = classify_investor(&investor);
    let profile = tier_profile(tier);

    HttpResponse::Ok().json(TierResponse {
        investor_id: investor.id,
        tier,
        label: tier.label().to_string(),
        expected_god: profile.expected_god,
        bonus: profile.bonus,
    })
}

/// Resolve a URL through a match run and wait for it to settle
///
/// POST /api/v1/runs
///
/// Request body:
/// ```json
/// { "url": "https://ledgerloop.io" }
/// ```
async fn start_run(state: web::Data<AppState>, req: web::Json<StartRunRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let mut poller = MatchRunPoller::new(Arc::clone(&state.match_api), state.poll_schedule);
    let snapshot = poller.resolve(req.url.clone()).await;

    match snapshot.state {
        RunState::Ready => HttpResponse::Ok().json(snapshot),
        _ => {
            tracing::warn!(
                "Match run for {} ended in {:?}: {:?}",
                req.url,
                snapshot.state,
                snapshot.error
            );
            HttpResponse::BadGateway().json(snapshot)
        }
    }
}
