// Integration tests for Hot Honey Match

use hothoney_match::core::Matcher;
use hothoney_match::models::{Investor, MatchRunStatus, RankQuery, Startup};
use hothoney_match::run::{MatchRunPoller, PollSchedule, RunState};
use hothoney_match::services::fallback::{demo_investors, demo_startups};
use hothoney_match::services::{MatchApiClient, MatchApiError, MatchRunApi};
use hothoney_match::guard::DisplayState;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn create_investor(id: &str, firm: Option<&str>, sectors: &[&str], check: Option<f64>) -> Investor {
    Investor {
        id: id.to_string(),
        name: format!("Investor {}", id),
        firm: firm.map(str::to_string),
        sectors: sectors.iter().map(|s| s.to_string()).collect(),
        stage: vec!["Seed".to_string()],
        check_size_min: None,
        check_size_max: check,
    }
}

fn ledgerloop() -> Startup {
    demo_startups()
        .into_iter()
        .find(|s| s.id == "demo-startup-ledgerloop")
        .unwrap()
}

#[test]
fn test_integration_end_to_end_ranking() {
    let matcher = Matcher::with_default_params();
    let startup = ledgerloop();

    let result = matcher.rank_investors(&startup, &demo_investors(), &RankQuery::default());

    assert_eq!(result.total_candidates, 4);
    assert_eq!(result.matches.len(), 4);
    for pair in result.matches.windows(2) {
        assert!(pair[0].tier_adjusted_match >= pair[1].tier_adjusted_match);
    }
    for m in &result.matches {
        assert!((25..=99).contains(&m.tier_adjusted_match));
        assert!((25..=99).contains(&m.tier1_match));
        assert_eq!(m.startup_id, startup.id);
        assert_eq!(m.is_good_fit, m.tier_adjusted_match >= 60);
    }
}

#[test]
fn test_filters_and_limit() {
    let matcher = Matcher::with_default_params();
    let startup = ledgerloop();
    let investors: Vec<Investor> = (0..50)
        .map(|i| {
            if i % 2 == 0 {
                create_investor(&format!("fit-{}", i), None, &["Fintech", "SaaS"], Some(50_000.0))
            } else {
                create_investor(&format!("off-{}", i), Some("Andreessen Horowitz"), &["Biotech"], None)
            }
        })
        .collect();

    let all = matcher.rank_investors(&startup, &investors, &RankQuery::default());
    assert_eq!(all.total_candidates, 50);
    assert_eq!(all.matches.len(), 20);

    let good = matcher.rank_investors(
        &startup,
        &investors,
        &RankQuery {
            limit: 100,
            min_score: None,
            good_fit_only: true,
        },
    );
    assert!(!good.matches.is_empty());
    assert!(good.matches.iter().all(|m| m.is_good_fit));

    let floor = matcher.rank_investors(
        &startup,
        &investors,
        &RankQuery {
            limit: 100,
            min_score: Some(99),
            good_fit_only: false,
        },
    );
    assert_eq!(floor.matches.len(), 25);
    assert!(floor.matches.iter().all(|m| m.tier_adjusted_match >= 99));
    assert!(floor.matches.iter().all(|m| m.investor_id.starts_with("fit-")));
}

#[test]
fn test_ranking_startups_for_investor() {
    let matcher = Matcher::with_default_params();
    let angel = demo_investors()
        .into_iter()
        .find(|i| i.firm.is_none())
        .unwrap();

    let result = matcher.rank_startups(&angel, &demo_startups(), &RankQuery::default());

    assert_eq!(result.matches.len(), 3);
    assert!(result.matches.iter().all(|m| m.investor_id == angel.id));
    assert_eq!(result.matches[0].startup_id, "demo-startup-ledgerloop");
    let pixelpals = &result.matches[2];
    assert_eq!(pixelpals.startup_id, "demo-startup-pixelpals");
    assert_eq!(pixelpals.shared_sectors.len(), 2);
}

#[test]
fn test_ranking_is_deterministic() {
    let matcher = Matcher::with_default_params();
    let startup = ledgerloop();
    let investors: Vec<Investor> = (0..20)
        .map(|i| create_investor(&format!("twin-{:02}", i), None, &["Fintech"], Some(50_000.0)))
        .collect();

    let first = matcher.rank_investors(&startup, &investors, &RankQuery::default());
    let mut reversed = investors.clone();
    reversed.reverse();
    let second = matcher.rank_investors(&startup, &reversed, &RankQuery::default());

    let ids = |r: &hothoney_match::core::RankedMatches| {
        r.matches.iter().map(|m| m.investor_id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.matches[0].investor_id, "twin-00");
}

#[tokio::test]
async fn test_create_run_posts_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/match/run")
        .match_body(mockito::Matcher::PartialJson(json!({"url": "https://ledgerloop.io"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "runId": "run-7",
                "status": "queued",
                "startupId": "startup-9"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = MatchApiClient::new(server.url(), 5).unwrap();
    let run = client.create_run("https://ledgerloop.io").await.unwrap();

    assert_eq!(run.run_id, "run-7");
    assert_eq!(run.status, MatchRunStatus::Queued);
    assert_eq!(run.startup_id.as_deref(), Some("startup-9"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_run_parses_ready_payload() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/match/run/run-7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "runId": "run-7",
                "status": "ready",
                "matchCount": 2,
                "matches": [
                    {"investorId": "i1", "investorName": "Dana Wu", "matchScore": 88},
                    {"investorId": "i2", "matchScore": 71.5}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = MatchApiClient::new(server.url(), 5).unwrap();
    let run = client.get_run("run-7").await.unwrap();

    assert_eq!(run.status, MatchRunStatus::Ready);
    assert_eq!(run.count(), 2);
    assert_eq!(run.matches[0].investor_name.as_deref(), Some("Dana Wu"));
    assert_eq!(run.matches[1].match_score, Some(71.5));
}

#[tokio::test]
async fn test_rate_limit_maps_to_error_variant() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/match/run/run-7")
        .with_status(429)
        .create_async()
        .await;

    let client = MatchApiClient::new(server.url(), 5).unwrap();
    let err = client.get_run("run-7").await.unwrap_err();

    assert!(matches!(err, MatchApiError::RateLimited));
}

#[tokio::test]
async fn test_server_error_carries_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/match/run")
        .with_status(500)
        .with_body(r#"{"error":"scraper offline"}"#)
        .create_async()
        .await;

    let client = MatchApiClient::new(server.url(), 5).unwrap();
    let err = client.create_run("https://ledgerloop.io").await.unwrap_err();

    match err {
        MatchApiError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "scraper offline");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/match/run/run-7")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = MatchApiClient::new(server.url(), 5).unwrap();
    let err = client.get_run("run-7").await.unwrap_err();

    assert!(matches!(err, MatchApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_poller_resolves_against_http_api() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/match/run")
        .with_status(200)
        .with_body(json!({"runId": "run-7", "status": "processing"}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/match/run/run-7")
        .with_status(200)
        .with_body(
            json!({
                "runId": "run-7",
                "status": "ready",
                "matchCount": 1,
                "matches": [{"investorId": "i1", "matchScore": 90}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let schedule = PollSchedule {
        fast: Duration::from_millis(20),
        slow: Duration::from_millis(20),
        very_slow: Duration::from_millis(20),
        ..PollSchedule::default()
    };
    let client = Arc::new(MatchApiClient::new(server.url(), 5).unwrap());
    let mut poller = MatchRunPoller::new(client, schedule);

    let snap = poller.resolve("https://ledgerloop.io").await;

    assert_eq!(snap.state, RunState::Ready);
    assert_eq!(snap.display, DisplayState::Ready);
    assert_eq!(snap.run_id.as_deref(), Some("run-7"));
    assert_eq!(snap.matches.len(), 1);
}
