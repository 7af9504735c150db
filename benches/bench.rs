// Criterion benchmarks for Hot Honey Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hothoney_match::core::{calculate_sector_bonus, classify_investor, compose_scores, Matcher};
use hothoney_match::models::{Investor, InvestorTier, RankQuery, ScoringParams, Startup};

const FIRMS: [Option<&str>; 5] = [
    Some("Sequoia Capital"),
    Some("Felicis Ventures"),
    Some("Hustle Fund"),
    Some("Northwind Partners"),
    None,
];

const SECTORS: [&str; 8] = [
    "Fintech", "AI", "SaaS", "Climate Tech", "Healthtech", "Consumer", "Gaming", "Developer Tools",
];

fn create_investor(id: usize) -> Investor {
    Investor {
        id: format!("inv-{}", id),
        name: format!("Investor {}", id),
        firm: FIRMS[id % FIRMS.len()].map(str::to_string),
        sectors: (0..3)
            .map(|k| SECTORS[(id + k) % SECTORS.len()].to_string())
            .collect(),
        stage: vec!["Seed".to_string()],
        check_size_min: Some(25_000.0 * (id % 7) as f64),
        check_size_max: Some(250_000.0 * (id % 30) as f64),
    }
}

fn create_startup() -> Startup {
    Startup {
        id: "startup-1".to_string(),
        name: "LedgerLoop".to_string(),
        sectors: vec!["Fintech".to_string(), "SaaS".to_string(), "AI".to_string()],
        total_god_score: Some(62.0),
    }
}

fn bench_compose_scores(c: &mut Criterion) {
    let params = ScoringParams::default();

    c.bench_function("compose_scores", |b| {
        b.iter(|| {
            compose_scores(
                black_box(48.0),
                black_box(16.0),
                black_box(InvestorTier::Strong),
                black_box(&params),
            )
        });
    });
}

fn bench_classify_investor(c: &mut Criterion) {
    let investors: Vec<Investor> = (0..100).map(create_investor).collect();

    c.bench_function("classify_investor_100", |b| {
        b.iter(|| {
            for investor in &investors {
                black_box(classify_investor(black_box(investor)));
            }
        });
    });
}

fn bench_sector_bonus(c: &mut Criterion) {
    let params = ScoringParams::default();
    let startup = create_startup();
    let investor = create_investor(3);

    c.bench_function("calculate_sector_bonus", |b| {
        b.iter(|| {
            calculate_sector_bonus(
                black_box(&startup.sectors),
                black_box(&investor.sectors),
                black_box(&params),
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_params();
    let startup = create_startup();
    let query = RankQuery::default();

    let mut group = c.benchmark_group("ranking");

    for investor_count in [10, 50, 100, 500, 1000].iter() {
        let investors: Vec<Investor> = (0..*investor_count).map(create_investor).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_investors", investor_count),
            investor_count,
            |b, _| {
                b.iter(|| {
                    matcher.rank_investors(
                        black_box(&startup),
                        black_box(&investors),
                        black_box(&query),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compose_scores,
    bench_classify_investor,
    bench_sector_bonus,
    bench_ranking
);

criterion_main!(benches);
