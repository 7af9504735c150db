//! Built-in demo records served when fallback data is enabled and the
//! database cannot answer.

use crate::models::{Investor, Startup};

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn demo_startups() -> Vec<Startup> {
    vec![
        Startup {
            id: "demo-startup-ledgerloop".to_string(),
            name: "LedgerLoop".to_string(),
            sectors: strings(&["Fintech", "SaaS"]),
            total_god_score: Some(68.0),
        },
        Startup {
            id: "demo-startup-carbonkit".to_string(),
            name: "CarbonKit".to_string(),
            sectors: strings(&["Climate Tech"]),
            total_god_score: Some(52.0),
        },
        Startup {
            id: "demo-startup-pixelpals".to_string(),
            name: "PixelPals".to_string(),
            sectors: strings(&["Gaming", "Consumer"]),
            total_god_score: Some(34.0),
        },
    ]
}

pub fn demo_investors() -> Vec<Investor> {
    vec![
        Investor {
            id: "demo-investor-sequoia".to_string(),
            name: "Alex Rivera".to_string(),
            firm: Some("Sequoia Capital".to_string()),
            sectors: strings(&["Fintech", "AI", "SaaS"]),
            stage: strings(&["Series A", "Series B"]),
            check_size_min: Some(5_000_000.0),
            check_size_max: Some(25_000_000.0),
        },
        Investor {
            id: "demo-investor-felicis".to_string(),
            name: "Jordan Lee".to_string(),
            firm: Some("Felicis".to_string()),
            sectors: strings(&["SaaS", "Developer Tools"]),
            stage: strings(&["Seed", "Series A"]),
            check_size_min: Some(1_000_000.0),
            check_size_max: Some(4_000_000.0),
        },
        Investor {
            id: "demo-investor-greenfield".to_string(),
            name: "Sam Okafor".to_string(),
            firm: Some("Greenfield Seed".to_string()),
            sectors: strings(&["Climate", "Energy"]),
            stage: strings(&["Pre-Seed", "Seed"]),
            check_size_min: Some(250_000.0),
            check_size_max: Some(750_000.0),
        },
        Investor {
            id: "demo-investor-angel".to_string(),
            name: "Casey Morgan".to_string(),
            firm: None,
            sectors: strings(&["Consumer", "Gaming"]),
            stage: strings(&["Pre-Seed"]),
            check_size_min: Some(10_000.0),
            check_size_max: Some(50_000.0),
        },
    ]
}
