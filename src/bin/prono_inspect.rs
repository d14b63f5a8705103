use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use prono_core::match_list::{MatchList, parse_stored_records};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,prono_core=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: prono_inspect <records.json>")?;
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let records = parse_stored_records(&raw)?;

    for (idx, record) in records.iter().enumerate() {
        let list = MatchList::from_record(record);
        let label = record.id.clone().unwrap_or_else(|| format!("#{}", idx + 1));
        println!(
            "{label}: {} leg(s), {}, total {}",
            list.entries.len(),
            if list.multi_leg { "multiple" } else { "single" },
            list.total_odds_label()
        );
        for entry in &list.entries {
            println!(
                "  [{}] {} | {} | {} @ {} | {} {}",
                entry.id,
                entry.teams_label,
                entry.bet_category,
                entry.prediction_label(),
                entry.odds_label(),
                entry.league_label(),
                entry.time_label()
            );
        }
        if !list.odds_consistent() {
            println!("  ! legs multiply to {:.2}", list.recombined_odds());
        }
    }

    Ok(())
}
