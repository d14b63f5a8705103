use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{CoreConfig, core_config};
use crate::match_parse::{MatchContext, looks_like_match, normalize_match, pick_non_empty};
use crate::odds;
use crate::state::{BetCategory, MatchEntry};

/// Read-side row as it comes back from storage. Untrusted: every field is optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoredPredictionRecord {
    pub id: Option<String>,
    // Either JSON text (the usual column type) or an already decoded JSON value.
    pub matches_data: Option<Value>,
    pub match_teams: Option<String>,
    pub total_odds: Option<f64>,
    pub bet_type: Option<String>,
    pub sport: Option<String>,
    pub prediction_text: Option<String>,
}

// Snake case first; older writers used camel case, and the create payload only wrote `odds`.
const MATCHES_DATA_KEYS: &[&str] = &["matches_data", "matchesData"];
const MATCH_TEAMS_KEYS: &[&str] = &["match_teams", "matchTeams"];
const TOTAL_ODDS_KEYS: &[&str] = &["total_odds", "totalOdds", "odds"];
const BET_TYPE_KEYS: &[&str] = &["bet_type", "betType"];
const PREDICTION_TEXT_KEYS: &[&str] = &["prediction_text", "predictionText"];

impl StoredPredictionRecord {
    /// Pulls each field on its own; a field of the wrong type is dropped, never the row.
    pub fn from_value(raw: &Value) -> Result<Self> {
        if !raw.is_object() {
            bail!("stored prediction row is not an object");
        }
        Ok(Self {
            id: pick_non_empty(raw, &["id"]),
            matches_data: MATCHES_DATA_KEYS
                .iter()
                .filter_map(|key| raw.get(*key))
                .find(|value| !value.is_null())
                .cloned(),
            match_teams: pick_non_empty(raw, MATCH_TEAMS_KEYS),
            total_odds: TOTAL_ODDS_KEYS
                .iter()
                .filter_map(|key| raw.get(*key))
                .find_map(lenient_odds),
            bet_type: pick_non_empty(raw, BET_TYPE_KEYS),
            sport: pick_non_empty(raw, &["sport"]),
            prediction_text: pick_non_empty(raw, PREDICTION_TEXT_KEYS),
        })
    }
}

impl<'de> Deserialize<'de> for StoredPredictionRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_value(&raw).map_err(serde::de::Error::custom)
    }
}

/// Reads a single row or an array of rows. Rows that are not objects are skipped.
pub fn parse_stored_records(raw: &str) -> Result<Vec<StoredPredictionRecord>> {
    let value: Value = serde_json::from_str(raw).context("invalid records json")?;
    let rows = match value {
        Value::Array(rows) => rows,
        other => vec![other],
    };
    Ok(rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| match StoredPredictionRecord::from_value(row) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(row = idx, "skipping stored prediction row: {err:#}");
                None
            }
        })
        .collect())
}

/// Legs reconstructed for display, with the stored total kept alongside for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchList {
    pub entries: Vec<MatchEntry>,
    pub multi_leg: bool,
    pub stored_total_odds: Option<f64>,
}

impl MatchList {
    pub fn from_record(record: &StoredPredictionRecord) -> Self {
        Self::from_record_with(record, core_config())
    }

    pub fn from_record_with(record: &StoredPredictionRecord, cfg: &CoreConfig) -> Self {
        let entries = build_match_list_with(record, cfg);
        let multi_leg = is_multi_leg(record.bet_type.as_deref(), &entries);
        Self {
            entries,
            multi_leg,
            stored_total_odds: record.total_odds.filter(|v| v.is_finite() && *v > 0.0),
        }
    }

    pub fn recombined_odds(&self) -> f64 {
        odds::combined_odds(&self.entries)
    }

    /// Stored total when there is one, otherwise the product of the legs.
    pub fn total_odds_label(&self) -> String {
        match self.stored_total_odds {
            Some(total) => odds::format_odds(total),
            None => odds::format_odds(self.recombined_odds()),
        }
    }

    /// False only when every leg has odds and their product disagrees with the stored total.
    pub fn odds_consistent(&self) -> bool {
        let Some(stored) = self.stored_total_odds else {
            return true;
        };
        if self.entries.is_empty() || self.entries.iter().any(|e| e.odds_value().is_none()) {
            return true;
        }
        odds::format_odds(self.recombined_odds()) == odds::format_odds(stored)
    }
}

pub fn build_match_list(record: &StoredPredictionRecord) -> Vec<MatchEntry> {
    build_match_list_with(record, core_config())
}

pub fn build_match_list_with(record: &StoredPredictionRecord, cfg: &CoreConfig) -> Vec<MatchEntry> {
    let ctx = MatchContext {
        default_teams: record.match_teams.as_deref(),
        sport: record.sport.as_deref(),
    };

    if let Some(raw) = record.matches_data.as_ref() {
        match structured_entries(raw, &ctx) {
            Ok(entries) if !entries.is_empty() => return entries,
            Ok(_) => debug!(record_id = ?record.id, "stored match data holds no legs"),
            Err(err) => warn!(
                record_id = ?record.id,
                "malformed stored match data, falling back to match_teams: {err:#}"
            ),
        }
    }

    let Some(teams) = record.match_teams.as_deref().map(str::trim) else {
        return Vec::new();
    };
    if teams.is_empty() {
        return Vec::new();
    }

    if cfg.split_legacy_teams && teams.contains('|') {
        return split_legacy_teams(teams, record.sport.as_deref());
    }

    vec![MatchEntry {
        id: "match-0".to_string(),
        teams_label: teams.to_string(),
        prediction: None,
        odds: record
            .total_odds
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(odds::format_odds),
        league: sport_label(record.sport.as_deref()),
        time: None,
        bet_category: BetCategory::Standard,
    }]
}

pub fn is_multi_leg(bet_type: Option<&str>, entries: &[MatchEntry]) -> bool {
    let declared = bet_type
        .map(|t| t.trim().to_ascii_lowercase())
        .is_some_and(|t| matches!(t.as_str(), "combine" | "combined" | "multiple"));
    declared || entries.len() > 1
}

fn structured_entries(raw: &Value, ctx: &MatchContext<'_>) -> Result<Vec<MatchEntry>> {
    let parsed = match raw {
        Value::String(text) => parse_match_text(text)?,
        other => other.clone(),
    };
    Ok(entries_from_value(&parsed, ctx))
}

fn parse_match_text(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(trimmed).context("invalid matches_data json")?;
    // Some rows were encoded twice.
    if let Value::String(inner) = &value {
        return serde_json::from_str(inner.trim()).context("invalid nested matches_data json");
    }
    Ok(value)
}

fn entries_from_value(value: &Value, ctx: &MatchContext<'_>) -> Vec<MatchEntry> {
    match value {
        Value::Array(list) => list
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_object())
            .map(|(idx, item)| normalize_match(item, idx, ctx))
            .collect(),
        Value::Object(_) if looks_like_match(value) => vec![normalize_match(value, 0, ctx)],
        _ => Vec::new(),
    }
}

// Lossy: legacy rows only kept the team names, so picks and odds are unknown.
fn split_legacy_teams(teams: &str, sport: Option<&str>) -> Vec<MatchEntry> {
    teams
        .split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .enumerate()
        .map(|(idx, part)| MatchEntry {
            id: format!("split-{idx}"),
            teams_label: part.to_string(),
            prediction: None,
            odds: None,
            league: sport_label(sport),
            time: None,
            bet_category: BetCategory::Standard,
        })
        .collect()
}

fn sport_label(sport: Option<&str>) -> Option<String> {
    sport
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn lenient_odds(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v > 0.0),
        Value::String(s) => odds::parse_odds(s),
        _ => None,
    }
}
