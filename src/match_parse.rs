use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use crate::odds;
use crate::state::{BetCategory, MatchEntry, UNKNOWN_PICK};

// Ordered extraction rules; the first key that yields a non-empty value wins.
const TEAM_PAIR_KEYS: &[(&str, &str)] = &[
    ("homeTeam", "awayTeam"),
    ("home_team", "away_team"),
    ("team1", "team2"),
    ("home", "away"),
];
const TEAMS_KEYS: &[&str] = &["teams", "match", "match_teams", "matchTeams"];
const PREDICTION_KEYS: &[&str] = &["pronostic", "prediction", "prediction_text", "pick"];
const ODDS_KEYS: &[&str] = &["odd", "odds", "cote"];
const LEAGUE_KEYS: &[&str] = &["sport", "league"];
const TIME_KEYS: &[&str] = &["time", "heure", "kickoff"];
const CATEGORY_KEYS: &[&str] = &["selectedBetType", "betType", "bet_type", "category"];

/// Record-level values a leg falls back to when its own keys are missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchContext<'a> {
    pub default_teams: Option<&'a str>,
    pub sport: Option<&'a str>,
}

/// Builds a canonical leg from any accepted raw shape. Never fails; missing fields stay `None`
/// or fall back to the context.
pub fn normalize_match(raw: &Value, index: usize, ctx: &MatchContext<'_>) -> MatchEntry {
    let teams_label = resolve_teams(raw)
        .or_else(|| ctx.default_teams.and_then(non_empty).map(str::to_string))
        .unwrap_or_default();

    let league = pick_non_empty(raw, LEAGUE_KEYS)
        .or_else(|| ctx.sport.and_then(non_empty).map(str::to_string));

    MatchEntry {
        id: pick_non_empty(raw, &["id"]).unwrap_or_else(|| format!("match-{index}")),
        teams_label,
        // Rows written from display labels carry the sentinels; they mean "unknown".
        prediction: pick_non_empty(raw, PREDICTION_KEYS)
            .filter(|pick| !pick.eq_ignore_ascii_case(UNKNOWN_PICK)),
        odds: pick_non_empty(raw, ODDS_KEYS).filter(|text| odds::parse_odds(text).is_some()),
        league,
        time: pick_non_empty(raw, TIME_KEYS).map(|t| normalize_kickoff(&t)),
        bet_category: pick_non_empty(raw, CATEGORY_KEYS)
            .map(|label| BetCategory::from_label(&label))
            .unwrap_or_default(),
    }
}

/// True when a lone object carries enough to be treated as one leg.
pub fn looks_like_match(raw: &Value) -> bool {
    if !raw.is_object() {
        return false;
    }
    TEAM_PAIR_KEYS
        .iter()
        .any(|(home, _)| pick_non_empty(raw, &[*home]).is_some())
        || pick_non_empty(raw, TEAMS_KEYS).is_some()
}

fn resolve_teams(raw: &Value) -> Option<String> {
    for (home_key, away_key) in TEAM_PAIR_KEYS {
        let home = pick_non_empty(raw, &[*home_key]);
        let away = pick_non_empty(raw, &[*away_key]);
        if let (Some(home), Some(away)) = (home, away) {
            return Some(format!("{home} vs {away}"));
        }
    }
    pick_non_empty(raw, TEAMS_KEYS)
}

/// ISO timestamps are shown as a kickoff clock; anything else is kept as typed.
pub(crate) fn normalize_kickoff(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format("%H:%M").to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return dt.format("%H:%M").to_string();
        }
    }
    trimmed.to_string()
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub(crate) fn pick_non_empty(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(text) = as_string(v) {
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => {
            if let Some(Value::String(name)) = map.get("name") {
                return Some(name.trim().to_string());
            }
            if let Some(Value::String(name)) = map.get("shortName") {
                return Some(name.trim().to_string());
            }
            None
        }
        _ => None,
    }
}
