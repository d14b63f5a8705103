use prono_core::match_parse::{MatchContext, looks_like_match, normalize_match};
use prono_core::state::BetCategory;
use serde_json::json;

#[test]
fn home_away_pair_wins_over_combined_string() {
    let raw = json!({
        "homeTeam": "PSG",
        "awayTeam": "OM",
        "teams": "ignored vs ignored",
        "pronostic": "1",
        "odd": "1.80"
    });
    let entry = normalize_match(&raw, 0, &MatchContext::default());
    assert_eq!(entry.teams_label, "PSG vs OM");
    assert_eq!(entry.prediction.as_deref(), Some("1"));
    assert_eq!(entry.odds.as_deref(), Some("1.80"));
}

#[test]
fn half_filled_pair_falls_through_to_next_rule() {
    let raw = json!({"homeTeam": "PSG", "awayTeam": "", "team1": "Lille", "team2": "Lens"});
    let entry = normalize_match(&raw, 0, &MatchContext::default());
    assert_eq!(entry.teams_label, "Lille vs Lens");
}

#[test]
fn context_teams_used_when_leg_has_none() {
    let raw = json!({"prediction": "X"});
    let ctx = MatchContext {
        default_teams: Some("Monaco vs Brest"),
        sport: Some("Ligue 1"),
    };
    let entry = normalize_match(&raw, 3, &ctx);
    assert_eq!(entry.teams_label, "Monaco vs Brest");
    assert_eq!(entry.league.as_deref(), Some("Ligue 1"));
    assert_eq!(entry.id, "match-3");
}

#[test]
fn missing_fields_default_to_documented_labels() {
    let raw = json!({"unexpected": true, "teams": "A vs B"});
    let entry = normalize_match(&raw, 1, &MatchContext::default());
    assert_eq!(entry.teams_label, "A vs B");
    assert_eq!(entry.prediction, None);
    assert_eq!(entry.prediction_label(), "N/A");
    assert_eq!(entry.odds, None);
    assert_eq!(entry.odds_label(), "0.00");
    assert_eq!(entry.league_label(), "Football");
    assert_eq!(entry.time_label(), "20:00");
    assert_eq!(entry.bet_category, BetCategory::Standard);
    assert_eq!(entry.bet_category.label(), "Standard");
}

#[test]
fn empty_record_and_empty_context_give_empty_teams() {
    let entry = normalize_match(&json!({}), 0, &MatchContext::default());
    assert!(entry.teams_label.is_empty());
    assert!(!entry.is_complete());
}

#[test]
fn legacy_keys_take_precedence_in_order() {
    let raw = json!({
        "teams": "A vs B",
        "pronostic": "2",
        "prediction": "1",
        "odd": 2.5,
        "odds": "9.99",
        "sport": "Futsal",
        "league": "Cup",
        "heure": "18:00",
        "selectedBetType": "Mi-temps",
        "betType": "1X2"
    });
    let entry = normalize_match(&raw, 0, &MatchContext::default());
    assert_eq!(entry.prediction.as_deref(), Some("2"));
    assert_eq!(entry.odds.as_deref(), Some("2.5"));
    assert_eq!(entry.league.as_deref(), Some("Futsal"));
    assert_eq!(entry.time.as_deref(), Some("18:00"));
    assert_eq!(entry.bet_category, BetCategory::HalfTime);
}

#[test]
fn match_like_detection() {
    assert!(looks_like_match(&json!({"homeTeam": "A"})));
    assert!(looks_like_match(&json!({"team1": "A"})));
    assert!(looks_like_match(&json!({"teams": "A vs B"})));
    assert!(!looks_like_match(&json!({"odds": "1.5"})));
    assert!(!looks_like_match(&json!(["A vs B"])));
}

#[test]
fn stored_sentinels_read_back_as_unknown() {
    let raw = json!({"teams": "Nantes vs Rennes", "prediction": "N/A", "odds": "0.00"});
    let entry = normalize_match(&raw, 0, &MatchContext::default());
    assert_eq!(entry.prediction, None);
    assert_eq!(entry.odds, None);
    assert_eq!(entry.prediction_label(), "N/A");
    assert_eq!(entry.odds_label(), "0.00");

    let raw = json!({"teams": "Nantes vs Rennes", "pick": "n/a", "cote": "abc"});
    let entry = normalize_match(&raw, 0, &MatchContext::default());
    assert_eq!(entry.prediction, None);
    assert_eq!(entry.odds, None);
}
