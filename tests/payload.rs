use prono_core::config::CoreConfig;
use prono_core::draft::{DraftIssue, LegField, PredictionDraft};
use prono_core::match_list::{MatchList, build_match_list_with};
use prono_core::payload::to_payload_with;
use prono_core::state::{Attachment, BetCategory, BetKind, MatchEntry};

fn leg(teams: &str, pick: &str, odds: &str, league: &str, time: &str) -> MatchEntry {
    MatchEntry {
        id: String::new(),
        teams_label: teams.to_string(),
        prediction: Some(pick.to_string()),
        odds: Some(odds.to_string()),
        league: Some(league.to_string()),
        time: Some(time.to_string()),
        bet_category: BetCategory::OneXTwo,
    }
}

fn combined_draft() -> PredictionDraft {
    let mut draft = PredictionDraft::new();
    draft.set_bet_kind(BetKind::Combined);
    draft.sport = "Football".to_string();
    draft.analysis = "  Two favourites at home  ".to_string();
    draft.set_confidence(4);
    let placeholder = draft.legs()[0].id.clone();
    draft.add_leg(leg("PSG vs OM", "1", "1.80", "Ligue 1", "21:00"));
    draft.add_leg(leg("Real vs Barca", "2", "2.50", "LaLiga", "18:30"));
    assert!(draft.remove_leg(&placeholder));
    draft
}

fn same_leg(a: &MatchEntry, b: &MatchEntry) -> bool {
    a.teams_label == b.teams_label
        && a.prediction == b.prediction
        && a.odds == b.odds
        && a.league == b.league
        && a.time == b.time
        && a.bet_category == b.bet_category
}

#[test]
fn combined_payload_joins_legs_and_multiplies_odds() {
    let payload = to_payload_with(&combined_draft(), &CoreConfig::default()).expect("valid draft");
    assert_eq!(payload.bet_kind, BetKind::Combined);
    assert_eq!(payload.match_teams.as_deref(), Some("PSG vs OM | Real vs Barca"));
    assert_eq!(payload.prediction_text, "1 | 2");
    assert_eq!(payload.odds, 4.5);
    assert_eq!(payload.analysis, "Two favourites at home");
    assert_eq!(payload.confidence, 4);
    assert_eq!(payload.reservation_code, None);
    assert!(payload.matches_data.is_some());
}

#[test]
fn combined_round_trip_is_lossless() {
    let draft = combined_draft();
    let payload = to_payload_with(&draft, &CoreConfig::default()).expect("valid draft");
    let record = payload.to_stored_record();

    let rebuilt = build_match_list_with(&record, &CoreConfig::default());
    let original: Vec<&MatchEntry> = draft.complete_legs().collect();
    assert_eq!(rebuilt.len(), original.len());
    for (got, want) in rebuilt.iter().zip(original) {
        assert!(same_leg(got, want), "{got:?} != {want:?}");
        // The structured path keeps picks; the delimiter fallback would not.
        assert_ne!(got.prediction_label(), "N/A");
    }

    let list = MatchList::from_record_with(&record, &CoreConfig::default());
    assert!(list.multi_leg);
    assert!(list.odds_consistent());
    assert_eq!(list.total_odds_label(), "4.50");
}

#[test]
fn typed_kickoff_times_survive_the_round_trip() {
    let mut draft = combined_draft();
    let first = draft.legs()[0].id.clone();
    let second = draft.legs()[1].id.clone();
    draft.update_leg(&first, LegField::Time("2026-06-11 21:45".into()));
    draft.update_leg(&second, LegField::Time("Sat 20h".into()));
    let third = draft.add_leg(leg("Lens vs Lille", "X", "3.10", "Ligue 1", "2026-06-12T19:00:00Z"));

    assert_eq!(draft.leg(&first).and_then(|l| l.time.as_deref()), Some("21:45"));
    assert_eq!(draft.leg(&third).and_then(|l| l.time.as_deref()), Some("19:00"));

    let payload = to_payload_with(&draft, &CoreConfig::default()).expect("valid draft");
    let rebuilt = build_match_list_with(&payload.to_stored_record(), &CoreConfig::default());
    let original: Vec<&MatchEntry> = draft.complete_legs().collect();
    assert_eq!(rebuilt.len(), 3);
    for (got, want) in rebuilt.iter().zip(original) {
        assert!(same_leg(got, want), "{got:?} != {want:?}");
    }
    assert_eq!(rebuilt[1].time.as_deref(), Some("Sat 20h"));
}

#[test]
fn incomplete_combined_legs_are_left_out() {
    let mut draft = combined_draft();
    let extra = draft.add_blank_leg();
    draft.update_leg(&extra, LegField::Teams("Lens vs Lille".into()));
    let payload = to_payload_with(&draft, &CoreConfig::default()).expect("valid draft");
    assert_eq!(payload.match_teams.as_deref(), Some("PSG vs OM | Real vs Barca"));
    assert_eq!(payload.odds, 4.5);
}

#[test]
fn leg_without_league_takes_draft_sport_in_stored_data() {
    let mut draft = combined_draft();
    draft.sport = "Futsal".to_string();
    let id = draft.add_blank_leg();
    draft.update_leg(&id, LegField::Teams("A vs B".into()));
    draft.update_leg(&id, LegField::Prediction("X".into()));
    draft.update_leg(&id, LegField::Odds("3.00".into()));

    let payload = to_payload_with(&draft, &CoreConfig::default()).expect("valid draft");
    let rebuilt = build_match_list_with(&payload.to_stored_record(), &CoreConfig::default());
    assert_eq!(rebuilt.len(), 3);
    assert_eq!(rebuilt[2].league.as_deref(), Some("Futsal"));
    assert_eq!(rebuilt[2].time, None);
}

#[test]
fn simple_payload_uses_flat_fields_only() {
    let mut draft = PredictionDraft::new();
    draft.sport = "Football".to_string();
    draft.analysis = "Value on the away side".to_string();
    draft.reservation_code = "  AB12CD ".to_string();
    draft.image = Some(Attachment::new("slip.png", vec![1, 2, 3]));
    draft.add_leg(leg("Real vs Barca", "2", "2.10", "LaLiga", "21:00"));

    let payload = to_payload_with(&draft, &CoreConfig::default()).expect("valid draft");
    assert_eq!(payload.match_teams.as_deref(), Some("Real vs Barca"));
    assert_eq!(payload.prediction_text, "2");
    assert_eq!(payload.odds, 2.1);
    assert_eq!(payload.matches_data, None);
    assert_eq!(payload.bet_category.as_deref(), Some("1X2"));
    assert_eq!(payload.reservation_code.as_deref(), Some("AB12CD"));
    assert_eq!(payload.image.as_ref().map(|a| a.bytes.as_slice()), Some(&[1u8, 2, 3][..]));
    assert_eq!(payload.video, None);

    let rebuilt = build_match_list_with(&payload.to_stored_record(), &CoreConfig::default());
    assert_eq!(rebuilt.len(), 1);
    assert_eq!(rebuilt[0].odds.as_deref(), Some("2.10"));
}

#[test]
fn lottery_payload_lists_sorted_numbers() {
    let mut draft = PredictionDraft::new();
    draft.set_bet_kind(BetKind::Lottery);
    draft.analysis = "Numbers due".to_string();
    for n in [45, 3, 27] {
        draft.toggle_lottery_number(n);
    }
    let payload = to_payload_with(&draft, &CoreConfig::default()).expect("valid draft");
    assert_eq!(payload.sport, "Loto");
    assert_eq!(payload.odds, 0.0);
    assert_eq!(payload.prediction_text, "Numéros: 3, 27, 45");
    assert_eq!(payload.match_teams, None);
    assert_eq!(payload.matches_data, None);
}

#[test]
fn invalid_draft_yields_no_payload() {
    let draft = PredictionDraft::new();
    assert_eq!(
        to_payload_with(&draft, &CoreConfig::default()),
        Err(DraftIssue::NoCompleteLeg)
    );
}

#[test]
fn huge_odds_are_kept() {
    let mut draft = PredictionDraft::new();
    draft.sport = "Football".to_string();
    draft.analysis = "typo?".to_string();
    draft.add_leg(leg("A vs B", "1", "210", "Cup", "20:00"));
    let payload = to_payload_with(&draft, &CoreConfig::default()).expect("valid draft");
    assert_eq!(payload.odds, 210.0);
}
