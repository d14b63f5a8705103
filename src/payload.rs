use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::config::{CoreConfig, core_config};
use crate::draft::{DraftIssue, PredictionDraft};
use crate::match_list::StoredPredictionRecord;
use crate::odds;
use crate::state::{Attachment, BetKind, LEG_DELIMITER, LOTTERY_SPORT, MatchEntry};

/// Flat record handed to storage. Field use depends on the bet kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub bet_kind: BetKind,
    pub sport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_teams: Option<String>,
    pub prediction_text: String,
    pub analysis: String,
    pub confidence: u8,
    pub odds: f64,
    pub reservation_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bet_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_data: Option<String>,
    #[serde(skip)]
    pub image: Option<Attachment>,
    #[serde(skip)]
    pub video: Option<Attachment>,
}

impl SubmissionPayload {
    /// Shape the record takes once read back from storage.
    pub fn to_stored_record(&self) -> StoredPredictionRecord {
        StoredPredictionRecord {
            id: None,
            matches_data: self.matches_data.clone().map(Value::String),
            match_teams: self.match_teams.clone(),
            total_odds: Some(self.odds),
            bet_type: Some(self.bet_kind.label().to_string()),
            sport: Some(self.sport.clone()),
            prediction_text: Some(self.prediction_text.clone()),
        }
    }
}

pub fn to_payload(draft: &PredictionDraft) -> Result<SubmissionPayload, DraftIssue> {
    to_payload_with(draft, core_config())
}

pub fn to_payload_with(
    draft: &PredictionDraft,
    cfg: &CoreConfig,
) -> Result<SubmissionPayload, DraftIssue> {
    draft.validate()?;

    let mut payload = SubmissionPayload {
        bet_kind: draft.bet_kind(),
        sport: draft.sport.trim().to_string(),
        match_teams: None,
        prediction_text: String::new(),
        analysis: draft.analysis.trim().to_string(),
        confidence: draft.confidence(),
        odds: 0.0,
        reservation_code: non_blank(&draft.reservation_code),
        bet_category: None,
        matches_data: None,
        image: draft.image.clone(),
        video: draft.video.clone(),
    };

    match draft.bet_kind() {
        BetKind::Lottery => {
            let numbers = draft
                .lottery_numbers()
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            payload.sport = LOTTERY_SPORT.to_string();
            payload.prediction_text = format!("Numéros: {numbers}");
        }
        BetKind::Simple => {
            let leg = draft.primary_leg().ok_or(DraftIssue::NoCompleteLeg)?;
            warn_on_suspicious_odds(leg, cfg);
            payload.match_teams = Some(leg.teams_label.clone());
            payload.prediction_text = leg.prediction_label().to_string();
            payload.odds = odds::single_odds(leg);
            payload.bet_category = Some(leg.bet_category.label().to_string());
        }
        BetKind::Combined => {
            let legs: Vec<&MatchEntry> = draft.complete_legs().collect();
            for leg in &legs {
                warn_on_suspicious_odds(leg, cfg);
            }
            payload.match_teams = Some(join_legs(&legs, |leg| leg.teams_label.as_str()));
            payload.prediction_text = join_legs(&legs, MatchEntry::prediction_label);
            payload.odds = odds::combined_odds(legs.iter().copied());
            payload.matches_data = Some(serialize_legs(&legs, &payload.sport));
        }
    }

    Ok(payload)
}

/// Stored match data for combined bets, written with the keys the read side looks up first.
fn serialize_legs(legs: &[&MatchEntry], sport: &str) -> String {
    let items = legs
        .iter()
        .map(|leg| {
            let league = leg
                .league
                .clone()
                .or_else(|| non_blank(sport))
                .unwrap_or_else(|| leg.league_label().to_string());
            let mut item = json!({
                "id": leg.id,
                "teams": leg.teams_label,
                "prediction": leg.prediction_label(),
                "odds": leg.odds.as_deref().map(str::trim).unwrap_or_default(),
                "league": league,
                "betType": leg.bet_category.label(),
            });
            if let Some(time) = leg.time.as_deref() {
                item["time"] = Value::String(time.to_string());
            }
            item
        })
        .collect::<Vec<_>>();
    Value::Array(items).to_string()
}

fn join_legs<'a>(legs: &[&'a MatchEntry], field: impl Fn(&'a MatchEntry) -> &'a str) -> String {
    legs.iter()
        .map(|leg| field(*leg))
        .collect::<Vec<_>>()
        .join(LEG_DELIMITER)
}

fn warn_on_suspicious_odds(leg: &MatchEntry, cfg: &CoreConfig) {
    if let Some(value) = leg.odds_value() {
        if value > cfg.odds_warn_above {
            warn!(
                leg_id = %leg.id,
                odds = value,
                limit = cfg.odds_warn_above,
                "leg odds look unusually high"
            );
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
