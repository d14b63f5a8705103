use std::collections::BTreeSet;
use std::fmt;

use crate::match_parse::normalize_kickoff;
use crate::state::{Attachment, BetCategory, BetKind, MatchEntry};

pub const LOTTERY_MAX_PICKS: usize = 6;
pub const LOTTERY_MIN_NUMBER: u8 = 1;
pub const LOTTERY_MAX_NUMBER: u8 = 90;
pub const DEFAULT_CONFIDENCE: u8 = 3;
pub const MAX_CONFIDENCE: u8 = 5;

/// First rule a draft breaks, for UI messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftIssue {
    NoLotteryNumbers,
    MissingAnalysis,
    NoCompleteLeg,
    MissingSport,
}

impl fmt::Display for DraftIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DraftIssue::NoLotteryNumbers => "select at least one lottery number",
            DraftIssue::MissingAnalysis => "analysis text is required",
            DraftIssue::NoCompleteLeg => "at least one match needs teams, a pick and odds",
            DraftIssue::MissingSport => "sport is required",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for DraftIssue {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotteryToggle {
    Added,
    Removed,
    // Capacity cap reached; the set is unchanged.
    Full,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LegField {
    Teams(String),
    Prediction(String),
    Odds(String),
    League(String),
    Time(String),
    Category(BetCategory),
}

/// In-progress authoring state for one session. Consumed by the payload mapper once valid.
#[derive(Debug, Clone)]
pub struct PredictionDraft {
    bet_kind: BetKind,
    legs: Vec<MatchEntry>,
    lottery_numbers: BTreeSet<u8>,
    confidence: u8,
    pub analysis: String,
    pub sport: String,
    pub reservation_code: String,
    pub image: Option<Attachment>,
    pub video: Option<Attachment>,
    next_leg: u32,
}

impl Default for PredictionDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionDraft {
    pub fn new() -> Self {
        let mut draft = Self {
            bet_kind: BetKind::Simple,
            legs: Vec::new(),
            lottery_numbers: BTreeSet::new(),
            confidence: DEFAULT_CONFIDENCE,
            analysis: String::new(),
            sport: String::new(),
            reservation_code: String::new(),
            image: None,
            video: None,
            next_leg: 1,
        };
        draft.add_blank_leg();
        draft
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn bet_kind(&self) -> BetKind {
        self.bet_kind
    }

    // Legs are kept on purpose: a simple bet then uses its first complete leg.
    pub fn set_bet_kind(&mut self, kind: BetKind) {
        self.bet_kind = kind;
    }

    pub fn legs(&self) -> &[MatchEntry] {
        &self.legs
    }

    pub fn leg(&self, id: &str) -> Option<&MatchEntry> {
        self.legs.iter().find(|leg| leg.id == id)
    }

    pub fn complete_legs(&self) -> impl Iterator<Item = &MatchEntry> {
        self.legs.iter().filter(|leg| leg.is_complete())
    }

    pub fn primary_leg(&self) -> Option<&MatchEntry> {
        self.complete_legs().next()
    }

    pub fn lottery_numbers(&self) -> &BTreeSet<u8> {
        &self.lottery_numbers
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn set_confidence(&mut self, value: u8) {
        self.confidence = value.clamp(1, MAX_CONFIDENCE);
    }

    pub fn add_blank_leg(&mut self) -> String {
        self.add_leg(MatchEntry::default())
    }

    /// Appends a leg and returns its id. A simple bet holds one leg, so the new one replaces it.
    pub fn add_leg(&mut self, mut entry: MatchEntry) -> String {
        if entry.id.trim().is_empty() {
            entry.id = self.issue_leg_id();
        }
        entry.time = entry.time.take().and_then(kickoff_time);
        let id = entry.id.clone();
        if self.bet_kind == BetKind::Simple {
            self.legs.clear();
        }
        self.legs.push(entry);
        id
    }

    /// Refuses to drop the last leg while the draft is match-based.
    pub fn remove_leg(&mut self, id: &str) -> bool {
        if self.bet_kind.uses_legs() && self.legs.len() <= 1 {
            return false;
        }
        let before = self.legs.len();
        self.legs.retain(|leg| leg.id != id);
        self.legs.len() != before
    }

    pub fn update_leg(&mut self, id: &str, field: LegField) -> bool {
        let Some(leg) = self.legs.iter_mut().find(|leg| leg.id == id) else {
            return false;
        };
        match field {
            LegField::Teams(teams) => leg.teams_label = teams.trim().to_string(),
            LegField::Prediction(pick) => leg.prediction = non_blank(pick),
            LegField::Odds(odds) => leg.odds = non_blank(odds),
            LegField::League(league) => leg.league = non_blank(league),
            LegField::Time(time) => leg.time = kickoff_time(time),
            LegField::Category(category) => {
                let stale = leg
                    .prediction
                    .as_deref()
                    .is_some_and(|pick| !category.accepts_pick(pick));
                if stale {
                    leg.prediction = None;
                }
                leg.bet_category = category;
            }
        }
        true
    }

    pub fn toggle_lottery_number(&mut self, n: u8) -> LotteryToggle {
        if !(LOTTERY_MIN_NUMBER..=LOTTERY_MAX_NUMBER).contains(&n) {
            return LotteryToggle::OutOfRange;
        }
        if self.lottery_numbers.remove(&n) {
            return LotteryToggle::Removed;
        }
        if self.lottery_numbers.len() >= LOTTERY_MAX_PICKS {
            return LotteryToggle::Full;
        }
        self.lottery_numbers.insert(n);
        LotteryToggle::Added
    }

    pub fn validate(&self) -> Result<(), DraftIssue> {
        let has_analysis = !self.analysis.trim().is_empty();
        match self.bet_kind {
            BetKind::Lottery => {
                if self.lottery_numbers.is_empty() {
                    return Err(DraftIssue::NoLotteryNumbers);
                }
                if !has_analysis {
                    return Err(DraftIssue::MissingAnalysis);
                }
            }
            BetKind::Simple | BetKind::Combined => {
                if self.primary_leg().is_none() {
                    return Err(DraftIssue::NoCompleteLeg);
                }
                if !has_analysis {
                    return Err(DraftIssue::MissingAnalysis);
                }
                if self.sport.trim().is_empty() {
                    return Err(DraftIssue::MissingSport);
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn issue_leg_id(&mut self) -> String {
        let id = format!("leg-{}", self.next_leg);
        self.next_leg += 1;
        id
    }
}

// Stored in the form the read side shows, so a leg reads back as it was entered.
fn kickoff_time(value: String) -> Option<String> {
    non_blank(value).map(|time| normalize_kickoff(&time))
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
