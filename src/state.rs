use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::odds;

// Display sentinels. They never live inside `MatchEntry`; absent values are `None`.
pub const UNKNOWN_PICK: &str = "N/A";
pub const NO_ODDS: &str = "0.00";
pub const DEFAULT_LEAGUE: &str = "Football";
pub const DEFAULT_TIME: &str = "20:00";
pub const LOTTERY_SPORT: &str = "Loto";

/// Separator used by combined bets saved before structured match data existed.
pub const LEG_DELIMITER: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetKind {
    #[default]
    Simple,
    #[serde(rename = "combine", alias = "combined")]
    Combined,
    #[serde(rename = "loto", alias = "lottery")]
    Lottery,
}

impl BetKind {
    pub fn label(self) -> &'static str {
        match self {
            BetKind::Simple => "simple",
            BetKind::Combined => "combine",
            BetKind::Lottery => "loto",
        }
    }

    pub fn uses_legs(self) -> bool {
        !matches!(self, BetKind::Lottery)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BetCategory {
    OneXTwo,
    DoubleChance,
    OverUnder,
    Handicap,
    BothTeamsToScore,
    Goals,
    Corners,
    Cards,
    HalfTime,
    #[default]
    Standard,
    Custom(String),
}

const ONE_X_TWO_PICKS: &[&str] = &["1", "X", "2"];
const DOUBLE_CHANCE_PICKS: &[&str] = &["1X", "12", "X2"];
const BTTS_PICKS: &[&str] = &["Yes", "No"];
const OVER_UNDER_PICKS: &[&str] = &[
    "Over 0.5",
    "Under 0.5",
    "Over 1.5",
    "Under 1.5",
    "Over 2.5",
    "Under 2.5",
    "Over 3.5",
    "Under 3.5",
    "Over 4.5",
    "Under 4.5",
];

impl BetCategory {
    pub fn from_label(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "standard" => BetCategory::Standard,
            "1x2" => BetCategory::OneXTwo,
            "double chance" => BetCategory::DoubleChance,
            "over/under" | "plus/moins" => BetCategory::OverUnder,
            "handicap" => BetCategory::Handicap,
            "btts" => BetCategory::BothTeamsToScore,
            "goals" | "but" => BetCategory::Goals,
            "corners" | "corner" => BetCategory::Corners,
            "cards" | "carton" => BetCategory::Cards,
            "half time" | "mi-temps" => BetCategory::HalfTime,
            _ => BetCategory::Custom(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BetCategory::OneXTwo => "1X2",
            BetCategory::DoubleChance => "Double Chance",
            BetCategory::OverUnder => "Over/Under",
            BetCategory::Handicap => "Handicap",
            BetCategory::BothTeamsToScore => "BTTS",
            BetCategory::Goals => "Goals",
            BetCategory::Corners => "Corners",
            BetCategory::Cards => "Cards",
            BetCategory::HalfTime => "Half Time",
            BetCategory::Standard => "Standard",
            BetCategory::Custom(label) => label,
        }
    }

    /// Fixed pick vocabulary, or `None` when the pick is free text.
    pub fn pick_options(&self) -> Option<&'static [&'static str]> {
        match self {
            BetCategory::OneXTwo | BetCategory::HalfTime => Some(ONE_X_TWO_PICKS),
            BetCategory::DoubleChance => Some(DOUBLE_CHANCE_PICKS),
            BetCategory::BothTeamsToScore => Some(BTTS_PICKS),
            BetCategory::OverUnder => Some(OVER_UNDER_PICKS),
            _ => None,
        }
    }

    pub fn accepts_pick(&self, pick: &str) -> bool {
        match self.pick_options() {
            Some(options) => options.iter().any(|opt| opt.eq_ignore_ascii_case(pick.trim())),
            None => !pick.trim().is_empty(),
        }
    }
}

impl fmt::Display for BetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BetCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BetCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(BetCategory::from_label(&raw))
    }
}

/// One leg of a bet. Serialized with the keys the read side expects in stored match data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchEntry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "teams", default)]
    pub teams_label: String,
    #[serde(rename = "prediction", default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    // Raw text as typed or stored; parsed on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "betType", default)]
    pub bet_category: BetCategory,
}

impl MatchEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn odds_value(&self) -> Option<f64> {
        self.odds.as_deref().and_then(odds::parse_odds)
    }

    pub fn odds_decimal(&self) -> Option<Decimal> {
        self.odds.as_deref().and_then(odds::parse_odds_decimal)
    }

    /// Complete legs are the only ones that reach a submission.
    pub fn is_complete(&self) -> bool {
        !self.teams_label.trim().is_empty()
            && self
                .prediction
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty())
            && self.odds_value().is_some()
    }

    pub fn prediction_label(&self) -> &str {
        self.prediction
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(UNKNOWN_PICK)
    }

    pub fn odds_label(&self) -> String {
        match self.odds_value() {
            Some(value) => odds::format_odds(value),
            None => NO_ODDS.to_string(),
        }
    }

    pub fn league_label(&self) -> &str {
        self.league.as_deref().unwrap_or(DEFAULT_LEAGUE)
    }

    pub fn time_label(&self) -> &str {
        self.time.as_deref().unwrap_or(DEFAULT_TIME)
    }
}

/// Opaque media handed through to storage untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }
}
