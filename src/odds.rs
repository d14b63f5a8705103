use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::state::{BetKind, MatchEntry};

/// Parses a decimal odds string. Unusable text, zero and negatives are treated as absent.
pub fn parse_odds(raw: &str) -> Option<f64> {
    parse_odds_decimal(raw).map(to_f64)
}

/// Exact form of [`parse_odds`], used wherever odds are multiplied or rounded.
pub fn parse_odds_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Decimal commas are common in French-speaking input.
    let normalized = trimmed.replace(',', ".");
    let value = Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()?;
    (value > Decimal::ZERO).then_some(value)
}

/// Product of every usable leg odds, rounded to two decimals. `0.0` when nothing is usable.
pub fn combined_odds<'a>(entries: impl IntoIterator<Item = &'a MatchEntry>) -> f64 {
    let mut values: Vec<Decimal> = entries
        .into_iter()
        .filter_map(MatchEntry::odds_decimal)
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    // Past 28 significant digits the product is rescaled, so keep the order fixed.
    values.sort();
    match values
        .iter()
        .try_fold(Decimal::ONE, |acc, value| acc.checked_mul(*value))
    {
        Some(product) => to_f64(round_decimal(product)),
        None => {
            warn!(legs = values.len(), "combined odds overflow exact range");
            let product: f64 = values.iter().copied().map(to_f64).product();
            (product * 100.0).round() / 100.0
        }
    }
}

pub fn single_odds(entry: &MatchEntry) -> f64 {
    entry
        .odds_decimal()
        .map(|value| to_f64(round_decimal(value)))
        .unwrap_or(0.0)
}

/// Odds of the bet as a whole: first complete leg for simple bets, product otherwise.
pub fn bet_odds(kind: BetKind, entries: &[MatchEntry]) -> f64 {
    match kind {
        BetKind::Simple => entries
            .iter()
            .find(|entry| entry.is_complete())
            .or_else(|| entries.first())
            .map(single_odds)
            .unwrap_or(0.0),
        BetKind::Combined => combined_odds(entries),
        BetKind::Lottery => 0.0,
    }
}

pub fn combined_odds_label<'a>(entries: impl IntoIterator<Item = &'a MatchEntry>) -> String {
    format_odds(combined_odds(entries))
}

/// Two-decimal label. The float is read back from its shortest decimal form, so `1.265` shows
/// as `1.27`.
pub fn format_odds(value: f64) -> String {
    match Decimal::from_str(&value.to_string()) {
        Ok(exact) => format!("{:.2}", to_f64(round_decimal(exact))),
        Err(_) => format!("{value:.2}"),
    }
}

fn round_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// Mantissa over an exact power of ten, so two-decimal values land on the nearest float.
fn to_f64(value: Decimal) -> f64 {
    value.mantissa() as f64 / 10f64.powi(value.scale() as i32)
}
