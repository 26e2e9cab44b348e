//! Spoken-command interpretation.
//!
//! Turns a transcript such as "golomt bank next 5 years" into a company
//! ticker and a forecast horizon in days. Every stage falls back to a fixed
//! default instead of failing: no company, a magnitude of 1, and a month
//! multiplier when no unit word is present.

use std::sync::LazyLock;

use forecast_core::{Company, CompanyRegistry, Horizon, Selection};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// First numeral (any script) or number word (one..ten) in the text.
static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+|one|two|three|four|five|six|seven|eight|nine|ten)")
        .expect("NUMBER_PATTERN is a valid hardcoded regex")
});

/// A single Unicode decimal digit.
static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("DECIMAL_DIGIT is a valid hardcoded regex"));

/// Anything that is neither a word character nor whitespace.
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s]").expect("PUNCTUATION is a valid hardcoded regex")
});

/// Unit keywords in priority order with their day multipliers.
const UNITS: [(&str, u64); 4] = [("year", 365), ("month", 30), ("week", 7), ("day", 1)];

/// Multiplier used when the transcript names no unit (read as months).
const DEFAULT_MULTIPLIER: u64 = 30;

/// Result of interpreting one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    /// Registry ticker, `None` when no company was recognised
    pub ticker: Option<String>,
    pub horizon: Horizon,
    /// The transcript as received
    pub text: Option<String>,
}

impl ParsedCommand {
    /// Result for missing or empty input.
    pub fn empty() -> Self {
        Self {
            ticker: None,
            horizon: Horizon::DEFAULT,
            text: None,
        }
    }

    /// Update dashboard state: a recognised company replaces the selected
    /// one, the horizon always replaces the selected horizon.
    pub fn apply(&self, selection: &mut Selection) {
        if let Some(ticker) = &self.ticker {
            selection.ticker = ticker.clone();
        }
        selection.horizon = self.horizon;
    }
}

impl Default for ParsedCommand {
    fn default() -> Self {
        Self::empty()
    }
}

/// Interpret a transcript against `registry`.
pub fn parse_command(text: Option<&str>, registry: &CompanyRegistry) -> ParsedCommand {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return ParsedCommand::empty(),
    };

    let lower = text.to_lowercase();
    let clean = PUNCTUATION.replace_all(&lower, "");

    let ticker = resolve_company(&lower, &clean, registry).map(|c| c.ticker.to_string());
    let horizon = resolve_horizon(&lower);

    tracing::debug!("Parsed command {:?} -> ticker={:?} horizon={}", text, ticker, horizon);

    ParsedCommand {
        ticker,
        horizon,
        text: Some(text.to_string()),
    }
}

/// First company (registry order) whose ticker is a substring of either
/// form of the text; failing that, the first whose display name appears as
/// a whole-word phrase.
fn resolve_company(lower: &str, clean: &str, registry: &CompanyRegistry) -> Option<&'static Company> {
    registry
        .iter()
        .find(|c| {
            let ticker = c.ticker.to_lowercase();
            clean.contains(&ticker) || lower.contains(&ticker)
        })
        .or_else(|| {
            let words: Vec<&str> = clean.split_whitespace().collect();
            registry.iter().find(|c| {
                let name = c.name.to_lowercase();
                let phrase: Vec<&str> = name.split_whitespace().collect();
                contains_phrase(&words, &phrase)
            })
        })
}

fn contains_phrase(words: &[&str], phrase: &[&str]) -> bool {
    !phrase.is_empty() && words.windows(phrase.len()).any(|w| w == phrase)
}

fn resolve_horizon(lower: &str) -> Horizon {
    let magnitude = NUMBER_PATTERN
        .find(lower)
        .map(|m| number_value(m.as_str()))
        .unwrap_or(1);

    let multiplier = UNITS
        .iter()
        .find(|(unit, _)| lower.contains(unit))
        .map(|&(_, days)| days)
        .unwrap_or(DEFAULT_MULTIPLIER);

    Horizon::clamped(magnitude.saturating_mul(multiplier))
}

fn number_value(token: &str) -> u64 {
    match token {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        // Only digit runs reach here; overflow saturates and gets clamped later
        digits => digits
            .chars()
            .map(digit_value)
            .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(d)),
    }
}

/// Value of a decimal digit from any script.
///
/// Decimal digits come in contiguous runs of ten starting at zero, so the
/// value is the offset from the start of the run, modulo ten.
fn digit_value(c: char) -> u64 {
    if let Some(d) = c.to_digit(10) {
        return d as u64;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    ((c as u32 - start) % 10) as u64
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedCommand {
        parse_command(Some(text), &CompanyRegistry::MSE)
    }

    #[test]
    fn test_absent_and_empty_input() {
        let expected = ParsedCommand {
            ticker: None,
            horizon: Horizon::clamped(30),
            text: None,
        };
        assert_eq!(parse_command(None, &CompanyRegistry::MSE), expected);
        assert_eq!(parse_command(Some(""), &CompanyRegistry::MSE), expected);
    }

    #[test]
    fn test_company_name_with_years() {
        let cmd = parse("golomt bank next 5 years");
        assert_eq!(cmd.ticker.as_deref(), Some("GLMT"));
        assert_eq!(cmd.horizon.days(), 1825);
        assert_eq!(cmd.text.as_deref(), Some("golomt bank next 5 years"));
    }

    #[test]
    fn test_ticker_with_days() {
        let cmd = parse("APU 90 days");
        assert_eq!(cmd.ticker.as_deref(), Some("APU"));
        assert_eq!(cmd.horizon.days(), 90);
        assert_eq!(cmd.text.as_deref(), Some("APU 90 days"));
    }

    #[test]
    fn test_number_word_weeks_without_company() {
        let cmd = parse("three weeks");
        assert_eq!(cmd.ticker, None);
        assert_eq!(cmd.horizon.days(), 21);
    }

    #[test]
    fn test_ticker_only_defaults_to_thirty_days() {
        let cmd = parse("show me Invescore");
        assert_eq!(cmd.ticker.as_deref(), Some("INV"));
        assert_eq!(cmd.horizon.days(), 30);
    }

    #[test]
    fn test_number_without_unit_reads_as_months() {
        assert_eq!(parse("lendmn 2").horizon.days(), 60);
    }

    #[test]
    fn test_unit_without_number_uses_magnitude_one() {
        assert_eq!(parse("bdsec next month").horizon.days(), 30);
        assert_eq!(parse("bdsec next week").horizon.days(), 7);
        assert_eq!(parse("bdsec next year").horizon.days(), 365);
        assert_eq!(parse("bdsec next day").horizon.days(), 1);
    }

    #[test]
    fn test_unit_priority_year_over_day() {
        // "days" is also present but years win
        assert_eq!(parse("2 years and 10 days").horizon.days(), 730);
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(parse("apu 45 or 60 days").horizon.days(), 45);
    }

    #[test]
    fn test_horizon_clamped_at_upper_bound() {
        assert_eq!(parse("ten years").horizon.days(), 3650);
        assert_eq!(parse("apu 11 years").horizon.days(), 3650);
        assert_eq!(parse("apu 99999999999999999999999 years").horizon.days(), 3650);
    }

    #[test]
    fn test_numerals_from_other_scripts() {
        // Arabic-Indic five and twelve
        assert_eq!(parse("apu \u{0665} days").horizon.days(), 5);
        assert_eq!(parse("apu \u{0661}\u{0662} weeks").horizon.days(), 84);
        // Devanagari three
        assert_eq!(parse("\u{0969} months").horizon.days(), 90);
        // Mathematical bold digits sit in one long run of fifty
        assert_eq!(parse("\u{1D7D7} days").horizon.days(), 9);
        assert_eq!(parse("\u{1D7DA} days").horizon.days(), 2);
    }

    #[test]
    fn test_horizon_clamped_at_lower_bound() {
        assert_eq!(parse("apu 0 days").horizon.days(), 1);
    }

    #[test]
    fn test_punctuation_is_ignored_for_tickers() {
        let cmd = parse("G.L.M.T, please; 4 weeks!");
        assert_eq!(cmd.ticker.as_deref(), Some("GLMT"));
        assert_eq!(cmd.horizon.days(), 28);
    }

    #[test]
    fn test_registry_order_breaks_ties() {
        // Both "apu" and "bds" appear; APU comes first in the registry
        assert_eq!(parse("bds or apu").ticker.as_deref(), Some("APU"));
    }

    #[test]
    fn test_short_display_name_needs_whole_word() {
        assert_eq!(parse("looking forward to it").ticker, None);
        assert_eq!(parse("ard for 2 weeks").ticker.as_deref(), Some("AARD"));
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let text = "Darkhan Nekhii in six months";
        let first = parse(text);
        assert_eq!(first, parse(text));
        assert_eq!(first.ticker.as_deref(), Some("NEH"));
        assert_eq!(first.horizon.days(), 180);
    }

    #[test]
    fn test_apply_updates_selection() {
        let mut selection = Selection::initial(&CompanyRegistry::MSE);

        parse("golomt bank next 5 years").apply(&mut selection);
        assert_eq!(selection.ticker, "GLMT");
        assert_eq!(selection.horizon.days(), 1825);

        // No company recognised keeps the previous one
        parse("three weeks").apply(&mut selection);
        assert_eq!(selection.ticker, "GLMT");
        assert_eq!(selection.horizon.days(), 21);
    }
}
