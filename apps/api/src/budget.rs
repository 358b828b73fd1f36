//! Budget classification: maps a student's budget to a tier and a prompting strategy.
//!
//! All amounts are in IDR. Monthly limits take precedence over total limits;
//! with neither present the tier defaults to `Medium`. No validation is done
//! here: negative or absurd inputs are classified by the same thresholds.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Discrete budget tier. Derived from the numeric limits, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

impl BudgetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Low => "low",
            BudgetTier::Medium => "medium",
            BudgetTier::High => "high",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier boundaries in IDR. A limit equal to a boundary belongs to the upper tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetThresholds {
    pub monthly_medium_min: f64,
    pub monthly_high_min: f64,
    pub total_medium_min: f64,
    pub total_high_min: f64,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            monthly_medium_min: 15_000_000.0,
            monthly_high_min: 50_000_000.0,
            total_medium_min: 200_000_000.0,
            total_high_min: 800_000_000.0,
        }
    }
}

impl BudgetThresholds {
    /// Classifies a budget. `monthly_limit` wins when both are given.
    pub fn classify(&self, total_limit: Option<f64>, monthly_limit: Option<f64>) -> BudgetTier {
        if let Some(monthly) = monthly_limit {
            return tier_for(monthly, self.monthly_medium_min, self.monthly_high_min);
        }
        if let Some(total) = total_limit {
            return tier_for(total, self.total_medium_min, self.total_high_min);
        }
        BudgetTier::Medium
    }
}

fn tier_for(amount: f64, medium_min: f64, high_min: f64) -> BudgetTier {
    if amount < medium_min {
        BudgetTier::Low
    } else if amount < high_min {
        BudgetTier::Medium
    } else {
        BudgetTier::High
    }
}

const LOW_BUDGET_STRATEGY: &str = "\
The student has a LIMITED budget. Recommend ONLY fully funded scholarships that cover \
tuition, living allowance and travel, and universities in countries with free or very \
low public tuition. Never recommend an option that needs significant self-funding, and \
state the remaining out-of-pocket cost for every option.";

const MEDIUM_BUDGET_STRATEGY: &str = "\
The student has a MODERATE budget. Balance program quality against affordability: mix \
full and partial scholarships with reasonably priced universities, and show how much \
self-funding each option still requires after scholarships.";

const HIGH_BUDGET_STRATEGY: &str = "\
The student has a SUBSTANTIAL budget. Prioritize prestige and program quality: lead with \
top-ranked universities and strong career outcomes, treating scholarships as a bonus \
rather than a requirement.";

/// Returns the fixed prompting directive for a tier.
pub fn strategy_for(tier: BudgetTier) -> &'static str {
    match tier {
        BudgetTier::Low => LOW_BUDGET_STRATEGY,
        BudgetTier::Medium => MEDIUM_BUDGET_STRATEGY,
        BudgetTier::High => HIGH_BUDGET_STRATEGY,
    }
}

/// IDR conversion anchors handed to the model so its cost estimates agree with each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRates {
    pub idr_per_usd: f64,
    pub idr_per_eur: f64,
    pub idr_per_gbp: f64,
    pub idr_per_aud: f64,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            idr_per_usd: 16_000.0,
            idr_per_eur: 17_500.0,
            idr_per_gbp: 20_500.0,
            idr_per_aud: 10_500.0,
        }
    }
}

/// A student's stated limits. Both fields are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub total_limit: Option<f64>,
    #[serde(default)]
    pub monthly_limit: Option<f64>,
}

impl Budget {
    pub fn new(total_limit: Option<f64>, monthly_limit: Option<f64>) -> Self {
        Self {
            total_limit,
            monthly_limit,
        }
    }

    pub fn tier(&self, thresholds: &BudgetThresholds) -> BudgetTier {
        thresholds.classify(self.total_limit, self.monthly_limit)
    }

    /// Renders the budget block injected into recommendation prompts.
    pub fn prompt_section(&self, thresholds: &BudgetThresholds, rates: &ExchangeRates) -> String {
        let tier = self.tier(thresholds);
        let total = self
            .total_limit
            .map(format_idr)
            .unwrap_or_else(|| "not specified".to_string());
        let monthly = self
            .monthly_limit
            .map(format_idr)
            .unwrap_or_else(|| "not specified".to_string());

        format!(
            "Total budget: {total}\n\
             Monthly budget: {monthly}\n\
             Budget tier: {tier}\n\
             Budget strategy: {strategy}\n\
             Exchange rates: 1 USD = {usd}, 1 EUR = {eur}, 1 GBP = {gbp}, 1 AUD = {aud}. \
             Express every amount in IDR using these rates.",
            strategy = strategy_for(tier),
            usd = format_idr(rates.idr_per_usd),
            eur = format_idr(rates.idr_per_eur),
            gbp = format_idr(rates.idr_per_gbp),
            aud = format_idr(rates.idr_per_aud),
        )
    }
}

/// Formats an amount as Indonesian rupiah with `.` thousands separators, e.g. `Rp 15.000.000`.
/// Fractions are rounded to the nearest rupiah.
pub fn format_idr(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}Rp {grouped}")
}

/// Reads an optional amount sent either as a JSON number or as a string such as
/// `"500000000"` or `"50.000.000"`. Blank strings and `null` mean absent.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Amount::Number(n)) => Ok(Some(n)),
        Some(Amount::Text(raw)) => parse_amount(&raw).map_err(de::Error::custom),
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid amount '{0}'")]
pub struct InvalidAmount(pub String);

/// Parses a written amount. Underscores and spaces are ignored. `.` or `,` are
/// read as thousands separators only when they split the integer part into
/// groups of three digits (`50.000.000`, `1,500,000.50`); anything else must be
/// a plain decimal or exponent number (`15000000.00`, `1.5e7`). Blank means
/// absent.
pub fn parse_amount(raw: &str) -> Result<Option<f64>, InvalidAmount> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    let normalized = ungroup_thousands(&cleaned).unwrap_or(cleaned);
    match normalized.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(Some(amount)),
        _ => Err(InvalidAmount(raw.to_string())),
    }
}

/// Removes thousands separators from `text`, turning the other separator into
/// a decimal point. `None` when `text` is not digit-grouped.
fn ungroup_thousands(text: &str) -> Option<String> {
    let (sign, body) = if text.starts_with(|c| c == '+' || c == '-') {
        text.split_at(1)
    } else {
        ("", text)
    };

    let separator = body.chars().find(|c| !c.is_ascii_digit())?;
    let decimal = match separator {
        '.' => ',',
        ',' => '.',
        _ => return None,
    };
    let (integer, fraction) = match body.split_once(decimal) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (body, None),
    };

    let groups: Vec<&str> = integer.split(separator).collect();
    let grouped = groups.len() > 1
        && (1..=3).contains(&groups[0].len())
        && groups.iter().all(|g| is_digits(g))
        && groups[1..].iter().all(|g| g.len() == 3);
    if !grouped {
        return None;
    }

    let mut normalized = format!("{sign}{}", groups.concat());
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !is_digits(fraction) {
            return None;
        }
        normalized.push('.');
        normalized.push_str(fraction);
    }
    Some(normalized)
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(total: Option<f64>, monthly: Option<f64>) -> BudgetTier {
        BudgetThresholds::default().classify(total, monthly)
    }

    #[test]
    fn test_monthly_thresholds() {
        assert_eq!(classify(None, Some(0.0)), BudgetTier::Low);
        assert_eq!(classify(None, Some(14_999_999.0)), BudgetTier::Low);
        assert_eq!(classify(None, Some(15_000_000.0)), BudgetTier::Medium);
        assert_eq!(classify(None, Some(49_999_999.0)), BudgetTier::Medium);
        assert_eq!(classify(None, Some(50_000_000.0)), BudgetTier::High);
        assert_eq!(classify(None, Some(1e12)), BudgetTier::High);
    }

    #[test]
    fn test_total_thresholds() {
        assert_eq!(classify(Some(199_999_999.0), None), BudgetTier::Low);
        assert_eq!(classify(Some(200_000_000.0), None), BudgetTier::Medium);
        assert_eq!(classify(Some(799_999_999.0), None), BudgetTier::Medium);
        assert_eq!(classify(Some(800_000_000.0), None), BudgetTier::High);
    }

    #[test]
    fn test_monthly_takes_precedence_over_total() {
        // Total alone would be high; monthly alone is low.
        assert_eq!(
            classify(Some(900_000_000.0), Some(5_000_000.0)),
            BudgetTier::Low
        );
    }

    #[test]
    fn test_no_limits_defaults_to_medium() {
        assert_eq!(classify(None, None), BudgetTier::Medium);
    }

    #[test]
    fn test_negative_input_is_classified_not_rejected() {
        assert_eq!(classify(None, Some(-1.0)), BudgetTier::Low);
        assert_eq!(classify(Some(-500.0), None), BudgetTier::Low);
    }

    #[test]
    fn test_custom_thresholds_are_respected() {
        let thresholds = BudgetThresholds {
            monthly_medium_min: 10.0,
            monthly_high_min: 20.0,
            ..BudgetThresholds::default()
        };
        assert_eq!(thresholds.classify(None, Some(15.0)), BudgetTier::Medium);
        assert_eq!(thresholds.classify(None, Some(20.0)), BudgetTier::High);
    }

    #[test]
    fn test_strategies_are_distinct() {
        let low = strategy_for(BudgetTier::Low);
        let medium = strategy_for(BudgetTier::Medium);
        let high = strategy_for(BudgetTier::High);
        assert!(low.contains("fully funded"));
        assert_ne!(low, medium);
        assert_ne!(medium, high);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BudgetTier::High).unwrap(), "\"high\"");
        assert_eq!(BudgetTier::Low.to_string(), "low");
    }

    #[test]
    fn test_format_idr_groups_thousands() {
        assert_eq!(format_idr(0.0), "Rp 0");
        assert_eq!(format_idr(999.0), "Rp 999");
        assert_eq!(format_idr(1_000.0), "Rp 1.000");
        assert_eq!(format_idr(15_000_000.0), "Rp 15.000.000");
        assert_eq!(format_idr(1_234_567.6), "Rp 1.234.568");
        assert_eq!(format_idr(-250_000.0), "-Rp 250.000");
    }

    #[test]
    fn test_prompt_section_mentions_tier_and_limits() {
        let budget = Budget::new(Some(50_000_000.0), Some(5_000_000.0));
        let section =
            budget.prompt_section(&BudgetThresholds::default(), &ExchangeRates::default());
        assert!(section.contains("Total budget: Rp 50.000.000"));
        assert!(section.contains("Monthly budget: Rp 5.000.000"));
        assert!(section.contains("Budget tier: low"));
        assert!(section.contains("1 USD = Rp 16.000"));
    }

    #[test]
    fn test_prompt_section_without_limits() {
        let section = Budget::default()
            .prompt_section(&BudgetThresholds::default(), &ExchangeRates::default());
        assert!(section.contains("Total budget: not specified"));
        assert!(section.contains("Budget tier: medium"));
    }

    #[derive(Debug, Deserialize)]
    struct Limits {
        #[serde(default, deserialize_with = "deserialize_amount")]
        budget_limit: Option<f64>,
    }

    fn limits(body: &str) -> Option<f64> {
        serde_json::from_str::<Limits>(body).unwrap().budget_limit
    }

    #[test]
    fn test_amount_accepts_numbers_and_strings() {
        assert_eq!(limits(r#"{"budget_limit": 500000000}"#), Some(500_000_000.0));
        assert_eq!(limits(r#"{"budget_limit": "500000000"}"#), Some(500_000_000.0));
        assert_eq!(limits(r#"{"budget_limit": "50.000.000"}"#), Some(50_000_000.0));
        assert_eq!(limits(r#"{"budget_limit": ""}"#), None);
        assert_eq!(limits(r#"{"budget_limit": null}"#), None);
        assert_eq!(limits("{}"), None);
    }

    #[test]
    fn test_amount_rejects_words() {
        assert!(serde_json::from_str::<Limits>(r#"{"budget_limit": "plenty"}"#).is_err());
    }

    #[test]
    fn test_parse_amount_reads_decimal_point() {
        assert_eq!(parse_amount("15000000.00"), Ok(Some(15_000_000.0)));
        assert_eq!(parse_amount("1.5e7"), Ok(Some(15_000_000.0)));
        assert_eq!(parse_amount("2.5"), Ok(Some(2.5)));
        assert_eq!(
            classify(None, parse_amount("15000000.00").unwrap()),
            BudgetTier::Medium
        );
    }

    #[test]
    fn test_parse_amount_strips_thousands_groups() {
        assert_eq!(parse_amount("50.000.000"), Ok(Some(50_000_000.0)));
        assert_eq!(parse_amount(" 5,000,000 "), Ok(Some(5_000_000.0)));
        assert_eq!(parse_amount("1,500,000.50"), Ok(Some(1_500_000.5)));
        assert_eq!(parse_amount("1.500.000,50"), Ok(Some(1_500_000.5)));
        assert_eq!(parse_amount("-250.000"), Ok(Some(-250_000.0)));
        assert_eq!(parse_amount("10 000 000"), Ok(Some(10_000_000.0)));
        assert_eq!(parse_amount(""), Ok(None));
    }

    #[test]
    fn test_parse_amount_rejects_malformed_groups() {
        for bad in ["1,5", "50.00.000", "1.000.000.", "Rp 5", "inf", "NaN"] {
            assert_eq!(
                parse_amount(bad),
                Err(InvalidAmount(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }
}
