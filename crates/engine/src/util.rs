//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use chrono::{Datelike, NaiveDate};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{Currency, EngineError, Money, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Parse a currency code stored in the DB into a strongly typed `Currency`.
pub(crate) fn model_currency(value: &str) -> ResultEngine<Currency> {
    Currency::try_from(value)
}

/// Trim and reject empty names.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(collapsed)
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Lookup key for a member name: NFKC, lowercase, single spaces.
///
/// Two members of the same mess cannot share a key, so "Rahim" and
/// " rahim " are the same person.
pub(crate) fn member_name_key(name: &str) -> String {
    let composed: String = name.nfkc().collect();
    composed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Validate a `YYYY-MM` month code and return its first day.
pub(crate) fn parse_month_code(code: &str) -> ResultEngine<NaiveDate> {
    let code = code.trim();
    let invalid = || EngineError::InvalidDate(format!("invalid month code '{code}', expected YYYY-MM"));
    if code.len() != 7 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(&format!("{code}-01"), "%Y-%m-%d").map_err(|_| invalid())
}

/// Ensure `date` falls inside the month identified by `code`.
pub(crate) fn ensure_date_in_month(date: NaiveDate, code: &str) -> ResultEngine<()> {
    let first = parse_month_code(code)?;
    if date.year() != first.year() || date.month() != first.month() {
        return Err(EngineError::InvalidDate(format!(
            "{date} is outside month {code}"
        )));
    }
    Ok(())
}

/// Reject zero, negative and oversized amounts.
pub(crate) fn ensure_positive_amount(amount: Money, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} amount must be > 0"
        )));
    }
    if amount > Money::MAX_EXACT {
        return Err(EngineError::InvalidAmount(format!(
            "{label} amount must be <= {}",
            Money::MAX_EXACT
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_key_ignores_case_and_spacing() {
        assert_eq!(member_name_key("  Rahim   Uddin "), "rahim uddin");
        assert_eq!(member_name_key("ＲＡＨＩＭ"), "rahim");
    }

    #[test]
    fn month_code_must_be_year_and_month() {
        assert_eq!(
            parse_month_code("2025-07").unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
        assert!(parse_month_code("2025-13").is_err());
        assert!(parse_month_code("2025-7").is_err());
        assert!(parse_month_code("July").is_err());
    }

    #[test]
    fn dates_outside_the_month_are_rejected() {
        let inside = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        let outside = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        assert!(ensure_date_in_month(inside, "2025-07").is_ok());
        assert!(ensure_date_in_month(outside, "2025-07").is_err());
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(normalize_required_name("  Mess  Bari ", "mess").unwrap(), "Mess Bari");
        assert!(normalize_required_name("   ", "mess").is_err());
    }

    #[test]
    fn amounts_must_be_positive_and_bounded() {
        assert!(ensure_positive_amount(Money::new(1), "bazar").is_ok());
        assert!(ensure_positive_amount(Money::MAX_EXACT, "bazar").is_ok());
        assert!(ensure_positive_amount(Money::ZERO, "bazar").is_err());
        assert!(ensure_positive_amount(Money::new(Money::MAX_EXACT.minor() + 1), "bazar").is_err());
    }
}
