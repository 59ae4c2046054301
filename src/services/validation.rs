use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").unwrap());
static CARD_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{13,19}$").unwrap());

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

pub fn is_valid_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

pub fn is_valid_name(s: &str) -> bool {
    s.trim().chars().count() >= 2
}

pub fn is_valid_date(s: &str) -> bool {
    parse_date(s).is_some()
}

pub fn is_valid_time(s: &str) -> bool {
    TIME_RE.is_match(s)
}

/// `YYYY-MM-DD` that names a real calendar day (`2025-02-30` is rejected).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    if !is_valid_time(s) {
        return None;
    }
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Spaces and hyphens are ignored; 13 to 19 digits that pass the Luhn check.
pub fn is_valid_credit_card(s: &str) -> bool {
    let cleaned = card_digits(s);
    if !CARD_DIGITS_RE.is_match(&cleaned) {
        return false;
    }
    luhn_checksum(&cleaned) % 10 == 0
}

/// The card number without spaces or hyphens.
pub fn card_digits(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

fn luhn_checksum(digits: &str) -> u32 {
    digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum()
}
