//! Locale-aware price text parsing and formatting.
//!
//! Storefront prices arrive as display text such as `"$1.234,50"` (es-AR,
//! `.` thousands / `,` decimal) or, on some templates, `"$987.60"`. The
//! parser keeps only digits and separators and then decides which separator
//! is the decimal point:
//!
//! - a `,` is present: the last `,` is the decimal point, every `.` and any
//!   earlier `,` is a thousands separator;
//! - only `.` is present: the last `.` is the decimal point when exactly two
//!   digits follow it, otherwise every `.` is a thousands separator;
//! - no separator: the digits are an integer amount.
//!
//! Trailing separators are dropped first, so sentence punctuation in
//! accessibility text (`"Current price is: $987,60."`) does not count.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Parses raw price text into an amount, or `None` when no number is present.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let cleaned = cleaned.trim_end_matches(['.', ',']);

    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let normalized = if let Some((int_part, frac_part)) = cleaned.rsplit_once(',') {
        join_amount(int_part, frac_part)
    } else if let Some((int_part, frac_part)) = cleaned
        .rsplit_once('.')
        .filter(|(_, frac)| frac.len() == 2)
    {
        join_amount(int_part, frac_part)
    } else {
        digits_only(cleaned)
    };

    Decimal::from_str(&normalized).ok()
}

/// Formats an amount the way the storefront displays it: `$` prefix, `.`
/// thousands groups, `,` decimal point, always two decimals.
///
/// [`parse_price`] returns the same amount for any output of this function.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped},{frac_part}")
}

fn join_amount(int_part: &str, frac_part: &str) -> String {
    let int_digits = digits_only(int_part);
    let frac_digits = digits_only(frac_part);
    let int_digits = if int_digits.is_empty() {
        "0".to_string()
    } else {
        int_digits
    };
    if frac_digits.is_empty() {
        int_digits
    } else {
        format!("{int_digits}.{frac_digits}")
    }
}

fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
#[path = "price_test.rs"]
mod tests;
