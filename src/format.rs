// Number and date formatting for report text (en-US conventions)
//
// Amounts are f64 on the model; rounding goes through rust_decimal on the
// exact binary value so half-way cases round away from zero.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Fraction digits kept by `format_amount`
const AMOUNT_MAX_FRACTION_DIGITS: u32 = 3;

fn non_finite(value: f64, infinity: &str) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        infinity.to_string()
    } else {
        format!("-{}", infinity)
    }
}

/// Fixed-point rendering with exactly `digits` decimals.
///
/// Non-finite values render as `NaN`, `Infinity` or `-Infinity`.
pub fn to_fixed(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return non_finite(value, "Infinity");
    }

    // Sign comes from the input: -0.001 keeps its "-", -0.0 does not
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    let digits_text = match Decimal::from_f64_retain(magnitude) {
        Some(exact) => {
            let rounded =
                exact.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", digits as usize, rounded)
        }
        None => format!("{:.*}", digits as usize, magnitude),
    };
    format!("{}{}", sign, digits_text)
}

/// Percentage with one decimal ("37.5"), no `%` sign.
pub fn format_percent(value: f64) -> String {
    to_fixed(value, 1)
}

/// Grouped amount with up to three fraction digits: `1234.5` -> `1,234.5`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value, "∞");
    }

    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value.to_string();
    };

    let rounded = exact
        .round_dp_with_strategy(AMOUNT_MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Currency symbol followed by the grouped amount: `$1,234.5`
pub fn format_money(symbol: &str, value: f64) -> String {
    format!("{}{}", symbol, format_amount(value))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "10/19/2026"
pub fn numeric_date(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// "Oct 5, 2026"
pub fn short_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// "2026-10-19", used in artifact names
pub fn iso_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_fixed_pads_and_rounds() {
        assert_eq!(to_fixed(25.0, 1), "25.0");
        assert_eq!(to_fixed(33.333333, 1), "33.3");
        assert_eq!(to_fixed(66.666666, 1), "66.7");
        assert_eq!(to_fixed(900.0, 2), "900.00");
        assert_eq!(to_fixed(1.0 / 3.0, 2), "0.33");
    }

    #[test]
    fn test_to_fixed_midpoint_rounds_away_from_zero() {
        // 0.25 and 2.5 are exact in binary
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        // 1.005 is really 1.00499999...
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn test_to_fixed_sign_of_tiny_values() {
        assert_eq!(to_fixed(-0.001, 2), "-0.00");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
        assert_eq!(to_fixed(0.001, 2), "0.00");
        assert_eq!(to_fixed(-1.25, 1), "-1.3");
    }

    #[test]
    fn test_to_fixed_non_finite() {
        assert_eq!(to_fixed(f64::NAN, 1), "NaN");
        assert_eq!(to_fixed(f64::INFINITY, 1), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 2), "-Infinity");
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1000.0), "1,000");
        assert_eq!(format_amount(1234567.0), "1,234,567");
        assert_eq!(format_amount(1234.5), "1,234.5");
        assert_eq!(format_amount(-1234.5), "-1,234.5");
    }

    #[test]
    fn test_format_amount_fraction_digits() {
        assert_eq!(format_amount(10.25), "10.25");
        assert_eq!(format_amount(0.1 + 0.2), "0.3");
        assert_eq!(format_amount(2.0 / 3.0), "0.667");
        assert_eq!(format_amount(1999.9999), "2,000");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("$", 2500.0), "$2,500");
        assert_eq!(format_money("€", 12.5), "€12.5");
    }

    #[test]
    fn test_dates() {
        let at = Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(numeric_date(&at), "3/5/2026");
        assert_eq!(short_date(&at), "Mar 5, 2026");
        assert_eq!(iso_date(&at), "2026-03-05");
    }
}
