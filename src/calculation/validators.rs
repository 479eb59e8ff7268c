//! Input range clamping.
//!
//! These functions fail closed: text that does not parse as a number yields
//! the minimum bound, never an error. The form layer routes every numeric
//! edit through them before building a snapshot.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Upper bound for rates, in percent.
pub const MAX_RATE: i64 = 100;
/// Upper bound for a full-time-equivalent count.
pub const MAX_FTE: i64 = 100;
/// Upper bound for a monthly salary.
pub const MAX_SALARY: i64 = 50_000;
/// Upper bound for a generic currency amount.
pub const MAX_AMOUNT: i64 = 10_000_000;
/// Bounds for an investment duration in years.
pub const DURATION_RANGE: (i64, i64) = (1, 50);
/// Upper bound for a delay in days.
pub const MAX_DAYS: i64 = 365;
/// Bounds for a service unit count.
pub const UNIT_RANGE: (i64, i64) = (1, 1000);

/// Parses the leading number of `value`, the way a browser number field does.
///
/// Accepts an optional sign, digits, an optional fraction and an optional
/// exponent; trailing text is ignored. Returns `None` when there is no
/// leading number at all.
fn parse_leading_number(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if frac_end > frac_start || digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    let mantissa = &trimmed[..end];
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            if let Ok(d) = Decimal::from_scientific(&trimmed[..exp_end]) {
                return Some(d);
            }
        }
    }

    let mantissa = mantissa.strip_prefix('+').unwrap_or(mantissa);
    let mantissa = mantissa.strip_suffix('.').unwrap_or(mantissa);
    let normalized = match mantissa.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{}", rest),
        _ if mantissa.starts_with('.') => format!("0{}", mantissa),
        _ => mantissa.to_string(),
    };
    Decimal::from_str(&normalized).ok()
}

/// Clamps a decimal into `[min, max]`.
pub fn clamp_decimal(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    value.max(min).min(max)
}

/// Parses a real number and clamps it into `[min, max]`.
///
/// Returns `min` when `value` is not a number. Pass `Decimal::MAX` for an
/// unbounded maximum.
///
/// # Examples
///
/// ```
/// use budget_engine::calculation::clamp_number;
/// use rust_decimal::Decimal;
///
/// assert_eq!(clamp_number("12.5", Decimal::ZERO, Decimal::from(100)), Decimal::new(125, 1));
/// assert_eq!(clamp_number("250", Decimal::ZERO, Decimal::from(100)), Decimal::from(100));
/// assert_eq!(clamp_number("abc", Decimal::ONE, Decimal::from(100)), Decimal::ONE);
/// ```
pub fn clamp_number(value: &str, min: Decimal, max: Decimal) -> Decimal {
    match parse_leading_number(value) {
        Some(number) => clamp_decimal(number, min, max),
        None => min,
    }
}

/// Parses a number, truncates it to an integer and clamps it into `[min, max]`.
///
/// Returns `min` when `value` is not a number.
///
/// # Examples
///
/// ```
/// use budget_engine::calculation::clamp_integer;
///
/// assert_eq!(clamp_integer("12.9", 0, 100), 12);
/// assert_eq!(clamp_integer("-4", 0, 100), 0);
/// assert_eq!(clamp_integer("", 1, 50), 1);
/// ```
pub fn clamp_integer(value: &str, min: i64, max: i64) -> i64 {
    match parse_leading_number(value).and_then(|n| n.trunc().to_i64()) {
        Some(number) => number.clamp(min, max.max(min)),
        None => min,
    }
}

/// A rate in percent, within `[0, 100]`.
pub fn validate_rate(value: &str) -> Decimal {
    clamp_number(value, Decimal::ZERO, Decimal::from(MAX_RATE))
}

/// A full-time-equivalent count, within `[0, 100]`.
pub fn validate_fte(value: &str) -> Decimal {
    clamp_number(value, Decimal::ZERO, Decimal::from(MAX_FTE))
}

/// A whole monthly salary, within `[0, 50000]`.
pub fn validate_salary(value: &str) -> Decimal {
    Decimal::from(clamp_integer(value, 0, MAX_SALARY))
}

/// A whole currency amount, within `[0, 10000000]`.
pub fn validate_amount(value: &str) -> Decimal {
    Decimal::from(clamp_integer(value, 0, MAX_AMOUNT))
}

/// An investment duration in whole years, within `[1, 50]`.
pub fn validate_duration(value: &str) -> u32 {
    clamp_integer(value, DURATION_RANGE.0, DURATION_RANGE.1) as u32
}

/// A delay in whole days, within `[0, 365]`.
pub fn validate_days(value: &str) -> u32 {
    clamp_integer(value, 0, MAX_DAYS) as u32
}

/// A service unit count, within `[1, 1000]`.
pub fn validate_units(value: &str) -> u32 {
    clamp_integer(value, UNIT_RANGE.0, UNIT_RANGE.1) as u32
}
