// Utility helpers for parsing and console formatting.
//
// This module centralizes the "dirty" string/number/date handling so the
// normalizer and the reports can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, units).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Strips thousands separators like `","` before parsing.
/// - Reads the longest leading number, so `"5.2e3"` is `5200` and
///   `"31.5 km/h"` is `31.5`.
/// - Returns `None` when no digits lead the value, and for `NaN` and
///   infinities.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    let end = numeric_prefix_len(&s)?;
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

// Byte length of `[+-]digits[.digits][(e|E)[+-]digits]` at the start of `s`,
// or `None` when the mantissa has no digits.
fn numeric_prefix_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut end = int_end;
    let mut has_digits = int_end > i;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || has_digits {
            has_digits |= frac_end > end + 1;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }
    Some(end)
}

pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>()
        .ok()
        .or_else(|| parse_f64_safe(Some(s)).map(|v| v.trunc() as i64))
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Dates are `YYYY-MM-DD`; ISO timestamps are cut down to their date part.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// Convert an `HH:MM:SS` heart-rate zone duration into minutes.
///
/// Anything that is not exactly three `:`-separated parts yields `0`; each
/// part that fails to parse counts as `0`.
pub fn hms_to_minutes(s: &str) -> f64 {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() != 3 {
        return 0.0;
    }
    let part = |p: &str| p.trim().parse::<u32>().unwrap_or(0) as f64;
    part(parts[0]) * 60.0 + part(parts[1]) + part(parts[2]) / 60.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places plus locale-aware thousands separators
    // (e.g. `1,234,567.89`).
    if !n.is_finite() {
        return "0".to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g. `4,520 records loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_with_separators_and_whitespace() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("-0.25")), Some(-0.25));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parses_exponents_and_leading_numbers() {
        assert_eq!(parse_f64_safe(Some("5.2e3")), Some(5200.0));
        assert_eq!(parse_f64_safe(Some("1E-2")), Some(0.01));
        assert_eq!(parse_f64_safe(Some("31.5 km/h")), Some(31.5));
        assert_eq!(parse_f64_safe(Some("12e")), Some(12.0));
        assert_eq!(parse_f64_safe(Some(".5")), Some(0.5));
        assert_eq!(parse_f64_safe(Some("7.")), Some(7.0));
        assert_eq!(parse_f64_safe(Some("-.")), None);
        assert_eq!(parse_f64_safe(Some("km 31")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
    }

    #[test]
    fn integer_parse_accepts_decimal_strings() {
        assert_eq!(parse_i64_safe(Some("7")), Some(7));
        assert_eq!(parse_i64_safe(Some("7.9")), Some(7));
        assert_eq!(parse_i64_safe(Some("seven")), None);
        assert_eq!(parse_i64_safe(Some("27 yrs")), Some(27));
    }

    #[test]
    fn dates_accept_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2023, 4, 1);
        assert_eq!(parse_date_safe(Some("2023-04-01")), expected);
        assert_eq!(parse_date_safe(Some("2023-04-01T10:00:00Z")), expected);
        assert_eq!(parse_date_safe(Some("01/04/2023")), None);
    }

    #[test]
    fn hms_converts_to_minutes() {
        assert_eq!(hms_to_minutes("01:30:30"), 90.5);
        assert_eq!(hms_to_minutes("00:00:00"), 0.0);
        assert_eq!(hms_to_minutes("5:00"), 0.0);
        assert_eq!(hms_to_minutes("00:xx:30"), 0.5);
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 1), "-42.0");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_int(9855), "9,855");
    }
}
