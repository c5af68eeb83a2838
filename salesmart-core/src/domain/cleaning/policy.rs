// salesmart-core/src/domain/cleaning/policy.rs

//! Value-level cleaning policies shared by every entity cleaner.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::table::Value;

/// Outcome of coercing one cell to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    Number(f64),
    /// The cell was null or blank.
    Missing,
    /// The cell held something that does not parse as a finite number.
    Invalid,
}

impl Coerced {
    /// Missing and invalid cells both resolve to `default`.
    pub fn or_default(self, default: f64) -> f64 {
        match self {
            Coerced::Number(n) => n,
            Coerced::Missing | Coerced::Invalid => default,
        }
    }
}

pub fn coerce_numeric(value: &Value) -> Coerced {
    match value {
        Value::Null => Coerced::Missing,
        Value::Int(i) => Coerced::Number(*i as f64),
        Value::Float(f) if f.is_finite() => Coerced::Number(*f),
        Value::Float(_) => Coerced::Invalid,
        Value::Text(s) if s.trim().is_empty() => Coerced::Missing,
        Value::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Coerced::Number(n),
            _ => Coerced::Invalid,
        },
        Value::Timestamp(_) => Coerced::Invalid,
    }
}

/// Coercion failure is treated as missing, and missing is default-filled.
pub fn coerce_or_default(value: &Value, default: f64) -> f64 {
    coerce_numeric(value).or_default(default)
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Lenient date parsing: anything unrecognised becomes `None`, never an error.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    DATE_FORMATS
                        .iter()
                        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
        }
        _ => None,
    }
}

/// Text rendering of a cell, `None` for null or blank.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        other => other.as_key(),
    }
}

/// First letter of every alphabetic run upper-cased, the rest lower-cased.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_invalid_numeric_is_treated_as_missing() {
        assert_eq!(coerce_numeric(&Value::from("abc")), Coerced::Invalid);
        assert_eq!(coerce_numeric(&Value::Null), Coerced::Missing);
        assert_eq!(
            coerce_or_default(&Value::from("abc"), 0.0),
            coerce_or_default(&Value::Null, 0.0)
        );
    }

    #[test]
    fn test_numeric_coercion_accepts_padded_text() {
        assert_eq!(coerce_numeric(&Value::from(" 42.5 ")), Coerced::Number(42.5));
        assert_eq!(coerce_numeric(&Value::Int(3)), Coerced::Number(3.0));
        assert_eq!(coerce_numeric(&Value::from("NaN")), Coerced::Invalid);
        assert_eq!(coerce_numeric(&Value::from("inf")), Coerced::Invalid);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let d = parse_timestamp(&Value::from("2024-01-05")).unwrap_or_default();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 5));

        let dt = parse_timestamp(&Value::from("2024-01-05 13:45:10")).unwrap_or_default();
        assert_eq!(dt.hour(), 13);

        assert!(parse_timestamp(&Value::from("01/31/2024")).is_some());
        assert!(parse_timestamp(&Value::from("not a date")).is_none());
        assert!(parse_timestamp(&Value::from("2024-02-30")).is_none());
        assert!(parse_timestamp(&Value::Int(20240105)).is_none());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ana"), "Ana");
        assert_eq!(title_case("new YORK"), "New York");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("usb-c cable"), "Usb-C Cable");
    }
}
