//! Date recognition, calendar validation and normalization.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;

use super::FieldExtractor;
use super::patterns::{DATE_PATTERNS, MONTH_ABBREVIATION_DOT, ORDINAL_SUFFIX, SEPT_ABBREVIATION};
use crate::models::{DateToken, TextObservation};

/// Canonical output format.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    /// Calendar formats tried in order. Two-digit years come first so that
    /// `10-01-24` is read as a day-first date rather than year 10.
    static ref DATE_FORMATS: Vec<String> = {
        let mut formats = Vec::new();
        for sep in ["/", "-", "."] {
            formats.push(format!("%d{sep}%m{sep}%y"));
            formats.push(format!("%d{sep}%m{sep}%Y"));
            formats.push(format!("%Y{sep}%m{sep}%d"));
        }
        formats.extend(
            [
                "%d %B %Y",
                "%d %B, %Y",
                "%B %d, %Y",
                "%B %d %Y",
                "%Y %B %d",
                "%d-%B-%Y",
                "%d/%B/%Y",
            ]
            .iter()
            .map(|f| f.to_string()),
        );
        formats
    };
}

/// Parse `text` as a single calendar date.
///
/// Accepted only if a format consumes the whole string; trailing or leading
/// characters reject it. Years outside 1000..=9999 are rejected.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let cleaned = ORDINAL_SUFFIX.replace_all(text.trim(), "$1");
    let cleaned = MONTH_ABBREVIATION_DOT.replace_all(&cleaned, "$1");
    let cleaned = SEPT_ABBREVIATION.replace_all(&cleaned, "Sep");

    DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
        .find(|date| (1000..=9999).contains(&date.year()))
}

/// Check whether the whole string is a real calendar date.
pub fn is_likely_date(text: &str) -> bool {
    parse_date(text).is_some()
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Validate and render `text` in canonical form.
pub fn normalize_date(text: &str) -> Option<String> {
    parse_date(text).map(format_canonical)
}

/// Date recognizer: pattern layer plus validation layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRecognizer;

impl DateRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DateRecognizer {
    type Output = DateToken;

    /// First validated match, trying patterns in priority order.
    fn extract(&self, text: &str) -> Option<DateToken> {
        DATE_PATTERNS.iter().find_map(|pattern| {
            pattern.find_iter(text).find_map(|m| {
                parse_date(m.as_str()).map(|parsed| DateToken {
                    raw: m.as_str().to_string(),
                    parsed,
                })
            })
        })
    }

    /// Every validated match of every pattern. A substring matched by
    /// several patterns is reported once.
    fn extract_all(&self, text: &str) -> Vec<DateToken> {
        let mut results: Vec<DateToken> = Vec::new();

        for pattern in DATE_PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                if results.iter().any(|r| r.raw == m.as_str()) {
                    continue;
                }
                if let Some(parsed) = parse_date(m.as_str()) {
                    results.push(DateToken {
                        raw: m.as_str().to_string(),
                        parsed,
                    });
                }
            }
        }

        results
    }
}

/// Every date in the document, deduplicated by calendar value and sorted
/// ascending, rendered as `YYYY-MM-DD`.
pub fn collect_all_dates(observations: &[TextObservation]) -> Vec<String> {
    let recognizer = DateRecognizer::new();

    observations
        .iter()
        .flat_map(|o| recognizer.extract_all(&o.text))
        .map(|token| token.parsed)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(format_canonical)
        .collect()
}

/// First valid date per observation, in scan order, without deduplication.
pub fn collect_first_dates(observations: &[TextObservation]) -> Vec<DateToken> {
    let recognizer = DateRecognizer::new();

    observations
        .iter()
        .filter_map(|o| recognizer.extract(&o.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NormalizedRect;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obs(text: &str) -> TextObservation {
        TextObservation::new(text, NormalizedRect::new(0.1, 0.1, 0.2, 0.02))
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_date("05/03/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("15.01.2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-10"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date("2024/12/31"), Some(ymd(2024, 12, 31)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("15.01.24"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("10-01-24"), Some(ymd(2024, 1, 10)));
    }

    #[test]
    fn test_parse_text_month() {
        assert_eq!(parse_date("March 5, 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("5 March 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("21st June 2023"), Some(ymd(2023, 6, 21)));
        assert_eq!(parse_date("June 2nd, 2023"), Some(ymd(2023, 6, 2)));
        assert_eq!(parse_date("05-Mar-2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("2024 March 05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("Mar. 5, 2024"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_sept_and_day_month_comma() {
        assert_eq!(normalize_date("Sept. 5, 2024"), Some("2024-09-05".to_string()));
        assert_eq!(normalize_date("5 Sept 2024"), Some("2024-09-05".to_string()));
        assert_eq!(normalize_date("September 5, 2024"), Some("2024-09-05".to_string()));
        assert_eq!(normalize_date("05 March, 2024"), Some("2024-03-05".to_string()));

        let token = DateRecognizer::new().extract("Paid on 05 March, 2024").unwrap();
        assert_eq!(token.raw, "05 March, 2024");
        assert_eq!(token.canonical(), "2024-03-05");
    }

    #[test]
    fn test_rejects_partial_and_invalid() {
        assert_eq!(parse_date("2024"), None);
        assert_eq!(parse_date("03/2024"), None);
        assert_eq!(parse_date("03-10"), None);
        assert_eq!(parse_date("March 2024"), None);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("05/03/2024 total"), None);
        assert_eq!(parse_date("Total 5 items 2024"), None);
    }

    #[test]
    fn test_canonical_round_trip() {
        for raw in ["05/03/2024", "March 5, 2024", "31.12.99", "2024-02-29"] {
            let canonical = normalize_date(raw).unwrap();
            assert_eq!(normalize_date(&canonical), Some(canonical.clone()));
        }
    }

    #[test]
    fn test_extract_first_valid_by_priority() {
        let recognizer = DateRecognizer::new();

        let token = recognizer.extract("Invoice Date: 2024-01-10").unwrap();
        assert_eq!(token.raw, "2024-01-10");
        assert_eq!(token.canonical(), "2024-01-10");

        let token = recognizer.extract("Order 2024 shipped 5 March 2024").unwrap();
        assert_eq!(token.raw, "5 March 2024");

        assert!(recognizer.extract("Total 1234").is_none());
    }

    #[test]
    fn test_extract_all_collapses_shared_substrings() {
        let recognizer = DateRecognizer::new();

        let tokens = recognizer.extract_all("From 10 March 2024 to 12/04/2024");
        let raws: Vec<&str> = tokens.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, vec!["12/04/2024", "10 March 2024"]);
    }

    #[test]
    fn test_collect_all_dates_dedups_by_calendar_value() {
        let observations = vec![obs("Due 10/04/2024"), obs("March 5, 2024"), obs("05/03/2024")];

        assert_eq!(
            collect_all_dates(&observations),
            vec!["2024-03-05".to_string(), "2024-04-10".to_string()]
        );
    }

    #[test]
    fn test_collect_first_dates_keeps_scan_order() {
        let observations = vec![
            obs("Due 10/04/2024 or 11/04/2024"),
            obs("no date here"),
            obs("March 5, 2024"),
            obs("05/03/2024"),
        ];

        let raws: Vec<String> = collect_first_dates(&observations)
            .into_iter()
            .map(|t| t.raw)
            .collect();
        assert_eq!(raws, vec!["10/04/2024", "March 5, 2024", "05/03/2024"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect_all_dates(&[]).is_empty());
        assert!(collect_first_dates(&[]).is_empty());
    }
}
