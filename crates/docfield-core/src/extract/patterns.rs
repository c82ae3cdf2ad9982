//! Precompiled regex patterns shared by the extractors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Date shapes in priority order. Partial shapes (month-year, day-month,
    /// bare year) still match structurally but never pass validation.
    pub static ref DATE_PATTERNS: Vec<Regex> = [
        // Numeric dates
        r"\b\d{1,2}[./-]\d{1,2}[./-]\d{4}\b",      // DD-MM-YYYY, DD/MM/YYYY, DD.MM.YYYY
        r"\b\d{1,2}[./-]\d{1,2}[./-]\d{2}\b",      // DD-MM-YY, DD/MM/YY, DD.MM.YY
        r"\b\d{4}[./-]\d{1,2}[./-]\d{1,2}\b",      // YYYY-MM-DD, YYYY/MM/DD, YYYY.MM.DD
        r"\b\d{1,2}[./-]\d{4}\b",                  // MM-YYYY
        r"\b\d{1,2}[./-]\d{1,2}\b",                // DD-MM
        r"\b\d{4}\b",                              // YYYY

        // Month names
        r"(?i)\b\d{1,2}(?:st|nd|rd|th)?\s+[a-z]+\.?,?\s+\d{4}\b",   // 5th March 2024, 05 Mar, 2024
        r"(?i)\b[a-z]+\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}\b",   // March 5, 2024
        r"(?i)\b\d{4}\s+[a-z]+\.?\s+\d{1,2}\b",                      // 2024 March 05
        r"(?i)\b[a-z]+\s+\d{4}\b",                                   // March 2024
        r"(?i)\b\d{1,2}[-/][a-z]{3}[-/]\d{4}\b",                     // 05-Mar-2024, 05/Mar/2024
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    /// Day-of-month ordinal suffix, stripped before calendar validation.
    pub static ref ORDINAL_SUFFIX: Regex = Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap();

    /// Abbreviation dot after a month name ("Mar. 5").
    pub static ref MONTH_ABBREVIATION_DOT: Regex = Regex::new(r"(?i)\b([a-z]{3,4})\.").unwrap();

    /// Four-letter September abbreviation, which chrono does not accept.
    pub static ref SEPT_ABBREVIATION: Regex = Regex::new(r"(?i)\bsept\b").unwrap();

    /// Purely alphabetic token.
    pub static ref ALPHABETIC: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();

    /// Numeric date shapes that disqualify an identifier candidate.
    pub static ref NUMERIC_DATE_SHAPES: Vec<Regex> = [
        r"^\d{2}[-/]\d{2}[-/]\d{2}$",  // DD-MM-YY or DD/MM/YY
        r"^\d{4}[-/]\d{2}[-/]\d{2}$",  // YYYY-MM-DD or YYYY/MM/DD
        r"^\d{2}[-/]\d{2}[-/]\d{4}$",  // DD-MM-YYYY or DD/MM/YYYY
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}
