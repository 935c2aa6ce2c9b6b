//! Utility functions for RentDesk
//!
//! Date and amount formatting shared by the contract generator and notices,
//! plus file name validation for the document store.

use std::fmt::Write;
use std::sync::LazyLock;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};

use crate::error::{RentalError, Result};

/// Placeholder rendered for an absent date
pub const EMPTY_DATE: &str = "—";

/// Regex pattern for document file ids: `<uuid><ext>`, no separators
static FILE_ID_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9_.-]*$").expect("Invalid regex pattern")
});

/// Validate a stored document id
///
/// # Examples
///
/// ```
/// use rentdesk_common::is_valid_file_id;
///
/// assert!(is_valid_file_id("3f2c7a9e-1d2b-4c8a-9f00-0a1b2c3d4e5f.pdf"));
/// assert!(!is_valid_file_id("../data.json"));
/// assert!(!is_valid_file_id("nested/file.pdf"));
/// ```
pub fn is_valid_file_id(id: &str) -> bool {
    FILE_ID_PATTERN.is_match(id) && !id.contains("..")
}

/// Parse an ISO `YYYY-MM-DD` date, tolerating a trailing time component
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Whether `format` is a strftime pattern chrono can render
///
/// # Examples
///
/// ```
/// use rentdesk_common::is_valid_date_format;
///
/// assert!(is_valid_date_format("%d.%m.%Y"));
/// assert!(!is_valid_date_format("%Q"));
/// assert!(!is_valid_date_format("%d.%m.%"));
/// ```
pub fn is_valid_date_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Render `date` with a strftime pattern
pub fn format_date(date: NaiveDate, format: &str) -> Result<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(format))
        .map_err(|_| RentalError::TemplateError(format!("invalid date format '{}'", format)))?;
    Ok(rendered)
}

/// Format an optional ISO date for display
///
/// Absent dates render as [`EMPTY_DATE`]; unparseable input is returned as is.
pub fn format_display_date(raw: Option<&str>, format: &str) -> Result<String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(EMPTY_DATE.to_string()),
        Some(value) => match parse_iso_date(value) {
            Some(date) => format_date(date, format),
            None => Ok(value.to_string()),
        },
    }
}

/// Format a monetary or numeric value without a trailing `.0`
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_file_id() {
        assert!(is_valid_file_id("abc.docx"));
        assert!(is_valid_file_id("abc"));
        assert!(!is_valid_file_id(""));
        assert!(!is_valid_file_id(".hidden"));
        assert!(!is_valid_file_id("a..b"));
        assert!(!is_valid_file_id("dir\\file"));
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2026-03-01"),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(
            parse_iso_date("2026-03-01T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(parse_iso_date("01/03/2026"), None);
    }

    #[test]
    fn test_format_display_date() {
        let display = |raw, format| format_display_date(raw, format).unwrap();
        assert_eq!(display(Some("2026-03-01"), "%d.%m.%Y"), "01.03.2026");
        assert_eq!(display(Some("2026-12-25"), "%d/%m/%Y"), "25/12/2026");
        assert_eq!(display(None, "%d.%m.%Y"), EMPTY_DATE);
        assert_eq!(display(Some("  "), "%d.%m.%Y"), EMPTY_DATE);
        assert_eq!(display(Some("soon"), "%d.%m.%Y"), "soon");
    }

    #[test]
    fn test_invalid_date_format_is_an_error() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        for format in ["%Q", "%d.%m.%"] {
            assert!(!is_valid_date_format(format));
            assert!(matches!(
                format_date(date, format),
                Err(RentalError::TemplateError(_))
            ));
            assert!(format_display_date(Some("2026-03-01"), format).is_err());
        }
        // Nothing to render, so the pattern is never used
        assert_eq!(format_display_date(None, "%Q").unwrap(), EMPTY_DATE);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3500.0), "3500");
        assert_eq!(format_amount(3500.5), "3500.5");
        assert_eq!(format_amount(0.0), "0");
    }
}
