//! Helper functions for parsing GrDF responses and handling portal dates.
//!
//! This module provides utility functions for:
//! - Creating CSS selectors with typed errors
//! - Formatting and parsing the portal's `dd/mm/yyyy` dates
//! - Calendar arithmetic used to build request windows
//! - Rounding derived prices

use crate::error::ParseError;
use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveTime, TimeZone};
use scraper::Selector;

/// Date format used by the portal, both in forms and in tooltips.
pub const PORTAL_DATE_FORMAT: &str = "%d/%m/%Y";

/// Creates a CSS selector from a string.
///
/// This is a wrapper around scraper's Selector::parse that converts
/// parsing errors into [`ParseError`] for consistent error handling.
///
/// # Examples
///
/// Valid selectors:
/// - `"#id"` - ID selector
/// - `"div[id='a:b'] > form"` - attribute selector, needed for JSF ids with colons
pub fn html_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::invalid_selector(selector, e))
}

/// Formats a date the way the portal's date pickers submit it.
///
/// # Example
///
/// ```no_run
/// let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
/// assert_eq!(format_portal_date(date), "05/01/2023");
/// ```
pub fn format_portal_date(date: NaiveDate) -> String {
    date.format(PORTAL_DATE_FORMAT).to_string()
}

/// Parses the leading `dd/mm/yyyy` of a portal timestamp.
///
/// Hourly series append a time after the date; only the date part is read.
pub fn parse_portal_date(text: &str) -> Result<NaiveDate, ParseError> {
    let trimmed = text.trim();
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, PORTAL_DATE_FORMAT)
        .map_err(|e| ParseError::datetime_parse(text, e))
}

/// Returns the first day of the month preceding `date`.
///
/// # Example
///
/// ```no_run
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(first_day_of_previous_month(date), NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
/// ```
pub fn first_day_of_previous_month(date: NaiveDate) -> NaiveDate {
    let first_of_month = date.with_day(1).unwrap_or(date);
    first_of_month
        .checked_sub_months(Months::new(1))
        .unwrap_or(first_of_month)
}

/// Whether two dates fall in the same calendar month.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Interprets a portal date as local midnight.
///
/// Returns `None` when midnight does not exist locally (DST gaps).
pub fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
}

/// Rounds a price to the given number of decimals.
///
/// # Examples
///
/// ```
/// assert_eq!(round_to(12.345678, 4), 12.3457);
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
