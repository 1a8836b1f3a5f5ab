use crate::error::ParseError;
use crate::grdf::helper::{parse_portal_date, same_month};
use chrono::NaiveDate;

/// Sentinel the portal emits for days it has no measurement for.
const NULL_VALUE: &str = "null";

/// Label the portal prepends to every tooltip date.
const TIME_PREFIX: &str = "Le ";

/// One consumption value, as reported by the portal.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// `dd/mm/yyyy`, possibly followed by an hour for hourly series
    pub time: String,
    /// kWh or m³ depending on the requested volume unit
    pub value: f64,
}

impl Reading {
    pub fn new(time: impl Into<String>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
        }
    }

    /// Calendar day of this reading.
    pub fn date(&self) -> Result<NaiveDate, ParseError> {
        parse_portal_date(&self.time)
    }
}

fn split_series(series: &str) -> Vec<&str> {
    if series.trim().is_empty() {
        return Vec::new();
    }
    series.split(',').collect()
}

/// Zips the raw value and time series into readings.
///
/// The times drive the pairing: each time takes the value at the same
/// position, `null` values are skipped and surplus values are ignored.
///
/// # Errors
/// * [`ParseError::SeriesLengthMismatch`] - a time has no value
/// * [`ParseError::NumberParse`] - a value is neither `null` nor a number
pub fn pair_series(values: &str, times: &str) -> Result<Vec<Reading>, ParseError> {
    let values = split_series(values);
    let times = split_series(times);

    if values.len() < times.len() {
        return Err(ParseError::SeriesLengthMismatch {
            times: times.len(),
            values: values.len(),
        });
    }

    times
        .iter()
        .zip(values.iter())
        .filter(|(_, value)| value.trim() != NULL_VALUE)
        .map(|(time, value)| {
            let value = value.trim();
            let value = value
                .parse::<f64>()
                .map_err(|e| ParseError::number_parse(value, e))?;
            let time = time.trim();
            let time = time.strip_prefix(TIME_PREFIX).unwrap_or(time);
            Ok(Reading::new(time, value))
        })
        .collect()
}

/// Sum of the readings dated in the same calendar month as `month`.
pub fn sum_for_month(readings: &[Reading], month: NaiveDate) -> Result<f64, ParseError> {
    readings.iter().try_fold(0.0, |total, reading| {
        Ok(if same_month(reading.date()?, month) {
            total + reading.value
        } else {
            total
        })
    })
}

/// Sum of the readings from the first of `today`'s month up to `today`.
pub fn month_to_date_total(readings: &[Reading], today: NaiveDate) -> Result<f64, ParseError> {
    readings.iter().try_fold(0.0, |total, reading| {
        let date = reading.date()?;
        Ok(if same_month(date, today) && date <= today {
            total + reading.value
        } else {
            total
        })
    })
}
