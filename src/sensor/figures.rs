//! Derivation of the sensor values from a snapshot.

use crate::config::MonthAggregation;
use crate::error::{CollectorError, GrdfError, ParseError};
use crate::grdf::{
    first_day_of_previous_month, local_midnight, month_to_date_total, round_to, sum_for_month,
    ConsumptionSnapshot, Reading,
};
use crate::sensor::types::SensorKind;
use chrono::{DateTime, Local, NaiveDate};

/// Largest accepted gap between the reported month total and the sum of days.
pub const MONTH_TOLERANCE_KWH: f64 = 0.5;

const PRICE_DECIMALS: i32 = 4;

/// All sensor values of one cycle, computed before any sensor is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Figures {
    /// Local midnight of the last daily reading
    pub timestamp: DateTime<Local>,
    pub last_kwh: f64,
    pub last_m3: f64,
    pub month_kwh: f64,
    pub month_m3: f64,
    pub last_month_kwh: f64,
    pub last_month_m3: f64,
    cost: f64,
}

fn parse_failure(err: ParseError) -> CollectorError {
    CollectorError::Source(GrdfError::Parse(err))
}

fn last(readings: &[Reading], series: &str) -> Result<Reading, CollectorError> {
    readings
        .last()
        .cloned()
        .ok_or_else(|| CollectorError::ValidationFailed(format!("no readings in {} series", series)))
}

/// Current and previous month values as the portal reports them.
fn reported_months(readings: &[Reading], series: &str) -> Result<(f64, f64), CollectorError> {
    match readings {
        [.., previous, current] => Ok((current.value, previous.value)),
        _ => Err(CollectorError::ValidationFailed(format!(
            "{} series needs two months, got {} readings",
            series,
            readings.len()
        ))),
    }
}

/// Current and previous month values summed from daily readings.
fn summed_months(readings: &[Reading], today: NaiveDate) -> Result<(f64, f64), CollectorError> {
    let current = sum_for_month(readings, today).map_err(parse_failure)?;
    let previous =
        sum_for_month(readings, first_day_of_previous_month(today)).map_err(parse_failure)?;
    Ok((current, previous))
}

impl Figures {
    pub fn derive(
        snapshot: &ConsumptionSnapshot,
        today: NaiveDate,
        cost: f64,
        aggregation: MonthAggregation,
    ) -> Result<Self, CollectorError> {
        let last_kwh = last(&snapshot.daily_kwh, "daily kWh")?;
        let last_m3 = last(&snapshot.daily_m3, "daily m³")?;

        let day = last_kwh.date().map_err(parse_failure)?;
        let timestamp = local_midnight(day).ok_or_else(|| {
            CollectorError::ValidationFailed(format!("no local midnight on {}", day))
        })?;

        let ((month_kwh, last_month_kwh), (month_m3, last_month_m3)) = match aggregation {
            MonthAggregation::Reported => (
                reported_months(&snapshot.monthly_kwh, "monthly kWh")?,
                reported_months(&snapshot.monthly_m3, "monthly m³")?,
            ),
            MonthAggregation::SumOfDays => (
                summed_months(&snapshot.daily_kwh, today)?,
                summed_months(&snapshot.daily_m3, today)?,
            ),
        };

        Ok(Self {
            timestamp,
            last_kwh: last_kwh.value,
            last_m3: last_m3.value,
            month_kwh,
            month_m3,
            last_month_kwh,
            last_month_m3,
            cost,
        })
    }

    fn price(&self, kwh: f64) -> f64 {
        round_to(kwh * self.cost, PRICE_DECIMALS)
    }

    /// Value published for `kind`.
    pub fn value(&self, kind: SensorKind) -> f64 {
        match kind {
            SensorKind::LastEnergy => self.last_kwh,
            SensorKind::LastEnergyM3 => self.last_m3,
            SensorKind::LastEnergyPrice => self.price(self.last_kwh),
            SensorKind::MonthEnergy => self.month_kwh,
            SensorKind::MonthEnergyM3 => self.month_m3,
            SensorKind::MonthEnergyPrice => self.price(self.month_kwh),
            SensorKind::LastMonthEnergy => self.last_month_kwh,
            SensorKind::LastMonthEnergyM3 => self.last_month_m3,
            SensorKind::LastMonthEnergyPrice => self.price(self.last_month_kwh),
        }
    }
}

/// Gap between the reported current month and the month-to-date sum of days.
///
/// Returns `None` when one of the two series is empty.
pub fn month_discrepancy(
    snapshot: &ConsumptionSnapshot,
    today: NaiveDate,
) -> Result<Option<f64>, CollectorError> {
    if snapshot.daily_kwh.is_empty() {
        return Ok(None);
    }
    let reported = match snapshot.month_index() {
        Ok(index) => index.kwh,
        Err(ParseError::EmptySeries { .. }) => return Ok(None),
        Err(e) => return Err(parse_failure(e)),
    };
    let summed = month_to_date_total(&snapshot.daily_kwh, today).map_err(parse_failure)?;
    Ok(Some((reported - summed).abs()))
}
