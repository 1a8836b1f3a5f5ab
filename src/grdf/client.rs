use crate::config::GrdfConfig;
use crate::error::{GrdfError, ParseError};
use crate::grdf::auth::login;
use crate::grdf::fetch::{fetch_readings, ConsumptionRequest, Granularity, VolumeUnit};
use crate::grdf::helper::first_day_of_previous_month;
use crate::grdf::readings::Reading;
use crate::grdf::session::Session;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::sensor::ConsumptionSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

/// Everything one sensor cycle needs, fetched in a single session.
///
/// All four series cover the first day of the previous month up to today.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsumptionSnapshot {
    pub daily_kwh: Vec<Reading>,
    pub daily_m3: Vec<Reading>,
    pub monthly_kwh: Vec<Reading>,
    pub monthly_m3: Vec<Reading>,
}

impl ConsumptionSnapshot {
    /// Month-to-date totals as reported by the portal, in both units.
    pub fn month_index(&self) -> Result<MonthIndex, ParseError> {
        Ok(MonthIndex {
            m3: last_value(&self.monthly_m3, "monthly m³")?,
            kwh: last_value(&self.monthly_kwh, "monthly kWh")?,
        })
    }
}

/// Cumulative consumption of the current month, as reported by the portal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthIndex {
    pub m3: f64,
    pub kwh: f64,
}

/// Scrapes the GrDF portal.
///
/// Every snapshot is fetched in its own session, and the login plus the four
/// fetches are replayed as a whole according to the retry policy.
pub struct Client {
    config: GrdfConfig,
    retry: RetryPolicy,
}

impl Client {
    pub fn new(config: GrdfConfig, retry: RetryPolicy) -> Self {
        Self { config, retry }
    }

    async fn open_session(&self) -> Result<Session, GrdfError> {
        let mut session = Session::new(
            &self.config.url,
            Duration::from_secs(self.config.timeout_sec),
        )?;
        login(&mut session, &self.config.username, &self.config.password).await?;
        Ok(session)
    }

    /// Fetches the daily and monthly series, in kWh and m³, since the first day
    /// of the previous month.
    pub async fn fetch_snapshot(&self, today: NaiveDate) -> Result<ConsumptionSnapshot, GrdfError> {
        let start = first_day_of_previous_month(today);
        let request = |granularity, unit| {
            ConsumptionRequest::new(granularity, unit).between(start, today)
        };

        retry_with_backoff(&self.retry, "fetch_snapshot", || async move {
            let mut session = self.open_session().await?;
            Ok(ConsumptionSnapshot {
                daily_kwh: fetch_readings(&mut session, &request(Granularity::Day, VolumeUnit::Kwh))
                    .await?,
                daily_m3: fetch_readings(
                    &mut session,
                    &request(Granularity::Day, VolumeUnit::CubicMeter),
                )
                .await?,
                monthly_kwh: fetch_readings(
                    &mut session,
                    &request(Granularity::Month, VolumeUnit::Kwh),
                )
                .await?,
                monthly_m3: fetch_readings(
                    &mut session,
                    &request(Granularity::Month, VolumeUnit::CubicMeter),
                )
                .await?,
            })
        })
        .await
    }
}

fn last_value(readings: &[Reading], series: &str) -> Result<f64, ParseError> {
    readings
        .last()
        .map(|reading| reading.value)
        .ok_or_else(|| ParseError::empty_series(series))
}

#[async_trait]
impl ConsumptionSource for Client {
    async fn fetch_snapshot(&self, today: NaiveDate) -> Result<ConsumptionSnapshot, GrdfError> {
        Client::fetch_snapshot(self, today).await
    }
}
