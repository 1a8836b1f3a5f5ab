use crate::config::{GrdfConfig, MonthAggregation};
use crate::error::CollectorError;
use crate::grdf::ConsumptionSnapshot;
use crate::sensor::figures::{month_discrepancy, Figures, MONTH_TOLERANCE_KWH};
use crate::sensor::types::{Sensor, SensorKind};
use crate::sensor::ConsumptionSource;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One GrDF account and the sensors fed from it.
pub struct GazparAccount {
    source: Arc<dyn ConsumptionSource>,
    cost: f64,
    aggregation: MonthAggregation,
    sensors: Mutex<Vec<Sensor>>,
}

impl GazparAccount {
    pub fn new(source: Arc<dyn ConsumptionSource>, cost: f64, aggregation: MonthAggregation) -> Self {
        Self {
            source,
            cost,
            aggregation,
            sensors: Mutex::new(SensorKind::ALL.iter().map(|kind| Sensor::new(*kind)).collect()),
        }
    }

    pub fn from_config(source: Arc<dyn ConsumptionSource>, config: &GrdfConfig) -> Self {
        Self::new(source, config.cost, config.month_aggregate)
    }

    /// Fetches a snapshot and refreshes every sensor from it.
    ///
    /// Sensors are only touched once all values are derived, so a failed
    /// cycle leaves the previous states in place.
    pub async fn update(&self, today: NaiveDate) -> Result<ConsumptionSnapshot, CollectorError> {
        let snapshot = self.source.fetch_snapshot(today).await?;
        let figures = Figures::derive(&snapshot, today, self.cost, self.aggregation)?;

        if let Ok(index) = snapshot.month_index() {
            tracing::debug!(
                "Month to date reported by the portal: {} m³, {} kWh",
                index.m3,
                index.kwh
            );
        }
        match month_discrepancy(&snapshot, today) {
            Ok(Some(gap)) if gap > MONTH_TOLERANCE_KWH => {
                tracing::warn!(
                    "Reported month total differs from the sum of days by {:.3} kWh",
                    gap
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to cross-check month total: {}", e),
        }

        let mut sensors = self.sensors.lock().await;
        for sensor in sensors.iter_mut() {
            sensor.set_data(figures.timestamp, figures.value(sensor.kind));
        }
        tracing::debug!("Updated {} gas sensors at {}", sensors.len(), figures.timestamp);

        Ok(snapshot)
    }

    /// Current state of every sensor.
    pub async fn sensors(&self) -> Vec<Sensor> {
        self.sensors.lock().await.clone()
    }
}
