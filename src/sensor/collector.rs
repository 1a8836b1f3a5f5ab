use crate::error::CollectorError;
use crate::grdf::{local_midnight, ConsumptionSnapshot};
use crate::model::{
    DailyReadingMetric, DataPointBuilder, Measurement, MetricCollector, SensorMetric, Unit,
};
use crate::sensor::account::GazparAccount;
use crate::sensor::types::Sensor;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Publishes the sensor states of a [`GazparAccount`] on every cycle.
pub struct GazparMetricCollector {
    account: Arc<GazparAccount>,
    pce: Option<String>,
}

impl GazparMetricCollector {
    pub fn new(account: Arc<GazparAccount>, pce: Option<String>) -> Self {
        Self { account, pce }
    }

    fn sensor_metric(&self, sensor: &Sensor) -> Option<SensorMetric> {
        let (value, timestamp) = (sensor.state?, sensor.timestamp?);
        Some(SensorMetric {
            measurement: Measurement::GasSensor,
            name: sensor.kind.name().to_string(),
            unit: sensor.kind.unit(),
            value,
            pce: self.pce.clone(),
            timestamp,
        })
    }

    fn daily_metrics(&self, snapshot: &ConsumptionSnapshot) -> Vec<DailyReadingMetric> {
        let series = [
            (Unit::Kwh, &snapshot.daily_kwh),
            (Unit::CubicMeter, &snapshot.daily_m3),
        ];
        series
            .into_iter()
            .flat_map(|(unit, readings)| readings.iter().map(move |reading| (unit, reading)))
            .filter_map(|(unit, reading)| {
                let date = match reading.date() {
                    Ok(day) => local_midnight(day)?,
                    Err(e) => {
                        tracing::warn!("Skipping daily reading: {}", e);
                        return None;
                    }
                };
                Some(DailyReadingMetric {
                    measurement: Measurement::GasDaily,
                    unit,
                    value: reading.value,
                    pce: self.pce.clone(),
                    date,
                })
            })
            .collect()
    }
}

#[async_trait]
impl MetricCollector for GazparMetricCollector {
    fn name(&self) -> &str {
        "gazpar"
    }

    async fn collect(
        &self,
        timestamp: DateTime<Local>,
    ) -> Result<Vec<Box<dyn DataPointBuilder>>, CollectorError> {
        let mut points: Vec<Box<dyn DataPointBuilder>> = Vec::new();

        match self.account.update(timestamp.date_naive()).await {
            Ok(snapshot) => {
                points.extend(
                    self.daily_metrics(&snapshot)
                        .into_iter()
                        .map(|metric| Box::new(metric) as Box<dyn DataPointBuilder>),
                );
            }
            Err(e) => {
                tracing::error!("Failed to update gas sensors, keeping previous state: {}", e);
            }
        }

        points.extend(
            self.account
                .sensors()
                .await
                .iter()
                .filter_map(|sensor| self.sensor_metric(sensor))
                .map(|metric| Box::new(metric) as Box<dyn DataPointBuilder>),
        );

        Ok(points)
    }
}
