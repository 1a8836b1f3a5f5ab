use crate::error::{Result, StorageError};
use chrono::{DateTime, Local};
use influxdb2::models::DataPoint;

use super::traits::DataPointBuilder;
use super::types::{Measurement, Unit};

fn timestamp_nanos(timestamp: &DateTime<Local>) -> Result<i64, StorageError> {
    timestamp
        .timestamp_nanos_opt()
        .ok_or_else(|| StorageError::InvalidDataPoint("Timestamp overflow".to_string()))
}

/// State of one named gas sensor.
///
/// The timestamp is the day the state refers to, not the time it was
/// scraped.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorMetric {
    /// The measurement type (should be Measurement::GasSensor)
    pub measurement: Measurement,
    /// Sensor name (e.g., "Gazpar energy month")
    pub name: String,
    pub unit: Unit,
    pub value: f64,
    /// Delivery point the reading belongs to, when configured
    pub pce: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl DataPointBuilder for SensorMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        let timestamp = timestamp_nanos(&self.timestamp)?;

        let mut builder = DataPoint::builder(self.measurement.to_string().as_str())
            .tag("sensor", self.name.clone())
            .tag("unit", self.unit.to_string());
        if let Some(pce) = &self.pce {
            builder = builder.tag("pce", pce.clone());
        }
        builder
            .field("value", self.value)
            .timestamp(timestamp)
            .build()
            .map_err(|e| StorageError::InvalidDataPoint(format!("Failed to build SensorMetric: {}", e)))
    }
}

/// Consumption of a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReadingMetric {
    /// The measurement type (should be Measurement::GasDaily)
    pub measurement: Measurement,
    pub unit: Unit,
    pub value: f64,
    pub pce: Option<String>,
    /// Local midnight of the day
    pub date: DateTime<Local>,
}

impl DataPointBuilder for DailyReadingMetric {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        let timestamp = timestamp_nanos(&self.date)?;

        let mut builder = DataPoint::builder(self.measurement.to_string().as_str())
            .tag("unit", self.unit.to_string());
        if let Some(pce) = &self.pce {
            builder = builder.tag("pce", pce.clone());
        }
        builder
            .field("value", self.value)
            .timestamp(timestamp)
            .build()
            .map_err(|e| {
                StorageError::InvalidDataPoint(format!("Failed to build DailyReadingMetric: {}", e))
            })
    }
}
