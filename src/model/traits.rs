use crate::error::{CollectorError, Result, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use influxdb2::models::DataPoint;

/// A sensor state or reading that can be written to InfluxDB as one point.
pub trait DataPointBuilder: Send + Sync {
    /// Builds the point, failing when its timestamp or fields cannot be stored.
    fn to_point(&self) -> Result<DataPoint, StorageError>;
}

/// A source of points polled once per schedule cycle.
///
/// A collector decides what to publish when its upstream fails. Returning
/// `Err` drops its whole contribution to the cycle.
#[async_trait]
pub trait MetricCollector: Send + Sync {
    /// Short name used to tell collectors apart in logs.
    fn name(&self) -> &str;

    /// Collects the points of the cycle started at `timestamp`.
    async fn collect(
        &self,
        timestamp: DateTime<Local>,
    ) -> Result<Vec<Box<dyn DataPointBuilder>>, CollectorError>;
}
