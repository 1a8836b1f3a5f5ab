use crate::config::InfluxConfig;
use crate::error::StorageError;
use futures::prelude::stream;
use influxdb2::models::DataPoint;

/// Writes collected points into a single InfluxDB2 bucket.
pub struct Client {
    client: influxdb2::Client,
    bucket: String,
}

impl Client {
    pub(crate) fn new(config: InfluxConfig) -> Self {
        let client = influxdb2::Client::new(config.url, config.org, config.token);
        Self {
            client,
            bucket: config.bucket,
        }
    }

    pub async fn write(&self, points: Vec<DataPoint>) -> Result<(), StorageError> {
        if points.is_empty() {
            tracing::debug!("No points to write to {}", self.bucket);
            return Ok(());
        }
        self.client
            .write(self.bucket.as_str(), stream::iter(points))
            .await?;
        Ok(())
    }
}
