use chrono::{DateTime, Local};
use futures::future::join_all;
use influxdb2::models::DataPoint;

use super::traits::MetricCollector;

/// Runs every collector of a cycle concurrently and converts their output.
///
/// A failing collector, or a point that cannot be converted, is logged under
/// the collector's name and skipped.
pub async fn batch_collect_metrics<'a>(
    collectors: &[Box<dyn MetricCollector + 'a>],
    timestamp: DateTime<Local>,
) -> Vec<DataPoint> {
    let results = join_all(collectors.iter().map(|collector| async move {
        (collector.name(), collector.collect(timestamp).await)
    }))
    .await;

    let mut points = Vec::new();
    for (name, result) in results {
        let builders = match result {
            Ok(builders) => builders,
            Err(e) => {
                tracing::error!("Failed to get metrics from {}: {:?}", name, e);
                continue;
            }
        };
        let before = points.len();
        points.extend(builders.iter().filter_map(|builder| match builder.to_point() {
            Ok(point) => Some(point),
            Err(e) => {
                tracing::error!("Failed to convert a point from {}: {:?}", name, e);
                None
            }
        }));
        tracing::debug!(
            "Collected {} of {} points from {}",
            points.len() - before,
            builders.len(),
            name
        );
    }
    points
}
