//! Model definitions for gas metrics and InfluxDB data points.
//!
//! This module provides the core data structures and traits for representing
//! sensor states and daily readings and converting them to InfluxDB data
//! points.

pub mod metrics;
pub mod traits;
pub mod types;
pub mod utilities;

// Re-export commonly used items at the module level
pub use metrics::{DailyReadingMetric, SensorMetric};
pub use traits::{DataPointBuilder, MetricCollector};
pub use types::{Measurement, Unit};
pub use utilities::batch_collect_metrics;
