//! Mock implementations of MetricCollector and ConsumptionSource for testing.

use crate::error::{CollectorError, GrdfError, StorageError};
use crate::grdf::ConsumptionSnapshot;
use crate::model::{DataPointBuilder, Measurement, MetricCollector, SensorMetric, Unit};
use crate::sensor::ConsumptionSource;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use influxdb2::models::DataPoint;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A mock metric collector that can be configured to succeed or fail.
pub struct MockMetricCollector {
    should_fail: bool,
    error_message: String,
    create_data: Box<dyn Fn() -> Vec<Box<dyn DataPointBuilder>> + Send + Sync>,
}

impl MockMetricCollector {
    /// Creates a new mock collector that succeeds with one sensor state.
    pub fn new_success() -> Self {
        Self {
            should_fail: false,
            error_message: String::new(),
            create_data: Box::new(|| {
                vec![Box::new(SensorMetric {
                    measurement: Measurement::GasSensor,
                    name: "test".to_string(),
                    unit: Unit::Kwh,
                    value: 100.0,
                    pce: None,
                    timestamp: Local::now(),
                })]
            }),
        }
    }

    /// Creates a new mock collector that fails with the given error message.
    pub fn new_failure(error_message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: error_message.into(),
            create_data: Box::new(|| Vec::new()),
        }
    }

    /// Creates a new mock collector with custom success data.
    pub fn new_with_data<F>(create_fn: F) -> Self
    where
        F: Fn() -> Vec<Box<dyn DataPointBuilder>> + Send + Sync + 'static,
    {
        Self {
            should_fail: false,
            error_message: String::new(),
            create_data: Box::new(create_fn),
        }
    }
}

#[async_trait]
impl MetricCollector for MockMetricCollector {
    fn name(&self) -> &str {
        "mock"
    }

    async fn collect(
        &self,
        _timestamp: DateTime<Local>,
    ) -> Result<Vec<Box<dyn DataPointBuilder>>, CollectorError> {
        if self.should_fail {
            Err(CollectorError::ValidationFailed(self.error_message.clone()))
        } else {
            Ok((self.create_data)())
        }
    }
}

/// A data point builder whose conversion always fails.
pub struct FailingDataPointBuilder;

impl DataPointBuilder for FailingDataPointBuilder {
    fn to_point(&self) -> Result<DataPoint, StorageError> {
        Err(StorageError::InvalidDataPoint(
            "Mock conversion failure".to_string(),
        ))
    }
}

/// A consumption source answering from a queue of canned results.
///
/// Once the queue is empty every call fails with a transport error.
pub struct FakeConsumptionSource {
    results: Mutex<VecDeque<Result<ConsumptionSnapshot, GrdfError>>>,
    calls: AtomicUsize,
}

impl FakeConsumptionSource {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queues a successful fetch.
    pub fn then_ok(self, snapshot: ConsumptionSnapshot) -> Self {
        self.push(Ok(snapshot))
    }

    /// Queues a failed fetch.
    pub fn then_err(self, err: GrdfError) -> Self {
        self.push(Err(err))
    }

    fn push(self, result: Result<ConsumptionSnapshot, GrdfError>) -> Self {
        self.results.lock().unwrap().push_back(result);
        self
    }

    /// Gets the number of fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConsumptionSource for FakeConsumptionSource {
    async fn fetch_snapshot(&self, _today: NaiveDate) -> Result<ConsumptionSnapshot, GrdfError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GrdfError::ServerError {
                    status: 503,
                    message: "no canned result left".to_string(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{sample_snapshot, snapshot_day};

    #[tokio::test]
    async fn test_mock_success_collector() {
        let collector = MockMetricCollector::new_success();
        let data = collector.collect(Local::now()).await.unwrap();
        assert_eq!(data.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure_collector() {
        let collector = MockMetricCollector::new_failure("Test error");
        let result = collector.collect(Local::now()).await;
        match result {
            Err(e) => assert!(e.to_string().contains("Test error")),
            Ok(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_fake_source_replays_queue() {
        let source = FakeConsumptionSource::new()
            .then_ok(sample_snapshot())
            .then_err(GrdfError::TermsOfUse);

        assert!(source.fetch_snapshot(snapshot_day()).await.is_ok());
        assert!(matches!(
            source.fetch_snapshot(snapshot_day()).await,
            Err(GrdfError::TermsOfUse)
        ));
        assert!(source.fetch_snapshot(snapshot_day()).await.is_err());
        assert_eq!(source.calls(), 3);
    }
}
