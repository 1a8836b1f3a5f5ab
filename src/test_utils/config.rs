//! Configuration utilities for testing.
//!
//! This module provides test configuration builders and helpers for creating
//! mock configurations used throughout the test suite.

use crate::config::{GrdfConfig, InfluxConfig, MonthAggregation};

/// Builder for creating test GrDF configurations.
#[derive(Debug)]
pub struct TestGrdfConfigBuilder {
    url: String,
    username: String,
    password: String,
    cost: f64,
    pce: Option<String>,
    month_aggregate: MonthAggregation,
}

impl TestGrdfConfigBuilder {
    /// Creates a new test config builder with default values.
    pub fn new() -> Self {
        Self {
            url: "http://test.local".to_string(),
            username: "user@example.com".to_string(),
            password: "test_password".to_string(),
            cost: 0.1,
            pce: None,
            month_aggregate: MonthAggregation::Reported,
        }
    }

    /// Sets the portal URL for the test configuration.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the password for the test configuration.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets the price of one kWh.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Sets the delivery point identifier.
    pub fn with_pce(mut self, pce: impl Into<String>) -> Self {
        self.pce = Some(pce.into());
        self
    }

    /// Sets how month sensors are computed.
    pub fn with_month_aggregate(mut self, month_aggregate: MonthAggregation) -> Self {
        self.month_aggregate = month_aggregate;
        self
    }

    /// Builds the GrDF configuration.
    pub fn build(self) -> GrdfConfig {
        GrdfConfig {
            url: self.url,
            username: self.username,
            password: self.password,
            cost: self.cost,
            pce: self.pce,
            month_aggregate: self.month_aggregate,
            timeout_sec: 5,
        }
    }
}

/// Builder for creating test InfluxDB configurations.
#[derive(Debug)]
pub struct TestInfluxConfigBuilder {
    url: String,
    bucket: String,
}

impl TestInfluxConfigBuilder {
    /// Creates a new test config builder with default values.
    pub fn new() -> Self {
        Self {
            url: "http://localhost:8086".to_string(),
            bucket: "test-bucket".to_string(),
        }
    }

    /// Sets the URL for the test configuration.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the bucket for the test configuration.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Builds the InfluxDB configuration.
    pub fn build(self) -> InfluxConfig {
        InfluxConfig {
            url: self.url,
            org: "test-org".to_string(),
            token: "test-token".to_string(),
            bucket: self.bucket,
        }
    }
}

/// Creates a default test GrDF configuration.
pub fn test_grdf_config() -> GrdfConfig {
    TestGrdfConfigBuilder::new().build()
}

/// Creates a default test InfluxDB configuration.
/// This is a convenience function for simple test cases.
pub fn test_influx_config() -> InfluxConfig {
    TestInfluxConfigBuilder::new().build()
}

/// Creates a test InfluxDB configuration with a custom URL.
/// This is a convenience function for tests that need to specify a mock server URL.
pub fn test_influx_config_with_url(url: impl Into<String>) -> InfluxConfig {
    TestInfluxConfigBuilder::new().with_url(url).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grdf_config_builder() {
        let config = TestGrdfConfigBuilder::new()
            .with_url("http://portal.local")
            .with_password("hunter2")
            .with_cost(0.0912)
            .with_pce("GI123456")
            .with_month_aggregate(MonthAggregation::SumOfDays)
            .build();

        assert_eq!(config.url, "http://portal.local");
        assert_eq!(config.password, "hunter2");
        assert_eq!(config.cost, 0.0912);
        assert_eq!(config.pce.as_deref(), Some("GI123456"));
        assert_eq!(config.month_aggregate, MonthAggregation::SumOfDays);
    }

    #[test]
    fn test_influx_config_builder() {
        let config = TestInfluxConfigBuilder::new()
            .with_url("http://influx.local")
            .with_bucket("gas")
            .build();

        assert_eq!(config.url, "http://influx.local");
        assert_eq!(config.bucket, "gas");
        assert_eq!(config.org, "test-org");
    }

    #[test]
    fn test_convenience_functions() {
        assert_eq!(test_grdf_config().url, "http://test.local");
        assert_eq!(test_influx_config().url, "http://localhost:8086");
        assert_eq!(
            test_influx_config_with_url("http://mock:8086").url,
            "http://mock:8086"
        );
    }
}
