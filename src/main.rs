//! Gazpar to InfluxDB2 Forwarder
//!
//! This application scrapes gas consumption readings from the GrDF customer
//! portal and forwards them to InfluxDB2 as named sensor states and daily
//! readings.
//!
//! # Architecture
//!
//! One collection loop runs after a short initial delay, then on a fixed
//! interval (4 hours by default). Every cycle opens a fresh portal session,
//! fetches daily and monthly series in kWh and m³, derives the sensor figures
//! and writes them out.
//!
//! # Features
//!
//! - Exponential backoff around each portal scrape
//! - Previous sensor state kept when a cycle fails
//! - Graceful shutdown on SIGTERM/SIGINT
//! - Timeout protection for hung cycles

mod config;
mod error;
mod grdf;
mod influxdb;
mod model;
mod retry;
mod sensor;


use crate::error::{CollectorError, Result};
use crate::model::{batch_collect_metrics, MetricCollector};
use crate::sensor::{GazparAccount, GazparMetricCollector};
use anyhow::Context;
use chrono::Local;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinError;
use tokio::time;
use tokio::time::{sleep, Duration};

const TASK_NAME: &str = "gazpar_collector";

/// Application entry point.
///
/// Initializes logging, then hands over to [`run`]. Startup errors are logged
/// and end the process with a non-zero status.
#[tokio::main]
async fn main() {
    let app_config = match config::load_app_config() {
        Ok(app_config) => app_config,
        Err(e) => {
            eprintln!("Failed to load AppConfig: {}", e);
            std::process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Failed to start: {:?}", e);
        std::process::exit(1);
    }
}

/// Loads configuration, wires the collector and runs the main event loop
/// until a termination signal arrives.
async fn run() -> Result<()> {
    let collector_config = Arc::new(config::load_collector_config()?);
    let retry_config = config::load_retry_config()?;
    let influx_config = config::load_influx_config()?;
    let influx_client = Arc::new(influxdb::Client::new(influx_config));

    let grdf_config = config::load_grdf_config()?;
    let pce = grdf_config.pce.clone();
    let grdf_client = Arc::new(grdf::Client::new(grdf_config.clone(), retry_config.policy()));
    let account = Arc::new(GazparAccount::from_config(grdf_client, &grdf_config));

    let collectors: Arc<Vec<Box<dyn MetricCollector>>> =
        Arc::new(vec![Box::new(GazparMetricCollector::new(account, pce))]);

    // Factory for the collector task, recreated every time the previous one ends
    let create_task = |delay: Duration| -> tokio::task::JoinHandle<()> {
        let config = Arc::clone(&collector_config);
        let influx_client = Arc::clone(&influx_client);
        let collectors = Arc::clone(&collectors);
        tokio::spawn(async move {
            sleep(delay).await;
            create_collect_task(
                influx_client,
                collectors,
                Duration::from_secs(config.interval_sec),
                TASK_NAME,
                config.task_timeout_seconds,
            )
            .await;
        })
    };
    let mut collect_task = create_task(Duration::from_secs(collector_config.initial_delay_sec));

    let mut sig_term =
        signal(SignalKind::terminate()).context("Failed to register SIGTERM handler")?;
    tracing::info!(
        "Running every {} seconds... Press Ctrl-C or send SIGTERM to terminate.",
        collector_config.interval_sec
    );
    loop {
        tokio::select! {
            _ = sig_term.recv() => {
                tracing::info!("Received SIGTERM. Exiting...");
                break;
            }
            _ = ctrl_c() => {
                tracing::info!("Received SIGINT. Exiting...");
                break;
            }
            result = &mut collect_task => {
                handle_task_result(TASK_NAME, result);
                collect_task = create_task(Duration::ZERO);
            }
        }
    }
    Ok(())
}

/// Wraps a future with a timeout to prevent tasks from hanging indefinitely.
///
/// A timed out task is reported as [`CollectorError::Timeout`].
async fn with_timeout<F>(
    task_name: &'static str,
    future: F,
    timeout_seconds: u64,
) -> Result<F::Output, CollectorError>
where
    F: IntoFuture,
{
    let timeout_duration = Duration::from_secs(timeout_seconds);

    time::timeout(timeout_duration, future)
        .await
        .map_err(|_| CollectorError::timeout(task_name, timeout_seconds))
}

/// Runs one collection cycle, writes its points to InfluxDB, then sleeps for
/// `interval`.
///
/// Collection and write errors are logged. The cycle as a whole is bounded by
/// `timeout_seconds`.
async fn create_collect_task(
    influx_client: Arc<influxdb::Client>,
    collectors: Arc<Vec<Box<dyn MetricCollector>>>,
    interval: Duration,
    task_name: &'static str,
    timeout_seconds: u64,
) {
    let cycle = with_timeout(
        task_name,
        async {
            let points = batch_collect_metrics(&collectors, Local::now()).await;

            for point in &points {
                tracing::debug!("{:?}", point);
            }

            let count = points.len();
            match influx_client.write(points).await {
                Ok(_) => tracing::info!(
                    "Successfully wrote {} points to InfluxDB ({})",
                    count,
                    task_name
                ),
                Err(e) => tracing::error!(
                    "Failed to write points to InfluxDB ({}): {:?}",
                    task_name,
                    e
                ),
            }
        },
        timeout_seconds,
    )
    .await;
    if let Err(e) = cycle {
        tracing::error!("{}", e);
    }
    sleep(interval).await;
}

/// Logs how a collector task ended before it is recreated.
fn handle_task_result(task_name: &str, result: std::result::Result<(), JoinError>) {
    match result {
        Ok(_) => {
            tracing::debug!("Task {} completed.", task_name);
        }
        Err(e) => {
            tracing::error!("Task {} failed: {:?}", task_name, e);
        }
    }
}
