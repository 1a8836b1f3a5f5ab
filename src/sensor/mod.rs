//! Gas sensors fed from the GrDF portal.
//!
//! A [`ConsumptionSource`] provides one snapshot per cycle, [`GazparAccount`]
//! turns it into sensor states and [`GazparMetricCollector`] publishes them.

mod account;
mod collector;
mod figures;
mod types;

use crate::error::GrdfError;
use crate::grdf::ConsumptionSnapshot;
use async_trait::async_trait;
use chrono::NaiveDate;

pub use account::GazparAccount;
pub use collector::GazparMetricCollector;

/// Anything able to produce a consumption snapshot for a given day.
#[async_trait]
pub trait ConsumptionSource: Send + Sync {
    async fn fetch_snapshot(&self, today: NaiveDate) -> Result<ConsumptionSnapshot, GrdfError>;
}
