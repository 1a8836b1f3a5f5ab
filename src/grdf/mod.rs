//! Scraper for the GrDF customer portal.
//!
//! A scrape replays what a browser does: a login through the JSF login
//! portlet, then, per series, a visit of the detailed consumption page and two
//! AJAX posts. The rotating view-state token is threaded through every step by
//! the session.

mod auth;
mod client;
pub mod endpoints;
pub mod fetch;
mod helper;
mod parsing;
pub mod readings;
mod session;

pub use client::{Client, ConsumptionSnapshot};
pub use helper::{first_day_of_previous_month, local_midnight, round_to};
pub use readings::{month_to_date_total, sum_for_month, Reading};
