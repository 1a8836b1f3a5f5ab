//! Retrieval of a consumption series from an authenticated session.

use crate::error::{GrdfError, ParseError};
use crate::grdf::endpoints::{
    detail_view_payload, granularity_payload, CONSUMPTION_PATH, CONSUMPTION_QUERY, VIEW_STATE_ID,
};
use crate::grdf::parsing::{
    extract_series, find_partial_response_view_state, is_terms_of_use_page,
    parse_consumption_page_view_state,
};
use crate::grdf::readings::{pair_series, Reading};
use crate::grdf::session::{Referer, Session, ViewState};
use chrono::NaiveDate;

/// Aggregation interval of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    #[allow(dead_code)]
    Hour,
    Day,
    #[allow(dead_code)]
    Week,
    Month,
}

impl Granularity {
    pub fn form_value(self) -> &'static str {
        match self {
            Granularity::Hour => "heure",
            Granularity::Day => "jour",
            Granularity::Week => "semaine",
            Granularity::Month => "mois",
        }
    }
}

/// Volume type the portal reports values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeUnit {
    Kwh,
    CubicMeter,
}

impl VolumeUnit {
    pub fn form_value(self) -> &'static str {
        match self {
            VolumeUnit::Kwh => "kwh",
            VolumeUnit::CubicMeter => "m3",
        }
    }
}

/// Inclusive window of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// What to ask the detailed consumption view for.
///
/// Without a range the portal falls back to its own default window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumptionRequest {
    pub granularity: Granularity,
    pub unit: VolumeUnit,
    pub range: Option<DateRange>,
}

impl ConsumptionRequest {
    pub fn new(granularity: Granularity, unit: VolumeUnit) -> Self {
        Self {
            granularity,
            unit,
            range: None,
        }
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.range = Some(DateRange { start, end });
        self
    }
}

fn current_view_state(session: &Session) -> Result<ViewState, GrdfError> {
    session
        .view_state()
        .cloned()
        .ok_or_else(|| ParseError::element_not_found(VIEW_STATE_ID).into())
}

/// Keeps the session token in step with a partial response.
///
/// A body that carries no token, or is not XML at all, leaves the current
/// token in place.
pub(crate) fn refresh_view_state(session: &mut Session, response: &str) {
    match find_partial_response_view_state(response) {
        Ok(Some(view_state)) => session.set_view_state(view_state),
        Ok(None) => {}
        Err(e) => tracing::debug!("No view state in response, keeping the current one: {}", e),
    }
}

/// Fetches one series with an authenticated session.
///
/// The detailed consumption page is loaded for a fresh token, the detail view
/// is opened, then the granularity change makes the portal render the chart
/// holding the series.
///
/// # Errors
/// * [`GrdfError::TermsOfUse`] - the portal asks for consent on the page or in
///   the series response, even if data is present
/// * [`GrdfError::Parse`] - a token or a series marker is missing
pub async fn fetch_readings(
    session: &mut Session,
    request: &ConsumptionRequest,
) -> Result<Vec<Reading>, GrdfError> {
    let page = session.get(CONSUMPTION_PATH, Referer::Consumption).await?;
    if is_terms_of_use_page(&page) {
        return Err(GrdfError::TermsOfUse);
    }
    session.set_view_state(parse_consumption_page_view_state(&page)?);

    session.set_saved_ref(CONSUMPTION_PATH)?;
    let payload = detail_view_payload(&current_view_state(session)?);
    let response = session
        .post_form(CONSUMPTION_PATH, CONSUMPTION_QUERY, &payload, Referer::Consumption)
        .await?;
    refresh_view_state(session, &response);

    session.set_saved_ref(CONSUMPTION_PATH)?;
    let payload = granularity_payload(&current_view_state(session)?, request);
    let body = session
        .post_form(CONSUMPTION_PATH, CONSUMPTION_QUERY, &payload, Referer::Consumption)
        .await?;

    if is_terms_of_use_page(&body) {
        return Err(GrdfError::TermsOfUse);
    }

    let series = extract_series(&body)?;
    let readings = pair_series(&series.values, &series.times)?;
    tracing::debug!(
        granularity = ?request.granularity,
        unit = ?request.unit,
        count = readings.len(),
        "Fetched consumption series"
    );
    Ok(readings)
}
