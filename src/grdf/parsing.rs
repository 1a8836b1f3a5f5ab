//! Extraction of tokens and series from GrDF portal responses.
//!
//! The portal was never meant to be consumed by a program: tokens sit in JSF
//! partial responses or hidden inputs, and the consumption series are inlined
//! in chart scripts. Each known response shape has a golden fixture under
//! `tests/fixtures/`, so markup drift shows up as a failing test here first.

use crate::error::ParseError;
use crate::grdf::endpoints::{
    DETAIL_FORM_ID, DETAIL_PORTLET_ID, TERMS_OF_USE_MARKER, TIMES_MARKER, VALUES_MARKER,
    VIEW_STATE_ID,
};
use crate::grdf::helper::html_selector;
use crate::grdf::session::ViewState;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use scraper::Html;

/// The two raw comma-separated series found in a consumption page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSeries {
    pub values: String,
    pub times: String,
}

/// Reads the token out of a JSF partial response.
///
/// The token is the text (usually CDATA) of
/// `<update id="javax.faces.ViewState">`.
///
/// # Returns
/// * `Ok(Some(token))` - the response rotated the token
/// * `Ok(None)` - the response carries no token update
/// * `Err` - the response is not well-formed XML
pub fn find_partial_response_view_state(xml: &str) -> Result<Option<ViewState>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_update = false;
    let mut token = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"update" => {
                in_update = e
                    .attributes()
                    .flatten()
                    .any(|attr| attr.key.as_ref() == b"id" && &*attr.value == VIEW_STATE_ID.as_bytes());
            }
            Ok(Event::CData(e)) if in_update => {
                token.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::Text(e)) if in_update => {
                let text = e.unescape().map_err(|e| ParseError::Xml(e.to_string()))?;
                token.push_str(&text);
            }
            Ok(Event::End(e)) if in_update && e.local_name().as_ref() == b"update" => {
                let token = token.trim();
                if token.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(ViewState::new(token)));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {}
        }
    }
}

/// Same as [`find_partial_response_view_state`], but a missing token is an error.
pub fn parse_partial_response_view_state(xml: &str) -> Result<ViewState, ParseError> {
    find_partial_response_view_state(xml)?
        .ok_or_else(|| ParseError::element_not_found(format!("update#{}", VIEW_STATE_ID)))
}

/// Selector of the hidden view-state input of the detailed consumption form.
pub fn detail_view_state_selector() -> String {
    format!(
        "div[id='{}'] > form[id='{}'] > input[id='{}']",
        DETAIL_PORTLET_ID, DETAIL_FORM_ID, VIEW_STATE_ID
    )
}

/// Reads the token from the hidden input of the detailed consumption form.
pub fn parse_consumption_page_view_state(html: &str) -> Result<ViewState, ParseError> {
    let document = Html::parse_document(html);
    let selector_text = detail_view_state_selector();
    let selector = html_selector(&selector_text)?;
    let input = document
        .select(&selector)
        .next()
        .ok_or_else(|| ParseError::element_not_found(&selector_text))?;
    let value = input
        .value()
        .attr("value")
        .ok_or_else(|| ParseError::missing_attribute(&selector_text, "value"))?;
    Ok(ViewState::new(value))
}

/// Whether the portal answered with its terms-of-use interstitial.
pub fn is_terms_of_use_page(body: &str) -> bool {
    body.contains(TERMS_OF_USE_MARKER)
}

/// Returns the string literal assigned to a script variable, e.g.
/// `marker = "..."`.
pub fn extract_script_string(body: &str, marker: &str) -> Result<String, ParseError> {
    let pattern = format!(r#"{} = "(.*?)""#, regex::escape(marker));
    let regex = Regex::new(&pattern).map_err(|e| ParseError::invalid_pattern(&pattern, e))?;
    regex
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().to_string())
        .ok_or_else(|| ParseError::marker_not_found(marker))
}

/// Extracts the value and date series of a consumption page.
pub fn extract_series(body: &str) -> Result<RawSeries, ParseError> {
    Ok(RawSeries {
        values: extract_script_string(body, VALUES_MARKER)?,
        times: extract_script_string(body, TIMES_MARKER)?,
    })
}
