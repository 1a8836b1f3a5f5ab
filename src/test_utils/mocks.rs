//! Mock implementations and server helpers for testing.
//!
//! This module provides mock server builders and response generators
//! for testing HTTP interactions with the GrDF portal and InfluxDB.

pub mod collectors;

use crate::grdf::endpoints::{CONSUMPTION_PATH, LOGIN_PATH, SESSION_COOKIE, VIEW_STATE_FIELD};
use crate::grdf::fetch::{Granularity, VolumeUnit};
use crate::test_utils::fixtures::{responses, series};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// Re-export collector mocks for convenience
pub use collectors::*;

/// Wiremock stand-in for the portal's login and consumption endpoints.
///
/// Requests are told apart by what their form body contains, the same way the
/// portal dispatches on the JSF source component.
pub struct MockGrdfPortal {
    server: MockServer,
}

impl MockGrdfPortal {
    /// Starts an empty portal.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Gets the server URL.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Form-encoded `javax.faces.ViewState` field carrying `token`.
    pub fn encoded_token(token: &str) -> String {
        format!("{}={}", VIEW_STATE_FIELD, token.replace(':', "%3A"))
    }

    async fn mount_login_page(&self) {
        Mock::given(method("GET"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&self.server)
            .await;
    }

    /// Mounts the two-post login. The second post only issues the session
    /// cookie when `issue_session_cookie` is set, like the portal does on bad
    /// credentials.
    pub async fn with_login_flow(self, issue_session_cookie: bool) -> Self {
        let cookie = format!("{}=c2Vzc2lvbg; Path=/", SESSION_COOKIE);
        let session_cookie = issue_session_cookie.then_some(cookie.as_str());
        self.with_login_flow_answering(responses::LOGIN_REDIRECT_RESPONSE, session_cookie)
            .await
    }

    /// Mounts the two-post login with the second post answering `body` and
    /// sending `session_cookie` as its `set-cookie` header, if any.
    pub async fn with_login_flow_answering(self, body: &str, session_cookie: Option<&str>) -> Self {
        self.mount_login_page().await;

        let mut second = ResponseTemplate::new(200).set_body_string(body);
        if let Some(cookie) = session_cookie {
            second = second.insert_header("set-cookie", cookie);
        }
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(body_string_contains(format!("{}=", VIEW_STATE_FIELD)))
            .respond_with(second)
            .with_priority(1)
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(responses::LOGIN_PARTIAL_RESPONSE))
            .with_priority(10)
            .mount(&self.server)
            .await;
        self
    }

    /// Mounts a login whose posts all answer `body`.
    pub async fn with_login_response(self, body: &str) -> Self {
        self.mount_login_page().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
        self
    }

    /// Mounts a login page that fails with `status`.
    pub async fn with_failing_login(self, status: u16) -> Self {
        Mock::given(method("GET"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("Service Unavailable"))
            .mount(&self.server)
            .await;
        self
    }

    /// Mounts the detailed consumption page.
    pub async fn with_consumption_page(self, html: &str) -> Self {
        Mock::given(method("GET"))
            .and(path(CONSUMPTION_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&self.server)
            .await;
        self
    }

    async fn mount_detail_view(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path(CONSUMPTION_PATH))
            .and(body_string_contains("j_idt139"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mounts the consumption flow with the detail view answering `detail` and
    /// every granularity change answering `data`.
    pub async fn with_consumption_flow_detail(self, detail: &str, data: &str) -> Self {
        let portal = self.with_consumption_page(responses::CONSUMPTION_PAGE).await;
        portal.mount_detail_view(detail).await;
        Mock::given(method("POST"))
            .and(path(CONSUMPTION_PATH))
            .and(body_string_contains("valueChange"))
            .respond_with(ResponseTemplate::new(200).set_body_string(data))
            .mount(&portal.server)
            .await;
        portal
    }

    /// Mounts the consumption flow answering every granularity change with `body`.
    pub async fn with_consumption_flow_returning(self, body: &str) -> Self {
        self.with_consumption_flow_detail(responses::DETAIL_PARTIAL_RESPONSE, body)
            .await
    }

    /// Mounts the consumption flow answering with the golden daily series.
    pub async fn with_consumption_flow(self) -> Self {
        self.with_consumption_flow_returning(responses::DAILY_DATA_PAGE)
            .await
    }

    /// Mounts the consumption flow answering with the consent interstitial.
    pub async fn with_terms_of_use(self) -> Self {
        self.with_consumption_flow_returning(responses::TERMS_OF_USE_PAGE)
            .await
    }

    async fn mount_series(&self, granularity: Granularity, unit: VolumeUnit, body: String) {
        Mock::given(method("POST"))
            .and(path(CONSUMPTION_PATH))
            .and(body_string_contains("valueChange"))
            .and(body_string_contains(format!(
                "panelTypeGranularite1={}",
                granularity.form_value()
            )))
            .and(body_string_contains(format!(
                "selecteurVolumeType2={}",
                unit.form_value()
            )))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mounts the consumption flow with one answer per series of the sample
    /// snapshot.
    pub async fn with_snapshot_flow(self) -> Self {
        let portal = self.with_consumption_page(responses::CONSUMPTION_PAGE).await;
        portal
            .mount_detail_view(responses::DETAIL_PARTIAL_RESPONSE)
            .await;
        portal
            .mount_series(
                Granularity::Day,
                VolumeUnit::Kwh,
                responses::data_page(series::DAILY_KWH, series::DAILY_TIMES),
            )
            .await;
        portal
            .mount_series(
                Granularity::Day,
                VolumeUnit::CubicMeter,
                responses::data_page(series::DAILY_M3, series::DAILY_TIMES),
            )
            .await;
        portal
            .mount_series(
                Granularity::Month,
                VolumeUnit::Kwh,
                responses::data_page(series::MONTHLY_KWH, series::MONTHLY_TIMES),
            )
            .await;
        portal
            .mount_series(
                Granularity::Month,
                VolumeUnit::CubicMeter,
                responses::data_page(series::MONTHLY_M3, series::MONTHLY_TIMES),
            )
            .await;
        portal
    }

    async fn received(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Number of requests of any method received on `request_path`.
    pub async fn requests_to(&self, request_path: &str) -> usize {
        self.received()
            .await
            .iter()
            .filter(|request| request.url.path() == request_path)
            .count()
    }

    /// Bodies of the posts received on `request_path`, in order.
    pub async fn post_bodies(&self, request_path: &str) -> Vec<String> {
        self.received()
            .await
            .iter()
            .filter(|request| request.method.as_str() == "POST" && request.url.path() == request_path)
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }

    /// Whether a granularity change was posted with `token`.
    pub async fn granularity_used_token(&self, token: &str) -> bool {
        let field = Self::encoded_token(token);
        self.post_bodies(CONSUMPTION_PATH)
            .await
            .iter()
            .any(|body| body.contains("valueChange") && body.contains(&field))
    }
}

/// Builder for creating wiremock server mocks for InfluxDB endpoints.
pub struct MockInfluxServerBuilder {
    server: MockServer,
}

impl MockInfluxServerBuilder {
    /// Creates a new mock InfluxDB server builder.
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Gets the server URL.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Mocks a successful write response.
    pub async fn mock_write_success(self) -> Self {
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;
        self
    }

    /// Mocks a write error response.
    pub async fn mock_write_error(self, status: u16, message: &str) -> Self {
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .respond_with(ResponseTemplate::new(status).set_body_string(message))
            .mount(&self.server)
            .await;
        self
    }

    /// Mocks a write response with expectations.
    pub async fn mock_write_with_expectation(self, times: u64) -> Self {
        Mock::given(method("POST"))
            .and(path("/api/v2/write"))
            .respond_with(ResponseTemplate::new(204))
            .expect(times)
            .mount(&self.server)
            .await;
        self
    }

    /// Builds and returns the configured mock server.
    pub fn build(self) -> MockServer {
        self.server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_token() {
        assert_eq!(
            MockGrdfPortal::encoded_token("-1:2"),
            "javax.faces.ViewState=-1%3A2"
        );
    }

    #[tokio::test]
    async fn test_portal_counts_requests() {
        let portal = MockGrdfPortal::start().await.with_login_flow(true).await;
        reqwest::get(format!("{}{}", portal.uri(), LOGIN_PATH))
            .await
            .unwrap();

        assert_eq!(portal.requests_to(LOGIN_PATH).await, 1);
        assert!(portal.post_bodies(LOGIN_PATH).await.is_empty());
    }

    #[tokio::test]
    async fn test_mock_influx_server_builder() {
        let server = MockInfluxServerBuilder::new()
            .await
            .mock_write_success()
            .await
            .build();

        assert!(server.uri().starts_with("http://"));
    }
}
