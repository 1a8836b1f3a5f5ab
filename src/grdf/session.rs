use crate::error::{GrdfError, Result};
use crate::grdf::endpoints::{
    FormPayload, CONNEXION_PATH, CONSUMPTION_PATH, LOGIN_PATH, SAVED_REF_COOKIE,
};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect, Client as HttpClient, Response, Url};
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Mobile Safari/537.36";

/// The rotating token a JSF page hands out and expects back on the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState(String);

impl ViewState {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which page the next requests pretend to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referer {
    Login,
    Consumption,
}

/// One browser-like visit to the portal.
///
/// Cookies and the current view-state live here and nowhere else; a session is
/// created for a single scrape and dropped afterwards.
pub struct Session {
    http_client: HttpClient,
    cookies: Arc<Jar>,
    base_url: Url,
    view_state: Option<ViewState>,
}

impl Session {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GrdfError> {
        let base_url =
            Url::parse(base_url).map_err(|e| GrdfError::invalid_url(base_url, e))?;
        let cookies = Arc::new(Jar::default());
        let http_client = HttpClient::builder()
            .cookie_provider(Arc::clone(&cookies))
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            cookies,
            base_url,
            view_state: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn view_state(&self) -> Option<&ViewState> {
        self.view_state.as_ref()
    }

    /// Replaces the token; the previous one is no longer accepted by the server.
    pub fn set_view_state(&mut self, view_state: ViewState) {
        tracing::trace!(view_state = view_state.as_str(), "View state rotated");
        self.view_state = Some(view_state);
    }

    /// Records the page the portal should consider as last visited.
    pub fn set_saved_ref(&self, path: &str) -> Result<(), GrdfError> {
        let page = self.url(path)?;
        self.cookies
            .add_cookie_str(&format!("{}={}", SAVED_REF_COOKIE, page), &self.base_url);
        Ok(())
    }

    /// Checks whether the portal issued a cookie with the given name.
    ///
    /// The jar only hands out cookies matching a URL, so every page the
    /// scraper visits is asked in turn. This finds cookies scoped to a
    /// sub-path such as `/monespace`.
    pub fn has_cookie(&self, name: &str) -> bool {
        ["/", LOGIN_PATH, CONNEXION_PATH, CONSUMPTION_PATH]
            .iter()
            .filter_map(|path| self.url(path).ok())
            .filter_map(|url| self.cookies.cookies(&url))
            .any(|header| {
                header.to_str().is_ok_and(|header| {
                    header
                        .split(';')
                        .filter_map(|pair| pair.trim().split_once('='))
                        .any(|(key, _)| key == name)
                })
            })
    }

    pub async fn get(&self, path: &str, referer: Referer) -> Result<String, GrdfError> {
        let url = self.url(path)?;
        let response = self
            .http_client
            .get(url)
            .headers(self.headers(referer))
            .send()
            .await?;
        read_body(response).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        query: &[(&str, &str)],
        payload: &FormPayload,
        referer: Referer,
    ) -> Result<String, GrdfError> {
        let url = self.url(path)?;
        let response = self
            .http_client
            .post(url)
            .query(query)
            .headers(self.headers(referer))
            .form(payload)
            .send()
            .await?;
        read_body(response).await
    }

    fn url(&self, path: &str) -> Result<Url, GrdfError> {
        self.base_url
            .join(path)
            .map_err(|e| GrdfError::invalid_url(path, e))
    }

    fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    fn headers(&self, referer: Referer) -> HeaderMap {
        let referer_path = match referer {
            Referer::Login => CONNEXION_PATH,
            Referer::Consumption => CONSUMPTION_PATH,
        };
        let origin = self.origin();
        let mut headers: Vec<(&'static str, String)> = vec![
            ("user-agent", USER_AGENT.to_string()),
            ("accept-language", "fr,fr-FR;q=0.8,en;q=0.6".to_string()),
            (
                "accept",
                "application/xml, application/json, text/javascript, */*; q=0.01".to_string(),
            ),
            ("faces-request", "partial/ajax".to_string()),
            ("sec-fetch-site", "same-origin".to_string()),
            ("referer", format!("{}{}", origin, referer_path)),
            ("origin", origin),
        ];
        match referer {
            Referer::Login => headers.push(("sec-fetch-mode", "no-cors".to_string())),
            Referer::Consumption => {
                headers.push(("sec-fetch-mode", "cors".to_string()));
                headers.push(("x-requested-with", "XMLHttpRequest".to_string()));
            }
        }

        headers
            .into_iter()
            .filter_map(|(name, value)| {
                HeaderValue::from_str(&value)
                    .ok()
                    .map(|value| (HeaderName::from_static(name), value))
            })
            .collect()
    }
}

/// Returns the body of a response, or an error for 4xx/5xx statuses.
///
/// Redirects are not followed, so a 3xx is handed back like a success.
async fn read_body(response: Response) -> Result<String, GrdfError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_client_error() || status.is_server_error() {
        return Err(GrdfError::server_error(status, body));
    }
    Ok(body)
}
