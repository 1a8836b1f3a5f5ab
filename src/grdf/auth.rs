use crate::error::GrdfError;
use crate::grdf::endpoints::{
    login_payload, CONNEXION_PATH, LOGIN_PATH, LOGIN_QUERY, SESSION_COOKIE,
};
use crate::grdf::fetch::refresh_view_state;
use crate::grdf::parsing::parse_partial_response_view_state;
use crate::grdf::session::{Referer, Session};

/// Logs a fresh session into the portal.
///
/// The login form is posted twice: the first post only hands out the token,
/// the second one carries it together with the credentials. The portal answers
/// both with a 200 whatever the credentials, so success is judged by the
/// session cookie it issues.
///
/// # Errors
/// * [`GrdfError::LoginFailed`] - no session cookie after the second post
/// * [`GrdfError::Parse`] - the first post did not return a token
pub async fn login(session: &mut Session, username: &str, password: &str) -> Result<(), GrdfError> {
    session.set_saved_ref(CONNEXION_PATH)?;
    session.get(LOGIN_PATH, Referer::Login).await?;

    let response = session
        .post_form(
            LOGIN_PATH,
            LOGIN_QUERY,
            &login_payload(username, password, None),
            Referer::Login,
        )
        .await?;
    let view_state = parse_partial_response_view_state(&response)?;

    let response = session
        .post_form(
            LOGIN_PATH,
            LOGIN_QUERY,
            &login_payload(username, password, Some(&view_state)),
            Referer::Login,
        )
        .await?;
    session.set_view_state(view_state);
    refresh_view_state(session, &response);

    if !session.has_cookie(SESSION_COOKIE) {
        tracing::error!("Login unsuccessful: no {} cookie issued", SESSION_COOKIE);
        return Err(GrdfError::LoginFailed);
    }

    tracing::debug!("Logged into {}", session.base_url());
    Ok(())
}
