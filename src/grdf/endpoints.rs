//! Fixed routing of the GrDF portal.
//!
//! Everything here mirrors the portal's current internal layout: Liferay
//! portlet ids, JSF component ids and encoded view-resource paths. When the
//! site is redesigned, this file and `parsing.rs` are the ones to update.

use super::fetch::ConsumptionRequest;
use super::helper::format_portal_date;
use super::session::ViewState;

/// Default public host of the portal.
pub const PORTAL_URL: &str = "https://monespace.grdf.fr";

/// Login portlet page.
pub const LOGIN_PATH: &str = "/web/guest/monespace";

/// Query block addressing the login portlet's AJAX resource.
pub const LOGIN_QUERY: &[(&str, &str)] = &[
    ("p_p_id", "EspacePerso_WAR_EPportlet"),
    ("p_p_lifecycle", "2"),
    ("p_p_state", "normal"),
    ("p_p_mode", "view"),
    ("p_p_cacheability", "cacheLevelPage"),
    ("p_p_col_id", "column-2"),
    ("p_p_col_count", "1"),
    ("_EspacePerso_WAR_EPportlet__jsfBridgeAjax", "true"),
    (
        "_EspacePerso_WAR_EPportlet__facesViewIdResource",
        "/views/espacePerso/seconnecterEspaceViewMode.xhtml",
    ),
];

/// Page the browser lands on before logging in.
pub const CONNEXION_PATH: &str = "/monespace/connexion";

/// Detailed consumption page.
pub const CONSUMPTION_PATH: &str = "/monespace/particulier/consommation/consommations";

/// Query block addressing the detailed consumption portlet's AJAX resource.
pub const CONSUMPTION_QUERY: &[(&str, &str)] = &[
    ("p_p_id", "eConsoconsoDetaille_WAR_eConsoportlet"),
    ("p_p_lifecycle", "2"),
    ("p_p_state", "normal"),
    ("p_p_mode", "view"),
    ("p_p_cacheability", "cacheLevelPage"),
    ("p_p_col_id", "column-3"),
    ("p_p_col_count", "5"),
    ("p_p_col_pos", "3"),
    ("_eConsoconsoDetaille_WAR_eConsoportlet__jsfBridgeAjax", "true"),
    (
        "_eConsoconsoDetaille_WAR_eConsoportlet__facesViewIdResource",
        "/views/conso/detaille/consoDetailleViewMode.xhtml",
    ),
];

/// Cookie the portal uses to remember the last visited page.
pub const SAVED_REF_COOKIE: &str = "KPISavedRef";

/// Cookie issued once the credentials are accepted.
pub const SESSION_COOKIE: &str = "GRDF_EP";

/// Form field carrying the view-state token.
pub const VIEW_STATE_FIELD: &str = "javax.faces.ViewState";

/// Id of the hidden input and of the partial-response update holding the token.
pub const VIEW_STATE_ID: &str = "javax.faces.ViewState";

/// Id of the div wrapping the detailed consumption portlet.
pub const DETAIL_PORTLET_ID: &str = "_eConsoconsoDetaille_WAR_eConsoportlet_";

/// Id of the detailed consumption form.
pub const DETAIL_FORM_ID: &str = "_eConsoconsoDetaille_WAR_eConsoportlet_:idFormConsoDetaille";

/// Script variable holding the comma-separated values.
pub const VALUES_MARKER: &str = "donneesCourante";

/// Script variable holding the comma-separated dates.
pub const TIMES_MARKER: &str = "tooltipDatesInfo";

/// Text shown on the interstitial asking to accept new terms.
pub const TERMS_OF_USE_MARKER: &str = "Conditions d'utilisation";

const LOGIN_FORM: &str = "_EspacePerso_WAR_EPportlet_:seConnecterForm";

const LOGIN_ENCODED_URL: &str = "https://monespace.grdf.fr/web/guest/monespace?p_p_id=EspacePerso_WAR_EPportlet&amp;p_p_lifecycle=2&amp;p_p_state=normal&amp;p_p_mode=view&amp;p_p_cacheability=cacheLevelPage&amp;p_p_col_id=column-2&amp;p_p_col_count=1&amp;_EspacePerso_WAR_EPportlet__jsfBridgeAjax=true&amp;_EspacePerso_WAR_EPportlet__facesViewIdResource=%2Fviews%2FespacePerso%2FseconnecterEspaceViewMode.xhtml";

const DETAIL_ENCODED_URL: &str = "https://monespace.grdf.fr/web/guest/monespace/particulier/consommation/consommations?p_p_id=eConsoconsoDetaille_WAR_eConsoportlet&p_p_lifecycle=2&p_p_state=normal&p_p_mode=view&p_p_cacheability=cacheLevelPage&p_p_col_id=column-3&p_p_col_count=5&p_p_col_pos=3&_eConsoconsoDetaille_WAR_eConsoportlet__jsfBridgeAjax=true&_eConsoconsoDetaille_WAR_eConsoportlet__facesViewIdResource=%2Fviews%2Fconso%2Fdetaille%2FconsoDetailleViewMode.xhtml";

/// A form-encoded request body, kept ordered like the browser sends it.
pub type FormPayload = Vec<(String, String)>;

fn field(name: impl Into<String>, value: impl Into<String>) -> (String, String) {
    (name.into(), value.into())
}

fn detail_field(suffix: &str) -> String {
    format!("{}:{}", DETAIL_FORM_ID, suffix)
}

/// Body of the "se connecter" click, with the token once one is known.
pub fn login_payload(username: &str, password: &str, view_state: Option<&ViewState>) -> FormPayload {
    let mut payload = vec![
        field("javax.faces.partial.ajax", "true"),
        field("javax.faces.source", format!("{}:meConnecter", LOGIN_FORM)),
        field("javax.faces.partial.execute", LOGIN_FORM),
        field(
            "javax.faces.partial.render",
            "EspacePerso_WAR_EPportlet_:global _EspacePerso_WAR_EPportlet_:groupTitre",
        ),
        field("javax.faces.behavior.event", "click"),
        field("javax.faces.partial.event", "click"),
    ];
    if let Some(view_state) = view_state {
        payload.push(field(VIEW_STATE_FIELD, view_state.as_str()));
    }
    payload.extend([
        field(LOGIN_FORM, LOGIN_FORM),
        field("javax.faces.encodedURL", LOGIN_ENCODED_URL),
        field(format!("{}:email", LOGIN_FORM), username),
        field(format!("{}:passwordSecretSeConnecter", LOGIN_FORM), password),
    ]);
    payload
}

/// Body of the click that opens the detailed consumption view.
pub fn detail_view_payload(view_state: &ViewState) -> FormPayload {
    vec![
        field("javax.faces.partial.ajax", "true"),
        field("javax.faces.source", detail_field("j_idt139")),
        field("javax.faces.partial.execute", detail_field("j_idt139")),
        field("javax.faces.partial.render", DETAIL_FORM_ID),
        field("javax.faces.behavior.event", "click"),
        field("javax.faces.partial.event", "click"),
        field(DETAIL_FORM_ID, DETAIL_FORM_ID),
        field("javax.faces.encodedURL", DETAIL_ENCODED_URL),
        field(VIEW_STATE_FIELD, view_state.as_str()),
    ]
}

/// Body of the granularity change that makes the portal render the series.
pub fn granularity_payload(view_state: &ViewState, request: &ConsumptionRequest) -> FormPayload {
    let render = [
        "refreshHighchart",
        "updateDatesBean",
        "boutonTelechargerDonnees",
        "panelTypeGranularite",
        "idBlocSeuilParametrage",
    ]
    .iter()
    .map(|suffix| detail_field(suffix))
    .collect::<Vec<_>>()
    .join(" ");

    let mut payload = vec![
        field("javax.faces.partial.ajax", "true"),
        field("javax.faces.source", detail_field("panelTypeGranularite1:2")),
        field("javax.faces.partial.execute", detail_field("panelTypeGranularite1")),
        field("javax.faces.partial.render", render),
        field("javax.faces.behavior.event", "valueChange"),
        field("javax.faces.partial.event", "change"),
        field(DETAIL_FORM_ID.trim_start_matches('_'), DETAIL_FORM_ID),
        field("javax.faces.encodedURL", DETAIL_ENCODED_URL),
    ];
    if let Some(range) = &request.range {
        payload.push(field(
            detail_field("idDateDebutConsoDetaille"),
            format_portal_date(range.start),
        ));
        payload.push(field(
            detail_field("idDateFinConsoDetaille"),
            format_portal_date(range.end),
        ));
    }
    let unit = request.unit.form_value();
    payload.extend([
        field(detail_field("panelTypeGranularite1"), request.granularity.form_value()),
        field(detail_field("panelTypeGranularite3"), "mois"),
        field(detail_field("selecteurVolumeType2"), unit),
        field(detail_field("selecteurVolumeType4"), unit),
        field(VIEW_STATE_FIELD, view_state.as_str()),
    ]);
    payload
}
