use crate::{
    intake::IntakeManager,
    percent_encode_component,
    routes::{session_cookie, session_id_from_cookies},
};
use axum::{
    extract::Query,
    http::{
        header::{LOCATION, SET_COOKIE},
        StatusCode,
    },
    response::{AppendHeaders, IntoResponse, Response},
    Extension, Json,
};
use axum_extra::{headers::Cookie, TypedHeader};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub code: Option<String>,
}

///POST /api/verify-code — low-detail by design: a wrong code, a missing
///body, and a malformed one all get the same 200 `{ok:false}`.
pub async fn verify_code_route(
    Extension(manager): Extension<Arc<IntakeManager>>,
    cookies: Option<TypedHeader<Cookie>>,
    request: Option<Json<VerifyCodeRequest>>,
) -> Response {
    let code = request
        .and_then(|Json(request)| request.code)
        .unwrap_or_default();
    if !manager.codes.is_valid(&code) {
        return Json(json!({ "ok": false })).into_response();
    }
    let session_id = session_id_from_cookies(&cookies, &manager.config.server.cookie_name);
    let session_id = manager
        .sessions
        .unlock_with_code(session_id, crate::access_code::AccessCodeRegistry::normalize(&code))
        .await;
    (
        AppendHeaders([(SET_COOKIE, session_cookie(&manager, session_id))]),
        Json(json!({ "ok": true })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct InviteQuery {
    ///signed invite token
    #[serde(default)]
    pub t: Option<String>,
    ///access code to prefill
    #[serde(default)]
    pub c: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

///GET /invite?t=&c=&name= — redeems a signed invite and forwards the guest
///to the RSVP page with code/name prefilled. An invalid or expired token is
///a plain 404, indistinguishable from a missing page.
pub async fn redeem_invite_route(
    Extension(manager): Extension<Arc<IntakeManager>>,
    cookies: Option<TypedHeader<Cookie>>,
    Query(query): Query<InviteQuery>,
) -> Response {
    let payload = match query.t.as_deref().and_then(|token| manager.verify_invite(token)) {
        Some(payload) => payload,
        None => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    let session_id = session_id_from_cookies(&cookies, &manager.config.server.cookie_name);
    let session_id = manager
        .sessions
        .unlock_with_invite(session_id, payload.email)
        .await;

    let mut params: Vec<String> = Vec::new();
    if let Some(code) = query.c.as_deref().filter(|code| !code.is_empty()) {
        params.push(format!("code={}", percent_encode_component(code)));
    }
    if let Some(name) = query.name.as_deref().filter(|name| !name.is_empty()) {
        params.push(format!("name={}", percent_encode_component(name)));
    }
    let location = if params.is_empty() {
        "/rsvp".to_string()
    } else {
        format!("/rsvp?{}", params.join("&"))
    };

    (
        StatusCode::FOUND,
        AppendHeaders([
            (LOCATION, location),
            (SET_COOKIE, session_cookie(&manager, session_id)),
        ]),
    )
        .into_response()
}
