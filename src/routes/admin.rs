use crate::{
    error::{AuthError, Error},
    intake::IntakeManager,
    routes::{session_cookie, session_id_from_cookies},
};
use axum::{
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Extension, Json,
};
use axum_extra::{headers::Cookie, TypedHeader};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

///POST /api/auth/login — single configured admin, argon2-hashed password.
///401 is deliberately detail-free; a missing admin section is the
///operator's problem and surfaces as 500.
pub async fn admin_login_route(
    Extension(manager): Extension<Arc<IntakeManager>>,
    cookies: Option<TypedHeader<Cookie>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    match manager.validate_admin_credentials(&request.email, &request.password) {
        Ok(()) => {
            let session_id = session_id_from_cookies(&cookies, &manager.config.server.cookie_name);
            let session_id = manager.sessions.grant_admin(session_id).await;
            info!("admin authenticated: {}", request.email);
            (
                AppendHeaders([(SET_COOKIE, session_cookie(&manager, session_id))]),
                Json(json!({ "ok": true })),
            )
                .into_response()
        }
        Err(Error::Auth(AuthError::InvalidCredentials)) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "ok": false, "error": "invalid-credentials" })),
        )
            .into_response(),
        Err(err) => {
            warn!("admin login failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false })),
            )
                .into_response()
        }
    }
}
