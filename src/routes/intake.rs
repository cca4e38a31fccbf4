use crate::{
    intake::{IntakeManager, SubmissionOutcome},
    routes::session_id_from_cookies,
    validate::{Rejection, SubmissionType},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::{headers::Cookie, TypedHeader};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

///POST /api/rsvp — wire contract kept from the original site: `{ok:true}`
///on success, 400 with `invalid-code` / `missing-fields` otherwise.
pub async fn submit_rsvp_route(
    Extension(manager): Extension<Arc<IntakeManager>>,
    cookies: Option<TypedHeader<Cookie>>,
    Json(body): Json<Value>,
) -> Response {
    match handle_submission(&manager, &cookies, SubmissionType::Rsvp, &body).await {
        Ok(SubmissionOutcome::Accepted(_)) => Json(json!({ "ok": true })).into_response(),
        Ok(SubmissionOutcome::Rejected(rejection)) => {
            let error = match rejection {
                Rejection::InvalidCode => "invalid-code",
                Rejection::MissingFields(_) => "missing-fields",
                Rejection::InvalidEmail => "invalid-email",
                Rejection::Rejected => "invalid-request",
            };
            bad_request(json!({ "ok": false, "error": error }))
        }
        Err(response) => response,
    }
}

///POST /api/request | /api/requests — concierge submissions. The honeypot
///answer is the same generic 400 a malformed body gets.
pub async fn submit_request_route(
    Extension(manager): Extension<Arc<IntakeManager>>,
    cookies: Option<TypedHeader<Cookie>>,
    Json(body): Json<Value>,
) -> Response {
    match handle_submission(&manager, &cookies, SubmissionType::ConciergeRequest, &body).await {
        Ok(outcome) => detailed_outcome_response(outcome),
        Err(response) => response,
    }
}

///POST /api/applications — membership applications; rejections name the
///missing fields.
pub async fn submit_application_route(
    Extension(manager): Extension<Arc<IntakeManager>>,
    cookies: Option<TypedHeader<Cookie>>,
    Json(body): Json<Value>,
) -> Response {
    match handle_submission(&manager, &cookies, SubmissionType::Application, &body).await {
        Ok(outcome) => detailed_outcome_response(outcome),
        Err(response) => response,
    }
}

async fn handle_submission(
    manager: &Arc<IntakeManager>,
    cookies: &Option<TypedHeader<Cookie>>,
    kind: SubmissionType,
    body: &Value,
) -> Result<SubmissionOutcome, Response> {
    let Some(raw) = body.as_object() else {
        return Err(bad_request(json!({ "ok": false, "error": "invalid-request" })));
    };
    let session_id = session_id_from_cookies(cookies, &manager.config.server.cookie_name);
    let context = manager.sessions.context(session_id).await;
    manager.submit(kind, raw, &context).await.map_err(|err| {
        warn!("{} submission failed: {}", kind, err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false })),
        )
            .into_response()
    })
}

fn detailed_outcome_response(outcome: SubmissionOutcome) -> Response {
    match outcome {
        SubmissionOutcome::Accepted(receipt) => {
            Json(json!({ "ok": true, "id": receipt.id })).into_response()
        }
        SubmissionOutcome::Rejected(Rejection::MissingFields(fields)) => bad_request(json!({
            "ok": false,
            "error": "missing required fields",
            "missing": fields,
        })),
        SubmissionOutcome::Rejected(Rejection::InvalidEmail) => {
            bad_request(json!({ "ok": false, "error": "invalid-email" }))
        }
        SubmissionOutcome::Rejected(Rejection::InvalidCode | Rejection::Rejected) => {
            bad_request(json!({ "ok": false, "error": "invalid-request" }))
        }
    }
}

fn bad_request(body: Value) -> Response {
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
