pub mod admin;
pub mod base;
pub mod gate;
pub mod intake;

use crate::intake::IntakeManager;
use axum_extra::{headers::Cookie, TypedHeader};
use cookie::{CookieBuilder, SameSite};
use uuid::Uuid;

///Session id carried by the gate cookie, if the client presented one.
pub(crate) fn session_id_from_cookies(
    cookies: &Option<TypedHeader<Cookie>>,
    cookie_name: &str,
) -> Option<Uuid> {
    cookies
        .as_ref()
        .and_then(|TypedHeader(cookie)| cookie.get(cookie_name))
        .and_then(|value| Uuid::parse_str(value).ok())
}

///HTTP-only, SameSite=Lax, max-age pinned to the gate session lifetime.
pub(crate) fn session_cookie(manager: &IntakeManager, session_id: Uuid) -> String {
    let server = &manager.config.server;
    let mut builder = CookieBuilder::new(server.cookie_name.to_owned(), session_id.to_string())
        .http_only(true)
        .secure(server.cookie_secure)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(
            manager.sessions.lifetime_seconds(),
        ));
    if let Some(domain) = &server.cookie_domain {
        builder = builder.domain(domain.to_owned());
    }
    builder.build().to_string()
}
