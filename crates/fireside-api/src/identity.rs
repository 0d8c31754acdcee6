//! Per-browser player identity.
//!
//! A player is whoever holds the `user_id` cookie. Requests without one, or
//! with a value that is not a UUID, get a fresh identifier, which is sent
//! back so the browser keeps it. Identities become segments of dotted
//! document paths, so only server-issued shapes are accepted.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

pub const COOKIE_NAME: &str = "user_id";

/// Returns the caller's identity, issuing one if the jar has no valid one.
#[must_use]
pub fn identify(jar: CookieJar) -> (CookieJar, String) {
    if let Some(id) = jar
        .get(COOKIE_NAME)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    {
        return (jar, id.to_string());
    }

    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((COOKIE_NAME, id.clone()))
        .path("/")
        .permanent()
        .build();
    (jar.add(cookie), id)
}
