//! Session/token transport cookies.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

use fieldstock_auth::{session, SessionRecord, SESSION_TTL_DAYS};

pub const SESSION_COOKIE: &str = "session";
pub const TOKEN_COOKIE: &str = "token";

fn transport_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

fn cleared_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(Duration::seconds(0))
        .build()
}

/// Attach freshly issued session/token cookies to a response.
pub fn set_transport_cookies(
    headers: &mut HeaderMap,
    record: &SessionRecord,
    bearer: &str,
    secure: bool,
) {
    append(
        headers,
        transport_cookie(SESSION_COOKIE, session::encode(record), secure),
    );
    append(
        headers,
        transport_cookie(TOKEN_COOKIE, bearer.to_string(), secure),
    );
}

/// Instruct the transport to discard both cookies (logout).
pub fn clear_transport_cookies(headers: &mut HeaderMap, secure: bool) {
    append(headers, cleared_cookie(SESSION_COOKIE, secure));
    append(headers, cleared_cookie(TOKEN_COOKIE, secure));
}

fn append(headers: &mut HeaderMap, cookie: Cookie<'static>) {
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        headers.append(header::SET_COOKIE, value);
    }
}
