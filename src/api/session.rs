use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::auth::{LOGIN_PATH, SESSION_COOKIE};
use crate::stores::AuthSession;

/// Sends every request to the login page unless it carries the `session`
/// cookie issued to the signed-in user. The login page itself is public.
pub async fn require_session(
    State(session): State<AuthSession>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if path == LOGIN_PATH {
        return next.run(request).await;
    }

    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty());
    match token {
        Some(token) if session.accepts_session_token(&token) => next.run(request).await,
        Some(_) => {
            warn!("unrecognized session cookie for {}, redirecting to login", path);
            redirect_to_login()
        }
        None => {
            debug!("no session cookie for {}, redirecting to login", path);
            redirect_to_login()
        }
    }
}

fn redirect_to_login() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, LOGIN_PATH)]).into_response()
}
