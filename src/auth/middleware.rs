//! Authentication middleware that validates cookies, attaches the current
//! user to requests, extends sessions, and handles redirects, plus the role
//! gates layered on top of it.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState,
    auth::{
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::{build_log_in_redirect_url, build_log_in_redirect_url_from_target},
    },
    endpoints,
    timezone::get_local_offset,
    user::{CurrentUser, Role, get_user_by_id},
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
    /// The database connection for looking up the authenticated user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid authorization cookie.
/// The current user is placed into the request and then the request executed normally if the
/// cookie is valid, otherwise a redirect to the log-in page is returned using `get_redirect`.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(current_user): Extension<CurrentUser>` to receive the authenticated user.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request).unwrap_or_else(|| {
        if request.uri().path().starts_with("/api") {
            tracing::warn!(
                "Missing or invalid HTMX headers for /api request. Falling back to dashboard."
            );
        } else {
            tracing::warn!("Invalid redirect URL from request URI. Falling back to dashboard.");
        }

        build_log_in_redirect_url_from_target(endpoints::DASHBOARD_VIEW)
            .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
    });
    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => {
            tracing::error!("Error getting local timezone. Redirecting to log in page.");
            return get_redirect(&log_in_redirect_url);
        }
    };

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect(&log_in_redirect_url);
        }
    };
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(_) => return get_redirect(&log_in_redirect_url),
    };

    let current_user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!(
                    "could not acquire database lock: {error}. Redirecting to log in page."
                );
                return get_redirect(&log_in_redirect_url);
            }
        };

        match get_user_by_id(user_id, &connection) {
            Ok(user) => CurrentUser::from(&user),
            Err(_) => return get_redirect(&log_in_redirect_url),
        }
    };

    parts.extensions.insert(current_user);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(
        jar.clone(),
        Duration::minutes(5),
        local_offset,
    ) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware function that checks for a valid authorization cookie.
/// The current user is placed into the request and then the request executed normally if the
/// cookie is valid, otherwise a redirect to the log-in page is returned.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for a valid authorization cookie.
/// The current user is placed into the request and then the request executed normally if the
/// cookie is valid, otherwise a HTMX redirect to the log-in page is returned.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

fn role_guard(request: Request, allowed: impl Fn(Role) -> bool) -> Result<Request, Response> {
    match request.extensions().get::<CurrentUser>() {
        Some(current_user) if allowed(current_user.role) => Ok(request),
        Some(current_user) => {
            tracing::warn!(
                "User {} with role {} denied access to {}",
                current_user.username,
                current_user.role,
                request.uri().path()
            );
            Err(Redirect::to(endpoints::DASHBOARD_VIEW).into_response())
        }
        None => Err(Redirect::to(endpoints::LOG_IN_VIEW).into_response()),
    }
}

/// Middleware that only lets admin users through.
///
/// Must be layered inside [auth_guard] so that the current user extension is
/// present.
pub async fn admin_guard(request: Request, next: Next) -> Response {
    match role_guard(request, |role| role == Role::Admin) {
        Ok(request) => next.run(request).await,
        Err(response) => response,
    }
}

/// Middleware that lets admin and kasir users through.
///
/// Must be layered inside [auth_guard] so that the current user extension is
/// present.
pub async fn staff_guard(request: Request, next: Next) -> Response {
    match role_guard(request, |role| matches!(role, Role::Admin | Role::Kasir)) {
        Ok(request) => next.run(request).await,
        Err(response) => response,
    }
}
