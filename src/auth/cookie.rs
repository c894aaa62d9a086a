//! Defines functions for handling user authentication with a signed token cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, auth::Token, user::UserId};

pub(crate) const COOKIE_TOKEN: &str = "token";

/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

fn build_token_cookie(token: &Token) -> Result<Cookie<'static>, Error> {
    let token_string = serde_json::to_string(token)
        .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

    Ok(Cookie::build((COOKIE_TOKEN, token_string))
        .expires(token.expires_at)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build())
}

/// Add an auth cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// Sets the initial expiry of the cookie to `duration` from the current time
/// in the timezone given by `local_offset`.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns [Error::JsonSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserId,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc().to_offset(local_offset) + duration;
    let token = Token {
        user_id,
        expires_at,
    };

    Ok(jar.add(build_token_cookie(&token)?))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read and validate the auth token from the cookie jar.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if there is no token cookie.
/// - [Error::InvalidToken] if the token cannot be parsed or has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;

    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidToken)?;

    if token.expires_at < OffsetDateTime::now_utc() {
        return Err(Error::InvalidToken);
    }

    Ok(token)
}

/// Set the expiry of the auth cookie in `jar` to the latest of now
/// plus `duration` and the token's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::CookieMissing] or [Error::InvalidToken] if there is no valid token cookie.
/// - [Error::JsonSerializationError] if the updated token cannot be serialized.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc().to_offset(local_offset) + duration;
    let token = Token {
        user_id: token.user_id,
        expires_at: max(token.expires_at, new_expiry),
    };

    Ok(jar.add(build_token_cookie(&token)?))
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{Error, user::UserId};

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
        get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let key = Key::from(&Sha512::digest("42"));
        PrivateCookieJar::new(key)
    }

    #[test]
    fn set_auth_cookie_roundtrips_token() {
        let jar = set_auth_cookie(
            get_jar(),
            UserId::new(123),
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.user_id, UserId::new(123));
        assert!(token.expires_at > OffsetDateTime::now_utc());
    }

    #[test]
    fn missing_cookie_returns_cookie_missing() {
        let jar = get_jar();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::CookieMissing));
    }

    #[test]
    fn garbage_cookie_returns_invalid_token() {
        let jar = get_jar().add(Cookie::build((COOKIE_TOKEN, "FOOBAR")).build());

        assert_eq!(get_token_from_cookies(&jar), Err(Error::InvalidToken));
    }

    #[test]
    fn expired_token_returns_invalid_token() {
        let jar = set_auth_cookie(
            get_jar(),
            UserId::new(1),
            Duration::minutes(-5),
            UtcOffset::UTC,
        )
        .unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::InvalidToken));
    }

    #[test]
    fn invalidate_auth_cookie_expires_cookie() {
        let jar = set_auth_cookie(
            get_jar(),
            UserId::new(1),
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
    }

    #[test]
    fn extend_pushes_expiry_forward() {
        let jar = set_auth_cookie(
            get_jar(),
            UserId::new(1),
            Duration::seconds(5),
            UtcOffset::UTC,
        )
        .unwrap();
        let short_expiry = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), UtcOffset::UTC)
                .unwrap();
        let extended_expiry = get_token_from_cookies(&jar).unwrap().expires_at;

        assert!(extended_expiry > short_expiry);
    }

    #[test]
    fn extend_never_shortens_expiry() {
        let jar = set_auth_cookie(
            get_jar(),
            UserId::new(1),
            Duration::hours(1),
            UtcOffset::UTC,
        )
        .unwrap();
        let long_expiry = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), UtcOffset::UTC)
                .unwrap();
        let got_expiry = get_token_from_cookies(&jar).unwrap().expires_at;

        assert_eq!(got_expiry, long_expiry);
    }
}
