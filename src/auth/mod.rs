//! Cookie-based authentication: signed tokens in a private cookie jar,
//! guards that attach the current user to requests, and role gates.

mod cookie;
mod middleware;
mod redirect;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use middleware::{admin_guard, auth_guard, auth_guard_hx, staff_guard};
pub use redirect::normalize_redirect_url;
pub(crate) use token::Token;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub use middleware::AuthState;
