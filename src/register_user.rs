//! The first-run registration page for creating the initial admin account.
//!
//! Registration is only available while the user table is empty. Once the
//! first admin exists, further accounts are created from the user management
//! pages.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    app_state::create_cookie_key,
    auth::{DEFAULT_COOKIE_DURATION, set_auth_cookie},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner, log_in_register,
        password_input,
    },
    timezone::get_local_offset,
    user::{NewUser, Role, count_users, create_user},
};

/// The minimum number of characters the password should have to be considered valid on the client
/// side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

fn text_input(name: &str, label: &str, placeholder: &str) -> Markup {
    html! {
        div
        {
            label
                for=(name)
                class=(FORM_LABEL_STYLE)
            {
                (label)
            }

            input
                type="text"
                name=(name)
                id=(name)
                placeholder=(placeholder)
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }
    }
}

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

fn registration_form(
    password_error_message: Option<&str>,
    confirm_password_error_message: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (text_input("username", "Username", "Username"))
            (text_input("full_name", "Full Name", "Full name"))
            (password_input("", PASSWORD_INPUT_MIN_LENGTH, password_error_message))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, confirm_password_error_message))

            button
                type="submit" id="submit-button" tabindex="0"
                class="w-full px-4 py-2 bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700
                    hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700 text-white rounded"
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Admin Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already set up? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// The state needed for creating the first admin account.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: time::Duration,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl RegistrationState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(
        cookie_secret: &str,
        local_timezone: &str,
        db_connection: Arc<Mutex<Connection>>,
    ) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection,
        }
    }
}

impl FromRef<AppState> for RegistrationState {
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
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// Display the registration page, or redirect to the log-in page once an
/// account already exists.
pub async fn get_register_page(State(state): State<RegistrationState>) -> Response {
    match count_registered_users(&state) {
        Ok(0) => {}
        Ok(_) => return Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
        Err(error) => return error.into_response(),
    }

    let registration_form = registration_form(None, None);
    let content = log_in_register("Create the admin account", &registration_form);
    base("Register", &[], &content).into_response()
}

fn count_registered_users(state: &RegistrationState) -> Result<i64, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    count_users(&connection)
}

/// The form data for creating the first admin account.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The name the admin will log in with.
    pub username: String,
    /// The admin's full name.
    pub full_name: String,
    /// The password to set.
    pub password: String,
    /// A repeat of the password to catch typos.
    pub confirm_password: String,
}

/// Create the first admin account and log them in.
///
/// Responds with the registration form and an error message if the passwords
/// do not match or the password is too weak.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.confirm_password {
        return registration_form(None, Some("Passwords do not match."))
            .into_response();
    }

    let validated_password = match ValidatedPassword::new(&form.password) {
        Ok(password) => password,
        Err(Error::TooWeak(details)) => {
            return registration_form(Some(&details), None).into_response();
        }
        Err(error) => return error.into_response(),
    };

    let password_hash = match PasswordHash::new(validated_password) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("could not hash password: {error}");
            return error.into_response();
        }
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match count_users(&connection) {
            Ok(0) => {}
            Ok(_) => return Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Err(error) => return error.into_response(),
        }

        match create_user(
            NewUser {
                username: form.username,
                password_hash,
                full_name: form.full_name,
                role: Role::Admin,
                outlet_id: None,
            },
            &connection,
        ) {
            Ok(user) => user,
            Err(error) => {
                tracing::error!("could not create user: {error}");
                return error.into_response();
            }
        }
    };

    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_response(),
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            updated_jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::State,
        http::StatusCode,
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};

    use crate::{
        db::initialize,
        endpoints,
        user::{count_users, get_user_by_username},
    };

    use super::{RegisterForm, RegistrationState, register_user};

    fn get_test_state() -> RegistrationState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        RegistrationState::new("foobar", "Etc/UTC", Arc::new(Mutex::new(connection)))
    }

    fn get_jar() -> PrivateCookieJar {
        let key = Key::from(&Sha512::digest("foobar"));
        PrivateCookieJar::new(key)
    }

    #[tokio::test]
    async fn creates_admin_and_redirects_to_dashboard() {
        let state = get_test_state();

        let response = register_user(
            State(state.clone()),
            get_jar(),
            Form(RegisterForm {
                username: "admin".to_owned(),
                full_name: "Admin Utama".to_owned(),
                password: "correcthorsebatterystaple".to_owned(),
                confirm_password: "correcthorsebatterystaple".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DASHBOARD_VIEW
        );

        let connection = state.db_connection.lock().unwrap();
        let user = get_user_by_username("admin", &connection).unwrap();
        assert_eq!(user.role, crate::user::Role::Admin);
    }

    #[tokio::test]
    async fn rejects_mismatched_passwords() {
        let state = get_test_state();

        let response = register_user(
            State(state.clone()),
            get_jar(),
            Form(RegisterForm {
                username: "admin".to_owned(),
                full_name: "Admin Utama".to_owned(),
                password: "correcthorsebatterystaple".to_owned(),
                confirm_password: "somethingelseentirely".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_users(&connection), Ok(0));
    }

    #[tokio::test]
    async fn rejects_weak_password() {
        let state = get_test_state();

        let response = register_user(
            State(state.clone()),
            get_jar(),
            Form(RegisterForm {
                username: "admin".to_owned(),
                full_name: "Admin Utama".to_owned(),
                password: "password".to_owned(),
                confirm_password: "password".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_users(&connection), Ok(0));
    }
}
