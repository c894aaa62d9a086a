//! The page and endpoint for creating a new user account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    endpoints,
    forms::empty_string_as_none,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    outlet::{Outlet, OutletId, get_all_outlets},
    user::{CurrentUser, NewUser, Role, create_user},
};

use super::form::{UserFormDefaults, user_form_fields};

/// The state needed to create a user.
#[derive(Debug, Clone)]
pub struct CreateUserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn create_user_view(available_outlets: &[Outlet], current_user: &CurrentUser) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_USER_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_USER)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New User" }

                (user_form_fields(
                    &UserFormDefaults {
                        role: Some(Role::Kasir),
                        ..Default::default()
                    },
                    available_outlets,
                ))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create User"
                }
            }
        }
    };

    base("Create User", &[], &content)
}

/// Display the form for creating a new user.
pub async fn get_new_user_page(
    State(state): State<CreateUserState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let available_outlets = get_all_outlets(&connection)
        .inspect_err(|error| tracing::error!("could not get all outlets: {error}"))?;

    Ok(create_user_view(&available_outlets, &current_user).into_response())
}

/// The form data for creating a user.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    /// The name the user will log in with.
    pub username: String,
    /// The user's full name.
    pub full_name: String,
    /// The password to set.
    pub password: String,
    /// What the user is allowed to see and do.
    pub role: Role,
    /// The outlet a kasir is attached to.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub outlet_id: Option<OutletId>,
}

/// A route handler for creating a new user, redirects to the users view on success.
pub async fn create_user_endpoint(
    State(state): State<CreateUserState>,
    Form(form): Form<UserForm>,
) -> Response {
    let validated_password = match ValidatedPassword::new(&form.password) {
        Ok(password) => password,
        Err(error) => return error.into_alert_response(),
    };

    let password_hash = match PasswordHash::new(validated_password) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("could not hash password: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_user = NewUser {
        username: form.username,
        password_hash,
        full_name: form.full_name,
        role: form.role,
        outlet_id: form.outlet_id,
    };

    if let Err(error) = create_user(new_user, &connection) {
        tracing::error!("Could not create user: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::USERS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod create_user_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        user::{Role, count_users, get_user_by_username},
    };

    use super::{CreateUserState, UserForm, create_user_endpoint};

    fn get_test_state() -> CreateUserState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateUserState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn creates_user_and_redirects() {
        let state = get_test_state();

        let response = create_user_endpoint(
            State(state.clone()),
            Form(UserForm {
                username: "siti".to_owned(),
                full_name: "Siti Rahayu".to_owned(),
                password: "correcthorsebatterystaple".to_owned(),
                role: Role::Kasir,
                outlet_id: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::USERS_VIEW
        );

        let connection = state.db_connection.lock().unwrap();
        let user = get_user_by_username("siti", &connection).unwrap();
        assert_eq!(user.role, Role::Kasir);
        assert!(user.password_hash.verify("correcthorsebatterystaple").unwrap());
    }

    #[tokio::test]
    async fn rejects_weak_password() {
        let state = get_test_state();

        let response = create_user_endpoint(
            State(state.clone()),
            Form(UserForm {
                username: "siti".to_owned(),
                full_name: "Siti Rahayu".to_owned(),
                password: "password".to_owned(),
                role: Role::Kasir,
                outlet_id: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_users(&connection), Ok(0));
    }
}
