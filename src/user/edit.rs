//! The page and endpoint for editing an existing user account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    endpoints::{self, format_endpoint},
    forms::empty_string_as_none,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    outlet::{Outlet, OutletId, get_all_outlets},
    user::{CurrentUser, Role, User, UserId, get_user_by_id},
};

use super::form::{UserFormDefaults, user_form_fields};

/// The state needed to display the edit user page and update a user.
#[derive(Debug, Clone)]
pub struct EditUserState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_user_view(
    user: &User,
    available_outlets: &[Outlet],
    current_user: &CurrentUser,
) -> Markup {
    let update_url = format_endpoint(endpoints::PUT_USER, user.id.as_i64());
    let nav_bar = NavBar::new(endpoints::USERS_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();
    let defaults = UserFormDefaults {
        username: Some(&user.username),
        full_name: Some(&user.full_name),
        role: Some(user.role),
        outlet_id: user.outlet_id,
        password_is_optional: true,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit User" }

                (user_form_fields(&defaults, available_outlets))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Save Changes"
                }
            }
        }
    };

    base("Edit User", &[], &content)
}

/// Display the form for editing an existing user.
pub async fn get_edit_user_page(
    State(state): State<EditUserState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(UserId::new(user_id), &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let available_outlets = get_all_outlets(&connection)
        .inspect_err(|error| tracing::error!("could not get all outlets: {error}"))?;

    Ok(edit_user_view(&user, &available_outlets, &current_user).into_response())
}

/// The form data for updating a user.
#[derive(Debug, Deserialize)]
pub struct EditUserForm {
    /// The name the user logs in with.
    pub username: String,
    /// The user's full name.
    pub full_name: String,
    /// A new password, or empty to keep the current one.
    #[serde(default)]
    pub password: String,
    /// What the user is allowed to see and do.
    pub role: Role,
    /// The outlet a kasir is attached to.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub outlet_id: Option<OutletId>,
}

/// A route handler for updating a user, redirects to the users view on success.
///
/// An empty password field keeps the user's current password.
pub async fn update_user_endpoint(
    State(state): State<EditUserState>,
    Path(user_id): Path<i64>,
    Form(form): Form<EditUserForm>,
) -> Response {
    let new_password_hash = if form.password.is_empty() {
        None
    } else {
        let validated_password = match ValidatedPassword::new(&form.password) {
            Ok(password) => password,
            Err(error) => return error.into_alert_response(),
        };

        match PasswordHash::new(validated_password) {
            Ok(hash) => Some(hash),
            Err(error) => {
                tracing::error!("could not hash password: {error}");
                return error.into_alert_response();
            }
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_user(UserId::new(user_id), &form, new_password_hash, &connection) {
        Ok(rows_affected) if rows_affected != 0 => (
            HxRedirect(endpoints::USERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(_) => Error::UpdateMissingUser.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn update_user(
    id: UserId,
    form: &EditUserForm,
    new_password_hash: Option<PasswordHash>,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    let map_unique_violation = |error| match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 2067 => {
            Error::DuplicateUsername(form.username.clone())
        }
        error => Error::from(error),
    };

    match new_password_hash {
        Some(password_hash) => connection
            .execute(
                "UPDATE user
                SET username = ?1, full_name = ?2, role = ?3, outlet_id = ?4, password = ?5
                WHERE id = ?6",
                params![
                    form.username,
                    form.full_name,
                    form.role,
                    form.outlet_id,
                    password_hash.as_ref(),
                    id.as_i64(),
                ],
            )
            .map_err(map_unique_violation),
        None => connection
            .execute(
                "UPDATE user
                SET username = ?1, full_name = ?2, role = ?3, outlet_id = ?4
                WHERE id = ?5",
                params![
                    form.username,
                    form.full_name,
                    form.role,
                    form.outlet_id,
                    id.as_i64(),
                ],
            )
            .map_err(map_unique_violation),
    }
}

#[cfg(test)]
mod update_user_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        password::PasswordHash,
        user::{NewUser, Role, create_user, get_user_by_id},
    };

    use super::{EditUserForm, update_user};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn seed_user(connection: &Connection) -> crate::user::User {
        create_user(
            NewUser {
                username: "budi".to_owned(),
                password_hash: PasswordHash::new_unchecked("$2b$12$fakehash"),
                full_name: "Budi Santoso".to_owned(),
                role: Role::Kasir,
                outlet_id: None,
            },
            connection,
        )
        .unwrap()
    }

    #[test]
    fn updates_user_and_keeps_password_when_not_given() {
        let connection = get_test_connection();
        let user = seed_user(&connection);

        let rows_affected = update_user(
            user.id,
            &EditUserForm {
                username: "budi".to_owned(),
                full_name: "Budi S.".to_owned(),
                password: String::new(),
                role: Role::Owner,
                outlet_id: None,
            },
            None,
            &connection,
        )
        .unwrap();

        assert_eq!(rows_affected, 1);
        let updated = get_user_by_id(user.id, &connection).unwrap();
        assert_eq!(updated.full_name, "Budi S.");
        assert_eq!(updated.role, Role::Owner);
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[test]
    fn updates_password_when_given() {
        let connection = get_test_connection();
        let user = seed_user(&connection);
        let new_hash = PasswordHash::new_unchecked("$2b$12$anotherfakehash");

        update_user(
            user.id,
            &EditUserForm {
                username: "budi".to_owned(),
                full_name: "Budi Santoso".to_owned(),
                password: "ignored here".to_owned(),
                role: Role::Kasir,
                outlet_id: None,
            },
            Some(new_hash.clone()),
            &connection,
        )
        .unwrap();

        let updated = get_user_by_id(user.id, &connection).unwrap();
        assert_eq!(updated.password_hash, new_hash);
    }
}
