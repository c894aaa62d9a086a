//! Displays user accounts and handles user deletion.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
    user::{CurrentUser, Role, UserId},
};

/// The state needed for the user list page and the delete endpoint.
#[derive(Debug, Clone)]
pub struct UserListState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The user data to display in the view
#[derive(Debug, PartialEq)]
struct UserTableRow {
    username: String,
    full_name: String,
    role: Role,
    outlet_name: Option<String>,
    edit_url: String,
    delete_url: String,
}

fn users_view(users: &[UserTableRow], current_user: &CurrentUser) -> Markup {
    let create_user_page_url = endpoints::NEW_USER_VIEW;
    let nav_bar = NavBar::new(endpoints::USERS_VIEW, current_user.role).into_html();

    let table_row = |user: &UserTableRow| {
        let action_links = edit_delete_action_links(
            &user.edit_url,
            &user.delete_url,
            &format!(
                "Are you sure you want to delete the user '{}'? This cannot be undone.",
                user.username
            ),
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (user.username)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (user.full_name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(STATUS_BADGE_STYLE) { (user.role.label()) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (user.outlet_name.as_deref().unwrap_or("-"))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Users" }

                    a href=(create_user_page_url) class=(LINK_STYLE)
                    {
                        "Add User"
                    }
                }

                section class="w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Username" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Full Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Role" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Outlet" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for user in users {
                                (table_row(user))
                            }
                        }
                    }
                }
            }
        }
    );

    base("Users", &[], &content)
}

/// Renders the users page showing all user accounts.
pub async fn get_users_page(
    State(state): State<UserListState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let users = get_user_rows(&connection)
        .inspect_err(|error| tracing::error!("could not get all users: {error}"))?;

    Ok(users_view(&users, &current_user).into_response())
}

fn get_user_rows(connection: &Connection) -> Result<Vec<UserTableRow>, Error> {
    connection
        .prepare(
            "SELECT u.id, u.username, u.full_name, u.role, outlet.name
            FROM user u
            LEFT JOIN outlet ON outlet.id = u.outlet_id
            ORDER BY u.username ASC;",
        )?
        .query_map([], |row| {
            let id: i64 = row.get(0)?;

            Ok(UserTableRow {
                username: row.get(1)?,
                full_name: row.get(2)?,
                role: row.get(3)?,
                outlet_name: row.get(4)?,
                edit_url: format_endpoint(endpoints::EDIT_USER_VIEW, id),
                delete_url: format_endpoint(endpoints::DELETE_USER, id),
            })
        })?
        .map(|user_result| user_result.map_err(Error::from))
        .collect()
}

/// A route handler for deleting a user, responds with an alert.
///
/// Users cannot delete their own account, otherwise an admin could lock
/// themselves out mid-session.
pub async fn delete_user_endpoint(
    State(state): State<UserListState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
) -> Response {
    if UserId::new(user_id) == current_user.id {
        return Alert::error(
            "Could not delete user",
            "You cannot delete the account you are logged in with.",
        )
        .into_response_with_status(axum::http::StatusCode::BAD_REQUEST);
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_user(UserId::new(user_id), &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => {
            Alert::success("User deleted successfully").into_response()
        }
        Ok(_) => Error::DeleteMissingUser.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_user(id: UserId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM user WHERE id = :id", &[(":id", &id.as_i64())])
        .map_err(Error::from)
}
