//! Displays outlets and handles outlet deletion.

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
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    outlet::{Outlet, OutletId, get_all_outlets},
    user::CurrentUser,
};

/// The state needed for the outlet list page and the delete endpoint.
#[derive(Debug, Clone)]
pub struct OutletState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for OutletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn outlets_view(outlets: &[Outlet], current_user: &CurrentUser) -> Markup {
    let create_outlet_page_url = endpoints::NEW_OUTLET_VIEW;
    let nav_bar = NavBar::new(endpoints::OUTLETS_VIEW, current_user.role).into_html();

    let table_row = |outlet: &Outlet| {
        let action_links = edit_delete_action_links(
            &format_endpoint(endpoints::EDIT_OUTLET_VIEW, outlet.id),
            &format_endpoint(endpoints::DELETE_OUTLET, outlet.id),
            &format!(
                "Are you sure you want to delete the outlet '{}'? This cannot be undone.",
                outlet.name
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
                    (outlet.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (outlet.address)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (outlet.phone.as_deref().unwrap_or("-"))
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
                    h1 class="text-xl font-bold" { "Outlets" }

                    a href=(create_outlet_page_url) class=(LINK_STYLE)
                    {
                        "Add Outlet"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Address" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Phone" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for outlet in outlets {
                                (table_row(outlet))
                            }

                            @if outlets.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No outlets found. Create an outlet "
                                        a href=(create_outlet_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Outlets", &[], &content)
}

/// Renders the outlets page showing all outlets.
pub async fn get_outlets_page(
    State(state): State<OutletState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let outlets = get_all_outlets(&connection)
        .inspect_err(|error| tracing::error!("could not get all outlets: {error}"))?;

    Ok(outlets_view(&outlets, &current_user).into_response())
}

/// A route handler for deleting an outlet, responds with an alert.
pub async fn delete_outlet_endpoint(
    State(state): State<OutletState>,
    Path(outlet_id): Path<OutletId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_outlet(outlet_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => {
            Alert::success("Outlet deleted successfully").into_response()
        }
        Ok(_) => Error::DeleteMissingOutlet.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete outlet {outlet_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_outlet(id: OutletId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM outlet WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}


#[cfg(test)]
mod delete_outlet_tests {
    use rusqlite::Connection;

    use crate::{db::initialize, outlet::get_all_outlets};

    use super::delete_outlet;

    #[test]
    fn deletes_outlet() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
            .execute(
                "INSERT INTO outlet (name, address) VALUES ('Outlet Pusat', 'Jl. Sudirman 1')",
                (),
            )
            .unwrap();
        let id = connection.last_insert_rowid();

        let rows_affected = delete_outlet(id, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert!(get_all_outlets(&connection).unwrap().is_empty());
    }
}
