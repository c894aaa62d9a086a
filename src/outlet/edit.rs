//! The page and endpoint for editing an existing outlet.

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

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    outlet::{Outlet, OutletId, create::OutletForm, map_row_to_outlet},
    user::CurrentUser,
};

use super::form::{OutletFormDefaults, outlet_form_fields};

/// The state needed to display the edit outlet page and update an outlet.
#[derive(Debug, Clone)]
pub struct EditOutletState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditOutletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_outlet_view(outlet: &Outlet, current_user: &CurrentUser) -> Markup {
    let update_url = format_endpoint(endpoints::PUT_OUTLET, outlet.id);
    let nav_bar = NavBar::new(endpoints::OUTLETS_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();
    let defaults = OutletFormDefaults {
        name: Some(&outlet.name),
        address: Some(&outlet.address),
        phone: outlet.phone.as_deref(),
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
                h2 class="text-xl font-bold" { "Edit Outlet" }

                (outlet_form_fields(&defaults))

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

    base("Edit Outlet", &[], &content)
}

/// Display the form for editing an existing outlet.
pub async fn get_edit_outlet_page(
    State(state): State<EditOutletState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(outlet_id): Path<OutletId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let outlet = get_outlet(outlet_id, &connection)
        .inspect_err(|error| tracing::error!("could not get outlet {outlet_id}: {error}"))?;

    Ok(edit_outlet_view(&outlet, &current_user).into_response())
}

pub(super) fn get_outlet(id: OutletId, connection: &Connection) -> Result<Outlet, Error> {
    connection
        .query_one(
            "SELECT id, name, address, phone FROM outlet WHERE id = ?1",
            params![id],
            map_row_to_outlet,
        )
        .map_err(Error::from)
}

/// A route handler for updating an outlet, redirects to the outlets view on success.
pub async fn update_outlet_endpoint(
    State(state): State<EditOutletState>,
    Path(outlet_id): Path<OutletId>,
    Form(form): Form<OutletForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_outlet(outlet_id, &form, &connection) {
        Ok(rows_affected) if rows_affected != 0 => (
            HxRedirect(endpoints::OUTLETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(_) => Error::UpdateMissingOutlet.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update outlet {outlet_id} with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn update_outlet(
    id: OutletId,
    form: &OutletForm,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE outlet SET name = ?1, address = ?2, phone = ?3 WHERE id = ?4",
            params![form.name, form.address, form.phone, id],
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 2067 =>
            {
                Error::DuplicateOutletName(form.name.clone())
            }
            error => error.into(),
        })
}

#[cfg(test)]
mod update_outlet_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        outlet::create::{OutletForm, create_outlet},
    };

    use super::{get_outlet, update_outlet};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn updates_existing_outlet() {
        let connection = get_test_connection();
        let outlet = create_outlet(
            &OutletForm {
                name: "Outlet Pusat".to_owned(),
                address: "Jl. Sudirman 1".to_owned(),
                phone: None,
            },
            &connection,
        )
        .unwrap();

        let rows_affected = update_outlet(
            outlet.id,
            &OutletForm {
                name: "Outlet Pusat".to_owned(),
                address: "Jl. Thamrin 10".to_owned(),
                phone: Some("021-555-0101".to_owned()),
            },
            &connection,
        )
        .unwrap();

        assert_eq!(rows_affected, 1);
        let updated = get_outlet(outlet.id, &connection).unwrap();
        assert_eq!(updated.address, "Jl. Thamrin 10");
        assert_eq!(updated.phone.as_deref(), Some("021-555-0101"));
    }

    #[test]
    fn updating_missing_outlet_affects_no_rows() {
        let connection = get_test_connection();

        let rows_affected = update_outlet(
            42,
            &OutletForm {
                name: "Nowhere".to_owned(),
                address: "Jl. Hilang".to_owned(),
                phone: None,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(rows_affected, 0);
    }
}
