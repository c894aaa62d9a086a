//! The page and endpoint for editing an existing service package.

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
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner, rupiah_input_styles,
    },
    navigation::NavBar,
    outlet::{Outlet, get_all_outlets},
    package::{Package, PackageId, create::PackageForm, map_row_to_package},
    user::CurrentUser,
};

use super::form::{PackageFormDefaults, package_form_fields};

/// The state needed to display the edit package page and update a package.
#[derive(Debug, Clone)]
pub struct EditPackageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPackageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_package_view(
    package: &Package,
    available_outlets: &[Outlet],
    current_user: &CurrentUser,
) -> Markup {
    let update_url = format_endpoint(endpoints::PUT_PACKAGE, package.id);
    let nav_bar = NavBar::new(endpoints::PACKAGES_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();
    let defaults = PackageFormDefaults {
        name: Some(&package.name),
        kind: Some(package.kind),
        price: Some(package.price),
        outlet_id: package.outlet_id,
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
                h2 class="text-xl font-bold" { "Edit Package" }

                (package_form_fields(&defaults, available_outlets))

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

    base("Edit Package", &[rupiah_input_styles()], &content)
}

/// Display the form for editing an existing package.
pub async fn get_edit_package_page(
    State(state): State<EditPackageState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(package_id): Path<PackageId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let package = get_package(package_id, &connection)
        .inspect_err(|error| tracing::error!("could not get package {package_id}: {error}"))?;
    let available_outlets = get_all_outlets(&connection)
        .inspect_err(|error| tracing::error!("could not get all outlets: {error}"))?;

    Ok(edit_package_view(&package, &available_outlets, &current_user).into_response())
}

pub(super) fn get_package(id: PackageId, connection: &Connection) -> Result<Package, Error> {
    connection
        .query_one(
            "SELECT id, name, kind, price, outlet_id FROM package WHERE id = ?1",
            params![id],
            map_row_to_package,
        )
        .map_err(Error::from)
}

/// A route handler for updating a package, redirects to the packages view on success.
pub async fn update_package_endpoint(
    State(state): State<EditPackageState>,
    Path(package_id): Path<PackageId>,
    Form(form): Form<PackageForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_package(package_id, &form, &connection) {
        Ok(rows_affected) if rows_affected != 0 => (
            HxRedirect(endpoints::PACKAGES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(_) => Error::UpdateMissingPackage.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update package {package_id} with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn update_package(
    id: PackageId,
    form: &PackageForm,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE package SET name = ?1, kind = ?2, price = ?3, outlet_id = ?4 WHERE id = ?5",
            params![form.name, form.kind, form.price, form.outlet_id, id],
        )
        .map_err(Error::from)
}

#[cfg(test)]
mod update_package_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        package::{
            PackageKind,
            create::{PackageForm, create_package},
        },
    };

    use super::{get_package, update_package};

    #[test]
    fn updates_existing_package() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let package = create_package(
            &PackageForm {
                name: "Cuci Kering Kiloan".to_owned(),
                kind: PackageKind::Kiloan,
                price: 7000,
                outlet_id: None,
            },
            &connection,
        )
        .unwrap();

        let rows_affected = update_package(
            package.id,
            &PackageForm {
                name: "Cuci Setrika Kiloan".to_owned(),
                kind: PackageKind::Kiloan,
                price: 9000,
                outlet_id: None,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(rows_affected, 1);
        let updated = get_package(package.id, &connection).unwrap();
        assert_eq!(updated.name, "Cuci Setrika Kiloan");
        assert_eq!(updated.price, 9000);
    }

    #[test]
    fn updating_missing_package_affects_no_rows() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let rows_affected = update_package(
            42,
            &PackageForm {
                name: "Tidak Ada".to_owned(),
                kind: PackageKind::Lain,
                price: 1000,
                outlet_id: None,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(rows_affected, 0);
    }
}
