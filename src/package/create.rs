//! The page and endpoint for creating a new service package.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    AppState, Error,
    endpoints,
    forms::empty_string_as_none,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner, rupiah_input_styles,
    },
    navigation::NavBar,
    outlet::{Outlet, OutletId, get_all_outlets},
    package::{Package, PackageKind},
    user::CurrentUser,
};

use super::form::{PackageFormDefaults, package_form_fields};

/// The state needed to create a package.
#[derive(Debug, Clone)]
pub struct CreatePackageState {
    /// The database connection for managing packages.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePackageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn create_package_view(available_outlets: &[Outlet], current_user: &CurrentUser) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PACKAGE_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_PACKAGE)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Package" }

                (package_form_fields(&PackageFormDefaults::default(), available_outlets))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create Package"
                }
            }
        }
    };

    base("Create Package", &[rupiah_input_styles()], &content)
}

/// Display the form for creating a new package.
pub async fn get_new_package_page(
    State(state): State<CreatePackageState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let available_outlets = get_all_outlets(&connection)
        .inspect_err(|error| tracing::error!("could not get all outlets: {error}"))?;

    Ok(create_package_view(&available_outlets, &current_user).into_response())
}

/// The form data for creating or updating a package.
#[derive(Debug, Deserialize)]
pub struct PackageForm {
    /// The package's display name.
    pub name: String,
    /// The kind of service the package offers.
    pub kind: PackageKind,
    /// The price per unit in Rupiah.
    pub price: i64,
    /// The outlet this package is specific to, if any.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub outlet_id: Option<OutletId>,
}

/// A route handler for creating a new package, redirects to the packages view on success.
pub async fn create_package_endpoint(
    State(state): State<CreatePackageState>,
    Form(form): Form<PackageForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_package(&form, &connection) {
        tracing::error!("Could not create package with {form:?}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::PACKAGES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

pub(super) fn create_package(
    form: &PackageForm,
    connection: &Connection,
) -> Result<Package, Error> {
    connection.execute(
        "INSERT INTO package (name, kind, price, outlet_id) VALUES (?1, ?2, ?3, ?4)",
        params![form.name, form.kind, form.price, form.outlet_id],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Package {
        id,
        name: form.name.clone(),
        kind: form.kind,
        price: form.price,
        outlet_id: form.outlet_id,
    })
}

#[cfg(test)]
mod create_package_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        package::{PackageKind, get_all_packages},
    };

    use super::{PackageForm, create_package};

    #[test]
    fn creates_package() {
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

        assert_eq!(package.price, 7000);
        assert_eq!(get_all_packages(&connection).unwrap(), vec![package]);
    }
}
