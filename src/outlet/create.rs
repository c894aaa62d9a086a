//! The page and endpoint for creating a new outlet.

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
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    outlet::Outlet,
    user::CurrentUser,
};

use super::form::{OutletFormDefaults, outlet_form_fields};

/// The state needed to create an outlet.
#[derive(Debug, Clone)]
pub struct CreateOutletState {
    /// The database connection for managing outlets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateOutletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn create_outlet_view(current_user: &CurrentUser) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_OUTLET_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_OUTLET)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Outlet" }

                (outlet_form_fields(&OutletFormDefaults::default()))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create Outlet"
                }
            }
        }
    };

    base("Create Outlet", &[], &content)
}

/// Display the form for creating a new outlet.
pub async fn get_new_outlet_page(Extension(current_user): Extension<CurrentUser>) -> Response {
    create_outlet_view(&current_user).into_response()
}

/// The form data for creating or updating an outlet.
#[derive(Debug, Deserialize)]
pub struct OutletForm {
    /// The outlet's display name.
    pub name: String,
    /// The street address of the outlet.
    pub address: String,
    /// An optional contact phone number.
    pub phone: Option<String>,
}

/// A route handler for creating a new outlet, redirects to the outlets view on success.
pub async fn create_outlet_endpoint(
    State(state): State<CreateOutletState>,
    Form(form): Form<OutletForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_outlet(&form, &connection) {
        tracing::error!("Could not create outlet with {form:?}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::OUTLETS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

pub(super) fn create_outlet(form: &OutletForm, connection: &Connection) -> Result<Outlet, Error> {
    connection
        .execute(
            "INSERT INTO outlet (name, address, phone) VALUES (?1, ?2, ?3)",
            params![form.name, form.address, form.phone],
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 2067 =>
            {
                Error::DuplicateOutletName(form.name.clone())
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Outlet {
        id,
        name: form.name.clone(),
        address: form.address.clone(),
        phone: form.phone.clone(),
    })
}
