//! Defines the endpoint for creating a new customer.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::{Connection, params};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{AppState, Error, customer::Customer, endpoints};

/// The state needed to create a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerState {
    /// The database connection for managing customers.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCustomerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or updating a customer.
#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    /// The customer's name.
    pub name: String,
    /// The customer's phone number.
    pub phone: String,
    /// An optional email address.
    pub email: Option<String>,
    /// An optional street address.
    pub address: Option<String>,
    /// Whether the customer has a membership.
    ///
    /// This value comes from a checkbox, so it either has a string value or
    /// is not set.
    pub is_member: Option<String>,
}

/// A route handler for creating a new customer, redirects to the customers view on success.
pub async fn create_customer_endpoint(
    State(state): State<CreateCustomerState>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_customer(&form, &connection) {
        tracing::error!("Could not create customer with {form:?}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

pub fn create_customer(form: &CustomerForm, connection: &Connection) -> Result<Customer, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO customer (name, phone, email, address, is_member, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            form.name,
            form.phone,
            form.email,
            form.address,
            form.is_member.is_some(),
            created_at,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Customer {
        id,
        name: form.name.clone(),
        phone: form.phone.clone(),
        email: form.email.clone(),
        address: form.address.clone(),
        is_member: form.is_member.is_some(),
        created_at,
    })
}
