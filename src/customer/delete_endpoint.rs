//! Defines the endpoint for deleting a customer.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, customer::CustomerId};

/// The state needed to delete a customer.
#[derive(Debug, Clone)]
pub struct DeleteCustomerState {
    /// The database connection for managing customers.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCustomerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a customer, responds with an alert.
pub async fn delete_customer_endpoint(
    State(state): State<DeleteCustomerState>,
    Path(customer_id): Path<CustomerId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_customer(customer_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => {
            Alert::success("Customer deleted successfully").into_response()
        }
        Ok(_) => Error::DeleteMissingCustomer.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete customer {customer_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_customer(id: CustomerId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM customer WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}
