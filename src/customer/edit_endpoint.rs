//! Defines the endpoint for updating an existing customer.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::{Connection, params};

use crate::{
    AppState, Error,
    customer::{CustomerId, create_endpoint::CustomerForm},
    endpoints,
};

/// The state needed to update a customer.
#[derive(Debug, Clone)]
pub struct EditCustomerState {
    /// The database connection for managing customers.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCustomerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a customer, redirects to the customers view on success.
pub async fn edit_customer_endpoint(
    State(state): State<EditCustomerState>,
    Path(customer_id): Path<CustomerId>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_customer(customer_id, &form, &connection) {
        Ok(rows_affected) if rows_affected != 0 => (
            HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(_) => Error::UpdateMissingCustomer.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update customer {customer_id} with {form:?}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn update_customer(
    id: CustomerId,
    form: &CustomerForm,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE customer
            SET name = ?1, phone = ?2, email = ?3, address = ?4, is_member = ?5
            WHERE id = ?6",
            params![
                form.name,
                form.phone,
                form.email,
                form.address,
                form.is_member.is_some(),
                id,
            ],
        )
        .map_err(Error::from)
}

#[cfg(test)]
mod edit_customer_tests {
    use rusqlite::Connection;

    use crate::{
        customer::{
            create_endpoint::{CustomerForm, create_customer},
            edit_page::get_customer,
        },
        db::initialize,
    };

    use super::update_customer;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn updates_existing_customer() {
        let connection = get_test_connection();
        let customer = create_customer(
            &CustomerForm {
                name: "Siti".to_owned(),
                phone: "0812-3456-7890".to_owned(),
                email: None,
                address: None,
                is_member: None,
            },
            &connection,
        )
        .unwrap();

        let rows_affected = update_customer(
            customer.id,
            &CustomerForm {
                name: "Siti Aminah".to_owned(),
                phone: "0813-0000-1111".to_owned(),
                email: Some("siti@example.com".to_owned()),
                address: None,
                is_member: Some("on".to_owned()),
            },
            &connection,
        )
        .unwrap();

        assert_eq!(rows_affected, 1);
        let updated = get_customer(customer.id, &connection).unwrap();
        assert_eq!(updated.name, "Siti Aminah");
        assert_eq!(updated.phone, "0813-0000-1111");
        assert!(updated.is_member);
        assert_eq!(updated.created_at, customer.created_at);
    }

    #[test]
    fn updating_missing_customer_affects_no_rows() {
        let connection = get_test_connection();

        let rows_affected = update_customer(
            42,
            &CustomerForm {
                name: "Nobody".to_owned(),
                phone: "0800".to_owned(),
                email: None,
                address: None,
                is_member: None,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(rows_affected, 0);
    }
}
