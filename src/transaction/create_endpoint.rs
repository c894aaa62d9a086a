//! Defines the endpoint for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::{Connection, params};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    customer::CustomerId,
    endpoints,
    forms::empty_string_as_none,
    outlet::OutletId,
    package::PackageId,
    transaction::{
        PaymentStatus, Transaction, TransactionStatus,
        core::generate_invoice_number,
    },
    user::CurrentUser,
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The customer the order belongs to.
    pub customer_id: CustomerId,
    /// The outlet the order was taken at. A kasir's own outlet takes
    /// precedence over this field.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub outlet_id: Option<OutletId>,
    /// The package the customer chose.
    pub package_id: PackageId,
    /// How many units of the package, e.g. kilograms.
    pub quantity: i64,
    /// The discount subtracted from the total, in Rupiah.
    #[serde(default)]
    pub discount: i64,
    /// The tax added to the total, in Rupiah.
    #[serde(default)]
    pub tax: i64,
}

/// A route handler for recording a new transaction, redirects to the
/// transactions view on success.
///
/// The new transaction starts out pending and unpaid, is stamped with the
/// current time, and its grand total is computed on the server from the
/// package price.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(current_user): Extension<CurrentUser>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(&form, &current_user, &connection) {
        tracing::error!("Could not create transaction with {form:?}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

pub fn create_transaction(
    form: &TransactionForm,
    current_user: &CurrentUser,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let price: i64 = connection
        .query_one(
            "SELECT price FROM package WHERE id = ?1",
            params![form.package_id],
            |row| row.get(0),
        )
        .map_err(Error::from)?;

    let now = OffsetDateTime::now_utc();
    let invoice_number = generate_invoice_number(now);
    // A kasir always records orders for their own outlet.
    let outlet_id = current_user.outlet_id.or(form.outlet_id);

    let total_amount = price * form.quantity;
    // The grand total is never negative, even with an oversized discount.
    let grand_total = (total_amount - form.discount + form.tax).max(0);

    connection.execute(
        "INSERT INTO \"transaction\" (invoice_number, customer_id, outlet_id, kasir_id, \
        transaction_date, status, payment_status, total_amount, discount, tax, grand_total)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            invoice_number,
            form.customer_id,
            outlet_id,
            current_user.id.as_i64(),
            now,
            TransactionStatus::Pending,
            PaymentStatus::Unpaid,
            total_amount,
            form.discount,
            form.tax,
            grand_total,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id,
        invoice_number,
        customer_id: form.customer_id,
        outlet_id,
        kasir_id: Some(current_user.id),
        transaction_date: Some(now),
        status: TransactionStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        total_amount,
        discount: form.discount,
        tax: form.tax,
        grand_total,
    })
}

#[cfg(test)]
mod create_transaction_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        package::PackageKind,
        test_utils::test_current_user,
        transaction::{PaymentStatus, TransactionStatus},
        user::Role,
    };

    use super::{TransactionForm, create_transaction};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn seed_customer_and_package(connection: &Connection) -> (i64, i64) {
        connection
            .execute(
                "INSERT INTO customer (name, phone, is_member, created_at)
                VALUES ('Siti', '0812', 0, '2026-01-01T00:00:00Z')",
                (),
            )
            .unwrap();
        let customer_id = connection.last_insert_rowid();

        connection
            .execute(
                "INSERT INTO package (name, kind, price, outlet_id) VALUES (?1, ?2, ?3, NULL)",
                ("Cuci Kering Kiloan", PackageKind::Kiloan, 7000),
            )
            .unwrap();
        let package_id = connection.last_insert_rowid();

        (customer_id, package_id)
    }

    #[test]
    fn computes_grand_total_from_package_price() {
        let connection = get_test_connection();
        let (customer_id, package_id) = seed_customer_and_package(&connection);

        let transaction = create_transaction(
            &TransactionForm {
                customer_id,
                outlet_id: None,
                package_id,
                quantity: 5,
                discount: 2000,
                tax: 1000,
            },
            &test_current_user(Role::Kasir),
            &connection,
        )
        .unwrap();

        assert_eq!(transaction.total_amount, 35000);
        assert_eq!(transaction.grand_total, 34000);
        assert_eq!(transaction.status, TransactionStatus::Pending);
        assert_eq!(transaction.payment_status, PaymentStatus::Unpaid);
        assert!(transaction.invoice_number.starts_with("INV-"));
    }

    #[test]
    fn oversized_discount_clamps_grand_total_to_zero() {
        let connection = get_test_connection();
        let (customer_id, package_id) = seed_customer_and_package(&connection);

        let transaction = create_transaction(
            &TransactionForm {
                customer_id,
                outlet_id: None,
                package_id,
                quantity: 1,
                discount: 100_000,
                tax: 0,
            },
            &test_current_user(Role::Kasir),
            &connection,
        )
        .unwrap();

        assert_eq!(transaction.grand_total, 0);
    }

    #[test]
    fn kasir_outlet_takes_precedence_over_form_outlet() {
        let connection = get_test_connection();
        let (customer_id, package_id) = seed_customer_and_package(&connection);
        connection
            .execute(
                "INSERT INTO outlet (name, address) VALUES ('Outlet Pusat', 'Jl. Sudirman 1')",
                (),
            )
            .unwrap();
        let kasir_outlet = connection.last_insert_rowid();
        let mut current_user = test_current_user(Role::Kasir);
        current_user.outlet_id = Some(kasir_outlet);

        let transaction = create_transaction(
            &TransactionForm {
                customer_id,
                outlet_id: Some(kasir_outlet + 1),
                package_id,
                quantity: 1,
                discount: 0,
                tax: 0,
            },
            &current_user,
            &connection,
        )
        .unwrap();

        assert_eq!(transaction.outlet_id, Some(kasir_outlet));
    }

    #[test]
    fn unknown_package_returns_not_found() {
        let connection = get_test_connection();
        let (customer_id, _) = seed_customer_and_package(&connection);

        let result = create_transaction(
            &TransactionForm {
                customer_id,
                outlet_id: None,
                package_id: 42,
                quantity: 1,
                discount: 0,
                tax: 0,
            },
            &test_current_user(Role::Kasir),
            &connection,
        );

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }
}
