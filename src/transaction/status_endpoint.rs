//! Defines the endpoints for updating a transaction's order and payment status.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    transaction::{PaymentStatus, TransactionId, TransactionStatus},
};

/// The state needed to update a transaction's status.
#[derive(Debug, Clone)]
pub struct TransactionStatusState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionStatusState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for updating a transaction's order status.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    /// The new order status.
    pub status: TransactionStatus,
}

/// The form data for updating a transaction's payment status.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    /// The new payment status.
    pub payment_status: PaymentStatus,
}

/// A route handler for updating a transaction's order status, responds with an alert.
pub async fn update_transaction_status_endpoint(
    State(state): State<TransactionStatusState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<StatusForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction_status(transaction_id, form.status, &connection) {
        Ok(rows_affected) if rows_affected != 0 => Alert::success(&format!(
            "Transaction marked as {}",
            form.status.label()
        ))
        .into_response(),
        Ok(_) => Error::UpdateMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id} status: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for updating a transaction's payment status, responds with an alert.
pub async fn update_payment_status_endpoint(
    State(state): State<TransactionStatusState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<PaymentForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_payment_status(transaction_id, form.payment_status, &connection) {
        Ok(rows_affected) if rows_affected != 0 => Alert::success(&format!(
            "Transaction marked as {}",
            form.payment_status.label()
        ))
        .into_response(),
        Ok(_) => Error::UpdateMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "Could not update transaction {transaction_id} payment status: {error}"
            );
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn update_transaction_status(
    id: TransactionId,
    status: TransactionStatus,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\" SET status = ?1 WHERE id = ?2",
            params![status, id],
        )
        .map_err(Error::from)
}

fn update_payment_status(
    id: TransactionId,
    payment_status: PaymentStatus,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE \"transaction\" SET payment_status = ?1 WHERE id = ?2",
            params![payment_status, id],
        )
        .map_err(Error::from)
}

#[cfg(test)]
mod status_update_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        package::PackageKind,
        test_utils::test_current_user,
        transaction::{
            PaymentStatus, TransactionStatus,
            create_endpoint::{TransactionForm, create_transaction},
            map_row_to_transaction,
        },
        user::Role,
    };

    use super::{update_payment_status, update_transaction_status};

    fn seed_transaction(connection: &Connection) -> i64 {
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

        create_transaction(
            &TransactionForm {
                customer_id,
                outlet_id: None,
                package_id,
                quantity: 1,
                discount: 0,
                tax: 0,
            },
            &test_current_user(Role::Kasir),
            connection,
        )
        .unwrap()
        .id
    }

    fn get_transaction(id: i64, connection: &Connection) -> crate::transaction::Transaction {
        connection
            .query_one(
                &format!("{} WHERE id = ?1", crate::transaction::core::SELECT_TRANSACTION),
                [id],
                map_row_to_transaction,
            )
            .unwrap()
    }

    #[test]
    fn updates_order_status() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let id = seed_transaction(&connection);

        let rows_affected =
            update_transaction_status(id, TransactionStatus::Ready, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_transaction(id, &connection).status, TransactionStatus::Ready);
    }

    #[test]
    fn updates_payment_status() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let id = seed_transaction(&connection);

        let rows_affected = update_payment_status(id, PaymentStatus::Paid, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(
            get_transaction(id, &connection).payment_status,
            PaymentStatus::Paid
        );
    }

    #[test]
    fn updating_missing_transaction_affects_no_rows() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let rows_affected =
            update_transaction_status(42, TransactionStatus::Completed, &connection).unwrap();

        assert_eq!(rows_affected, 0);
    }
}
