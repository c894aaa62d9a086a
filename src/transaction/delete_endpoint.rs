//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, transaction::TransactionId};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with an alert.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(rows_affected) if rows_affected != 0 => {
            Alert::success("Transaction deleted successfully").into_response()
        }
        Ok(_) => Error::DeleteMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

#[cfg(test)]
mod delete_transaction_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        package::PackageKind,
        test_utils::test_current_user,
        transaction::create_endpoint::{TransactionForm, create_transaction},
        user::Role,
    };

    use super::delete_transaction;

    #[test]
    fn deletes_transaction() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
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
        let transaction = create_transaction(
            &TransactionForm {
                customer_id,
                outlet_id: None,
                package_id,
                quantity: 1,
                discount: 0,
                tax: 0,
            },
            &test_current_user(Role::Kasir),
            &connection,
        )
        .unwrap();

        let rows_affected = delete_transaction(transaction.id, &connection).unwrap();

        assert_eq!(rows_affected, 1);

        let count: i64 = connection
            .query_one("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn deleting_missing_transaction_affects_no_rows() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let rows_affected = delete_transaction(42, &connection).unwrap();

        assert_eq!(rows_affected, 0);
    }
}
