//! Transaction types, table creation and row mapping.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{customer::CustomerId, outlet::OutletId, user::UserId};

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// Where a laundry order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The order has been received but not started.
    Pending,
    /// The laundry is being washed.
    Processing,
    /// The laundry is ready for pick-up.
    Ready,
    /// The laundry has been picked up.
    Completed,
    /// The order was cancelled.
    Cancelled,
}

impl TransactionStatus {
    /// All statuses, in lifecycle order for select inputs.
    pub const ALL: [TransactionStatus; 5] = [
        TransactionStatus::Pending,
        TransactionStatus::Processing,
        TransactionStatus::Ready,
        TransactionStatus::Completed,
        TransactionStatus::Cancelled,
    ];

    /// The status as the lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Ready => "ready",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    /// The status as a capitalised label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Processing => "Processing",
            TransactionStatus::Ready => "Ready",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Cancelled => "Cancelled",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "processing" => Ok(TransactionStatus::Processing),
            "ready" => Ok(TransactionStatus::Ready),
            "completed" => Ok(TransactionStatus::Completed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            _ => Err(()),
        }
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// Whether a transaction's grand total has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing has been paid.
    Unpaid,
    /// A down payment has been made.
    Partial,
    /// The grand total has been paid in full.
    Paid,
}

impl PaymentStatus {
    /// All payment statuses, for select inputs.
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Unpaid,
        PaymentStatus::Partial,
        PaymentStatus::Paid,
    ];

    /// The payment status as the lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }

    /// The payment status as a capitalised label for display.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Paid => "Paid",
        }
    }

    /// Parse a raw payment status string leniently.
    ///
    /// Only the literal "paid" marks a transaction as settled and only
    /// "partial" as partially paid. Anything else degrades to unpaid.
    pub fn from_raw(raw: &str) -> PaymentStatus {
        match raw {
            "paid" => PaymentStatus::Paid,
            "partial" => PaymentStatus::Partial,
            _ => PaymentStatus::Unpaid,
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(()),
        }
    }
}

impl ToSql for PaymentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for PaymentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// A laundry order.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The id for the transaction.
    pub id: TransactionId,
    /// The invoice number handed to the customer.
    pub invoice_number: String,
    /// The customer the order belongs to.
    pub customer_id: CustomerId,
    /// The outlet the order was taken at.
    pub outlet_id: Option<OutletId>,
    /// The kasir who recorded the order.
    pub kasir_id: Option<UserId>,
    /// When the order was recorded.
    pub transaction_date: Option<OffsetDateTime>,
    /// Where the order is in its lifecycle.
    pub status: TransactionStatus,
    /// Whether the grand total has been collected.
    pub payment_status: PaymentStatus,
    /// The sum of the order's line items in Rupiah.
    pub total_amount: i64,
    /// The discount subtracted from the total, in Rupiah.
    pub discount: i64,
    /// The tax added to the total, in Rupiah.
    pub tax: i64,
    /// The final payable amount in Rupiah.
    pub grand_total: i64,
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            invoice_number TEXT NOT NULL UNIQUE,
            customer_id INTEGER NOT NULL REFERENCES customer(id),
            outlet_id INTEGER REFERENCES outlet(id),
            kasir_id INTEGER REFERENCES user(id),
            transaction_date TEXT,
            status TEXT NOT NULL,
            payment_status TEXT NOT NULL,
            total_amount INTEGER NOT NULL,
            discount INTEGER NOT NULL DEFAULT 0,
            tax INTEGER NOT NULL DEFAULT 0,
            grand_total INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_transaction(row: &rusqlite::Row) -> Result<Transaction, rusqlite::Error> {
    let kasir_id: Option<i64> = row.get(4)?;

    Ok(Transaction {
        id: row.get(0)?,
        invoice_number: row.get(1)?,
        customer_id: row.get(2)?,
        outlet_id: row.get(3)?,
        kasir_id: kasir_id.map(UserId::new),
        transaction_date: row.get(5)?,
        status: row.get(6)?,
        payment_status: row.get(7)?,
        total_amount: row.get(8)?,
        discount: row.get(9)?,
        tax: row.get(10)?,
        grand_total: row.get(11)?,
    })
}

pub(super) const SELECT_TRANSACTION: &str = "SELECT id, invoice_number, customer_id, outlet_id, \
    kasir_id, transaction_date, status, payment_status, total_amount, discount, tax, grand_total \
    FROM \"transaction\"";

/// Build the invoice number for a transaction recorded at `now`.
///
/// Nanosecond precision keeps invoice numbers unique without a counter
/// table.
pub(super) fn generate_invoice_number(now: OffsetDateTime) -> String {
    format!("INV-{}", now.unix_timestamp_nanos())
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_transaction_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_transaction_table(&connection));
    }
}

#[cfg(test)]
mod payment_status_tests {
    use super::PaymentStatus;

    #[test]
    fn only_paid_literal_is_settled() {
        assert_eq!(PaymentStatus::from_raw("paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_raw("partial"), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::from_raw("unpaid"), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::from_raw("PAID"), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::from_raw(""), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::from_raw("lunas"), PaymentStatus::Unpaid);
    }
}

#[cfg(test)]
mod invoice_number_tests {
    use time::macros::datetime;

    use super::generate_invoice_number;

    #[test]
    fn invoice_number_has_inv_prefix() {
        let invoice = generate_invoice_number(datetime!(2026-01-31 10:30 UTC));

        assert!(invoice.starts_with("INV-"));
    }

    #[test]
    fn invoice_numbers_differ_across_instants() {
        let first = generate_invoice_number(datetime!(2026-01-31 10:30 UTC));
        let second = generate_invoice_number(datetime!(2026-01-31 10:30:00.000000001 UTC));

        assert_ne!(first, second);
    }
}
