//! Database queries for retrieving report transaction data.
//!
//! This module provides a simplified transaction view optimized for report
//! aggregations, containing only the fields the rollups need (date, grand
//! total, payment status, outlet). Data quality issues are resolved here,
//! once, at the boundary: a missing grand total reads as zero and a missing
//! or unparseable date is kept as `None` so the aggregator can assign it to
//! its "Unknown" bucket.

use rusqlite::Connection;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, outlet::OutletId, transaction::PaymentStatus};

/// A simplified transaction view for report aggregations.
///
/// This is separate from the main Transaction domain model because the
/// reports only need the date, amount, payment status and outlet.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ReportTransaction {
    /// The calendar date the transaction was recorded, if known.
    pub date: Option<Date>,
    /// The final payable amount in Rupiah.
    pub grand_total: i64,
    /// Whether the grand total has been collected.
    pub payment_status: PaymentStatus,
    /// The outlet the transaction was taken at, if any.
    pub outlet_id: Option<OutletId>,
}

const DATE_ONLY_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]");

/// Gets all transactions in the shape the report aggregator consumes.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - Database connection fails
/// - SQL query preparation or execution fails
pub(super) fn get_report_transactions(
    connection: &Connection,
) -> Result<Vec<ReportTransaction>, Error> {
    connection
        .prepare(
            "SELECT
                substr(transaction_date, 1, 10),
                COALESCE(grand_total, 0),
                COALESCE(payment_status, ''),
                outlet_id
            FROM \"transaction\"",
        )?
        .query_map([], |row| {
            let raw_date: Option<String> = row.get(0)?;
            let grand_total: i64 = row.get(1)?;
            let raw_payment_status: String = row.get(2)?;
            let outlet_id: Option<OutletId> = row.get(3)?;

            Ok(ReportTransaction {
                date: raw_date
                    .and_then(|text| Date::parse(&text, DATE_ONLY_FORMAT).ok()),
                grand_total,
                payment_status: PaymentStatus::from_raw(&raw_payment_status),
                outlet_id,
            })
        })?
        .collect::<Result<Vec<ReportTransaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

#[cfg(test)]
mod get_report_transactions_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{db::initialize, transaction::PaymentStatus};

    use super::get_report_transactions;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert_raw_transaction(
        connection: &Connection,
        invoice: &str,
        date: Option<&str>,
        grand_total: i64,
        payment_status: &str,
    ) {
        connection
            .execute(
                "INSERT INTO \"transaction\" (invoice_number, customer_id, outlet_id, \
                transaction_date, status, payment_status, total_amount, discount, tax, grand_total)
                VALUES (?1, 1, NULL, ?2, 'pending', ?3, ?4, 0, 0, ?4)",
                (invoice, date, payment_status, grand_total),
            )
            .unwrap();
    }

    #[test]
    fn maps_date_portion_of_timestamp() {
        let connection = get_test_connection();
        insert_raw_transaction(
            &connection,
            "INV-1",
            Some("2026-01-31T10:30:00Z"),
            35000,
            "paid",
        );

        let transactions = get_report_transactions(&connection).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].date, Some(date!(2026 - 01 - 31)));
        assert_eq!(transactions[0].grand_total, 35000);
        assert_eq!(transactions[0].payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn missing_date_is_kept_as_none() {
        let connection = get_test_connection();
        insert_raw_transaction(&connection, "INV-1", None, 15000, "unpaid");

        let transactions = get_report_transactions(&connection).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].date, None);
    }

    #[test]
    fn unrecognized_payment_status_degrades_to_unpaid() {
        let connection = get_test_connection();
        insert_raw_transaction(
            &connection,
            "INV-1",
            Some("2026-01-31T10:30:00Z"),
            15000,
            "lunas",
        );

        let transactions = get_report_transactions(&connection).unwrap();

        assert_eq!(transactions[0].payment_status, PaymentStatus::Unpaid);
    }
}
