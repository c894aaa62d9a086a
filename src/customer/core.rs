use rusqlite::Connection;
use time::OffsetDateTime;

use crate::Error;

/// Alias for the integer type used for customer IDs.
pub type CustomerId = i64;

/// A customer of the laundry business.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// The id for the customer.
    pub id: CustomerId,
    /// The customer's name.
    pub name: String,
    /// The customer's phone number, used to notify them when their laundry is ready.
    pub phone: String,
    /// An optional email address.
    pub email: Option<String>,
    /// An optional street address for pick-up and delivery.
    pub address: Option<String>,
    /// Whether the customer has a membership.
    pub is_member: bool,
    /// When the customer was first recorded.
    pub created_at: OffsetDateTime,
}

pub fn create_customer_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS customer (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT,
            address TEXT,
            is_member INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_customer(row: &rusqlite::Row) -> Result<Customer, rusqlite::Error> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        address: row.get(4)?,
        is_member: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Get all customers, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_all_customers(connection: &Connection) -> Result<Vec<Customer>, Error> {
    connection
        .prepare(
            "SELECT id, name, phone, email, address, is_member, created_at
            FROM customer ORDER BY created_at DESC;",
        )?
        .query_map([], map_row_to_customer)?
        .map(|customer_result| customer_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_customer_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_customer_table(&connection));
    }
}
