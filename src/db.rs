//! Database initialization for the application's domain models.

use rusqlite::Connection;

use crate::{
    customer::create_customer_table, outlet::create_outlet_table,
    package::create_package_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Create the tables for all of the application's domain models.
///
/// Tables are created with `IF NOT EXISTS`, so calling this on an existing
/// database is a no-op.
///
/// # Errors
/// Returns an error if any of the table creation queries fail.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_outlet_table(connection)?;
    create_user_table(connection)?;
    create_customer_table(connection)?;
    create_package_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
