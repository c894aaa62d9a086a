use rusqlite::Connection;

use crate::Error;

/// Alias for the integer type used for outlet IDs.
pub type OutletId = i64;

/// A physical branch location of the laundry business.
#[derive(Debug, Clone, PartialEq)]
pub struct Outlet {
    /// The id for the outlet.
    pub id: OutletId,
    /// The outlet's display name.
    pub name: String,
    /// The street address of the outlet.
    pub address: String,
    /// An optional contact phone number.
    pub phone: Option<String>,
}

pub fn create_outlet_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS outlet (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            address TEXT NOT NULL,
            phone TEXT
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_outlet(row: &rusqlite::Row) -> Result<Outlet, rusqlite::Error> {
    Ok(Outlet {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
    })
}

/// Get all outlets ordered by name.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_all_outlets(connection: &Connection) -> Result<Vec<Outlet>, Error> {
    connection
        .prepare("SELECT id, name, address, phone FROM outlet ORDER BY name ASC;")?
        .query_map([], map_row_to_outlet)?
        .map(|outlet_result| outlet_result.map_err(Error::from))
        .collect()
}
