use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, outlet::OutletId};

/// Alias for the integer type used for package IDs.
pub type PackageId = i64;

/// The kind of service a package offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageKind {
    /// Per-kilogram wash.
    Kiloan,
    /// Blanket cleaning.
    Selimut,
    /// Bed cover cleaning.
    BedCover,
    /// Shirt cleaning.
    Kaos,
    /// Anything that does not fit the other kinds.
    Lain,
}

impl PackageKind {
    /// All kinds, in display order for select inputs.
    pub const ALL: [PackageKind; 5] = [
        PackageKind::Kiloan,
        PackageKind::Selimut,
        PackageKind::BedCover,
        PackageKind::Kaos,
        PackageKind::Lain,
    ];

    /// The kind as the snake_case string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Kiloan => "kiloan",
            PackageKind::Selimut => "selimut",
            PackageKind::BedCover => "bed_cover",
            PackageKind::Kaos => "kaos",
            PackageKind::Lain => "lain",
        }
    }

    /// The kind as a label for display.
    pub fn label(&self) -> &'static str {
        match self {
            PackageKind::Kiloan => "Kiloan",
            PackageKind::Selimut => "Selimut",
            PackageKind::BedCover => "Bed Cover",
            PackageKind::Kaos => "Kaos",
            PackageKind::Lain => "Lain",
        }
    }
}

impl Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kiloan" => Ok(PackageKind::Kiloan),
            "selimut" => Ok(PackageKind::Selimut),
            "bed_cover" => Ok(PackageKind::BedCover),
            "kaos" => Ok(PackageKind::Kaos),
            "lain" => Ok(PackageKind::Lain),
            _ => Err(()),
        }
    }
}

impl ToSql for PackageKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for PackageKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// A priced service offering.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// The id for the package.
    pub id: PackageId,
    /// The package's display name.
    pub name: String,
    /// The kind of service the package offers.
    pub kind: PackageKind,
    /// The price per unit in Rupiah.
    pub price: i64,
    /// The outlet this package is specific to, if any.
    pub outlet_id: Option<OutletId>,
}

pub fn create_package_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS package (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            price INTEGER NOT NULL,
            outlet_id INTEGER REFERENCES outlet(id)
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_package(row: &rusqlite::Row) -> Result<Package, rusqlite::Error> {
    Ok(Package {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        price: row.get(3)?,
        outlet_id: row.get(4)?,
    })
}

/// Get all packages ordered by name.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_all_packages(connection: &Connection) -> Result<Vec<Package>, Error> {
    connection
        .prepare("SELECT id, name, kind, price, outlet_id FROM package ORDER BY name ASC;")?
        .query_map([], map_row_to_package)?
        .map(|package_result| package_result.map_err(Error::from))
        .collect()
}


#[cfg(test)]
mod package_kind_tests {
    use super::PackageKind;

    #[test]
    fn kind_roundtrips_through_string() {
        for kind in PackageKind::ALL {
            assert_eq!(kind.as_str().parse::<PackageKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_does_not_parse() {
        assert!("sepatu".parse::<PackageKind>().is_err());
    }
}
