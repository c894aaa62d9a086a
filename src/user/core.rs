//! User types, table creation and queries shared by the auth layer and the
//! user management pages.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, outlet::OutletId, password::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What a user is allowed to see and do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: manages outlets, packages, users and everything below.
    Admin,
    /// Front-line staff: records transactions and manages customers for
    /// their outlet.
    Kasir,
    /// Read-only management view: dashboard and reports.
    Owner,
}

impl Role {
    /// The role as the lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Kasir => "kasir",
            Role::Owner => "owner",
        }
    }

    /// The role as a capitalised label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Kasir => "Kasir",
            Role::Owner => "Owner",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "kasir" => Ok(Role::Kasir),
            "owner" => Ok(Role::Owner),
            _ => Err(()),
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The name the user logs in with.
    pub username: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The user's full name, shown in the navigation bar and the user list.
    pub full_name: String,
    /// What the user is allowed to see and do.
    pub role: Role,
    /// The outlet a kasir is attached to.
    pub outlet_id: Option<OutletId>,
}

/// The authenticated user attached to a request by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The name the user logs in with.
    pub username: String,
    /// The user's full name.
    pub full_name: String,
    /// What the user is allowed to see and do.
    pub role: Role,
    /// The outlet a kasir is attached to.
    pub outlet_id: Option<OutletId>,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            outlet_id: user.outlet_id,
        }
    }
}

/// The data needed to insert a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: PasswordHash,
    pub full_name: String,
    pub role: Role,
    pub outlet_id: Option<OutletId>,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            full_name TEXT NOT NULL,
            role TEXT NOT NULL,
            outlet_id INTEGER REFERENCES outlet(id)
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    let password: String = row.get(2)?;

    Ok(User {
        id: UserId::new(row.get(0)?),
        username: row.get(1)?,
        password_hash: PasswordHash::new_unchecked(&password),
        full_name: row.get(3)?,
        role: row.get(4)?,
        outlet_id: row.get(5)?,
    })
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateUsername] if the username is taken, or
/// [Error::SqlError] if another SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO user (username, password, full_name, role, outlet_id)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &new_user.username,
                new_user.password_hash.as_ref(),
                &new_user.full_name,
                new_user.role,
                new_user.outlet_id,
            ),
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 2067 =>
            {
                Error::DuplicateUsername(new_user.username.clone())
            }
            error => error.into(),
        })?;

    let id = UserId::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username: new_user.username,
        password_hash: new_user.password_hash,
        full_name: new_user.full_name,
        role: new_user.role,
        outlet_id: new_user.outlet_id,
    })
}

const SELECT_USER: &str =
    "SELECT id, username, password, full_name, role, outlet_id FROM user";

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_row_to_user)
        .map_err(|error| error.into())
}

/// Get the user from the database with a username equal to `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - `username` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE username = :username"))?
        .query_row(&[(":username", &username)], map_row_to_user)
        .map_err(|error| error.into())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns [Error::SqlError] if the query fails.
pub fn count_users(connection: &Connection) -> Result<i64, Error> {
    let mut stmt = connection.prepare("SELECT COUNT(id) FROM user")?;

    let count = stmt.query_row([], |row| row.get(0))?;

    Ok(count)
}

/// Overwrite the password hash for the user with `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has that username, or
/// [Error::SqlError] if the query fails.
pub fn update_user_password(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE username = ?2",
        (password_hash.as_ref(), username),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
