//! Washboard is a web app for running a laundry business: customers,
//! outlets, service packages, staff accounts, transactions, and revenue
//! reports.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod customer;
mod dashboard;
mod db;
mod endpoints;
mod forgot_password;
mod forms;
mod html;
mod internal_server_error;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod not_found;
mod outlet;
mod package;
mod pagination;
mod password;
mod register_user;
mod report;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{Role, User, UserId, get_user_by_username, update_user_password};

use crate::{
    alert::Alert,
    internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
    outlet::OutletId,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of username and password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no auth token in the cookie jar")]
    CookieMissing,

    /// The auth token cookie could not be parsed or has expired.
    #[error("the auth token is invalid or expired")]
    InvalidToken,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JsonSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The specified username already exists in the database.
    #[error("the username \"{0}\" already exists in the database")]
    DuplicateUsername(String),

    /// The specified outlet name already exists in the database.
    #[error("the outlet \"{0}\" already exists in the database")]
    DuplicateOutletName(String),

    /// The outlet ID on a form did not refer to a known outlet.
    #[error("the outlet ID {0:?} does not refer to a valid outlet")]
    InvalidOutlet(Option<OutletId>),

    /// Tried to delete a customer that does not exist
    #[error("tried to delete a customer that is not in the database")]
    DeleteMissingCustomer,

    /// Tried to update a customer that does not exist
    #[error("tried to update a customer that is not in the database")]
    UpdateMissingCustomer,

    /// Tried to delete an outlet that does not exist
    #[error("tried to delete an outlet that is not in the database")]
    DeleteMissingOutlet,

    /// Tried to update an outlet that does not exist
    #[error("tried to update an outlet that is not in the database")]
    UpdateMissingOutlet,

    /// Tried to delete a package that does not exist
    #[error("tried to delete a package that is not in the database")]
    DeleteMissingPackage,

    /// Tried to update a package that does not exist
    #[error("tried to update a package that is not in the database")]
    UpdateMissingPackage,

    /// Tried to delete a user that does not exist
    #[error("tried to delete a user that is not in the database")]
    DeleteMissingUser,

    /// Tried to update a user that does not exist
    #[error("tried to update a user that is not in the database")]
    UpdateMissingUser,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => render_internal_server_error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs",
                )
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidOutlet(outlet_id) => Alert::error(
                "Invalid outlet",
                &format!("Could not find an outlet with the ID {outlet_id:?}"),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DuplicateUsername(username) => Alert::error(
                "Duplicate Username",
                &format!(
                    "The username {username} already exists in the database. \
                    Choose a different username, or edit or delete the existing user.",
                ),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DuplicateOutletName(name) => Alert::error(
                "Duplicate Outlet Name",
                &format!(
                    "The outlet {name} already exists in the database. \
                    Choose a different outlet name, or edit or delete the existing outlet.",
                ),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::UpdateMissingCustomer => Alert::error(
                "Could not update customer",
                "The customer could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingCustomer => Alert::error(
                "Could not delete customer",
                "The customer could not be found. \
                Try refreshing the page to see if the customer has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingOutlet => {
                Alert::error("Could not update outlet", "The outlet could not be found.")
                    .into_response_with_status(StatusCode::NOT_FOUND)
            }
            Error::DeleteMissingOutlet => Alert::error(
                "Could not delete outlet",
                "The outlet could not be found. \
                Try refreshing the page to see if the outlet has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingPackage => Alert::error(
                "Could not update package",
                "The package could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingPackage => Alert::error(
                "Could not delete package",
                "The package could not be found. \
                Try refreshing the page to see if the package has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingUser => {
                Alert::error("Could not update user", "The user could not be found.")
                    .into_response_with_status(StatusCode::NOT_FOUND)
            }
            Error::DeleteMissingUser => Alert::error(
                "Could not delete user",
                "The user could not be found. \
                Try refreshing the page to see if the user has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingTransaction => Alert::error(
                "Could not update transaction",
                "The transaction could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingTransaction => Alert::error(
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::TooWeak(details) => Alert::error("Password is too weak", &details)
                .into_response_with_status(StatusCode::BAD_REQUEST),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
