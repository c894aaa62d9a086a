//! Defines the template and route handler for the internal server error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_internal_server_error_page() -> Response {
    render_internal_server_error(
        "Sorry, something went wrong.",
        "Try again later or check the server logs",
    )
}

pub fn render_internal_server_error(description: &str, fix: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_view("Internal Server Error", "500", description, fix),
    )
        .into_response()
}
