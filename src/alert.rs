//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the alert
//! container at the bottom of every page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq)]
enum AlertType {
    Success,
    Error,
}

/// A success or error message to display to the user.
#[derive(Debug, Clone)]
pub struct Alert {
    alert_type: AlertType,
    message: String,
    details: String,
}

impl Alert {
    /// Create a new success alert.
    pub fn success(message: &str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message: message.to_owned(),
            details: String::new(),
        }
    }

    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as an HTML fragment.
    pub fn into_markup(self) -> Markup {
        let color_style = match self.alert_type {
            AlertType::Success => {
                "text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400"
            }
            AlertType::Error => "text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400",
        };

        html!(
            div
                class={ "flex items-center p-4 mb-4 text-sm rounded-lg shadow " (color_style) }
                role="alert"
                data-alert="true"
            {
                div
                {
                    span class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        " " (self.details)
                    }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8"
                    onclick="document.getElementById('alert-container').classList.add('hidden')"
                    aria-label="Close"
                {
                    "\u{00d7}"
                }
            }
        )
    }

    /// Render the alert as a response with an explicit status code.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_markup()).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        // The status code has to be 200 OK or HTMX will not perform swaps
        // such as deleting a table row.
        self.into_response_with_status(StatusCode::OK)
    }
}

#[cfg(test)]
mod alert_tests {
    use super::Alert;

    #[test]
    fn success_alert_contains_message() {
        let markup = Alert::success("Customer deleted successfully").into_markup();

        assert!(markup.into_string().contains("Customer deleted successfully"));
    }

    #[test]
    fn error_alert_contains_message_and_details() {
        let markup = Alert::error("Something went wrong", "Check the server logs").into_markup();
        let rendered = markup.into_string();

        assert!(rendered.contains("Something went wrong"));
        assert!(rendered.contains("Check the server logs"));
    }
}
