//! Renders a page describing how a user's password can be reset.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::html::{PAGE_CONTAINER_STYLE, base, link};

/// Renders a page describing how the user's password can be reset.
pub async fn get_forgot_password_page() -> Response {
    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Forgot your password?" }

                p
                {
                    "Passwords can only be reset from the server itself. Ask \
                    your administrator to run the following command on the \
                    machine hosting the app:"
                }

                pre class="p-2.5 rounded bg-gray-100 dark:bg-gray-800 text-sm overflow-x-auto"
                {
                    "reset_password --db-path <DB_PATH> --username <USERNAME>"
                }

                p
                {
                    "Once it is done, you can "
                    (link("/log_in", "log in here"))
                    " with your new password."
                }
            }
        }
    );

    base("Forgot Password", &[], &content).into_response()
}
