//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/customers/{customer_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying the daily, monthly and per-outlet reports.
pub const REPORTS_VIEW: &str = "/reports";
/// The page for displaying transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for listing all customers.
pub const CUSTOMERS_VIEW: &str = "/customers";
/// The page for creating a new customer.
pub const NEW_CUSTOMER_VIEW: &str = "/customers/new";
/// The page for editing an existing customer.
pub const EDIT_CUSTOMER_VIEW: &str = "/customers/{customer_id}/edit";
/// The page for listing all outlets.
pub const OUTLETS_VIEW: &str = "/outlets";
/// The page for creating a new outlet.
pub const NEW_OUTLET_VIEW: &str = "/outlets/new";
/// The page for editing an existing outlet.
pub const EDIT_OUTLET_VIEW: &str = "/outlets/{outlet_id}/edit";
/// The page for listing all service packages.
pub const PACKAGES_VIEW: &str = "/packages";
/// The page for creating a new service package.
pub const NEW_PACKAGE_VIEW: &str = "/packages/new";
/// The page for editing an existing service package.
pub const EDIT_PACKAGE_VIEW: &str = "/packages/{package_id}/edit";
/// The page for listing all users.
pub const USERS_VIEW: &str = "/users";
/// The page for creating a new user.
pub const NEW_USER_VIEW: &str = "/users/new";
/// The page for editing an existing user.
pub const EDIT_USER_VIEW: &str = "/users/{user_id}/edit";
/// The route for getting the first-run registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for creating the first admin account.
pub const REGISTER_API: &str = "/api/register";
/// The route to create a customer.
pub const POST_CUSTOMER: &str = "/api/customers";
/// The route to update a customer.
pub const PUT_CUSTOMER: &str = "/api/customers/{customer_id}";
/// The route to delete a customer.
pub const DELETE_CUSTOMER: &str = "/api/customers/{customer_id}";
/// The route to create an outlet.
pub const POST_OUTLET: &str = "/api/outlets";
/// The route to update an outlet.
pub const PUT_OUTLET: &str = "/api/outlets/{outlet_id}";
/// The route to delete an outlet.
pub const DELETE_OUTLET: &str = "/api/outlets/{outlet_id}";
/// The route to create a service package.
pub const POST_PACKAGE: &str = "/api/packages";
/// The route to update a service package.
pub const PUT_PACKAGE: &str = "/api/packages/{package_id}";
/// The route to delete a service package.
pub const DELETE_PACKAGE: &str = "/api/packages/{package_id}";
/// The route to create a user.
pub const POST_USER: &str = "/api/users";
/// The route to update a user.
pub const PUT_USER: &str = "/api/users/{user_id}";
/// The route to delete a user.
pub const DELETE_USER: &str = "/api/users/{user_id}";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to update a transaction's order status.
pub const TRANSACTION_STATUS: &str = "/api/transactions/{transaction_id}/status";
/// The route to update a transaction's payment status.
pub const TRANSACTION_PAYMENT: &str = "/api/transactions/{transaction_id}/payment";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REPORTS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CUSTOMERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_CUSTOMER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_CUSTOMER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::OUTLETS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_OUTLET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_OUTLET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PACKAGES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_PACKAGE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_PACKAGE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::USERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_USER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_USER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::FORGOT_PASSWORD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_API);
        assert_endpoint_is_valid_uri(endpoints::POST_CUSTOMER);
        assert_endpoint_is_valid_uri(endpoints::PUT_CUSTOMER);
        assert_endpoint_is_valid_uri(endpoints::DELETE_CUSTOMER);
        assert_endpoint_is_valid_uri(endpoints::POST_OUTLET);
        assert_endpoint_is_valid_uri(endpoints::PUT_OUTLET);
        assert_endpoint_is_valid_uri(endpoints::DELETE_OUTLET);
        assert_endpoint_is_valid_uri(endpoints::POST_PACKAGE);
        assert_endpoint_is_valid_uri(endpoints::PUT_PACKAGE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_PACKAGE);
        assert_endpoint_is_valid_uri(endpoints::POST_USER);
        assert_endpoint_is_valid_uri(endpoints::PUT_USER);
        assert_endpoint_is_valid_uri(endpoints::DELETE_USER);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::DELETE_TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION_STATUS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION_PAYMENT);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
