//! Application router configuration with unprotected, authenticated and
//! role-gated route groups.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{admin_guard, auth_guard, auth_guard_hx, staff_guard},
    customer::{
        create_customer_endpoint, delete_customer_endpoint, edit_customer_endpoint,
        get_create_customer_page, get_customers_page, get_edit_customer_page,
    },
    dashboard::get_dashboard_page,
    endpoints,
    forgot_password::get_forgot_password_page,
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    outlet::{
        create_outlet_endpoint, delete_outlet_endpoint, get_edit_outlet_page, get_new_outlet_page,
        get_outlets_page, update_outlet_endpoint,
    },
    package::{
        create_package_endpoint, delete_package_endpoint, get_edit_package_page,
        get_new_package_page, get_packages_page, update_package_endpoint,
    },
    register_user::{get_register_page, register_user},
    report::get_reports_page,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_create_transaction_page,
        get_transactions_page, update_payment_status_endpoint, update_transaction_status_endpoint,
    },
    user::{
        create_user_endpoint, delete_user_endpoint, get_edit_user_page, get_new_user_page,
        get_users_page, update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::REGISTER_API, post(register_user))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // Pages every logged-in role can see.
    let shared_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page));

    // Pages for front-line staff (admin and kasir).
    let staff_routes = Router::new()
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(endpoints::CUSTOMERS_VIEW, get(get_customers_page))
        .route(endpoints::NEW_CUSTOMER_VIEW, get(get_create_customer_page))
        .route(endpoints::EDIT_CUSTOMER_VIEW, get(get_edit_customer_page))
        .layer(middleware::from_fn(staff_guard));

    // Pages for admins only.
    let admin_routes = Router::new()
        .route(endpoints::OUTLETS_VIEW, get(get_outlets_page))
        .route(endpoints::NEW_OUTLET_VIEW, get(get_new_outlet_page))
        .route(endpoints::EDIT_OUTLET_VIEW, get(get_edit_outlet_page))
        .route(endpoints::PACKAGES_VIEW, get(get_packages_page))
        .route(endpoints::NEW_PACKAGE_VIEW, get(get_new_package_page))
        .route(endpoints::EDIT_PACKAGE_VIEW, get(get_edit_package_page))
        .route(endpoints::USERS_VIEW, get(get_users_page))
        .route(endpoints::NEW_USER_VIEW, get(get_new_user_page))
        .route(endpoints::EDIT_USER_VIEW, get(get_edit_user_page))
        .layer(middleware::from_fn(admin_guard));

    let protected_routes = shared_routes
        .merge(staff_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-Redirect header for
    // auth redirects to work properly for HTMX requests.
    let staff_api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_STATUS,
            put(update_transaction_status_endpoint),
        )
        .route(
            endpoints::TRANSACTION_PAYMENT,
            put(update_payment_status_endpoint),
        )
        .route(endpoints::POST_CUSTOMER, post(create_customer_endpoint))
        .route(endpoints::PUT_CUSTOMER, put(edit_customer_endpoint))
        .route(endpoints::DELETE_CUSTOMER, delete(delete_customer_endpoint))
        .layer(middleware::from_fn(staff_guard));

    let admin_api_routes = Router::new()
        .route(endpoints::POST_OUTLET, post(create_outlet_endpoint))
        .route(endpoints::PUT_OUTLET, put(update_outlet_endpoint))
        .route(endpoints::DELETE_OUTLET, delete(delete_outlet_endpoint))
        .route(endpoints::POST_PACKAGE, post(create_package_endpoint))
        .route(endpoints::PUT_PACKAGE, put(update_package_endpoint))
        .route(endpoints::DELETE_PACKAGE, delete(delete_package_endpoint))
        .route(endpoints::POST_USER, post(create_user_endpoint))
        .route(endpoints::PUT_USER, put(update_user_endpoint))
        .route(endpoints::DELETE_USER, delete(delete_user_endpoint))
        .layer(middleware::from_fn(admin_guard));

    let api_routes = staff_api_routes
        .merge(admin_api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    protected_routes
        .merge(api_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod build_router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, endpoints, pagination::PaginationConfig};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(
            connection,
            "foobar",
            "Etc/UTC",
            PaginationConfig::default(),
        )
        .unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_in_page_is_reachable_without_auth() {
        let server = get_test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn dashboard_redirects_to_log_in_without_auth() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        let location = response.header("location");
        let location = location.to_str().unwrap();
        assert!(location.starts_with(endpoints::LOG_IN_VIEW));
    }

    #[tokio::test]
    async fn unknown_route_renders_404_page() {
        let server = get_test_server();

        let response = server.get("/does/not/exist").await;

        response.assert_status_not_found();
    }
}
