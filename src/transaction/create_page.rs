//! Defines the route handler for the page for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base, format_rupiah, loading_spinner, rupiah_input_styles,
    },
    navigation::NavBar,
    outlet::{Outlet, get_all_outlets},
    package::{Package, get_all_packages},
    user::{CurrentUser, Role},
};

/// The state needed for the create transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A customer option for the select input.
struct CustomerOption {
    id: i64,
    name: String,
}

fn create_transaction_view(
    customers: &[CustomerOption],
    packages: &[Package],
    outlets: &[Outlet],
    current_user: &CurrentUser,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();
    // A kasir's orders always go to their own outlet, so the select is only
    // shown to admins.
    let show_outlet_select = current_user.role == Role::Admin && !outlets.is_empty();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            @if customers.is_empty() {
                p
                {
                    "No customers found. Create a customer "
                    a href=(endpoints::NEW_CUSTOMER_VIEW) class=(LINK_STYLE) { "here" }
                    " first."
                }
            } @else if packages.is_empty() {
                p
                {
                    "No packages found. Ask an admin to create a package before \
                    recording transactions."
                }
            } @else {
                form
                    hx-post=(endpoints::TRANSACTIONS_API)
                    hx-target-error="#alert-container"
                    class="w-full space-y-4 md:space-y-6"
                {
                    h2 class="text-xl font-bold" { "New Transaction" }

                    div
                    {
                        label
                            for="customer_id"
                            class=(FORM_LABEL_STYLE)
                        {
                            "Customer"
                        }

                        select
                            name="customer_id"
                            id="customer_id"
                            required
                            class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for customer in customers {
                                option value=(customer.id) { (customer.name) }
                            }
                        }
                    }

                    div
                    {
                        label
                            for="package_id"
                            class=(FORM_LABEL_STYLE)
                        {
                            "Package"
                        }

                        select
                            name="package_id"
                            id="package_id"
                            required
                            class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for package in packages {
                                option value=(package.id)
                                {
                                    (package.name) " (" (format_rupiah(package.price)) ")"
                                }
                            }
                        }
                    }

                    @if show_outlet_select {
                        div
                        {
                            label
                                for="outlet_id"
                                class=(FORM_LABEL_STYLE)
                            {
                                "Outlet"
                            }

                            select
                                name="outlet_id"
                                id="outlet_id"
                                class=(FORM_TEXT_INPUT_STYLE)
                            {
                                option value="" { "No outlet" }

                                @for outlet in outlets {
                                    option value=(outlet.id) { (outlet.name) }
                                }
                            }
                        }
                    }

                    div
                    {
                        label
                            for="quantity"
                            class=(FORM_LABEL_STYLE)
                        {
                            "Quantity"
                        }

                        input
                            name="quantity"
                            id="quantity"
                            type="number"
                            min="1"
                            value="1"
                            required
                            autofocus
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label
                            for="discount"
                            class=(FORM_LABEL_STYLE)
                        {
                            "Discount"
                        }

                        div class="input-wrapper w-full"
                        {
                            input
                                name="discount"
                                id="discount"
                                type="number"
                                min="0"
                                value="0"
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }

                    div
                    {
                        label
                            for="tax"
                            class=(FORM_LABEL_STYLE)
                        {
                            "Tax"
                        }

                        div class="input-wrapper w-full"
                        {
                            input
                                name="tax"
                                id="tax"
                                type="number"
                                min="0"
                                value="0"
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }

                    button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                    {
                        span
                            id="indicator"
                            class="inline htmx-indicator"
                        {
                            (spinner)
                        }
                        " Record Transaction"
                    }
                }
            }
        }
    };

    base("Record Transaction", &[rupiah_input_styles()], &content)
}

/// Display the form for recording a new transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let customers = get_customer_options(&connection)
        .inspect_err(|error| tracing::error!("could not get customers: {error}"))?;
    let packages = get_all_packages(&connection)
        .inspect_err(|error| tracing::error!("could not get packages: {error}"))?;
    let outlets = get_all_outlets(&connection)
        .inspect_err(|error| tracing::error!("could not get outlets: {error}"))?;

    Ok(create_transaction_view(&customers, &packages, &outlets, &current_user).into_response())
}

fn get_customer_options(connection: &Connection) -> Result<Vec<CustomerOption>, Error> {
    connection
        .prepare("SELECT id, name FROM customer ORDER BY name ASC;")?
        .query_map([], |row| {
            Ok(CustomerOption {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .map(|customer_result| customer_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod create_transaction_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        package::PackageKind,
        test_utils::{
            assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document,
            test_current_user,
        },
        user::Role,
    };

    use super::{CreateTransactionPageState, get_create_transaction_page};

    fn get_test_state() -> CreateTransactionPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateTransactionPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn seed_customer_and_package(state: &CreateTransactionPageState) {
        let connection = state.db_connection.lock().unwrap();
        connection
            .execute(
                "INSERT INTO customer (name, phone, is_member, created_at)
                VALUES ('Siti', '0812', 0, '2026-01-01T00:00:00Z')",
                (),
            )
            .unwrap();
        connection
            .execute(
                "INSERT INTO package (name, kind, price, outlet_id) VALUES (?1, ?2, ?3, NULL)",
                ("Cuci Kering Kiloan", PackageKind::Kiloan, 7000),
            )
            .unwrap();
    }

    #[tokio::test]
    async fn form_posts_to_transactions_api() {
        let state = get_test_state();
        seed_customer_and_package(&state);

        let response = get_create_transaction_page(
            State(state),
            Extension(test_current_user(Role::Kasir)),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
    }

    #[tokio::test]
    async fn shows_create_customer_link_when_no_customers() {
        let state = get_test_state();

        let response = get_create_transaction_page(
            State(state),
            Extension(test_current_user(Role::Kasir)),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let link_selector = scraper::Selector::parse("main p a, div p a").unwrap();
        let link = html
            .select(&link_selector)
            .next()
            .expect("Could not find create customer link");
        assert_eq!(link.attr("href"), Some(endpoints::NEW_CUSTOMER_VIEW));
    }
}
