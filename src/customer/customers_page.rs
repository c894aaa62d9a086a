//! Displays customers and their contact details.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    user::CurrentUser,
};

/// The state needed for the [get_customers_page](crate::customer::get_customers_page) route handler.
#[derive(Debug, Clone)]
pub struct CustomerState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CustomerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The customer data to display in the view
#[derive(Debug, PartialEq)]
struct CustomerTableRow {
    name: String,
    phone: String,
    email: Option<String>,
    is_member: bool,
    edit_url: String,
    delete_url: String,
}

fn customers_view(customers: &[CustomerTableRow], current_user: &CurrentUser) -> Markup {
    let create_customer_page_url = endpoints::NEW_CUSTOMER_VIEW;
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW, current_user.role).into_html();

    let table_row = |customer: &CustomerTableRow| {
        let action_links = edit_delete_action_links(
            &customer.edit_url,
            &customer.delete_url,
            &format!(
                "Are you sure you want to delete the customer '{}'? This cannot be undone.",
                customer.name
            ),
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (customer.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (customer.phone)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (customer.email.as_deref().unwrap_or("-"))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if customer.is_member { "Member" } @else { "-" }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Customers" }

                    a href=(create_customer_page_url) class=(LINK_STYLE)
                    {
                        "Add Customer"
                    }
                }

                section class="w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Name"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Phone"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Email"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Membership"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for customer in customers {
                                (table_row(customer))
                            }

                            @if customers.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No customers found. Create a customer "
                                        a href=(create_customer_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Customers", &[], &content)
}

/// Renders the customers page showing all customers.
pub async fn get_customers_page(
    State(state): State<CustomerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let customers: Vec<CustomerTableRow> = get_customer_rows(&connection)
        .inspect_err(|error| tracing::error!("could not get all customers: {error}"))?;

    Ok(customers_view(&customers, &current_user).into_response())
}

fn get_customer_rows(connection: &Connection) -> Result<Vec<CustomerTableRow>, Error> {
    connection
        .prepare(
            "SELECT id, name, phone, email, is_member FROM customer
            ORDER BY created_at DESC;",
        )?
        .query_map([], |row| {
            let id = row.get(0)?;

            Ok(CustomerTableRow {
                name: row.get(1)?,
                phone: row.get(2)?,
                email: row.get(3)?,
                is_member: row.get(4)?,
                edit_url: format_endpoint(endpoints::EDIT_CUSTOMER_VIEW, id),
                delete_url: format_endpoint(endpoints::DELETE_CUSTOMER, id),
            })
        })?
        .map(|customer_result| customer_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod customers_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::datetime;

    use crate::{
        db::initialize,
        test_utils::{assert_valid_html, parse_html_document, test_current_user},
        user::Role,
    };

    use super::{CustomerState, get_customers_page};

    fn get_test_state() -> CustomerState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CustomerState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn displays_customers_in_table() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            connection
                .execute(
                    "INSERT INTO customer (name, phone, email, address, is_member, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    (
                        "Siti Aminah",
                        "0812-3456-7890",
                        Option::<String>::None,
                        Option::<String>::None,
                        true,
                        datetime!(2026-01-15 10:00 UTC),
                    ),
                )
                .unwrap();
        }

        let response = get_customers_page(
            State(state),
            Extension(test_current_user(Role::Kasir)),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let row_selector = Selector::parse("tbody tr").unwrap();
        let rows: Vec<_> = html.select(&row_selector).collect();
        assert_eq!(rows.len(), 1);
        let row_text: String = rows[0].text().collect();
        assert!(row_text.contains("Siti Aminah"));
        assert!(row_text.contains("0812-3456-7890"));
        assert!(row_text.contains("Member"));
    }

    #[tokio::test]
    async fn displays_empty_state_with_create_link() {
        let state = get_test_state();

        let response = get_customers_page(
            State(state),
            Extension(test_current_user(Role::Kasir)),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let empty_cell_selector = Selector::parse("td[colspan='5'] a").unwrap();
        let link = html
            .select(&empty_cell_selector)
            .next()
            .expect("Could not find create link in empty state");
        assert_eq!(
            link.attr("href"),
            Some(crate::endpoints::NEW_CUSTOMER_VIEW)
        );
    }
}
