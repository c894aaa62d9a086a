//! Defines the route handler for the page for editing an existing customer.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::{Connection, params};

use crate::{
    AppState, Error,
    customer::{Customer, CustomerId, map_row_to_customer},
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    user::CurrentUser,
};

use super::form::{CustomerFormDefaults, customer_form_fields};

/// The state needed to display the edit customer page.
#[derive(Debug, Clone)]
pub struct EditCustomerPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCustomerPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_customer_view(customer: &Customer, current_user: &CurrentUser) -> Markup {
    let update_url = format_endpoint(endpoints::PUT_CUSTOMER, customer.id);
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();
    let defaults = CustomerFormDefaults {
        name: Some(&customer.name),
        phone: Some(&customer.phone),
        email: customer.email.as_deref(),
        address: customer.address.as_deref(),
        is_member: customer.is_member,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Customer" }

                (customer_form_fields(&defaults))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Save Changes"
                }
            }
        }
    };

    base("Edit Customer", &[], &content)
}

/// Display the form for editing an existing customer.
pub async fn get_edit_customer_page(
    State(state): State<EditCustomerPageState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let customer = get_customer(customer_id, &connection)
        .inspect_err(|error| tracing::error!("could not get customer {customer_id}: {error}"))?;

    Ok(edit_customer_view(&customer, &current_user).into_response())
}

pub(super) fn get_customer(
    id: CustomerId,
    connection: &Connection,
) -> Result<Customer, Error> {
    connection
        .query_one(
            "SELECT id, name, phone, email, address, is_member, created_at
            FROM customer WHERE id = ?1",
            params![id],
            map_row_to_customer,
        )
        .map_err(Error::from)
}

#[cfg(test)]
mod edit_customer_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        customer::create_endpoint::{CustomerForm, create_customer},
        db::initialize,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document, test_current_user,
        },
        user::Role,
    };

    use super::{EditCustomerPageState, get_edit_customer_page};

    fn get_test_state() -> EditCustomerPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        EditCustomerPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn form_is_prefilled_with_customer() {
        let state = get_test_state();
        let customer = {
            let connection = state.db_connection.lock().unwrap();
            create_customer(
                &CustomerForm {
                    name: "Siti Aminah".to_owned(),
                    phone: "0812-3456-7890".to_owned(),
                    email: None,
                    address: None,
                    is_member: None,
                },
                &connection,
            )
            .unwrap()
        };

        let response = get_edit_customer_page(
            State(state),
            Extension(test_current_user(Role::Kasir)),
            Path(customer.id),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::PUT_CUSTOMER, customer.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", "Siti Aminah");
        assert_form_input_with_value(&form, "phone", "tel", "0812-3456-7890");
    }

    #[tokio::test]
    async fn returns_not_found_for_missing_customer() {
        let state = get_test_state();

        let result = get_edit_customer_page(
            State(state),
            Extension(test_current_user(Role::Kasir)),
            Path(42),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }
}
