//! Defines the route handler for the page for creating a new customer.

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner},
    navigation::NavBar,
    user::CurrentUser,
};

use super::form::{customer_form_fields, CustomerFormDefaults};

fn create_customer_view(current_user: &CurrentUser) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CUSTOMER_VIEW, current_user.role).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_CUSTOMER)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Customer" }

                (customer_form_fields(&CustomerFormDefaults::default()))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Create Customer"
                }
            }
        }
    };

    base("Create Customer", &[], &content)
}

/// Display the form for creating a new customer.
pub async fn get_create_customer_page(
    Extension(current_user): Extension<CurrentUser>,
) -> Response {
    create_customer_view(&current_user).into_response()
}
