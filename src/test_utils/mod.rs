//! Shared helpers for tests: HTML parsing and assertions on forms and responses.

mod form;
mod html;

pub(crate) use form::{assert_form_input, assert_form_input_with_value, assert_hx_endpoint,
    must_get_form};
pub(crate) use html::{assert_valid_html, parse_html_document};

use crate::user::{CurrentUser, Role, UserId};

/// A current user for handler tests that take an `Extension<CurrentUser>`.
pub(crate) fn test_current_user(role: Role) -> CurrentUser {
    CurrentUser {
        id: UserId::new(1),
        username: "tester".to_owned(),
        full_name: "Test User".to_owned(),
        role,
        outlet_id: None,
    }
}
