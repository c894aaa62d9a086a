use maud::{Markup, html};

use crate::html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE};

/// Values to prefill the customer form with, used by the edit page.
#[derive(Default)]
pub(super) struct CustomerFormDefaults<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub is_member: bool,
}

pub(super) fn customer_form_fields(defaults: &CustomerFormDefaults<'_>) -> Markup {
    html! {
        div
        {
            label
                for="name"
                class=(FORM_LABEL_STYLE)
            {
                "Name"
            }

            input
                name="name"
                id="name"
                type="text"
                placeholder="Name"
                required
                autofocus
                value=[defaults.name]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="phone"
                class=(FORM_LABEL_STYLE)
            {
                "Phone"
            }

            input
                name="phone"
                id="phone"
                type="tel"
                placeholder="08xx-xxxx-xxxx"
                required
                value=[defaults.phone]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="email"
                class=(FORM_LABEL_STYLE)
            {
                "Email"
            }

            input
                name="email"
                id="email"
                type="email"
                placeholder="Email (optional)"
                value=[defaults.email]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="address"
                class=(FORM_LABEL_STYLE)
            {
                "Address"
            }

            input
                name="address"
                id="address"
                type="text"
                placeholder="Address (optional)"
                value=[defaults.address]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div class="flex items-center gap-x-3"
        {
            input
                type="checkbox"
                name="is_member"
                id="is_member"
                tabindex="0"
                checked[defaults.is_member]
                class="rounded-xs";

            label
                for="is_member"
                class="block text-sm font-medium text-gray-900 dark:text-white"
            {
                "Member"
            }
        }
    }
}
