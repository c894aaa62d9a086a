use maud::{Markup, html};

use crate::html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE};

/// Values to prefill the outlet form with, used by the edit page.
#[derive(Default)]
pub(super) struct OutletFormDefaults<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub phone: Option<&'a str>,
}

pub(super) fn outlet_form_fields(defaults: &OutletFormDefaults<'_>) -> Markup {
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
                placeholder="Contoh: Cabang Utama"
                required
                autofocus
                value=[defaults.name]
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
                placeholder="Address"
                required
                value=[defaults.address]
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
                placeholder="Phone (optional)"
                value=[defaults.phone]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
