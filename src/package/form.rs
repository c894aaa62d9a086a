use maud::{Markup, html};

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    outlet::{Outlet, OutletId},
    package::PackageKind,
};

/// Values to prefill the package form with, used by the edit page.
#[derive(Default)]
pub(super) struct PackageFormDefaults<'a> {
    pub name: Option<&'a str>,
    pub kind: Option<PackageKind>,
    pub price: Option<i64>,
    pub outlet_id: Option<OutletId>,
}

pub(super) fn package_form_fields(
    defaults: &PackageFormDefaults<'_>,
    available_outlets: &[Outlet],
) -> Markup {
    let price_str = defaults.price.map(|price| price.to_string());

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
                placeholder="Contoh: Cuci Kering Kiloan"
                required
                autofocus
                value=[defaults.name]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="kind"
                class=(FORM_LABEL_STYLE)
            {
                "Kind"
            }

            select
                name="kind"
                id="kind"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for kind in PackageKind::ALL {
                    option
                        value=(kind.as_str())
                        selected[defaults.kind == Some(kind)]
                    {
                        (kind.label())
                    }
                }
            }
        }

        div
        {
            label
                for="price"
                class=(FORM_LABEL_STYLE)
            {
                "Price"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="price"
                    id="price"
                    type="number"
                    step="500"
                    min="0"
                    placeholder="0"
                    required
                    value=[price_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        @if !available_outlets.is_empty() {
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
                    option value="" { "All outlets" }

                    @for outlet in available_outlets {
                        option
                            value=(outlet.id)
                            selected[defaults.outlet_id == Some(outlet.id)]
                        {
                            (outlet.name)
                        }
                    }
                }
            }
        }
    }
}
