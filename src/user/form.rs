use maud::{Markup, html};

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    outlet::{Outlet, OutletId},
    user::Role,
};

const ROLES: [Role; 3] = [Role::Admin, Role::Kasir, Role::Owner];

/// Values to prefill the user form with, used by the edit page.
#[derive(Default)]
pub(super) struct UserFormDefaults<'a> {
    pub username: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub role: Option<Role>,
    pub outlet_id: Option<OutletId>,
    /// Edit forms leave the password empty to keep the current one.
    pub password_is_optional: bool,
}

pub(super) fn user_form_fields(
    defaults: &UserFormDefaults<'_>,
    available_outlets: &[Outlet],
) -> Markup {
    let password_label = if defaults.password_is_optional {
        "New Password (leave empty to keep the current one)"
    } else {
        "Password"
    };

    html! {
        div
        {
            label
                for="username"
                class=(FORM_LABEL_STYLE)
            {
                "Username"
            }

            input
                name="username"
                id="username"
                type="text"
                placeholder="Username"
                required
                autofocus
                value=[defaults.username]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="full_name"
                class=(FORM_LABEL_STYLE)
            {
                "Full Name"
            }

            input
                name="full_name"
                id="full_name"
                type="text"
                placeholder="Contoh: Admin Utama"
                required
                value=[defaults.full_name]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="password"
                class=(FORM_LABEL_STYLE)
            {
                (password_label)
            }

            input
                type="password"
                name="password"
                id="password"
                placeholder="••••••••"
                required[!defaults.password_is_optional]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="role"
                class=(FORM_LABEL_STYLE)
            {
                "Role"
            }

            select
                name="role"
                id="role"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for role in ROLES {
                    option
                        value=(role.as_str())
                        selected[defaults.role == Some(role)]
                    {
                        (role.label())
                    }
                }
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
                    option value="" { "No outlet" }

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
