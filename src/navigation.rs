//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::{endpoints, user::Role};

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( li { a href=(self.url) class=(style) { (self.title) } } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar for a user with `role`.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    ///
    /// Admin-only sections (outlets, packages, users) and staff sections
    /// (transactions, customers) are hidden from roles that cannot access
    /// them.
    pub fn new(active_endpoint: &str, role: Role) -> NavBar<'_> {
        let link = |url: &'static str, title: &'static str| Link {
            url,
            title,
            is_current: active_endpoint == url,
        };

        let mut links = vec![link(endpoints::DASHBOARD_VIEW, "Dashboard")];

        if matches!(role, Role::Admin | Role::Kasir) {
            links.push(link(endpoints::TRANSACTIONS_VIEW, "Transactions"));
            links.push(link(endpoints::CUSTOMERS_VIEW, "Customers"));
        }

        if role == Role::Admin {
            links.push(link(endpoints::PACKAGES_VIEW, "Packages"));
            links.push(link(endpoints::OUTLETS_VIEW, "Outlets"));
            links.push(link(endpoints::USERS_VIEW, "Users"));
        }

        links.push(link(endpoints::REPORTS_VIEW, "Reports"));
        links.push(Link {
            url: endpoints::LOG_OUT,
            title: "Log out",
            is_current: false,
        });

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href="/"
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Washboard"
                        }
                    }

                    ul
                        class="flex flex-wrap font-medium items-center gap-x-4 gap-y-2 p-0 mt-2
                            lg:mt-0 lg:space-x-8 rtl:space-x-reverse"
                    {
                        @for link in self.links {
                            (link.into_html())
                        }
                    }
                }
            }
        )
    }
}
