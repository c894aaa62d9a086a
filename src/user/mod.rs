//! User accounts: the admin, kasir and owner logins, plus the admin-only
//! management pages for them.

mod core;
mod create;
mod edit;
mod form;
mod list;

pub use core::{
    CurrentUser, NewUser, Role, User, UserId, count_users, create_user, create_user_table,
    get_user_by_id, get_user_by_username, map_row_to_user, update_user_password,
};
pub use create::{create_user_endpoint, get_new_user_page};
pub use edit::{get_edit_user_page, update_user_endpoint};
pub use list::{delete_user_endpoint, get_users_page};
