//! Outlet management: the physical branch locations of the laundry business.

mod core;
mod create;
mod edit;
mod form;
mod list;

pub use core::{Outlet, OutletId, create_outlet_table, get_all_outlets, map_row_to_outlet};
pub use create::{create_outlet_endpoint, get_new_outlet_page};
pub use edit::{get_edit_outlet_page, update_outlet_endpoint};
pub use list::{delete_outlet_endpoint, get_outlets_page};
