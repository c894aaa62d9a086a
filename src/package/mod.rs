//! Service package management: the priced offerings customers choose from,
//! e.g. per-kilogram wash or bed cover cleaning.

mod core;
mod create;
mod edit;
mod form;
mod list;

pub use core::{
    Package, PackageId, PackageKind, create_package_table, get_all_packages, map_row_to_package,
};
pub use create::{create_package_endpoint, get_new_package_page};
pub use edit::{get_edit_package_page, update_package_endpoint};
pub use list::{delete_package_endpoint, get_packages_page};
