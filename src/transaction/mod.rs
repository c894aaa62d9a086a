//! Transaction management: recording laundry orders, tracking their order
//! and payment status, and listing them for staff.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod status_endpoint;
mod transactions_page;

pub use core::{
    PaymentStatus, Transaction, TransactionId, TransactionStatus, create_transaction_table,
    map_row_to_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use status_endpoint::{update_payment_status_endpoint, update_transaction_status_endpoint};
pub use transactions_page::get_transactions_page;
