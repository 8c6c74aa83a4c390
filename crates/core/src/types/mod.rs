pub mod address_book;
pub mod admin_target;
pub mod config_wrapper;
pub mod transaction;
