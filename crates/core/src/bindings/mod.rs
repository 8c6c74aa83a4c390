pub mod multisig;
pub mod proxy_admin;
pub mod timelock;
