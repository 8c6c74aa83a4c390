pub mod action;
pub mod multisig_action;
pub mod timelock_action;
pub mod transfer_ownership_action;
pub mod upgrade_proxy_action;
