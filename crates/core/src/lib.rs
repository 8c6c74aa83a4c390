pub mod actions;
pub mod bindings;
pub mod codec;
pub mod errors;
pub mod orchestrator;
pub mod signer;
pub mod submitter;
pub mod timelock;
pub mod tx_builder;
pub mod types;
pub mod utils;
pub mod validators;

#[cfg(test)]
pub(crate) mod test_utils;

pub use actions::timelock_action::Mode;
pub use codec::operation::Operation;
pub use errors::{GovernanceError, is_fatal};
pub use orchestrator::batch::BatchOrchestrator;
pub use orchestrator::outcome::BatchSummary;
pub use orchestrator::selection::TargetRequest;
pub use types::config_wrapper::{ConfigWrapper, NetworkConfig};
