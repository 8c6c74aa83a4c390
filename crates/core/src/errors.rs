use alloy::primitives::{Address, B256};
use thiserror::Error;

/// Conditions that invalidate the premises of a whole batch run.
///
/// Anything surfaced as a `GovernanceError` aborts the run; every other
/// `eyre::Report` is treated as a failure of the single target being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Proxy admin {proxy_admin} is owned by {owner}, expected timelock {timelock}")]
    OwnerMismatch {
        proxy_admin: Address,
        owner: Address,
        timelock: Address,
    },

    #[error("Timelock {timelock} has no registered {role}")]
    NoCaller { timelock: Address, role: String },

    #[error("Signer {signer} is not an owner of multisig {multisig}")]
    UnauthorizedSigner { signer: Address, multisig: Address },

    #[error("Caller {caller} has code but does not answer getOwners: {reason}")]
    IncompatibleCaller { caller: Address, reason: String },

    #[error("Operation id mismatch: computed {local}, timelock reports {remote}")]
    OperationIdMismatch { local: B256, remote: B256 },

    #[error("Configured delay {configured} is below the timelock minimum {minimum}")]
    DelayTooShort { configured: u64, minimum: u64 },

    #[error("Multisig {multisig} needs {threshold} signatures, a single pre-approved owner cannot execute")]
    ThresholdTooHigh { multisig: Address, threshold: u64 },

    #[error("Wallet account {wallet} cannot send as {expected}")]
    SenderMismatch { expected: Address, wallet: Address },
}

/// A read that reached the chain and reverted, as opposed to a transport failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Call to {target} reverted: {reason}")]
pub struct CallReverted {
    pub target: Address,
    pub reason: String,
}

/// Returns true when the report carries a `CallReverted` anywhere in its chain.
pub fn is_revert(report: &eyre::Report) -> bool {
    report
        .chain()
        .any(|cause| cause.downcast_ref::<CallReverted>().is_some())
}

/// Returns true when the report carries a `GovernanceError` anywhere in its chain.
pub fn is_fatal(report: &eyre::Report) -> bool {
    report
        .chain()
        .any(|cause| cause.downcast_ref::<GovernanceError>().is_some())
}
