use crate::actions::action::Action;
use crate::types::admin_target::AdminTarget;
use alloy::primitives::Address;
use async_trait::async_trait;
use eyre::Result;

/// Human readable descriptions for the two halves of the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comments {
    pub propose: String,
    pub execute: String,
}

/// Outcome of comparing a desired end state with the chain.
pub enum Validation {
    /// Chain already matches, nothing to do.
    AlreadySatisfied { current: Address },
    /// The governed call that would move the chain to the desired state.
    Proposal {
        action: Box<dyn Action>,
        comments: Comments,
    },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Proposal { .. })
    }
}

#[async_trait]
pub trait ProposalValidator: Send + Sync {
    async fn validate(&self, target: &AdminTarget) -> Result<Validation>;
}
